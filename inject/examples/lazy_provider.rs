use fibre_inject::{Annotations, ClassDescriptor, Container, Factory, Injectable, Injector, Lazy, Provider};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

#[derive(Default)]
struct Report {
  title: Option<Lazy<Arc<String>>>,
  ticket: Option<Provider<Arc<String>>>,
  page: Option<Factory<u32, Arc<String>>>,
}

impl Injectable for Report {
  fn describe(class: &mut ClassDescriptor<Self>) {
    class
      .field("title", Annotations::inject().named("title"), |r: &mut Report, v: Lazy<Arc<String>>| {
        r.title = Some(v)
      })
      .field("ticket", Annotations::inject(), |r: &mut Report, v: Provider<Arc<String>>| {
        r.ticket = Some(v)
      })
      .field("page", Annotations::inject(), |r: &mut Report, v: Factory<u32, Arc<String>>| {
        r.page = Some(v)
      });
  }
}

fn main() {
  let container = Container::new();
  let tickets = AtomicUsize::new(0);

  container.add_provider_with_name("title", || {
    println!("computing title");
    String::from("Quarterly report")
  });
  container.add_provider(move || format!("ticket #{}", tickets.fetch_add(1, Ordering::SeqCst)));
  container.add_factory(|page: u32| format!("page {}", page));

  let mut report = Report::default();
  Injector::new()
    .inject(&mut report, &container)
    .unwrap_or_else(|err| panic!("injection failed: {err}"));

  // The title is computed once, on first access.
  let title = report.title.unwrap();
  println!("{}", title.get());
  println!("{}", title.get());

  // The provider produces a new ticket on every call.
  let ticket = report.ticket.unwrap();
  assert_eq!(*ticket.get(), "ticket #0");
  assert_eq!(*ticket.get(), "ticket #1");

  // The factory passes its argument through to the binding.
  let page = report.page.unwrap();
  assert_eq!(*page.call(7), "page 7");
}
