use fibre_inject::{Annotations, ClassDescriptor, Container, Injectable, Injector};
use std::sync::Arc;

// --- Abstraction and Implementations ---
trait MessageSender: Send + Sync {
  fn send(&self, to: &str, message: &str) -> String;
}

struct EmailSender;
impl MessageSender for EmailSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email to {}: '{}'", to, message)
  }
}

struct SmsSender;
impl MessageSender for SmsSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending SMS to {}: '{}'", to, message)
  }
}

// --- Injection Target ---
#[derive(Default)]
struct Notifier {
  email: Option<Arc<dyn MessageSender>>,
  sms: Option<Arc<dyn MessageSender>>,
}

impl Injectable for Notifier {
  fn describe(class: &mut ClassDescriptor<Self>) {
    class
      .field(
        "email",
        Annotations::inject().named("email"),
        |n: &mut Notifier, v: Arc<dyn MessageSender>| n.email = Some(v),
      )
      .field(
        "sms",
        Annotations::inject().named("sms"),
        |n: &mut Notifier, v: Arc<dyn MessageSender>| n.sms = Some(v),
      );
  }
}

fn main() {
  // --- Registration ---
  // Register both implementations with unique names.
  let container = Container::new();
  container.add_singleton_trait_with_name::<dyn MessageSender>("email", || Arc::new(EmailSender));
  container.add_singleton_trait_with_name::<dyn MessageSender>("sms", || Arc::new(SmsSender));

  // --- Injection ---
  // Each field picks its implementation through its name.
  let mut notifier = Notifier::default();
  Injector::new()
    .inject(&mut notifier, &container)
    .unwrap_or_else(|err| panic!("injection failed: {err}"));

  let result1 = notifier.email.unwrap().send("test@example.com", "Hello from Fibre!");
  let result2 = notifier.sms.unwrap().send("+123456789", "Hello from Fibre!");

  println!("{}", result1);
  println!("{}", result2);

  assert!(result1.contains("email"));
  assert!(result2.contains("SMS"));
}
