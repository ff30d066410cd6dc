use fibre_inject::{Annotations, Arguments, ClassDescriptor, Container, InjectError, Injectable, Injector, Param};
use pretty_assertions::assert_eq;
use std::sync::Arc;

// --- Test Fixtures ---

#[derive(Default)]
struct Named {
  firstname: Option<Arc<String>>,
  greeting: Option<String>,
}

impl Injectable for Named {
  fn describe(class: &mut ClassDescriptor<Self>) {
    class
      .rename("Named")
      .field("firstname", Annotations::inject(), |t: &mut Named, v: Arc<String>| {
        t.firstname = Some(v)
      })
      .method(
        "greet",
        Annotations::inject(),
        [Param::of::<Arc<String>>().named("lastname")],
        |t: &mut Named, args: &mut Arguments| {
          let lastname: Arc<String> = args.next()?;
          t.greeting = Some(format!("Hello, {}", lastname));
          Ok(())
        },
      );
  }
}

#[derive(Default)]
struct Employee {
  person: Named,
  company: Option<Arc<String>>,
  registered: bool,
}

impl Injectable for Employee {
  fn describe(class: &mut ClassDescriptor<Self>) {
    class
      .rename("Employee")
      .include(|t: &mut Employee| &mut t.person)
      .field(
        "company",
        Annotations::inject().named("company"),
        |t: &mut Employee, v: Arc<String>| t.company = Some(v),
      )
      .method("register", Annotations::inject(), std::iter::empty(), |t: &mut Employee, _: &mut Arguments| {
        t.registered = true;
        Ok(())
      });
  }
}

#[derive(Default)]
struct Noisy;

impl Injectable for Noisy {
  fn describe(class: &mut ClassDescriptor<Self>) {
    class
      .rename("Noisy")
      .method("a", Annotations::inject(), std::iter::empty(), |_: &mut Noisy, _: &mut Arguments| Ok(()))
      .method("b", Annotations::inject(), std::iter::empty(), |_: &mut Noisy, _: &mut Arguments| Ok(()));
  }
}

#[derive(Default)]
struct Holder {
  noisy: Noisy,
}

impl Injectable for Holder {
  fn describe(class: &mut ClassDescriptor<Self>) {
    class.rename("Holder").include(|t: &mut Holder| &mut t.noisy);
  }
}

fn full_container() -> Container {
  let container = Container::new();
  container.add_instance(String::from("Salomon"));
  container.add_instance_with_name("lastname", String::from("BRYS"));
  container.add_instance_with_name("company", String::from("Kodein Koders"));
  container
}

// --- Embedded Members ---

#[test]
fn test_embedded_fields_and_method_are_injected() {
  // Arrange
  let container = full_container();
  let mut employee = Employee::default();

  // Act
  Injector::new().inject(&mut employee, &container).unwrap();

  // Assert
  assert_eq!(employee.person.firstname.as_deref().map(String::as_str), Some("Salomon"));
  assert_eq!(employee.person.greeting.as_deref(), Some("Hello, BRYS"));
  assert_eq!(employee.company.as_deref().map(String::as_str), Some("Kodein Koders"));
  assert!(employee.registered);
}

#[test]
fn test_embedded_points_are_reported_under_their_own_type() {
  let points = Injector::new().injection_points::<Employee>().unwrap();

  let names: Vec<String> = points.iter().map(|point| point.to_string()).collect();
  assert_eq!(
    names,
    vec![
      "Named::firstname".to_string(),
      "Employee::company".to_string(),
      "parameter 1 of Named::greet".to_string(),
    ]
  );
}

#[test]
fn test_missing_embedded_binding_leaves_everything_untouched() {
  // Arrange: "lastname" is not bound.
  let container = Container::new();
  container.add_instance(String::from("Salomon"));
  container.add_instance_with_name("company", String::from("Kodein Koders"));
  let mut employee = Employee::default();

  // Act
  let err = Injector::new().inject(&mut employee, &container).unwrap_err();

  // Assert
  assert!(
    matches!(err, InjectError::UnresolvedBinding { ref point, .. } if point == "parameter 1 of Named::greet"),
    "{err}"
  );
  assert!(employee.person.firstname.is_none());
  assert!(employee.company.is_none());
  assert!(!employee.registered);
}

#[test]
fn test_embedded_type_keeps_its_own_method_rule() {
  let err = Injector::new().injection_points::<Holder>().unwrap_err();

  match err {
    InjectError::AmbiguousInjectableMethod { class, methods } => {
      assert_eq!(class, "Noisy");
      assert_eq!(methods, vec!["a", "b"]);
    }
    other => panic!("unexpected error: {other}"),
  }
}
