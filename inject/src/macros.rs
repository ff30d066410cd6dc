//! Public macros for ergonomic reads from a container.

/// Resolves a service from a container, panicking if it is not registered.
///
/// The container is always passed explicitly; there is no global container.
///
/// # Panics
///
/// Panics if the service cannot be resolved. For a non-panicking version, use
/// [`maybe_resolve!`] or `Container::get` directly.
///
/// # Examples
///
/// ```
/// use fibre_inject::{resolve, Container};
///
/// let container = Container::new();
/// container.add_singleton(|| String::from("hello"));
///
/// let message = resolve!(container, String);
/// assert_eq!(*message, "hello");
/// ```
///
/// ```
/// use fibre_inject::{resolve, Container};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// let container = Container::new();
/// container.add_singleton_trait::<dyn Greeter>(|| Arc::new(EnglishGreeter));
///
/// let greeter = resolve!(container, trait Greeter);
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
  // resolve!(container, trait MyTrait)
  ($container:expr, trait $trait_ident:ident) => {
    $container
      .get::<dyn $trait_ident>(None)
      .unwrap_or_else(|| {
        panic!(
          "Failed to resolve required trait service: {}",
          std::any::type_name::<dyn $trait_ident>()
        )
      })
  };

  // resolve!(container, trait MyTrait, "name")
  ($container:expr, trait $trait_ident:ident, $name:expr) => {
    $container
      .get::<dyn $trait_ident>(Some($name))
      .unwrap_or_else(|| {
        panic!(
          "Failed to resolve required trait service with name '{}': {}",
          $name,
          std::any::type_name::<dyn $trait_ident>()
        )
      })
  };

  // resolve!(container, MyService)
  ($container:expr, $type:ty) => {
    $container
      .get::<$type>(None)
      .unwrap_or_else(|| {
        panic!(
          "Failed to resolve required service: {}",
          std::any::type_name::<$type>()
        )
      })
  };

  // resolve!(container, MyService, "name")
  ($container:expr, $type:ty, $name:expr) => {
    $container
      .get::<$type>(Some($name))
      .unwrap_or_else(|| {
        panic!(
          "Failed to resolve required service with name '{}': {}",
          $name,
          std::any::type_name::<$type>()
        )
      })
  };
}

/// Like [`resolve!`], but yields an `Option` instead of panicking.
///
/// ```
/// use fibre_inject::{maybe_resolve, Container};
///
/// let container = Container::new();
/// container.add_instance_with_name("lastname", String::from("BRYS"));
///
/// assert_eq!(maybe_resolve!(container, String, "lastname").as_deref().map(String::as_str), Some("BRYS"));
/// assert!(maybe_resolve!(container, String).is_none());
/// ```
#[macro_export]
macro_rules! maybe_resolve {
  ($container:expr, trait $trait_ident:ident) => {
    $container.get::<dyn $trait_ident>(None)
  };
  ($container:expr, trait $trait_ident:ident, $name:expr) => {
    $container.get::<dyn $trait_ident>(Some($name))
  };
  ($container:expr, $type:ty) => {
    $container.get::<$type>(None)
  };
  ($container:expr, $type:ty, $name:expr) => {
    $container.get::<$type>(Some($name))
  };
}
