//! # Fibre Inject
//!
//! Field, method and constructor injection on top of a thread-safe, typed
//! binding container.
//!
//! Rust has no runtime reflection, so every injectable type describes its
//! members once through [`Injectable::describe`]. The [`Injector`] scans that
//! description, resolves each injection point against a [`Container`] (or any
//! other [`Bindings`]) and writes the values back.
//!
//! ## Core Concepts
//!
//! - **Container**: the registry of bindings: instances, singletons, providers
//!   and one-argument factories, optionally tagged with a name.
//! - **Injection points**: inject-marked fields, at most one inject-marked
//!   method, and the constructor used by [`Injector::new_instance`].
//! - **Qualifiers**: `Named` picks a tagged binding; custom qualifiers map
//!   their value to a tag through a registered rule.
//! - **Wrappers**: a point can ask for a [`Lazy`] value, a [`Provider`] that
//!   produces a fresh value per call, a [`Factory`] taking one argument, or
//!   a lazy provider or factory.
//! - **Optional**: an optional point whose binding is missing gets `None`
//!   instead of an error.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_inject::{Annotations, ClassDescriptor, Container, Injectable, Injector, Provider};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Person {
//!   firstname: Option<Arc<String>>,
//!   lastname: Option<Provider<Option<Arc<String>>>>,
//! }
//!
//! impl Injectable for Person {
//!   fn describe(class: &mut ClassDescriptor<Self>) {
//!     class
//!       .field("firstname", Annotations::inject(), |p: &mut Person, v: Arc<String>| {
//!         p.firstname = Some(v)
//!       })
//!       .field(
//!         "lastname",
//!         Annotations::inject().named("lastname").optional(),
//!         |p: &mut Person, v: Provider<Option<Arc<String>>>| p.lastname = Some(v),
//!       );
//!   }
//! }
//!
//! let container = Container::new();
//! container.add_instance(String::from("Salomon"));
//!
//! let mut person = Person::default();
//! Injector::new().inject(&mut person, &container).unwrap();
//!
//! assert_eq!(person.firstname.as_deref().map(String::as_str), Some("Salomon"));
//! assert!(person.lastname.unwrap().get().is_none());
//! ```

mod annotation;
mod config;
mod container;
mod core;
mod descriptor;
mod error;
mod injector;
mod macros;
mod point;
mod qualifier;
mod resolver;
mod scanner;
mod types;
mod value;
mod wrapper;

pub use annotation::{Annotation, Annotations};
pub use config::{InjectorConfig, QualifierRule};
pub use container::{ArgProducer, Bindings, Container, ErasedProducer, Producer};
pub use descriptor::{Arguments, ClassDescriptor, Injectable, Param};
pub use error::InjectError;
pub use injector::{Injector, InjectorBuilder};
pub use point::{InjectionPoint, MemberRef, PointKind};
pub use qualifier::{extract_tag, QualifierRegistry};
pub use resolver::{lookup, resolve, BindingRequest, Mode};
pub use types::{TypeDescriptor, TypeHead};
pub use value::{Factory, FactoryFn, Injected, Lazy, Leaf, Maker, Provider, ProviderFn, Resolved};
pub use wrapper::{unwrap, Unwrapped, WrapperKind, WrapperSignature};
