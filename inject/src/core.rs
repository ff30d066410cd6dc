//! Binding keys and the circular-resolution guard.

use crate::types::TypeDescriptor;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;

thread_local! {
  // The bindings currently being produced on this thread. Seeing a key twice
  // means a producer is, directly or not, asking for its own output.
  static RESOLVING_STACK: RefCell<HashSet<BindingKey>> = RefCell::new(HashSet::new());
}

/// An RAII guard that detects circular resolution.
///
/// Creating it pushes the key onto the thread-local resolution stack and panics
/// if the key is already there. Dropping it pops the key.
pub(crate) struct ResolutionGuard {
  key: BindingKey,
}

impl ResolutionGuard {
  pub(crate) fn new(key: BindingKey) -> Self {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if !stack.insert(key.clone()) {
        panic!("Circular dependency detected while resolving binding: {:?}", key);
      }
    });
    Self { key }
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().remove(&self.key);
    });
  }
}

/// Identifies a binding: the bound type, an optional tag and, for factory
/// bindings, the type of the factory's argument.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct BindingKey {
  pub(crate) bound: TypeDescriptor,
  pub(crate) tag: Option<String>,
  pub(crate) argument: Option<TypeDescriptor>,
}

impl BindingKey {
  pub(crate) fn new(bound: TypeDescriptor, tag: Option<&str>) -> Self {
    Self {
      bound,
      tag: tag.map(str::to_owned),
      argument: None,
    }
  }

  pub(crate) fn of<T: ?Sized + Any>(tag: Option<&str>) -> Self {
    Self::new(TypeDescriptor::of::<T>(), tag)
  }

  pub(crate) fn factory_of<A: Any, T: ?Sized + Any>(tag: Option<&str>) -> Self {
    Self::new(TypeDescriptor::of::<T>(), tag).with_argument(TypeDescriptor::of::<A>())
  }

  pub(crate) fn with_argument(mut self, argument: TypeDescriptor) -> Self {
    self.argument = Some(argument);
    self
  }
}

impl fmt::Debug for BindingKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Key({}", self.bound)?;
    if let Some(argument) = &self.argument {
      write!(f, ", Argument({})", argument)?;
    }
    if let Some(tag) = &self.tag {
      write!(f, ", Tag({})", tag)?;
    }
    f.write_str(")")
  }
}
