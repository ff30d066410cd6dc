//! Structural descriptions of the types requested at injection points.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The outermost constructor of a [`TypeDescriptor`].
#[derive(Clone, Copy)]
pub enum TypeHead {
  /// A lazily evaluated value, [`Lazy<V>`](crate::Lazy). One argument.
  Lazy,
  /// The crate's provider handle, [`Provider<L>`](crate::Provider). One argument.
  Provider,
  /// The crate's factory handle, [`Factory<A, L>`](crate::Factory). Two arguments:
  /// the call argument, then the produced value.
  Factory,
  /// A bare zero-argument callable. One argument.
  Function0,
  /// A bare one-argument callable. Two arguments, like `Factory`.
  Function1,
  /// A concrete type or trait object that can be bound in a container.
  Class { id: TypeId, name: &'static str },
}

impl TypeHead {
  fn rank(&self) -> u8 {
    match self {
      TypeHead::Lazy => 0,
      TypeHead::Provider => 1,
      TypeHead::Factory => 2,
      TypeHead::Function0 => 3,
      TypeHead::Function1 => 4,
      TypeHead::Class { .. } => 5,
    }
  }
}

// A class head is identified by its `TypeId` alone; the name is only for display.
impl PartialEq for TypeHead {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (TypeHead::Class { id: a, .. }, TypeHead::Class { id: b, .. }) => a == b,
      _ => self.rank() == other.rank(),
    }
  }
}

impl Eq for TypeHead {}

impl Hash for TypeHead {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.rank().hash(state);
    if let TypeHead::Class { id, .. } = self {
      id.hash(state);
    }
  }
}

impl fmt::Debug for TypeHead {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TypeHead::Lazy => f.write_str("Lazy"),
      TypeHead::Provider => f.write_str("Provider"),
      TypeHead::Factory => f.write_str("Factory"),
      TypeHead::Function0 => f.write_str("Fn0"),
      TypeHead::Function1 => f.write_str("Fn1"),
      TypeHead::Class { name, .. } => f.write_str(name),
    }
  }
}

/// A normalized description of a requested type: a head plus its ordered
/// generic arguments.
///
/// Leaf descriptors (a [`TypeHead::Class`]) carry no arguments, since a
/// `TypeId` already tells `Vec<String>` apart from `Vec<u8>`. Wrapper heads
/// carry the types they wrap.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
  head: TypeHead,
  args: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
  /// Describes the leaf type `T`.
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      head: TypeHead::Class {
        id: TypeId::of::<T>(),
        name: std::any::type_name::<T>(),
      },
      args: Vec::new(),
    }
  }

  pub fn lazy(inner: TypeDescriptor) -> Self {
    Self::wrapper(TypeHead::Lazy, vec![inner])
  }

  pub fn provider(inner: TypeDescriptor) -> Self {
    Self::wrapper(TypeHead::Provider, vec![inner])
  }

  pub fn factory(argument: TypeDescriptor, inner: TypeDescriptor) -> Self {
    Self::wrapper(TypeHead::Factory, vec![argument, inner])
  }

  pub fn function0(inner: TypeDescriptor) -> Self {
    Self::wrapper(TypeHead::Function0, vec![inner])
  }

  pub fn function1(argument: TypeDescriptor, inner: TypeDescriptor) -> Self {
    Self::wrapper(TypeHead::Function1, vec![argument, inner])
  }

  fn wrapper(head: TypeHead, args: Vec<TypeDescriptor>) -> Self {
    Self { head, args }
  }

  pub fn head(&self) -> TypeHead {
    self.head
  }

  pub fn args(&self) -> &[TypeDescriptor] {
    &self.args
  }

  /// `true` when the head is a concrete type rather than a wrapper shape.
  pub fn is_leaf(&self) -> bool {
    matches!(self.head, TypeHead::Class { .. })
  }

  /// The `TypeId` of a leaf descriptor.
  pub fn type_id(&self) -> Option<TypeId> {
    match self.head {
      TypeHead::Class { id, .. } => Some(id),
      _ => None,
    }
  }
}

impl fmt::Display for TypeDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}", self.head)?;
    if let Some((first, rest)) = self.args.split_first() {
      write!(f, "<{}", first)?;
      for arg in rest {
        write!(f, ", {}", arg)?;
      }
      f.write_str(">")?;
    }
    Ok(())
  }
}

impl fmt::Debug for TypeDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeDescriptor({})", self)
  }
}
