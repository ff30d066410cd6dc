//! Class descriptors: the declared members of an injectable type.
//!
//! Rust has no runtime reflection, so every injectable type lists its fields,
//! methods and constructors once, in [`Injectable::describe`]. Each member
//! carries its annotations and a typed accessor; the member's Rust type
//! supplies the [`TypeDescriptor`] the scanner unwraps.

use crate::annotation::{Annotation, Annotations};
use crate::error::InjectError;
use crate::point::InjectionPoint;
use crate::types::TypeDescriptor;
use crate::value::{Injected, Resolved};
use std::any::{type_name, Any};
use std::mem;
use std::sync::Arc;

/// A type whose members can be injected.
///
/// ```
/// use fibre_inject::{Annotations, ClassDescriptor, Injectable};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Greeter {
///   greeting: Option<Arc<String>>,
/// }
///
/// impl Injectable for Greeter {
///   fn describe(class: &mut ClassDescriptor<Self>) {
///     class.field("greeting", Annotations::inject(), |g: &mut Greeter, v: Arc<String>| {
///       g.greeting = Some(v)
///     });
///   }
/// }
/// ```
pub trait Injectable: Sized + Send + 'static {
  fn describe(class: &mut ClassDescriptor<Self>);
}

pub(crate) type Assign<T> = Box<dyn FnOnce(&mut T) + Send>;
pub(crate) type PrepareField<T> =
  Arc<dyn Fn(Resolved, &InjectionPoint) -> Result<Assign<T>, InjectError> + Send + Sync>;

pub(crate) type ArgValue = Box<dyn Any + Send>;
pub(crate) type ArgMaker = Box<dyn FnOnce() -> ArgValue + Send>;
pub(crate) type PrepareArg = Arc<dyn Fn(Resolved, &InjectionPoint) -> Result<ArgMaker, InjectError> + Send + Sync>;

pub(crate) type MethodBody<T> = Arc<dyn Fn(&mut T, &mut Arguments) -> Result<(), InjectError> + Send + Sync>;
pub(crate) type ConstructorBody<T> = Arc<dyn Fn(&mut Arguments) -> Result<T, InjectError> + Send + Sync>;

pub(crate) struct FieldDecl<T> {
  /// Set for members folded in from an embedded value.
  pub(crate) owner: Option<&'static str>,
  pub(crate) name: &'static str,
  pub(crate) annotations: Annotations,
  pub(crate) declared: TypeDescriptor,
  pub(crate) accepts_absent: bool,
  pub(crate) prepare: PrepareField<T>,
}

pub(crate) struct MethodDecl<T> {
  pub(crate) owner: Option<&'static str>,
  pub(crate) name: &'static str,
  pub(crate) annotations: Annotations,
  pub(crate) params: Vec<Param>,
  pub(crate) body: MethodBody<T>,
}

pub(crate) struct ConstructorDecl<T> {
  pub(crate) name: &'static str,
  pub(crate) annotations: Annotations,
  pub(crate) params: Vec<Param>,
  pub(crate) body: ConstructorBody<T>,
}

/// A declared method or constructor parameter.
pub struct Param {
  pub(crate) annotations: Annotations,
  pub(crate) declared: TypeDescriptor,
  pub(crate) accepts_absent: bool,
  pub(crate) prepare: PrepareArg,
}

impl Param {
  /// A parameter of Rust type `V`.
  pub fn of<V: Injected>() -> Self {
    let prepare: PrepareArg = Arc::new(|resolved: Resolved, point: &InjectionPoint| -> Result<ArgMaker, InjectError> {
      let make = V::prepare(resolved, point)?;
      Ok(Box::new(move || Box::new(make()) as ArgValue) as ArgMaker)
    });
    Self {
      annotations: Annotations::new(),
      declared: V::descriptor(),
      accepts_absent: V::accepts_absent(),
      prepare,
    }
  }

  pub fn annotated(mut self, annotation: Annotation) -> Self {
    self.annotations = mem::take(&mut self.annotations).with(annotation);
    self
  }

  pub fn named(self, name: impl Into<String>) -> Self {
    self.annotated(Annotation::Named(name.into()))
  }

  pub fn qualifier(self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.annotated(Annotation::Qualifier {
      name: name.into(),
      value: value.into(),
    })
  }

  pub fn optional(self) -> Self {
    self.annotated(Annotation::Optional)
  }

  pub fn raw_provider(self) -> Self {
    self.annotated(Annotation::RawProvider)
  }

  pub fn raw_factory(self) -> Self {
    self.annotated(Annotation::RawFactory)
  }

  pub fn declared(&self) -> &TypeDescriptor {
    &self.declared
  }

  pub fn annotations(&self) -> &Annotations {
    &self.annotations
  }
}

/// The declared members of `T`, filled in by [`Injectable::describe`].
///
/// Members are kept in declaration order. Members without the inject marker
/// are recorded but never injected.
pub struct ClassDescriptor<T> {
  pub(crate) name: &'static str,
  pub(crate) fields: Vec<FieldDecl<T>>,
  pub(crate) methods: Vec<MethodDecl<T>>,
  pub(crate) constructors: Vec<ConstructorDecl<T>>,
}

impl<T: Injectable> ClassDescriptor<T> {
  pub(crate) fn describe() -> Self {
    let mut class = Self {
      name: type_name::<T>(),
      fields: Vec::new(),
      methods: Vec::new(),
      constructors: Vec::new(),
    };
    T::describe(&mut class);
    class
  }

  /// Overrides the name used in diagnostics. Defaults to the type name.
  pub fn rename(&mut self, name: &'static str) -> &mut Self {
    self.name = name;
    self
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  /// Declares a field of Rust type `V`, written through `set`.
  pub fn field<V: Injected>(
    &mut self,
    name: &'static str,
    annotations: Annotations,
    set: impl Fn(&mut T, V) + Send + Sync + 'static,
  ) -> &mut Self {
    let set = Arc::new(set);
    let prepare: PrepareField<T> = Arc::new(
      move |resolved: Resolved, point: &InjectionPoint| -> Result<Assign<T>, InjectError> {
        let make = V::prepare(resolved, point)?;
        let set = set.clone();
        Ok(Box::new(move |target: &mut T| set(target, make())) as Assign<T>)
      },
    );
    self.fields.push(FieldDecl {
      owner: None,
      name,
      annotations,
      declared: V::descriptor(),
      accepts_absent: V::accepts_absent(),
      prepare,
    });
    self
  }

  /// Declares a method. `body` reads its parameters from [`Arguments`] in order.
  pub fn method(
    &mut self,
    name: &'static str,
    annotations: Annotations,
    params: impl IntoIterator<Item = Param>,
    body: impl Fn(&mut T, &mut Arguments) -> Result<(), InjectError> + Send + Sync + 'static,
  ) -> &mut Self {
    self.methods.push(MethodDecl {
      owner: None,
      name,
      annotations,
      params: params.into_iter().collect(),
      body: Arc::new(body),
    });
    self
  }

  /// Folds in the fields and methods of an embedded `P`, reached through
  /// `embedded`. Their points are reported under `P`'s name, and `P` keeps its
  /// own single inject-marked method. Constructors of `P` are not included.
  ///
  /// ```
  /// use fibre_inject::{Annotations, ClassDescriptor, Injectable};
  /// use std::sync::Arc;
  ///
  /// #[derive(Default)]
  /// struct Audit {
  ///   user: Option<Arc<String>>,
  /// }
  ///
  /// impl Injectable for Audit {
  ///   fn describe(class: &mut ClassDescriptor<Self>) {
  ///     class.field("user", Annotations::inject(), |a: &mut Audit, v: Arc<String>| a.user = Some(v));
  ///   }
  /// }
  ///
  /// #[derive(Default)]
  /// struct Handler {
  ///   audit: Audit,
  /// }
  ///
  /// impl Injectable for Handler {
  ///   fn describe(class: &mut ClassDescriptor<Self>) {
  ///     class.include(|h: &mut Handler| &mut h.audit);
  ///   }
  /// }
  /// ```
  pub fn include<P: Injectable>(&mut self, embedded: fn(&mut T) -> &mut P) -> &mut Self {
    let inner = ClassDescriptor::<P>::describe();
    let owner = inner.name;
    for field in inner.fields {
      let prepare_inner = field.prepare;
      let prepare: PrepareField<T> = Arc::new(
        move |resolved: Resolved, point: &InjectionPoint| -> Result<Assign<T>, InjectError> {
          let assign = prepare_inner(resolved, point)?;
          Ok(Box::new(move |target: &mut T| assign(embedded(target))) as Assign<T>)
        },
      );
      self.fields.push(FieldDecl {
        owner: Some(field.owner.unwrap_or(owner)),
        name: field.name,
        annotations: field.annotations,
        declared: field.declared,
        accepts_absent: field.accepts_absent,
        prepare,
      });
    }
    for method in inner.methods {
      let body = method.body;
      self.methods.push(MethodDecl {
        owner: Some(method.owner.unwrap_or(owner)),
        name: method.name,
        annotations: method.annotations,
        params: method.params,
        body: Arc::new(move |target: &mut T, arguments: &mut Arguments| body(embedded(target), arguments)),
      });
    }
    self
  }

  /// Declares a constructor. `body` reads its parameters from [`Arguments`] in
  /// order and builds the value.
  pub fn constructor(
    &mut self,
    name: &'static str,
    annotations: Annotations,
    params: impl IntoIterator<Item = Param>,
    body: impl Fn(&mut Arguments) -> Result<T, InjectError> + Send + Sync + 'static,
  ) -> &mut Self {
    self.constructors.push(ConstructorDecl {
      name,
      annotations,
      params: params.into_iter().collect(),
      body: Arc::new(body),
    });
    self
  }
}

struct Slot {
  point: String,
  declared: TypeDescriptor,
  value: Option<ArgValue>,
}

/// The resolved arguments of one method or constructor call.
///
/// Values are read front to back with [`Arguments::next`].
pub struct Arguments {
  member: String,
  slots: Vec<Slot>,
  cursor: usize,
}

impl Arguments {
  pub(crate) fn new(member: String) -> Self {
    Self {
      member,
      slots: Vec::new(),
      cursor: 0,
    }
  }

  pub(crate) fn push(&mut self, point: &InjectionPoint, value: ArgValue) {
    self.slots.push(Slot {
      point: point.to_string(),
      declared: point.declared.clone(),
      value: Some(value),
    });
  }

  /// Takes the next argument as a `V`.
  ///
  /// Fails with `TypeMismatch` when `V` is not the declared parameter type and
  /// with `MissingArgument` when every argument has been read.
  pub fn next<V: Injected>(&mut self) -> Result<V, InjectError> {
    let index = self.cursor;
    let missing = || InjectError::MissingArgument {
      member: self.member.clone(),
      index,
    };
    let slot = match self.slots.get_mut(index) {
      Some(slot) => slot,
      None => return Err(missing()),
    };
    let expected = V::descriptor();
    if slot.declared != expected {
      return Err(InjectError::TypeMismatch {
        point: slot.point.clone(),
        expected: slot.declared.to_string(),
        found: expected.to_string(),
      });
    }
    let value = slot.value.take().ok_or_else(missing)?;
    self.cursor += 1;
    value
      .downcast::<V>()
      .map(|value| *value)
      .map_err(|_| InjectError::TypeMismatch {
        point: slot.point.clone(),
        expected: slot.declared.to_string(),
        found: type_name::<V>().to_string(),
      })
  }

  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  /// Arguments not read yet.
  pub fn remaining(&self) -> usize {
    self.slots.len() - self.cursor
  }
}
