//! Resolved values and the wrapper types handed to injection points.

use crate::container::{ArgProducer, ErasedProducer, Producer};
use crate::error::InjectError;
use crate::point::InjectionPoint;
use crate::resolver;
use crate::types::TypeDescriptor;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A re-invocable constructor of an injected value.
pub type Maker<V> = Arc<dyn Fn() -> V + Send + Sync>;

/// A bare zero-argument callable, injectable with the raw provider marker.
pub type ProviderFn<L> = Box<dyn Fn() -> L + Send + Sync>;

/// A bare one-argument callable, injectable with the raw factory marker.
pub type FactoryFn<A, L> = Box<dyn Fn(A) -> L + Send + Sync>;

/// The erased value resolved for a point, shaped after its wrapper signature.
///
/// Producers are `None` only for optional points without a binding.
pub enum Resolved {
  Value(Option<ErasedProducer>),
  Provider(Option<ErasedProducer>),
  Factory(Option<ErasedProducer>),
  Lazy(Box<Resolved>),
}

impl Resolved {
  fn shape(&self) -> String {
    match self {
      Resolved::Value(_) => "a plain value".to_string(),
      Resolved::Provider(_) => "a provider".to_string(),
      Resolved::Factory(_) => "a factory".to_string(),
      Resolved::Lazy(inner) => format!("a lazy {}", inner.shape().trim_start_matches("a ")),
    }
  }
}

impl fmt::Debug for Resolved {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.shape())
  }
}

/// The innermost value type of a point: `Arc<T>`, or `Option<Arc<T>>` when the
/// point may resolve to nothing.
pub trait Leaf: Sized + Send + Sync + 'static {
  type Bound: ?Sized + Any + Send + Sync;

  fn present(value: Arc<Self::Bound>) -> Self;

  /// A maker for the absent value, if this type can represent absence.
  fn absent() -> Option<Maker<Self>>;

  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::of::<Self::Bound>()
  }
}

impl<T: ?Sized + Any + Send + Sync> Leaf for Arc<T> {
  type Bound = T;

  fn present(value: Arc<T>) -> Self {
    value
  }

  fn absent() -> Option<Maker<Self>> {
    None
  }
}

impl<T: ?Sized + Any + Send + Sync> Leaf for Option<Arc<T>> {
  type Bound = T;

  fn present(value: Arc<T>) -> Self {
    Some(value)
  }

  fn absent() -> Option<Maker<Self>> {
    Some(Arc::new(|| None))
  }
}

/// A Rust type that can receive an injected value.
///
/// `descriptor` gives the shape the scanner unwraps; `prepare` turns the
/// resolved producers into a maker of the final value. All type checks happen in
/// `prepare`, so calling the maker never fails.
pub trait Injected: Sized + Send + Sync + 'static {
  fn descriptor() -> TypeDescriptor;

  /// Whether the innermost value can be absent. Optional points require it.
  fn accepts_absent() -> bool;

  fn prepare(resolved: Resolved, point: &InjectionPoint) -> Result<Maker<Self>, InjectError>;
}

fn shape_mismatch<V: Injected>(resolved: &Resolved, point: &InjectionPoint) -> InjectError {
  InjectError::TypeMismatch {
    point: point.to_string(),
    expected: V::descriptor().to_string(),
    found: resolved.shape(),
  }
}

fn downcast<P: Clone + 'static>(erased: &ErasedProducer, point: &InjectionPoint) -> Result<P, InjectError> {
  (**erased)
    .downcast_ref::<P>()
    .cloned()
    .ok_or_else(|| InjectError::TypeMismatch {
      point: point.to_string(),
      expected: type_name::<P>().to_string(),
      found: "a producer of another type".to_string(),
    })
}

fn leaf_maker<L: Leaf>(producer: Option<ErasedProducer>, point: &InjectionPoint) -> Result<Maker<L>, InjectError> {
  match producer {
    Some(erased) => {
      let producer = downcast::<Producer<L::Bound>>(&erased, point)?;
      Ok(Arc::new(move || L::present(producer())))
    }
    None => L::absent().ok_or_else(|| resolver::unresolved(point)),
  }
}

fn factory_call<A: Any, L: Leaf>(
  producer: Option<ErasedProducer>,
  point: &InjectionPoint,
) -> Result<Arc<dyn Fn(A) -> L + Send + Sync>, InjectError> {
  match producer {
    Some(erased) => {
      let producer = downcast::<ArgProducer<A, L::Bound>>(&erased, point)?;
      Ok(Arc::new(move |argument: A| L::present(producer(argument))))
    }
    None => {
      let absent = L::absent().ok_or_else(|| resolver::unresolved(point))?;
      Ok(Arc::new(move |_: A| absent()))
    }
  }
}

impl<T: ?Sized + Any + Send + Sync> Injected for Arc<T> {
  fn descriptor() -> TypeDescriptor {
    <Self as Leaf>::descriptor()
  }

  fn accepts_absent() -> bool {
    false
  }

  fn prepare(resolved: Resolved, point: &InjectionPoint) -> Result<Maker<Self>, InjectError> {
    match resolved {
      Resolved::Value(producer) => leaf_maker::<Self>(producer, point),
      other => Err(shape_mismatch::<Self>(&other, point)),
    }
  }
}

impl<T: ?Sized + Any + Send + Sync> Injected for Option<Arc<T>> {
  fn descriptor() -> TypeDescriptor {
    <Self as Leaf>::descriptor()
  }

  fn accepts_absent() -> bool {
    true
  }

  fn prepare(resolved: Resolved, point: &InjectionPoint) -> Result<Maker<Self>, InjectError> {
    match resolved {
      Resolved::Value(producer) => leaf_maker::<Self>(producer, point),
      other => Err(shape_mismatch::<Self>(&other, point)),
    }
  }
}

type LazyCell<V> = once_cell::sync::Lazy<V, Box<dyn FnOnce() -> V + Send>>;

/// A value computed on first access and cached afterwards.
///
/// Evaluation runs at most once, even when several threads race on the first
/// access. Clones share the same cell.
pub struct Lazy<V> {
  cell: Arc<LazyCell<V>>,
}

impl<V> Lazy<V> {
  pub fn new(init: impl FnOnce() -> V + Send + 'static) -> Self {
    Self {
      cell: Arc::new(LazyCell::new(Box::new(init))),
    }
  }

  /// Forces evaluation and returns the cached value.
  pub fn get(&self) -> &V {
    LazyCell::force(&self.cell)
  }

  pub fn is_evaluated(&self) -> bool {
    LazyCell::get(&self.cell).is_some()
  }
}

impl<V> Clone for Lazy<V> {
  fn clone(&self) -> Self {
    Self {
      cell: self.cell.clone(),
    }
  }
}

impl<V: fmt::Debug> fmt::Debug for Lazy<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match LazyCell::get(&self.cell) {
      Some(value) => f.debug_tuple("Lazy").field(value).finish(),
      None => f.write_str("Lazy(<unevaluated>)"),
    }
  }
}

impl<V: Injected> Injected for Lazy<V> {
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::lazy(V::descriptor())
  }

  fn accepts_absent() -> bool {
    V::accepts_absent()
  }

  fn prepare(resolved: Resolved, point: &InjectionPoint) -> Result<Maker<Self>, InjectError> {
    match resolved {
      Resolved::Lazy(inner) => {
        let make = V::prepare(*inner, point)?;
        Ok(Arc::new(move || {
          let make = make.clone();
          Lazy::new(move || make())
        }))
      }
      other => Err(shape_mismatch::<Self>(&other, point)),
    }
  }
}

/// A handle that produces a fresh value from its binding on every call.
pub struct Provider<L> {
  make: Maker<L>,
}

impl<L: Leaf> Provider<L> {
  pub fn new(make: impl Fn() -> L + Send + Sync + 'static) -> Self {
    Self { make: Arc::new(make) }
  }

  pub fn get(&self) -> L {
    (self.make)()
  }
}

impl<L> Clone for Provider<L> {
  fn clone(&self) -> Self {
    Self {
      make: self.make.clone(),
    }
  }
}

impl<L> fmt::Debug for Provider<L> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Provider<{}>", type_name::<L>())
  }
}

impl<L: Leaf> Injected for Provider<L> {
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::provider(L::descriptor())
  }

  fn accepts_absent() -> bool {
    L::absent().is_some()
  }

  fn prepare(resolved: Resolved, point: &InjectionPoint) -> Result<Maker<Self>, InjectError> {
    match resolved {
      Resolved::Provider(producer) => {
        let make = leaf_maker::<L>(producer, point)?;
        Ok(Arc::new(move || Provider { make: make.clone() }))
      }
      other => Err(shape_mismatch::<Self>(&other, point)),
    }
  }
}

/// A handle that calls its binding's factory with an argument on every call.
pub struct Factory<A, L> {
  call: Arc<dyn Fn(A) -> L + Send + Sync>,
}

impl<A: Any, L: Leaf> Factory<A, L> {
  pub fn new(call: impl Fn(A) -> L + Send + Sync + 'static) -> Self {
    Self { call: Arc::new(call) }
  }

  pub fn call(&self, argument: A) -> L {
    (self.call)(argument)
  }
}

impl<A, L> Clone for Factory<A, L> {
  fn clone(&self) -> Self {
    Self {
      call: self.call.clone(),
    }
  }
}

impl<A, L> fmt::Debug for Factory<A, L> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Factory<{}, {}>", type_name::<A>(), type_name::<L>())
  }
}

impl<A: Any, L: Leaf> Injected for Factory<A, L> {
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::factory(TypeDescriptor::of::<A>(), L::descriptor())
  }

  fn accepts_absent() -> bool {
    L::absent().is_some()
  }

  fn prepare(resolved: Resolved, point: &InjectionPoint) -> Result<Maker<Self>, InjectError> {
    match resolved {
      Resolved::Factory(producer) => {
        let call = factory_call::<A, L>(producer, point)?;
        Ok(Arc::new(move || Factory { call: call.clone() }))
      }
      other => Err(shape_mismatch::<Self>(&other, point)),
    }
  }
}

impl<L: Leaf> Injected for Box<dyn Fn() -> L + Send + Sync> {
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::function0(L::descriptor())
  }

  fn accepts_absent() -> bool {
    L::absent().is_some()
  }

  fn prepare(resolved: Resolved, point: &InjectionPoint) -> Result<Maker<Self>, InjectError> {
    match resolved {
      Resolved::Provider(producer) => {
        let make = leaf_maker::<L>(producer, point)?;
        Ok(Arc::new(move || {
          let make = make.clone();
          Box::new(move || make()) as ProviderFn<L>
        }))
      }
      other => Err(shape_mismatch::<Self>(&other, point)),
    }
  }
}

impl<A: Any, L: Leaf> Injected for Box<dyn Fn(A) -> L + Send + Sync> {
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::function1(TypeDescriptor::of::<A>(), L::descriptor())
  }

  fn accepts_absent() -> bool {
    L::absent().is_some()
  }

  fn prepare(resolved: Resolved, point: &InjectionPoint) -> Result<Maker<Self>, InjectError> {
    match resolved {
      Resolved::Factory(producer) => {
        let call = factory_call::<A, L>(producer, point)?;
        Ok(Arc::new(move || {
          let call = call.clone();
          Box::new(move |argument: A| call(argument)) as FactoryFn<A, L>
        }))
      }
      other => Err(shape_mismatch::<Self>(&other, point)),
    }
  }
}
