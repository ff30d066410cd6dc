//! The `Container` struct, its registration API and the `Bindings` lookup trait.

use crate::core::{BindingKey, ResolutionGuard};
use crate::types::TypeDescriptor;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::sync::Arc;
use tracing::trace;

/// A zero-argument producer for a bound type.
pub type Producer<T> = Arc<dyn Fn() -> Arc<T> + Send + Sync>;

/// A one-argument producer for a bound type.
pub type ArgProducer<A, T> = Arc<dyn Fn(A) -> Arc<T> + Send + Sync>;

/// A type-erased [`Producer`] or [`ArgProducer`], as handed out by [`Bindings`].
pub type ErasedProducer = Arc<dyn Any + Send + Sync>;

/// Read access to a set of bindings.
///
/// This is the only view the [`Injector`](crate::Injector) has of a container.
/// Implementations must return a `Producer<T>` from `lookup` and an
/// `ArgProducer<A, T>` from `lookup_factory`, where `T` and `A` are the types
/// described by `bound` and `argument`.
pub trait Bindings: Send + Sync {
  fn lookup(&self, bound: &TypeDescriptor, tag: Option<&str>) -> Option<ErasedProducer>;

  fn lookup_factory(
    &self,
    bound: &TypeDescriptor,
    tag: Option<&str>,
    argument: &TypeDescriptor,
  ) -> Option<ErasedProducer>;
}

/// The binding container.
///
/// Registration goes through `&self` and is thread-safe, so a container can be
/// shared behind an `Arc` and filled from anywhere. The last registration for a
/// given type, name and argument type wins.
#[derive(Default)]
pub struct Container {
  bindings: DashMap<BindingKey, ErasedProducer>,
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn insert(&self, key: BindingKey, producer: ErasedProducer) {
    trace!(key = ?key, "registered binding");
    self.bindings.insert(key, producer);
  }

  fn add_instance_internal<T: Any + Send + Sync>(&self, name: Option<&str>, instance: T) {
    let instance = Arc::new(instance);
    let producer: Producer<T> = Arc::new(move || instance.clone());
    self.insert(BindingKey::of::<T>(name), Arc::new(producer));
  }

  fn add_singleton_internal<I: ?Sized + Any + Send + Sync>(
    &self,
    name: Option<&str>,
    factory: impl Fn() -> Arc<I> + Send + Sync + 'static,
  ) {
    let key = BindingKey::of::<I>(name);
    let guard_key = key.clone();
    let cell: OnceCell<Arc<I>> = OnceCell::new();
    let producer: Producer<I> = Arc::new(move || {
      // The guard must be taken before the cell: re-entering a cell that is
      // being initialised would deadlock instead of panicking.
      let _guard = ResolutionGuard::new(guard_key.clone());
      cell.get_or_init(&factory).clone()
    });
    self.insert(key, Arc::new(producer));
  }

  fn add_provider_internal<I: ?Sized + Any + Send + Sync>(
    &self,
    name: Option<&str>,
    factory: impl Fn() -> Arc<I> + Send + Sync + 'static,
  ) {
    let key = BindingKey::of::<I>(name);
    let guard_key = key.clone();
    let producer: Producer<I> = Arc::new(move || {
      let _guard = ResolutionGuard::new(guard_key.clone());
      factory()
    });
    self.insert(key, Arc::new(producer));
  }

  fn add_factory_internal<A: Any, T: Any + Send + Sync>(
    &self,
    name: Option<&str>,
    factory: impl Fn(A) -> T + Send + Sync + 'static,
  ) {
    let key = BindingKey::factory_of::<A, T>(name);
    let guard_key = key.clone();
    let producer: ArgProducer<A, T> = Arc::new(move |argument| {
      let _guard = ResolutionGuard::new(guard_key.clone());
      Arc::new(factory(argument))
    });
    self.insert(key, Arc::new(producer));
  }

  // --- PUBLIC API ---

  // --- Instance Registration ---
  pub fn add_instance<T: Any + Send + Sync>(&self, instance: T) {
    self.add_instance_internal(None, instance);
  }
  pub fn add_instance_with_name<T: Any + Send + Sync>(&self, name: &str, instance: T) {
    self.add_instance_internal(Some(name), instance);
  }

  // --- Singleton Registration ---
  pub fn add_singleton<T: Any + Send + Sync>(
    &self,
    factory: impl Fn() -> T + Send + Sync + 'static,
  ) {
    self.add_singleton_internal(None, move || Arc::new(factory()));
  }
  pub fn add_singleton_with_name<T: Any + Send + Sync>(
    &self,
    name: &str,
    factory: impl Fn() -> T + Send + Sync + 'static,
  ) {
    self.add_singleton_internal(Some(name), move || Arc::new(factory()));
  }

  // --- Provider Registration ---
  /// Registers a factory that is called on every resolution.
  pub fn add_provider<T: Any + Send + Sync>(
    &self,
    factory: impl Fn() -> T + Send + Sync + 'static,
  ) {
    self.add_provider_internal(None, move || Arc::new(factory()));
  }
  pub fn add_provider_with_name<T: Any + Send + Sync>(
    &self,
    name: &str,
    factory: impl Fn() -> T + Send + Sync + 'static,
  ) {
    self.add_provider_internal(Some(name), move || Arc::new(factory()));
  }

  // --- Factory Registration ---
  /// Registers a factory taking one argument of type `A`.
  pub fn add_factory<A: Any, T: Any + Send + Sync>(
    &self,
    factory: impl Fn(A) -> T + Send + Sync + 'static,
  ) {
    self.add_factory_internal(None, factory);
  }
  pub fn add_factory_with_name<A: Any, T: Any + Send + Sync>(
    &self,
    name: &str,
    factory: impl Fn(A) -> T + Send + Sync + 'static,
  ) {
    self.add_factory_internal(Some(name), factory);
  }

  // --- Trait Registration ---
  pub fn add_singleton_trait<I: ?Sized + Any + Send + Sync>(
    &self,
    factory: impl Fn() -> Arc<I> + Send + Sync + 'static,
  ) {
    self.add_singleton_internal(None, factory);
  }
  pub fn add_singleton_trait_with_name<I: ?Sized + Any + Send + Sync>(
    &self,
    name: &str,
    factory: impl Fn() -> Arc<I> + Send + Sync + 'static,
  ) {
    self.add_singleton_internal(Some(name), factory);
  }
  pub fn add_provider_trait<I: ?Sized + Any + Send + Sync>(
    &self,
    factory: impl Fn() -> Arc<I> + Send + Sync + 'static,
  ) {
    self.add_provider_internal(None, factory);
  }
  pub fn add_provider_trait_with_name<I: ?Sized + Any + Send + Sync>(
    &self,
    name: &str,
    factory: impl Fn() -> Arc<I> + Send + Sync + 'static,
  ) {
    self.add_provider_internal(Some(name), factory);
  }

  // --- Resolution ---
  /// Resolves a value from the container.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self, name: Option<&str>) -> Option<Arc<T>> {
    let producer = self.producer::<T>(name)?;
    Some(producer())
  }

  /// Returns the producer bound for `T`, without invoking it.
  pub fn producer<T: ?Sized + Any + Send + Sync>(&self, name: Option<&str>) -> Option<Producer<T>> {
    let key = BindingKey::of::<T>(name);
    // Clone the producer out so no map guard is held while it runs.
    let producer = self.bindings.get(&key)?.value().clone();
    (*producer).downcast_ref::<Producer<T>>().cloned()
  }

  /// Returns the one-argument producer bound for `T` with argument `A`.
  pub fn get_factory<A: Any, T: Any + Send + Sync>(
    &self,
    name: Option<&str>,
  ) -> Option<ArgProducer<A, T>> {
    let key = BindingKey::factory_of::<A, T>(name);
    let producer = self.bindings.get(&key)?.value().clone();
    (*producer).downcast_ref::<ArgProducer<A, T>>().cloned()
  }

  /// `true` when a zero-argument binding exists for `T` under `name`.
  pub fn contains<T: ?Sized + Any>(&self, name: Option<&str>) -> bool {
    self.bindings.contains_key(&BindingKey::of::<T>(name))
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }
}

impl Bindings for Container {
  fn lookup(&self, bound: &TypeDescriptor, tag: Option<&str>) -> Option<ErasedProducer> {
    let key = BindingKey::new(bound.clone(), tag);
    self.bindings.get(&key).map(|entry| entry.value().clone())
  }

  fn lookup_factory(
    &self,
    bound: &TypeDescriptor,
    tag: Option<&str>,
    argument: &TypeDescriptor,
  ) -> Option<ErasedProducer> {
    let key = BindingKey::new(bound.clone(), tag).with_argument(argument.clone());
    self.bindings.get(&key).map(|entry| entry.value().clone())
  }
}
