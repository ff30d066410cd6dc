//! The injection engine.

use crate::config::InjectorConfig;
use crate::container::Bindings;
use crate::descriptor::{ArgMaker, Arguments, ClassDescriptor, Injectable};
use crate::error::InjectError;
use crate::point::{InjectionPoint, MemberRef};
use crate::qualifier::QualifierRegistry;
use crate::resolver;
use crate::scanner::{scan_constructor, scan_members, ConstructorPlan, MemberPlan, ParamPlan};
use dashmap::DashMap;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

type ErasedPlan = Arc<dyn Any + Send + Sync>;

/// Injects fields, methods and constructors of [`Injectable`] types from a set
/// of [`Bindings`].
///
/// An `Injector` holds no bindings itself. It can be shared between threads and
/// used against any number of containers.
///
/// ```
/// use fibre_inject::{Annotations, ClassDescriptor, Container, Injectable, Injector};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Person {
///   firstname: Option<Arc<String>>,
/// }
///
/// impl Injectable for Person {
///   fn describe(class: &mut ClassDescriptor<Self>) {
///     class.field("firstname", Annotations::inject(), |p: &mut Person, v: Arc<String>| {
///       p.firstname = Some(v)
///     });
///   }
/// }
///
/// let container = Container::new();
/// container.add_instance(String::from("Salomon"));
///
/// let mut person = Person::default();
/// Injector::new().inject(&mut person, &container).unwrap();
/// assert_eq!(person.firstname.as_deref().map(String::as_str), Some("Salomon"));
/// ```
pub struct Injector {
  config: InjectorConfig,
  qualifiers: QualifierRegistry,
  members: DashMap<TypeId, ErasedPlan>,
  constructors: DashMap<TypeId, ErasedPlan>,
}

impl Injector {
  /// An injector with the default configuration and no custom qualifier rules.
  pub fn new() -> Self {
    Self::builder().build()
  }

  pub fn builder() -> InjectorBuilder {
    InjectorBuilder::default()
  }

  pub fn with_config(config: InjectorConfig) -> Self {
    Self::builder().config(config).build()
  }

  pub fn config(&self) -> &InjectorConfig {
    &self.config
  }

  pub fn qualifiers(&self) -> &QualifierRegistry {
    &self.qualifiers
  }

  // --- PRIVATE HELPERS ---

  fn plan<P: Send + Sync + 'static>(
    &self,
    cache: &DashMap<TypeId, ErasedPlan>,
    id: TypeId,
    scan: impl FnOnce() -> Result<P, InjectError>,
  ) -> Result<Arc<P>, InjectError> {
    if self.config.cache_scans {
      if let Some(cached) = cache.get(&id) {
        if let Ok(plan) = cached.value().clone().downcast::<P>() {
          trace!(plan = type_name::<P>(), "scan cache hit");
          return Ok(plan);
        }
      }
    }
    let plan = Arc::new(scan()?);
    if self.config.cache_scans {
      cache.insert(id, plan.clone());
    }
    Ok(plan)
  }

  fn member_plan<T: Injectable>(&self) -> Result<Arc<MemberPlan<T>>, InjectError> {
    self.plan(&self.members, TypeId::of::<T>(), || {
      let class = ClassDescriptor::<T>::describe();
      let plan = scan_members(&class, &self.qualifiers)?;
      let methods: Vec<&str> = plan.methods.iter().map(|method| method.member.member).collect();
      debug!(
        class = class.name(),
        fields = plan.fields.len(),
        methods = ?methods,
        "scanned injectable members"
      );
      Ok(plan)
    })
  }

  fn constructor_plan<T: Injectable>(&self) -> Result<Arc<ConstructorPlan<T>>, InjectError> {
    self.plan(&self.constructors, TypeId::of::<T>(), || {
      let class = ClassDescriptor::<T>::describe();
      let plan = scan_constructor(&class, &self.qualifiers)?;
      debug!(
        class = class.name(),
        constructor = plan.member.member,
        params = plan.params.len(),
        "scanned constructor"
      );
      Ok(plan)
    })
  }

  // --- PUBLIC API ---

  /// Injects the inject-marked fields of `target`, then calls its
  /// inject-marked method and those of the values it includes.
  ///
  /// Every point is resolved before anything is written, so a failed
  /// resolution leaves `target` untouched.
  pub fn inject<T: Injectable>(&self, target: &mut T, bindings: &dyn Bindings) -> Result<(), InjectError> {
    let plan = self.member_plan::<T>()?;

    let mut assignments = Vec::with_capacity(plan.fields.len());
    for field in &plan.fields {
      let resolved = resolver::resolve(bindings, &field.point)?;
      assignments.push((field.prepare)(resolved, &field.point)?);
    }
    let mut calls = Vec::with_capacity(plan.methods.len());
    for method in &plan.methods {
      calls.push((method, prepare_arguments(&method.params, bindings)?));
    }

    debug!(class = type_name::<T>(), fields = assignments.len(), "injecting members");
    for assign in assignments {
      assign(&mut *target);
    }
    for (method, makers) in calls {
      let mut arguments = build_arguments(&method.member, &method.params, makers);
      (method.body)(&mut *target, &mut arguments)?;
    }
    Ok(())
  }

  /// Builds a `T` through its constructor.
  ///
  /// Only the constructor is injected; use [`Injector::new_instance_and_inject`]
  /// to inject members as well.
  pub fn new_instance<T: Injectable>(&self, bindings: &dyn Bindings) -> Result<T, InjectError> {
    let plan = self.constructor_plan::<T>()?;
    let makers = prepare_arguments(&plan.params, bindings)?;
    debug!(class = type_name::<T>(), constructor = plan.member.member, "constructing instance");
    let mut arguments = build_arguments(&plan.member, &plan.params, makers);
    (plan.body)(&mut arguments)
  }

  /// Builds a `T` through its constructor, then injects its members.
  pub fn new_instance_and_inject<T: Injectable>(&self, bindings: &dyn Bindings) -> Result<T, InjectError> {
    let mut instance = self.new_instance::<T>(bindings)?;
    self.inject(&mut instance, bindings)?;
    Ok(instance)
  }

  /// The field and method points [`Injector::inject`] would resolve for `T`.
  pub fn injection_points<T: Injectable>(&self) -> Result<Vec<InjectionPoint>, InjectError> {
    Ok(self.member_plan::<T>()?.points())
  }

  /// The parameter points of the constructor [`Injector::new_instance`] would use.
  pub fn constructor_points<T: Injectable>(&self) -> Result<Vec<InjectionPoint>, InjectError> {
    Ok(self.constructor_plan::<T>()?.points())
  }
}

impl Default for Injector {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for Injector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Injector")
      .field("config", &self.config)
      .field("qualifiers", &self.qualifiers)
      .field("cached_members", &self.members.len())
      .field("cached_constructors", &self.constructors.len())
      .finish()
  }
}

fn prepare_arguments(params: &[ParamPlan], bindings: &dyn Bindings) -> Result<Vec<ArgMaker>, InjectError> {
  params
    .iter()
    .map(|param| {
      let resolved = resolver::resolve(bindings, &param.point)?;
      (param.prepare)(resolved, &param.point)
    })
    .collect()
}

fn build_arguments(member: &MemberRef, params: &[ParamPlan], makers: Vec<ArgMaker>) -> Arguments {
  let mut arguments = Arguments::new(member.to_string());
  for (param, make) in params.iter().zip(makers) {
    arguments.push(&param.point, make());
  }
  arguments
}

/// Builds an [`Injector`].
#[derive(Default)]
pub struct InjectorBuilder {
  config: InjectorConfig,
  qualifiers: QualifierRegistry,
}

impl InjectorBuilder {
  /// Replaces the configuration. Qualifier rules from `config` are applied
  /// before rules added with [`InjectorBuilder::qualifier`].
  pub fn config(mut self, config: InjectorConfig) -> Self {
    self.config = config;
    self
  }

  pub fn cache_scans(mut self, enabled: bool) -> Self {
    self.config.cache_scans = enabled;
    self
  }

  /// Registers the tag rule of the custom qualifier `name`.
  pub fn qualifier(
    mut self,
    name: impl Into<String>,
    rule: impl Fn(&str) -> String + Send + Sync + 'static,
  ) -> Self {
    self.qualifiers.register(name, rule);
    self
  }

  pub fn build(self) -> Injector {
    let mut qualifiers = QualifierRegistry::new();
    for (name, rule) in &self.config.qualifiers {
      qualifiers.register_rule(name.clone(), rule.clone());
    }
    qualifiers.extend(self.qualifiers);
    debug!(
      cache_scans = self.config.cache_scans,
      qualifiers = qualifiers.len(),
      "built injector"
    );
    Injector {
      config: self.config,
      qualifiers,
      members: DashMap::new(),
      constructors: DashMap::new(),
    }
  }
}
