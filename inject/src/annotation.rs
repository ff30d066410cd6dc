//! The marker vocabulary attached to fields, methods, constructors and parameters.

/// A single annotation on a member or parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
  /// Flags a field, method or constructor as an injection target.
  Inject,
  /// Selects the binding registered under this literal name.
  Named(String),
  /// A custom qualifier. `name` identifies the qualifier kind (and its tag rule),
  /// `value` is its single attribute.
  Qualifier { name: String, value: String },
  /// Resolves to an absent value instead of failing when no binding exists.
  Optional,
  /// Marks a bare zero-argument callable as a provider.
  RawProvider,
  /// Marks a bare one-argument callable as a factory.
  RawFactory,
  /// Any other annotation. Ignored by the injector.
  Other(String),
}

impl Annotation {
  /// `true` for annotations that select a binding tag.
  pub fn is_qualifier(&self) -> bool {
    matches!(self, Annotation::Named(_) | Annotation::Qualifier { .. })
  }
}

/// An ordered set of annotations, built fluently.
///
/// ```
/// use fibre_inject::{Annotation, Annotations};
///
/// let marks = Annotations::inject().named("lastname").optional();
/// assert!(marks.is_inject());
/// assert!(marks.contains(&Annotation::Optional));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
  items: Vec<Annotation>,
}

impl Annotations {
  /// An empty set.
  pub fn new() -> Self {
    Self::default()
  }

  /// A set holding only the inject marker.
  pub fn inject() -> Self {
    Self::new().with(Annotation::Inject)
  }

  pub fn with(mut self, annotation: Annotation) -> Self {
    self.items.push(annotation);
    self
  }

  pub fn named(self, name: impl Into<String>) -> Self {
    self.with(Annotation::Named(name.into()))
  }

  pub fn qualifier(self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.with(Annotation::Qualifier {
      name: name.into(),
      value: value.into(),
    })
  }

  pub fn optional(self) -> Self {
    self.with(Annotation::Optional)
  }

  pub fn raw_provider(self) -> Self {
    self.with(Annotation::RawProvider)
  }

  pub fn raw_factory(self) -> Self {
    self.with(Annotation::RawFactory)
  }

  pub fn contains(&self, annotation: &Annotation) -> bool {
    self.items.contains(annotation)
  }

  pub fn is_inject(&self) -> bool {
    self.contains(&Annotation::Inject)
  }

  pub fn is_optional(&self) -> bool {
    self.contains(&Annotation::Optional)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
    self.items.iter()
  }
}

impl FromIterator<Annotation> for Annotations {
  fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
    Self {
      items: iter.into_iter().collect(),
    }
  }
}
