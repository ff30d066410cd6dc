//! Tag extraction from a point's annotations.

use crate::annotation::{Annotation, Annotations};
use crate::config::QualifierRule;
use crate::error::InjectError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type TagFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Maps custom qualifier names to the function that turns their value into a tag.
///
/// Qualifiers without a registered rule use their value as the tag.
#[derive(Clone, Default)]
pub struct QualifierRegistry {
  rules: HashMap<String, TagFn>,
}

impl QualifierRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(&mut self, name: impl Into<String>, rule: impl Fn(&str) -> String + Send + Sync + 'static) {
    self.rules.insert(name.into(), Arc::new(rule));
  }

  pub(crate) fn register_rule(&mut self, name: impl Into<String>, rule: QualifierRule) {
    self.register(name, move |value| rule.apply(value));
  }

  /// Adds every rule of `other`, replacing rules with the same name.
  pub(crate) fn extend(&mut self, other: QualifierRegistry) {
    self.rules.extend(other.rules);
  }

  /// Applies the rule registered for `name` to `value`.
  pub fn tag_for(&self, name: &str, value: &str) -> String {
    match self.rules.get(name) {
      Some(rule) => rule(value),
      None => value.to_owned(),
    }
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }
}

impl fmt::Debug for QualifierRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.rules.keys()).finish()
  }
}

/// Determines the binding tag of a point.
///
/// A single `Named` annotation yields its name, a single custom qualifier yields
/// its value passed through the registry. No qualifier means no tag; two or more
/// is an `AmbiguousQualifier` error.
pub fn extract_tag(
  annotations: &Annotations,
  registry: &QualifierRegistry,
  point: &dyn fmt::Display,
) -> Result<Option<String>, InjectError> {
  let mut qualifiers = annotations.iter().filter(|a| a.is_qualifier());
  let first = match qualifiers.next() {
    Some(first) => first,
    None => return Ok(None),
  };
  if qualifiers.next().is_some() {
    return Err(InjectError::AmbiguousQualifier {
      point: point.to_string(),
    });
  }
  let tag = match first {
    Annotation::Named(name) => name.clone(),
    Annotation::Qualifier { name, value } => registry.tag_for(name, value),
    _ => return Ok(None),
  };
  Ok(Some(tag))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn named_and_custom_qualifiers() {
    let mut registry = QualifierRegistry::new();
    registry.register("UniversePrefix", |v| format!("universe:{}", v));

    let named = Annotations::inject().named("lastname").optional();
    assert_eq!(extract_tag(&named, &registry, &"p").unwrap().as_deref(), Some("lastname"));

    let custom = Annotations::inject().qualifier("UniversePrefix", "answer");
    assert_eq!(
      extract_tag(&custom, &registry, &"p").unwrap().as_deref(),
      Some("universe:answer")
    );

    let unregistered = Annotations::new().qualifier("Env", "prod");
    assert_eq!(extract_tag(&unregistered, &registry, &"p").unwrap().as_deref(), Some("prod"));

    let untagged = Annotations::inject().optional().raw_provider();
    assert_eq!(extract_tag(&untagged, &registry, &"p").unwrap(), None);
  }

  #[test]
  fn two_qualifiers_are_ambiguous() {
    let marks = Annotations::inject().named("a").qualifier("Env", "b");
    let err = extract_tag(&marks, &QualifierRegistry::new(), &"field x").unwrap_err();
    assert!(matches!(err, InjectError::AmbiguousQualifier { ref point } if point == "field x"));
  }

  #[test]
  fn configured_rules() {
    let mut registry = QualifierRegistry::new();
    registry.register_rule("Env", QualifierRule::suffix(".prod"));
    registry.register_rule("Plain", QualifierRule::default());
    assert_eq!(registry.tag_for("Env", "db"), "db.prod");
    assert_eq!(registry.tag_for("Plain", "db"), "db");
    assert_eq!(registry.len(), 2);
  }
}
