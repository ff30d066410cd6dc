//! Injector configuration, loadable from YAML.

use crate::error::InjectError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// How a custom qualifier's value becomes a binding tag: `prefix + value + suffix`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualifierRule {
  pub prefix: String,
  pub suffix: String,
}

impl QualifierRule {
  pub fn prefix(prefix: impl Into<String>) -> Self {
    Self {
      prefix: prefix.into(),
      suffix: String::new(),
    }
  }

  pub fn suffix(suffix: impl Into<String>) -> Self {
    Self {
      prefix: String::new(),
      suffix: suffix.into(),
    }
  }

  pub fn apply(&self, value: &str) -> String {
    format!("{}{}{}", self.prefix, value, self.suffix)
  }
}

/// Settings for an [`Injector`](crate::Injector).
///
/// ```yaml
/// cache_scans: true
/// qualifiers:
///   UniversePrefix:
///     prefix: "universe:"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InjectorConfig {
  /// Keep scan results per type instead of rescanning on every call.
  pub cache_scans: bool,
  /// Tag rules for custom qualifiers, by qualifier name.
  pub qualifiers: BTreeMap<String, QualifierRule>,
}

impl Default for InjectorConfig {
  fn default() -> Self {
    Self {
      cache_scans: true,
      qualifiers: BTreeMap::new(),
    }
  }
}

impl InjectorConfig {
  pub fn from_yaml_str(source: &str) -> Result<Self, InjectError> {
    Ok(serde_yaml::from_str(source)?)
  }

  pub fn from_yaml_reader(reader: impl Read) -> Result<Self, InjectError> {
    Ok(serde_yaml::from_reader(reader)?)
  }
}
