//! Peels lazy, provider and factory shapes off a declared type.

use crate::annotation::{Annotation, Annotations};
use crate::error::InjectError;
use crate::types::{TypeDescriptor, TypeHead};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WrapperKind {
  Lazy,
  Provider,
  /// Carries the type of the factory's call argument.
  Factory { argument: TypeDescriptor },
}

/// The ordered wrappers around a leaf, outermost first. Empty for a plain leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct WrapperSignature(Vec<WrapperKind>);

impl WrapperSignature {
  pub fn kinds(&self) -> &[WrapperKind] {
    &self.0
  }

  pub fn is_plain(&self) -> bool {
    self.0.is_empty()
  }

  pub fn factory_argument(&self) -> Option<&TypeDescriptor> {
    self.0.iter().find_map(|kind| match kind {
      WrapperKind::Factory { argument } => Some(argument),
      _ => None,
    })
  }

  // [], [Lazy], [Provider], [Lazy, Provider], [Factory], [Lazy, Factory]
  fn is_supported(&self) -> bool {
    let inner = match self.0.as_slice() {
      [WrapperKind::Lazy, rest @ ..] => rest,
      all => all,
    };
    matches!(
      inner,
      [] | [WrapperKind::Provider] | [WrapperKind::Factory { .. }]
    )
  }
}

impl fmt::Display for WrapperSignature {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.0.is_empty() {
      return f.write_str("plain");
    }
    let names: Vec<&str> = self
      .0
      .iter()
      .map(|kind| match kind {
        WrapperKind::Lazy => "lazy",
        WrapperKind::Provider => "provider",
        WrapperKind::Factory { .. } => "factory",
      })
      .collect();
    f.write_str(&names.join(" of "))
  }
}

/// The result of unwrapping a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unwrapped {
  pub leaf: TypeDescriptor,
  pub signature: WrapperSignature,
}

/// Splits `declared` into its leaf type and wrapper signature.
///
/// Shapes are matched outermost first in the order lazy, factory, provider.
/// Bare callables are only recognised when `annotations` carries the matching
/// raw marker. `point` names the injection point in errors.
pub fn unwrap(
  declared: &TypeDescriptor,
  annotations: &Annotations,
  point: &dyn fmt::Display,
) -> Result<Unwrapped, InjectError> {
  let raw_provider = annotations.contains(&Annotation::RawProvider);
  let raw_factory = annotations.contains(&Annotation::RawFactory);
  let unsupported = |reason: &'static str| InjectError::UnsupportedWrapperShape {
    point: point.to_string(),
    shape: declared.to_string(),
    reason,
  };

  let mut kinds = Vec::new();
  let mut used_raw_provider = false;
  let mut used_raw_factory = false;
  let mut current = declared;

  loop {
    let args = current.args();
    match current.head() {
      TypeHead::Class { .. } => break,
      TypeHead::Lazy => {
        kinds.push(WrapperKind::Lazy);
        current = args.first().ok_or_else(|| unsupported("lazy without a value type"))?;
      }
      TypeHead::Factory | TypeHead::Function1 => {
        if current.head() == TypeHead::Function1 {
          if !raw_factory {
            return Err(unsupported("a bare one-argument callable needs the raw factory marker"));
          }
          used_raw_factory = true;
        }
        let (argument, value) = match args {
          [argument, value] => (argument, value),
          _ => return Err(unsupported("factory without argument and value types")),
        };
        kinds.push(WrapperKind::Factory {
          argument: argument.clone(),
        });
        current = value;
      }
      TypeHead::Provider | TypeHead::Function0 => {
        if current.head() == TypeHead::Function0 {
          if !raw_provider {
            return Err(unsupported("a bare zero-argument callable needs the raw provider marker"));
          }
          used_raw_provider = true;
        }
        kinds.push(WrapperKind::Provider);
        current = args.first().ok_or_else(|| unsupported("provider without a value type"))?;
      }
    }
  }

  if raw_provider && !used_raw_provider {
    return Err(unsupported("the raw provider marker requires a zero-argument callable"));
  }
  if raw_factory && !used_raw_factory {
    return Err(unsupported("the raw factory marker requires a one-argument callable"));
  }

  let signature = WrapperSignature(kinds);
  if !signature.is_supported() {
    return Err(unsupported("only lazy, provider, factory, lazy provider and lazy factory are supported"));
  }

  Ok(Unwrapped {
    leaf: current.clone(),
    signature,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn string() -> TypeDescriptor {
    TypeDescriptor::of::<String>()
  }

  fn unwrap_plain(declared: TypeDescriptor) -> Result<Unwrapped, InjectError> {
    unwrap(&declared, &Annotations::new(), &"test point")
  }

  #[test]
  fn plain_leaf_has_empty_signature() {
    let unwrapped = unwrap_plain(string()).unwrap();
    assert_eq!(unwrapped.leaf, string());
    assert!(unwrapped.signature.is_plain());
  }

  #[test]
  fn lazy_provider_unwraps_outermost_first() {
    let unwrapped = unwrap_plain(TypeDescriptor::lazy(TypeDescriptor::provider(string()))).unwrap();
    assert_eq!(unwrapped.leaf, string());
    assert_eq!(
      unwrapped.signature.kinds(),
      &[WrapperKind::Lazy, WrapperKind::Provider]
    );
    assert_eq!(unwrapped.signature.to_string(), "lazy of provider");
  }

  #[test]
  fn factory_records_argument_type() {
    let declared = TypeDescriptor::lazy(TypeDescriptor::factory(TypeDescriptor::of::<i32>(), string()));
    let unwrapped = unwrap_plain(declared).unwrap();
    assert_eq!(unwrapped.leaf, string());
    assert_eq!(
      unwrapped.signature.factory_argument(),
      Some(&TypeDescriptor::of::<i32>())
    );
  }

  #[test]
  fn reverse_nesting_is_rejected() {
    for declared in [
      TypeDescriptor::provider(TypeDescriptor::lazy(string())),
      TypeDescriptor::factory(TypeDescriptor::of::<i32>(), TypeDescriptor::lazy(string())),
      TypeDescriptor::provider(TypeDescriptor::factory(TypeDescriptor::of::<i32>(), string())),
      TypeDescriptor::lazy(TypeDescriptor::lazy(string())),
      TypeDescriptor::provider(TypeDescriptor::provider(string())),
    ] {
      let err = unwrap_plain(declared).unwrap_err();
      assert!(matches!(err, InjectError::UnsupportedWrapperShape { .. }), "{err}");
    }
  }

  #[test]
  fn bare_callables_need_their_marker() {
    let bare = TypeDescriptor::function0(string());
    assert!(unwrap_plain(bare.clone()).is_err());

    let marked = unwrap(&bare, &Annotations::new().raw_provider(), &"test point").unwrap();
    assert_eq!(marked.signature.kinds(), &[WrapperKind::Provider]);

    let misplaced = unwrap(&string(), &Annotations::new().raw_factory(), &"test point");
    assert!(misplaced.is_err());
  }
}
