//! Injection points: one field, method parameter or constructor parameter.

use crate::types::TypeDescriptor;
use crate::wrapper::WrapperSignature;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointKind {
  Field,
  MethodParam,
  ConstructorParam,
}

/// Identifies the member an injection point belongs to, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberRef {
  pub owner: &'static str,
  pub member: &'static str,
  pub index: Option<usize>,
}

impl fmt::Display for MemberRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.index {
      Some(i) => write!(f, "parameter {} of {}::{}", i + 1, self.owner, self.member),
      None => write!(f, "{}::{}", self.owner, self.member),
    }
  }
}

/// A fully scanned injection point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionPoint {
  pub kind: PointKind,
  pub member: MemberRef,
  /// The type as declared, wrappers included.
  pub declared: TypeDescriptor,
  /// The innermost type looked up in the container.
  pub leaf: TypeDescriptor,
  pub signature: WrapperSignature,
  pub tag: Option<String>,
  pub optional: bool,
}

impl InjectionPoint {
  /// The factory argument type, when the signature contains a factory.
  pub fn argument(&self) -> Option<&TypeDescriptor> {
    self.signature.factory_argument()
  }
}

impl fmt::Display for InjectionPoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.member.fmt(f)
  }
}
