//! Turns an injection point into a binding lookup.

use crate::container::{Bindings, ErasedProducer};
use crate::error::InjectError;
use crate::point::InjectionPoint;
use crate::types::TypeDescriptor;
use crate::value::Resolved;
use crate::wrapper::WrapperKind;
use std::fmt;
use tracing::{debug, trace, warn};

/// Whether a missing binding is an error or an absent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Required,
  Optional,
}

/// What to ask the container for.
#[derive(Debug, Clone, Copy)]
pub struct BindingRequest<'a> {
  pub leaf: &'a TypeDescriptor,
  pub tag: Option<&'a str>,
  /// Set for factory bindings.
  pub argument: Option<&'a TypeDescriptor>,
}

impl<'a> BindingRequest<'a> {
  pub fn for_point(point: &'a InjectionPoint) -> Self {
    Self {
      leaf: &point.leaf,
      tag: point.tag.as_deref(),
      argument: point.argument(),
    }
  }
}

/// Looks `request` up in `bindings`.
///
/// In `Optional` mode a miss is `Ok(None)`; in `Required` mode it is an
/// `UnresolvedBinding` error naming `point`.
pub fn lookup(
  bindings: &dyn Bindings,
  request: BindingRequest<'_>,
  mode: Mode,
  point: &dyn fmt::Display,
) -> Result<Option<ErasedProducer>, InjectError> {
  let found = match request.argument {
    Some(argument) => bindings.lookup_factory(request.leaf, request.tag, argument),
    None => bindings.lookup(request.leaf, request.tag),
  };
  trace!(
    point = %point,
    leaf = %request.leaf,
    tag = ?request.tag,
    argument = ?request.argument.map(ToString::to_string),
    found = found.is_some(),
    "looked up binding"
  );

  match (found, mode) {
    (Some(producer), _) => Ok(Some(producer)),
    (None, Mode::Optional) => {
      debug!(point = %point, leaf = %request.leaf, tag = ?request.tag, "optional binding absent");
      Ok(None)
    }
    (None, Mode::Required) => {
      warn!(point = %point, leaf = %request.leaf, tag = ?request.tag, "required binding absent");
      Err(unresolved_request(request, point))
    }
  }
}

fn unresolved_request(request: BindingRequest<'_>, point: &dyn fmt::Display) -> InjectError {
  InjectError::UnresolvedBinding {
    point: point.to_string(),
    leaf: request.leaf.to_string(),
    tag: request.tag.map(str::to_owned),
    argument: request.argument.map(ToString::to_string),
  }
}

/// The error for a point whose binding is missing and whose Rust type cannot
/// hold an absent value.
pub(crate) fn unresolved(point: &InjectionPoint) -> InjectError {
  unresolved_request(BindingRequest::for_point(point), point)
}

/// Resolves `point` against `bindings` and shapes the result after its
/// wrapper signature.
pub fn resolve(bindings: &dyn Bindings, point: &InjectionPoint) -> Result<Resolved, InjectError> {
  let mode = if point.optional {
    Mode::Optional
  } else {
    Mode::Required
  };
  let producer = lookup(bindings, BindingRequest::for_point(point), mode, point)?;
  Ok(shape(point.signature.kinds(), producer))
}

fn shape(kinds: &[WrapperKind], producer: Option<ErasedProducer>) -> Resolved {
  match kinds {
    [] => Resolved::Value(producer),
    [WrapperKind::Lazy, rest @ ..] => Resolved::Lazy(Box::new(shape(rest, producer))),
    [WrapperKind::Provider, ..] => Resolved::Provider(producer),
    [WrapperKind::Factory { .. }, ..] => Resolved::Factory(producer),
  }
}
