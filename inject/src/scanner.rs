//! Enumerates and validates the injection points of a class descriptor.

use crate::annotation::Annotations;
use crate::descriptor::{ClassDescriptor, ConstructorBody, Injectable, MethodBody, Param, PrepareArg, PrepareField};
use crate::error::InjectError;
use crate::point::{InjectionPoint, MemberRef, PointKind};
use crate::qualifier::{extract_tag, QualifierRegistry};
use crate::types::TypeDescriptor;
use crate::wrapper::{unwrap, Unwrapped};

pub(crate) struct FieldPlan<T> {
  pub(crate) point: InjectionPoint,
  pub(crate) prepare: PrepareField<T>,
}

pub(crate) struct ParamPlan {
  pub(crate) point: InjectionPoint,
  pub(crate) prepare: PrepareArg,
}

pub(crate) struct MethodPlan<T> {
  pub(crate) member: MemberRef,
  pub(crate) params: Vec<ParamPlan>,
  pub(crate) body: MethodBody<T>,
}

/// The validated field and method points of a type.
///
/// `methods` holds at most one method per owner: the type itself and each
/// embedded value it includes.
pub(crate) struct MemberPlan<T> {
  pub(crate) fields: Vec<FieldPlan<T>>,
  pub(crate) methods: Vec<MethodPlan<T>>,
}

impl<T> MemberPlan<T> {
  pub(crate) fn points(&self) -> Vec<InjectionPoint> {
    let fields = self.fields.iter().map(|field| field.point.clone());
    let params = self
      .methods
      .iter()
      .flat_map(|method| method.params.iter().map(|param| param.point.clone()));
    fields.chain(params).collect()
  }
}

/// The validated constructor of a type.
pub(crate) struct ConstructorPlan<T> {
  pub(crate) member: MemberRef,
  pub(crate) params: Vec<ParamPlan>,
  pub(crate) body: ConstructorBody<T>,
}

impl<T> ConstructorPlan<T> {
  pub(crate) fn points(&self) -> Vec<InjectionPoint> {
    self.params.iter().map(|param| param.point.clone()).collect()
  }
}

fn point(
  kind: PointKind,
  member: MemberRef,
  declared: &TypeDescriptor,
  accepts_absent: bool,
  annotations: &Annotations,
  registry: &QualifierRegistry,
) -> Result<InjectionPoint, InjectError> {
  let tag = extract_tag(annotations, registry, &member)?;
  let Unwrapped { leaf, signature } = unwrap(declared, annotations, &member)?;
  if annotations.is_optional() && !accepts_absent {
    return Err(InjectError::OptionalWithoutAbsence {
      point: member.to_string(),
      declared: declared.to_string(),
    });
  }
  Ok(InjectionPoint {
    kind,
    member,
    declared: declared.clone(),
    leaf,
    signature,
    tag,
    optional: annotations.is_optional(),
  })
}

fn params(
  kind: PointKind,
  owner: &'static str,
  member: &'static str,
  params: &[Param],
  registry: &QualifierRegistry,
) -> Result<Vec<ParamPlan>, InjectError> {
  params
    .iter()
    .enumerate()
    .map(|(index, param)| {
      let member = MemberRef {
        owner,
        member,
        index: Some(index),
      };
      Ok(ParamPlan {
        point: point(kind, member, &param.declared, param.accepts_absent, &param.annotations, registry)?,
        prepare: param.prepare.clone(),
      })
    })
    .collect()
}

/// Scans the inject-marked fields and the inject-marked method of `class`.
pub(crate) fn scan_members<T: Injectable>(
  class: &ClassDescriptor<T>,
  registry: &QualifierRegistry,
) -> Result<MemberPlan<T>, InjectError> {
  let mut fields = Vec::new();
  for field in class.fields.iter().filter(|field| field.annotations.is_inject()) {
    let member = MemberRef {
      owner: field.owner.unwrap_or(class.name),
      member: field.name,
      index: None,
    };
    fields.push(FieldPlan {
      point: point(
        PointKind::Field,
        member,
        &field.declared,
        field.accepts_absent,
        &field.annotations,
        registry,
      )?,
      prepare: field.prepare.clone(),
    });
  }

  let marked: Vec<_> = class
    .methods
    .iter()
    .filter(|method| method.annotations.is_inject())
    .collect();
  let mut owners: Vec<&'static str> = Vec::new();
  for method in &marked {
    let owner = method.owner.unwrap_or(class.name);
    if !owners.contains(&owner) {
      owners.push(owner);
    }
  }

  let mut methods = Vec::with_capacity(owners.len());
  for owner in owners {
    let level: Vec<_> = marked
      .iter()
      .filter(|method| method.owner.unwrap_or(class.name) == owner)
      .collect();
    match level.as_slice() {
      [method] => methods.push(MethodPlan {
        member: MemberRef {
          owner,
          member: method.name,
          index: None,
        },
        params: params(PointKind::MethodParam, owner, method.name, &method.params, registry)?,
        body: method.body.clone(),
      }),
      several => {
        return Err(InjectError::AmbiguousInjectableMethod {
          class: owner,
          methods: several.iter().map(|method| method.name).collect(),
        })
      }
    }
  }

  Ok(MemberPlan { fields, methods })
}

/// Selects and scans the constructor of `class`.
///
/// The single inject-marked constructor wins; without one, a type declaring
/// exactly one constructor uses it.
pub(crate) fn scan_constructor<T: Injectable>(
  class: &ClassDescriptor<T>,
  registry: &QualifierRegistry,
) -> Result<ConstructorPlan<T>, InjectError> {
  let marked: Vec<_> = class
    .constructors
    .iter()
    .filter(|constructor| constructor.annotations.is_inject())
    .collect();
  let chosen = match (marked.as_slice(), class.constructors.as_slice()) {
    ([constructor], _) => *constructor,
    ([], [only]) => only,
    _ => {
      return Err(InjectError::AmbiguousConstructor {
        class: class.name,
        marked: marked.len(),
        declared: class.constructors.len(),
      })
    }
  };

  Ok(ConstructorPlan {
    member: MemberRef {
      owner: class.name,
      member: chosen.name,
      index: None,
    },
    params: params(PointKind::ConstructorParam, class.name, chosen.name, &chosen.params, registry)?,
    body: chosen.body.clone(),
  })
}
