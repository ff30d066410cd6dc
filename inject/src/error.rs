use thiserror::Error;

/// Errors raised while scanning a type or injecting into it.
///
/// Every variant is fatal to the call in progress. Only a missing binding on an
/// optional point is turned into an absent value; everything else is reported.
#[derive(Debug, Error)]
pub enum InjectError {
  /// More than one qualifying annotation on the same point.
  #[error("{point} carries more than one qualifier")]
  AmbiguousQualifier { point: String },

  /// The constructor to use could not be chosen.
  #[error(
    "{class} must either have exactly one constructor or exactly one inject-marked constructor \
     (found {declared} declared, {marked} marked)"
  )]
  AmbiguousConstructor {
    class: &'static str,
    marked: usize,
    declared: usize,
  },

  /// More than one method carries the inject marker.
  #[error("{class} has more than one inject-marked method: {}", .methods.join(", "))]
  AmbiguousInjectableMethod {
    class: &'static str,
    methods: Vec<&'static str>,
  },

  /// The declared type nests wrappers in a way the injector does not support.
  #[error("{point} has unsupported shape {shape}: {reason}")]
  UnsupportedWrapperShape {
    point: String,
    shape: String,
    reason: &'static str,
  },

  /// An optional point whose type has no way to hold an absent value.
  #[error("{point} is marked optional but {declared} cannot be absent; declare it as an Option")]
  OptionalWithoutAbsence { point: String, declared: String },

  /// A required point has no matching binding.
  #[error(
    "no binding for {leaf}{} {} required by {point}",
    .argument.as_ref().map(|a| format!(" (argument {})", a)).unwrap_or_default(),
    .tag.as_ref().map(|t| format!("tagged {:?}", t)).unwrap_or_else(|| "without tag".to_string())
  )]
  UnresolvedBinding {
    point: String,
    leaf: String,
    tag: Option<String>,
    argument: Option<String>,
  },

  /// A typed read disagrees with the declared shape or with the bound producer.
  #[error("{point}: expected {expected}, found {found}")]
  TypeMismatch {
    point: String,
    expected: String,
    found: String,
  },

  /// A constructor or method body read more arguments than were declared.
  #[error("{member} has no argument at index {index}")]
  MissingArgument { member: String, index: usize },

  /// The injector configuration could not be parsed.
  #[error("invalid injector configuration: {0}")]
  Config(#[from] serde_yaml::Error),
}
