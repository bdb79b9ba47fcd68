use crate::core::TypeKey;
use thiserror::Error;

/// Returned by `get_required` when a resolver has no instance for a service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No service registered for '{0}'")]
pub struct ServiceNotFound(pub TypeKey);

/// The error type for `unitdi_ioc` resolution.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Cannot build '{service}': dependency '{dependency}' is not registered")]
  MissingDependency {
    service: TypeKey,
    dependency: TypeKey,
  },

  #[error("No constructor declared for '{0}'")]
  NoConstructor(TypeKey),

  #[error("Ambiguous constructor for '{service}': {count} constructors declared, expected one")]
  AmbiguousConstructor { service: TypeKey, count: usize },

  #[error("Constructor of '{0}' produced no instance")]
  ConstructionFailed(TypeKey),

  #[error("Circular dependency detected while resolving service: {0}")]
  CircularDependency(TypeKey),

  #[error("Factory for '{service}' failed: {reason}")]
  FactoryFailed { service: TypeKey, reason: String },

  #[error(transparent)]
  NotFound(#[from] ServiceNotFound),
}

/// A specialized `Result` type for `unitdi_ioc` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
