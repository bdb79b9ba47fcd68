use thiserror::Error;
use unitdi_ioc::{ServiceNotFound, TypeKey};

/// The error type for test resolution.
///
/// Only the first three variants come out of the resolution algorithm
/// itself. Everything else the resolver can't satisfy is `Ok(None)`.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Ambiguous constructor for '{service}': {count} constructors declared, a single constructor is required")]
  AmbiguousConstructor { service: TypeKey, count: usize },

  #[error("Activator for '{0}' returned no instance")]
  ActivatorReturnedNone(TypeKey),

  #[error("Construction of '{0}' produced no instance")]
  ConstructionFailed(TypeKey),

  #[error(transparent)]
  NotFound(#[from] ServiceNotFound),

  #[error("Container error: {0}")]
  Container(#[from] unitdi_ioc::Error),
}

/// A specialized `Result` type for `unitdi` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
