use crate::core::{Instance, TypeKey};
use crate::error::ServiceNotFound;
use std::any::Any;
use std::sync::Arc;

/// Anything that can answer "give me an instance of this type".
///
/// Implemented by [`ServiceProvider`](crate::ServiceProvider); wrappers that
/// resolve differently implement it too, so either can be handed to code that
/// only needs lookups.
pub trait ServiceResolver {
  type Error: std::error::Error + From<ServiceNotFound>;

  /// Resolves `service`. `Ok(None)` means the resolver has nothing for it.
  fn get_service(&self, service: &TypeKey) -> Result<Option<Instance>, Self::Error>;

  fn get<T: ?Sized + Any + Send + Sync>(&self) -> Result<Option<Arc<T>>, Self::Error>
  where
    Self: Sized,
  {
    Ok(
      self
        .get_service(&TypeKey::of::<T>())?
        .and_then(|instance| instance.downcast::<T>().ok()),
    )
  }

  /// Like [`get`](Self::get), but a missing service is an error.
  fn get_required<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>, Self::Error>
  where
    Self: Sized,
  {
    self
      .get::<T>()?
      .ok_or_else(|| ServiceNotFound(TypeKey::of::<T>()).into())
  }
}
