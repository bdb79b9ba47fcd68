//! Core data structures shared by the collection, the provider and any resolver
//! layered on top of them.

use crate::error::{Error, Result};
use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

thread_local! {
  // The set of services currently being resolved on this thread, per provider.
  static RESOLVING_STACK: RefCell<HashSet<(usize, TypeKey)>> = RefCell::new(HashSet::new());
}

/// An RAII guard to detect circular dependencies between registrations.
///
/// Entering a service that is already being resolved by the same provider on
/// this thread fails with [`Error::CircularDependency`]. Dropping the guard
/// removes the service from the stack again.
pub(crate) struct ResolutionGuard {
  entry: (usize, TypeKey),
}

impl ResolutionGuard {
  pub(crate) fn enter(owner: usize, service: &TypeKey) -> Result<Self> {
    let entry = (owner, *service);
    RESOLVING_STACK.with(|stack| {
      if stack.borrow_mut().insert(entry) {
        Ok(Self { entry })
      } else {
        Err(Error::CircularDependency(*service))
      }
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().remove(&self.entry);
    });
  }
}

/// Identifies a service type, sized or not.
///
/// Trait objects (`dyn Trait`) act as interfaces, every other type is looked
/// up as itself. Equality and hashing only consider the [`TypeId`]; the name
/// is carried along for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
  id: TypeId,
  name: &'static str,
}

impl TypeKey {
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: type_name::<T>(),
    }
  }

  pub fn id(&self) -> TypeId {
    self.id
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn is<T: ?Sized + Any>(&self) -> bool {
    self.id == TypeId::of::<T>()
  }
}

impl PartialEq for TypeKey {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Debug for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeKey({})", self.name)
  }
}

impl fmt::Display for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

type ErasedService = Box<dyn Any + Send + Sync>;

/// A type-erased service instance.
///
/// Internally this is an `Arc<T>` boxed as `dyn Any`, tagged with the
/// [`TypeKey`] of `T`. Cloning clones the `Arc`, so clones of a shared
/// instance stay pointer-equal.
pub struct Instance {
  key: TypeKey,
  value: ErasedService,
  clone_fn: fn(&ErasedService) -> ErasedService,
}

fn clone_arc<T: ?Sized + Any + Send + Sync>(value: &ErasedService) -> ErasedService {
  match value.downcast_ref::<Arc<T>>() {
    Some(service) => Box::new(Arc::clone(service)),
    None => unreachable!("Instance of {} holds a foreign value", type_name::<T>()),
  }
}

impl Instance {
  pub fn new<T: ?Sized + Any + Send + Sync>(service: Arc<T>) -> Self {
    Self {
      key: TypeKey::of::<T>(),
      value: Box::new(service),
      clone_fn: clone_arc::<T>,
    }
  }

  /// The type this instance was created for.
  pub fn key(&self) -> &TypeKey {
    &self.key
  }

  pub fn downcast_ref<T: ?Sized + Any + Send + Sync>(&self) -> Option<&Arc<T>> {
    self.value.downcast_ref::<Arc<T>>()
  }

  /// Recovers the typed `Arc`, handing the instance back if `T` doesn't match.
  pub fn downcast<T: ?Sized + Any + Send + Sync>(self) -> std::result::Result<Arc<T>, Instance> {
    if self.value.is::<Arc<T>>() {
      let Self { value, .. } = self;
      match value.downcast::<Arc<T>>() {
        Ok(service) => Ok(*service),
        Err(_) => unreachable!("type was checked before downcasting"),
      }
    } else {
      Err(self)
    }
  }
}

impl Clone for Instance {
  fn clone(&self) -> Self {
    Self {
      key: self.key,
      value: (self.clone_fn)(&self.value),
      clone_fn: self.clone_fn,
    }
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Instance({})", self.key.name)
  }
}
