//! Caller-supplied functions that manufacture one specific service type.

use crate::error::Result;
use crate::resolver::TestResolver;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use unitdi_ioc::{Instance, TypeKey};

type ActivateFn = dyn Fn(&TestResolver) -> Result<Option<Instance>> + Send + Sync;

/// Builds any concrete type from its already resolved constructor arguments.
pub(crate) type InstanceActivateFn =
  dyn Fn(&TypeKey, Vec<Option<Instance>>) -> Option<Instance> + Send + Sync;

/// Produces instances of the type it is declared for, taking priority over
/// the declared constructor of that type.
///
/// An activator may return `None`, but the resolver treats that as a failure:
/// it was explicitly asked for this type and had nothing to give.
#[derive(Clone)]
pub struct Activator {
  returns: TypeKey,
  wants_resolver: bool,
  activate: Arc<ActivateFn>,
}

impl Activator {
  /// An activator that needs nothing to build its instance.
  ///
  /// ```
  /// use std::sync::Arc;
  /// use unitdi::Activator;
  ///
  /// trait Clock: Send + Sync {}
  /// struct Frozen;
  /// impl Clock for Frozen {}
  ///
  /// let activator = Activator::new::<dyn Clock>(|| Some(Arc::new(Frozen)));
  /// assert!(!activator.wants_resolver());
  /// ```
  pub fn new<T: ?Sized + Any + Send + Sync>(
    activate: impl Fn() -> Option<Arc<T>> + Send + Sync + 'static,
  ) -> Self {
    Self {
      returns: TypeKey::of::<T>(),
      wants_resolver: false,
      activate: Arc::new(move |_: &TestResolver| Ok(activate().map(Instance::new::<T>))),
    }
  }

  /// An activator that is handed the resolver answering the current lookup,
  /// so it can resolve its own dependencies.
  pub fn with_resolver<T: ?Sized + Any + Send + Sync>(
    activate: impl Fn(&TestResolver) -> Result<Option<Arc<T>>> + Send + Sync + 'static,
  ) -> Self {
    Self {
      returns: TypeKey::of::<T>(),
      wants_resolver: true,
      activate: Arc::new(move |resolver: &TestResolver| {
        Ok(activate(resolver)?.map(Instance::new::<T>))
      }),
    }
  }

  /// The declared return type.
  pub fn returns(&self) -> &TypeKey {
    &self.returns
  }

  pub fn wants_resolver(&self) -> bool {
    self.wants_resolver
  }

  pub(crate) fn activate(&self, resolver: &TestResolver) -> Result<Option<Instance>> {
    (self.activate)(resolver)
  }
}

impl fmt::Debug for Activator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Activator")
      .field("returns", &self.returns)
      .field("wants_resolver", &self.wants_resolver)
      .finish_non_exhaustive()
  }
}
