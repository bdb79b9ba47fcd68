//! The `TestResolver` and its resolution algorithm.

use crate::activator::{Activator, InstanceActivateFn};
use crate::builder::TestResolverBuilder;
use crate::error::{Error, Result};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};
use unitdi_ioc::{
  Instance, Registration, ServiceCollection, ServiceProvider, ServiceResolver, TypeKey,
};

/// A resolver for unit tests that tolerates missing dependencies.
///
/// Registered services come from the wrapped [`ServiceProvider`] exactly as
/// the container would hand them out. When the container can't help, the
/// resolver builds the type itself from its declared constructor, resolving
/// each parameter the same way and passing `None` for whatever stays
/// unresolved. Activators supplied at build time override both for the type
/// they declare. An instance activator, if set, performs every
/// constructor-based build in place of the constructor itself.
///
/// Each resolver is an ordinary value: build one per test.
pub struct TestResolver {
  provider: ServiceProvider,
  activators: Vec<Activator>,
  instance_activator: Option<Arc<InstanceActivateFn>>,
}

impl TestResolver {
  /// Wraps an already built provider.
  pub fn new(provider: ServiceProvider, activators: Vec<Activator>) -> Self {
    debug!(
      registrations = provider.registrations().len(),
      activators = activators.len(),
      "built test resolver"
    );
    Self {
      provider,
      activators,
      instance_activator: None,
    }
  }

  pub(crate) fn with_instance_activator(
    mut self,
    instance_activator: Option<Arc<InstanceActivateFn>>,
  ) -> Self {
    self.instance_activator = instance_activator;
    self
  }

  pub fn builder(services: ServiceCollection) -> TestResolverBuilder {
    TestResolverBuilder::new(services)
  }

  pub fn provider(&self) -> &ServiceProvider {
    &self.provider
  }

  /// The registrations the wrapped provider was built from.
  pub fn registrations(&self) -> &[Registration] {
    self.provider.registrations()
  }

  pub fn activators(&self) -> &[Activator] {
    &self.activators
  }

  pub fn has_instance_activator(&self) -> bool {
    self.instance_activator.is_some()
  }

  // --- Resolution ---

  /// Resolves `requested`, returning `Ok(None)` when nothing can provide it.
  ///
  /// Fails only when a type has more than one declared constructor, or when
  /// an activator or constructor asked for an instance produced none.
  pub fn get_service(&self, requested: &TypeKey) -> Result<Option<Instance>> {
    match self.provider.try_get_all(requested) {
      Ok(mut instances) if instances.len() == 1 => {
        debug!(service = %requested, "resolved from container");
        return Ok(instances.pop());
      }
      Ok(instances) if instances.len() > 1 => {
        debug!(
          service = %requested,
          count = instances.len(),
          "multiple registrations, building declared implementation"
        );
      }
      Ok(_) => trace!(service = %requested, "not registered"),
      Err(error) => debug!(service = %requested, %error, "container lookup failed, falling back"),
    }

    if let Some(instance) = self.activate_or_construct(requested)? {
      return Ok(Some(instance));
    }
    self.build_from_registrations(requested)
  }

  pub fn get<T: ?Sized + Any + Send + Sync>(&self) -> Result<Option<Arc<T>>> {
    ServiceResolver::get::<T>(self)
  }

  pub fn get_required<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    ServiceResolver::get_required::<T>(self)
  }

  // --- PRIVATE HELPERS ---

  // First activator declared for `service`. Duplicates after it are ignored.
  fn activator_for(&self, service: &TypeKey) -> Option<&Activator> {
    self
      .activators
      .iter()
      .find(|activator| activator.returns() == service)
  }

  fn activate_or_construct(&self, service: &TypeKey) -> Result<Option<Instance>> {
    if let Some(activator) = self.activator_for(service) {
      debug!(
        service = %service,
        wants_resolver = activator.wants_resolver(),
        "invoking activator"
      );
      return match activator.activate(self)? {
        Some(instance) => Ok(Some(instance)),
        None => Err(Error::ActivatorReturnedNone(*service)),
      };
    }
    self.construct(service)
  }

  // Builds a concrete type from its single declared constructor. Parameters
  // that can't be resolved are passed as `None`. Abstract types yield `None`.
  fn construct(&self, service: &TypeKey) -> Result<Option<Instance>> {
    let constructor = match self.provider.constructors().get(service) {
      [] => return Ok(None),
      [constructor] => constructor,
      many => {
        return Err(Error::AmbiguousConstructor {
          service: *service,
          count: many.len(),
        })
      }
    };

    let args = constructor
      .params()
      .iter()
      .map(|param| self.get_service(param))
      .collect::<Result<Vec<_>>>()?;
    trace!(
      service = %service,
      params = args.len(),
      missing = args.iter().filter(|arg| arg.is_none()).count(),
      "constructing"
    );

    let built = match &self.instance_activator {
      Some(instance_activator) => instance_activator(service, args),
      None => constructor.invoke(args),
    };
    // Whatever was built has to be the type that was asked for.
    match built {
      Some(instance) if instance.key() == service => Ok(Some(instance)),
      _ => Err(Error::ConstructionFailed(*service)),
    }
  }

  // Walks the raw registrations for `requested` and builds the first declared
  // implementation type that is concrete, served as `requested`.
  fn build_from_registrations(&self, requested: &TypeKey) -> Result<Option<Instance>> {
    let candidates = self
      .registrations()
      .iter()
      .filter(|registration| registration.service() == requested);

    for registration in candidates {
      let Some(implementation) = registration.implementation_type() else {
        continue;
      };
      if implementation == requested {
        // Already tried as a concrete type.
        continue;
      }
      if let Some(built) = self.activate_or_construct(implementation)? {
        debug!(
          service = %requested,
          implementation = %implementation,
          "built declared implementation"
        );
        return registration
          .upcast(built)
          .map(Some)
          .ok_or(Error::ConstructionFailed(*requested));
      }
    }

    trace!(service = %requested, "no usable binding");
    Ok(None)
  }
}

impl ServiceResolver for TestResolver {
  type Error = Error;

  fn get_service(&self, service: &TypeKey) -> Result<Option<Instance>> {
    TestResolver::get_service(self, service)
  }
}

impl fmt::Debug for TestResolver {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TestResolver")
      .field("provider", &self.provider)
      .field("activators", &self.activators)
      .field("instance_activator", &self.instance_activator.is_some())
      .finish()
  }
}
