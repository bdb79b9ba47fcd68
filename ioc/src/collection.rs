//! The `ServiceCollection` and its registration records.

use crate::constructor::{Constructor, ConstructorTable, Dependencies};
use crate::core::{Instance, TypeKey};
use crate::error::Result;
use crate::provider::ServiceProvider;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// How long a resolved instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
  /// One instance per root provider, shared by all of its scopes.
  Singleton,
  /// One instance per scope. The root provider is a scope of its own.
  Scoped,
  /// A new instance for every lookup.
  Transient,
}

type FactoryFn = dyn Fn(&ServiceProvider) -> Result<Instance> + Send + Sync;
type UpcastFn = dyn Fn(Instance) -> Option<Instance> + Send + Sync;

#[derive(Clone)]
pub(crate) enum RegistrationKind {
  Instance(Instance),
  Factory(Arc<FactoryFn>),
  Implementation {
    implementation: TypeKey,
    upcast: Arc<UpcastFn>,
  },
}

/// Binds a service type to a lifetime and to the way its instances are made:
/// a ready instance, a factory, or an implementation type built from its
/// declared constructor.
#[derive(Clone)]
pub struct Registration {
  service: TypeKey,
  lifetime: Lifetime,
  kind: RegistrationKind,
}

impl Registration {
  /// Registers `instance` as a singleton for `T`.
  pub fn instance<T: ?Sized + Any + Send + Sync>(instance: Arc<T>) -> Self {
    Self {
      service: TypeKey::of::<T>(),
      lifetime: Lifetime::Singleton,
      kind: RegistrationKind::Instance(Instance::new(instance)),
    }
  }

  pub fn factory<T, F>(lifetime: Lifetime, factory: F) -> Self
  where
    T: ?Sized + Any + Send + Sync,
    F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
  {
    Self {
      service: TypeKey::of::<T>(),
      lifetime,
      kind: RegistrationKind::Factory(Arc::new(move |provider: &ServiceProvider| {
        factory(provider).map(Instance::new::<T>)
      })),
    }
  }

  /// Binds the service `S` to the implementation type `I`. Instances of `I`
  /// come from its declared constructor and are turned into `S` by `upcast`,
  /// usually just `|it| it`.
  pub fn implementation<S, I, F>(lifetime: Lifetime, upcast: F) -> Self
  where
    S: ?Sized + Any + Send + Sync,
    I: Any + Send + Sync,
    F: Fn(Arc<I>) -> Arc<S> + Send + Sync + 'static,
  {
    Self {
      service: TypeKey::of::<S>(),
      lifetime,
      kind: RegistrationKind::Implementation {
        implementation: TypeKey::of::<I>(),
        upcast: Arc::new(move |built: Instance| {
          built
            .downcast::<I>()
            .ok()
            .map(|implementation| Instance::new::<S>(upcast(implementation)))
        }),
      },
    }
  }

  pub fn service(&self) -> &TypeKey {
    &self.service
  }

  pub fn lifetime(&self) -> Lifetime {
    self.lifetime
  }

  /// The declared implementation type, if this registration has one.
  pub fn implementation_type(&self) -> Option<&TypeKey> {
    match &self.kind {
      RegistrationKind::Implementation { implementation, .. } => Some(implementation),
      _ => None,
    }
  }

  pub fn is_factory(&self) -> bool {
    matches!(self.kind, RegistrationKind::Factory(_))
  }

  pub fn is_instance(&self) -> bool {
    matches!(self.kind, RegistrationKind::Instance(_))
  }

  /// Converts an instance of the implementation type into the service type.
  /// Returns `None` for registrations without an implementation type or when
  /// `built` isn't an instance of it.
  pub fn upcast(&self, built: Instance) -> Option<Instance> {
    match &self.kind {
      RegistrationKind::Implementation { upcast, .. } => upcast(built),
      _ => None,
    }
  }

  pub(crate) fn kind(&self) -> &RegistrationKind {
    &self.kind
  }
}

impl fmt::Debug for Registration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut debug = f.debug_struct("Registration");
    debug
      .field("service", &self.service)
      .field("lifetime", &self.lifetime);
    match &self.kind {
      RegistrationKind::Instance(_) => debug.field("kind", &"instance"),
      RegistrationKind::Factory(_) => debug.field("kind", &"factory"),
      RegistrationKind::Implementation { implementation, .. } => {
        debug.field("implementation", implementation)
      }
    };
    debug.finish()
  }
}

/// Registrations and constructor declarations, in the order they were added.
///
/// Nothing is built at this stage. `build` turns the collection into a
/// [`ServiceProvider`].
#[derive(Default)]
pub struct ServiceCollection {
  registrations: Vec<Registration>,
  constructors: ConstructorTable,
}

impl ServiceCollection {
  /// Creates a new, empty `ServiceCollection`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn add_self_internal<T: Any + Send + Sync>(&mut self, lifetime: Lifetime) -> &mut Self {
    self.add(Registration::implementation::<T, T, _>(lifetime, |it| it))
  }

  fn add_as_internal<S, I>(
    &mut self,
    lifetime: Lifetime,
    upcast: impl Fn(Arc<I>) -> Arc<S> + Send + Sync + 'static,
  ) -> &mut Self
  where
    S: ?Sized + Any + Send + Sync,
    I: Any + Send + Sync,
  {
    self.add(Registration::implementation::<S, I, _>(lifetime, upcast))
  }

  fn add_factory_internal<T: ?Sized + Any + Send + Sync>(
    &mut self,
    lifetime: Lifetime,
    factory: impl Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
  ) -> &mut Self {
    self.add(Registration::factory::<T, _>(lifetime, factory))
  }

  // --- PUBLIC API ---

  /// Appends a prepared registration.
  pub fn add(&mut self, registration: Registration) -> &mut Self {
    self.registrations.push(registration);
    self
  }

  // --- Constructor Declarations ---

  /// Declares how to build `T` from the dependencies `D`, e.g.
  /// `add_constructor::<Garage, (Arc<dyn Car>,), _>(|(car,)| Garage { car })`.
  pub fn add_constructor<T, D, F>(&mut self, build: F) -> &mut Self
  where
    T: Any + Send + Sync,
    D: Dependencies + 'static,
    F: Fn(D::Args) -> T + Send + Sync + 'static,
  {
    self.add_constructor_for(TypeKey::of::<T>(), Constructor::new::<T, D, F>(build))
  }

  /// Declares that `T` is built with `T::default()`.
  pub fn add_default_constructor<T: Default + Any + Send + Sync>(&mut self) -> &mut Self {
    self.add_constructor_for(TypeKey::of::<T>(), Constructor::default_of::<T>())
  }

  pub fn add_constructor_for(&mut self, service: TypeKey, constructor: Constructor) -> &mut Self {
    self.constructors.insert(service, constructor);
    self
  }

  // --- Instance Registration ---
  pub fn add_instance<T: ?Sized + Any + Send + Sync>(&mut self, instance: Arc<T>) -> &mut Self {
    self.add(Registration::instance(instance))
  }

  // --- Singleton Registration ---
  pub fn add_singleton<T: Any + Send + Sync>(&mut self) -> &mut Self {
    self.add_self_internal::<T>(Lifetime::Singleton)
  }
  pub fn add_singleton_as<S: ?Sized + Any + Send + Sync, I: Any + Send + Sync>(
    &mut self,
    upcast: impl Fn(Arc<I>) -> Arc<S> + Send + Sync + 'static,
  ) -> &mut Self {
    self.add_as_internal(Lifetime::Singleton, upcast)
  }
  pub fn add_singleton_factory<T: ?Sized + Any + Send + Sync>(
    &mut self,
    factory: impl Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
  ) -> &mut Self {
    self.add_factory_internal(Lifetime::Singleton, factory)
  }

  // --- Scoped Registration ---
  pub fn add_scoped<T: Any + Send + Sync>(&mut self) -> &mut Self {
    self.add_self_internal::<T>(Lifetime::Scoped)
  }
  pub fn add_scoped_as<S: ?Sized + Any + Send + Sync, I: Any + Send + Sync>(
    &mut self,
    upcast: impl Fn(Arc<I>) -> Arc<S> + Send + Sync + 'static,
  ) -> &mut Self {
    self.add_as_internal(Lifetime::Scoped, upcast)
  }
  pub fn add_scoped_factory<T: ?Sized + Any + Send + Sync>(
    &mut self,
    factory: impl Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
  ) -> &mut Self {
    self.add_factory_internal(Lifetime::Scoped, factory)
  }

  // --- Transient Registration ---
  pub fn add_transient<T: Any + Send + Sync>(&mut self) -> &mut Self {
    self.add_self_internal::<T>(Lifetime::Transient)
  }
  pub fn add_transient_as<S: ?Sized + Any + Send + Sync, I: Any + Send + Sync>(
    &mut self,
    upcast: impl Fn(Arc<I>) -> Arc<S> + Send + Sync + 'static,
  ) -> &mut Self {
    self.add_as_internal(Lifetime::Transient, upcast)
  }
  pub fn add_transient_factory<T: ?Sized + Any + Send + Sync>(
    &mut self,
    factory: impl Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
  ) -> &mut Self {
    self.add_factory_internal(Lifetime::Transient, factory)
  }

  // --- Inspection ---
  pub fn registrations(&self) -> &[Registration] {
    &self.registrations
  }

  pub fn constructors(&self) -> &ConstructorTable {
    &self.constructors
  }

  pub fn len(&self) -> usize {
    self.registrations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.registrations.is_empty()
  }

  /// Freezes the collection into a provider. Dependencies are only checked
  /// when a service is resolved, so a collection with unsatisfiable
  /// registrations still builds.
  pub fn build(self) -> ServiceProvider {
    ServiceProvider::new(self.registrations, self.constructors)
  }
}

impl fmt::Debug for ServiceCollection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ServiceCollection")
      .field("registrations", &self.registrations)
      .field("constructors", &self.constructors.len())
      .finish()
  }
}
