//! The `ServiceProvider` built from a `ServiceCollection`.

use crate::collection::{Lifetime, Registration, RegistrationKind};
use crate::constructor::ConstructorTable;
use crate::core::{Instance, ResolutionGuard, TypeKey};
use crate::error::{Error, Result};
use crate::resolver::ServiceResolver;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

struct RootState {
  registrations: Arc<[Registration]>,
  constructors: ConstructorTable,
  // Registration positions per service, in registration order.
  positions: HashMap<TypeKey, Vec<usize>>,
  singletons: Vec<OnceCell<Instance>>,
  root_scope: Arc<ScopeState>,
}

#[derive(Default)]
struct ScopeState {
  // Cells are created on first use and initialized outside the map's lock,
  // so a scoped factory can resolve other scoped services.
  scoped: DashMap<usize, Arc<OnceCell<Instance>>>,
}

/// Resolves services from a frozen set of registrations.
///
/// Cloning is cheap and yields a handle to the same scope. Use
/// [`create_scope`](Self::create_scope) for a fresh set of scoped instances.
#[derive(Clone)]
pub struct ServiceProvider {
  root: Arc<RootState>,
  scope: Arc<ScopeState>,
}

impl ServiceProvider {
  pub(crate) fn new(registrations: Vec<Registration>, constructors: ConstructorTable) -> Self {
    let mut positions: HashMap<TypeKey, Vec<usize>> = HashMap::new();
    for (position, registration) in registrations.iter().enumerate() {
      positions
        .entry(*registration.service())
        .or_default()
        .push(position);
    }
    let singletons = registrations.iter().map(|_| OnceCell::new()).collect();
    let root_scope = Arc::new(ScopeState::default());

    tracing::debug!(
      registrations = registrations.len(),
      constructors = constructors.len(),
      "built service provider"
    );

    Self {
      root: Arc::new(RootState {
        registrations: registrations.into(),
        constructors,
        positions,
        singletons,
        root_scope: Arc::clone(&root_scope),
      }),
      scope: root_scope,
    }
  }

  /// Opens a new scope. Singletons are shared with the parent, scoped
  /// services are created afresh.
  pub fn create_scope(&self) -> ServiceProvider {
    ServiceProvider {
      root: Arc::clone(&self.root),
      scope: Arc::new(ScopeState::default()),
    }
  }

  /// The registrations this provider was built from, in registration order.
  pub fn registrations(&self) -> &[Registration] {
    &self.root.registrations
  }

  pub fn constructors(&self) -> &ConstructorTable {
    &self.root.constructors
  }

  /// Whether at least one registration exists for `service`.
  pub fn is_registered(&self, service: &TypeKey) -> bool {
    self.root.positions.contains_key(service)
  }

  // --- Resolution ---

  /// Resolves the last registration for `service`, or `Ok(None)` if there is
  /// none.
  pub fn get_service(&self, service: &TypeKey) -> Result<Option<Instance>> {
    match self.root.positions.get(service).and_then(|p| p.last()) {
      Some(&position) => self.produce(position).map(Some),
      None => Ok(None),
    }
  }

  /// Resolves every registration for `service`, in registration order. An
  /// unregistered service yields an empty list; only a failing registration
  /// yields an error.
  pub fn try_get_all(&self, service: &TypeKey) -> Result<Vec<Instance>> {
    match self.root.positions.get(service) {
      Some(positions) => positions
        .iter()
        .map(|&position| self.produce(position))
        .collect(),
      None => Ok(Vec::new()),
    }
  }

  pub fn get<T: ?Sized + Any + Send + Sync>(&self) -> Result<Option<Arc<T>>> {
    ServiceResolver::get::<T>(self)
  }

  pub fn get_required<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    ServiceResolver::get_required::<T>(self)
  }

  pub fn get_all<T: ?Sized + Any + Send + Sync>(&self) -> Result<Vec<Arc<T>>> {
    Ok(
      self
        .try_get_all(&TypeKey::of::<T>())?
        .into_iter()
        .filter_map(|instance| instance.downcast::<T>().ok())
        .collect(),
    )
  }

  // --- PRIVATE HELPERS ---

  fn root_provider(&self) -> ServiceProvider {
    ServiceProvider {
      root: Arc::clone(&self.root),
      scope: Arc::clone(&self.root.root_scope),
    }
  }

  fn produce(&self, position: usize) -> Result<Instance> {
    let registration = &self.root.registrations[position];
    let _guard = ResolutionGuard::enter(Arc::as_ptr(&self.root) as usize, registration.service())?;

    match registration.lifetime() {
      Lifetime::Singleton => {
        let root = self.root_provider();
        self.root.singletons[position]
          .get_or_try_init(|| root.create(registration))
          .cloned()
      }
      Lifetime::Scoped => {
        let cell = Arc::clone(&self.scope.scoped.entry(position).or_default());
        cell.get_or_try_init(|| self.create(registration)).cloned()
      }
      Lifetime::Transient => self.create(registration),
    }
  }

  fn create(&self, registration: &Registration) -> Result<Instance> {
    tracing::trace!(
      service = %registration.service(),
      lifetime = ?registration.lifetime(),
      "creating instance"
    );
    match registration.kind() {
      RegistrationKind::Instance(instance) => Ok(instance.clone()),
      RegistrationKind::Factory(factory) => factory(self),
      RegistrationKind::Implementation { implementation, .. } => {
        let built = self.construct(implementation)?;
        registration
          .upcast(built)
          .ok_or(Error::ConstructionFailed(*registration.service()))
      }
    }
  }

  // Builds `implementation` from its single declared constructor. Unlike a
  // test resolver, every parameter must resolve.
  fn construct(&self, implementation: &TypeKey) -> Result<Instance> {
    let constructor = match self.root.constructors.get(implementation) {
      [] => return Err(Error::NoConstructor(*implementation)),
      [constructor] => constructor,
      many => {
        return Err(Error::AmbiguousConstructor {
          service: *implementation,
          count: many.len(),
        })
      }
    };

    let args = constructor
      .params()
      .iter()
      .map(|param| match self.get_service(param)? {
        Some(instance) => Ok(Some(instance)),
        None => Err(Error::MissingDependency {
          service: *implementation,
          dependency: *param,
        }),
      })
      .collect::<Result<Vec<_>>>()?;

    // A constructor declared for one type may still build another.
    constructor
      .invoke(args)
      .filter(|instance| instance.key() == implementation)
      .ok_or(Error::ConstructionFailed(*implementation))
  }
}

impl ServiceResolver for ServiceProvider {
  type Error = Error;

  fn get_service(&self, service: &TypeKey) -> Result<Option<Instance>> {
    ServiceProvider::get_service(self, service)
  }
}

impl fmt::Debug for ServiceProvider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ServiceProvider")
      .field("registrations", &self.root.registrations.len())
      .field("scoped", &self.scope.scoped.len())
      .finish()
  }
}
