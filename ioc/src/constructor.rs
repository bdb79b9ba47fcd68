//! Constructor declarations: how to build a concrete type from its dependencies.
//!
//! Rust has no runtime view of a type's constructors, so the test author
//! declares them instead. A type with an entry in the [`ConstructorTable`] is
//! *concrete*; everything else, including every `dyn Trait`, is treated as
//! abstract and can only be obtained through a registration.

use crate::core::{Instance, TypeKey};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type BuildFn = dyn Fn(Vec<Option<Instance>>) -> Option<Instance> + Send + Sync;

/// One declared constructor: its parameter types and a type-erased body.
#[derive(Clone)]
pub struct Constructor {
  params: Vec<TypeKey>,
  build: Arc<BuildFn>,
}

impl Constructor {
  /// Declares a constructor for `T` taking the dependencies `D`.
  ///
  /// Every dependency reaches `build` as an `Option<Arc<_>>`, so a
  /// constructor must tolerate `None` for dependencies that could not be
  /// provided.
  pub fn new<T, D, F>(build: F) -> Self
  where
    T: Any + Send + Sync,
    D: Dependencies + 'static,
    F: Fn(D::Args) -> T + Send + Sync + 'static,
  {
    Self {
      params: D::keys(),
      build: Arc::new(move |args: Vec<Option<Instance>>| {
        Some(Instance::new(Arc::new(build(D::extract(args)))))
      }),
    }
  }

  /// The "no declared constructor" case: builds `T::default()`.
  pub fn default_of<T: Default + Any + Send + Sync>() -> Self {
    Self {
      params: Vec::new(),
      build: Arc::new(|_: Vec<Option<Instance>>| {
        Some(Instance::new(Arc::new(T::default())))
      }),
    }
  }

  /// Declares a constructor over type-erased instances. `build` receives one
  /// entry per key in `params`, in order, and may refuse by returning `None`.
  pub fn untyped(
    params: Vec<TypeKey>,
    build: impl Fn(Vec<Option<Instance>>) -> Option<Instance> + Send + Sync + 'static,
  ) -> Self {
    Self {
      params,
      build: Arc::new(build),
    }
  }

  pub fn params(&self) -> &[TypeKey] {
    &self.params
  }

  pub fn invoke(&self, args: Vec<Option<Instance>>) -> Option<Instance> {
    (self.build)(args)
  }
}

impl fmt::Debug for Constructor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Constructor")
      .field("params", &self.params)
      .finish_non_exhaustive()
  }
}

/// All constructors declared for each concrete type, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ConstructorTable {
  entries: HashMap<TypeKey, Vec<Constructor>>,
}

impl ConstructorTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a constructor for `service`. Declaring a second one makes the type
  /// ambiguous; resolving it then fails instead of picking one.
  pub fn insert(&mut self, service: TypeKey, constructor: Constructor) {
    self.entries.entry(service).or_default().push(constructor);
  }

  /// The constructors declared for `service`; empty for abstract types.
  pub fn get(&self, service: &TypeKey) -> &[Constructor] {
    self
      .entries
      .get(service)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  pub fn is_concrete(&self, service: &TypeKey) -> bool {
    !self.get(service).is_empty()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// A single constructor parameter. Implemented for `Arc<P>`, which is how a
/// dependency on `P` (sized or `dyn Trait`) is spelled.
pub trait Param {
  type Item;

  fn key() -> TypeKey;
  fn extract(instance: Option<Instance>) -> Self::Item;
}

impl<P: ?Sized + Any + Send + Sync> Param for Arc<P> {
  type Item = Option<Arc<P>>;

  fn key() -> TypeKey {
    TypeKey::of::<P>()
  }

  fn extract(instance: Option<Instance>) -> Self::Item {
    instance.and_then(|instance| instance.downcast::<P>().ok())
  }
}

/// The parameter list of a constructor: `()` or a tuple of up to eight
/// [`Param`]s, e.g. `(Arc<dyn Engine>, Arc<Config>)`.
pub trait Dependencies {
  type Args;

  fn keys() -> Vec<TypeKey>;
  fn extract(args: Vec<Option<Instance>>) -> Self::Args;
}

impl Dependencies for () {
  type Args = ();

  fn keys() -> Vec<TypeKey> {
    Vec::new()
  }

  fn extract(_: Vec<Option<Instance>>) -> Self::Args {}
}

macro_rules! impl_dependencies {
  ($($param:ident),+) => {
    impl<$($param: Param),+> Dependencies for ($($param,)+) {
      type Args = ($($param::Item,)+);

      fn keys() -> Vec<TypeKey> {
        vec![$($param::key()),+]
      }

      fn extract(args: Vec<Option<Instance>>) -> Self::Args {
        let mut args = args.into_iter();
        ($($param::extract(args.next().flatten()),)+)
      }
    }
  };
}

impl_dependencies!(P0);
impl_dependencies!(P0, P1);
impl_dependencies!(P0, P1, P2);
impl_dependencies!(P0, P1, P2, P3);
impl_dependencies!(P0, P1, P2, P3, P4);
impl_dependencies!(P0, P1, P2, P3, P4, P5);
impl_dependencies!(P0, P1, P2, P3, P4, P5, P6);
impl_dependencies!(P0, P1, P2, P3, P4, P5, P6, P7);

#[cfg(test)]
mod tests {
  use super::*;

  trait Engine: Send + Sync {}
  struct Diesel;
  impl Engine for Diesel {}

  struct Truck {
    engine: Option<Arc<dyn Engine>>,
    load: Option<Arc<u32>>,
  }

  #[test]
  fn constructor_declares_param_keys_in_order() {
    let ctor = Constructor::new::<Truck, (Arc<dyn Engine>, Arc<u32>), _>(|(engine, load)| Truck {
      engine,
      load,
    });
    assert_eq!(
      ctor.params(),
      &[TypeKey::of::<dyn Engine>(), TypeKey::of::<u32>()]
    );
  }

  #[test]
  fn missing_args_arrive_as_none() {
    let ctor = Constructor::new::<Truck, (Arc<dyn Engine>, Arc<u32>), _>(|(engine, load)| Truck {
      engine,
      load,
    });
    let engine: Arc<dyn Engine> = Arc::new(Diesel);
    let built = ctor
      .invoke(vec![Some(Instance::new(engine)), None])
      .unwrap()
      .downcast::<Truck>()
      .ok()
      .unwrap();
    assert!(built.engine.is_some());
    assert!(built.load.is_none());
  }

  #[test]
  fn second_constructor_makes_type_ambiguous() {
    let mut table = ConstructorTable::new();
    let key = TypeKey::of::<String>();
    assert!(!table.is_concrete(&key));

    table.insert(key, Constructor::default_of::<String>());
    assert_eq!(table.get(&key).len(), 1);

    table.insert(key, Constructor::new::<String, (), _>(|()| "other".to_string()));
    assert_eq!(table.get(&key).len(), 2);
    assert_eq!(table.len(), 1);
  }
}
