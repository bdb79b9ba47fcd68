//! # unitdi
//!
//! Resolve the type under test even when some of its dependencies are not
//! registered.
//!
//! A [`TestResolver`] wraps a regular [`ServiceProvider`]. Anything the
//! container can resolve comes from the container. Anything it can't is built
//! from its declared constructor, with `None` standing in for each dependency
//! nobody provides, unless an [`Activator`] was supplied for that type.
//!
//! ## Resolution order
//!
//! For a requested type the resolver tries, in order:
//!
//! 1. the container, if it holds exactly one resolvable registration;
//! 2. an activator declared for the type;
//! 3. the type's single declared constructor, resolving every parameter the
//!    same way;
//! 4. the implementation type of a registration for the type, built as in 2-3;
//! 5. otherwise `None`.
//!
//! Only an ambiguous constructor (more than one declared) and an activator or
//! constructor that produces nothing are errors.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use unitdi::{Activator, BuildTestResolver, ServiceCollection};
//!
//! trait Vehicle: Send + Sync {
//!     fn run(&self) -> bool;
//! }
//! trait Painter: Send + Sync {}
//!
//! struct Car;
//! impl Vehicle for Car {
//!     fn run(&self) -> bool {
//!         true
//!     }
//! }
//!
//! struct VehicleFactory {
//!     vehicle: Option<Arc<dyn Vehicle>>,
//!     painter: Option<Arc<dyn Painter>>,
//! }
//!
//! let mut services = ServiceCollection::new();
//! services
//!     .add_constructor::<VehicleFactory, (Arc<dyn Vehicle>, Arc<dyn Painter>), _>(
//!         |(vehicle, painter)| VehicleFactory { vehicle, painter },
//!     )
//!     .add_scoped::<VehicleFactory>();
//!
//! let resolver =
//!     services.build_test_resolver_with([Activator::new::<dyn Vehicle>(|| Some(Arc::new(Car)))]);
//!
//! let factory = resolver.get_required::<VehicleFactory>().unwrap();
//! assert!(factory.vehicle.as_ref().unwrap().run());
//! assert!(factory.painter.is_none());
//! ```

mod activator;
mod builder;
mod error;
mod macros;
mod resolver;

pub use activator::Activator;
pub use builder::{BuildTestResolver, TestResolverBuilder};
pub use error::{Error, Result};
pub use resolver::TestResolver;

pub use unitdi_ioc::{
  Constructor, ConstructorTable, Dependencies, Instance, Lifetime, Param, Registration,
  ServiceCollection, ServiceNotFound, ServiceProvider, ServiceResolver, TypeKey,
};
