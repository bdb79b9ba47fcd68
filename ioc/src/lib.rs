//! # unitdi IoC
//!
//! A small Inversion of Control container modelled on collection/provider
//! containers: services are registered on a [`ServiceCollection`], which is
//! then frozen into a [`ServiceProvider`] that resolves them.
//!
//! ## Core Concepts
//!
//! - **ServiceCollection**: registrations plus the constructor declarations
//!   used to build implementation types.
//! - **ServiceProvider**: resolves services, honouring singleton, scoped and
//!   transient lifetimes. Missing services are `Ok(None)`, not errors.
//! - **Traits**: services can be registered against a trait and resolved as a
//!   trait object (`dyn Trait`).
//! - **Constructors**: since Rust cannot enumerate a type's constructors at
//!   runtime, implementation types declare theirs with `add_constructor`.
//!
//! ## Quick Start
//!
//! ```
//! use unitdi_ioc::ServiceCollection;
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! #[derive(Default)]
//! struct EnglishGreeter;
//!
//! impl Greeter for EnglishGreeter {
//!     fn greet(&self) -> String {
//!         "Hello, World!".to_string()
//!     }
//! }
//!
//! struct Host {
//!     greeter: Option<Arc<dyn Greeter>>,
//! }
//!
//! let mut services = ServiceCollection::new();
//! services
//!     .add_default_constructor::<EnglishGreeter>()
//!     .add_singleton_as::<dyn Greeter, EnglishGreeter>(|it| it)
//!     .add_constructor::<Host, (Arc<dyn Greeter>,), _>(|(greeter,)| Host { greeter })
//!     .add_transient::<Host>();
//!
//! let provider = services.build();
//! let host = provider.get_required::<Host>().unwrap();
//! assert_eq!(host.greeter.as_ref().unwrap().greet(), "Hello, World!");
//! ```

mod collection;
mod constructor;
mod core;
mod error;
mod provider;
mod resolver;

pub use collection::{Lifetime, Registration, ServiceCollection};
pub use constructor::{Constructor, ConstructorTable, Dependencies, Param};
pub use crate::core::{Instance, TypeKey};
pub use error::{Error, Result, ServiceNotFound};
pub use provider::ServiceProvider;
pub use resolver::ServiceResolver;
