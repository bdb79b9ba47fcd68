#![allow(dead_code)]

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use unitdi::ServiceCollection;

// Routes resolver logs through the test harness. Set RUST_LOG=unitdi=trace to
// see every resolution decision.
pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

// --- Vehicle fixtures ---

pub trait Vehicle: Send + Sync {
  fn run(&self) -> bool;
}

pub trait User: Send + Sync {
  fn name(&self) -> &str;
}

pub trait Painter: Send + Sync {
  fn user(&self) -> Option<&Arc<dyn User>>;
}

pub struct Car;

impl Vehicle for Car {
  fn run(&self) -> bool {
    true
  }
}

pub struct Outsource {
  pub name: String,
}

impl User for Outsource {
  fn name(&self) -> &str {
    &self.name
  }
}

pub struct Workshop {
  pub user: Option<Arc<dyn User>>,
}

impl Painter for Workshop {
  fn user(&self) -> Option<&Arc<dyn User>> {
    self.user.as_ref()
  }
}

pub struct VehicleFactory {
  pub vehicle: Option<Arc<dyn Vehicle>>,
  pub painter: Option<Arc<dyn Painter>>,
}

/// A collection with only `VehicleFactory` registered; none of its
/// dependencies are.
pub fn vehicle_factory_services() -> ServiceCollection {
  let mut services = ServiceCollection::new();
  services
    .add_constructor::<VehicleFactory, (Arc<dyn Vehicle>, Arc<dyn Painter>), _>(
      |(vehicle, painter)| VehicleFactory { vehicle, painter },
    )
    .add_transient::<VehicleFactory>();
  services
}
