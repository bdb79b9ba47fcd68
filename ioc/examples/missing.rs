use std::sync::Arc;
use unitdi_ioc::{Error, ServiceCollection};

struct UnregisteredService;

struct Dashboard {
  _service: Option<Arc<UnregisteredService>>,
}

fn main() {
  let mut services = ServiceCollection::new();
  services
    .add_constructor::<Dashboard, (Arc<UnregisteredService>,), _>(|(service,)| Dashboard {
      _service: service,
    })
    .add_scoped::<Dashboard>();
  let provider = services.build();

  // --- A service that was never registered ---
  println!("Attempting to resolve a service that was never registered...");
  match provider.get::<UnregisteredService>() {
    Ok(None) => println!("Correctly received `None` for the missing service."),
    other => panic!("Should not have found the service: {:?}", other.map(|s| s.is_some())),
  }

  // --- `get_required` turns absence into an error ---
  match provider.get_required::<UnregisteredService>() {
    Err(Error::NotFound(missing)) => println!("get_required failed as expected: {}", missing),
    _ => panic!("get_required should have failed"),
  }

  // --- A registered service whose dependency is missing ---
  println!("\nNow resolving a registered service with an unregistered dependency...");
  match provider.get::<Dashboard>() {
    Err(err @ Error::MissingDependency { .. }) => println!("Container refused: {}", err),
    _ => panic!("Dashboard should not be buildable by the container"),
  }
}
