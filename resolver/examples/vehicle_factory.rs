use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use unitdi::{Activator, ServiceCollection, TestResolver};

trait Vehicle: Send + Sync {
  fn run(&self) -> bool;
}

trait User: Send + Sync {
  fn name(&self) -> &str;
}

trait Painter: Send + Sync {
  fn signature(&self) -> String;
}

struct Car;
impl Vehicle for Car {
  fn run(&self) -> bool {
    true
  }
}

struct Outsource {
  name: String,
}
impl User for Outsource {
  fn name(&self) -> &str {
    &self.name
  }
}

struct Workshop {
  user: Option<Arc<dyn User>>,
}
impl Painter for Workshop {
  fn signature(&self) -> String {
    match &self.user {
      Some(user) => format!("painted by {}", user.name()),
      None => "unsigned".to_string(),
    }
  }
}

struct VehicleFactory {
  vehicle: Option<Arc<dyn Vehicle>>,
  painter: Option<Arc<dyn Painter>>,
}

fn main() -> unitdi::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "unitdi=debug".into()))
    .init();

  let mut services = ServiceCollection::new();
  services
    .add_constructor::<VehicleFactory, (Arc<dyn Vehicle>, Arc<dyn Painter>), _>(
      |(vehicle, painter)| VehicleFactory { vehicle, painter },
    )
    .add_scoped::<VehicleFactory>()
    .add_instance::<dyn User>(Arc::new(Outsource {
      name: "Vince".to_string(),
    }));

  // Vehicle comes from a plain activator, Painter from one that looks up the
  // registered User through the resolver.
  let resolver = TestResolver::builder(services)
    .activator(Activator::new::<dyn Vehicle>(|| Some(Arc::new(Car))))
    .activator(Activator::with_resolver::<dyn Painter>(
      |resolver: &TestResolver| {
        let user = resolver.get::<dyn User>()?;
        Ok(Some(Arc::new(Workshop { user })))
      },
    ))
    .build();

  let factory = resolver.get_required::<VehicleFactory>()?;
  let runs = factory.vehicle.as_ref().is_some_and(|vehicle| vehicle.run());
  let signature = factory
    .painter
    .as_ref()
    .map(|painter| painter.signature())
    .unwrap_or_default();

  println!("vehicle runs: {runs}");
  println!("{signature}");
  Ok(())
}
