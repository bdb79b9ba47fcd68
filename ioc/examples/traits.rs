use std::sync::Arc;
use unitdi_ioc::ServiceCollection;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
#[derive(Default)]
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Option<Arc<dyn Logger>>,
}

impl ReportService {
  fn generate_report(&self) {
    if let Some(logger) = &self.logger {
      logger.log("Starting report generation.");
      logger.log("Finished report generation.");
    }
  }
}

fn main() {
  // --- Registration ---

  // ConsoleLogger is built with `Default` and served as `dyn Logger`.
  let mut services = ServiceCollection::new();
  services
    .add_default_constructor::<ConsoleLogger>()
    .add_singleton_as::<dyn Logger, ConsoleLogger>(|it| it);

  // ReportService declares its constructor; the provider fills in the logger.
  services
    .add_constructor::<ReportService, (Arc<dyn Logger>,), _>(|(logger,)| ReportService { logger })
    .add_transient::<ReportService>();

  // --- Resolution and Usage ---
  let provider = services.build();
  println!("Resolving the high-level service...");
  let report_service = provider
    .get_required::<ReportService>()
    .expect("ReportService and its logger are registered");

  println!("Using the service...");
  report_service.generate_report();
}
