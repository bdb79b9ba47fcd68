use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use unitdi_ioc::ServiceCollection;

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

// A singleton and a scoped tracker, told apart by wrapper types.
struct AppTracker(RequestTracker);
struct RequestScopedTracker(RequestTracker);

static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn next_tracker() -> RequestTracker {
  RequestTracker {
    id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
  }
}

fn main() {
  let mut services = ServiceCollection::new();
  // --- Singleton Registration ---
  // This factory will only be called ONCE per root provider.
  services.add_singleton_factory::<AppTracker>(|_| {
    println!("Creating SINGLETON RequestTracker...");
    Ok(Arc::new(AppTracker(next_tracker())))
  });
  // --- Scoped Registration ---
  // This factory will be called once per scope.
  services.add_scoped_factory::<RequestScopedTracker>(|_| {
    println!("Creating SCOPED RequestTracker...");
    Ok(Arc::new(RequestScopedTracker(next_tracker())))
  });
  let provider = services.build();

  println!("--- Resolving from two scopes ---");
  let first = provider.create_scope();
  let second = provider.create_scope();

  let s1 = first.get_required::<AppTracker>().expect("registered");
  let s2 = second.get_required::<AppTracker>().expect("registered");
  assert!(Arc::ptr_eq(&s1, &s2), "Singleton instances should be identical");
  println!("Singleton ID in both scopes: {}", s1.0.id);

  let r1 = first.get_required::<RequestScopedTracker>().expect("registered");
  let r1_again = first.get_required::<RequestScopedTracker>().expect("registered");
  let r2 = second.get_required::<RequestScopedTracker>().expect("registered");
  assert!(Arc::ptr_eq(&r1, &r1_again));
  assert!(!Arc::ptr_eq(&r1, &r2), "Scopes should not share scoped instances");
  println!("Scoped IDs: first = {}, second = {}", r1.0.id, r2.0.id);
}
