//! Public macros for ergonomic service resolution in tests.

/// Resolves a service from any [`ServiceResolver`](unitdi_ioc::ServiceResolver),
/// yielding `Option<Arc<_>>`.
///
/// A missing service is `None`, which is what tests assert on. A resolution
/// error is not expected in a well-formed test, so it panics.
///
/// # Panics
///
/// Panics with the service's type name if the resolver returns an error, for
/// instance on an ambiguous constructor.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use unitdi::{resolve, BuildTestResolver, ServiceCollection};
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// let mut services = ServiceCollection::new();
/// services.add_instance::<dyn Greeter>(Arc::new(EnglishGreeter));
/// let resolver = services.build_test_resolver();
///
/// // Resolve the trait object
/// let greeter = resolve!(resolver, trait Greeter).unwrap();
/// assert_eq!(greeter.greet(), "Hello!");
///
/// // Nothing is registered for `String`
/// assert!(resolve!(resolver, String).is_none());
/// ```
#[macro_export]
macro_rules! resolve {
  // Arm for resolving a trait object: resolve!(resolver, trait MyTrait)
  // `:ident` rather than `:ty`, so that `dyn` can be put in front of it.
  ($resolver:expr, trait $trait_ident:ident) => {{
    #[allow(unused_imports)]
    use $crate::ServiceResolver as _;
    $resolver
      .get::<dyn $trait_ident>()
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve trait service {}: {}",
          std::any::type_name::<dyn $trait_ident>(),
          err
        )
      })
  }};

  // Arm for resolving a concrete type: resolve!(resolver, MyService)
  ($resolver:expr, $type:ty) => {{
    #[allow(unused_imports)]
    use $crate::ServiceResolver as _;
    $resolver.get::<$type>().unwrap_or_else(|err| {
      panic!(
        "Failed to resolve service {}: {}",
        std::any::type_name::<$type>(),
        err
      )
    })
  }};
}
