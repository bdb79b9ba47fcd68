use crate::activator::{Activator, InstanceActivateFn};
use crate::resolver::TestResolver;
use std::fmt;
use std::sync::Arc;
use unitdi_ioc::{Instance, ServiceCollection, TypeKey};

/// A builder for creating a [`TestResolver`] from a populated collection.
pub struct TestResolverBuilder {
  services: ServiceCollection,
  activators: Vec<Activator>,
  instance_activator: Option<Arc<InstanceActivateFn>>,
}

impl TestResolverBuilder {
  pub fn new(services: ServiceCollection) -> Self {
    Self {
      services,
      activators: Vec::new(),
      instance_activator: None,
    }
  }

  /// Adds an activator. When several are declared for the same type, the
  /// one added first is used.
  pub fn activator(mut self, activator: Activator) -> Self {
    self.activators.push(activator);
    self
  }

  pub fn activators(mut self, activators: impl IntoIterator<Item = Activator>) -> Self {
    self.activators.extend(activators);
    self
  }

  /// Routes every constructor-based build through `instance_activator`.
  ///
  /// It receives the type being built and its constructor arguments, already
  /// resolved (`None` where unresolved), and must return an instance of that
  /// type. `None`, or an instance of another type, fails the build with
  /// [`Error::ConstructionFailed`](crate::Error::ConstructionFailed).
  /// Activators for a specific type still take priority.
  pub fn instance_activator(
    mut self,
    instance_activator: impl Fn(&TypeKey, Vec<Option<Instance>>) -> Option<Instance>
      + Send
      + Sync
      + 'static,
  ) -> Self {
    self.instance_activator = Some(Arc::new(instance_activator));
    self
  }

  /// Builds the container and wraps it. Every call yields an independent
  /// resolver; nothing is cached between them.
  pub fn build(self) -> TestResolver {
    TestResolver::new(self.services.build(), self.activators)
      .with_instance_activator(self.instance_activator)
  }
}

impl fmt::Debug for TestResolverBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TestResolverBuilder")
      .field("registrations", &self.services.len())
      .field("activators", &self.activators)
      .field("instance_activator", &self.instance_activator.is_some())
      .finish()
  }
}

/// Builds a [`TestResolver`] straight from a [`ServiceCollection`].
pub trait BuildTestResolver {
  fn build_test_resolver(self) -> TestResolver;

  fn build_test_resolver_with(self, activators: impl IntoIterator<Item = Activator>)
    -> TestResolver;
}

impl BuildTestResolver for ServiceCollection {
  fn build_test_resolver(self) -> TestResolver {
    TestResolverBuilder::new(self).build()
  }

  fn build_test_resolver_with(
    self,
    activators: impl IntoIterator<Item = Activator>,
  ) -> TestResolver {
    TestResolverBuilder::new(self).activators(activators).build()
  }
}
