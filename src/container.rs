//! The native resolution engine: a thread-safe registry of type-erased
//! providers with an authoritative singleton cache.

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::adapter::NativeRegistry;
use crate::core::{downcast_shared, Provider, ServiceKey, SharedInstance};
use crate::descriptor::{Lifetime, ServiceDescriptor};
use crate::error::{ComposeError, Result};
use crate::resolver::NativeResolve;

/// The container owning every registration and the singleton instance
/// cache.
///
/// Registration uses last-write-wins semantics: inserting a provider for a
/// key that is already present replaces the previous provider. Resolution
/// is safe for concurrent readers, and singleton first-construction is
/// guarded so the factory runs at most once.
#[derive(Default)]
pub struct NativeContainer {
  providers: DashMap<ServiceKey, Provider>,
}

impl NativeContainer {
  pub fn new() -> Self {
    Self::default()
  }

  // --- Native registration API ---

  /// Registers an already-constructed singleton instance.
  pub fn register_instance<T: Any + Send + Sync>(&self, instance: T) {
    self.register(ServiceDescriptor::instance(instance));
  }

  /// Registers a lazily-constructed singleton.
  pub fn register_singleton<T: Any + Send + Sync>(&self, factory: impl Fn() -> T + Send + Sync + 'static) {
    self.register(ServiceDescriptor::singleton(factory));
  }

  /// Registers a singleton against a trait, resolved as `Arc<dyn Trait>`.
  /// Name the trait explicitly, as in
  /// `container.register_singleton_trait::<dyn Greeter, _>(..)`.
  pub fn register_singleton_trait<I, F>(&self, factory: F)
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn() -> Arc<I> + Send + Sync + 'static,
  {
    self.register(ServiceDescriptor::singleton_trait::<I, F>(factory));
  }

  /// Registers a service constructed anew on every resolution.
  pub fn register_transient<T: Any + Send + Sync>(&self, factory: impl Fn() -> T + Send + Sync + 'static) {
    self.register(ServiceDescriptor::transient(factory));
  }

  /// Registers a pre-built descriptor. The last registration for a key
  /// wins.
  pub fn register(&self, descriptor: ServiceDescriptor) {
    let (key, provider) = descriptor.into_parts();
    debug!(service = key.type_name(), "service registered natively");
    self.providers.insert(key, provider);
  }

  // --- Native resolution API ---

  /// Resolves a service, failing with [`ComposeError::ServiceNotFound`]
  /// when no registration exists for the type.
  pub fn resolve<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    let key = ServiceKey::of::<T>();
    let shared = self.resolve_erased(&key)?;
    downcast_shared::<T>(shared).ok_or(ComposeError::ServiceNotFound(key.type_name()))
  }

  pub fn contains<T: ?Sized + Any>(&self) -> bool {
    self.providers.contains_key(&ServiceKey::of::<T>())
  }

  pub fn contains_key(&self, key: &ServiceKey) -> bool {
    self.providers.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.providers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.providers.is_empty()
  }

  /// Drops every provider, releasing the cached singleton instances.
  ///
  /// Resolutions after disposal fail with
  /// [`ComposeError::ServiceNotFound`]. Callers sequence disposal after
  /// in-flight resolutions complete.
  pub fn dispose(&self) {
    let released = self.providers.len();
    self.providers.clear();
    debug!(released, "container disposed");
  }
}

impl NativeRegistry for NativeContainer {
  fn supports(&self, _lifetime: Lifetime) -> bool {
    true
  }

  fn holds(&self, key: &ServiceKey) -> bool {
    self.providers.contains_key(key)
  }

  fn adopt(&self, descriptor: ServiceDescriptor) {
    self.register(descriptor);
  }
}

impl NativeResolve for NativeContainer {
  fn resolve_erased(&self, key: &ServiceKey) -> Result<SharedInstance> {
    let provider = self
      .providers
      .get(key)
      .ok_or(ComposeError::ServiceNotFound(key.type_name()))?;
    Ok(provider.get())
  }
}
