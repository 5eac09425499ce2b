//! The unified resolution surface and the host-facing contracts it
//! satisfies.

use std::any::Any;
use std::sync::Arc;

use crate::core::{downcast_shared, ServiceKey, SharedInstance};
use crate::error::{ComposeError, Result};

/// Object-safe resolution contract of the engine.
///
/// This is the one canonical lookup seam; every other resolution surface
/// is a thin view over an `Arc<dyn NativeResolve>`.
pub trait NativeResolve: Send + Sync {
  /// Resolves the type-erased instance registered under `key`.
  fn resolve_erased(&self, key: &ServiceKey) -> Result<SharedInstance>;
}

/// Generic provider contract: absence yields `None` instead of an error.
pub trait ServiceProvider {
  fn get_service<T: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<T>>;
}

/// Host resolver contract used to construct handler components: absence
/// propagates as an error.
pub trait ComponentBuilder {
  fn build<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>>;
}

/// The unified lookup surface over one finalized engine.
///
/// Holds no cache of its own; every call delegates to the wrapped engine,
/// which owns the authoritative singleton cache. Cloning the resolver
/// clones the handle, not the registrations.
#[derive(Clone)]
pub struct CompositeResolver {
  native: Arc<dyn NativeResolve>,
}

impl CompositeResolver {
  pub fn new(native: Arc<dyn NativeResolve>) -> Self {
    Self { native }
  }

  /// Resolves a service, failing with [`ComposeError::ServiceNotFound`]
  /// when no registration exists for the type.
  pub fn resolve<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    let key = ServiceKey::of::<T>();
    let shared = self.native.resolve_erased(&key)?;
    downcast_shared::<T>(shared).ok_or(ComposeError::ServiceNotFound(key.type_name()))
  }
}

impl ServiceProvider for CompositeResolver {
  fn get_service<T: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.resolve::<T>().ok()
  }
}

impl ComponentBuilder for CompositeResolver {
  fn build<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    self.resolve::<T>()
  }
}
