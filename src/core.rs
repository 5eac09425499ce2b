//! Core data structures for service keys, erased instances, and providers.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

/// A type-erased, shareable service instance.
///
/// The concrete payload behind the erasure is always the `Arc<T>` (or
/// `Arc<dyn Trait>`) handed to callers, so cloning the erased handle and
/// cloning the resolved handle both point at the same allocation.
pub type SharedInstance = Arc<dyn Any + Send + Sync>;

/// A type-erased factory producing a shareable instance.
pub(crate) type InstanceFactory = Box<dyn Fn() -> SharedInstance + Send + Sync>;

/// Identity of a service type within a registration table.
///
/// Equality and hashing are driven by the `TypeId`; the type name rides
/// along purely for diagnostics.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceKey {
  type_id: TypeId,
  type_name: &'static str,
}

impl ServiceKey {
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
    }
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }
}

impl fmt::Debug for ServiceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ServiceKey({})", self.type_name)
  }
}

pub(crate) enum Provider {
  Singleton {
    cell: OnceCell<SharedInstance>,
    factory: InstanceFactory,
  },
  Transient {
    factory: InstanceFactory,
  },
}

impl Provider {
  /// Returns the erased instance, constructing it on first access for
  /// singletons and on every access for transients.
  pub(crate) fn get(&self) -> SharedInstance {
    match self {
      Provider::Singleton { cell, factory } => cell.get_or_init(|| factory()).clone(),
      Provider::Transient { factory } => factory(),
    }
  }
}

/// Recovers a typed handle from an erased instance.
///
/// Returns `None` when the stored payload was registered under a
/// different type, which cannot happen through the typed constructors.
pub(crate) fn downcast_shared<T: ?Sized + Any + Send + Sync>(shared: SharedInstance) -> Option<Arc<T>> {
  shared
    .downcast::<Arc<T>>()
    .ok()
    .map(|outer| Arc::clone(&*outer))
}
