//! Service descriptors: what to register, under which key, with which
//! lifetime.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::core::{Provider, ServiceKey, SharedInstance};

/// How long an instance produced for a service key stays alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifetime {
  /// One instance per container lifetime; every resolution returns the
  /// same allocation.
  Singleton,
  /// A fresh instance per resolution.
  Transient,
}

/// An immutable registration record: a service key, a lifetime, and the
/// instance or factory that backs it.
///
/// Descriptors are created through the typed constructors and never
/// modified afterwards. They are consumed when handed to a registry.
pub struct ServiceDescriptor {
  key: ServiceKey,
  provider: Provider,
}

impl ServiceDescriptor {
  /// A singleton backed by an already-constructed instance.
  pub fn instance<T: Any + Send + Sync>(instance: T) -> Self {
    Self {
      key: ServiceKey::of::<T>(),
      provider: Provider::Singleton {
        cell: OnceCell::with_value(Arc::new(Arc::new(instance)) as SharedInstance),
        factory: Box::new(|| panic!("pre-initialized singleton factory should not be called")),
      },
    }
  }

  /// A singleton constructed lazily on first resolution.
  pub fn singleton<T: Any + Send + Sync>(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
    Self {
      key: ServiceKey::of::<T>(),
      provider: Provider::Singleton {
        cell: OnceCell::new(),
        factory: Box::new(move || Arc::new(Arc::new(factory())) as SharedInstance),
      },
    }
  }

  /// A singleton registered against a trait and resolved as a trait
  /// object. The factory supplies the `Arc<dyn Trait>` directly; name the
  /// trait explicitly, as in
  /// `ServiceDescriptor::singleton_trait::<dyn Greeter, _>(..)`.
  pub fn singleton_trait<I, F>(factory: F) -> Self
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn() -> Arc<I> + Send + Sync + 'static,
  {
    Self {
      key: ServiceKey::of::<I>(),
      provider: Provider::Singleton {
        cell: OnceCell::new(),
        factory: Box::new(move || Arc::new(factory()) as SharedInstance),
      },
    }
  }

  /// A service constructed anew on every resolution.
  pub fn transient<T: Any + Send + Sync>(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
    Self {
      key: ServiceKey::of::<T>(),
      provider: Provider::Transient {
        factory: Box::new(move || Arc::new(Arc::new(factory())) as SharedInstance),
      },
    }
  }

  pub fn key(&self) -> ServiceKey {
    self.key
  }

  pub fn lifetime(&self) -> Lifetime {
    match self.provider {
      Provider::Singleton { .. } => Lifetime::Singleton,
      Provider::Transient { .. } => Lifetime::Transient,
    }
  }

  pub(crate) fn into_parts(self) -> (ServiceKey, Provider) {
    (self.key, self.provider)
  }
}

impl fmt::Debug for ServiceDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ServiceDescriptor")
      .field("key", &self.key)
      .field("lifetime", &self.lifetime())
      .finish()
  }
}
