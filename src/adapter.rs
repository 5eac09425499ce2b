//! Merges sealed ledger snapshots into a native registry.

use tracing::debug;

use crate::core::ServiceKey;
use crate::descriptor::{Lifetime, ServiceDescriptor};
use crate::error::{ComposeError, Result};
use crate::ledger::LedgerSnapshot;

/// Registration surface of the resolution engine.
///
/// The bridge treats the engine as a black box: it only needs to know
/// whether a lifetime can be represented natively, whether a key is
/// already registered, and how to hand a descriptor over.
pub trait NativeRegistry {
  /// Whether the registry can represent `lifetime`.
  fn supports(&self, lifetime: Lifetime) -> bool;

  /// Whether a registration for `key` already exists.
  fn holds(&self, key: &ServiceKey) -> bool;

  /// Registers `descriptor` under its declared lifetime.
  fn adopt(&self, descriptor: ServiceDescriptor);
}

/// Counters describing what a merge did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeOutcome {
  /// Descriptors handed over to the registry.
  pub adopted: usize,
  /// Descriptors dropped because the registry already held their key.
  pub skipped: usize,
}

/// Replays a sealed snapshot into `registry`, preserving declared
/// lifetimes.
///
/// Keys the registry already holds are skipped, so registrations made
/// directly against the engine take precedence over ledger-sourced ones.
/// Fails with [`ComposeError::UnsupportedLifetime`] when a descriptor's
/// lifetime has no native equivalent.
pub fn merge_ledger(snapshot: LedgerSnapshot, registry: &dyn NativeRegistry) -> Result<MergeOutcome> {
  let mut outcome = MergeOutcome::default();
  for descriptor in snapshot {
    let key = descriptor.key();
    let lifetime = descriptor.lifetime();
    if !registry.supports(lifetime) {
      return Err(ComposeError::UnsupportedLifetime {
        service: key.type_name(),
        lifetime,
      });
    }
    if registry.holds(&key) {
      debug!(service = key.type_name(), "native registration takes precedence; ledger entry skipped");
      outcome.skipped += 1;
      continue;
    }
    registry.adopt(descriptor);
    outcome.adopted += 1;
  }
  debug!(adopted = outcome.adopted, skipped = outcome.skipped, "ledger snapshot merged");
  Ok(outcome)
}
