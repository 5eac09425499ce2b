//! Append-only registration ledger, consumed exactly once at bootstrap
//! finalize.

use std::collections::HashSet;

use parking_lot::Mutex;
use tracing::trace;

use crate::descriptor::{Lifetime, ServiceDescriptor};
use crate::error::{ComposeError, Result};

/// How the ledger treats a repeated singleton registration for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DuplicatePolicy {
  /// The last registration for a service type wins.
  #[default]
  Override,
  /// A second singleton registration for the same type is rejected.
  Strict,
}

struct LedgerState {
  entries: Vec<ServiceDescriptor>,
  sealed: bool,
}

/// Ordered record of pending registrations.
///
/// Appends are serialized by a mutex because registration order determines
/// override outcomes. Once sealed, the ledger rejects every further append
/// and cannot be sealed again.
pub struct RegistrationLedger {
  policy: DuplicatePolicy,
  state: Mutex<LedgerState>,
}

impl RegistrationLedger {
  pub fn new() -> Self {
    Self::with_policy(DuplicatePolicy::Override)
  }

  pub fn with_policy(policy: DuplicatePolicy) -> Self {
    Self {
      policy,
      state: Mutex::new(LedgerState {
        entries: Vec::new(),
        sealed: false,
      }),
    }
  }

  pub fn policy(&self) -> DuplicatePolicy {
    self.policy
  }

  /// Appends a descriptor.
  ///
  /// Fails with [`ComposeError::LedgerSealed`] after [`seal`](Self::seal),
  /// and with [`ComposeError::DuplicateSingleton`] when a singleton for the
  /// same key is already recorded under [`DuplicatePolicy::Strict`].
  pub fn add(&self, descriptor: ServiceDescriptor) -> Result<()> {
    let mut state = self.state.lock();
    if state.sealed {
      return Err(ComposeError::LedgerSealed);
    }
    if self.policy == DuplicatePolicy::Strict
      && descriptor.lifetime() == Lifetime::Singleton
      && state
        .entries
        .iter()
        .any(|e| e.key() == descriptor.key() && e.lifetime() == Lifetime::Singleton)
    {
      return Err(ComposeError::DuplicateSingleton(descriptor.key().type_name()));
    }
    trace!(service = descriptor.key().type_name(), "registration recorded");
    state.entries.push(descriptor);
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.state.lock().entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.state.lock().entries.is_empty()
  }

  /// Seals the ledger and returns the immutable snapshot.
  ///
  /// The snapshot keeps only the last registration for each key. A second
  /// seal fails with [`ComposeError::LedgerSealed`].
  pub fn seal(&self) -> Result<LedgerSnapshot> {
    let mut state = self.state.lock();
    if state.sealed {
      return Err(ComposeError::LedgerSealed);
    }
    state.sealed = true;
    let entries = std::mem::take(&mut state.entries);
    Ok(LedgerSnapshot::from_entries(entries))
  }
}

impl Default for RegistrationLedger {
  fn default() -> Self {
    Self::new()
  }
}

/// The sealed, deduplicated form of a ledger, ready to merge into a native
/// registry.
pub struct LedgerSnapshot {
  entries: Vec<ServiceDescriptor>,
}

impl LedgerSnapshot {
  fn from_entries(entries: Vec<ServiceDescriptor>) -> Self {
    // Last registration for a key wins; walk backwards keeping the first
    // occurrence seen, then restore original relative order.
    let mut seen = HashSet::new();
    let mut deduped: Vec<ServiceDescriptor> = entries
      .into_iter()
      .rev()
      .filter(|descriptor| seen.insert(descriptor.key()))
      .collect();
    deduped.reverse();
    Self { entries: deduped }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
    self.entries.iter()
  }
}

impl IntoIterator for LedgerSnapshot {
  type Item = ServiceDescriptor;
  type IntoIter = std::vec::IntoIter<ServiceDescriptor>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.into_iter()
  }
}
