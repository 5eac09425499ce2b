//! Error taxonomy for registration, merge, and resolution failures.

use thiserror::Error;

use crate::bridge::Phase;
use crate::descriptor::Lifetime;

/// Failures surfaced by the ledger, the merge step, and the resolution
/// surfaces.
///
/// None of these are retried: they are either programmer-error conditions
/// surfaced immediately, or absence-of-registration conditions handled per
/// calling convention at the resolution boundary.
#[derive(Debug, Error)]
pub enum ComposeError {
  /// A singleton for this service type was already recorded and the ledger
  /// operates under [`DuplicatePolicy::Strict`](crate::DuplicatePolicy).
  #[error("duplicate singleton registration for service `{0}`")]
  DuplicateSingleton(&'static str),

  /// Registration was attempted after the ledger was sealed.
  #[error("registration ledger is sealed; no further registrations are accepted")]
  LedgerSealed,

  /// The declared lifetime has no equivalent in the native registry.
  #[error("service `{service}` declares lifetime {lifetime:?}, which the native registry cannot represent")]
  UnsupportedLifetime {
    service: &'static str,
    lifetime: Lifetime,
  },

  /// No registration exists for the requested service type.
  #[error("service `{0}` is not registered")]
  ServiceNotFound(&'static str),

  /// The bootstrap has not reached the phase this operation requires.
  #[error("operation attempted in bootstrap phase {0:?} before the bridge is ready")]
  NotReady(Phase),
}

pub type Result<T> = std::result::Result<T, ComposeError>;
