//! Bootstrap state machine tying the registration surfaces, the merge
//! step, and the composite resolver together.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::adapter::{merge_ledger, MergeOutcome};
use crate::container::NativeContainer;
use crate::descriptor::ServiceDescriptor;
use crate::error::{ComposeError, Result};
use crate::ledger::{DuplicatePolicy, RegistrationLedger};
use crate::resolver::{CompositeResolver, NativeResolve};

/// Phases of the composite bootstrap.
///
/// Transitions never skip a phase: `open` moves `Unconfigured` to
/// `LedgerOpen`; `finalize` seals the ledgers (`LedgerSealed`) and merges
/// them (`Merged`); constructing the first resolver enters `Resolving`,
/// which holds for the process lifetime until `dispose` terminates the
/// bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Unconfigured,
  LedgerOpen,
  LedgerSealed,
  Merged,
  Resolving,
  Disposed,
}

/// Builder for a [`CompositeBridge`].
///
/// An externally managed container can be supplied with
/// [`container`](Self::container); otherwise the bridge owns a fresh one.
#[derive(Default)]
pub struct BridgeBuilder {
  container: Option<Arc<NativeContainer>>,
  policy: DuplicatePolicy,
}

impl BridgeBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn container(mut self, container: Arc<NativeContainer>) -> Self {
    self.container = Some(container);
    self
  }

  pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn build(self) -> CompositeBridge {
    CompositeBridge {
      phase: Mutex::new(Phase::Unconfigured),
      services: RegistrationLedger::with_policy(self.policy),
      components: RegistrationLedger::with_policy(self.policy),
      container: self.container.unwrap_or_default(),
    }
  }
}

/// Orchestrates the three registration surfaces over one engine.
///
/// Two ledgers accumulate pre-finalize registrations: the collection
/// surface ([`services`](Self::services)) and the host component surface
/// ([`register_component`](Self::register_component)). The third surface
/// is the engine's own API, reachable through
/// [`container`](Self::container) at any point. At finalize the host
/// ledger merges first, then the collection ledger; keys the engine
/// already holds are skipped. The resulting precedence order is:
/// container-native, then host component, then collection entry.
pub struct CompositeBridge {
  phase: Mutex<Phase>,
  services: RegistrationLedger,
  components: RegistrationLedger,
  container: Arc<NativeContainer>,
}

impl CompositeBridge {
  pub fn builder() -> BridgeBuilder {
    BridgeBuilder::new()
  }

  pub fn new() -> Self {
    Self::builder().build()
  }

  pub fn phase(&self) -> Phase {
    *self.phase.lock()
  }

  /// The engine handle: the container-native registration and resolution
  /// surface.
  pub fn container(&self) -> &Arc<NativeContainer> {
    &self.container
  }

  /// Opens the registration ledgers. Idempotent while the ledgers are
  /// open; fails with [`ComposeError::LedgerSealed`] once finalize has
  /// begun.
  pub fn open(&self) -> Result<()> {
    let mut phase = self.phase.lock();
    match *phase {
      Phase::Unconfigured => {
        *phase = Phase::LedgerOpen;
        debug!("registration ledgers opened");
        Ok(())
      }
      Phase::LedgerOpen => Ok(()),
      _ => Err(ComposeError::LedgerSealed),
    }
  }

  /// The collection-based registration surface.
  pub fn services(&self) -> Result<&RegistrationLedger> {
    self.require_open()?;
    Ok(&self.services)
  }

  /// The host component registration surface.
  pub fn register_component(&self, descriptor: ServiceDescriptor) -> Result<()> {
    self.require_open()?;
    self.components.add(descriptor)
  }

  fn require_open(&self) -> Result<()> {
    match *self.phase.lock() {
      Phase::LedgerOpen => Ok(()),
      Phase::Unconfigured => Err(ComposeError::NotReady(Phase::Unconfigured)),
      _ => Err(ComposeError::LedgerSealed),
    }
  }

  /// Seals both ledgers and merges them into the engine.
  ///
  /// The host component ledger merges before the collection ledger, and
  /// keys the engine already holds are skipped, so registrations made
  /// directly against the engine before finalize are the ones observed
  /// afterwards.
  pub fn finalize(&self) -> Result<MergeOutcome> {
    {
      let mut phase = self.phase.lock();
      match *phase {
        Phase::LedgerOpen => *phase = Phase::LedgerSealed,
        Phase::Unconfigured => return Err(ComposeError::NotReady(Phase::Unconfigured)),
        _ => return Err(ComposeError::LedgerSealed),
      }
    }

    let components = self.components.seal()?;
    let services = self.services.seal()?;

    let host = merge_ledger(components, self.container.as_ref())?;
    let collection = merge_ledger(services, self.container.as_ref())?;
    let outcome = MergeOutcome {
      adopted: host.adopted + collection.adopted,
      skipped: host.skipped + collection.skipped,
    };

    *self.phase.lock() = Phase::Merged;
    debug!(adopted = outcome.adopted, skipped = outcome.skipped, "composition finalized");
    Ok(outcome)
  }

  /// Constructs the unified resolution surface over the finalized engine.
  ///
  /// The first call enters the `Resolving` phase; later calls hand out
  /// further thin views over the same engine. Fails with
  /// [`ComposeError::NotReady`] before finalize completes and after
  /// disposal.
  pub fn resolver(&self) -> Result<CompositeResolver> {
    let mut phase = self.phase.lock();
    match *phase {
      Phase::Merged => {
        *phase = Phase::Resolving;
        debug!("composite resolver constructed");
        Ok(self.view())
      }
      Phase::Resolving => Ok(self.view()),
      other => Err(ComposeError::NotReady(other)),
    }
  }

  fn view(&self) -> CompositeResolver {
    let native: Arc<dyn NativeResolve> = self.container.clone();
    CompositeResolver::new(native)
  }

  /// Terminates the bridge and releases the engine's cached singletons.
  /// Idempotent; every later resolver request fails with
  /// [`ComposeError::NotReady`].
  pub fn dispose(&self) {
    let mut phase = self.phase.lock();
    if *phase == Phase::Disposed {
      return;
    }
    *phase = Phase::Disposed;
    self.container.dispose();
  }
}

impl Default for CompositeBridge {
  fn default() -> Self {
    Self::new()
  }
}
