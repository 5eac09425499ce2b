//! # Fibre Compose
//!
//! A thread-safe composition bridge that unifies three independent service
//! registration surfaces over a single IoC resolution surface.
//!
//! Applications rarely register every dependency through one API. A
//! collection-based registry gathers descriptors during configuration, a
//! host framework registers its own components, and some services are
//! registered straight against the container. Fibre Compose reconciles the
//! three into one resolution graph without duplicating singleton
//! instances: whichever surface registered a service, and whichever handle
//! resolves it, a singleton resolves to the same allocation.
//!
//! ## Core Concepts
//!
//! - **Registration Ledger**: an append-only record of
//!   [`ServiceDescriptor`]s collected before the graph is finalized.
//! - **Native Container**: the resolution engine owning the authoritative
//!   singleton cache.
//! - **Merge**: at finalize, sealed ledgers replay into the engine;
//!   entries the engine already holds are skipped, so container-native
//!   registrations win.
//! - **Composite Resolver**: the delegation-only lookup surface, also
//!   satisfying the [`ServiceProvider`] and [`ComponentBuilder`]
//!   contracts.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_compose::{ComposeError, CompositeBridge, ServiceDescriptor, ServiceProvider};
//!
//! struct Mailer {
//!   from: String,
//! }
//!
//! fn main() -> Result<(), ComposeError> {
//!   let bridge = CompositeBridge::new();
//!   bridge.open()?;
//!
//!   // Register through the collection-based ledger.
//!   bridge.services()?.add(ServiceDescriptor::singleton(|| Mailer {
//!     from: "noreply@example.com".into(),
//!   }))?;
//!
//!   bridge.finalize()?;
//!
//!   // Registrations straight against the engine are also visible, and
//!   // take precedence for keys both surfaces declare.
//!   bridge.container().register_instance(42u32);
//!
//!   let resolver = bridge.resolver()?;
//!   let mailer = resolver.get_service::<Mailer>().expect("registered above");
//!   assert_eq!(mailer.from, "noreply@example.com");
//!   assert_eq!(*resolver.get_service::<u32>().expect("registered above"), 42);
//!   Ok(())
//! }
//! ```

mod adapter;
mod bridge;
mod container;
mod core;
mod descriptor;
mod error;
mod ledger;
mod resolver;

pub use crate::adapter::{merge_ledger, MergeOutcome, NativeRegistry};
pub use crate::bridge::{BridgeBuilder, CompositeBridge, Phase};
pub use crate::container::NativeContainer;
pub use crate::core::{ServiceKey, SharedInstance};
pub use crate::descriptor::{Lifetime, ServiceDescriptor};
pub use crate::error::{ComposeError, Result};
pub use crate::ledger::{DuplicatePolicy, LedgerSnapshot, RegistrationLedger};
pub use crate::resolver::{ComponentBuilder, CompositeResolver, NativeResolve, ServiceProvider};
