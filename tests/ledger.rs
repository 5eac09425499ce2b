use fibre_compose::{
  merge_ledger, ComposeError, DuplicatePolicy, NativeContainer, RegistrationLedger, ServiceDescriptor,
};
use pretty_assertions::assert_eq;

// --- Test Fixtures ---

#[derive(Debug, PartialEq, Eq)]
struct Config {
  id: u32,
}

struct AuditSink;

// --- Ledger Tests ---

#[test]
fn test_add_after_seal_fails() {
  // Arrange
  let ledger = RegistrationLedger::new();
  ledger.add(ServiceDescriptor::singleton(|| Config { id: 1 })).unwrap();
  let _snapshot = ledger.seal().unwrap();

  // Act
  let result = ledger.add(ServiceDescriptor::singleton(|| AuditSink));

  // Assert: a sealed ledger always rejects, never silently succeeds.
  assert!(matches!(result, Err(ComposeError::LedgerSealed)));
}

#[test]
fn test_second_seal_fails() {
  let ledger = RegistrationLedger::new();
  let _snapshot = ledger.seal().unwrap();

  assert!(matches!(ledger.seal(), Err(ComposeError::LedgerSealed)));
}

#[test]
fn test_snapshot_keeps_last_registration_per_key() {
  // Arrange
  let ledger = RegistrationLedger::new();
  ledger.add(ServiceDescriptor::singleton(|| Config { id: 1 })).unwrap();
  ledger.add(ServiceDescriptor::singleton(|| Config { id: 2 })).unwrap();
  ledger.add(ServiceDescriptor::singleton(|| AuditSink)).unwrap();
  assert_eq!(ledger.len(), 3);

  // Act
  let snapshot = ledger.seal().unwrap();

  // Assert: the duplicate Config entry collapsed to the later one.
  assert_eq!(snapshot.len(), 2);
  let container = NativeContainer::new();
  merge_ledger(snapshot, &container).unwrap();
  assert_eq!(container.resolve::<Config>().unwrap().id, 2);
}

#[test]
fn test_strict_policy_rejects_duplicate_singleton() {
  let ledger = RegistrationLedger::with_policy(DuplicatePolicy::Strict);
  ledger.add(ServiceDescriptor::singleton(|| Config { id: 1 })).unwrap();

  let result = ledger.add(ServiceDescriptor::singleton(|| Config { id: 2 }));

  assert!(matches!(result, Err(ComposeError::DuplicateSingleton(_))));
  // The original registration survives.
  assert_eq!(ledger.len(), 1);
}

#[test]
fn test_strict_policy_accepts_distinct_types() {
  let ledger = RegistrationLedger::with_policy(DuplicatePolicy::Strict);
  ledger.add(ServiceDescriptor::singleton(|| Config { id: 1 })).unwrap();
  ledger.add(ServiceDescriptor::singleton(|| AuditSink)).unwrap();

  assert_eq!(ledger.seal().unwrap().len(), 2);
}

#[test]
fn test_strict_policy_only_guards_singletons() {
  // Transient registrations may repeat even under the strict policy; only
  // singleton identity is at stake.
  let ledger = RegistrationLedger::with_policy(DuplicatePolicy::Strict);
  ledger.add(ServiceDescriptor::transient(|| Config { id: 1 })).unwrap();
  ledger.add(ServiceDescriptor::transient(|| Config { id: 2 })).unwrap();

  let snapshot = ledger.seal().unwrap();
  assert_eq!(snapshot.len(), 1);
}

#[test]
fn test_empty_ledger_seals_to_empty_snapshot() {
  let ledger = RegistrationLedger::new();
  assert!(ledger.is_empty());

  let snapshot = ledger.seal().unwrap();

  assert!(snapshot.is_empty());
}
