use std::sync::Arc;

use fibre_compose::{
  ComponentBuilder, ComposeError, CompositeBridge, ServiceDescriptor, ServiceProvider,
};

// --- Test Fixtures ---
//
// One service per registration surface, mirroring how a messaging host
// composes its dependencies in practice.

struct ServiceCollectionService;
struct InternalApiService;
struct NativeApiService;

#[derive(Debug, PartialEq, Eq)]
struct Config {
  origin: &'static str,
}

fn bootstrapped_bridge() -> CompositeBridge {
  let bridge = CompositeBridge::new();
  bridge.open().unwrap();

  // Surface (a): the collection-based ledger.
  bridge
    .services()
    .unwrap()
    .add(ServiceDescriptor::singleton(|| ServiceCollectionService))
    .unwrap();

  // Surface (b): the host component registration call.
  bridge
    .register_component(ServiceDescriptor::instance(InternalApiService))
    .unwrap();

  bridge.finalize().unwrap();

  // Surface (c): the container's native API, after the merge.
  bridge.container().register_singleton(|| NativeApiService);

  bridge
}

// --- Composite Resolution Tests ---

#[test]
fn test_each_surface_resolves_identically_through_every_handle() {
  let bridge = bootstrapped_bridge();
  let resolver = bridge.resolver().unwrap();
  let container = bridge.container();

  // The ledger-registered service.
  let collection_native = container.resolve::<ServiceCollectionService>().unwrap();
  let collection_provider = resolver.get_service::<ServiceCollectionService>().unwrap();
  let collection_builder = resolver.build::<ServiceCollectionService>().unwrap();
  assert!(Arc::ptr_eq(&collection_native, &collection_provider));
  assert!(Arc::ptr_eq(&collection_native, &collection_builder));

  // The host-registered component.
  let internal_native = container.resolve::<InternalApiService>().unwrap();
  let internal_provider = resolver.get_service::<InternalApiService>().unwrap();
  let internal_builder = resolver.build::<InternalApiService>().unwrap();
  assert!(Arc::ptr_eq(&internal_native, &internal_provider));
  assert!(Arc::ptr_eq(&internal_native, &internal_builder));

  // The natively-registered service.
  let native_native = container.resolve::<NativeApiService>().unwrap();
  let native_provider = resolver.get_service::<NativeApiService>().unwrap();
  let native_builder = resolver.build::<NativeApiService>().unwrap();
  assert!(Arc::ptr_eq(&native_native, &native_provider));
  assert!(Arc::ptr_eq(&native_native, &native_builder));
}

#[test]
fn test_resolution_is_idempotent_per_handle() {
  let bridge = bootstrapped_bridge();
  let resolver = bridge.resolver().unwrap();

  // Two resolutions through the same handle never construct a second
  // instance; this is a reference-equality property, not value equality.
  let first = resolver.build::<ServiceCollectionService>().unwrap();
  let second = resolver.build::<ServiceCollectionService>().unwrap();
  assert!(Arc::ptr_eq(&first, &second));

  let first = bridge.container().resolve::<NativeApiService>().unwrap();
  let second = bridge.container().resolve::<NativeApiService>().unwrap();
  assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_cloned_resolvers_share_the_engine() {
  let bridge = bootstrapped_bridge();
  let resolver = bridge.resolver().unwrap();
  let clone = resolver.clone();
  let another = bridge.resolver().unwrap();

  let r1 = resolver.build::<InternalApiService>().unwrap();
  let r2 = clone.build::<InternalApiService>().unwrap();
  let r3 = another.build::<InternalApiService>().unwrap();

  assert!(Arc::ptr_eq(&r1, &r2));
  assert!(Arc::ptr_eq(&r1, &r3));
}

#[test]
fn test_native_registration_wins_over_ledger_entry() {
  // The same type goes through the ledger and, before finalize completes,
  // straight into the container. The native registration is the one every
  // path observes afterwards.
  let bridge = CompositeBridge::new();
  bridge.open().unwrap();
  bridge
    .services()
    .unwrap()
    .add(ServiceDescriptor::singleton(|| Config { origin: "ledger" }))
    .unwrap();
  bridge.container().register_instance(Config { origin: "native" });

  let outcome = bridge.finalize().unwrap();
  assert_eq!(outcome.skipped, 1);

  let resolver = bridge.resolver().unwrap();
  assert_eq!(bridge.container().resolve::<Config>().unwrap().origin, "native");
  assert_eq!(resolver.get_service::<Config>().unwrap().origin, "native");
  assert_eq!(resolver.build::<Config>().unwrap().origin, "native");
}

#[test]
fn test_host_component_wins_over_collection_entry() {
  let bridge = CompositeBridge::new();
  bridge.open().unwrap();
  bridge
    .services()
    .unwrap()
    .add(ServiceDescriptor::singleton(|| Config { origin: "collection" }))
    .unwrap();
  bridge
    .register_component(ServiceDescriptor::instance(Config { origin: "host" }))
    .unwrap();

  let outcome = bridge.finalize().unwrap();
  assert_eq!(outcome.skipped, 1);

  let resolver = bridge.resolver().unwrap();
  assert_eq!(resolver.build::<Config>().unwrap().origin, "host");
}

#[test]
fn test_unregistered_type_is_none_for_provider_and_error_for_builder() {
  struct NeverRegistered;

  let bridge = bootstrapped_bridge();
  let resolver = bridge.resolver().unwrap();

  assert!(resolver.get_service::<NeverRegistered>().is_none());
  assert!(matches!(
    resolver.build::<NeverRegistered>(),
    Err(ComposeError::ServiceNotFound(_))
  ));
}

#[test]
fn test_concurrent_resolution_yields_one_instance_across_handles() {
  let bridge = bootstrapped_bridge();
  let resolver = bridge.resolver().unwrap();
  let container = Arc::clone(bridge.container());

  std::thread::scope(|s| {
    let mut handles = Vec::new();
    for i in 0..16 {
      let resolver = resolver.clone();
      let container = Arc::clone(&container);
      handles.push(s.spawn(move || {
        if i % 2 == 0 {
          resolver.build::<ServiceCollectionService>().unwrap()
        } else {
          container.resolve::<ServiceCollectionService>().unwrap()
        }
      }));
    }
    let resolved: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for pair in resolved.windows(2) {
      assert!(Arc::ptr_eq(&pair[0], &pair[1]));
    }
  });
}
