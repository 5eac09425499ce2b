use std::sync::Arc;

use fibre_compose::{
  ComponentBuilder, ComposeError, CompositeBridge, ServiceDescriptor, ServiceProvider,
};

// Three services, one per registration surface.

struct ConnectionPool {
  url: String,
}

struct SchemaCache;

struct MetricsSink;

fn main() -> Result<(), ComposeError> {
  let bridge = CompositeBridge::new();
  bridge.open()?;

  // Surface (a): the collection-based ledger, populated during
  // configuration.
  bridge.services()?.add(ServiceDescriptor::singleton(|| ConnectionPool {
    url: "postgres://localhost:5432/app".to_string(),
  }))?;

  // Surface (b): the host registers its own components.
  bridge.register_component(ServiceDescriptor::instance(SchemaCache))?;

  bridge.finalize()?;

  // Surface (c): the container's native API, still open after the merge.
  bridge.container().register_singleton(|| MetricsSink);

  let resolver = bridge.resolver()?;

  // Whichever surface registered a service, every handle observes the
  // same singleton.
  let pool_native = bridge.container().resolve::<ConnectionPool>()?;
  let pool_provider = resolver.get_service::<ConnectionPool>().expect("pool is registered");
  let pool_builder = resolver.build::<ConnectionPool>()?;

  assert!(Arc::ptr_eq(&pool_native, &pool_provider));
  assert!(Arc::ptr_eq(&pool_native, &pool_builder));
  println!("pool resolves identically through all handles: {}", pool_native.url);

  let _cache = resolver.build::<SchemaCache>()?;
  let _sink = resolver.build::<MetricsSink>()?;
  println!("host and native registrations resolve through the composite surface too");

  bridge.dispose();
  Ok(())
}
