use fibre_compose::{ComponentBuilder, ComposeError, CompositeBridge, ServiceProvider};

struct NeverRegistered;

fn main() -> Result<(), ComposeError> {
  let bridge = CompositeBridge::new();
  bridge.open()?;
  bridge.finalize()?;
  let resolver = bridge.resolver()?;

  // The generic provider surface reports absence as None.
  let provider_view = resolver.get_service::<NeverRegistered>();
  println!("provider view of an absent service: {:?}", provider_view.is_none());

  // The host builder surface propagates the failure instead.
  match resolver.build::<NeverRegistered>() {
    Ok(_) => unreachable!("the service was never registered"),
    Err(err) => println!("builder view of an absent service: {err}"),
  }

  Ok(())
}
