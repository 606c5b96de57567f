use ctor::ctor;
use tracing::Level;

// Opt-in debug logging: set GRIT_DEBUG to anything other than "", "0" or
// "false" to get a DEBUG-level subscriber installed at load time.
#[ctor]
fn init_tracing() {
    let enabled = std::env::var("GRIT_DEBUG")
        .map(|v| !(v.is_empty() || v == "0" || v == "false"))
        .unwrap_or(false);
    if enabled {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .init();
    }
}
