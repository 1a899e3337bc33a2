/// Tracing subscriber setup for hosts embedding the tab shelf.
use tracing_subscriber::EnvFilter;

/// Installs a formatted tracing subscriber.
///
/// The filter is read from `RUST_LOG`, falling back to `default_filter`
/// (e.g. `"info"` or `"tab_shelf_core=debug"`). Returns `false` when a
/// global subscriber was already installed, so repeated calls are harmless.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected_quietly() {
        init_tracing("debug");
        assert!(!init_tracing("info"));
    }
}
