//! Subscriber setup for the binary
//!
//! The subscriber is installed before the config file is read so config
//! loading can log. Its filter sits behind a reload layer and is switched to
//! the configured level afterwards, unless `RUST_LOG` was given.

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, reload, util::SubscriberInitExt};

pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Filter showing this crate's events at `level`
pub fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("m3u_merge={}", level.to_ascii_lowercase()))
}

/// Install the global subscriber
///
/// Returns no handle when `RUST_LOG` is set; that filter is never replaced.
pub fn init(initial_level: &str) -> Option<FilterHandle> {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();

    let (filter_layer, handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| crate_filter(initial_level)));
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer())
        .init();

    (!from_env).then_some(handle)
}

/// Switch the running filter to `level`
pub fn apply_level(handle: &FilterHandle, level: &str) -> Result<(), reload::Error> {
    handle.reload(crate_filter(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_filter_is_scoped_and_lowercased() {
        assert_eq!(crate_filter("DEBUG").to_string(), "m3u_merge=debug");
    }

    #[test]
    fn test_apply_level_replaces_filter() {
        let (_layer, handle) = reload::Layer::<EnvFilter, Registry>::new(crate_filter("info"));

        apply_level(&handle, "warn").unwrap();

        let current = handle.with_current(|filter| filter.to_string()).unwrap();
        assert_eq!(current, "m3u_merge=warn");
    }

    #[test]
    fn test_apply_level_fails_once_subscriber_is_gone() {
        let (layer, handle) = reload::Layer::<EnvFilter, Registry>::new(crate_filter("info"));
        drop(layer);
        assert!(apply_level(&handle, "debug").is_err());
    }
}
