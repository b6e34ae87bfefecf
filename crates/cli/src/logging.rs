//! Logger setup for the `gg` binary.

use std::sync::Once;

static INIT: Once = Once::new();

/// Level used when `RUST_LOG` is unset.
pub fn default_level(verbose: bool) -> log::LevelFilter {
    if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    }
}

/// Initializes the global logger once; later calls are ignored.
///
/// `RUST_LOG` wins over `verbose` when set.
pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        match std::env::var("RUST_LOG") {
            Ok(filter) => {
                builder.parse_filters(&filter);
            }
            Err(_) => {
                builder.filter_level(default_level(verbose));
            }
        }
        builder.format_timestamp(None).init();
        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_default_level_to_debug() {
        assert_eq!(default_level(false), log::LevelFilter::Warn);
        assert_eq!(default_level(true), log::LevelFilter::Debug);
    }

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(false);
        init_logging(true);
    }
}
