use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not consulted. Dependencies (macroquad,
/// rfd's portal backends) are held to warnings; the board's own events get
/// `info`, or `debug` for the stroke and command trace.
fn default_directive(debug: bool) -> &'static str {
    if debug {
        "warn,whiteboard=debug"
    } else {
        "warn,whiteboard=info"
    }
}

fn filter(debug: bool) -> EnvFilter {
    let fallback = || EnvFilter::new(default_directive(debug));
    if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    }
}

/// Installs the subscriber for the `whiteboard` binary. `RUST_LOG` is only
/// honoured in debug mode. Thread names are shown so events from the stylus
/// reader can be told apart from the render loop. A second call is a no-op.
pub fn init(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(debug))
        .with_thread_names(true)
        .with_target(debug)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_target_is_louder_than_dependencies() {
        assert_eq!(default_directive(false), "warn,whiteboard=info");
        assert_eq!(default_directive(true), "warn,whiteboard=debug");
    }

    #[test]
    fn release_filter_ignores_environment() {
        // RUST_LOG is never read outside debug mode, whatever it holds
        assert_eq!(filter(false).to_string(), EnvFilter::new("warn,whiteboard=info").to_string());
    }

    #[test]
    fn init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
