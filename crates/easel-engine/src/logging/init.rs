use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` sets one. wgpu is
/// chatty at info level.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "easel_engine=debug,wgpu_core=warn").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = effective_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        if let Err(e) = builder.try_init() {
            eprintln!("logger already installed: {e}");
            return;
        }

        log::debug!("logging initialized (filter: {filter})");
    });
}

/// Precedence: explicit config, then `RUST_LOG`, then [`DEFAULT_FILTER`].
fn effective_filter(configured: Option<String>, env: Option<String>) -> String {
    configured
        .or(env)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_beats_environment() {
        let f = effective_filter(Some("debug".into()), Some("warn".into()));
        assert_eq!(f, "debug");
    }

    #[test]
    fn environment_used_when_config_is_silent() {
        assert_eq!(effective_filter(None, Some("warn".into())), "warn");
    }

    #[test]
    fn blank_filter_falls_back_to_default() {
        assert_eq!(effective_filter(None, None), DEFAULT_FILTER);
        assert_eq!(effective_filter(Some("  ".into()), None), DEFAULT_FILTER);
    }
}
