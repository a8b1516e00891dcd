use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Quiet the pool and HTTP client internals unless RUST_LOG asks for them
const NOISY_TARGETS: &str = "sqlx=warn,hyper=warn,reqwest=warn";

fn file_appender(config: &AppConfig) -> RollingFileAppender {
    match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
        _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
    }
}

fn filter_directive(config: &AppConfig) -> String {
    format!("{},{}", config.log_level, NOISY_TARGETS)
}

/// Install the global subscriber; keep the guard alive until exit
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(config));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        let file_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).init();
    } else {
        let file_layer = fmt::layer()
            .with_target(false)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = fmt::layer().with_target(false).with_ansi(true);
        registry.with(file_layer).with(stdout_layer).init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_parses() {
        let config = AppConfig::from_yaml(
            r#"
log_level: "debug"
log_dir: "./logs"
log_file: "ledger.log"
use_json: false
rotation: "never"
gateway:
  host: "127.0.0.1"
  port: 8080
"#,
        )
        .unwrap();

        let directive = filter_directive(&config);
        assert!(directive.starts_with("debug,"));
        assert!(EnvFilter::try_new(&directive).is_ok());
    }
}
