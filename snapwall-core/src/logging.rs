//! Tracing setup.

use std::io;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::LoggingConfig;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set. The `json` format
/// is for production collectors; anything else gets the pretty
/// human-readable output. An optional log file receives the same layer
/// instead of stderr.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    if !matches!(
        config.level.to_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "warning" | "error"
    ) {
        anyhow::bail!("Invalid log level: {}", config.level);
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = match config.file_path.as_deref() {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            build_layer(config, std::sync::Arc::new(file))
        }
        None => build_layer(config, io::stderr),
    };

    tracing_subscriber::registry().with(filter).with(layer).init();
    Ok(())
}

fn build_layer<S, W>(config: &LoggingConfig, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_writer(writer);

    if config.format == "json" {
        base.json()
            .with_current_span(true)
            .with_line_number(true)
            .with_file(true)
            .boxed()
    } else {
        base.pretty().with_file(false).boxed()
    }
}
