//! Subscriber setup for the moderation server.
//!
//! `RUST_LOG` wins when set; otherwise the preset's directives apply.

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::Environment;

/// Line format written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Filter directives used when `RUST_LOG` is absent
    pub directives: String,
    pub format: LogFormat,
    /// Log span open/close; noisy, so development only
    pub span_events: bool,
    pub source_location: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            directives: "info,sqlx=warn".to_string(),
            format: LogFormat::Pretty,
            span_events: false,
            source_location: true,
        }
    }
}

impl TracingConfig {
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                directives: "debug,sqlx=info,hyper=info,tower_http=debug".to_string(),
                span_events: true,
                ..Self::default()
            },
            Environment::Staging => Self::default(),
            Environment::Production => Self {
                format: LogFormat::Json,
                source_location: false,
                ..Self::default()
            },
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.directives))
    }

    fn layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        let layer = fmt::layer()
            .with_file(self.source_location)
            .with_line_number(self.source_location)
            .with_span_events(if self.span_events {
                FmtSpan::NEW | FmtSpan::CLOSE
            } else {
                FmtSpan::NONE
            });

        match self.format {
            LogFormat::Pretty => layer.boxed(),
            LogFormat::Json => layer.json().with_current_span(true).boxed(),
        }
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(config: &TracingConfig) -> Result<(), TracingError> {
    tracing_subscriber::registry()
        .with(config.filter())
        .with(config.layer())
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
