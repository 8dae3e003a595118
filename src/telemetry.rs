use tokio::task::JoinHandle;
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

use crate::config::Stage;

/// Compose the subscriber for the given stage.
///
/// `RUST_LOG` takes precedence over `default_filter`. Production emits bunyan
/// JSON records, development emits the plain fmt output.
pub fn build_telemetry<Sink>(
    stage: Stage,
    name: String,
    default_filter: String,
    sink: Sink,
) -> Box<dyn Subscriber + Send + Sync>
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match stage {
        Stage::Prod => Box::new(
            Registry::default()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(name, sink)),
        ),
        Stage::Dev => Box::new(
            Registry::default()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(sink)),
        ),
    }
}

/// Register telemetry as global default to process span data.
///
/// It should only be called once
pub fn register_telemetry(subscriber: Box<dyn Subscriber + Send + Sync>) {
    subscriber.init();
}

/// Default filter: our own crate at info, teloxide only when something is wrong.
pub fn default_filter() -> String {
    format!("{}=info,teloxide=warn", env!("CARGO_CRATE_NAME"))
}

pub fn spawn_blocking_with_tracing<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let current_span = tracing::Span::current();
    tokio::task::spawn_blocking(move || current_span.in_scope(f))
}
