use std::sync::Once;

use tracing_subscriber::fmt::writer::{BoxMakeWriter, TestWriter};
use tracing_subscriber::prelude::*;

use crate::LoggingConfig;

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber described by `config`.
///
/// Only the first call has an effect; later calls (and calls made after another subscriber was
/// installed by the host) are no-ops.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let base_layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> =
            match (config.json, config.stderr) {
                (_, false) => tracing_subscriber::layer::Identity::new().boxed(),
                (true, true) => tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(stderr_writer())
                    .with_ansi(false)
                    .boxed(),
                (false, true) => tracing_subscriber::fmt::layer()
                    .with_writer(stderr_writer())
                    .with_ansi(false)
                    .boxed(),
            };

        let subscriber = tracing_subscriber::registry().with(filter).with(base_layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!(
                target: crate::CONFIG_TARGET,
                level = %config.level,
                json = config.json,
                "tracing initialized"
            );
        }
    });
}

/// `cargo test` only captures output written through `eprint!`, so debug builds log through
/// `TestWriter` and release builds write to stderr directly.
fn stderr_writer() -> BoxMakeWriter {
    if cfg!(debug_assertions) {
        BoxMakeWriter::new(TestWriter::with_stderr)
    } else {
        BoxMakeWriter::new(std::io::stderr)
    }
}
