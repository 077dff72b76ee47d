use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::LoggingConfig;

/// Filter from `RUST_LOG` when set, otherwise from the configured level
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.to_string()))
}

/// Initialize the tracing subscriber.
///
/// Console output goes to stderr so that stdout stays clean for generated output. When
/// file output is enabled the returned guard must be kept alive to flush the log file.
pub fn init(config: &LoggingConfig) -> io::Result<Option<WorkerGuard>> {
    let console = config
        .console_output
        .then(|| fmt::layer().with_writer(io::stderr).with_target(false).boxed());

    let (file, guard) = if config.file_output {
        let path = Path::new(&config.file_path);
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(directory)?;
        let file_name = path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log file path has no file name"))?;

        let appender = tracing_appender::rolling::never(directory, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_writer(writer).with_ansi(false).boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(console)
        .with(file)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(guard)
}
