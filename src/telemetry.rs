//! Subscriber setup: a stderr sink, an optional rolling file sink, one filter.
//!
//! Audit events on `contacts::audit` pass the default filter at every
//! verbosity, so an enabled log file keeps a history of every mutation.

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::metadata::LevelFilter;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::{FileLoggingConfig, LogFormat, LogRotation, LoggingConfig};
use crate::paths;
use crate::store::audit::AUDIT_TARGET;

const LOG_FILE_PREFIX: &str = "contacts.log";
const SECS_PER_DAY: u64 = 24 * 60 * 60;

pub const LOG_ENV: &str = "CONTACTS_LOG";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    pub verbosity: u8,
    pub logging: LoggingConfig,
}

impl TelemetryConfig {
    pub fn new(verbosity: u8, logging: LoggingConfig) -> Self {
        Self { verbosity, logging }
    }
}

/// Keeps the file writer alive; dropping it flushes buffered lines.
pub struct TelemetryGuard {
    _file: Option<WorkerGuard>,
}

pub fn init(config: TelemetryConfig) -> TelemetryGuard {
    let filter = build_filter(
        config.verbosity,
        std::env::var(LOG_ENV).ok(),
        config.logging.filter.as_deref(),
    );

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.logging.stderr {
        let ansi = std::io::stderr().is_terminal();
        layers.push(format_layer(
            config.logging.stderr_format,
            std::io::stderr,
            ansi,
        ));
    }

    let file = &config.logging.file;
    let sink = file.enabled.then(|| FileSink::open(file));
    let mut file_guard = None;
    let mut deferred = None;
    match sink {
        Some(Ok(sink)) => {
            layers.push(format_layer(file.format, sink.writer, false));
            file_guard = Some(sink.guard);
            deferred = Some(sink.pruned);
        }
        Some(Err(err)) => deferred = Some(Err(err)),
        None => {}
    }

    layers.push(Box::new(filter));
    Registry::default().with(layers).init();

    // Reported only once a subscriber exists to receive it.
    match deferred {
        Some(Ok(0)) | None => {}
        Some(Ok(removed)) => tracing::debug!(removed, "old log files pruned"),
        Some(Err(err)) => tracing::warn!("file logging: {err}"),
    }

    TelemetryGuard { _file: file_guard }
}

/// `CONTACTS_LOG` wins, then the configured filter, then the `-v` level with
/// audit lines switched on.
fn build_filter(verbosity: u8, env: Option<String>, configured: Option<&str>) -> EnvFilter {
    let directives = env
        .filter(|directives| !directives.trim().is_empty())
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| default_directives(verbosity));
    EnvFilter::builder()
        .with_default_directive(level_from_verbosity(verbosity).into())
        .parse_lossy(directives)
}

fn default_directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    format!("{level},{AUDIT_TARGET}=info")
}

fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

fn format_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::fmt;

    match format {
        LogFormat::Tree => Box::new(
            tracing_tree::HierarchicalLayer::new(2)
                .with_ansi(ansi)
                .with_writer(writer),
        ),
        LogFormat::Pretty => Box::new(fmt::layer().pretty().with_ansi(ansi).with_writer(writer)),
        LogFormat::Compact => Box::new(fmt::layer().compact().with_ansi(ansi).with_writer(writer)),
        LogFormat::Json => Box::new(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(writer),
        ),
    }
}

/// Rolling `contacts.log.*` files in the configured or default log dir.
struct FileSink {
    writer: NonBlocking,
    guard: WorkerGuard,
    pruned: Result<usize, String>,
}

impl FileSink {
    fn open(config: &FileLoggingConfig) -> Result<Self, String> {
        let dir = config.dir.clone().unwrap_or_else(paths::log_dir);
        fs::create_dir_all(&dir)
            .map_err(|err| format!("cannot create log dir {}: {err}", dir.display()))?;

        let pruned = prune(&dir, Retention::from_config(config), SystemTime::now())
            .map_err(|err| format!("log retention failed in {}: {err}", dir.display()));

        let rotation = match config.rotation {
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Minutely => Rotation::MINUTELY,
            LogRotation::Never => Rotation::NEVER,
        };
        let appender = RollingFileAppender::new(rotation, &dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        Ok(Self {
            writer,
            guard,
            pruned,
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Retention {
    max_age: Option<Duration>,
    max_files: Option<usize>,
}

impl Retention {
    fn from_config(config: &FileLoggingConfig) -> Self {
        Self {
            max_age: config
                .retention_max_age_days
                .map(|days| Duration::from_secs(days.saturating_mul(SECS_PER_DAY))),
            max_files: config.retention_max_files,
        }
    }

    /// Files to drop, oldest first: everything past `max_age`, and the
    /// oldest survivors beyond `max_files`.
    fn expired(&self, mut logs: Vec<(SystemTime, PathBuf)>, now: SystemTime) -> Vec<PathBuf> {
        logs.sort();
        let too_old = self.max_age.map_or(0, |max_age| {
            logs.iter()
                .take_while(|(modified, _)| {
                    now.duration_since(*modified).unwrap_or_default() > max_age
                })
                .count()
        });
        let too_many = self
            .max_files
            .map_or(0, |max_files| logs.len().saturating_sub(max_files));
        logs.into_iter()
            .take(too_old.max(too_many))
            .map(|(_, path)| path)
            .collect()
    }
}

/// Remove expired `contacts.log*` files from `dir`; returns how many went.
fn prune(dir: &Path, retention: Retention, now: SystemTime) -> std::io::Result<usize> {
    if retention == Retention::default() {
        return Ok(0);
    }
    let mut logs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_log = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX));
        let meta = entry.metadata()?;
        if is_log && meta.is_file() {
            logs.push((meta.modified().unwrap_or(now), entry.path()));
        }
    }
    Ok(retention
        .expired(logs, now)
        .into_iter()
        .filter(|path| fs::remove_file(path).is_ok())
        .count())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn at(now: SystemTime, secs_ago: u64, name: &str) -> (SystemTime, PathBuf) {
        (now - Duration::from_secs(secs_ago), PathBuf::from(name))
    }

    #[test]
    fn expired_drops_old_files_then_oldest_beyond_count() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(100_000);
        let logs = vec![
            at(now, 5, "d"),
            at(now, 90_000, "a"),
            at(now, 40, "c"),
            at(now, 500, "b"),
        ];

        let by_age = Retention {
            max_age: Some(Duration::from_secs(SECS_PER_DAY)),
            max_files: None,
        };
        assert_eq!(by_age.expired(logs.clone(), now), vec![PathBuf::from("a")]);

        let by_count = Retention {
            max_age: Some(Duration::from_secs(SECS_PER_DAY)),
            max_files: Some(2),
        };
        assert_eq!(
            by_count.expired(logs, now),
            vec![PathBuf::from("a"), PathBuf::from("b")]
        );
    }

    #[test]
    fn unlimited_retention_keeps_everything() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("contacts.log.2026-01-01"), "x").expect("write log");
        let removed =
            prune(dir.path(), Retention::default(), SystemTime::now()).expect("prune");
        assert_eq!(removed, 0);
        assert!(dir.path().join("contacts.log.2026-01-01").exists());
    }

    #[test]
    fn prune_only_touches_log_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("contacts.log.2026-01-01"), "x").expect("write log");
        fs::write(dir.path().join("contacts.json"), "[]").expect("write doc");
        let retention = Retention {
            max_age: None,
            max_files: Some(0),
        };
        let removed = prune(dir.path(), retention, SystemTime::now()).expect("prune");
        assert_eq!(removed, 1);
        assert!(dir.path().join("contacts.json").exists());
    }

    #[test]
    fn default_directives_enable_audit_lines() {
        assert_eq!(default_directives(0), "error,contacts::audit=info");
        assert_eq!(default_directives(2), "debug,contacts::audit=info");
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_from_verbosity(0), LevelFilter::ERROR);
        assert_eq!(level_from_verbosity(1), LevelFilter::INFO);
        assert_eq!(level_from_verbosity(5), LevelFilter::DEBUG);
    }
}
