//! Stderr logger for the `tris-cv` crates.
//!
//! Lines look like `[  0.412s  INFO session] turn 3 (B)`. Records from other
//! crates are only shown at `warn` and above, so `-vv` debugging of the
//! pipeline is not drowned out by image decoder chatter.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const OWN_PREFIX: &str = "tris_cv";

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

fn is_own(target: &str) -> bool {
    target.starts_with(OWN_PREFIX)
}

/// Last path segment of a module target: `tris_cv::session` -> `session`.
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let limit = if is_own(metadata.target()) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        };
        metadata.level() <= limit
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{:7.3}s {:>5} {}] {}",
            self.started.elapsed().as_secs_f64(),
            record.level(),
            short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Map a `-v` count to a level: none is `warn`, one `info`, more `debug`.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Install the stderr logger.
///
/// Only the first call installs anything; later calls return `Ok(())`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StderrLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// `EnvFilter` directives used when `RUST_LOG` is unset: our crates at
/// `level`, everything else capped at `warn`.
pub fn default_directives(level: LevelFilter) -> String {
    let own = format!("{level}").to_ascii_lowercase();
    let rest = format!("{}", level.min(LevelFilter::Warn)).to_ascii_lowercase();
    format!("{rest},{OWN_PREFIX}={own}")
}

/// Install a `tracing` subscriber with our crates at `info`.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    init_tracing_with_level(json, LevelFilter::Info);
}

/// Install a `tracing` subscriber. `RUST_LOG` wins; otherwise the filter is
/// [`default_directives`] for `level`.
#[cfg(feature = "tracing")]
pub fn init_tracing_with_level(json: bool, level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    fn meta(target: &str, level: Level) -> Metadata<'_> {
        Metadata::builder().target(target).level(level).build()
    }

    #[test]
    fn foreign_crates_are_capped_at_warn() {
        let logger = StderrLogger {
            level: LevelFilter::Debug,
            started: Instant::now(),
        };
        assert!(logger.enabled(&meta("tris_cv_detect::rectify", Level::Debug)));
        assert!(!logger.enabled(&meta("png::decoder", Level::Info)));
        assert!(logger.enabled(&meta("png::decoder", Level::Warn)));
        assert!(!logger.enabled(&meta("tris_cv::session", Level::Trace)));
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Warn);
        assert_eq!(level_for_verbosity(1), LevelFilter::Info);
        assert_eq!(level_for_verbosity(4), LevelFilter::Debug);
        assert_eq!(short_target("tris_cv::session"), "session");
        assert_eq!(short_target("main"), "main");
    }

    #[test]
    fn directives_follow_verbosity() {
        assert_eq!(default_directives(level_for_verbosity(0)), "warn,tris_cv=warn");
        assert_eq!(default_directives(level_for_verbosity(2)), "warn,tris_cv=debug");
        assert_eq!(default_directives(LevelFilter::Off), "off,tris_cv=off");
    }
}
