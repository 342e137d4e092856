use std::str::FromStr;

pub use log::*;
use once_cell::sync::OnceCell;

pub const LOG_LEVEL_ENV: &str = "CAPGRANT_LOG_LEVEL";

static LOGGER: Logger = Logger;
static LEVEL: OnceCell<LevelFilter> = OnceCell::new();

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    set_logger(&LOGGER).map(|()| {
        let _ = LEVEL.set(level);
        set_max_level(level)
    })
}

/// Level requested through `CAPGRANT_LOG_LEVEL`, `Warn` when unset or
/// unparsable.
pub fn level_from_env() -> LevelFilter {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(LevelFilter::Warn)
}

/// Raises `base` by `steps` levels, saturating at `Trace`.
pub fn raise(base: LevelFilter, steps: u64) -> LevelFilter {
    let mut level = base;
    for _ in 0..steps {
        level = match level {
            LevelFilter::Off => LevelFilter::Error,
            LevelFilter::Error => LevelFilter::Warn,
            LevelFilter::Warn => LevelFilter::Info,
            LevelFilter::Info => LevelFilter::Debug,
            LevelFilter::Debug | LevelFilter::Trace => LevelFilter::Trace,
        };
    }
    level
}

#[derive(Copy, Clone)]
struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= *LEVEL.get().unwrap_or(&LevelFilter::Off)
    }
    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }
    fn flush(&self) {}
}
