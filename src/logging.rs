use std::env;
use std::sync::OnceLock;

use log::{LevelFilter, Metadata, Record};

use crate::config::LOG_ENV_VAR;

/// Level selection parsed from `HEXFLEET_LOG`.
///
/// The value is a comma-separated list of directives. A bare level sets the
/// default; `target=level` overrides it for a module path and everything
/// below it, e.g. `warn,hexfleet::rules=debug`. The longest matching target
/// wins. Unparseable directives are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    default: LevelFilter,
    targets: Vec<(String, LevelFilter)>,
}

impl LogFilter {
    pub fn parse(directives: &str) -> Self {
        let mut filter = LogFilter::default();
        for directive in directives.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.split_once('=') {
                Some((target, level)) => {
                    if let Ok(level) = level.trim().parse() {
                        filter.targets.push((target.trim().to_string(), level));
                    }
                }
                None => {
                    if let Ok(level) = directive.parse() {
                        filter.default = level;
                    }
                }
            }
        }
        // longest prefix first so `level_for` can stop at the first match
        filter.targets.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        filter
    }

    /// Level that applies to records from `target`.
    pub fn level_for(&self, target: &str) -> LevelFilter {
        self.targets
            .iter()
            .find(|(prefix, _)| {
                target == prefix
                    || target
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with("::"))
            })
            .map_or(self.default, |(_, level)| *level)
    }

    /// Most verbose level any target can reach.
    pub fn max_level(&self) -> LevelFilter {
        self.targets
            .iter()
            .map(|(_, level)| *level)
            .fold(self.default, Ord::max)
    }
}

impl Default for LogFilter {
    fn default() -> Self {
        LogFilter {
            default: LevelFilter::Info,
            targets: Vec::new(),
        }
    }
}

struct StdoutLogger;

static FILTER: OnceLock<LogFilter> = OnceLock::new();

impl log::Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let level = FILTER
            .get()
            .map_or(LevelFilter::Info, |f| f.level_for(metadata.target()));
        metadata.level() <= level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{} [{}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StdoutLogger = StdoutLogger;

/// Install the stdout logger with levels taken from `HEXFLEET_LOG`.
/// Defaults to `info` everywhere if the variable is not set. Safe to call twice.
pub fn init_logging() {
    let filter = FILTER.get_or_init(|| {
        env::var(LOG_ENV_VAR)
            .map(|raw| LogFilter::parse(&raw))
            .unwrap_or_default()
    });
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(filter.max_level()));
}
