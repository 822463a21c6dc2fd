use crate::error::{AnalystError, Result};
use chrono::Local;
use env_logger::{Builder, Env};
use log::{Level, LevelFilter, Record};
use std::io::Write;
use yansi::Paint;

const CRATE_TARGET: &str = "repo_analyst::";

/// Names accepted by `--log-level`
pub const LEVEL_NAMES: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

/// Initializes console logging for the command-line front end
///
/// `level` is the default; `RUST_LOG` overrides it when set. HTTP client
/// internals stay at `warn` so `debug` shows the analysis stages only.
pub fn init(level: LevelFilter) -> Result<()> {
    let env = Env::default()
        .filter("RUST_LOG")
        .write_style_or("RUST_LOG_STYLE", "auto");

    Builder::new()
        .filter_level(level)
        .filter_module("hyper", LevelFilter::Warn)
        .filter_module("reqwest", LevelFilter::Warn)
        .parse_env(env)
        .format(|buf, record| writeln!(buf, "{}", format_log(record)))
        .try_init()
        .map_err(|e| AnalystError::Config(format!("Logger already initialized: {}", e)))
}

/// Renders one record as `HH:MM:SS.mmm LEVEL target: message`
///
/// Targets inside this crate lose their `repo_analyst::` prefix.
pub fn format_log(record: &Record) -> String {
    let level = match record.level() {
        Level::Error => Paint::red("ERROR").bold(),
        Level::Warn => Paint::yellow("WARN ").bold(),
        Level::Info => Paint::green("INFO ").bold(),
        Level::Debug => Paint::blue("DEBUG"),
        Level::Trace => Paint::new("TRACE").dimmed(),
    };

    let target = match record.target() {
        "" => record.module_path().unwrap_or("repo_analyst"),
        target => target,
    };
    let target = target.strip_prefix(CRATE_TARGET).unwrap_or(target);

    format!(
        "{} {} {}: {}",
        Local::now().format("%H:%M:%S%.3f"),
        level,
        Paint::cyan(target),
        record.args()
    )
}

/// Parses a `--log-level` value; unknown names are rejected with the accepted list
pub fn parse_log_level(level: &str) -> std::result::Result<LevelFilter, String> {
    let name = level.trim().to_ascii_lowercase();
    if !LEVEL_NAMES.contains(&name.as_str()) {
        return Err(format!(
            "unknown log level `{}`, expected one of: {}",
            level,
            LEVEL_NAMES.join(", ")
        ));
    }
    name.parse().map_err(|_| format!("unknown log level `{}`", level))
}
