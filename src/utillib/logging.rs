use std::{
    io::{StderrLock, Write, stderr},
    sync::atomic::{AtomicU8, Ordering},
};

use anyhow::{Result, bail};
use chrono::{DateTime, Local, TimeZone};

/// The prefix of a log line: time in RFC 3339 and the source
/// location, tab separated.
pub fn log_prefix<Tz: TimeZone>(t: &DateTime<Tz>, file: &str, line: u32, column: u32) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}\t{file}:{line}:{column}\t", t.to_rfc3339())
}

/// Locks stderr and writes the `log_prefix` for now.
pub fn write_time(file: &str, line: u32, column: u32) -> StderrLock<'static> {
    let prefix = log_prefix(&Local::now(), file, line, column);
    let mut lock = stderr().lock();
    _ = lock.write_all(prefix.as_bytes());
    lock
}

// Do *not* make the fields public here to force going through `From`/`Into`, OK?
#[derive(Debug, clap::Args)]
pub struct LogLevelOpts {
    /// Show what is being done, e.g. which charts are written
    #[clap(short, long)]
    verbose: bool,

    /// Show information that helps debug this program (implies
    /// `--verbose`)
    #[clap(short, long)]
    debug: bool,

    /// Disable warnings, including the notices about skipped
    /// charts. Conflicts with `--verbose` and `--debug`.
    #[clap(short, long)]
    quiet: bool,
}

impl TryFrom<LogLevelOpts> for LogLevel {
    type Error = anyhow::Error;

    fn try_from(value: LogLevelOpts) -> Result<Self> {
        match value {
            LogLevelOpts {
                verbose: false,
                debug: false,
                quiet: false,
            } => Ok(LogLevel::Warn),
            LogLevelOpts {
                verbose: true,
                debug: false,
                quiet: false,
            } => Ok(LogLevel::Info),
            LogLevelOpts {
                verbose: _,
                debug: true,
                quiet: false,
            } => Ok(LogLevel::Debug),
            LogLevelOpts {
                verbose: false,
                debug: false,
                quiet: true,
            } => Ok(LogLevel::Quiet),
            LogLevelOpts {
                verbose: _,
                debug: _,
                quiet: true,
            } => bail!("option `--quiet` conflicts with the options `--verbose` and `--debug`"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Do not log anything
    Quiet,
    /// The default, only "warn!" statements are outputting anything.
    Warn,
    /// Verbose execution, not for debugging this program but for
    /// giving the user information about what is going on
    Info,
    /// Highest amount of log statement, for debugging this program
    Debug,
}

impl LogLevel {
    // Not public api, only for sorting or comparisons!
    fn level(self) -> u8 {
        self as u8
    }

    fn from_level(level: u8) -> Option<Self> {
        let slf = match level {
            0 => Some(LogLevel::Quiet),
            1 => Some(LogLevel::Warn),
            2 => Some(LogLevel::Info),
            3 => Some(LogLevel::Debug),
            _ => None,
        }?;
        assert_eq!(slf.level(), level);
        Some(slf)
    }
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.level().cmp(&other.level())
    }
}

pub static LOGLEVEL: AtomicU8 = AtomicU8::new(1);

pub fn set_log_level(val: LogLevel) {
    LOGLEVEL.store(val.level(), Ordering::Relaxed);
}

#[inline]
pub fn log_level() -> LogLevel {
    let level = LOGLEVEL.load(Ordering::Relaxed);
    LogLevel::from_level(level).expect("no possibility to store invalid u8")
}

#[macro_export]
macro_rules! warn {
    { $($arg:tt)* } => {
        if $crate::utillib::logging::log_level() >= $crate::utillib::logging::LogLevel::Warn {
            use std::io::Write;
            let mut lock = $crate::utillib::logging::write_time(file!(), line!(), column!());
            _ = writeln!(&mut lock, $($arg)*);
        }
    }
}

#[macro_export]
macro_rules! info {
    { $($arg:tt)* } => {
        if $crate::utillib::logging::log_level() >= $crate::utillib::logging::LogLevel::Info {
            use std::io::Write;
            let mut lock = $crate::utillib::logging::write_time(file!(), line!(), column!());
            _ = writeln!(&mut lock, $($arg)*);
        }
    }
}

#[macro_export]
macro_rules! debug {
    { $($arg:tt)* } => {
        if $crate::utillib::logging::log_level() >= $crate::utillib::logging::LogLevel::Debug {
            use std::io::Write;
            let mut lock = $crate::utillib::logging::write_time(file!(), line!(), column!());
            _ = writeln!(&mut lock, $($arg)*);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_levels() {
        for i in 0..=3 {
            assert!(LogLevel::from_level(i).is_some());
        }
        assert!(LogLevel::from_level(4).is_none());
        assert!(LogLevel::Debug > LogLevel::Info);
        assert!(LogLevel::Quiet < LogLevel::Warn);
    }

    #[test]
    fn t_log_prefix() {
        let t = chrono::FixedOffset::east_opt(3600)
            .and_then(|tz| tz.with_ymd_and_hms(2026, 3, 1, 12, 30, 5).single())
            .expect("valid time");
        assert_eq!(
            log_prefix(&t, "src/run.rs", 221, 17),
            "2026-03-01T12:30:05+01:00\tsrc/run.rs:221:17\t"
        );
    }

    #[test]
    fn t_opts() {
        let opts = |verbose, debug, quiet| LogLevelOpts {
            verbose,
            debug,
            quiet,
        };
        assert_eq!(
            LogLevel::try_from(opts(false, false, false)).ok(),
            Some(LogLevel::Warn)
        );
        assert_eq!(
            LogLevel::try_from(opts(true, true, false)).ok(),
            Some(LogLevel::Debug)
        );
        assert!(LogLevel::try_from(opts(true, false, true)).is_err());
    }
}
