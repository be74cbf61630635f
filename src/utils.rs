use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use clap::{builder::PossibleValue, ArgMatches, ValueEnum};
use stderrlog::Timestamp;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    None,
}

impl LogLevel {
    fn verbosity(&self) -> Option<usize> {
        match self {
            Self::None => None,
            l => Some(*l as usize),
        }
    }
}

impl ValueEnum for LogLevel {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self::Error,
            Self::Warn,
            Self::Info,
            Self::Debug,
            Self::Trace,
            Self::None,
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::None => "none",
        }))
    }
}

pub fn init_log(m: &ArgMatches) {
    let level = m
        .get_one::<LogLevel>("loglevel")
        .copied()
        .expect("Missing default argument");
    let quiet = m.get_flag("quiet");
    let ts = m
        .get_one::<Timestamp>("timestamp")
        .cloned()
        .unwrap_or(Timestamp::Off);

    let verbosity = level.verbosity();
    stderrlog::new()
        .quiet(quiet || verbosity.is_none())
        .verbosity(verbosity.unwrap_or(0))
        .timestamp(ts)
        .init()
        .expect("Could not initialize logging");
}

/// Append suffix to a path (`asm.gfa` -> `asm.gfa.fasta`)
pub fn with_suffix(p: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(p.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}
