use std::path::PathBuf;

use clap::Parser;

use crate::status::DisplayMode;

pub const DEFAULT_BUFFER_SIZE: u32 = 819_200;

#[derive(Parser, Debug)]
#[command(
    name = "pipemeter",
    version,
    about = "Measure the speed of stdin/stdout communication",
    after_help = "Example: tar cf - dir | pipemeter | gzip > dir.tar.gz"
)]
pub struct Config {
    /// Transfer buffer size in bytes
    #[arg(short, long, default_value_t = DEFAULT_BUFFER_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub buffer_size: u32,

    /// Treat I/O and setup errors as fatal instead of ending the transfer
    #[arg(short = 'e', long)]
    pub errors_fatal: bool,

    /// Don't show the status line (the summary is still printed)
    #[arg(short, long)]
    pub quiet: bool,

    /// Show neither the status line nor the summary
    #[arg(short = 'Q', long)]
    pub silent: bool,

    /// Don't print the summary
    #[arg(short = 'o', long)]
    pub no_summary: bool,

    /// Print the raw byte rate once per second instead of the status line (implies -o)
    #[arg(short, long)]
    pub raw: bool,

    /// Write status to FILE instead of stderr, truncating it
    #[arg(short = 's', long, value_name = "FILE", conflicts_with = "status_append")]
    pub status_file: Option<PathBuf>,

    /// Write status to FILE instead of stderr, appending to it
    #[arg(short = 'S', long, value_name = "FILE")]
    pub status_append: Option<PathBuf>,

    /// Use SI units (1000) instead of binary units (1024)
    #[arg(short = 'I', long)]
    pub si: bool,

    /// Print plain byte counts without unit scaling
    #[arg(short = 'u', long)]
    pub no_units: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Errors end the transfer; the summary is still printed.
    Tolerant,
    /// Errors abort the process.
    Strict,
}

impl ErrorPolicy {
    pub fn is_strict(self) -> bool {
        self == ErrorPolicy::Strict
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusTarget {
    pub path: PathBuf,
    pub append: bool,
}

/// Validated run configuration. Fixed once the relay starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub buffer_size: usize,
    pub unit_base: u64,
    pub scaled: bool,
    pub display: DisplayMode,
    pub policy: ErrorPolicy,
    pub summary: bool,
    pub status_target: Option<StatusTarget>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE as usize,
            unit_base: 1024,
            scaled: true,
            display: DisplayMode::Fancy,
            policy: ErrorPolicy::Tolerant,
            summary: true,
            status_target: None,
        }
    }
}

impl Config {
    pub fn settings(&self) -> Settings {
        let display = if self.raw {
            DisplayMode::Raw
        } else if self.quiet || self.silent {
            DisplayMode::Silent
        } else {
            DisplayMode::Fancy
        };

        let status_target = match (&self.status_file, &self.status_append) {
            (Some(path), _) => Some(StatusTarget {
                path: path.clone(),
                append: false,
            }),
            (None, Some(path)) => Some(StatusTarget {
                path: path.clone(),
                append: true,
            }),
            (None, None) => None,
        };

        Settings {
            buffer_size: self.buffer_size as usize,
            unit_base: if self.si { 1000 } else { 1024 },
            scaled: !self.no_units,
            display,
            policy: if self.errors_fatal {
                ErrorPolicy::Strict
            } else {
                ErrorPolicy::Tolerant
            },
            summary: !(self.silent || self.no_summary || self.raw),
            status_target,
        }
    }
}
