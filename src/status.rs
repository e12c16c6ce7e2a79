use std::fs::{File, OpenOptions};
use std::io::{self, Stderr, Write};

use color_eyre::eyre::WrapErr;
use tracing::warn;

use crate::config::{ErrorPolicy, StatusTarget};
use crate::metrics::clock::Timestamp;
use crate::metrics::Session;
use crate::util::{format_elapsed, format_units, format_wall_clock};

/// Where status lines and the summary go.
pub enum StatusSink {
    Stderr(Stderr),
    File(File),
}

impl StatusSink {
    pub fn stderr() -> Self {
        StatusSink::Stderr(io::stderr())
    }

    /// Open the configured status file. Under the tolerant policy a file
    /// that can't be opened falls back to stderr.
    pub fn open(target: Option<&StatusTarget>, policy: ErrorPolicy) -> color_eyre::Result<Self> {
        let Some(target) = target else {
            return Ok(Self::stderr());
        };

        let mut options = OpenOptions::new();
        if target.append {
            options.append(true).create(true);
        } else {
            options.write(true).create(true).truncate(true);
        }

        match options.open(&target.path) {
            Ok(file) => Ok(StatusSink::File(file)),
            Err(err) if policy.is_strict() => Err(err)
                .wrap_err_with(|| format!("failed to open status file {}", target.path.display())),
            Err(err) => {
                warn!(path = %target.path.display(), error = %err, "failed to open status file, using stderr");
                Ok(Self::stderr())
            }
        }
    }

    /// Terminal sinks overwrite the line in place; files get one line each.
    pub fn line_end(&self) -> char {
        match self {
            StatusSink::Stderr(_) => '\r',
            StatusSink::File(_) => '\n',
        }
    }
}

impl Write for StatusSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            StatusSink::Stderr(s) => s.write(buf),
            StatusSink::File(f) => f.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            StatusSink::Stderr(s) => s.flush(),
            StatusSink::File(f) => f.flush(),
        }
    }
}

/// How progress is shown while data flows. Chosen once from the settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// One self-overwriting status line per chunk.
    Fancy,
    /// The byte rate as a bare integer, once per second.
    Raw,
    Silent,
}

/// Unit settings shared by every rendered number.
#[derive(Clone, Copy, Debug)]
pub struct Units {
    pub base: u64,
    pub scaled: bool,
}

impl Units {
    pub fn format(&self, value: u64) -> String {
        format_units(value, self.base, self.scaled)
    }
}

impl DisplayMode {
    /// Called after every transferred chunk.
    pub fn on_chunk<W: Write>(
        &self,
        sink: &mut W,
        line_end: char,
        session: &Session,
        now: Timestamp,
        units: Units,
    ) -> io::Result<()> {
        if *self != DisplayMode::Fancy {
            return Ok(());
        }
        write!(
            sink,
            "{}",
            status_line(session, now, units, &format_wall_clock(), line_end)
        )?;
        sink.flush()
    }

    /// Called when a new per-second rate has been sampled.
    pub fn on_sample<W: Write>(&self, sink: &mut W, rate: u64) -> io::Result<()> {
        if *self != DisplayMode::Raw {
            return Ok(());
        }
        writeln!(sink, "{rate}")?;
        sink.flush()
    }
}

fn status_line(
    session: &Session,
    now: Timestamp,
    units: Units,
    wall_clock: &str,
    line_end: char,
) -> String {
    format!(
        "{}: {}B {}B/second ({}){}",
        format_elapsed(session.start, now),
        units.format(session.total_bytes()),
        units.format(session.rate()),
        wall_clock,
        line_end
    )
}
