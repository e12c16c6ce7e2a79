use std::io::{self, BufRead, ErrorKind, Read, Write};
use std::sync::atomic::AtomicBool;

use color_eyre::eyre::WrapErr;
use tracing::{debug, warn};

use crate::buffer::TransferBuffer;
use crate::config::Settings;
use crate::metrics::clock::Timestamp;
use crate::metrics::Session;
use crate::signal::is_interrupted;
use crate::status::Units;
use crate::summary::Summary;

/// Why the transfer loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    EndOfInput,
    Cancelled,
    ReadFailed,
    WriteFailed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub bytes: u64,
    pub chunks: u64,
    pub reason: StopReason,
}

#[derive(Clone, Copy, Debug)]
enum Direction {
    Read,
    Write,
}

impl Direction {
    fn stop_reason(self) -> StopReason {
        match self {
            Direction::Read => StopReason::ReadFailed,
            Direction::Write => StopReason::WriteFailed,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Direction::Read => "read from input failed",
            Direction::Write => "write to output failed",
        }
    }
}

/// The relay: copies input to output chunk by chunk while keeping the
/// session counters and the status display up to date.
pub struct App<S: Write> {
    settings: Settings,
    sink: S,
    line_end: char,
    session: Session,
    buffer: TransferBuffer,
    chunks: u64,
}

impl<S: Write> App<S> {
    pub fn new(settings: Settings, sink: S, line_end: char) -> color_eyre::Result<Self> {
        let start = Timestamp::now().wrap_err("failed to read the monotonic clock")?;
        let buffer = TransferBuffer::allocate(settings.buffer_size)?;
        debug!(
            buffer_size = buffer.capacity(),
            display = ?settings.display,
            "relay ready"
        );
        Ok(Self {
            settings,
            sink,
            line_end,
            session: Session::new(start),
            buffer,
            chunks: 0,
        })
    }

    fn units(&self) -> Units {
        Units {
            base: self.settings.unit_base,
            scaled: self.settings.scaled,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Copy `input` to `output` until end of input, a stop request on
    /// `cancel`, or an I/O error. Under the strict policy I/O errors are
    /// returned; otherwise they only end the transfer.
    pub fn run<R, W>(
        &mut self,
        input: &mut R,
        output: &mut W,
        cancel: &AtomicBool,
    ) -> color_eyre::Result<RunReport>
    where
        R: BufRead,
        W: Write,
    {
        let reason = loop {
            if is_interrupted(cancel) {
                break StopReason::Cancelled;
            }

            // Peek so that a clean end of input never costs a read.
            match input.fill_buf() {
                Ok([]) => break StopReason::EndOfInput,
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => break self.io_failure(Direction::Read, err)?,
            }

            let n = match read_chunk(input, self.buffer.as_mut_slice()) {
                Ok(0) => break StopReason::EndOfInput,
                Ok(n) => n,
                Err(err) => break self.io_failure(Direction::Read, err)?,
            };

            let chunk = &self.buffer.as_slice()[..n];
            if let Err(err) = output.write_all(chunk).and_then(|()| output.flush()) {
                break self.io_failure(Direction::Write, err)?;
            }
            self.session.record(n);
            self.chunks += 1;

            let now = Timestamp::now().wrap_err("failed to read the monotonic clock")?;
            let units = self.units();
            let display = self.settings.display;
            if let Err(err) =
                display.on_chunk(&mut self.sink, self.line_end, &self.session, now, units)
            {
                debug!(error = %err, "status line not written");
            }
            if let Some(rate) = self.session.sample(now) {
                if let Err(err) = display.on_sample(&mut self.sink, rate) {
                    debug!(error = %err, "rate not written");
                }
            }
        };

        debug!(
            bytes = self.session.total_bytes(),
            last_sampled = self.session.last_sampled_total(),
            rate = self.session.rate(),
            chunks = self.chunks,
            ?reason,
            "transfer stopped"
        );
        Ok(RunReport {
            bytes: self.session.total_bytes(),
            chunks: self.chunks,
            reason,
        })
    }

    fn io_failure(&self, direction: Direction, err: io::Error) -> color_eyre::Result<StopReason> {
        if self.settings.policy.is_strict() {
            return Err(err).wrap_err(direction.describe());
        }
        warn!(error = %err, "{}", direction.describe());
        Ok(direction.stop_reason())
    }

    /// Emit the summary, if enabled. Returns what was reported.
    pub fn finish(&mut self) -> color_eyre::Result<Option<Summary>> {
        if !self.settings.summary {
            return Ok(None);
        }
        let end = Timestamp::now().wrap_err("failed to read the monotonic clock")?;
        let summary = Summary::new(&self.session, end);
        let units = self.units();
        if let Err(err) = summary.write_to(&mut self.sink, units, self.line_end) {
            warn!(error = %err, "failed to write summary");
        }
        Ok(Some(summary))
    }
}

/// Fill `buf` from `input` until it is full or the input ends. An error
/// after some bytes arrived is held back; the data read so far is returned
/// and the next read reports it again.
fn read_chunk<R: Read>(input: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) if filled > 0 => {
                debug!(error = %err, filled, "short chunk after read error");
                break;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
