use std::io::{self, Write};

use crate::metrics::clock::Timestamp;
use crate::metrics::Session;
use crate::status::Units;
use crate::util::{average_rate, format_elapsed};

/// Wide enough to wipe a half-drawn status line before the summary.
const BLANK_LINE: &str = "                                                                               ";

/// Totals for the whole run, taken after the transfer loop has exited.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub bytes: u64,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Summary {
    pub fn new(session: &Session, end: Timestamp) -> Self {
        Self {
            bytes: session.total_bytes(),
            start: session.start,
            end,
        }
    }

    pub fn seconds(&self) -> f64 {
        self.end.seconds_since(self.start)
    }

    pub fn average_rate(&self) -> u64 {
        average_rate(self.bytes, self.seconds())
    }

    pub fn render(&self, units: Units, line_end: char) -> String {
        format!(
            "{BLANK_LINE}{line_end}Summary:\nPiped {}B in {}: {}B/second\n",
            units.format(self.bytes),
            format_elapsed(self.start, self.end),
            units.format(self.average_rate()),
        )
    }

    pub fn write_to<W: Write>(&self, sink: &mut W, units: Units, line_end: char) -> io::Result<()> {
        sink.write_all(self.render(units, line_end).as_bytes())?;
        sink.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BINARY: Units = Units {
        base: 1024,
        scaled: true,
    };

    fn summary(bytes: u64, start: (i64, i64), end: (i64, i64)) -> Summary {
        Summary {
            bytes,
            start: Timestamp::new(start.0, start.1),
            end: Timestamp::new(end.0, end.1),
        }
    }

    #[test]
    fn two_mebibytes_in_two_seconds() {
        let s = summary(2 * 1024 * 1024, (10, 0), (12, 0));
        assert_eq!(s.average_rate(), 1024 * 1024);
        let text = s.render(BINARY, '\n');
        assert!(text.starts_with(BLANK_LINE));
        assert!(text.ends_with(
            "\nSummary:\nPiped    2.00 MB in 00h00m02.00s: 1024.00 kB/second\n"
        ));
    }

    #[test]
    fn zero_elapsed_reports_zero_rate() {
        let s = summary(4096, (7, 5), (7, 5));
        assert_eq!(s.average_rate(), 0);
        let text = s.render(Units { base: 1024, scaled: false }, '\r');
        assert!(text.contains("\rSummary:\n"));
        assert!(text.ends_with("Piped    4096 B in 00h00m00.00s:       0 B/second\n"));
    }

    #[test]
    fn summary_uses_borrowed_elapsed() {
        let s = summary(1200, (10, 900_000_000), (12, 100_000_000));
        assert_eq!(s.average_rate(), 1000);
        assert!(s.render(BINARY, '\n').contains("in 00h00m01.20s:"));
    }

    #[test]
    fn blank_line_width() {
        assert_eq!(BLANK_LINE.len(), 79);
        assert!(BLANK_LINE.bytes().all(|b| b == b' '));
    }
}
