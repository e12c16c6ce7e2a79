use crate::metrics::clock::Timestamp;

const UNITS: [&str; 7] = ["", "k", "M", "G", "T", "P", "E"];

/// Format a byte count with two decimals and a power-of-`base` suffix
/// (e.g., "   2.00 M"). With `scaled` off the integer is printed as-is.
///
/// The result always ends in a space followed by the (possibly empty)
/// suffix, so callers append the unit letter directly: `"{}B"`.
pub fn format_units(value: u64, base: u64, scaled: bool) -> String {
    if !scaled {
        return format!("{value:>7} ");
    }
    format_with_table(value, base, &UNITS)
}

fn format_with_table(value: u64, base: u64, units: &[&str]) -> String {
    let (hundredths, tier) = scale(value, base, units.len());
    let number = format!("{}.{:02}", hundredths / 100, hundredths % 100);
    format!("{number:>7} {}", units[tier])
}

/// Returns the value in hundredths plus the tier index into a table of
/// `tiers` suffixes.
///
/// Anything above `base²` is divided once up front; after that the value
/// is divided while it is above `100 * base` (i.e. shows as 100.xx or more
/// at the next tier down). Exactly `base²` skips the up-front division.
fn scale(value: u64, base: u64, tiers: usize) -> (u64, usize) {
    let mut tier = 0usize;
    let mut v = value;

    if v > base * base {
        tier += 1;
        v /= base;
    }
    v = v.saturating_mul(100);
    while v > 100 * base {
        tier += 1;
        v /= base;
    }
    while tier > 0 && tier >= tiers {
        tier -= 1;
        v = v.saturating_mul(base);
    }
    (v, tier)
}

/// Format the time between two monotonic samples as "HHhMMmSS.ffs".
///
/// Hours are unbounded; the fraction is truncated to hundredths.
pub fn format_elapsed(start: Timestamp, end: Timestamp) -> String {
    let (secs, nanos) = end.diff(start);
    format!(
        "{:02}h{:02}m{:02}.{:02}s",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        nanos / 10_000_000
    )
}

/// Average throughput in bytes per second; zero when no time has passed.
pub fn average_rate(bytes: u64, seconds: f64) -> u64 {
    if seconds > 0.0 {
        (bytes as f64 / seconds) as u64
    } else {
        0
    }
}

/// Format the current wall-clock time in local time as "Fri Oct 16 12:34:56".
pub fn format_wall_clock() -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format_local_time(now as libc::time_t)
}

fn format_local_time(epoch: libc::time_t) -> String {
    let mut tm: libc::tm = unsafe { std::mem::zeroed() };
    let mut buf = [0u8; 64];
    let written = unsafe {
        if libc::localtime_r(&epoch, &mut tm).is_null() {
            return String::new();
        }
        libc::strftime(
            buf.as_mut_ptr().cast::<libc::c_char>(),
            buf.len(),
            c"%a %b %d %H:%M:%S".as_ptr(),
            &tm,
        )
    };
    String::from_utf8_lossy(&buf[..written]).into_owned()
}
