use std::io;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// A reading of the monotonic clock, split the way `clock_gettime` returns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timestamp {
    secs: i64,
    nanos: i64,
}

impl Timestamp {
    pub fn new(secs: i64, nanos: i64) -> Self {
        Self { secs, nanos }
    }

    /// Read `CLOCK_MONOTONIC`. A failure here is never recoverable for a
    /// throughput meter, so callers propagate it.
    pub fn now() -> io::Result<Self> {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        let rc = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) };
        if rc == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self {
            secs: ts.tv_sec as i64,
            nanos: ts.tv_nsec as i64,
        })
    }

    pub fn secs(&self) -> i64 {
        self.secs
    }

    /// Whole seconds and leftover nanoseconds from `earlier` to `self`.
    /// The nanosecond part borrows a second when needed, so both parts are
    /// non-negative for a clock that moved forward.
    pub fn diff(&self, earlier: Timestamp) -> (i64, i64) {
        let mut secs = self.secs - earlier.secs;
        let mut nanos = self.nanos - earlier.nanos;
        if nanos < 0 {
            secs -= 1;
            nanos += NANOS_PER_SEC;
        }
        (secs, nanos)
    }

    pub fn seconds_since(&self, earlier: Timestamp) -> f64 {
        (self.secs - earlier.secs) as f64 + (self.nanos - earlier.nanos) as f64 / 1e9
    }
}
