use super::clock::Timestamp;

/// Per-second throughput derived from a cumulative byte counter.
///
/// The rate is a step function: it only changes when the whole-second part
/// of the monotonic clock differs from the previous sample, and it is the
/// plain difference between the two cumulative totals. No smoothing.
#[derive(Clone, Debug)]
pub struct RateSampler {
    last_total: u64,
    last_sample: Timestamp,
    rate: u64,
}

impl RateSampler {
    pub fn new(start: Timestamp) -> Self {
        Self {
            last_total: 0,
            last_sample: start,
            rate: 0,
        }
    }

    /// Feed the current cumulative total. Returns the fresh rate when a
    /// second boundary was crossed since the last sample.
    pub fn observe(&mut self, total: u64, now: Timestamp) -> Option<u64> {
        if now.secs() == self.last_sample.secs() {
            return None;
        }
        self.rate = total.saturating_sub(self.last_total);
        self.last_total = total;
        self.last_sample = now;
        Some(self.rate)
    }

    pub fn rate(&self) -> u64 {
        self.rate
    }

    pub fn last_total(&self) -> u64 {
        self.last_total
    }
}
