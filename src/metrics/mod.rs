pub mod clock;
pub mod rate;

use clock::Timestamp;
use rate::RateSampler;

/// Counters for one relay run. Owned by the transfer loop; formatters and
/// the summary only read from it.
pub struct Session {
    pub start: Timestamp,
    total_bytes: u64,
    sampler: RateSampler,
}

impl Session {
    pub fn new(start: Timestamp) -> Self {
        Self {
            start,
            total_bytes: 0,
            sampler: RateSampler::new(start),
        }
    }

    /// Count a block that has already been written out.
    pub fn record(&mut self, bytes: usize) {
        self.total_bytes = self.total_bytes.saturating_add(bytes as u64);
    }

    /// Run the once-per-second rate sample. Returns the new rate when one
    /// was taken.
    pub fn sample(&mut self, now: Timestamp) -> Option<u64> {
        self.sampler.observe(self.total_bytes, now)
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn rate(&self) -> u64 {
        self.sampler.rate()
    }

    pub fn last_sampled_total(&self) -> u64 {
        self.sampler.last_total()
    }
}
