use color_eyre::eyre::{bail, Result};
use tracing::warn;

/// Requests below this size are not worth retrying.
pub const MIN_BUFFER_SIZE: usize = 1024;

/// The single staging area between a read and its write. Allocated once
/// at startup and reused for every chunk.
pub struct TransferBuffer {
    data: Vec<u8>,
}

impl TransferBuffer {
    /// Allocate `requested` bytes, halving the request each time the
    /// allocator refuses until it drops below [`MIN_BUFFER_SIZE`].
    pub fn allocate(requested: usize) -> Result<Self> {
        Self::allocate_with(requested, |size| {
            // The reservation only probes; `vec!` then takes zeroed pages
            // from the allocator without touching them.
            let mut probe: Vec<u8> = Vec::new();
            probe.try_reserve_exact(size).ok()?;
            drop(probe);
            Some(vec![0; size])
        })
    }

    fn allocate_with<F>(requested: usize, mut alloc: F) -> Result<Self>
    where
        F: FnMut(usize) -> Option<Vec<u8>>,
    {
        let mut size = requested;
        loop {
            if let Some(data) = alloc(size) {
                return Ok(Self { data });
            }
            warn!(size, "failed to allocate transfer buffer");
            size >>= 1;
            if size < MIN_BUFFER_SIZE {
                bail!("unable to allocate a transfer buffer of at least {MIN_BUFFER_SIZE} bytes");
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
