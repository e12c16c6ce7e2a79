//! pipemeter: a transparent stdin-to-stdout relay that reports throughput.
//!
//! ```text
//! producer | pipemeter | consumer
//! ```
//!
//! Bytes are copied unchanged through one fixed-size buffer. After each
//! chunk the status line is redrawn; once per second the byte rate is
//! resampled. SIGINT stops the relay at the next chunk boundary and the
//! summary is still printed.

pub mod app;
pub mod buffer;
pub mod config;
pub mod metrics;
pub mod signal;
pub mod status;
pub mod summary;
pub mod util;
