//! Medley Worker Library
//!
//! Background conversion infrastructure: the submission boundary callers use
//! to enqueue conversion work, and the in-process worker pool that later
//! invokes the conversion executor.

pub mod queue;

pub use queue::{ConversionQueue, PerformConversions, QueueConfig};
