//! Training-load metrics.

pub mod tss;

pub use tss::{SegmentTssCalculator, TssCalculator};
