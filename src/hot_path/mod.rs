//! Hot path - the per-event ingest pipeline
//!
//! This module contains latency-critical code:
//! - Windowed price reductions (SIMD min/max)
//! - Per-symbol rolling state and the concurrent registry
//! - Alert-band membership with hysteresis
//! - The ingest entry points and the idle-symbol reaper

pub mod analyzer;
pub mod reaper;
pub mod reducer;
pub mod registry;
pub mod state;
pub mod threshold;

pub use analyzer::{AlertCallback, Analyzer};
pub use reaper::Reaper;
pub use registry::SymbolRegistry;
pub use state::SymbolState;
pub use threshold::ThresholdSet;
