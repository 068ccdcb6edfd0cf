//! Platform abstraction layer
//!
//! Host-side helpers that sit between browser events and the simulation:
//! - Jump debouncing
//! - Frame-rate measurement
//!
//! Neither feeds back into gameplay beyond the single jump flag.

pub mod input;
pub mod perf;

pub use input::JumpDebouncer;
pub use perf::FrameMonitor;
