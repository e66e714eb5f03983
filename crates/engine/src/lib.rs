//! # Engine
//!
//! The reactive dispatch core.
//!
//! Consumes beat events and drives the configured devices: eligibility
//! (frequency ranges, rate limit), mode behaviour (reactive colour cycling
//! or flash with timed auto-off), payload rendering per device protocol,
//! and concurrent fan-out through a publish sink.

pub mod engine;
pub mod flash;
pub mod limiter;
pub mod payload;
pub mod registry;
pub mod selector;
pub mod stats;

pub use engine::ReactiveEngine;
pub use flash::{FlashEntry, FlashTracker};
pub use limiter::RateLimiter;
pub use payload::{render, LightCommand};
pub use registry::DeviceRegistry;
pub use selector::{pick, Colour, PALETTE};
pub use stats::{EngineStats, EngineStatsSnapshot};
