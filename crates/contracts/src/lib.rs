//! # Contracts
//!
//! Frozen interface contracts: the data structures and traits shared between
//! the beat pipeline crates. All business crates depend only on this crate,
//! reverse dependencies are prohibited.
//!
//! ## Time Model
//! - The engine works in monotonic [`std::time::Instant`]s (rate limits,
//!   flash ages). Wall-clock seconds appear only in notification payloads.

mod blueprint;
mod colour;
mod detector;
mod device;
mod error;
mod event;
mod notify;
mod settings;
mod sink;

pub use blueprint::*;
pub use colour::Rgb;
pub use detector::BeatDetector;
pub use device::*;
pub use error::ContractError;
pub use event::{BeatEvent, Detection};
pub use notify::{DeviceState, DeviceStateEvent, NotificationSink, NullNotifier};
pub use settings::{EngineSettings, SettingsHandle};
pub use sink::*;
