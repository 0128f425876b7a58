//! High-level SMC key access and fan-control unlock.
//!
//! This is the "just works" layer. Wrap any [`smckit_transport::SmcPort`]
//! in an [`SmcClient`] to read and write named controller keys, then use
//! [`unlock_fan_control`] and the [`control`] operations to take manual
//! control of a fan.
//!
//! The controller rejects manual fan-speed writes by default; the unlock
//! handshake raises a global force flag and then keeps writing manual mode
//! until the automatic thermal manager yields, bounded by an attempt count
//! and a wall-clock timeout.

pub mod client;
pub mod clock;
pub mod control;
pub mod error;
pub mod keys;
pub mod unlock;

pub use client::{KeyReading, SmcClient};
pub use clock::{Clock, MonotonicClock};
pub use control::{
    fan_count, fan_info, set_fan_auto, set_fan_rpm, set_fan_rpm_with_config, FanInfo,
};
pub use error::{FanError, Result};
pub use keys::{
    fan_key, FanKey, FAN_COUNT, FAN_FORCE_TEST, FAN_MODE_AUTO, FAN_MODE_MANUAL, MAX_FAN_INDEX,
};
pub use unlock::{
    reset_fan_control, unlock_fan_control, unlock_fan_control_with_config, UnlockConfig,
};
