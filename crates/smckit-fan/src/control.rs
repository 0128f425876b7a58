//! Fan orchestration on top of the key protocol and the unlock handshake.

use smckit_transport::SmcPort;
use tracing::warn;

use crate::client::SmcClient;
use crate::clock::{Clock, MonotonicClock};
use crate::error::Result;
use crate::keys::{self, FanKey, FAN_MODE_AUTO, FAN_MODE_MANUAL, MAX_FAN_INDEX};
use crate::unlock::{unlock_fan_control_with_config, UnlockConfig};

/// A snapshot of one fan's state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanInfo {
    /// Current measured speed.
    pub actual_rpm: f32,
    /// Speed the controller is steering toward.
    pub target_rpm: f32,
    /// Minimum supported speed.
    pub min_rpm: f32,
    /// Maximum supported speed.
    pub max_rpm: f32,
    /// Whether the fan accepts externally supplied targets.
    pub manual: bool,
}

/// Number of fans the controller reports.
pub fn fan_count<P: SmcPort>(client: &mut SmcClient<P>) -> Result<u8> {
    let reading = client.read_key(keys::FAN_COUNT)?;
    Ok(reading.payload.first().copied().unwrap_or(0))
}

/// Read the full state of the fan at `fan`.
pub fn fan_info<P: SmcPort>(client: &mut SmcClient<P>, fan: u32) -> Result<FanInfo> {
    let actual_rpm = client.read_float(keys::fan_key(FanKey::Actual, fan)?)?;
    let target_rpm = client.read_float(keys::fan_key(FanKey::Target, fan)?)?;
    let min_rpm = client.read_float(keys::fan_key(FanKey::Minimum, fan)?)?;
    let max_rpm = client.read_float(keys::fan_key(FanKey::Maximum, fan)?)?;
    let mode = client.read_key(keys::fan_key(FanKey::Mode, fan)?)?;
    let manual = mode.payload.first().copied() == Some(FAN_MODE_MANUAL);

    Ok(FanInfo {
        actual_rpm,
        target_rpm,
        min_rpm,
        max_rpm,
        manual,
    })
}

/// Pin the fan at `fan` to a target speed, unlocking manual control first
/// if the fan is still under automatic management.
pub fn set_fan_rpm<P: SmcPort>(client: &mut SmcClient<P>, fan: u32, rpm: f32) -> Result<()> {
    set_fan_rpm_with_config(client, fan, rpm, &UnlockConfig::default(), &MonotonicClock)
}

/// [`set_fan_rpm`] with explicit unlock bounds and clock.
pub fn set_fan_rpm_with_config<P: SmcPort, C: Clock>(
    client: &mut SmcClient<P>,
    fan: u32,
    rpm: f32,
    config: &UnlockConfig,
    clock: &C,
) -> Result<()> {
    let mode_key = keys::fan_key(FanKey::Mode, fan)?;
    let mode = client.read_key(mode_key)?;
    let already_manual = mode.payload.first().copied() == Some(FAN_MODE_MANUAL);

    if !already_manual {
        unlock_fan_control_with_config(client, fan, config, clock)?;
    }

    client.write_float(keys::fan_key(FanKey::Target, fan)?, rpm)
}

/// Return the fan at `fan` to automatic control.
///
/// Mode and target writes that fail are logged and skipped rather than
/// aborting the hand-back, matching the controller's tolerance for partial
/// restore. When no other fan remains in manual mode the global force flag
/// is cleared too, so the thermal manager can take back full control and
/// spin the fans down.
pub fn set_fan_auto<P: SmcPort>(client: &mut SmcClient<P>, fan: u32) -> Result<()> {
    let count = u32::from(fan_count(client)?).min(MAX_FAN_INDEX + 1);

    let mut other_manual = 0u32;
    for index in 0..count {
        if index == fan {
            continue;
        }
        let key = keys::fan_key(FanKey::Mode, index)?;
        match client.read_key(key) {
            Ok(reading) if reading.payload.first().copied() == Some(FAN_MODE_MANUAL) => {
                other_manual += 1;
            }
            Ok(_) => {}
            Err(err) => warn!(fan = index, %err, "could not read fan mode"),
        }
    }

    let mode_key = keys::fan_key(FanKey::Mode, fan)?;
    if let Err(err) = client.write_key(mode_key, &[FAN_MODE_AUTO]) {
        warn!(fan, %err, "failed to restore automatic mode");
    }
    let target_key = keys::fan_key(FanKey::Target, fan)?;
    if let Err(err) = client.write_float(target_key, 0.0) {
        warn!(fan, %err, "failed to clear target speed");
    }

    if other_manual == 0 {
        if let Err(err) = client.write_key(keys::FAN_FORCE_TEST, &[0]) {
            warn!(fan, %err, "failed to clear the force flag");
        }
    }

    Ok(())
}
