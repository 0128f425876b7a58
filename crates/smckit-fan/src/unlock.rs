//! The fan-control unlock handshake.
//!
//! The controller rejects manual fan-speed writes while the automatic
//! thermal manager owns the fans. Unlocking is a multi-step procedure with
//! no synchronous acknowledgment beyond "write succeeded": raise the
//! global force flag, read the fan's mode to establish a baseline, then
//! keep writing manual mode until the manager yields. Empirically the
//! manager needs settling time, so the mode write is retried with a dual
//! exit condition — attempt count or elapsed wall clock, whichever fires
//! first.

use std::time::Duration;

use smckit_transport::SmcPort;
use tracing::{debug, warn};

use crate::client::SmcClient;
use crate::clock::{Clock, MonotonicClock};
use crate::error::{FanError, Result};
use crate::keys::{self, FanKey, FAN_MODE_MANUAL};

/// Bounds for the unlock retry loop.
#[derive(Debug, Clone)]
pub struct UnlockConfig {
    /// Maximum number of manual-mode write attempts.
    pub max_retries: u32,
    /// Wall-clock budget for the whole retry loop.
    pub timeout: Duration,
    /// Pause between attempts.
    pub retry_delay: Duration,
}

impl Default for UnlockConfig {
    fn default() -> Self {
        Self {
            max_retries: 100,
            timeout: Duration::from_secs(10),
            retry_delay: Duration::from_millis(100),
        }
    }
}

/// Unlock manual control of the fan at `fan`, with default bounds and the
/// process clock.
pub fn unlock_fan_control<P: SmcPort>(client: &mut SmcClient<P>, fan: u32) -> Result<()> {
    unlock_fan_control_with_config(client, fan, &UnlockConfig::default(), &MonotonicClock)
}

/// Unlock manual control of the fan at `fan` with explicit bounds and clock.
///
/// Failures before the retry loop — the force-flag write and the baseline
/// mode read — are fatal and returned as-is. Only the manual-mode write is
/// retried; exhausting the attempt or time budget returns
/// [`FanError::UnlockTimeout`].
pub fn unlock_fan_control_with_config<P: SmcPort, C: Clock>(
    client: &mut SmcClient<P>,
    fan: u32,
    config: &UnlockConfig,
    clock: &C,
) -> Result<()> {
    let mode_key = keys::fan_key(FanKey::Mode, fan)?;

    // Step 1: raise the force/test flag to enter diagnostic mode.
    client.write_key(keys::FAN_FORCE_TEST, &[1])?;

    // Step 2: baseline read of the fan's mode.
    client.read_key(mode_key)?;

    // Step 3: write manual mode until the thermal manager yields.
    let start = clock.now();
    for attempt in 1..=config.max_retries {
        match client.write_key(mode_key, &[FAN_MODE_MANUAL]) {
            Ok(()) => {
                debug!(fan, attempt, "fan control unlocked");
                return Ok(());
            }
            Err(err) => {
                let elapsed = clock.now().duration_since(start);
                if elapsed >= config.timeout {
                    warn!(fan, attempt, ?elapsed, "fan control unlock timed out");
                    return Err(FanError::UnlockTimeout {
                        attempts: attempt,
                        elapsed,
                    });
                }
                debug!(fan, attempt, %err, "manual mode write refused; retrying");
                clock.sleep(config.retry_delay);
            }
        }
    }

    let elapsed = clock.now().duration_since(start);
    warn!(fan, attempts = config.max_retries, ?elapsed, "fan control unlock gave up");
    Err(FanError::UnlockTimeout {
        attempts: config.max_retries,
        elapsed,
    })
}

/// Clear the force/test flag, returning the fans to the automatic thermal
/// manager.
pub fn reset_fan_control<P: SmcPort>(client: &mut SmcClient<P>) -> Result<()> {
    client.write_key(keys::FAN_FORCE_TEST, &[0])
}
