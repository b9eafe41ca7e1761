//! Capability probe
//!
//! Refines a tentative profile by lighting one channel at a time at a low
//! level and reading the state back. The original state is restored
//! afterwards, also when a step fails.

use async_trait::async_trait;
use lumalink_core::units::level_to_percent;
use lumalink_core::{
    Capabilities, ColorMode, Confidence, DeviceProfile, Intent, Result, StateSnapshot,
};
use serde::{Deserialize, Serialize};

/// Command/query seam the probe drives
#[async_trait]
pub trait ProbeChannel: Send {
    /// Send an intent; no response is awaited
    async fn send(&mut self, intent: Intent) -> Result<()>;

    /// Query the current state
    async fn query(&mut self) -> Result<StateSnapshot>;
}

/// Probe parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// Run the probe for tentative profiles
    pub enabled: bool,
    /// Channel level used for test commands, 0-255
    pub test_level: u8,
    /// Largest accepted difference between sent and echoed level
    pub tolerance: u8,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            test_level: 32,
            tolerance: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TestChannel {
    Red,
    Warm,
    Cool,
}

impl TestChannel {
    const ALL: [TestChannel; 3] = [Self::Red, Self::Warm, Self::Cool];

    fn capability(self) -> Capabilities {
        match self {
            Self::Red => Capabilities::RGB,
            Self::Warm => Capabilities::WARM_WHITE,
            Self::Cool => Capabilities::COOL_WHITE,
        }
    }

    fn intent(self, level: u8) -> Intent {
        let (r, warm, cool) = match self {
            Self::Red => (level, 0, 0),
            Self::Warm => (0, level, 0),
            Self::Cool => (0, 0, level),
        };
        Intent::SetColor {
            r,
            g: 0,
            b: 0,
            warm,
            cool,
        }
    }

    fn echoed(self, snapshot: &StateSnapshot) -> u8 {
        match self {
            Self::Red => snapshot.rgb.r,
            Self::Warm => snapshot.warm,
            Self::Cool => snapshot.cool,
        }
    }
}

/// Capability probe
#[derive(Debug, Clone, Default)]
pub struct CapabilityProbe {
    settings: ProbeSettings,
}

impl CapabilityProbe {
    /// Create a probe with the given settings
    pub fn new(settings: ProbeSettings) -> Self {
        Self { settings }
    }

    /// Probe a device; non-tentative profiles are returned unchanged
    pub async fn run<C>(&self, profile: &DeviceProfile, channel: &mut C) -> Result<DeviceProfile>
    where
        C: ProbeChannel + ?Sized,
    {
        if !profile.is_tentative() {
            return Ok(profile.clone());
        }
        if !self.settings.enabled {
            tracing::debug!("Probe disabled; keeping tentative profile {}", profile);
            return Ok(profile.clone());
        }

        let original = channel.query().await?;
        let tested = self.test_channels(channel).await;
        let restored = restore(channel, &original).await;

        let found = match (tested, restored) {
            (Ok(found), Ok(())) => found,
            (Err(e), restored) => {
                if let Err(restore_error) = restored {
                    tracing::warn!("Restore after failed probe also failed: {}", restore_error);
                }
                return Err(e);
            }
            (Ok(_), Err(e)) => return Err(e),
        };

        let capabilities = (profile.capabilities() - Capabilities::CHANNELS) | found;
        tracing::info!(
            "Probe of {:#06x} found channels {:?}",
            profile.code(),
            found
        );
        Ok(profile.refined(capabilities, Confidence::Probed))
    }

    async fn test_channels<C>(&self, channel: &mut C) -> Result<Capabilities>
    where
        C: ProbeChannel + ?Sized,
    {
        let level = self.settings.test_level;
        let mut found = Capabilities::empty();
        for test in TestChannel::ALL {
            channel.send(test.intent(level)).await?;
            let snapshot = channel.query().await?;
            let echoed = test.echoed(&snapshot);
            let present = echoed.abs_diff(level) <= self.settings.tolerance;
            tracing::debug!(
                "Probe {:?}: sent {}, echoed {} -> {}",
                test,
                level,
                echoed,
                present
            );
            if present {
                found |= test.capability();
            }
        }
        Ok(found)
    }
}

/// Probe a device with default settings
pub async fn probe_capabilities<C>(
    profile: &DeviceProfile,
    channel: &mut C,
) -> Result<DeviceProfile>
where
    C: ProbeChannel + ?Sized,
{
    CapabilityProbe::default().run(profile, channel).await
}

/// Intent that puts the device back into the mode of `snapshot`
fn restore_intent(snapshot: &StateSnapshot) -> Intent {
    match (snapshot.mode, snapshot.effect, snapshot.color_temperature) {
        (ColorMode::Effect, Some(effect), _) => Intent::SetEffect {
            id: effect.id,
            speed: effect.speed,
            brightness: level_to_percent(snapshot.brightness).max(1),
        },
        (ColorMode::ColorTemperature, _, Some(percent)) => Intent::SetColorTemperature {
            percent,
            brightness: level_to_percent(snapshot.brightness),
        },
        _ => Intent::SetColor {
            r: snapshot.rgb.r,
            g: snapshot.rgb.g,
            b: snapshot.rgb.b,
            warm: snapshot.warm,
            cool: snapshot.cool,
        },
    }
}

async fn restore<C>(channel: &mut C, original: &StateSnapshot) -> Result<()>
where
    C: ProbeChannel + ?Sized,
{
    channel.send(restore_intent(original)).await?;
    channel
        .send(Intent::SetPower {
            on: original.is_on(),
        })
        .await
}
