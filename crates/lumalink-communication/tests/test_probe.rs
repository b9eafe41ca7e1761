use async_trait::async_trait;
use lumalink_communication::{probe_capabilities, CapabilityProbe, ProbeChannel, ProbeSettings};
use lumalink_core::{
    Capabilities, ColorMode, Confidence, DeviceProfile, EffectState, Error, Intent, PowerState,
    Result, Rgb, StateSnapshot,
};
use lumalink_devicedb::classify;

// Channel-level device model: levels on absent channels read back as zero
struct FakeDevice {
    channels: Capabilities,
    state: StateSnapshot,
    sent: Vec<Intent>,
    queries: usize,
    fail_on_query: Option<usize>,
    echo_offset: u8,
}

impl FakeDevice {
    fn new(channels: Capabilities, state: StateSnapshot) -> Self {
        Self {
            channels,
            state,
            sent: Vec::new(),
            queries: 0,
            fail_on_query: None,
            echo_offset: 0,
        }
    }

    fn level(&self, present: Capabilities, value: u8) -> u8 {
        if self.channels.contains(present) {
            value.saturating_sub(self.echo_offset)
        } else {
            0
        }
    }
}

#[async_trait]
impl ProbeChannel for FakeDevice {
    async fn send(&mut self, intent: Intent) -> Result<()> {
        self.sent.push(intent);
        match intent {
            Intent::SetColor {
                r,
                g,
                b,
                warm,
                cool,
            } => {
                self.state.mode = ColorMode::StaticColor;
                self.state.effect = None;
                self.state.rgb = Rgb::new(
                    self.level(Capabilities::RGB, r),
                    self.level(Capabilities::RGB, g),
                    self.level(Capabilities::RGB, b),
                );
                self.state.warm = self.level(Capabilities::WARM_WHITE, warm);
                self.state.cool = self.level(Capabilities::COOL_WHITE, cool);
            }
            Intent::SetEffect { id, speed, .. } => {
                self.state.mode = ColorMode::Effect;
                self.state.effect = Some(EffectState { id, speed });
            }
            Intent::SetPower { on } => self.state.power = PowerState::from(on),
            _ => {}
        }
        Ok(())
    }

    async fn query(&mut self) -> Result<StateSnapshot> {
        self.queries += 1;
        if self.fail_on_query == Some(self.queries) {
            return Err(Error::Timeout { timeout_ms: 5000 });
        }
        Ok(self.state)
    }
}

fn tentative() -> DeviceProfile {
    let profile = classify(0x00FF, Some(0x51));
    assert!(profile.is_tentative());
    profile
}

fn lit_state() -> StateSnapshot {
    StateSnapshot {
        power: PowerState::On,
        rgb: Rgb::new(10, 20, 30),
        brightness: 30,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_confirmed_profile_untouched() {
    let profile = classify(0x0035, None);
    let mut device = FakeDevice::new(Capabilities::CHANNELS, lit_state());
    let result = probe_capabilities(&profile, &mut device).await.unwrap();
    assert_eq!(result, profile);
    assert!(device.sent.is_empty());
    assert_eq!(device.queries, 0);
}

#[tokio::test]
async fn test_infers_channels() {
    let channels = Capabilities::RGB | Capabilities::WARM_WHITE;
    let mut device = FakeDevice::new(channels, lit_state());
    let result = probe_capabilities(&tentative(), &mut device).await.unwrap();

    assert_eq!(result.confidence(), Confidence::Probed);
    assert!(result.has(Capabilities::RGB));
    assert!(result.has(Capabilities::WARM_WHITE));
    assert!(!result.has(Capabilities::COOL_WHITE));
    // Non-channel flags survive
    assert!(result.has(Capabilities::EFFECTS));
    assert_eq!(result.code(), 0x00FF);
}

#[tokio::test]
async fn test_restores_original_state() {
    let mut device = FakeDevice::new(Capabilities::CHANNELS, lit_state());
    probe_capabilities(&tentative(), &mut device).await.unwrap();

    assert_eq!(device.state.rgb, Rgb::new(10, 20, 30));
    assert_eq!(device.state.warm, 0);
    assert_eq!(device.state.cool, 0);
    assert_eq!(device.sent.last(), Some(&Intent::SetPower { on: true }));
}

#[tokio::test]
async fn test_restores_effect_and_power_off() {
    let original = StateSnapshot {
        power: PowerState::Off,
        mode: ColorMode::Effect,
        effect: Some(EffectState { id: 0x26, speed: 70 }),
        brightness: 128,
        ..Default::default()
    };
    let mut device = FakeDevice::new(Capabilities::RGB, original);
    probe_capabilities(&tentative(), &mut device).await.unwrap();

    let n = device.sent.len();
    assert_eq!(
        device.sent[n - 2],
        Intent::SetEffect {
            id: 0x26,
            speed: 70,
            brightness: 50
        }
    );
    assert_eq!(device.sent[n - 1], Intent::SetPower { on: false });
    assert_eq!(device.state.mode, ColorMode::Effect);
}

#[tokio::test]
async fn test_failure_still_restores() {
    let mut device = FakeDevice::new(Capabilities::CHANNELS, lit_state());
    // First query reads the original state, the second one fails mid-probe
    device.fail_on_query = Some(2);
    let result = probe_capabilities(&tentative(), &mut device).await;

    assert!(result.unwrap_err().is_timeout());
    assert_eq!(device.sent.last(), Some(&Intent::SetPower { on: true }));
    assert_eq!(device.state.rgb, Rgb::new(10, 20, 30));
}

#[tokio::test]
async fn test_tolerance() {
    let settings = ProbeSettings {
        tolerance: 4,
        ..Default::default()
    };

    let mut close = FakeDevice::new(Capabilities::RGB, lit_state());
    close.echo_offset = 3;
    let result = CapabilityProbe::new(settings)
        .run(&tentative(), &mut close)
        .await
        .unwrap();
    assert!(result.has(Capabilities::RGB));

    let mut far = FakeDevice::new(Capabilities::RGB, lit_state());
    far.echo_offset = 10;
    let result = CapabilityProbe::new(settings)
        .run(&tentative(), &mut far)
        .await
        .unwrap();
    assert!(!result.has(Capabilities::RGB));
}

#[tokio::test]
async fn test_disabled_probe() {
    let settings = ProbeSettings {
        enabled: false,
        ..Default::default()
    };
    let mut device = FakeDevice::new(Capabilities::CHANNELS, lit_state());
    let profile = tentative();
    let result = CapabilityProbe::new(settings)
        .run(&profile, &mut device)
        .await
        .unwrap();
    assert!(result.is_tentative());
    assert!(device.sent.is_empty());
}
