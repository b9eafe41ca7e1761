//! Per-device session
//!
//! A [`DeviceSession`] owns one device's link, profile and latest snapshot.
//! It drives one command at a time: encode, frame, write, and for queries a
//! bounded wait for the next payload-bearing notification.

use crate::advertisement::Advertisement;
use crate::codec::{decode_frame, CommandEncoder, DecodedFrame, EncodeOptions};
use crate::framing::{FrameAssembler, Framer, Payload, DEFAULT_MTU};
use crate::probe::{CapabilityProbe, ProbeChannel, ProbeSettings};
use async_trait::async_trait;
use lumalink_core::{
    Capabilities, Confidence, DecodeError, DeviceError, DeviceProfile, Error, Intent, LedConfig,
    Result, StateSnapshot,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

/// Command and notification channels of one device
#[async_trait]
pub trait DeviceLink: Send {
    /// Write one framed chunk
    async fn write(&mut self, bytes: &[u8], response_expected: bool) -> Result<()>;

    /// Next notification, in arrival order
    async fn next_notification(&mut self) -> Result<Vec<u8>>;
}

/// Session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Bound on the wait for a response notification
    pub notification_timeout_ms: u64,
    /// Accept profiles the classifier could not resolve
    pub allow_unresolved: bool,
    /// Largest write the link accepts
    pub mtu: usize,
    /// Encoder options
    pub encode: EncodeOptions,
    /// Capability probe settings
    pub probe: ProbeSettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            notification_timeout_ms: 5000,
            allow_unresolved: true,
            mtu: DEFAULT_MTU,
            encode: EncodeOptions::default(),
            probe: ProbeSettings::default(),
        }
    }
}

impl SessionConfig {
    /// Notification timeout as a duration
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }
}

/// Session for one device
pub struct DeviceSession<L: DeviceLink> {
    link: L,
    config: SessionConfig,
    profile: DeviceProfile,
    snapshot: StateSnapshot,
    encoder: CommandEncoder,
    framer: Framer,
    assembler: FrameAssembler,
}

impl<L: DeviceLink> DeviceSession<L> {
    /// Create a session for a classified device
    pub fn new(link: L, profile: DeviceProfile, config: SessionConfig) -> Result<Self> {
        check_resolved(&profile, &config)?;
        tracing::debug!("Opened session for {}", profile);
        Ok(Self {
            link,
            config,
            profile,
            snapshot: StateSnapshot::default(),
            encoder: CommandEncoder::new(config.encode),
            framer: Framer::new(config.mtu),
            assembler: FrameAssembler::new(),
        })
    }

    /// Create a session from an advertisement, seeding the snapshot from the
    /// embedded state block when one is present
    pub fn from_advertisement(
        link: L,
        advertisement: &Advertisement,
        config: SessionConfig,
    ) -> Result<Self> {
        let profile = advertisement.classify();
        let mut session = Self::new(link, profile, config)?;
        session.seed_from(advertisement);
        Ok(session)
    }

    /// Current profile
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Latest snapshot
    pub fn snapshot(&self) -> &StateSnapshot {
        &self.snapshot
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Underlying link
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Underlying link, mutably
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Consume the session, returning its link
    pub fn into_link(self) -> L {
        self.link
    }

    /// Encode and send an intent
    ///
    /// Queries wait for the response and return the updated snapshot.
    pub async fn execute(&mut self, intent: Intent) -> Result<Option<StateSnapshot>> {
        Ok(self.exchange(intent).await?.map(|_| self.snapshot))
    }

    /// Query and return the device state
    pub async fn query_state(&mut self) -> Result<StateSnapshot> {
        match self.exchange(Intent::QueryState).await? {
            Some(DecodedFrame::State(_)) => Ok(self.snapshot),
            Some(other) => Err(DecodeError::UnexpectedFrame(frame_kind(&other)).into()),
            None => Err(Error::other("state query produced no response")),
        }
    }

    /// Query the addressable LED configuration
    pub async fn query_led_config(&mut self) -> Result<LedConfig> {
        match self.exchange(Intent::QueryLedConfig).await? {
            Some(DecodedFrame::LedConfig(config)) => Ok(config),
            Some(other) => Err(DecodeError::UnexpectedFrame(frame_kind(&other)).into()),
            None => Err(Error::other("LED configuration query produced no response")),
        }
    }

    async fn exchange(&mut self, intent: Intent) -> Result<Option<DecodedFrame>> {
        let command = self
            .encoder
            .encode_with_basis(&self.profile, &intent, &self.snapshot)?;
        let response_expected = command.response_expected();
        for chunk in self.framer.wrap(&command)? {
            self.link.write(&chunk, response_expected).await?;
        }
        if !response_expected {
            return Ok(None);
        }
        self.await_reply(&intent).await.map(Some)
    }

    /// Feed an unsolicited notification
    ///
    /// Returns the decoded frame once a payload is complete; device-info
    /// records yield `None`.
    pub fn handle_notification(&mut self, notification: &[u8]) -> Result<Option<DecodedFrame>> {
        match self.assembler.push(notification)? {
            Some(payload) => match payload_frame(payload) {
                Some(frame) => self.apply(&frame).map(Some),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    /// Track an advertisement; a different identifying code invalidates the
    /// profile and snapshot
    ///
    /// Returns whether the profile was replaced.
    pub fn observe_advertisement(&mut self, advertisement: &Advertisement) -> Result<bool> {
        if advertisement.code() == self.profile.code() {
            return Ok(false);
        }
        let profile = advertisement.classify();
        check_resolved(&profile, &self.config)?;
        tracing::info!(
            "Device re-advertised as {:#06x} (was {:#06x}); profile now {}",
            advertisement.code(),
            self.profile.code(),
            profile
        );
        self.profile = profile;
        self.snapshot = StateSnapshot::default();
        self.assembler.reset();
        self.seed_from(advertisement);
        Ok(true)
    }

    /// Replace the profile without touching the snapshot
    pub fn replace_profile(&mut self, profile: DeviceProfile) -> Result<()> {
        check_resolved(&profile, &self.config)?;
        tracing::debug!("Profile replaced: {} -> {}", self.profile, profile);
        self.profile = profile;
        Ok(())
    }

    /// Run the capability probe and adopt its result
    pub async fn probe(&mut self) -> Result<&DeviceProfile> {
        if !self.profile.is_tentative() {
            return Ok(&self.profile);
        }
        let tentative = self.profile.clone();
        // Test commands light channels the tentative profile does not list
        self.profile = tentative.refined(
            tentative.capabilities() | Capabilities::CHANNELS,
            Confidence::Tentative,
        );

        let probe = CapabilityProbe::new(self.config.probe);
        match probe.run(&tentative, self).await {
            Ok(profile) => {
                self.profile = profile;
                Ok(&self.profile)
            }
            Err(e) => {
                self.profile = tentative;
                Err(e)
            }
        }
    }

    /// Wait for the frame answering `intent`
    ///
    /// Frames of the other kind are pushed by the device on its own; they
    /// update the snapshot and the wait continues until the same deadline.
    async fn await_reply(&mut self, intent: &Intent) -> Result<DecodedFrame> {
        let timeout = self.config.notification_timeout();
        let deadline = Instant::now() + timeout;
        loop {
            let notification = timeout_at(deadline, self.link.next_notification())
                .await
                .map_err(|_| Error::Timeout {
                    timeout_ms: self.config.notification_timeout_ms,
                })??;
            let Some(payload) = self.assembler.push(&notification)? else {
                continue;
            };
            let Some(frame) = payload_frame(payload) else {
                tracing::debug!("Skipped device-info record while awaiting response");
                continue;
            };
            let decoded = self.apply(&frame)?;
            if answers(intent, &decoded) {
                return Ok(decoded);
            }
            tracing::debug!("Applied unsolicited {} while awaiting response", frame_kind(&decoded));
        }
    }

    fn apply(&mut self, frame: &[u8]) -> Result<DecodedFrame> {
        let decoded = match decode_frame(&self.profile, frame) {
            Ok(decoded) => decoded,
            Err(e) => {
                if matches!(e, DecodeError::CorruptFrame { .. }) {
                    tracing::warn!("Dropped corrupt frame from {}: {}", self.profile, e);
                }
                return Err(e.into());
            }
        };
        match decoded {
            DecodedFrame::State(snapshot) => {
                self.snapshot = StateSnapshot {
                    led_config: self.snapshot.led_config,
                    ..snapshot
                };
            }
            DecodedFrame::LedConfig(config) => {
                self.snapshot = self.snapshot.with_led_config(config);
            }
        }
        Ok(decoded)
    }

    fn seed_from(&mut self, advertisement: &Advertisement) {
        match advertisement.embedded_state(&self.profile) {
            Some(Ok(snapshot)) => self.snapshot = snapshot,
            Some(Err(e)) => tracing::debug!("Ignored embedded state block: {}", e),
            None => {}
        }
    }
}

#[async_trait]
impl<L: DeviceLink> ProbeChannel for DeviceSession<L> {
    async fn send(&mut self, intent: Intent) -> Result<()> {
        self.execute(intent).await.map(|_| ())
    }

    async fn query(&mut self) -> Result<StateSnapshot> {
        self.query_state().await
    }
}

fn answers(intent: &Intent, frame: &DecodedFrame) -> bool {
    match intent {
        Intent::QueryLedConfig => matches!(frame, DecodedFrame::LedConfig(_)),
        _ => matches!(frame, DecodedFrame::State(_)),
    }
}

fn frame_kind(frame: &DecodedFrame) -> &'static str {
    match frame {
        DecodedFrame::State(_) => "state report",
        DecodedFrame::LedConfig(_) => "LED configuration",
    }
}

fn payload_frame(payload: Payload) -> Option<Vec<u8>> {
    match payload {
        Payload::Binary(bytes) => Some(bytes),
        Payload::Structured { code, payload } => {
            tracing::debug!(
                "Structured record code {:?} with {} byte payload",
                code,
                payload.len()
            );
            Some(payload)
        }
        Payload::Info(_) => None,
    }
}

fn check_resolved(profile: &DeviceProfile, config: &SessionConfig) -> Result<()> {
    if profile.is_unresolved() && !config.allow_unresolved {
        return Err(DeviceError::UnresolvedDevice {
            code: profile.code(),
        }
        .into());
    }
    Ok(())
}
