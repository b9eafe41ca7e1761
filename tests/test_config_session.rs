use async_trait::async_trait;
use lumalink::{classify, Config, DeviceLink, DeviceSession, Error, Intent, Result};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingLink {
    writes: Vec<Vec<u8>>,
}

#[async_trait]
impl DeviceLink for RecordingLink {
    async fn write(&mut self, bytes: &[u8], _response_expected: bool) -> Result<()> {
        self.writes.push(bytes.to_vec());
        Ok(())
    }

    async fn next_notification(&mut self) -> Result<Vec<u8>> {
        std::future::pending().await
    }
}

fn load(contents: &str) -> Config {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lumalink.toml");
    std::fs::write(&path, contents).unwrap();
    Config::load_from_file(&path).unwrap()
}

#[tokio::test]
async fn test_config_file_drives_session() {
    let config = load(
        "[session]\nnotification_timeout_ms = 25\nallow_unresolved = false\n\n\
         [encoder]\ntransition_secs = 3\n",
    );
    let session_config = config.session_config();
    assert_eq!(session_config.notification_timeout_ms, 25);
    assert_eq!(session_config.encode.transition_secs, 3);

    let rejected = DeviceSession::new(
        RecordingLink::default(),
        classify(0x4242, None),
        session_config,
    );
    assert!(rejected.is_err());

    let mut session =
        DeviceSession::new(RecordingLink::default(), classify(0x0007, None), session_config)
            .unwrap();
    let err = session.query_state().await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 25 }));
    assert_eq!(session.link().writes.len(), 1);
}

#[tokio::test]
async fn test_defaults_when_sections_missing() {
    let config = load("");
    assert_eq!(config, Config::default());

    let mut session = DeviceSession::new(
        RecordingLink::default(),
        classify(0x0033, None),
        config.session_config(),
    )
    .unwrap();
    let result = session
        .execute(Intent::SetEffect {
            id: 1,
            speed: 50,
            brightness: 100,
        })
        .await
        .unwrap();
    assert!(result.is_none());
    assert_eq!(session.link().writes.len(), 1);
}
