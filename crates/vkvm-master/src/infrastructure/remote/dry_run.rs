//! Dry-run transport: logs every event instead of sending it.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;
use vkvm_core::{ConnectionTarget, Profile, Screen};

use crate::application::switch_session::{RemoteTransport, TransportError};

/// A [`RemoteTransport`] that pretends to connect and logs each event at
/// `info` level.
pub struct DryRunRemote {
    targets: HashMap<String, ConnectionTarget>,
    screen: Screen,
    connected: Option<String>,
}

impl DryRunRemote {
    /// Creates a transport knowing `targets` by profile name, reporting
    /// `screen` as the remote framebuffer size once connected.
    pub fn new(targets: impl IntoIterator<Item = (String, ConnectionTarget)>, screen: Screen) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            screen,
            connected: None,
        }
    }

    /// Creates a transport for the targets of `profiles`.
    pub fn for_profiles(profiles: &[Profile], screen: Screen) -> Self {
        Self::new(
            profiles.iter().map(|p| (p.name.clone(), p.target.clone())),
            screen,
        )
    }

    /// Name of the connected profile.
    pub fn connected_profile(&self) -> Option<&str> {
        self.connected.as_deref()
    }

    fn ensure_connected(&self) -> Result<&str, TransportError> {
        self.connected_profile().ok_or(TransportError::NotConnected)
    }
}

#[async_trait]
impl RemoteTransport for DryRunRemote {
    async fn connect(&mut self, profile: &str, timeout: Duration) -> Result<(), TransportError> {
        let target = self
            .targets
            .get(profile)
            .ok_or_else(|| TransportError::UnknownProfile(profile.to_string()))?;
        info!(
            profile,
            host = %target.host,
            port = target.port,
            authenticated = target.credential.is_some(),
            timeout_secs = timeout.as_secs(),
            "dry-run connect"
        );
        self.connected = Some(profile.to_string());
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        if let Some(profile) = self.connected.take() {
            info!(profile = %profile, "dry-run disconnect");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.is_some()
    }

    fn screen_size(&self) -> Screen {
        if self.is_connected() {
            self.screen
        } else {
            Screen::default()
        }
    }

    async fn send_key_event(
        &mut self,
        name: &str,
        key: u32,
        pressed: bool,
    ) -> Result<(), TransportError> {
        let profile = self.ensure_connected()?;
        info!(profile, name, keysym = key, pressed, "key event");
        Ok(())
    }

    async fn send_pointer_event(
        &mut self,
        name: &str,
        button_mask: u8,
        x: u16,
        y: u16,
        pressed: bool,
    ) -> Result<(), TransportError> {
        let profile = self.ensure_connected()?;
        info!(profile, name, button_mask, x, y, pressed, "pointer event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> DryRunRemote {
        DryRunRemote::new(
            [(
                "work".to_string(),
                ConnectionTarget {
                    host: "10.1.1.1".to_string(),
                    port: 5900,
                    credential: Some("pw".to_string()),
                },
            )],
            Screen::new(2560, 1440),
        )
    }

    #[tokio::test]
    async fn test_connect_known_profile() {
        // Arrange
        let mut r = remote();

        // Act
        r.connect("work", Duration::from_secs(1)).await.unwrap();

        // Assert
        assert!(r.is_connected());
        assert_eq!(r.connected_profile(), Some("work"));
        assert_eq!(r.screen_size(), Screen::new(2560, 1440));
    }

    #[tokio::test]
    async fn test_connect_unknown_profile_fails() {
        let mut r = remote();
        let result = r.connect("home", Duration::from_secs(1)).await;
        assert_eq!(result, Err(TransportError::UnknownProfile("home".to_string())));
        assert!(!r.is_connected());
    }

    #[tokio::test]
    async fn test_send_requires_connection() {
        let mut r = remote();
        assert_eq!(r.screen_size(), Screen::default());
        assert_eq!(
            r.send_key_event("a", 0x61, true).await,
            Err(TransportError::NotConnected)
        );
        assert_eq!(
            r.send_pointer_event("Motion", 0, 1, 1, false).await,
            Err(TransportError::NotConnected)
        );
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let mut r = remote();
        r.connect("work", Duration::from_secs(1)).await.unwrap();
        r.send_key_event("a", 0x61, true).await.unwrap();

        r.disconnect().await.unwrap();
        r.disconnect().await.unwrap();

        assert!(!r.is_connected());
    }
}
