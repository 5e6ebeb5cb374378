//! SessionSwitcher: owns the active remote session and switches between
//! profiles when a hotkey is pressed.
//!
//! Exactly one profile is "hot" at a time.  Its [`ComboTracker`] and
//! [`CoordinateMapper`] live here and are replaced wholesale on every switch;
//! nothing carries over from one profile to the next.
//!
//! # Switching
//!
//! ```text
//! hotkey of profile P pressed
//!  ├─ P active and not --forever ──► disconnect, stop
//!  └─ otherwise
//!       ├─ disconnect current transport (if connected)
//!       ├─ connect to P (bounded by P's timeout)      ── failure: stay disconnected
//!       ├─ wait P's settle delay
//!       ├─ fresh tracker from P's rules, pointer centered on the remote screen
//!       └─ send one "Motion" event at the centre
//! ```
//!
//! A failed connect is not retried and the previous profile is not restored;
//! the user recovers by pressing a hotkey again.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use vkvm_core::{
    registry::MOTION, ComboTracker, CoordinateMapper, EventDefinition, Profile, Screen,
};

/// Error type for remote transport operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("remote not connected")]
    NotConnected,
    #[error("no connection target for profile {0:?}")]
    UnknownProfile(String),
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("connect timed out after {0:?}")]
    Timeout(Duration),
    #[error("send failed: {0}")]
    Send(String),
}

/// Trait for the connection to a remote desktop session.
///
/// Infrastructure implementations speak a remote-framebuffer protocol or, for
/// dry runs, just log; test implementations record calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteTransport: Send {
    /// Connects to the target configured for `profile`.
    async fn connect(&mut self, profile: &str, timeout: Duration) -> Result<(), TransportError>;

    /// Closes the current connection.
    async fn disconnect(&mut self) -> Result<(), TransportError>;

    fn is_connected(&self) -> bool;

    /// Remote framebuffer size; zero when not connected.
    fn screen_size(&self) -> Screen;

    /// Sends a key transition identified by X11 KeySym.
    async fn send_key_event(
        &mut self,
        name: &str,
        key: u32,
        pressed: bool,
    ) -> Result<(), TransportError>;

    /// Sends the pointer position together with the button mask.
    async fn send_pointer_event(
        &mut self,
        name: &str,
        button_mask: u8,
        x: u16,
        y: u16,
        pressed: bool,
    ) -> Result<(), TransportError>;
}

/// Error type for profile switches.
#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("no profile named {0:?}")]
    UnknownProfile(String),
    #[error("could not connect profile {profile:?}: {source}")]
    Connect {
        profile: String,
        #[source]
        source: TransportError,
    },
}

/// What a resolved combination did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyOutcome {
    /// No hotkey matched; forward the events.
    NotPressed,
    /// The active profile's hotkey was pressed; the loop must stop.
    Stop,
    /// The profile at this index is now active.
    Switched(usize),
    /// The profile at this index matched but could not be connected.
    SwitchFailed(usize),
}

/// The Session Switch controller.
pub struct SessionSwitcher {
    profiles: Vec<Profile>,
    transport: Box<dyn RemoteTransport>,
    forever: bool,
    active: Option<usize>,
    tracker: ComboTracker,
    mapper: CoordinateMapper,
    remote_screen: Screen,
}

impl SessionSwitcher {
    /// Creates an idle switcher: nothing connected, hotkeys still detected.
    pub fn new(profiles: Vec<Profile>, transport: Box<dyn RemoteTransport>, forever: bool) -> Self {
        Self {
            profiles,
            transport,
            forever,
            active: None,
            tracker: ComboTracker::idle(),
            mapper: CoordinateMapper::default(),
            remote_screen: Screen::default(),
        }
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// The profile currently receiving input, if any.
    pub fn active_profile(&self) -> Option<&Profile> {
        self.active.and_then(|i| self.profiles.get(i))
    }

    pub fn tracker(&self) -> &ComboTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ComboTracker {
        &mut self.tracker
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn remote_screen(&self) -> Screen {
        self.remote_screen
    }

    /// Feeds a recentered local pointer sample into the mapper.
    ///
    /// Ignored while no profile is active.
    pub fn apply_pointer_sample(&mut self, x: u16, y: u16, local: Screen) {
        if self.active.is_some() {
            self.mapper.set_coords(x, y, local, self.remote_screen);
        }
    }

    /// Switches to the profile called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchError::UnknownProfile`] for an unconfigured name and
    /// [`SwitchError::Connect`] if the transport cannot connect.
    pub async fn activate(&mut self, name: &str) -> Result<(), SwitchError> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| SwitchError::UnknownProfile(name.to_string()))?;
        self.switch_to(index).await
    }

    /// Checks every profile's hotkey against `candidates` and acts on the
    /// first match, in configuration order.
    ///
    /// `candidates` should hold the held modifiers and the resolved output of
    /// the current transition.  Release transitions never match.
    pub async fn on_resolved_combo(
        &mut self,
        candidates: &[EventDefinition],
        is_press: bool,
    ) -> HotkeyOutcome {
        if !is_press {
            return HotkeyOutcome::NotPressed;
        }
        let Some(index) = self
            .profiles
            .iter()
            .position(|p| p.hotkey_matches(candidates))
        else {
            return HotkeyOutcome::NotPressed;
        };

        if self.active == Some(index) && !self.forever {
            info!(profile = %self.profiles[index].name, "hotkey of active profile pressed, stopping");
            self.disconnect().await;
            return HotkeyOutcome::Stop;
        }

        match self.switch_to(index).await {
            Ok(()) => HotkeyOutcome::Switched(index),
            Err(e) => {
                error!(error = %e, "profile switch failed, staying disconnected");
                HotkeyOutcome::SwitchFailed(index)
            }
        }
    }

    async fn switch_to(&mut self, index: usize) -> Result<(), SwitchError> {
        self.disconnect().await;

        let profile = self
            .profiles
            .get(index)
            .ok_or_else(|| SwitchError::UnknownProfile(index.to_string()))?;
        info!(
            profile = %profile.name,
            host = %profile.target.host,
            port = profile.target.port,
            "connecting"
        );
        self.transport
            .connect(&profile.name, profile.connect_timeout)
            .await
            .map_err(|source| SwitchError::Connect {
                profile: profile.name.clone(),
                source,
            })?;

        if !profile.settle_delay.is_zero() {
            tokio::time::sleep(profile.settle_delay).await;
        }

        let remote = self.transport.screen_size();
        self.tracker = ComboTracker::for_profile(profile);
        self.mapper.center_on(remote);
        self.remote_screen = remote;
        self.active = Some(index);

        let (x, y) = self.mapper.position();
        if let Err(e) = self
            .transport
            .send_pointer_event(MOTION, 0, x, y, false)
            .await
        {
            warn!(error = %e, "failed to center remote pointer");
        }
        info!(
            profile = %profile.name,
            width = remote.width,
            height = remote.height,
            "profile active"
        );
        Ok(())
    }

    /// Disconnects the transport if connected and returns to idle.
    pub async fn disconnect(&mut self) {
        if self.transport.is_connected() {
            match self.transport.disconnect().await {
                Ok(()) => info!(
                    profile = self.active_profile().map(|p| p.name.as_str()),
                    "disconnected"
                ),
                Err(e) => warn!(error = %e, "disconnect failed"),
            }
        }
        self.active = None;
        self.tracker = ComboTracker::idle();
    }

    /// Transmits one resolved definition to the active remote.
    ///
    /// Pointer definitions go out at the mapper position, with the button
    /// mask while pressed and an empty mask on release.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::NotConnected`] when no profile is active, or
    /// whatever the transport reports.
    pub async fn send(&mut self, def: &EventDefinition) -> Result<(), TransportError> {
        if self.active.is_none() {
            return Err(TransportError::NotConnected);
        }
        if def.is_key {
            debug!(name = %def.name, pressed = def.is_press, "key");
            self.transport
                .send_key_event(&def.name, def.key, def.is_press)
                .await
        } else {
            let (x, y) = self.mapper.position();
            let mask = if def.is_press { def.button_mask() } else { 0 };
            debug!(name = %def.name, pressed = def.is_press, x, y, mask, "pointer");
            self.transport
                .send_pointer_event(&def.name, mask, x, y, def.is_press)
                .await
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use vkvm_core::{ConnectionTarget, DefinitionRegistry, ProfileSpec};

    fn profile(name: &str, hotkey: &str) -> Profile {
        Profile::from_spec(
            ProfileSpec {
                name: name.to_string(),
                target: ConnectionTarget {
                    host: "192.168.1.20".to_string(),
                    port: 5900,
                    credential: None,
                },
                hotkey: hotkey.to_string(),
                keymap: vec![("Alt_L".to_string(), "Meta_L".to_string())],
                scroll_speed: 2,
                settle_delay: Duration::ZERO,
                connect_timeout: Duration::from_secs(3),
            },
            DefinitionRegistry::global(),
        )
        .unwrap()
    }

    fn pressed(names: &[&str]) -> Vec<EventDefinition> {
        names
            .iter()
            .map(|n| DefinitionRegistry::global().by_name(n).unwrap().with_press(true))
            .collect()
    }

    /// A transport that connects successfully once and reports `screen`.
    fn connecting_transport(profile: &'static str, screen: Screen) -> MockRemoteTransport {
        let mut transport = MockRemoteTransport::new();
        transport.expect_is_connected().return_const(false);
        transport
            .expect_connect()
            .withf(move |name, timeout| name == profile && *timeout == Duration::from_secs(3))
            .times(1)
            .returning(|_, _| Ok(()));
        transport.expect_screen_size().return_const(screen);
        transport
    }

    #[tokio::test]
    async fn test_activate_connects_and_centers_pointer() {
        // Arrange
        let mut transport = connecting_transport("work", Screen::new(1280, 720));
        transport
            .expect_send_pointer_event()
            .withf(|name, mask, x, y, pressed| {
                name == "Motion" && *mask == 0 && *x == 640 && *y == 360 && !*pressed
            })
            .times(1)
            .returning(|_, _, _, _, _| Ok(()));
        let mut switcher =
            SessionSwitcher::new(vec![profile("work", "F1")], Box::new(transport), false);

        // Act
        switcher.activate("work").await.unwrap();

        // Assert
        assert_eq!(switcher.active_profile().map(|p| p.name.as_str()), Some("work"));
        assert_eq!(switcher.remote_screen(), Screen::new(1280, 720));
        assert_eq!(switcher.mapper().position(), (640, 360));
    }

    #[tokio::test(start_paused = true)]
    async fn test_centering_waits_for_settle_delay() {
        use std::sync::{Arc, Mutex};
        use tokio::time::Instant;

        // Arrange
        let settle = Duration::from_millis(250);
        let centered_at: Arc<Mutex<Option<Instant>>> = Arc::new(Mutex::new(None));
        let mut transport = connecting_transport("work", Screen::new(800, 600));
        let record = Arc::clone(&centered_at);
        transport
            .expect_send_pointer_event()
            .times(1)
            .returning(move |_, _, _, _, _| {
                *record.lock().unwrap() = Some(Instant::now());
                Ok(())
            });
        let mut work = profile("work", "F1");
        work.settle_delay = settle;
        let mut switcher = SessionSwitcher::new(vec![work], Box::new(transport), false);
        let started = Instant::now();

        // Act
        switcher.activate("work").await.unwrap();

        // Assert
        let centered = centered_at.lock().unwrap().expect("pointer was centred");
        assert!(centered.duration_since(started) >= settle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activation_not_finished_before_settle_delay() {
        // Arrange
        let mut transport = connecting_transport("work", Screen::new(800, 600));
        transport.expect_send_pointer_event().times(0);
        let mut work = profile("work", "F1");
        work.settle_delay = Duration::from_secs(2);
        let mut switcher = SessionSwitcher::new(vec![work], Box::new(transport), false);

        // Act
        let early = tokio::time::timeout(
            Duration::from_millis(1999),
            switcher.activate("work"),
        )
        .await;

        // Assert
        assert!(early.is_err());
        assert!(switcher.active_profile().is_none());
    }

    #[tokio::test]
    async fn test_activate_unknown_profile_is_error() {
        let transport = MockRemoteTransport::new();
        let mut switcher =
            SessionSwitcher::new(vec![profile("work", "F1")], Box::new(transport), false);

        let result = switcher.activate("garage").await;

        assert!(matches!(result, Err(SwitchError::UnknownProfile(n)) if n == "garage"));
    }

    #[tokio::test]
    async fn test_connect_failure_leaves_session_idle() {
        // Arrange
        let mut transport = MockRemoteTransport::new();
        transport.expect_is_connected().return_const(false);
        transport
            .expect_connect()
            .times(1)
            .returning(|_, _| Err(TransportError::Connect("connection refused".to_string())));
        transport.expect_send_pointer_event().never();
        let mut switcher =
            SessionSwitcher::new(vec![profile("work", "F1")], Box::new(transport), false);

        // Act
        let outcome = switcher.on_resolved_combo(&pressed(&["F1"]), true).await;

        // Assert
        assert_eq!(outcome, HotkeyOutcome::SwitchFailed(0));
        assert!(switcher.active_profile().is_none());
    }

    #[tokio::test]
    async fn test_release_never_triggers_hotkey() {
        let mut transport = MockRemoteTransport::new();
        transport.expect_connect().never();
        let mut switcher =
            SessionSwitcher::new(vec![profile("work", "F1")], Box::new(transport), false);

        let outcome = switcher.on_resolved_combo(&pressed(&["F1"]), false).await;

        assert_eq!(outcome, HotkeyOutcome::NotPressed);
    }

    #[tokio::test]
    async fn test_hotkey_matches_with_extra_modifiers() {
        // Arrange
        let mut transport = connecting_transport("home", Screen::new(800, 600));
        transport
            .expect_send_pointer_event()
            .returning(|_, _, _, _, _| Ok(()));
        let profiles = vec![profile("work", "Control_R+F1"), profile("home", "Control_R+F2")];
        let mut switcher = SessionSwitcher::new(profiles, Box::new(transport), false);

        // Act
        let outcome = switcher
            .on_resolved_combo(&pressed(&["Shift_L", "Control_R", "F2"]), true)
            .await;

        // Assert
        assert_eq!(outcome, HotkeyOutcome::Switched(1));
    }

    #[tokio::test]
    async fn test_active_hotkey_stops_and_disconnects() {
        // Arrange
        let mut transport = connecting_transport("work", Screen::new(800, 600));
        transport
            .expect_send_pointer_event()
            .returning(|_, _, _, _, _| Ok(()));
        let mut switcher =
            SessionSwitcher::new(vec![profile("work", "F1")], Box::new(transport), false);
        switcher.activate("work").await.unwrap();

        // Act
        let outcome = switcher.on_resolved_combo(&pressed(&["F1"]), true).await;

        // Assert
        assert_eq!(outcome, HotkeyOutcome::Stop);
        assert!(switcher.active_profile().is_none());
    }

    #[tokio::test]
    async fn test_forever_reconnects_instead_of_stopping() {
        // Arrange
        let mut transport = MockRemoteTransport::new();
        transport.expect_is_connected().return_const(true);
        transport.expect_disconnect().times(2).returning(|| Ok(()));
        transport.expect_connect().times(2).returning(|_, _| Ok(()));
        transport.expect_screen_size().return_const(Screen::new(800, 600));
        transport
            .expect_send_pointer_event()
            .times(2)
            .returning(|_, _, _, _, _| Ok(()));
        let mut switcher =
            SessionSwitcher::new(vec![profile("work", "F1")], Box::new(transport), true);
        switcher.activate("work").await.unwrap();

        // Act
        let outcome = switcher.on_resolved_combo(&pressed(&["F1"]), true).await;

        // Assert
        assert_eq!(outcome, HotkeyOutcome::Switched(0));
        assert!(switcher.active_profile().is_some());
    }

    #[tokio::test]
    async fn test_switch_replaces_tracker_state() {
        // Arrange
        let mut transport = connecting_transport("work", Screen::new(800, 600));
        transport
            .expect_send_pointer_event()
            .returning(|_, _, _, _, _| Ok(()));
        let mut switcher =
            SessionSwitcher::new(vec![profile("work", "F1")], Box::new(transport), false);
        let alt = DefinitionRegistry::global().by_name("Alt_L").unwrap();
        switcher.tracker_mut().handle(alt.with_press(true));
        assert_eq!(switcher.tracker().held_modifiers().len(), 1);

        // Act
        switcher.activate("work").await.unwrap();

        // Assert – held modifiers do not survive a switch
        assert!(switcher.tracker().held_modifiers().is_empty());
    }

    #[tokio::test]
    async fn test_send_uses_mask_only_while_pressed() {
        // Arrange
        let mut transport = connecting_transport("work", Screen::new(100, 100));
        transport
            .expect_send_pointer_event()
            .withf(|name, _, _, _, _| name == "Motion")
            .times(1)
            .returning(|_, _, _, _, _| Ok(()));
        transport
            .expect_send_pointer_event()
            .withf(|name, mask, x, y, pressed| {
                name == "Button_Right" && *mask == 0b100 && *pressed && (*x, *y) == (50, 50)
            })
            .times(1)
            .returning(|_, _, _, _, _| Ok(()));
        transport
            .expect_send_pointer_event()
            .withf(|name, mask, _, _, pressed| name == "Button_Right" && *mask == 0 && !*pressed)
            .times(1)
            .returning(|_, _, _, _, _| Ok(()));
        let mut switcher =
            SessionSwitcher::new(vec![profile("work", "F1")], Box::new(transport), false);
        switcher.activate("work").await.unwrap();
        let right = DefinitionRegistry::global().by_name("Button_Right").unwrap();

        // Act + Assert
        assert!(switcher.send(&right.with_press(true)).await.is_ok());
        assert!(switcher.send(&right.with_press(false)).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_without_active_profile_is_not_connected() {
        let transport = MockRemoteTransport::new();
        let mut switcher = SessionSwitcher::new(Vec::new(), Box::new(transport), false);
        let a = DefinitionRegistry::global().by_name("a").unwrap();

        assert_eq!(switcher.send(&a).await, Err(TransportError::NotConnected));
    }

    #[tokio::test]
    async fn test_pointer_sample_ignored_while_idle() {
        let transport = MockRemoteTransport::new();
        let mut switcher = SessionSwitcher::new(Vec::new(), Box::new(transport), false);

        switcher.apply_pointer_sample(1000, 1000, Screen::new(100, 100));

        assert_eq!(switcher.mapper().position(), (0, 0));
    }
}
