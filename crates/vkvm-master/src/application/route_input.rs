//! RouteInputUseCase: the per-event dispatch loop.
//!
//! This use case is the heart of the master application.  Every captured
//! transition goes through the same steps, one at a time, to completion:
//!
//! ```text
//! raw event ─► registry lookup ─► pointer sample into mapper
//!           ─► tracker.handle + resolve
//!           ─► hotkey? (switch / stop, nothing forwarded)
//!           ─► forward resolved definitions to the active remote
//! ```
//!
//! # Architecture
//!
//! This use case depends only on [`SessionSwitcher`] (which in turn talks to
//! the [`RemoteTransport`](super::switch_session::RemoteTransport) trait) and
//! on domain types from `vkvm_core`.  Input arrives on a channel, so any
//! [`InputSource`](crate::infrastructure::input_capture::InputSource) can
//! drive it.

use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{trace, warn};
use vkvm_core::{DefinitionRegistry, RegistryError, Screen};

use crate::infrastructure::input_capture::RawInputEvent;

use super::switch_session::{HotkeyOutcome, SessionSwitcher};

/// Error type for the route-input use case.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("unrecognised input: {0}")]
    UnknownCode(#[from] RegistryError),
}

/// Whether the dispatch loop keeps going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// The Route Input use case.
pub struct RouteInputUseCase {
    registry: &'static DefinitionRegistry,
    switcher: SessionSwitcher,
    local_screen: Screen,
    /// Hotkey names whose physical release must not reach the new remote.
    swallowed: Vec<String>,
}

impl RouteInputUseCase {
    /// Creates a new use case around `switcher`.
    ///
    /// `local_screen` is the screen pointer samples are taken on.
    pub fn new(switcher: SessionSwitcher, local_screen: Screen) -> Self {
        Self {
            registry: DefinitionRegistry::global(),
            switcher,
            local_screen,
            swallowed: Vec::new(),
        }
    }

    pub fn switcher(&self) -> &SessionSwitcher {
        &self.switcher
    }

    pub fn switcher_mut(&mut self) -> &mut SessionSwitcher {
        &mut self.switcher
    }

    /// Handles a raw input event from the capture service.
    ///
    /// Transmission failures are logged and the event is dropped; they never
    /// surface as errors.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownCode`] if the event's code is not in the
    /// registry.  Nothing is changed in that case.
    pub async fn handle_event(&mut self, event: RawInputEvent) -> Result<Flow, RouteError> {
        let (code, is_key, is_press) = event.code();
        let def = self.registry.definition_for_code(code, is_key, is_press)?;

        if !def.is_press {
            if let Some(pos) = self.swallowed.iter().position(|n| *n == def.name) {
                self.swallowed.remove(pos);
                trace!(name = %def.name, "hotkey release consumed");
                return Ok(Flow::Continue);
            }
        }

        if let Some((x, y)) = event.coords() {
            self.switcher.apply_pointer_sample(x, y, self.local_screen);
        }

        let tracker = self.switcher.tracker_mut();
        tracker.handle(def.clone());
        let resolved = tracker.resolve();

        if def.is_press {
            let mut candidates = self.switcher.tracker().held_modifiers().to_vec();
            candidates.extend(resolved.iter().cloned());
            match self.switcher.on_resolved_combo(&candidates, true).await {
                HotkeyOutcome::NotPressed => {}
                HotkeyOutcome::Stop => return Ok(Flow::Stop),
                HotkeyOutcome::Switched(index) => {
                    self.swallowed = self.switcher.profiles()[index].hotkey.names().to_vec();
                    return Ok(Flow::Continue);
                }
                HotkeyOutcome::SwitchFailed(_) => return Ok(Flow::Continue),
            }
        }

        if self.switcher.active_profile().is_none() {
            return Ok(Flow::Continue);
        }
        for out in &resolved {
            if let Err(e) = self.switcher.send(out).await {
                warn!(name = %out.name, pressed = out.is_press, error = %e, "dropping event");
            }
        }
        Ok(Flow::Continue)
    }

    /// Processes events until the stop hotkey is pressed or the channel
    /// closes, then disconnects.
    pub async fn run(&mut self, mut events: UnboundedReceiver<RawInputEvent>) {
        while let Some(event) = events.recv().await {
            match self.handle_event(event).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop) => break,
                Err(e) => warn!(error = %e, "ignoring input event"),
            }
        }
        self.switcher.disconnect().await;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
