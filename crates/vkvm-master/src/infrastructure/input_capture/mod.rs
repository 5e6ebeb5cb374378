//! Input capture infrastructure for the master application.
//!
//! An [`InputSource`] grabs the local keyboard and pointer and delivers every
//! transition as a [`RawInputEvent`] on a channel.  The dispatch loop owns the
//! receiving end and processes events strictly one at a time.
//!
//! # Pointer samples
//!
//! Pointer coordinates are *recentered samples*: the source is expected to
//! warp the local pointer back to the middle of the local screen after every
//! sample, so `(x, y)` minus the local midpoint is the movement since the last
//! sample.  The coordinate mapper relies on this.
//!
//! # Testability
//!
//! The `InputSource` trait allows unit tests to inject synthetic events
//! through [`mock::MockInputSource`], and [`script::ScriptInputSource`]
//! replays a recorded event script without touching any input device.

use tokio::sync::mpsc;
use vkvm_core::Screen;

pub mod mock;
pub mod script;

/// A raw input event produced by the input capture infrastructure.
///
/// Codes are not yet resolved to names; unknown codes are reported and
/// skipped by the dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInputEvent {
    /// A key was pressed down.
    KeyDown {
        /// X11 KeySym.
        keysym: u32,
    },
    /// A key was released.
    KeyUp { keysym: u32 },
    /// A pointer button (or wheel direction) was pressed.
    ButtonDown { button: u8, x: u16, y: u16 },
    /// A pointer button (or wheel direction) was released.
    ButtonUp { button: u8, x: u16, y: u16 },
    /// The pointer moved.
    Motion {
        /// Button held during the move, 0 when none.
        button: u8,
        /// Press state of `button`; always `false` for a plain move.
        pressed: bool,
        x: u16,
        y: u16,
    },
}

impl RawInputEvent {
    /// `(code, is_key, is_press)` for registry lookup.
    pub fn code(&self) -> (u32, bool, bool) {
        match *self {
            Self::KeyDown { keysym } => (keysym, true, true),
            Self::KeyUp { keysym } => (keysym, true, false),
            Self::ButtonDown { button, .. } => (u32::from(button), false, true),
            Self::ButtonUp { button, .. } => (u32::from(button), false, false),
            Self::Motion { button, pressed, .. } => (u32::from(button), false, pressed),
        }
    }

    /// Pointer sample carried by the event, if any.
    pub fn coords(&self) -> Option<(u16, u16)> {
        match *self {
            Self::KeyDown { .. } | Self::KeyUp { .. } => None,
            Self::ButtonDown { x, y, .. }
            | Self::ButtonUp { x, y, .. }
            | Self::Motion { x, y, .. } => Some((x, y)),
        }
    }
}

/// Error type for input capture operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to grab input: {0}")]
    GrabFailed(String),
    #[error("input source has already been grabbed")]
    AlreadyGrabbed,
    #[error("failed to read input script {path}: {source}")]
    Script {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Trait abstracting input event production.
pub trait InputSource: Send {
    /// Grabs input and returns a receiver for captured events.
    ///
    /// The channel closes when the source runs out of events or is ungrabbed.
    fn grab(&self) -> Result<mpsc::UnboundedReceiver<RawInputEvent>, CaptureError>;
    /// Releases the grab.
    fn ungrab(&self);
    /// Size of the local screen that pointer samples are taken on.
    fn screen(&self) -> Screen;
}
