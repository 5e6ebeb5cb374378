//! Mock input source for unit testing.
//!
//! Allows tests to inject synthetic [`RawInputEvent`]s without grabbing any
//! real keyboard or pointer.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedSender};
use vkvm_core::Screen;

use super::{CaptureError, InputSource, RawInputEvent};

/// A mock implementation of [`InputSource`] that allows tests to inject events.
pub struct MockInputSource {
    screen: Screen,
    sender: Arc<Mutex<Option<UnboundedSender<RawInputEvent>>>>,
    ungrab_count: Arc<Mutex<u32>>,
}

impl MockInputSource {
    /// Creates a new mock input source reporting `screen` as the local screen.
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            sender: Arc::new(Mutex::new(None)),
            ungrab_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Injects a synthetic event, as if captured from hardware.
    ///
    /// Panics if `grab()` has not been called or if `ungrab()` has been called.
    pub fn inject_event(&self, event: RawInputEvent) {
        let guard = self.sender.lock().expect("lock poisoned");
        if let Some(ref sender) = *guard {
            sender
                .send(event)
                .expect("receiver has been dropped; call grab() first");
        } else {
            panic!("MockInputSource::inject_event called before grab()");
        }
    }

    /// Returns the number of times [`InputSource::ungrab`] was called.
    pub fn ungrab_count(&self) -> u32 {
        *self.ungrab_count.lock().expect("lock poisoned")
    }
}

impl Default for MockInputSource {
    fn default() -> Self {
        Self::new(Screen::new(1920, 1080))
    }
}

impl InputSource for MockInputSource {
    fn grab(&self) -> Result<mpsc::UnboundedReceiver<RawInputEvent>, CaptureError> {
        let mut guard = self.sender.lock().expect("lock poisoned");
        if guard.is_some() {
            return Err(CaptureError::AlreadyGrabbed);
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *guard = Some(tx);
        Ok(rx)
    }

    fn ungrab(&self) {
        // Drop the sender to close the channel
        *self.sender.lock().expect("lock poisoned") = None;
        *self.ungrab_count.lock().expect("lock poisoned") += 1;
    }

    fn screen(&self) -> Screen {
        self.screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_input_source_grabs_and_receives_events() {
        // Arrange
        let source = MockInputSource::default();
        let mut rx = source.grab().expect("grab should succeed");

        // Act
        source.inject_event(RawInputEvent::KeyDown { keysym: 0x61 });

        // Assert
        let event = rx.recv().await.expect("should receive event");
        assert_eq!(event, RawInputEvent::KeyDown { keysym: 0x61 });
    }

    #[tokio::test]
    async fn test_mock_input_source_ungrab_closes_channel() {
        // Arrange
        let source = MockInputSource::default();
        let mut rx = source.grab().expect("grab should succeed");

        // Act
        source.ungrab();

        // Assert – channel should be disconnected
        assert!(rx.recv().await.is_none(), "channel should be closed after ungrab()");
        assert_eq!(source.ungrab_count(), 1);
    }

    #[test]
    fn test_mock_input_source_rejects_second_grab() {
        let source = MockInputSource::default();
        let _rx = source.grab().expect("first grab should succeed");
        assert!(matches!(source.grab(), Err(CaptureError::AlreadyGrabbed)));
    }

    #[test]
    fn test_mock_input_source_reports_screen() {
        let source = MockInputSource::new(Screen::new(800, 600));
        assert_eq!(source.screen(), Screen::new(800, 600));
    }

    #[tokio::test]
    async fn test_mock_input_source_inject_multiple_event_types() {
        // Arrange
        let source = MockInputSource::default();
        let mut rx = source.grab().expect("grab should succeed");

        // Act
        source.inject_event(RawInputEvent::Motion { button: 0, pressed: false, x: 100, y: 200 });
        source.inject_event(RawInputEvent::ButtonDown { button: 1, x: 100, y: 200 });
        source.inject_event(RawInputEvent::ButtonUp { button: 4, x: 100, y: 200 });

        // Assert
        assert!(matches!(rx.recv().await.unwrap(), RawInputEvent::Motion { x: 100, .. }));
        assert!(matches!(rx.recv().await.unwrap(), RawInputEvent::ButtonDown { button: 1, .. }));
        assert!(matches!(rx.recv().await.unwrap(), RawInputEvent::ButtonUp { button: 4, .. }));
    }
}
