//! Scripted input source: replays a line-based event script.
//!
//! Useful for driving the dispatch loop without a display server, for
//! instance together with the dry-run transport to check a keymap.
//!
//! # Script format
//!
//! One command per line; blank lines and lines starting with `#` are ignored.
//!
//! ```text
//! press Alt_L          # key or button down, by registry name
//! press F1
//! release F1
//! release Alt_L
//! motion 970 540       # pointer sample, 10px right of a 1920x1080 midpoint
//! drag Button_Left 960 560
//! ```
//!
//! Button presses and releases are sampled at the local midpoint, so they do
//! not move the remote pointer.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use vkvm_core::{DefinitionRegistry, RegistryError, Screen};

use super::{CaptureError, InputSource, RawInputEvent};

/// Error for a single malformed script line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("expected {expected} argument(s) for {command:?}")]
    Arity {
        command: &'static str,
        expected: usize,
    },
    #[error("invalid coordinate {0:?}")]
    InvalidCoordinate(String),
    #[error("{0:?} is not a button")]
    NotAButton(String),
    #[error(transparent)]
    Lookup(#[from] RegistryError),
}

/// Where the script is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOrigin {
    Stdin,
    File(PathBuf),
}

impl ScriptOrigin {
    /// `-` means stdin, anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }
}

/// An [`InputSource`] that replays a script on a dedicated reader thread.
pub struct ScriptInputSource {
    origin: ScriptOrigin,
    screen: Screen,
    running: Arc<AtomicBool>,
}

impl ScriptInputSource {
    pub fn new(origin: ScriptOrigin, screen: Screen) -> Self {
        Self {
            origin,
            screen,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    fn open(&self) -> Result<Box<dyn BufRead + Send>, CaptureError> {
        match &self.origin {
            ScriptOrigin::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
            ScriptOrigin::File(path) => {
                let file = File::open(path).map_err(|source| CaptureError::Script {
                    path: path.display().to_string(),
                    source,
                })?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

impl InputSource for ScriptInputSource {
    fn grab(&self) -> Result<mpsc::UnboundedReceiver<RawInputEvent>, CaptureError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::AlreadyGrabbed);
        }
        let reader = match self.open() {
            Ok(reader) => reader,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let running = Arc::clone(&self.running);
        let screen = self.screen;
        std::thread::Builder::new()
            .name("vkvm-script".to_string())
            .spawn(move || replay(reader, tx, screen, running))
            .map_err(|e| CaptureError::GrabFailed(e.to_string()))?;
        Ok(rx)
    }

    fn ungrab(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn screen(&self) -> Screen {
        self.screen
    }
}

/// Reader thread body: parses lines until EOF, ungrab, or a closed receiver.
fn replay(
    reader: Box<dyn BufRead + Send>,
    tx: mpsc::UnboundedSender<RawInputEvent>,
    screen: Screen,
    running: Arc<AtomicBool>,
) {
    let registry = DefinitionRegistry::global();
    for (index, line) in reader.lines().enumerate() {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "input script read failed");
                break;
            }
        };
        match parse_line(&line, registry, screen) {
            Ok(Some(event)) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => warn!(line = index + 1, error = %e, "skipping script line"),
        }
    }
    debug!("input script finished");
}

/// Parses one script line.  Returns `Ok(None)` for blank lines and comments.
///
/// # Errors
///
/// Returns [`ScriptError`] describing why the line is unusable.
pub fn parse_line(
    line: &str,
    registry: &DefinitionRegistry,
    screen: Screen,
) -> Result<Option<RawInputEvent>, ScriptError> {
    let line = line.split('#').next().unwrap_or_default().trim();
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();
    let (mid_x, mid_y) = screen.midpoint();

    let event = match command {
        "press" | "release" => {
            let [name] = args[..] else {
                return Err(ScriptError::Arity {
                    command: if command == "press" { "press" } else { "release" },
                    expected: 1,
                });
            };
            let def = registry.by_name(name)?;
            let pressed = command == "press";
            match (def.is_key, pressed) {
                (true, true) => RawInputEvent::KeyDown { keysym: def.key },
                (true, false) => RawInputEvent::KeyUp { keysym: def.key },
                (false, true) => RawInputEvent::ButtonDown {
                    button: def.button,
                    x: mid_x,
                    y: mid_y,
                },
                (false, false) => RawInputEvent::ButtonUp {
                    button: def.button,
                    x: mid_x,
                    y: mid_y,
                },
            }
        }
        "motion" => {
            let [x, y] = args[..] else {
                return Err(ScriptError::Arity {
                    command: "motion",
                    expected: 2,
                });
            };
            RawInputEvent::Motion {
                button: 0,
                pressed: false,
                x: coordinate(x)?,
                y: coordinate(y)?,
            }
        }
        "drag" => {
            let [name, x, y] = args[..] else {
                return Err(ScriptError::Arity {
                    command: "drag",
                    expected: 3,
                });
            };
            let def = registry.by_name(name)?;
            if def.is_key {
                return Err(ScriptError::NotAButton(name.to_string()));
            }
            RawInputEvent::Motion {
                button: def.button,
                pressed: true,
                x: coordinate(x)?,
                y: coordinate(y)?,
            }
        }
        other => return Err(ScriptError::UnknownCommand(other.to_string())),
    };
    Ok(Some(event))
}

fn coordinate(text: &str) -> Result<u16, ScriptError> {
    text.parse()
        .map_err(|_| ScriptError::InvalidCoordinate(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Screen = Screen::new(1920, 1080);

    fn parse(line: &str) -> Result<Option<RawInputEvent>, ScriptError> {
        parse_line(line, DefinitionRegistry::global(), SCREEN)
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("   "), Ok(None));
        assert_eq!(parse("# switch to work"), Ok(None));
    }

    #[test]
    fn test_press_and_release_keys() {
        assert_eq!(parse("press Alt_L"), Ok(Some(RawInputEvent::KeyDown { keysym: 0xFFE9 })));
        assert_eq!(parse("release a  # trailing"), Ok(Some(RawInputEvent::KeyUp { keysym: 0x61 })));
    }

    #[test]
    fn test_press_button_samples_at_midpoint() {
        assert_eq!(
            parse("press Button_Left"),
            Ok(Some(RawInputEvent::ButtonDown { button: 1, x: 960, y: 540 }))
        );
    }

    #[test]
    fn test_motion_and_drag() {
        assert_eq!(
            parse("motion 970 530"),
            Ok(Some(RawInputEvent::Motion { button: 0, pressed: false, x: 970, y: 530 }))
        );
        assert_eq!(
            parse("drag Button_Right 0 0"),
            Ok(Some(RawInputEvent::Motion { button: 3, pressed: true, x: 0, y: 0 }))
        );
    }

    #[test]
    fn test_malformed_lines_are_errors() {
        assert!(matches!(parse("jump a"), Err(ScriptError::UnknownCommand(_))));
        assert!(matches!(parse("press"), Err(ScriptError::Arity { expected: 1, .. })));
        assert!(matches!(parse("motion 1"), Err(ScriptError::Arity { expected: 2, .. })));
        assert!(matches!(parse("motion -1 2"), Err(ScriptError::InvalidCoordinate(_))));
        assert!(matches!(parse("drag Tab 1 2"), Err(ScriptError::NotAButton(_))));
        assert!(matches!(parse("press Hyper_Z"), Err(ScriptError::Lookup(_))));
    }

    #[tokio::test]
    async fn test_script_file_is_replayed_in_order() {
        // Arrange
        let path = std::env::temp_dir().join(format!("vkvm_script_{}.txt", uuid::Uuid::new_v4()));
        std::fs::write(&path, "press a\nbogus line\n\nrelease a\nmotion 961 540\n").unwrap();
        let source = ScriptInputSource::new(ScriptOrigin::File(path.clone()), SCREEN);

        // Act
        let mut rx = source.grab().expect("grab should succeed");
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        // Assert – the bad line is skipped, the channel closes at EOF
        assert_eq!(
            events,
            [
                RawInputEvent::KeyDown { keysym: 0x61 },
                RawInputEvent::KeyUp { keysym: 0x61 },
                RawInputEvent::Motion { button: 0, pressed: false, x: 961, y: 540 },
            ]
        );

        // Cleanup
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_script_file_fails_to_grab() {
        let source = ScriptInputSource::new(
            ScriptOrigin::File(PathBuf::from("/nonexistent/vkvm/script.txt")),
            SCREEN,
        );
        assert!(matches!(source.grab(), Err(CaptureError::Script { .. })));
        // A failed grab can be retried.
        assert!(matches!(source.grab(), Err(CaptureError::Script { .. })));
    }

    #[test]
    fn test_origin_from_arg() {
        assert_eq!(ScriptOrigin::from_arg("-"), ScriptOrigin::Stdin);
        assert_eq!(
            ScriptOrigin::from_arg("events.txt"),
            ScriptOrigin::File(PathBuf::from("events.txt"))
        );
    }
}
