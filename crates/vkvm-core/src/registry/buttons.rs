//! Pointer button table.
//!
//! Button numbers follow the X11 core protocol: 1-3 are the physical buttons,
//! 4/5 are the vertical wheel.  0 is not a real button; it names a motion
//! sample with nothing held.

/// Name of the "motion, no button" pseudo-button.
pub const MOTION: &str = "Motion";
/// Name of the wheel-up pseudo-button.
pub const SCROLL_UP: &str = "Button_Up";
/// Name of the wheel-down pseudo-button.
pub const SCROLL_DOWN: &str = "Button_Down";

/// `(name, button)` pairs.
pub const BUTTONS: &[(&str, u8)] = &[
    (MOTION, 0),
    ("Button_Left", 1),
    ("Button_Middle", 2),
    ("Button_Right", 3),
    (SCROLL_UP, 4),
    (SCROLL_DOWN, 5),
    ("Button_6", 6),
    ("Button_7", 7),
    ("Button_8", 8),
    ("Button_9", 9),
];
