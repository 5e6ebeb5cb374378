//! Coordinate mapper: turns recentered local pointer samples into an
//! accumulated, bounded remote pointer position.
//!
//! The capture side warps the local pointer back to the middle of the local
//! screen after every sample, so each sample is effectively a delta from the
//! local midpoint.  The mapper adds that delta to the remote position it
//! remembers.
//!
//! All arithmetic is unsigned 16-bit.  A step below zero wraps to the top of
//! the range, which is why the bounds check treats the upper half of `u16` as
//! "went negative".

use serde::{Deserialize, Serialize};

/// Largest value considered non-negative (`u16::MAX / 2`).
const HALF_RANGE: u16 = u16::MAX / 2;

/// Screen dimensions in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Screen {
    pub width: u16,
    pub height: u16,
}

impl Screen {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Midpoint of the screen, rounded down.
    pub const fn midpoint(&self) -> (u16, u16) {
        (self.width / 2, self.height / 2)
    }
}

/// Applies one axis of a recentered sample to `value`.
///
/// ```text
/// v' = v + sample - local_size / 2     (wrapping)
/// v' < 1 or v' > 32767        → 0
/// remote_size <= v' <= 32767  → remote_size
/// ```
///
/// The thresholds are the sign test; do not replace them with signed math,
/// the edge behaviour differs.
pub fn screen_offset(value: u16, sample: u16, local_size: u16, remote_size: u16) -> u16 {
    let mut value = value.wrapping_add(sample.wrapping_sub(local_size / 2));
    if value < 1 || value > HALF_RANGE {
        value = 0;
    }
    if value >= remote_size && value <= HALF_RANGE {
        value = remote_size;
    }
    value
}

/// Accumulated remote pointer position for one active profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinateMapper {
    x: u16,
    y: u16,
}

impl CoordinateMapper {
    /// A mapper positioned at the middle of `remote`.
    pub fn centered(remote: Screen) -> Self {
        let (x, y) = remote.midpoint();
        Self { x, y }
    }

    /// Moves the position back to the middle of `remote`.
    pub fn center_on(&mut self, remote: Screen) {
        (self.x, self.y) = remote.midpoint();
    }

    /// Applies a local sample on both axes.
    pub fn set_coords(&mut self, sample_x: u16, sample_y: u16, local: Screen, remote: Screen) {
        self.x = screen_offset(self.x, sample_x, local.width, remote.width);
        self.y = screen_offset(self.y, sample_y, local.height, remote.height);
    }

    /// Current remote position.
    pub fn position(&self) -> (u16, u16) {
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_zero_resets_to_zero() {
        assert_eq!(screen_offset(0, 0, 1000, 1000), 0);
        assert_eq!(screen_offset(10, 480, 1000, 1000), 0);
    }

    #[test]
    fn test_in_range_accumulates() {
        assert_eq!(screen_offset(500, 600, 1000, 1000), 600);
        assert_eq!(screen_offset(500, 400, 1000, 1000), 400);
    }

    #[test]
    fn test_above_remote_clamps_to_remote_size() {
        assert_eq!(screen_offset(999, 600, 1000, 1000), 1000);
        assert_eq!(screen_offset(1000, 500, 1000, 1000), 1000);
    }

    #[test]
    fn test_exactly_one_is_kept() {
        assert_eq!(screen_offset(0, 501, 1000, 1000), 1);
    }

    #[test]
    fn test_half_range_boundary() {
        // 32767 is still "non-negative"; 32768 counts as wrapped.
        assert_eq!(screen_offset(32767, 500, 1000, 40000), 32767);
        assert_eq!(screen_offset(32767, 501, 1000, 40000), 0);
    }

    #[test]
    fn test_mapper_centers_and_moves() {
        // Arrange
        let local = Screen::new(1920, 1080);
        let remote = Screen::new(1280, 720);
        let mut mapper = CoordinateMapper::centered(remote);
        assert_eq!(mapper.position(), (640, 360));

        // Act – 10px right, 20px up
        mapper.set_coords(970, 520, local, remote);

        // Assert
        assert_eq!(mapper.position(), (650, 340));
    }

    #[test]
    fn test_mapper_stays_within_bounds() {
        let local = Screen::new(1000, 1000);
        let remote = Screen::new(200, 200);
        let mut mapper = CoordinateMapper::centered(remote);

        mapper.set_coords(900, 100, local, remote);

        assert_eq!(mapper.position(), (200, 0));
    }

    #[test]
    fn test_center_on_resets_position() {
        let mut mapper = CoordinateMapper::centered(Screen::new(100, 100));
        mapper.set_coords(600, 600, Screen::new(1000, 1000), Screen::new(100, 100));
        mapper.center_on(Screen::new(800, 600));
        assert_eq!(mapper.position(), (400, 300));
    }
}
