//! Board positions and directions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell on the board.
///
/// Coordinates are signed so that range expansion near the edges can produce
/// off-board candidates without wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row, growing upwards).
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position shifted by `(dx, dy)`, saturating at the `i32` limits.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// The position `steps` cells away in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction, steps: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx.saturating_mul(steps), dy.saturating_mul(steps))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A cardinal direction used by movement expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards larger `y`.
    Up,
    /// Towards larger `x`.
    Right,
    /// Towards smaller `y`.
    Bottom,
    /// Towards smaller `x`.
    Left,
}

impl Direction {
    /// All four directions in expansion order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Bottom, Self::Left];

    /// Unit vector for this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Right => (1, 0),
            Self::Bottom => (0, -1),
            Self::Left => (-1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_log_format() {
        assert_eq!(Position::new(1, 2).to_string(), "1,2");
        assert_eq!(Position::new(-1, 0).to_string(), "-1,0");
    }

    #[test]
    fn test_step() {
        let origin = Position::new(4, 4);
        assert_eq!(origin.step(Direction::Up, 2), Position::new(4, 6));
        assert_eq!(origin.step(Direction::Right, 1), Position::new(5, 4));
        assert_eq!(origin.step(Direction::Bottom, 3), Position::new(4, 1));
        assert_eq!(origin.step(Direction::Left, 4), Position::new(0, 4));
    }

    #[test]
    fn test_offset_saturates_at_limits() {
        let edge = Position::new(i32::MAX, i32::MIN);
        assert_eq!(edge.offset(1, -1), edge);
        assert_eq!(edge.step(Direction::Right, i32::MAX), edge);
        assert_eq!(edge.step(Direction::Left, 1), Position::new(i32::MAX - 1, i32::MIN));
    }
}
