//! Rules configuration.
//!
//! Every board constant lives in [`RulesConfig`]. The defaults describe the
//! standard 7×7 board; a JSON file can override any subset of fields.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};
use crate::game::{PlayerId, Position};

/// Number of hero units each player fields.
pub const UNITS_PER_PLAYER: usize = 3;

/// Board layout and combat constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Side length of the square board; cells run from 1 to `board_size`.
    pub board_size: i32,
    /// HQ position of player 1.
    pub hq1: Position,
    /// HQ position of player 2.
    pub hq2: Position,
    /// Wall cells that player 1 units cannot cross.
    pub walls1: Vec<Position>,
    /// Wall cells that player 2 units cannot cross.
    pub walls2: Vec<Position>,
    /// Starting cells of player 1's slots 1, 2 and 3.
    pub start1: [Position; UNITS_PER_PLAYER],
    /// Starting cells of player 2's slots 1, 2 and 3.
    pub start2: [Position; UNITS_PER_PLAYER],
    /// HQ health at match start.
    pub hq_health: u32,
    /// Resources spent per attack.
    pub attack_cost: u32,
    /// Attack reach in cells.
    pub attack_radius: i32,
    /// Exclusive upper bound of the damage dice.
    pub dice_bound: u32,
    /// Logical milliseconds between a win condition and its announcement.
    pub win_delay_ms: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        let size = 7;
        Self {
            board_size: size,
            hq1: Position::new(7, 1),
            hq2: Position::new(1, 7),
            walls1: diagonal(size, 3),
            walls2: diagonal(size, -3),
            start1: [Position::new(1, 2), Position::new(2, 2), Position::new(2, 1)],
            start2: [Position::new(7, 6), Position::new(6, 6), Position::new(6, 7)],
            hq_health: 1000,
            attack_cost: 100,
            attack_radius: 1,
            dice_bound: 400,
            win_delay_ms: 500,
        }
    }
}

/// Cells of the diagonal `x - y == offset` inside a `size`×`size` board.
fn diagonal(size: i32, offset: i32) -> Vec<Position> {
    (1..=size)
        .map(|x| Position::new(x, x - offset))
        .filter(|pos| (1..=size).contains(&pos.y))
        .collect()
}

impl RulesConfig {
    /// Load a configuration from a JSON file, defaulting omitted fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration fails [`RulesConfig::validate`].
    pub fn from_json_file(path: &Path) -> RulesResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| RulesError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|source| RulesError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// HQ position of `player`.
    #[must_use]
    pub const fn hq_position(&self, player: PlayerId) -> Position {
        match player {
            PlayerId::One => self.hq1,
            PlayerId::Two => self.hq2,
        }
    }

    /// Wall cells `player`'s units cannot cross.
    #[must_use]
    pub fn walls(&self, player: PlayerId) -> &[Position] {
        match player {
            PlayerId::One => &self.walls1,
            PlayerId::Two => &self.walls2,
        }
    }

    /// Starting cells of `player`'s three slots.
    #[must_use]
    pub const fn start_positions(&self, player: PlayerId) -> &[Position; UNITS_PER_PLAYER] {
        match player {
            PlayerId::One => &self.start1,
            PlayerId::Two => &self.start2,
        }
    }

    /// Whether `pos` lies on the board.
    #[must_use]
    pub fn in_bounds(&self, pos: Position) -> bool {
        let range = 1..=self.board_size;
        range.contains(&pos.x) && range.contains(&pos.y)
    }

    /// Check the configuration for contradictions.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> RulesResult<()> {
        let invalid = |message: String| Err(RulesError::InvalidConfig(message));

        if self.board_size < 1 {
            return invalid(format!("board_size must be positive, got {}", self.board_size));
        }
        if self.attack_radius < 1 {
            return invalid(format!(
                "attack_radius must be at least 1, got {}",
                self.attack_radius
            ));
        }
        if self.dice_bound == 0 {
            return invalid("dice_bound must be positive".to_string());
        }
        if self.hq1 == self.hq2 {
            return invalid(format!("both HQs share cell {}", self.hq1));
        }
        for player in PlayerId::ALL {
            let hq = self.hq_position(player);
            if !self.in_bounds(hq) {
                return invalid(format!("HQ {player} at {hq} is off the board"));
            }
        }

        let mut starts: Vec<Position> = Vec::with_capacity(2 * UNITS_PER_PLAYER);
        for player in PlayerId::ALL {
            for &pos in self.start_positions(player) {
                if !self.in_bounds(pos) {
                    return invalid(format!("player {player} starts off the board at {pos}"));
                }
                if pos == self.hq1 || pos == self.hq2 {
                    return invalid(format!("player {player} starts on an HQ at {pos}"));
                }
                if starts.contains(&pos) {
                    return invalid(format!("two units start on {pos}"));
                }
                starts.push(pos);
            }
        }

        for pos in &self.walls1 {
            if self.walls2.contains(pos) {
                return invalid(format!("wall cell {pos} belongs to both players"));
            }
        }

        Ok(())
    }
}
