//! Move and attack range computation.
//!
//! Movement is evaluated per radius rather than as a connected path: every
//! step `i` in a direction looks at the cell exactly `i` away from the
//! origin. Off-board, occupied and HQ cells are skipped without stopping the
//! direction, while the mover's own wall closes the direction for that step
//! and every longer one. Attack rings are not clipped to the board.

use serde::Serialize;
use tracing::debug;

use crate::config::RulesConfig;
use crate::game::{Direction, HeroUnit, MatchStatus, PlayerId, Position, UnitKey, is_hq, is_occupied, wall_at};

/// Directions closed by the mover's own wall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Blocks {
    /// Towards larger `y`.
    pub up: bool,
    /// Towards larger `x`.
    pub right: bool,
    /// Towards smaller `y`.
    pub bottom: bool,
    /// Towards smaller `x`.
    pub left: bool,
}

impl Blocks {
    /// Whether `direction` is closed.
    #[must_use]
    pub const fn is_blocked(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Right => self.right,
            Direction::Bottom => self.bottom,
            Direction::Left => self.left,
        }
    }

    /// Close `direction`.
    pub fn block(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.up = true,
            Direction::Right => self.right = true,
            Direction::Bottom => self.bottom = true,
            Direction::Left => self.left = true,
        }
    }
}

/// Result of a move range expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveOptions {
    /// Legal destinations, step-major, then up/right/bottom/left.
    pub positions: Vec<Position>,
    /// Directions closed during expansion.
    pub blocks: Blocks,
}

impl MoveOptions {
    /// Whether `pos` is a legal destination.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }
}

/// Legal destinations for `unit`'s move action.
///
/// A unit off the board has no destinations.
#[must_use]
pub fn move_options(unit: &HeroUnit, status: &MatchStatus, config: &RulesConfig) -> MoveOptions {
    let mut options = MoveOptions::default();
    let Some(origin) = unit.position else {
        return options;
    };
    // No straight line on the board is longer than `board_size - 1` cells.
    let steps = i32::try_from(unit.stats.movement)
        .unwrap_or(i32::MAX)
        .min(config.board_size);

    for step in 1..=steps {
        for direction in Direction::ALL {
            let candidate = origin.step(direction, step);
            if !config.in_bounds(candidate) {
                continue;
            }

            let skip = is_occupied(candidate, status).is_some() || is_hq(candidate, config).is_some();
            if wall_at(candidate, config) == Some(unit.player) {
                options.blocks.block(direction);
            }

            if !skip && !options.blocks.is_blocked(direction) && !options.contains(candidate) {
                options.positions.push(candidate);
            }
        }
    }

    debug!(
        unit = %unit.key(),
        movement = unit.stats.movement,
        count = options.positions.len(),
        "move options computed"
    );
    options
}

/// Cells within `unit`'s attack reach: the ring of 8 cells at each radius,
/// with no edge clipping or occupancy filtering.
///
/// Returns `None` for a unit off the board.
#[must_use]
pub fn attack_options(unit: &HeroUnit, config: &RulesConfig) -> Option<Vec<Position>> {
    let origin = unit.position?;
    let mut cells = Vec::with_capacity(8 * usize::try_from(config.attack_radius).unwrap_or(1));
    for i in 1..=config.attack_radius {
        cells.extend([
            origin.offset(0, i),
            origin.offset(0, -i),
            origin.offset(-i, 0),
            origin.offset(i, 0),
            origin.offset(-i, i),
            origin.offset(i, i),
            origin.offset(-i, -i),
            origin.offset(i, -i),
        ]);
    }
    debug!(unit = %unit.key(), count = cells.len(), "attack options computed");
    Some(cells)
}

/// What an attack on a cell would hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttackTarget {
    /// A living unit of the other player.
    EnemyUnit {
        /// The unit on the cell.
        unit: UnitKey,
    },
    /// A headquarters.
    Hq {
        /// Owner of the HQ.
        player: PlayerId,
    },
}

/// Classify `pos` as a target for `attacker`, given the attack options in
/// force. Cells outside `options`, empty cells and allied units yield `None`.
#[must_use]
pub fn attack_target(
    attacker: &HeroUnit,
    pos: Position,
    options: &[Position],
    status: &MatchStatus,
    config: &RulesConfig,
) -> Option<AttackTarget> {
    if !options.contains(&pos) {
        return None;
    }
    if let Some(player) = is_hq(pos, config) {
        return Some(AttackTarget::Hq { player });
    }
    is_occupied(pos, status)
        .filter(|occupant| occupant.player != attacker.player)
        .map(|occupant| AttackTarget::EnemyUnit {
            unit: occupant.key(),
        })
}
