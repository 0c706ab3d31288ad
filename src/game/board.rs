//! Board geometry predicates.
//!
//! Pure lookups over a position, the rules configuration and (for
//! occupancy) a match snapshot.

use crate::config::RulesConfig;
use crate::game::{HeroUnit, MatchStatus, PlayerId, Position};

/// The living unit standing on `pos`, if any.
#[must_use]
pub fn is_occupied(pos: Position, status: &MatchStatus) -> Option<&HeroUnit> {
    status.living_units().find(|unit| unit.position == Some(pos))
}

/// The player whose units `pos` walls off, if `pos` is a wall cell.
#[must_use]
pub fn wall_at(pos: Position, config: &RulesConfig) -> Option<PlayerId> {
    PlayerId::ALL
        .into_iter()
        .find(|&player| config.walls(player).contains(&pos))
}

/// The player whose HQ sits on `pos`, if any.
#[must_use]
pub fn is_hq(pos: Position, config: &RulesConfig) -> Option<PlayerId> {
    PlayerId::ALL
        .into_iter()
        .find(|&player| config.hq_position(player) == pos)
}
