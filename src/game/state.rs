//! Match state store.
//!
//! [`MatchStatus`] is an immutable value: every mutation returns a new
//! aggregate with exactly one unit or HQ entry replaced. Holders of an older
//! snapshot keep seeing the state they captured.

use serde::Serialize;
use tracing::debug;

use crate::config::{RulesConfig, UNITS_PER_PLAYER};
use crate::game::{Hero, HeroName, PlayerId, Position, SlotId, Stat, Stats, UnitKey, apply_delta};

/// Health and location of one player's headquarters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HqStats {
    /// Remaining health.
    pub health: u32,
    /// Fixed cell of the HQ.
    pub position: Position,
    /// Owning player.
    pub player: PlayerId,
}

impl HqStats {
    /// Whether the HQ has been destroyed.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.health == 0
    }
}

/// A hero placed in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeroUnit {
    /// The hero definition this unit was created from.
    pub hero: Hero,
    /// Current stats, independent of every other unit.
    pub stats: Stats,
    /// Current cell, `None` once removed from the board.
    pub position: Option<Position>,
    /// Owning player.
    pub player: PlayerId,
    /// Slot within the owner's units.
    pub slot: SlotId,
}

impl HeroUnit {
    /// Place `hero` for `player` in `slot` at `position`.
    #[must_use]
    pub const fn new(hero: Hero, player: PlayerId, slot: SlotId, position: Position) -> Self {
        Self {
            hero,
            stats: hero.stats,
            position: Some(position),
            player,
            slot,
        }
    }

    /// Address of this unit.
    #[must_use]
    pub const fn key(&self) -> UnitKey {
        UnitKey::new(self.player, self.slot)
    }

    /// Hero identity.
    #[must_use]
    pub const fn name(&self) -> HeroName {
        self.hero.name
    }

    /// Whether the unit still has health.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.stats.health > 0
    }

    /// A copy with `delta` applied to `stat`.
    ///
    /// Dropping health to zero also removes the unit from the board.
    #[must_use]
    pub fn with_stat_delta(mut self, stat: Stat, delta: i32) -> Self {
        self.stats = self.stats.with_delta(stat, delta);
        if self.stats.health == 0 {
            self.position = None;
        }
        self
    }
}

/// The authoritative state of a running match.
///
/// Shared through `Arc`; copies are made explicitly with `clone`.
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchStatus {
    hqs: [HqStats; 2],
    units: [[HeroUnit; UNITS_PER_PLAYER]; 2],
}

impl MatchStatus {
    /// Lay out a new match: each player's first three roster heroes on their
    /// starting cells, both HQs at full health.
    ///
    /// Returns `None` if a roster holds fewer than three heroes.
    #[must_use]
    pub fn new(config: &RulesConfig, rosters: [&[Hero]; 2]) -> Option<Self> {
        let place = |player: PlayerId| -> Option<[HeroUnit; UNITS_PER_PLAYER]> {
            let roster = rosters[player.index()];
            let starts = config.start_positions(player);
            let unit = |slot: SlotId| {
                roster
                    .get(slot.index())
                    .map(|hero| HeroUnit::new(*hero, player, slot, starts[slot.index()]))
            };
            Some([unit(SlotId::One)?, unit(SlotId::Two)?, unit(SlotId::Three)?])
        };
        let hq = |player: PlayerId| HqStats {
            health: config.hq_health,
            position: config.hq_position(player),
            player,
        };

        Some(Self {
            hqs: [hq(PlayerId::One), hq(PlayerId::Two)],
            units: [place(PlayerId::One)?, place(PlayerId::Two)?],
        })
    }

    /// HQ of `player`.
    #[must_use]
    pub const fn hq(&self, player: PlayerId) -> &HqStats {
        &self.hqs[player.index()]
    }

    /// Unit addressed by `key`.
    #[must_use]
    pub const fn unit(&self, key: UnitKey) -> &HeroUnit {
        &self.units[key.player.index()][key.slot.index()]
    }

    /// `player`'s units in slot order.
    #[must_use]
    pub const fn units_of(&self, player: PlayerId) -> &[HeroUnit; UNITS_PER_PLAYER] {
        &self.units[player.index()]
    }

    /// Every unit, player 1 first, slots ascending.
    pub fn units(&self) -> impl Iterator<Item = &HeroUnit> {
        self.units.iter().flatten()
    }

    /// Units still alive and on the board.
    pub fn living_units(&self) -> impl Iterator<Item = &HeroUnit> {
        self.units()
            .filter(|unit| unit.is_alive() && unit.position.is_some())
    }

    /// Whether `player` has lost: every unit at zero health or HQ destroyed.
    #[must_use]
    pub fn is_defeated(&self, player: PlayerId) -> bool {
        self.units_of(player).iter().all(|unit| !unit.is_alive()) || self.hq(player).is_destroyed()
    }

    /// Living unit with the most resources across both players.
    ///
    /// Ties go to the earlier unit in [`MatchStatus::units`] order.
    #[must_use]
    pub fn richest_unit(&self) -> Option<&HeroUnit> {
        self.living_units().fold(None, |best: Option<&HeroUnit>, unit| match best {
            Some(best) if best.stats.resources >= unit.stats.resources => Some(best),
            _ => Some(unit),
        })
    }

    /// Mutation handle for the unit at `key`.
    #[must_use]
    pub const fn update(&self, key: UnitKey) -> UnitUpdate<'_> {
        UnitUpdate { status: self, key }
    }

    /// A copy with `unit` stored under its own key.
    #[must_use]
    pub fn with_unit(&self, unit: HeroUnit) -> Self {
        let mut next = self.clone();
        next.units[unit.player.index()][unit.slot.index()] = unit;
        next
    }

    /// A copy with `hq` stored under its owner.
    #[must_use]
    pub fn with_hq(&self, hq: HqStats) -> Self {
        let mut next = self.clone();
        next.hqs[hq.player.index()] = hq;
        next
    }

    /// A copy with `delta` applied to one stat of the unit at `key`.
    #[must_use]
    pub fn with_stat_delta(&self, key: UnitKey, stat: Stat, delta: i32) -> Self {
        let before = *self.unit(key);
        let after = before.with_stat_delta(stat, delta);
        debug!(
            unit = %key,
            ?stat,
            delta,
            from = before.stats.get(stat),
            to = after.stats.get(stat),
            "stat updated"
        );
        self.with_unit(after)
    }

    /// A copy with the unit at `key` moved to `position`.
    ///
    /// A dead unit stays off the board whatever `position` says.
    #[must_use]
    pub fn with_position(&self, key: UnitKey, position: Option<Position>) -> Self {
        let mut unit = *self.unit(key);
        let position = position.filter(|_| unit.is_alive());
        debug!(unit = %key, from = ?unit.position, to = ?position, "position updated");
        unit.position = position;
        self.with_unit(unit)
    }

    /// A copy with `delta` applied to `player`'s HQ health, floored at zero.
    #[must_use]
    pub fn with_hq_health_delta(&self, player: PlayerId, delta: i32) -> Self {
        let mut hq = *self.hq(player);
        let before = hq.health;
        hq.health = apply_delta(hq.health, delta);
        debug!(%player, delta, from = before, to = hq.health, "hq health updated");
        self.with_hq(hq)
    }
}

/// The five stat mutations and the position mutation for a single unit.
///
/// Each call returns a new [`MatchStatus`]; the source snapshot is unchanged.
#[derive(Debug, Clone, Copy)]
pub struct UnitUpdate<'a> {
    status: &'a MatchStatus,
    key: UnitKey,
}

impl UnitUpdate<'_> {
    /// Apply a power delta.
    #[must_use]
    pub fn power(self, delta: i32) -> MatchStatus {
        self.status.with_stat_delta(self.key, Stat::Power, delta)
    }

    /// Apply a resources delta.
    #[must_use]
    pub fn resources(self, delta: i32) -> MatchStatus {
        self.status.with_stat_delta(self.key, Stat::Resources, delta)
    }

    /// Apply a health delta; reaching zero removes the unit from the board.
    #[must_use]
    pub fn health(self, delta: i32) -> MatchStatus {
        self.status.with_stat_delta(self.key, Stat::Health, delta)
    }

    /// Apply a movement delta.
    #[must_use]
    pub fn movement(self, delta: i32) -> MatchStatus {
        self.status.with_stat_delta(self.key, Stat::Movement, delta)
    }

    /// Apply a defense delta.
    #[must_use]
    pub fn defense(self, delta: i32) -> MatchStatus {
        self.status.with_stat_delta(self.key, Stat::Defense, delta)
    }

    /// Move the unit, or take it off the board with `None`.
    #[must_use]
    pub fn position(self, position: Option<Position>) -> MatchStatus {
        self.status.with_position(self.key, position)
    }
}
