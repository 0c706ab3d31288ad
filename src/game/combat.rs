//! Combat resolution.
//!
//! Only attacks on headquarters deal damage. An attack costs the attacker
//! a fixed amount of resources and hits for the attacker's power plus a
//! uniform dice roll.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::config::RulesConfig;
use crate::game::{MatchEvent, MatchStatus, PlayerId, UnitKey};

/// Source of the damage dice.
pub trait DiceRoller: fmt::Debug {
    /// Draw a value uniformly from `0..bound`.
    fn roll(&mut self, bound: u32) -> u32;
}

/// Dice backed by a seedable PRNG.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: StdRng,
}

impl SeededDice {
    /// Deterministic dice for `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Dice seeded from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl DiceRoller for SeededDice {
    fn roll(&mut self, bound: u32) -> u32 {
        self.rng.random_range(0..bound.max(1))
    }
}

/// Dice that always show the same face, clamped below the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDice(pub u32);

impl DiceRoller for FixedDice {
    fn roll(&mut self, bound: u32) -> u32 {
        self.0.min(bound.saturating_sub(1))
    }
}

/// Total damage for `power` plus `dice`, never negative.
#[must_use]
pub fn total_damage(power: u32, dice: u32) -> u32 {
    let raw = i64::from(power) + i64::from(dice);
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

/// Details of a resolved HQ attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttackReport {
    /// Attacking unit.
    pub attacker: UnitKey,
    /// Owner of the struck HQ.
    pub hq: PlayerId,
    /// Dice rolled.
    pub dice: u32,
    /// Damage dealt (power plus dice).
    pub damage: u32,
    /// HQ health after the hit.
    pub hq_health: u32,
}

/// Outcome of an attempted HQ attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HqAttack {
    /// The attacker could not pay; nothing changed.
    InsufficientResources {
        /// Event to log.
        event: MatchEvent,
    },
    /// Resources were spent and damage applied.
    Resolved {
        /// State after the attack.
        status: MatchStatus,
        /// Numbers behind the attack.
        report: AttackReport,
        /// Event to log.
        event: MatchEvent,
    },
}

/// Resolve `attacker` striking `hq`'s headquarters.
///
/// Order: pay the attack cost, roll dice, compute damage, deduct HQ health.
/// An attacker short of resources leaves `status` untouched.
#[must_use]
pub fn resolve_hq_attack(
    status: &MatchStatus,
    attacker: UnitKey,
    hq: PlayerId,
    config: &RulesConfig,
    dice: &mut dyn DiceRoller,
) -> HqAttack {
    let unit = status.unit(attacker);
    let hero = unit.name();
    if unit.stats.resources < config.attack_cost {
        debug!(
            %attacker,
            resources = unit.stats.resources,
            cost = config.attack_cost,
            "attack refused"
        );
        return HqAttack::InsufficientResources {
            event: MatchEvent::InsufficientResources { hero },
        };
    }

    let cost = i32::try_from(config.attack_cost).unwrap_or(i32::MAX);
    let paid = status.update(attacker).resources(-cost);

    let roll = dice.roll(config.dice_bound);
    let damage = total_damage(paid.unit(attacker).stats.power, roll);
    let struck = paid.with_hq_health_delta(hq, -i32::try_from(damage).unwrap_or(i32::MAX));

    let report = AttackReport {
        attacker,
        hq,
        dice: roll,
        damage,
        hq_health: struck.hq(hq).health,
    };
    debug!(?report, "hq attack resolved");

    HqAttack::Resolved {
        status: struck,
        report,
        event: MatchEvent::HqAttacked {
            hero,
            damage,
            hq,
            dice: roll,
        },
    }
}
