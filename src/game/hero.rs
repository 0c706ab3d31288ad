//! Hero definitions and their stat blocks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of hero identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroName {
    /// Armoured front-liner.
    Knight,
    /// Ranged skirmisher.
    Archer,
    /// High power, fragile.
    Mage,
    /// Fast mover.
    Rogue,
    /// Deep resource pool.
    Cleric,
    /// Heavy hitter.
    Berserker,
}

impl HeroName {
    /// Every hero identity, in catalog order.
    pub const ALL: [Self; 6] = [
        Self::Knight,
        Self::Archer,
        Self::Mage,
        Self::Rogue,
        Self::Cleric,
        Self::Berserker,
    ];
}

impl fmt::Display for HeroName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Knight => "Knight",
            Self::Archer => "Archer",
            Self::Mage => "Mage",
            Self::Rogue => "Rogue",
            Self::Cleric => "Cleric",
            Self::Berserker => "Berserker",
        };
        f.write_str(name)
    }
}

/// Selector for one stat of a [`Stats`] block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    /// Added to every attack.
    Power,
    /// Spent on actions.
    Resources,
    /// Cells per move action.
    Movement,
    /// Damage mitigation (not consumed by the rules yet).
    Defense,
    /// Unit dies at zero.
    Health,
}

impl Stat {
    /// Every stat.
    pub const ALL: [Self; 5] = [
        Self::Power,
        Self::Resources,
        Self::Movement,
        Self::Defense,
        Self::Health,
    ];
}

/// A hero's numeric stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    /// Attack power.
    pub power: u32,
    /// Resources available for actions.
    pub resources: u32,
    /// Movement range.
    pub movement: u32,
    /// Defense.
    pub defense: u32,
    /// Health.
    pub health: u32,
}

impl Stats {
    /// Read a single stat.
    #[must_use]
    pub const fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Power => self.power,
            Stat::Resources => self.resources,
            Stat::Movement => self.movement,
            Stat::Defense => self.defense,
            Stat::Health => self.health,
        }
    }

    fn slot_mut(&mut self, stat: Stat) -> &mut u32 {
        match stat {
            Stat::Power => &mut self.power,
            Stat::Resources => &mut self.resources,
            Stat::Movement => &mut self.movement,
            Stat::Defense => &mut self.defense,
            Stat::Health => &mut self.health,
        }
    }

    /// A copy with `delta` applied to `stat`, floored at zero.
    #[must_use]
    pub fn with_delta(mut self, stat: Stat, delta: i32) -> Self {
        let slot = self.slot_mut(stat);
        *slot = apply_delta(*slot, delta);
        self
    }
}

/// Add a signed delta to a non-negative value, clamping to `0..=u32::MAX`.
#[must_use]
pub fn apply_delta(value: u32, delta: i32) -> u32 {
    let raw = i64::from(value) + i64::from(delta);
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

/// A hero definition: identity plus base stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hero {
    /// Which hero this is.
    pub name: HeroName,
    /// Stats a unit of this hero starts the match with.
    pub stats: Stats,
}

impl Hero {
    /// The catalog definition for `name`.
    #[must_use]
    pub const fn template(name: HeroName) -> Self {
        let (power, resources, movement, defense, health) = match name {
            HeroName::Knight => (120, 300, 2, 80, 600),
            HeroName::Archer => (150, 400, 3, 30, 400),
            HeroName::Mage => (200, 500, 2, 20, 350),
            HeroName::Rogue => (100, 350, 4, 40, 450),
            HeroName::Cleric => (60, 600, 2, 50, 500),
            HeroName::Berserker => (180, 250, 3, 60, 550),
        };
        Self {
            name,
            stats: Stats {
                power,
                resources,
                movement,
                defense,
                health,
            },
        }
    }

    /// Every catalog hero.
    #[must_use]
    pub fn catalog() -> Vec<Self> {
        HeroName::ALL.into_iter().map(Self::template).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_delta_floors_at_zero() {
        assert_eq!(apply_delta(10, -3), 7);
        assert_eq!(apply_delta(10, -10), 0);
        assert_eq!(apply_delta(10, -500), 0);
        assert_eq!(apply_delta(0, i32::MIN), 0);
    }

    #[test]
    fn test_apply_delta_saturates_high() {
        assert_eq!(apply_delta(u32::MAX, 1), u32::MAX);
        assert_eq!(apply_delta(5, 5), 10);
    }

    #[test]
    fn test_with_delta_touches_one_stat() {
        let stats = Hero::template(HeroName::Knight).stats;
        let updated = stats.with_delta(Stat::Resources, -100);
        assert_eq!(updated.resources, stats.resources - 100);
        for stat in Stat::ALL {
            if stat != Stat::Resources {
                assert_eq!(updated.get(stat), stats.get(stat));
            }
        }
    }

    #[test]
    fn test_catalog_is_complete() {
        let catalog = Hero::catalog();
        assert_eq!(catalog.len(), HeroName::ALL.len());
        assert!(catalog.iter().all(|hero| hero.stats.health > 0));
    }

    #[test]
    fn test_hero_name_display() {
        assert_eq!(HeroName::Berserker.to_string(), "Berserker");
    }
}
