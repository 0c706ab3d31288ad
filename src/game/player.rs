//! Player identities, unit slots and pre-match rosters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{Hero, HeroName};

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerId {
    /// Player 1.
    One,
    /// Player 2.
    Two,
}

impl PlayerId {
    /// Both players, player 1 first.
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Player number (1 or 2).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// Zero-based index for per-player tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(format!("player must be 1 or 2, got {other}")),
        }
    }
}

impl From<PlayerId> for u8 {
    fn from(player: PlayerId) -> Self {
        player.number()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Per-player slot addressing one of the three hero units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SlotId {
    /// Slot 1.
    One,
    /// Slot 2.
    Two,
    /// Slot 3.
    Three,
}

impl SlotId {
    /// Every slot in ascending order.
    pub const ALL: [Self; 3] = [Self::One, Self::Two, Self::Three];

    /// Slot number (1, 2 or 3).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Zero-based index for per-slot tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
            Self::Three => 2,
        }
    }
}

impl TryFrom<u8> for SlotId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(format!("slot must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<SlotId> for u8 {
    fn from(slot: SlotId) -> Self {
        slot.number()
    }
}

/// Address of a hero unit within a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitKey {
    /// Owning player.
    pub player: PlayerId,
    /// Slot within that player's units.
    pub slot: SlotId,
}

impl UnitKey {
    /// Create a new key.
    #[must_use]
    pub const fn new(player: PlayerId, slot: SlotId) -> Self {
        Self { player, slot }
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}#{}", self.player, self.slot.number())
    }
}

/// Heroes a player has picked before the match starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    heroes: Vec<Hero>,
}

impl Roster {
    /// Append a hero.
    pub fn add(&mut self, hero: Hero) {
        self.heroes.push(hero);
    }

    /// Remove every entry with the given hero name.
    ///
    /// Returns how many entries were removed.
    pub fn remove(&mut self, name: HeroName) -> usize {
        let before = self.heroes.len();
        self.heroes.retain(|hero| hero.name != name);
        before - self.heroes.len()
    }

    /// Heroes in pick order.
    #[must_use]
    pub fn heroes(&self) -> &[Hero] {
        &self.heroes
    }

    /// Number of picked heroes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    /// Whether no hero is picked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }

    /// Drop every pick.
    pub fn clear(&mut self) {
        self.heroes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(PlayerId::One.opponent(), PlayerId::Two);
        assert_eq!(PlayerId::Two.opponent(), PlayerId::One);
    }

    #[test]
    fn test_player_from_number() {
        assert_eq!(PlayerId::try_from(1), Ok(PlayerId::One));
        assert_eq!(PlayerId::try_from(2), Ok(PlayerId::Two));
        assert!(PlayerId::try_from(3).is_err());
    }

    #[test]
    fn test_slot_from_number() {
        assert_eq!(SlotId::try_from(3), Ok(SlotId::Three));
        assert!(SlotId::try_from(0).is_err());
    }

    #[test]
    fn test_player_serde_as_number() {
        let json = serde_json::to_string(&PlayerId::Two).unwrap();
        assert_eq!(json, "2");
        let back: PlayerId = serde_json::from_str("1").unwrap();
        assert_eq!(back, PlayerId::One);
        assert!(serde_json::from_str::<PlayerId>("7").is_err());
    }

    #[test]
    fn test_roster_remove_by_name() {
        let mut roster = Roster::default();
        roster.add(Hero::template(HeroName::Knight));
        roster.add(Hero::template(HeroName::Mage));
        roster.add(Hero::template(HeroName::Knight));

        assert_eq!(roster.remove(HeroName::Knight), 2);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.heroes()[0].name, HeroName::Mage);
        assert_eq!(roster.remove(HeroName::Rogue), 0);
    }
}
