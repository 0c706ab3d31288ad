//! Match history.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::game::{HeroName, PlayerId, Position};

/// Something worth recording in the match history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    /// A unit moved.
    Moved {
        /// Hero that moved.
        hero: HeroName,
        /// Cell it left.
        from: Option<Position>,
        /// Cell it reached.
        to: Position,
    },
    /// A unit's health reached zero.
    Died {
        /// Hero that died.
        hero: HeroName,
    },
    /// An HQ took damage.
    HqAttacked {
        /// Attacking hero.
        hero: HeroName,
        /// Damage dealt.
        damage: u32,
        /// Owner of the struck HQ.
        hq: PlayerId,
        /// Dice component of the damage.
        dice: u32,
    },
    /// An attack was refused for lack of resources.
    InsufficientResources {
        /// Hero that tried to attack.
        hero: HeroName,
    },
}

impl fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moved { hero, from, to } => match from {
                Some(from) => write!(f, "[ {hero} ] {from} ⏩ {to}"),
                None => write!(f, "[ {hero} ] - ⏩ {to}"),
            },
            Self::Died { hero } => write!(f, "💀 {hero} died !"),
            Self::HqAttacked {
                hero,
                damage,
                hq,
                dice,
            } => write!(f, "{hero} [⚔️{damage}] HQ-{hq} (🔀 {dice})"),
            Self::InsufficientResources { hero } => {
                write!(f, "{hero} doesn't have enough resources to perform this action")
            }
        }
    }
}

/// Human-readable history, most recent line first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchLog {
    lines: VecDeque<String>,
}

impl MatchLog {
    /// Prepend a free-form line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_front(line.into());
    }

    /// Prepend the rendering of `event`.
    pub fn record(&mut self, event: &MatchEvent) {
        self.push(event.to_string());
    }

    /// Lines, newest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Most recent line.
    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    /// Whether any line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_lines() {
        let moved = MatchEvent::Moved {
            hero: HeroName::Rogue,
            from: Some(Position::new(1, 2)),
            to: Position::new(1, 4),
        };
        assert_eq!(moved.to_string(), "[ Rogue ] 1,2 ⏩ 1,4");

        let attack = MatchEvent::HqAttacked {
            hero: HeroName::Mage,
            damage: 150,
            hq: PlayerId::One,
            dice: 100,
        };
        assert_eq!(attack.to_string(), "Mage [⚔️150] HQ-1 (🔀 100)");

        let died = MatchEvent::Died {
            hero: HeroName::Knight,
        };
        assert_eq!(died.to_string(), "💀 Knight died !");
    }

    #[test]
    fn test_newest_first() {
        let mut log = MatchLog::default();
        log.push("first");
        log.push("second");
        assert_eq!(log.lines().collect::<Vec<_>>(), vec!["second", "first"]);
        assert_eq!(log.latest(), Some("second"));
        assert!(log.contains("fir"));

        log.clear();
        assert!(log.is_empty());
    }
}
