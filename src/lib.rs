// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Skirmish: rules engine for a two-player hero/HQ tactics board game.
//!
//! This crate provides the game core consumed by a presentation layer:
//! - Immutable match snapshots with replace-by-key updates
//! - Move and attack range rules on a 7×7 board with player walls
//! - HQ combat with seedable dice
//! - A session controller with a logical clock for delayed win announcements
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Presentation / CLI script runner  │
//! ├─────────────────────────────────────┤
//! │   MatchSession (selection, wins)    │
//! ├─────────────────────────────────────┤
//! │   Range · Combat · MatchStatus      │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use skirmish::{FixedDice, Hero, HeroName, MatchSession, PlayerId, RulesConfig};
//!
//! let mut session = MatchSession::with_dice(RulesConfig::default(), FixedDice(0)).unwrap();
//! for player in PlayerId::ALL {
//!     for name in [HeroName::Knight, HeroName::Archer, HeroName::Mage] {
//!         session.add_hero(player, Hero::template(name));
//!     }
//! }
//! session.start_match().unwrap();
//! assert!(session.in_game());
//! ```

pub mod config;
pub mod error;
pub mod game;

pub use config::{RulesConfig, UNITS_PER_PLAYER};
pub use error::{RulesError, RulesResult};

// Re-export key game types at crate root for convenience
pub use game::{
    Command, FixedDice, Hero, HeroName, MatchSession, MatchStatus, Outcome, Phase, PlayerId,
    Position, SeededDice, SlotId, Stat, UnitKey,
};
