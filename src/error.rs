//! Error types for the rules engine.
//!
//! Illegal moves and attacks are not errors: they are reported as
//! [`Outcome::Ignored`](crate::game::Outcome) and leave the match untouched.
//! The variants here cover misuse of the session itself.

use std::path::PathBuf;

use thiserror::Error;

use crate::game::PlayerId;

/// Contract violations raised by a [`MatchSession`](crate::game::MatchSession)
/// or while loading configuration.
#[derive(Debug, Error)]
pub enum RulesError {
    /// A match command was issued while no match is in progress.
    #[error("no match in progress")]
    NoActiveMatch,
    /// A match was started while one is already running.
    #[error("a match is already in progress")]
    MatchInProgress,
    /// A player's roster does not hold enough heroes to fill every slot.
    #[error("player {player} roster has {count} heroes, {required} required")]
    RosterIncomplete {
        /// The player whose roster is short.
        player: PlayerId,
        /// Heroes currently on the roster.
        count: usize,
        /// Heroes needed to start.
        required: usize,
    },
    /// The rules configuration is internally inconsistent.
    #[error("invalid rules configuration: {0}")]
    InvalidConfig(String),
    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    ConfigIo {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A configuration file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    ConfigParse {
        /// Path that failed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for session and configuration operations.
pub type RulesResult<T> = Result<T, RulesError>;
