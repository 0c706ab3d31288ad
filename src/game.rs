//! Game layer for Skirmish.
//!
//! Implements the rules of a two-player hero/HQ tactics match:
//! - Board geometry, walls and HQ cells
//! - Heroes, rosters and per-unit stats
//! - Move and attack range computation
//! - HQ combat with a pluggable dice source
//! - The match session: selection, post-commit pipeline, delayed wins

mod board;
mod combat;
mod hero;
mod log;
mod player;
mod position;
mod range;
mod schedule;
mod session;
mod state;

pub use board::{is_hq, is_occupied, wall_at};
pub use combat::{
    AttackReport, DiceRoller, FixedDice, HqAttack, SeededDice, resolve_hq_attack, total_damage,
};
pub use hero::{Hero, HeroName, Stat, Stats, apply_delta};
pub use log::{MatchEvent, MatchLog};
pub use player::{PlayerId, Roster, SlotId, UnitKey};
pub use position::{Direction, Position};
pub use range::{AttackTarget, Blocks, MoveOptions, attack_options, attack_target, move_options};
pub use schedule::{Scheduler, TimerHandle};
pub use session::{
    ActionMode, Command, IgnoreReason, MatchSession, Outcome, Phase, Selection, SessionReport,
};
pub use state::{HeroUnit, HqStats, MatchStatus, UnitUpdate};
