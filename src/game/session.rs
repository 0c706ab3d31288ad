//! Match session: the single writer of match state.
//!
//! A [`MatchSession`] owns the rosters, the current [`MatchStatus`] snapshot,
//! the selection state machine, the history log and the pending win
//! announcements. Every command that changes the match goes through
//! `commit`, which runs the post-commit pipeline in a fixed order:
//!
//! 1. log units whose health just reached zero;
//! 2. schedule a delayed win for the opponent of any defeated player;
//! 3. auto-select the living unit holding the most resources.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{RulesConfig, UNITS_PER_PLAYER};
use crate::error::{RulesError, RulesResult};
use crate::game::{
    AttackTarget, DiceRoller, Hero, HeroName, HqAttack, MatchEvent, MatchLog, MatchStatus,
    MoveOptions, PlayerId, Position, Roster, Scheduler, SeededDice, SlotId, Stat, TimerHandle,
    UnitKey, attack_options, attack_target, is_hq, move_options, resolve_hq_attack,
};

/// Action a selected hero is about to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionMode {
    /// Choosing a destination.
    Move,
    /// Choosing a target.
    Attack,
}

/// Coarse state of the selection machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No hero selected.
    Idle,
    /// A hero is selected, no action chosen.
    HeroSelected,
    /// Move options are shown.
    MoveActive,
    /// Attack options are shown.
    AttackActive,
}

/// Transient, presentation-facing selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Highlighted square.
    pub square: Option<Position>,
    /// Selected hero.
    pub hero: Option<UnitKey>,
    /// Active action.
    pub action: Option<ActionMode>,
    /// Destinations of the active move action.
    pub move_options: Option<MoveOptions>,
    /// Targets of the active attack action.
    pub attack_options: Option<Vec<Position>>,
}

impl Selection {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match (self.hero, self.action) {
            (None, _) => Phase::Idle,
            (Some(_), None) => Phase::HeroSelected,
            (Some(_), Some(ActionMode::Move)) => Phase::MoveActive,
            (Some(_), Some(ActionMode::Attack)) => Phase::AttackActive,
        }
    }

    fn clear_options(&mut self) {
        self.move_options = None;
        self.attack_options = None;
    }

    fn set_hero(&mut self, hero: Option<UnitKey>) {
        self.hero = hero;
        self.action = None;
        self.clear_options();
    }
}

/// Why a command had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The command needs a selected hero.
    NoHeroSelected,
    /// The command needs a different active action.
    NoActionActive,
    /// The cell is not among the current options.
    NotAnOption,
    /// The cell holds no HQ.
    NotAnHq,
    /// The unit, or the requested cell, is not on the board.
    OffBoard,
    /// The unit is dead.
    DeadUnit,
    /// The attacker cannot pay for the attack.
    InsufficientResources,
}

/// Result of a command that may legitimately do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    /// The command took effect.
    Applied,
    /// The command was a no-op.
    Ignored(IgnoreReason),
}

impl Outcome {
    /// Whether the command took effect.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// A session command, as issued by a presentation layer or a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Add a catalog hero to a roster.
    AddHero {
        /// Roster owner.
        player: PlayerId,
        /// Hero to add.
        hero: HeroName,
    },
    /// Remove every roster entry for a hero.
    RemoveHero {
        /// Roster owner.
        player: PlayerId,
        /// Hero to remove.
        hero: HeroName,
    },
    /// Start the match from the rosters.
    StartMatch,
    /// Highlight a square.
    SelectSquare {
        /// Square to highlight.
        position: Position,
    },
    /// Clear the highlighted square.
    DeselectSquare,
    /// Select a hero.
    SelectHero {
        /// Owner.
        player: PlayerId,
        /// Slot.
        slot: SlotId,
    },
    /// Clear the selected hero.
    DeselectHero,
    /// Show move options for a hero.
    ShowMoveOptions {
        /// Owner.
        player: PlayerId,
        /// Slot.
        slot: SlotId,
    },
    /// Show attack options for a hero.
    ShowAttackOptions {
        /// Owner.
        player: PlayerId,
        /// Slot.
        slot: SlotId,
    },
    /// Move the selected hero.
    MoveSelected {
        /// Destination.
        position: Position,
    },
    /// Attack the HQ on a cell with the selected hero.
    AttackHq {
        /// HQ cell.
        position: Position,
    },
    /// Click a square; dispatches on the active action.
    ClickSquare {
        /// Clicked square.
        position: Position,
    },
    /// Apply a stat delta to a hero.
    ApplyStatDelta {
        /// Owner.
        player: PlayerId,
        /// Slot.
        slot: SlotId,
        /// Stat to change.
        stat: Stat,
        /// Signed change.
        delta: i32,
    },
    /// Place a hero, or remove it with `null`.
    SetPosition {
        /// Owner.
        player: PlayerId,
        /// Slot.
        slot: SlotId,
        /// New cell.
        position: Option<Position>,
    },
    /// Apply a health delta to an HQ.
    ApplyHqDelta {
        /// HQ owner.
        player: PlayerId,
        /// Signed change.
        delta: i32,
    },
    /// Append a free-form log line.
    Log {
        /// Line to append.
        line: String,
    },
    /// Abandon the match.
    ResetMatch,
    /// Advance the logical clock.
    AdvanceClock {
        /// Milliseconds to advance.
        ms: u64,
    },
}

/// Serializable view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    /// Whether a match is running.
    pub in_game: bool,
    /// Winner of the last finished match.
    pub winner: Option<PlayerId>,
    /// Logical clock.
    pub clock_ms: u64,
    /// Current phase.
    pub phase: Phase,
    /// Current match state.
    pub status: Option<MatchStatus>,
    /// Selection state.
    pub selection: Selection,
    /// History, newest first.
    pub log: Vec<String>,
}

/// Owner of a match and everything around it.
#[derive(Debug)]
pub struct MatchSession {
    config: RulesConfig,
    dice: Box<dyn DiceRoller>,
    in_game: bool,
    rosters: [Roster; 2],
    status: Option<Arc<MatchStatus>>,
    selection: Selection,
    log: MatchLog,
    winner: Option<PlayerId>,
    announcements: Scheduler<PlayerId>,
    pending_wins: [Option<TimerHandle>; 2],
    dead: HashSet<UnitKey>,
}

impl MatchSession {
    /// Create a session with OS-seeded dice.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(config: RulesConfig) -> RulesResult<Self> {
        Self::with_dice(config, SeededDice::from_os())
    }

    /// Create a session with the given dice.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn with_dice(config: RulesConfig, dice: impl DiceRoller + 'static) -> RulesResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            dice: Box::new(dice),
            in_game: false,
            rosters: [Roster::default(), Roster::default()],
            status: None,
            selection: Selection::default(),
            log: MatchLog::default(),
            winner: None,
            announcements: Scheduler::default(),
            pending_wins: [None, None],
            dead: HashSet::new(),
        })
    }

    // Queries

    /// Rules in force.
    #[must_use]
    pub const fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Current match snapshot. Cloning the `Arc` keeps it valid across
    /// later commands.
    #[must_use]
    pub const fn status(&self) -> Option<&Arc<MatchStatus>> {
        self.status.as_ref()
    }

    /// Selection state.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selection phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.selection.phase()
    }

    /// History log.
    #[must_use]
    pub const fn log(&self) -> &MatchLog {
        &self.log
    }

    /// Winner of the last finished match.
    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Whether a match is running.
    #[must_use]
    pub const fn in_game(&self) -> bool {
        self.in_game
    }

    /// `player`'s pre-match roster.
    #[must_use]
    pub const fn roster(&self, player: PlayerId) -> &Roster {
        &self.rosters[player.index()]
    }

    /// Logical clock in milliseconds.
    #[must_use]
    pub const fn clock(&self) -> u64 {
        self.announcements.now()
    }

    /// Number of win announcements waiting to fire.
    #[must_use]
    pub fn pending_announcements(&self) -> usize {
        self.announcements.len()
    }

    /// What attacking `pos` with the selected hero would hit.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NoActiveMatch`] outside a match.
    pub fn attack_target_at(&self, pos: Position) -> RulesResult<Option<AttackTarget>> {
        let status = self.active()?;
        let (Some(key), Some(options)) = (self.selection.hero, &self.selection.attack_options)
        else {
            return Ok(None);
        };
        Ok(attack_target(status.unit(key), pos, options, &status, &self.config))
    }

    /// Serializable view of the whole session.
    #[must_use]
    pub fn report(&self) -> SessionReport {
        SessionReport {
            in_game: self.in_game,
            winner: self.winner,
            clock_ms: self.clock(),
            phase: self.phase(),
            status: self.status.as_deref().cloned(),
            selection: self.selection.clone(),
            log: self.log.lines().map(str::to_string).collect(),
        }
    }

    fn active(&self) -> RulesResult<Arc<MatchStatus>> {
        self.status.clone().ok_or(RulesError::NoActiveMatch)
    }

    // Roster and lifecycle

    /// Add `hero` to `player`'s roster.
    pub fn add_hero(&mut self, player: PlayerId, hero: Hero) {
        debug!(%player, hero = %hero.name, "hero added to roster");
        self.rosters[player.index()].add(hero);
    }

    /// Remove every `name` entry from `player`'s roster.
    pub fn remove_hero(&mut self, player: PlayerId, name: HeroName) -> usize {
        let removed = self.rosters[player.index()].remove(name);
        debug!(%player, hero = %name, removed, "hero removed from roster");
        removed
    }

    /// Start a match from the first three heroes of each roster.
    ///
    /// # Errors
    ///
    /// Returns an error if a match is running or a roster is short.
    pub fn start_match(&mut self) -> RulesResult<()> {
        if self.status.is_some() {
            return Err(RulesError::MatchInProgress);
        }
        for player in PlayerId::ALL {
            let count = self.roster(player).len();
            if count < UNITS_PER_PLAYER {
                return Err(RulesError::RosterIncomplete {
                    player,
                    count,
                    required: UNITS_PER_PLAYER,
                });
            }
        }

        let rosters = [
            self.rosters[0].heroes(),
            self.rosters[1].heroes(),
        ];
        let status = MatchStatus::new(&self.config, rosters).ok_or(RulesError::RosterIncomplete {
            player: PlayerId::One,
            count: self.rosters[0].len(),
            required: UNITS_PER_PLAYER,
        })?;

        self.in_game = true;
        self.winner = None;
        self.selection = Selection::default();
        self.log.clear();
        self.dead.clear();
        info!("match started");
        self.commit(status);
        Ok(())
    }

    /// Abandon the match: cancel pending announcements and empty the
    /// status, selection, log and rosters.
    pub fn reset_match(&mut self) {
        let cancelled = self.cancel_pending_wins();
        self.in_game = false;
        self.clear_match();
        info!(cancelled, "match reset");
    }

    /// Advance the logical clock, firing due win announcements.
    ///
    /// Returns the winners announced, in firing order.
    pub fn advance_clock(&mut self, ms: u64) -> Vec<PlayerId> {
        let fired = self.announcements.advance(ms);
        for &winner in &fired {
            self.pending_wins[winner.index()] = None;
            self.announce_win(winner);
        }
        fired
    }

    fn announce_win(&mut self, winner: PlayerId) {
        info!(%winner, "winner announced");
        self.winner = Some(winner);
        self.in_game = false;
        self.clear_match();
    }

    fn cancel_pending_wins(&mut self) -> usize {
        let mut cancelled = 0;
        for slot in &mut self.pending_wins {
            if let Some(handle) = slot.take() {
                if self.announcements.cancel(handle) {
                    cancelled += 1;
                }
            }
        }
        cancelled
    }

    fn clear_match(&mut self) {
        self.status = None;
        self.selection = Selection::default();
        self.log.clear();
        self.dead.clear();
        for roster in &mut self.rosters {
            roster.clear();
        }
    }

    // Selection

    /// Highlight `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NoActiveMatch`] outside a match.
    pub fn select_square(&mut self, pos: Position) -> RulesResult<()> {
        self.active()?;
        self.selection.square = Some(pos);
        Ok(())
    }

    /// Clear the highlighted square.
    pub fn deselect_square(&mut self) {
        self.selection.square = None;
    }

    /// Select the unit at `key`, dropping any shown options.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NoActiveMatch`] outside a match.
    pub fn select_hero(&mut self, key: UnitKey) -> RulesResult<Outcome> {
        let status = self.active()?;
        if !status.unit(key).is_alive() {
            return Ok(ignored(IgnoreReason::DeadUnit));
        }
        self.selection.set_hero(Some(key));
        Ok(Outcome::Applied)
    }

    /// Clear the selected hero and any shown options.
    pub fn deselect_hero(&mut self) {
        self.selection.set_hero(None);
    }

    /// Compute and show move options for `key`, selecting it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NoActiveMatch`] outside a match.
    pub fn show_move_options(&mut self, key: UnitKey) -> RulesResult<Outcome> {
        let status = self.active()?;
        let unit = status.unit(key);
        if !unit.is_alive() {
            return Ok(ignored(IgnoreReason::DeadUnit));
        }
        if unit.position.is_none() {
            return Ok(ignored(IgnoreReason::OffBoard));
        }
        if self.selection.hero != Some(key) {
            self.selection.set_hero(Some(key));
        }
        self.selection.clear_options();
        self.selection.move_options = Some(move_options(unit, &status, &self.config));
        self.selection.action = Some(ActionMode::Move);
        Ok(Outcome::Applied)
    }

    /// Compute and show attack options for `key`, selecting it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NoActiveMatch`] outside a match.
    pub fn show_attack_options(&mut self, key: UnitKey) -> RulesResult<Outcome> {
        let status = self.active()?;
        let unit = status.unit(key);
        if !unit.is_alive() {
            return Ok(ignored(IgnoreReason::DeadUnit));
        }
        let Some(options) = attack_options(unit, &self.config) else {
            return Ok(ignored(IgnoreReason::OffBoard));
        };
        if self.selection.hero != Some(key) {
            self.selection.set_hero(Some(key));
        }
        self.selection.clear_options();
        self.selection.attack_options = Some(options);
        self.selection.action = Some(ActionMode::Attack);
        Ok(Outcome::Applied)
    }

    // Actions

    /// Move the selected hero to `pos` if it is a shown move option.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NoActiveMatch`] outside a match.
    pub fn move_selected(&mut self, pos: Position) -> RulesResult<Outcome> {
        let status = self.active()?;
        let Some(key) = self.selection.hero else {
            return Ok(ignored(IgnoreReason::NoHeroSelected));
        };
        if self.selection.action != Some(ActionMode::Move) {
            return Ok(ignored(IgnoreReason::NoActionActive));
        }
        if !self
            .selection
            .move_options
            .as_ref()
            .is_some_and(|options| options.contains(pos))
        {
            return Ok(ignored(IgnoreReason::NotAnOption));
        }

        let unit = status.unit(key);
        self.log.record(&MatchEvent::Moved {
            hero: unit.name(),
            from: unit.position,
            to: pos,
        });
        self.selection.action = None;
        self.selection.clear_options();
        self.commit(status.with_position(key, Some(pos)));
        Ok(Outcome::Applied)
    }

    /// Attack the HQ on `pos` with the selected hero.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NoActiveMatch`] outside a match.
    pub fn attack_hq(&mut self, pos: Position) -> RulesResult<Outcome> {
        let status = self.active()?;
        let Some(key) = self.selection.hero else {
            return Ok(ignored(IgnoreReason::NoHeroSelected));
        };
        if self.selection.action != Some(ActionMode::Attack) {
            return Ok(ignored(IgnoreReason::NoActionActive));
        }
        if !self
            .selection
            .attack_options
            .as_ref()
            .is_some_and(|options| options.contains(&pos))
        {
            return Ok(ignored(IgnoreReason::NotAnOption));
        }
        let Some(hq) = is_hq(pos, &self.config) else {
            return Ok(ignored(IgnoreReason::NotAnHq));
        };

        match resolve_hq_attack(&status, key, hq, &self.config, self.dice.as_mut()) {
            HqAttack::InsufficientResources { event } => {
                self.log.record(&event);
                Ok(ignored(IgnoreReason::InsufficientResources))
            }
            HqAttack::Resolved {
                status: next,
                report,
                event,
            } => {
                info!(
                    attacker = %key,
                    %hq,
                    damage = report.damage,
                    dice = report.dice,
                    hq_health = report.hq_health,
                    "hq attacked"
                );
                self.log.record(&event);
                self.commit(next);
                Ok(Outcome::Applied)
            }
        }
    }

    /// Handle a click on `pos` according to the active action.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NoActiveMatch`] outside a match.
    pub fn click_square(&mut self, pos: Position) -> RulesResult<Outcome> {
        self.active()?;
        match self.selection.action {
            Some(ActionMode::Move) => self.move_selected(pos),
            Some(ActionMode::Attack) if is_hq(pos, &self.config).is_some() => self.attack_hq(pos),
            Some(ActionMode::Attack) => Ok(ignored(IgnoreReason::NotAnHq)),
            None => Ok(ignored(IgnoreReason::NoActionActive)),
        }
    }

    // Direct store access

    /// Apply `delta` to one stat of the unit at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NoActiveMatch`] outside a match.
    pub fn apply_stat_delta(&mut self, key: UnitKey, stat: Stat, delta: i32) -> RulesResult<()> {
        let status = self.active()?;
        self.commit(status.with_stat_delta(key, stat, delta));
        Ok(())
    }

    /// Place the unit at `key` on `position`, or remove it with `None`.
    ///
    /// Dead units and cells off the board are refused.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NoActiveMatch`] outside a match.
    pub fn set_position(
        &mut self,
        key: UnitKey,
        position: Option<Position>,
    ) -> RulesResult<Outcome> {
        let status = self.active()?;
        if position.is_some() && !status.unit(key).is_alive() {
            return Ok(ignored(IgnoreReason::DeadUnit));
        }
        if position.is_some_and(|pos| !self.config.in_bounds(pos)) {
            return Ok(ignored(IgnoreReason::OffBoard));
        }
        self.commit(status.with_position(key, position));
        Ok(Outcome::Applied)
    }

    /// Apply `delta` to `player`'s HQ health.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NoActiveMatch`] outside a match.
    pub fn apply_hq_delta(&mut self, player: PlayerId, delta: i32) -> RulesResult<()> {
        let status = self.active()?;
        self.commit(status.with_hq_health_delta(player, delta));
        Ok(())
    }

    /// Prepend a free-form line to the log.
    pub fn log_line(&mut self, line: impl Into<String>) {
        self.log.push(line);
    }

    /// Run a [`Command`].
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying operation.
    pub fn apply(&mut self, command: &Command) -> RulesResult<Outcome> {
        let unit = |player: PlayerId, slot: SlotId| UnitKey::new(player, slot);
        match command {
            Command::AddHero { player, hero } => {
                self.add_hero(*player, Hero::template(*hero));
            }
            Command::RemoveHero { player, hero } => {
                self.remove_hero(*player, *hero);
            }
            Command::StartMatch => self.start_match()?,
            Command::SelectSquare { position } => self.select_square(*position)?,
            Command::DeselectSquare => self.deselect_square(),
            Command::SelectHero { player, slot } => return self.select_hero(unit(*player, *slot)),
            Command::DeselectHero => self.deselect_hero(),
            Command::ShowMoveOptions { player, slot } => {
                return self.show_move_options(unit(*player, *slot));
            }
            Command::ShowAttackOptions { player, slot } => {
                return self.show_attack_options(unit(*player, *slot));
            }
            Command::MoveSelected { position } => return self.move_selected(*position),
            Command::AttackHq { position } => return self.attack_hq(*position),
            Command::ClickSquare { position } => return self.click_square(*position),
            Command::ApplyStatDelta {
                player,
                slot,
                stat,
                delta,
            } => self.apply_stat_delta(unit(*player, *slot), *stat, *delta)?,
            Command::SetPosition {
                player,
                slot,
                position,
            } => return self.set_position(unit(*player, *slot), *position),
            Command::ApplyHqDelta { player, delta } => self.apply_hq_delta(*player, *delta)?,
            Command::Log { line } => self.log_line(line.clone()),
            Command::ResetMatch => self.reset_match(),
            Command::AdvanceClock { ms } => {
                self.advance_clock(*ms);
            }
        }
        Ok(Outcome::Applied)
    }

    // Post-commit pipeline

    fn commit(&mut self, next: MatchStatus) {
        let status = Arc::new(next);
        self.status = Some(Arc::clone(&status));
        self.record_deaths(&status);
        self.check_victory(&status);
        self.auto_select(&status);
    }

    fn record_deaths(&mut self, status: &MatchStatus) {
        for unit in status.units() {
            if unit.is_alive() {
                self.dead.remove(&unit.key());
            } else if self.dead.insert(unit.key()) {
                info!(unit = %unit.key(), hero = %unit.name(), "unit died");
                self.log.record(&MatchEvent::Died { hero: unit.name() });
            }
        }
    }

    fn check_victory(&mut self, status: &MatchStatus) {
        for loser in PlayerId::ALL {
            if !status.is_defeated(loser) {
                continue;
            }
            let winner = loser.opponent();
            if self.pending_wins[winner.index()].is_some() {
                continue;
            }
            let handle = self.announcements.schedule(self.config.win_delay_ms, winner);
            self.pending_wins[winner.index()] = Some(handle);
            info!(%loser, %winner, delay_ms = self.config.win_delay_ms, "win scheduled");
        }
    }

    fn auto_select(&mut self, status: &MatchStatus) {
        if let Some(unit) = status.richest_unit() {
            debug!(unit = %unit.key(), resources = unit.stats.resources, "auto-selected");
            self.selection.square = unit.position;
            self.selection.set_hero(Some(unit.key()));
        }
    }
}

fn ignored(reason: IgnoreReason) -> Outcome {
    warn!(?reason, "command ignored");
    Outcome::Ignored(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::FixedDice;

    fn key(player: PlayerId, slot: SlotId) -> UnitKey {
        UnitKey::new(player, slot)
    }

    fn create_test_session() -> MatchSession {
        let mut session = MatchSession::with_dice(RulesConfig::default(), FixedDice(100)).unwrap();
        for name in [HeroName::Knight, HeroName::Archer, HeroName::Rogue] {
            session.add_hero(PlayerId::One, Hero::template(name));
        }
        for name in [HeroName::Mage, HeroName::Berserker, HeroName::Knight] {
            session.add_hero(PlayerId::Two, Hero::template(name));
        }
        session.start_match().unwrap();
        session
    }

    #[test]
    fn test_start_requires_full_rosters() {
        let mut session = MatchSession::with_dice(RulesConfig::default(), FixedDice(0)).unwrap();
        session.add_hero(PlayerId::One, Hero::template(HeroName::Knight));
        let err = session.start_match().unwrap_err();
        assert!(matches!(
            err,
            RulesError::RosterIncomplete {
                player: PlayerId::One,
                count: 1,
                required: 3
            }
        ));
        assert!(!session.in_game());
    }

    #[test]
    fn test_start_twice_is_an_error() {
        let mut session = create_test_session();
        assert!(matches!(session.start_match(), Err(RulesError::MatchInProgress)));
    }

    #[test]
    fn test_commands_need_a_match() {
        let mut session = MatchSession::with_dice(RulesConfig::default(), FixedDice(0)).unwrap();
        let k = key(PlayerId::One, SlotId::One);
        assert!(matches!(session.select_hero(k), Err(RulesError::NoActiveMatch)));
        assert!(matches!(
            session.apply_hq_delta(PlayerId::One, -1),
            Err(RulesError::NoActiveMatch)
        ));
    }

    #[test]
    fn test_start_auto_selects_richest() {
        let session = create_test_session();
        // Player 2's Mage has the most resources (500).
        assert_eq!(session.selection().hero, Some(key(PlayerId::Two, SlotId::One)));
        assert_eq!(session.selection().square, Some(Position::new(7, 6)));
        assert_eq!(session.phase(), Phase::HeroSelected);
        assert!(session.in_game());
    }

    #[test]
    fn test_phase_transitions() {
        let mut session = create_test_session();
        let k = key(PlayerId::One, SlotId::One);

        session.deselect_hero();
        assert_eq!(session.phase(), Phase::Idle);

        assert!(session.select_hero(k).unwrap().is_applied());
        assert_eq!(session.phase(), Phase::HeroSelected);

        session.show_move_options(k).unwrap();
        assert_eq!(session.phase(), Phase::MoveActive);
        assert!(session.selection().move_options.is_some());

        session.show_attack_options(k).unwrap();
        assert_eq!(session.phase(), Phase::AttackActive);
        assert!(session.selection().move_options.is_none());
        assert_eq!(session.selection().attack_options.as_ref().map(Vec::len), Some(8));

        session.select_hero(key(PlayerId::One, SlotId::Two)).unwrap();
        assert_eq!(session.phase(), Phase::HeroSelected);
        assert!(session.selection().attack_options.is_none());
    }

    #[test]
    fn test_move_selected_logs_and_moves() {
        let mut session = create_test_session();
        let k = key(PlayerId::One, SlotId::One);
        session.show_move_options(k).unwrap();

        let outcome = session.move_selected(Position::new(1, 3)).unwrap();
        assert_eq!(outcome, Outcome::Applied);
        let status = session.status().unwrap();
        assert_eq!(status.unit(k).position, Some(Position::new(1, 3)));
        assert!(session.log().contains("[ Knight ] 1,2 ⏩ 1,3"));
        assert!(session.selection().move_options.is_none());
    }

    #[test]
    fn test_move_to_non_option_is_ignored() {
        let mut session = create_test_session();
        let k = key(PlayerId::One, SlotId::One);
        session.show_move_options(k).unwrap();
        let before = Arc::clone(session.status().unwrap());

        let outcome = session.move_selected(Position::new(5, 5)).unwrap();
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::NotAnOption));
        assert_eq!(session.status().unwrap(), &before);
    }

    #[test]
    fn test_click_without_action_is_ignored() {
        let mut session = create_test_session();
        let outcome = session.click_square(Position::new(3, 3)).unwrap();
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::NoActionActive));
    }

    #[test]
    fn test_old_snapshot_survives_commit() {
        let mut session = create_test_session();
        let before = Arc::clone(session.status().unwrap());
        session.apply_hq_delta(PlayerId::Two, -300).unwrap();

        assert_eq!(before.hq(PlayerId::Two).health, 1000);
        assert_eq!(session.status().unwrap().hq(PlayerId::Two).health, 700);
    }

    #[test]
    fn test_attack_hq_through_click() {
        let mut session = create_test_session();
        let attacker = key(PlayerId::Two, SlotId::Two);
        session.set_position(attacker, Some(Position::new(6, 2))).unwrap();
        session.show_attack_options(attacker).unwrap();

        let outcome = session.click_square(Position::new(7, 1)).unwrap();
        assert_eq!(outcome, Outcome::Applied);
        let status = session.status().unwrap();
        // Berserker: power 180, dice 100.
        assert_eq!(status.hq(PlayerId::One).health, 720);
        assert_eq!(status.unit(attacker).stats.resources, 150);
        assert_eq!(session.log().latest(), Some("Berserker [⚔️280] HQ-1 (🔀 100)"));
    }

    #[test]
    fn test_attack_without_resources() {
        let mut session = create_test_session();
        let attacker = key(PlayerId::Two, SlotId::Two);
        session.set_position(attacker, Some(Position::new(6, 2))).unwrap();
        session.apply_stat_delta(attacker, Stat::Resources, -200).unwrap();
        session.show_attack_options(attacker).unwrap();

        let outcome = session.attack_hq(Position::new(7, 1)).unwrap();
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::InsufficientResources));
        assert_eq!(session.status().unwrap().hq(PlayerId::One).health, 1000);
        assert!(session.log().contains("doesn't have enough resources"));
    }

    #[test]
    fn test_attack_options_for_off_board_unit_ignored() {
        let mut session = create_test_session();
        let k = key(PlayerId::One, SlotId::Two);
        session.set_position(k, None).unwrap();
        let outcome = session.show_attack_options(k).unwrap();
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::OffBoard));
    }

    #[test]
    fn test_set_position_refuses_dead_unit() {
        let mut session = create_test_session();
        let k = key(PlayerId::One, SlotId::One);
        session.apply_stat_delta(k, Stat::Health, -100_000).unwrap();

        let outcome = session.set_position(k, Some(Position::new(4, 4))).unwrap();
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::DeadUnit));
        assert_eq!(session.status().unwrap().unit(k).position, None);
    }

    #[test]
    fn test_set_position_refuses_off_board_cell() {
        let mut session = create_test_session();
        let k = key(PlayerId::One, SlotId::One);

        for pos in [Position::new(i32::MAX, 1), Position::new(0, 4), Position::new(4, 8)] {
            let outcome = session.set_position(k, Some(pos)).unwrap();
            assert_eq!(outcome, Outcome::Ignored(IgnoreReason::OffBoard));
        }
        assert_eq!(session.status().unwrap().unit(k).position, Some(Position::new(1, 2)));
        assert!(session.show_attack_options(k).unwrap().is_applied());
    }

    #[test]
    fn test_move_selected_cannot_leave_board() {
        let mut session = create_test_session();
        let k = key(PlayerId::One, SlotId::One);
        session.apply_stat_delta(k, Stat::Movement, 5000).unwrap();
        session.show_move_options(k).unwrap();

        let options = session.selection().move_options.clone().unwrap();
        assert!(options.positions.iter().all(|&pos| session.config.in_bounds(pos)));
        let outcome = session.move_selected(Position::new(1, -1)).unwrap();
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::NotAnOption));
    }

    #[test]
    fn test_attack_target_at_classifies_cells() {
        let mut session = create_test_session();
        let attacker = key(PlayerId::One, SlotId::Three);
        let enemy = key(PlayerId::Two, SlotId::Two);
        let ally = key(PlayerId::One, SlotId::Two);
        session.set_position(attacker, Some(Position::new(6, 2))).unwrap();
        session.set_position(enemy, Some(Position::new(5, 3))).unwrap();
        session.set_position(ally, Some(Position::new(7, 2))).unwrap();

        // No attack action yet.
        assert_eq!(session.attack_target_at(Position::new(5, 3)).unwrap(), None);

        session.show_attack_options(attacker).unwrap();
        assert_eq!(
            session.attack_target_at(Position::new(5, 3)).unwrap(),
            Some(AttackTarget::EnemyUnit { unit: enemy })
        );
        assert_eq!(session.attack_target_at(Position::new(7, 2)).unwrap(), None);
        assert_eq!(
            session.attack_target_at(Position::new(7, 1)).unwrap(),
            Some(AttackTarget::Hq {
                player: PlayerId::One
            })
        );
        assert_eq!(session.attack_target_at(Position::new(1, 7)).unwrap(), None);
    }

    #[test]
    fn test_death_logged_once() {
        let mut session = create_test_session();
        let k = key(PlayerId::One, SlotId::Three);
        session.apply_stat_delta(k, Stat::Health, -10_000).unwrap();
        session.apply_stat_delta(k, Stat::Power, 5).unwrap();

        let deaths = session.log().lines().filter(|l| l.contains("died")).count();
        assert_eq!(deaths, 1);
        assert!(session.log().contains("💀 Rogue died !"));
        assert_eq!(session.status().unwrap().unit(k).position, None);
    }

    #[test]
    fn test_win_after_delay_by_hq() {
        let mut session = create_test_session();
        session.apply_hq_delta(PlayerId::One, -1000).unwrap();
        assert_eq!(session.pending_announcements(), 1);
        assert!(session.in_game());

        assert!(session.advance_clock(499).is_empty());
        assert_eq!(session.advance_clock(1), vec![PlayerId::Two]);
        assert_eq!(session.winner(), Some(PlayerId::Two));
        assert!(!session.in_game());
        assert!(session.status().is_none());
        assert!(session.log().is_empty());
        assert!(session.roster(PlayerId::One).is_empty());
    }

    #[test]
    fn test_win_by_wiping_units() {
        let mut session = create_test_session();
        for slot in SlotId::ALL {
            session
                .apply_stat_delta(key(PlayerId::Two, slot), Stat::Health, -10_000)
                .unwrap();
        }
        assert_eq!(session.advance_clock(500), vec![PlayerId::One]);
        assert_eq!(session.winner(), Some(PlayerId::One));
    }

    #[test]
    fn test_repeated_commits_schedule_one_win() {
        let mut session = create_test_session();
        session.apply_hq_delta(PlayerId::Two, -2000).unwrap();
        session.apply_hq_delta(PlayerId::Two, -1).unwrap();
        assert_eq!(session.pending_announcements(), 1);
    }

    #[test]
    fn test_reset_cancels_pending_win() {
        let mut session = create_test_session();
        session.apply_hq_delta(PlayerId::One, -1000).unwrap();
        session.reset_match();

        assert!(session.advance_clock(1000).is_empty());
        assert_eq!(session.winner(), None);
        assert!(!session.in_game());
        assert!(session.status().is_none());
    }

    #[test]
    fn test_dual_win_last_announcement_wins() {
        let mut session = create_test_session();
        let both_destroyed = session
            .status()
            .unwrap()
            .with_hq_health_delta(PlayerId::One, -1000)
            .with_hq_health_delta(PlayerId::Two, -1000);
        session.commit(both_destroyed);

        assert_eq!(session.pending_announcements(), 2);
        assert_eq!(session.advance_clock(500), vec![PlayerId::Two, PlayerId::One]);
        assert_eq!(session.winner(), Some(PlayerId::One));
    }

    #[test]
    fn test_apply_commands() {
        let mut session = MatchSession::with_dice(RulesConfig::default(), FixedDice(0)).unwrap();
        let script: Vec<Command> = serde_json::from_str(
            r#"[
                {"command": "add_hero", "player": 1, "hero": "knight"},
                {"command": "add_hero", "player": 1, "hero": "archer"},
                {"command": "add_hero", "player": 1, "hero": "mage"},
                {"command": "add_hero", "player": 2, "hero": "rogue"},
                {"command": "add_hero", "player": 2, "hero": "cleric"},
                {"command": "add_hero", "player": 2, "hero": "knight"},
                {"command": "start_match"},
                {"command": "apply_hq_delta", "player": 2, "delta": -50},
                {"command": "log", "line": "hello"}
            ]"#,
        )
        .unwrap();

        for command in &script {
            session.apply(command).unwrap();
        }
        assert_eq!(session.status().unwrap().hq(PlayerId::Two).health, 950);
        assert_eq!(session.log().latest(), Some("hello"));
    }
}
