//! Output formatting utilities for CLI.

use super::run::command_name;
use serde::Serialize;
use skirmish::game::{HeroUnit, IgnoreReason, MatchStatus, SessionReport, is_hq, wall_at};
use skirmish::{Command, Hero, Outcome, PlayerId, Position, RulesConfig, SlotId};
use std::fmt::Write;

/// JSON-serializable script run.
#[derive(Debug, Serialize)]
pub(super) struct JsonRunResult {
    /// Dice seed used.
    pub(super) seed: u64,
    /// Per-command results.
    pub(super) steps: Vec<JsonStep>,
    /// Session state after the last command.
    pub(super) session: SessionReport,
}

/// JSON-serializable result of one script command.
#[derive(Debug, Serialize)]
pub(super) struct JsonStep {
    /// 1-based position in the script.
    pub(super) index: usize,
    /// The command as run.
    pub(super) command: Command,
    /// What it did.
    pub(super) outcome: Outcome,
}

/// Format a script run as human-readable text.
pub(super) fn format_text(
    report: &SessionReport,
    steps: &[JsonStep],
    config: &RulesConfig,
    quiet: bool,
) -> String {
    let mut output = String::new();

    if !quiet {
        output.push_str("Steps:\n");
        for step in steps {
            let _ = writeln!(
                output,
                "  #{:<3} {:<20} {}",
                step.index,
                command_name(&step.command),
                describe_outcome(step.outcome)
            );
        }
        output.push('\n');
    }

    let _ = writeln!(output, "Session (clock: {} ms)", report.clock_ms);
    let _ = writeln!(output, "  In game: {}", if report.in_game { "yes" } else { "no" });
    match report.winner {
        Some(winner) => {
            let _ = writeln!(output, "  Winner: Player {winner}");
        }
        None => output.push_str("  Winner: none\n"),
    }
    let _ = writeln!(output, "  Phase: {:?}", report.phase);
    if let Some(hero) = report.selection.hero {
        let _ = writeln!(output, "  Selected: {hero}");
    }

    if let Some(status) = &report.status {
        output.push('\n');
        output.push_str(&render_board(status, config));
        output.push('\n');
        for hq in PlayerId::ALL.map(|player| status.hq(player)) {
            let _ = writeln!(output, "  HQ-{}: {} hp at {}", hq.player, hq.health, hq.position);
        }
        for unit in status.units() {
            output.push_str(&format_unit(unit));
        }
    }

    if !report.log.is_empty() {
        output.push_str("\nLog (newest first):\n");
        for line in &report.log {
            let _ = writeln!(output, "  {line}");
        }
    }

    output
}

/// Format the hero catalog as a table.
pub(super) fn format_catalog(catalog: &[Hero]) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<10} {:>6} {:>9} {:>8} {:>7} {:>6}",
        "Hero", "Power", "Resources", "Movement", "Defense", "Health"
    );
    for hero in catalog {
        let s = hero.stats;
        let _ = writeln!(
            output,
            "{:<10} {:>6} {:>9} {:>8} {:>7} {:>6}",
            hero.name.to_string(),
            s.power,
            s.resources,
            s.movement,
            s.defense,
            s.health
        );
    }
    output
}

fn describe_outcome(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Applied => "applied",
        Outcome::Ignored(reason) => match reason {
            IgnoreReason::NoHeroSelected => "ignored: no hero selected",
            IgnoreReason::NoActionActive => "ignored: no matching action",
            IgnoreReason::NotAnOption => "ignored: not an option",
            IgnoreReason::NotAnHq => "ignored: not an HQ",
            IgnoreReason::OffBoard => "ignored: off board",
            IgnoreReason::DeadUnit => "ignored: unit dead",
            IgnoreReason::InsufficientResources => "ignored: insufficient resources",
        },
    }
}

fn format_unit(unit: &HeroUnit) -> String {
    let position = unit
        .position
        .map_or_else(|| "-".to_string(), |pos| pos.to_string());
    let s = unit.stats;
    format!(
        "  {} {:<10} hp {:>4}  pw {:>4}  res {:>4}  mv {}  def {:>3}  at {}\n",
        unit.key(),
        unit.name().to_string(),
        s.health,
        s.power,
        s.resources,
        s.movement,
        s.defense,
        position
    )
}

/// Draw the board, top row first. HQs show as `H1`/`H2`, units as player
/// number plus slot letter, walls as `#1`/`#2`.
fn render_board(status: &MatchStatus, config: &RulesConfig) -> String {
    let mut output = String::new();
    for y in (1..=config.board_size).rev() {
        let _ = write!(output, "  {y} ");
        for x in 1..=config.board_size {
            let pos = Position::new(x, y);
            let cell = if let Some(player) = is_hq(pos, config) {
                format!("H{player}")
            } else if let Some(unit) = status.living_units().find(|u| u.position == Some(pos)) {
                let slot = match unit.slot {
                    SlotId::One => 'a',
                    SlotId::Two => 'b',
                    SlotId::Three => 'c',
                };
                format!("{}{slot}", unit.player)
            } else if let Some(player) = wall_at(pos, config) {
                format!("#{player}")
            } else {
                " .".to_string()
            };
            let _ = write!(output, "{cell} ");
        }
        output.push('\n');
    }
    output.push_str("    ");
    for x in 1..=config.board_size {
        let _ = write!(output, "{x:>2} ");
    }
    output.push('\n');
    output
}
