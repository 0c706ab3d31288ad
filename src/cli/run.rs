//! Run command implementation.

use super::output::{JsonRunResult, JsonStep, format_text};
use super::{CliError, OutputFormat};
use skirmish::{Command, FixedDice, MatchSession, RulesConfig, SeededDice};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the script or config cannot be loaded, or if a
/// command violates the session contract.
pub(crate) fn execute(
    script: PathBuf,
    seed: Option<u64>,
    config: Option<PathBuf>,
    dice: Option<u32>,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let commands = load_script(&script)?;

    let config = match config {
        Some(path) => RulesConfig::from_json_file(&path)?,
        None => RulesConfig::default(),
    };

    // Generate seed if not provided
    let seed = seed.unwrap_or_else(rand::random);

    let mut session = match dice {
        Some(face) => MatchSession::with_dice(config, FixedDice(face))?,
        None => MatchSession::with_dice(config, SeededDice::new(seed))?,
    };
    info!(script = %script.display(), commands = commands.len(), seed, "running script");

    let mut steps = Vec::with_capacity(commands.len());
    for (index, command) in commands.into_iter().enumerate() {
        let outcome = session.apply(&command).map_err(|e| {
            CliError::new(format!("step {} ({}): {e}", index + 1, command_name(&command)))
        })?;
        steps.push(JsonStep {
            index: index + 1,
            command,
            outcome,
        });
    }

    let report = session.report();
    match format {
        OutputFormat::Text => {
            if !quiet {
                println!("Running {} with seed {seed}...", script.display());
                println!();
            }
            print!("{}", format_text(&report, &steps, session.config(), quiet));
        }
        OutputFormat::Json => {
            let result = JsonRunResult {
                seed,
                steps: if quiet { Vec::new() } else { steps },
                session: report,
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

/// Read a JSON array of commands from `path`.
fn load_script(path: &Path) -> Result<Vec<Command>, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::new(format!("Failed to parse {}: {e}", path.display())))
}

/// The `command` tag of a command, as written in scripts.
pub(super) fn command_name(command: &Command) -> String {
    serde_json::to_value(command)
        .ok()
        .and_then(|value| value.get("command")?.as_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}
