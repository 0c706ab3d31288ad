//! Heroes command implementation.

use super::output::format_catalog;
use super::{CliError, OutputFormat};
use skirmish::Hero;

/// Execute the heroes command: print the hero catalog.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub(crate) fn execute(format: OutputFormat) -> Result<(), CliError> {
    let catalog = Hero::catalog();
    match format {
        OutputFormat::Text => print!("{}", format_catalog(&catalog)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&catalog)?),
    }
    Ok(())
}
