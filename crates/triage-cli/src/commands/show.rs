//! Show command implementation.

use crate::cli::ShowArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;
use triage_domain::traits::DocumentStore;

/// Execute the show command.
pub fn execute_show(
    args: ShowArgs,
    config: &Config,
    config_path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    let store = super::open_store(config, config_path)?;

    let record = store
        .get(&args.claim_id)?
        .ok_or_else(|| CliError::NotFound(args.claim_id.clone()))?;

    println!("{}", formatter.format_record(&record)?);
    Ok(())
}
