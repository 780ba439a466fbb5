//! List command implementation.

use crate::cli::ListArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;
use triage_domain::traits::DocumentStore;

/// Execute the list command.
pub fn execute_list(
    args: ListArgs,
    config: &Config,
    config_path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    if args.limit == Some(0) {
        return Err(CliError::InvalidInput("--limit must be at least 1".to_string()));
    }

    let store = super::open_store(config, config_path)?;
    let records = store.list(args.limit)?;

    println!("{}", formatter.format_records(&records)?);
    Ok(())
}
