//! Process command implementation.

use crate::backend::{AlertChannel, ModelBackend};
use crate::cli::ProcessArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;
use tracing::info;
use triage_pipeline::{DocumentKind, TriagePipeline};

/// Execute the process command.
///
/// Collaborators hold blocking HTTP clients, so they are created and dropped
/// outside the runtime that drives the pipeline.
pub fn execute_process(
    args: ProcessArgs,
    config: &Config,
    config_path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    let config = apply_overrides(&args, config.clone());
    config.validate()?;

    let kind = DocumentKind::from_path(&args.file)?;
    let bytes = std::fs::read(&args.file)
        .map_err(|e| CliError::InvalidInput(format!("{}: {}", args.file.display(), e)))?;

    let model = ModelBackend::from_config(&config.model)?;
    let store = super::open_store(&config, config_path)?;
    let notifier = AlertChannel::from_config(&config.notifier)?;
    let pipeline = TriagePipeline::new(model, store, notifier, config.pipeline.clone())?;

    info!("Processing {}", args.file.display());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(pipeline.process_document(&kind, &bytes, args.claim_id))?;
    drop(runtime);

    println!("{}", formatter.format_outcome(&outcome)?);
    Ok(())
}

/// Fold command-line flags over the loaded configuration.
fn apply_overrides(args: &ProcessArgs, mut config: Config) -> Config {
    if let Some(schema) = args.schema {
        config.pipeline.schema = schema.into();
    }
    if let Some(policy) = args.policy {
        config.pipeline.claim_id_policy = policy.into();
    }
    if let Some(format) = args.report_format {
        config.pipeline.report_format = format.into();
    }
    if let Some(dir) = &args.report_dir {
        config.pipeline.report_dir = dir.clone();
    }
    if args.no_alert {
        config.pipeline.alerts_enabled = false;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;
    use triage_domain::{ClaimIdPolicy, SchemaVariant};
    use triage_pipeline::ReportFormat;

    fn process_args(argv: &[&str]) -> ProcessArgs {
        let mut full = vec!["claim-triage", "process"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Command::Process(args) => args,
            _ => panic!("Expected Process command"),
        }
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = process_args(&["claim.txt"]);
        let config = apply_overrides(&args, Config::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_flags_override_config() {
        let args = process_args(&[
            "claim.txt",
            "--schema",
            "extended",
            "--policy",
            "extracted-first",
            "--report-format",
            "txt",
            "--report-dir",
            "out",
            "--no-alert",
        ]);
        let config = apply_overrides(&args, Config::default());

        assert_eq!(config.pipeline.schema, SchemaVariant::Extended);
        assert_eq!(config.pipeline.claim_id_policy, ClaimIdPolicy::ExtractedFirst);
        assert_eq!(config.pipeline.report_format, ReportFormat::Txt);
        assert_eq!(config.pipeline.report_dir, PathBuf::from("out"));
        assert!(!config.pipeline.alerts_enabled);
    }

    #[test]
    fn test_unsupported_file_rejected_before_model_setup() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("claim.docx");
        std::fs::write(&file, b"not supported").unwrap();

        let args = process_args(&[file.to_str().unwrap()]);
        let formatter = Formatter::new(crate::config::OutputFormat::Quiet, false);
        let result = execute_process(args, &Config::default(), &dir.path().join("config.toml"), &formatter);
        assert!(matches!(result, Err(CliError::Extraction(_))));
    }
}
