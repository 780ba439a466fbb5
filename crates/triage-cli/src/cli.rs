//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// claim-triage - Triage insurance claim documents with a generative model.
#[derive(Debug, Parser)]
#[command(name = "claim-triage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CLAIM_TRIAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (claim ids only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Triage a claim document
    Process(ProcessArgs),

    /// Show a stored claim record
    Show(ShowArgs),

    /// List stored claim records, most recent first
    List(ListArgs),

    /// Write a default configuration file
    InitConfig(InitConfigArgs),
}

/// Arguments for the process command.
#[derive(Debug, Parser)]
pub struct ProcessArgs {
    /// Claim document (.pdf, .txt or .md)
    pub file: PathBuf,

    /// Claim id to store the record under
    #[arg(short = 'i', long)]
    pub claim_id: Option<String>,

    /// Extraction schema
    #[arg(long, value_enum)]
    pub schema: Option<SchemaArg>,

    /// Which claim id wins when both are available
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Report encoding
    #[arg(long, value_enum)]
    pub report_format: Option<ReportFormatArg>,

    /// Directory reports are written to
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Never send alerts for this run
    #[arg(long)]
    pub no_alert: bool,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Claim id
    pub claim_id: String,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Maximum number of records
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the init-config command.
#[derive(Debug, Parser)]
pub struct InitConfigArgs {
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Extraction schema options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaArg {
    /// Triage fields only
    Standard,
    /// Claim number, insured name and policy number as well
    Extended,
}

/// Claim id policy options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PolicyArg {
    /// The --claim-id value wins
    SuppliedFirst,
    /// The document's claim number wins
    ExtractedFirst,
}

/// Report encoding options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormatArg {
    /// PDF report
    Pdf,
    /// Plain text report
    Txt,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<SchemaArg> for triage_domain::SchemaVariant {
    fn from(schema: SchemaArg) -> Self {
        match schema {
            SchemaArg::Standard => triage_domain::SchemaVariant::Standard,
            SchemaArg::Extended => triage_domain::SchemaVariant::Extended,
        }
    }
}

impl From<PolicyArg> for triage_domain::ClaimIdPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::SuppliedFirst => triage_domain::ClaimIdPolicy::SuppliedFirst,
            PolicyArg::ExtractedFirst => triage_domain::ClaimIdPolicy::ExtractedFirst,
        }
    }
}

impl From<ReportFormatArg> for triage_pipeline::ReportFormat {
    fn from(format: ReportFormatArg) -> Self {
        match format {
            ReportFormatArg::Pdf => triage_pipeline::ReportFormat::Pdf,
            ReportFormatArg::Txt => triage_pipeline::ReportFormat::Txt,
        }
    }
}
