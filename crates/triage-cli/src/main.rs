//! claim-triage - Command-line front end for the claim triage pipeline.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use triage_cli::commands;
use triage_cli::{Cli, Command, Config, Formatter};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so json/quiet output stays machine-readable
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::path()?,
    };

    let config = Config::load_from(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Process(args) => {
            commands::execute_process(args, &config, &config_path, &formatter)?;
        }
        Command::Show(args) => {
            commands::execute_show(args, &config, &config_path, &formatter)?;
        }
        Command::List(args) => {
            commands::execute_list(args, &config, &config_path, &formatter)?;
        }
        Command::InitConfig(args) => {
            commands::execute_init_config(args, &config_path, &formatter)?;
        }
    }

    Ok(())
}
