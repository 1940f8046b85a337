mod cmd;
mod input;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;
use thinkguard_core::paths;

#[derive(Parser)]
#[command(
    name = "thinkguard",
    about = "Repair thinking-block violations in conversation payloads before they are sent",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: .thinkguard/config.yaml found upward, then ~/.thinkguard/)
    #[arg(long, global = true, env = paths::CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log repairs and summaries to stderr
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Repair a payload and write it to stdout (or back to FILE)
    Enforce {
        /// Payload file (default: stdin)
        file: Option<PathBuf>,

        /// Rewrite FILE instead of printing to stdout
        #[arg(long, requires = "file")]
        in_place: bool,

        /// Fail on unreadable payloads instead of passing them through
        #[arg(long)]
        strict: bool,
    },

    /// List the repairs a payload needs without changing it
    Check {
        /// Payload file (default: stdin)
        file: Option<PathBuf>,
    },

    /// Report whether a model enforces thinking-first turns
    Model {
        /// Model identifier, e.g. claude-opus-4-thinking
        id: String,
    },

    /// Show the effective enforcing-model pattern table
    Models,

    /// Inspect, validate, or create the config file
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = root::resolve_config(cli.config.as_deref());

    let result = match cli.command {
        Commands::Enforce {
            file,
            in_place,
            strict,
        } => cmd::enforce::run(
            config_path.as_deref(),
            file.as_deref(),
            in_place,
            strict,
            cli.json,
        ),
        Commands::Check { file } => cmd::check::run(config_path.as_deref(), file.as_deref(), cli.json),
        Commands::Model { id } => cmd::model::run(config_path.as_deref(), &id, cli.json),
        Commands::Models => cmd::model::list(config_path.as_deref(), cli.json),
        Commands::Config { subcommand } => {
            cmd::config::run(config_path.as_deref(), subcommand, cli.json)
        }
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
