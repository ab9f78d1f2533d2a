//! # Command line
//!
//! Entry point shared by the `promptitecture` and `pt` binaries.
//!
//! ```bash
//! pt serve --port 8080          # run the HTTP API
//! pt info                       # package metadata and provider key status
//! pt architectures              # list the catalog
//! pt architectures show ec-rag  # one entry
//! pt config                     # effective configuration as TOML
//! pt ping                       # query /health on a running server
//! ```

pub mod commands;

use crate::config::Config;
use crate::error::PromptitectureError;
use crate::exit_codes::*;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "promptitecture")]
#[command(version, about = "Production-grade AI Architecture Framework")]
pub struct Cli {
    /// Config file (TOML, or YAML by .yaml/.yml extension)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API server
    Serve {
        /// Override http_server.host
        #[arg(long)]
        host: Option<String>,
        /// Override http_server.port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Show package metadata and provider key status
    Info,
    /// Browse the architecture catalog
    Architectures {
        #[command(subcommand)]
        action: Option<ArchitecturesAction>,
    },
    /// Print the effective configuration as TOML
    Config,
    /// Check that a running server answers on /health
    Ping {
        /// Server base URL (defaults to the configured host and port)
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ArchitecturesAction {
    /// List every registered architecture
    List,
    /// Show one architecture by name
    Show { name: String },
}

/// Parse arguments, run the command and return the process exit code
pub fn main() -> i32 {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            return EXIT_CONFIG_ERROR;
        }
    };

    if let Err(e) = init_logger(&config.promptitecture.log_level, cli.verbose) {
        eprintln!("{} failed to initialize logger: {}", "Warning:".yellow().bold(), e);
    }
    log::info!("Configuration: {}", config.source);

    let mut stdout = std::io::stdout().lock();
    match run(cli, config, &mut stdout) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            log::debug!("Command failed: {:?}", e);
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            exit_code_for(&e)
        }
    }
}

/// Dispatch a parsed command line against a loaded config
pub fn run(cli: Cli, mut config: Config, out: &mut impl Write) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Command::Info) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.http_server.host = host;
            }
            if let Some(port) = port {
                config.http_server.port = port;
            }
            config
                .validate()
                .map_err(|e| PromptitectureError::Config(format!("{:#}", e)))?;
            commands::serve(config)
        }
        Command::Info => commands::info(&config, out),
        Command::Architectures { action } => match action.unwrap_or(ArchitecturesAction::List) {
            ArchitecturesAction::List => commands::list_architectures(out),
            ArchitecturesAction::Show { name } => commands::show_architecture(&name, out),
        },
        Command::Config => commands::show_config(&config, out),
        Command::Ping { url } => {
            let url = url.unwrap_or_else(|| config.base_url());
            commands::ping(&url, out)
        }
    }
}

/// Map a command failure to its exit code
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<PromptitectureError>() {
        Some(PromptitectureError::UnknownArchitecture(_))
        | Some(PromptitectureError::InvalidInput(_)) => EXIT_INVALID_INPUT,
        Some(PromptitectureError::Http(_)) => EXIT_NETWORK_ERROR,
        Some(PromptitectureError::Config(_)) => EXIT_CONFIG_ERROR,
        _ => EXIT_ERROR,
    }
}

/// Configured level raised one step per `-v`
pub fn effective_log_level(configured: &str, verbose: u8) -> String {
    const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];
    let configured = configured.to_ascii_lowercase();
    let base = LEVELS
        .iter()
        .position(|l| *l == configured)
        .unwrap_or(3);
    let raised = (base + verbose as usize).min(LEVELS.len() - 1);
    LEVELS[raised].to_string()
}

/// Initialize logger; RUST_LOG wins over the configured level
fn init_logger(configured: &str, verbose: u8) -> Result<(), log::SetLoggerError> {
    let level = effective_log_level(configured, verbose);
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", level))
        .try_init()
}
