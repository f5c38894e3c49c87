use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::client::TableClient;
use crate::config::Config;
use crate::prompts::{LinePrompter, TerminalPrompter};
use crate::session::{self, Session};

#[derive(Parser)]
#[command(name = "tablectl")]
#[command(about = "Interactive client for the table storage API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// API base URL (overrides config)
    #[arg(long, env = "TABLECTL_API_URL")]
    pub api_url: Option<String>,

    /// Log requests and responses to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive session (the default)
    Shell,

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., api.url)
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command.unwrap_or(Commands::Shell) {
            Commands::Shell => {
                let api_url = config.resolve_api_url(self.api_url.as_deref())?;
                let client = TableClient::new(&api_url)?;
                info!(api_url = client.base_url(), "starting session");

                let mut session = Session::new();
                if io::stdin().is_terminal() {
                    session::run(&mut session, &mut TerminalPrompter, &client).await?;
                } else {
                    let mut prompter = LinePrompter::stdio();
                    session::run(&mut session, &mut prompter, &client).await?;
                }
            }
            Commands::Config(cmd) => match cmd {
                ConfigCommands::Set { key, value } => {
                    config.set(&key, &value)?;
                    println!("✓ Configuration updated: {} = {}", key, value);
                }
                ConfigCommands::Get { key } => match config.get(&key)? {
                    Some(val) => println!("{}", val),
                    None => println!("Configuration key '{}' not found", key),
                },
            },
        }

        Ok(())
    }
}
