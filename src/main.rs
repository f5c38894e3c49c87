use anyhow::Result;
use clap::Parser;

mod cli;
mod client;
mod config;
mod logging;
mod operations;
mod prompts;
mod session;
mod value;

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    cli.run().await
}
