//! Learnctl - command-line dashboard for Learnboard
//!
//! Loads query result dumps, builds the report and prints it.

use clap::Parser;
use learnctl::cli::Cli;
use learnctl::commands::{effective_config, run};
use learnctl::config::LearnConfig;
use learnctl::display::colors;
use learnctl::errors::{EXIT_GENERAL_ERROR, EXIT_SUCCESS, GENERIC_FAILURE};
use learnctl::logging;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match LearnConfig::load(cli.config.as_deref()) {
        Ok(config) => effective_config(&cli, config),
        Err(e) => {
            eprintln!("{}error:{} {:#}", colors::ERR, colors::RESET, e);
            std::process::exit(EXIT_GENERAL_ERROR);
        }
    };
    logging::init(&config.log_level);

    let code = match run(&cli, &config).await {
        Ok(out) => {
            println!("{}", out);
            EXIT_SUCCESS
        }
        Err(e) => {
            error!(target: "learnctl", "{:#}", e);
            eprintln!("{}", GENERIC_FAILURE);
            EXIT_GENERAL_ERROR
        }
    };
    std::process::exit(code);
}
