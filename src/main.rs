mod cli;
mod commands;
mod config;
mod dependency;
mod error;
mod fs;
mod http;
mod logging;
mod output;
mod prompt;
mod registry;
mod writer;

use clap::Parser;
use error::ErrorFormatter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = cli::Cli::parse();
    let verbose = cli.verbose;
    logging::init(verbose);

    if let Err(err) = commands::dispatch(cli).await {
        eprintln!("{}", ErrorFormatter::new(verbose).format(&err.to_diagnostic()));
        std::process::exit(1);
    }
}
