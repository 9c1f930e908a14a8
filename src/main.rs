mod cli;
mod engine;
mod error;
mod logging;
mod model;
mod orchestrator;
mod text_summary;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_silent = args.silent;
    logging::init_tracing(is_silent);

    match cli::run(args).await {
        Ok(model::RunState::Succeeded) => Ok(()),
        // The failure message has already been written by the presentation layer.
        Ok(_) => std::process::exit(1),
        Err(e) => {
            if is_silent {
                println!("{:#}", e);
                std::process::exit(1);
            } else {
                Err(e)
            }
        }
    }
}
