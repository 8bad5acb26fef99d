//! Record Enricher CLI entry point.

use clap::Parser;

use record_enricher::cli::{commands, Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args, cli.json).await,
        Commands::Embed(args) => commands::embed::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        record_enricher::cli::handle_error(err, cli.json);
    }
}
