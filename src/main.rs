use clap::Parser;

use pricesync::adapter::inbound::cli::command::Cli;
use pricesync::adapter::inbound::cli::{output, run};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = run::execute(cli).await {
        tracing::error!(error = %e, "Fatal error");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
