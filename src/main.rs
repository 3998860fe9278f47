//! Pressroom - An admin console for a publication backend

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pressroom::cli::{self, output, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; logs go to stderr so tables stay pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pressroom=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(error) = cli::run(cli).await {
        output::error(&format!("{:#}", error));
        std::process::exit(1);
    }

    Ok(())
}
