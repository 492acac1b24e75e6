use clap::Parser;
use log_reporter::app::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run(Cli::parse()).await?;
    Ok(())
}
