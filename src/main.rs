use anyhow::Result;
use clap::Parser;

mod host;

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = host::Args::parse();
    host::run(args).await?;

    Ok(())
}
