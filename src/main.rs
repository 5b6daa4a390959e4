use anyhow::Result;
use clap::Parser;

use chuhai_advisor::{chat, cli};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let input = args.input.clone();
    let config = args.into_config();

    chat::launch(&config, input).await
}
