use anyhow::Context;
use clap::Parser;

use mcserver_fetch::commands::{self, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    mcserver_fetch::init_tracing(cli.verbose);

    let name = cli.command.name();
    commands::run(cli)
        .await
        .with_context(|| format!("{name} failed"))?;

    Ok(())
}
