// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use hgm_cli::{Cli, Commands, Parser};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.logging.init("hgm-cli")?;

    match cli.command {
        Commands::LsMarkers(args) => args.run(cli.config.as_deref()).await,
    }
}
