use anyhow::Result;
use clap::Parser;

use choromap_cli::{cli::{Cli, Commands}, commands::render, init_logging};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match &cli.command {
        Commands::Render(args) => render::run(&cli, args),
    }
}
