use anyhow::Result;
use clap::Parser;

use dyadmender::cli::{Cli, Commands};
use dyadmender::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Build(args) => commands::build::run(&cli, args),
        Commands::Check(args) => commands::check::run(&cli, args),
        Commands::Crosswalk(args) => commands::crosswalk::run(&cli, args),
        Commands::Reconcile(args) => commands::reconcile::run(&cli, args),
        Commands::Ties(args) => commands::ties::run(&cli, args),
    }
}
