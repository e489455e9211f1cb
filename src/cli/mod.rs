pub mod actions;
pub mod check;
pub mod replay;

use std::error::Error;

use clap::{Parser, Subcommand};

use actions::handle_actions;
use check::handle_check;
use replay::{handle_replay, ReplayArgs};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List all navigation actions a binding can refer to
    Actions,
    /// Validate a bindings file (defaults to the user's bindings file)
    Check {
        /// Path to a YAML or JSON bindings file
        path: Option<std::path::PathBuf>,
    },
    /// Replay a scripted gamepad session against an in-memory page
    Replay(ReplayArgs),
}

pub fn main_cli(args: Args) -> Result<(), Box<dyn Error>> {
    match args.cmd {
        Commands::Actions => handle_actions(),
        Commands::Check { path } => handle_check(path)?,
        Commands::Replay(args) => handle_replay(args)?,
    }

    Ok(())
}
