use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    run::{self, RunArgs},
    trials::{self, TrialsArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "dtv-run", about = "Dual-task verification experiment CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a trial sequence and export it with its manifest.
    Trials(TrialsArgs),
    /// Run one participant's session and record their responses.
    Run(RunArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Trials(args) => trials::run(&args),
        Command::Run(args) => run::run(&args),
    }
}
