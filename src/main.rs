// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;

use clap::Parser;

use dog_gait::cli::analyze::run_analysis;
use dog_gait::cli::args::{Cli, Commands};
use dog_gait::error;

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Analyze(args) => {
            if let Err(e) = run_analysis(args) {
                error!("{e}");
                process::exit(1);
            }
        }
    }
}
