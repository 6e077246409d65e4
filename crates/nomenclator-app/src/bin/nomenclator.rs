//! Nomenclator command-line tool.

use std::process;

use clap::Parser as _;
use nomenclator_app::Cli;

fn main() {
    better_panic::install();
    env_logger::init();

    let cli = Cli::parse();
    if let Err(error) = nomenclator_app::run(cli) {
        eprintln!("Error: {error}");
        process::exit(1);
    }
}
