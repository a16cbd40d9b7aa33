//! Command-line entry point.

use clap::Parser;
use sketchloom_cli::Cli;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Starting Sketchloom CLI: {:?}", cli.command);

    match pollster::block_on(sketchloom_cli::run(cli)) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
