//! Main application entry point.

use clap::Parser;
use inkroom_app::CliArgs;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting InkRoom");

    let args = CliArgs::parse();
    match inkroom_app::run(&args) {
        Ok(Some(json)) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
