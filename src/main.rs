use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use shortener::cli::Cli;
use shortener::config::StaticConfig;
use shortener::runtime::run_server;
use shortener::system::init_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.generate_config {
        print!("{}", StaticConfig::generate_sample_config());
        return ExitCode::SUCCESS;
    }

    // Environment from `.env` feeds the SHORTENER__* overrides below.
    dotenvy::dotenv().ok();

    let config = match StaticConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };

    // The guard flushes buffered log lines when main returns.
    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };

    match actix_web::rt::System::new().block_on(run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Server exited with error: {:#}", e);
            eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
