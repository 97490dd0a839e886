//! Command-line interface definitions using clap

use clap::Parser;

/// Shortener - a URL shortener with sliding expiry
#[derive(Parser, Debug, Default)]
#[command(name = "shortener")]
#[command(version)]
#[command(about = "A URL shortener service with sliding expiry", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: ./config.toml, optional)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub generate_config: bool,
}
