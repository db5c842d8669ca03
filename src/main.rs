use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use setup_buildenv::commands;

/// Download and extract all third-party source dependencies.
///
/// Run this in a dedicated directory, e.g. ~/invariant (or C:\invariant on Windows).
#[derive(Parser)]
#[clap(name = "setup-buildenv")]
#[clap(about = "Fetch and unpack the third-party sources for the build environment")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Directory to download and extract into
    #[clap(long, default_value = ".")]
    dir: PathBuf,

    /// Override the detected operating system (Linux, Windows or Darwin)
    #[clap(long)]
    platform: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let result = commands::setup::run_setup(cli.platform.as_deref(), &cli.dir)
        .map_err(|e| anyhow::anyhow!(e));

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
