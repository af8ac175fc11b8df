use std::env;

use clap::Parser;
use log::{debug, LevelFilter};

use storefront_rs_build::{run, CommandRunner, DEFAULT_COMMAND};

#[derive(Parser)]
#[command(
    name = "storefront-build",
    about = "Check the deployment environment, then run the storefront build"
)]
struct Cli {
    /// Build command to run once the environment is valid.
    #[arg(long, default_value = DEFAULT_COMMAND)]
    command: String,
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = storefront_rs_build::init_logging(level) {
        eprintln!("logging not configured: {}", e);
    }
    // .env 覆盖已有的环境变量
    match dotenvy::dotenv_override() {
        Ok(path) => debug!("loaded {}", path.display()),
        Err(e) => debug!("no .env loaded: {}", e),
    }
    let code = run(|name| env::var(name).ok(), &mut CommandRunner, cli.command.as_str());
    std::process::exit(code);
}
