use std::path::Path;

use clap::Parser;
use trellis::cli::commands::Cli;
use trellis::model::config::Config;

fn main() {
    let cli = Cli::parse();
    trellis::cli::init_tracing();

    let config = match Config::load(cli.config.as_deref().map(Path::new)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = trellis::cli::session::run(&config, cli.json) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
