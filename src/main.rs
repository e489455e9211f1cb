use std::env;
use std::error::Error;

use clap::Parser;

use padnav::cli::{main_cli, Args};

fn main() -> Result<(), Box<dyn Error>> {
    let log_level = match env::var("LOG_LEVEL") {
        Ok(value) => value,
        Err(_) => "info".to_string(),
    };
    env::set_var("RUST_LOG", log_level);
    env_logger::init();

    let args = Args::parse();
    log::debug!("Running padnav v{}", env!("CARGO_PKG_VERSION"));
    main_cli(args)
}
