//! bk - object-storage CLI over hierarchical backends
//!
//! Presents directory trees as buckets of objects through the bucketkit
//! facade. Backend roots are configured as aliases; every command
//! addresses storage as `alias/bucket[/key]`.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod exit_code;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
