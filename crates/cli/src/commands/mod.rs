//! CLI command definitions and execution
//!
//! Commands are thin: they parse the address, open the facade over the
//! configured backend root, invoke one facade operation, and render the
//! result. No storage logic lives here.

use clap::{Parser, Subcommand};

use bk_core::AliasManager;
use bk_facade::ObjectStorage;
use bk_fs::FsStore;

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

mod alias;
mod cat;
mod cp;
mod ls;
mod mb;
mod pipe;
mod rb;
mod rm;
mod stat;

/// bk - object-storage CLI over hierarchical backends
///
/// Presents directory trees as buckets of objects. Addresses have the form
/// `alias/bucket[/key]`, where an alias names a configured backend root.
#[derive(Parser, Debug)]
#[command(name = "bk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage store aliases
    #[command(subcommand)]
    Alias(alias::AliasCommands),

    /// List buckets and objects
    Ls(ls::LsArgs),

    /// Create a bucket
    Mb(mb::MbArgs),

    /// Remove a bucket
    Rb(rb::RbArgs),

    /// Display object contents
    Cat(cat::CatArgs),

    /// Show object metadata
    Stat(stat::StatArgs),

    /// Copy objects (local<->store, store<->store)
    Cp(cp::CpArgs),

    /// Remove objects
    Rm(rm::RmArgs),

    /// Stream stdin to an object
    Pipe(pipe::PipeArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Alias(cmd) => alias::execute(cmd, cli.json).await,
        Commands::Ls(args) => ls::execute(args, output_config).await,
        Commands::Mb(args) => mb::execute(args, output_config).await,
        Commands::Rb(args) => rb::execute(args, output_config).await,
        Commands::Cat(args) => cat::execute(args, output_config).await,
        Commands::Stat(args) => stat::execute(args, output_config).await,
        Commands::Cp(args) => cp::execute(args, output_config).await,
        Commands::Rm(args) => rm::execute(args, output_config).await,
        Commands::Pipe(args) => pipe::execute(args, output_config).await,
    }
}

/// Open the facade for a configured alias.
///
/// Returns an exit code and message when the alias is missing or the
/// backend cannot be connected, so commands can render uniformly.
pub(crate) async fn open_storage(
    alias_name: &str,
) -> Result<ObjectStorage<FsStore>, (ExitCode, String)> {
    let manager = AliasManager::new()
        .map_err(|e| (ExitCode::GeneralError, format!("Failed to load aliases: {e}")))?;

    let alias = manager
        .get(alias_name)
        .map_err(|_| (ExitCode::NotFound, format!("Alias '{alias_name}' not found")))?;

    ObjectStorage::connect_as(FsStore::new(&alias.root), alias.owner.clone())
        .await
        .map_err(|e| {
            (
                ExitCode::from_error(&e),
                format!("Failed to open store '{alias_name}': {e}"),
            )
        })
}
