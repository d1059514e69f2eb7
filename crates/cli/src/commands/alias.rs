//! Alias management commands
//!
//! Aliases are named references to backend root directories; every other
//! command addresses storage through one.

use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;

use bk_core::{AliasManager, StoreAlias};

use crate::exit_code::ExitCode;

/// Alias subcommands for managing backend roots
#[derive(Subcommand, Debug)]
pub enum AliasCommands {
    /// Add or update an alias
    Set(SetArgs),

    /// List all configured aliases
    List(ListArgs),

    /// Remove an alias
    Remove(RemoveArgs),
}

/// Arguments for the `alias set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Alias name (e.g., "data", "archive")
    pub name: String,

    /// Backend root directory
    pub root: PathBuf,

    /// Owner name stamped on buckets created through this alias
    #[arg(long, default_value = "local")]
    pub owner: String,
}

/// Arguments for the `alias list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show full details including roots
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `alias remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the alias to remove
    pub name: String,
}

#[derive(Serialize)]
struct AliasListOutput {
    aliases: Vec<AliasInfo>,
}

#[derive(Serialize)]
struct AliasInfo {
    name: String,
    root: PathBuf,
    owner: String,
}

impl From<&StoreAlias> for AliasInfo {
    fn from(alias: &StoreAlias) -> Self {
        Self {
            name: alias.name.clone(),
            root: alias.root.clone(),
            owner: alias.owner.clone(),
        }
    }
}

#[derive(Serialize)]
struct AliasOperationOutput {
    success: bool,
    alias: String,
    message: String,
}

/// Execute an alias subcommand
pub async fn execute(cmd: AliasCommands, json_output: bool) -> ExitCode {
    let alias_manager = match AliasManager::new() {
        Ok(am) => am,
        Err(e) => {
            if json_output {
                eprintln!("{}", serde_json::json!({"error": e.to_string()}));
            } else {
                eprintln!("Error: {e}");
            }
            return ExitCode::GeneralError;
        }
    };

    match cmd {
        AliasCommands::Set(args) => {
            let mut alias = StoreAlias::new(args.name.clone(), &args.root);
            alias.owner = args.owner;

            match alias_manager.set(alias) {
                Ok(()) => {
                    if json_output {
                        let output = AliasOperationOutput {
                            success: true,
                            alias: args.name.clone(),
                            message: "Alias saved".into(),
                        };
                        println!("{}", serde_json::to_string_pretty(&output).unwrap());
                    } else {
                        println!("Alias '{}' -> {}", args.name, args.root.display());
                    }
                    ExitCode::Success
                }
                Err(e) => {
                    eprintln!("Failed to save alias: {e}");
                    ExitCode::GeneralError
                }
            }
        }
        AliasCommands::List(args) => match alias_manager.list() {
            Ok(aliases) => {
                if json_output {
                    let output = AliasListOutput {
                        aliases: aliases.iter().map(AliasInfo::from).collect(),
                    };
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());
                } else {
                    for alias in &aliases {
                        if args.long {
                            println!(
                                "{:<12} {} (owner: {})",
                                alias.name,
                                alias.root.display(),
                                alias.owner
                            );
                        } else {
                            println!("{}", alias.name);
                        }
                    }
                }
                ExitCode::Success
            }
            Err(e) => {
                eprintln!("Failed to list aliases: {e}");
                ExitCode::GeneralError
            }
        },
        AliasCommands::Remove(args) => match alias_manager.remove(&args.name) {
            Ok(()) => {
                if json_output {
                    let output = AliasOperationOutput {
                        success: true,
                        alias: args.name.clone(),
                        message: "Alias removed".into(),
                    };
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());
                } else {
                    println!("Alias '{}' removed", args.name);
                }
                ExitCode::Success
            }
            Err(e) => {
                eprintln!("Failed to remove alias: {e}");
                ExitCode::NotFound
            }
        },
    }
}
