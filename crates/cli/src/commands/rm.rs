//! rm command - Remove objects

use clap::Args;
use serde::Serialize;

use crate::commands::{open_storage, stat::parse_object_path};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove an object
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Object path (alias/bucket/key)
    pub path: String,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    status: &'static str,
    path: String,
}

/// Execute the rm command
pub async fn execute(args: RmArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (alias_name, bucket, key) = match parse_object_path(&args.path) {
        Ok(parsed) => parsed,
        Err(e) => {
            formatter.error(&e);
            return ExitCode::UsageError;
        }
    };

    let storage = match open_storage(&alias_name).await {
        Ok(s) => s,
        Err((code, message)) => {
            formatter.error(&message);
            return code;
        }
    };

    match storage.delete_object(&bucket, &key).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&RmOutput {
                    status: "success",
                    path: args.path.clone(),
                });
            } else {
                formatter.success(&format!("Removed '{}'.", args.path));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to remove '{}': {e}", args.path));
            ExitCode::from_error(&e)
        }
    }
}
