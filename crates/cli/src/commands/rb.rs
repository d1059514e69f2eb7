//! rb command - Remove a bucket

use clap::Args;
use serde::Serialize;

use crate::commands::{mb::parse_bucket_path, open_storage};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove a bucket
#[derive(Args, Debug)]
pub struct RbArgs {
    /// Target path (alias/bucket)
    pub target: String,
}

#[derive(Debug, Serialize)]
struct RbOutput {
    status: &'static str,
    bucket: String,
}

/// Execute the rb command
pub async fn execute(args: RbArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (alias_name, bucket) = match parse_bucket_path(&args.target) {
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

    if let Err(e) = storage.get_bucket(&bucket).await {
        formatter.error(&format!("Bucket '{alias_name}/{bucket}': {e}"));
        return ExitCode::from_error(&e);
    }

    match storage.delete_bucket(&bucket).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&RbOutput {
                    status: "success",
                    bucket: bucket.clone(),
                });
            } else {
                formatter.success(&format!("Bucket '{alias_name}/{bucket}' removed."));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to remove bucket: {e}"));
            ExitCode::from_error(&e)
        }
    }
}
