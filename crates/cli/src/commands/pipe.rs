//! pipe command - Stream stdin to an object

use clap::Args;
use serde::Serialize;
use std::io::Read;

use bk_core::PutRequest;

use crate::commands::{open_storage, stat::parse_object_path};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Stream stdin to an object
#[derive(Args, Debug)]
pub struct PipeArgs {
    /// Destination path (alias/bucket/key)
    pub target: String,
}

#[derive(Debug, Serialize)]
struct PipeOutput {
    status: &'static str,
    target: String,
    size_bytes: u64,
    size_human: String,
}

/// Execute the pipe command
pub async fn execute(args: PipeArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (alias_name, bucket, key) = match parse_object_path(&args.target) {
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

    let mut buffer = Vec::new();
    if let Err(e) = std::io::stdin().read_to_end(&mut buffer) {
        formatter.error(&format!("Failed to read from stdin: {e}"));
        return ExitCode::GeneralError;
    }
    let size = buffer.len() as u64;

    match storage
        .put_object(&bucket, PutRequest::from_bytes(key.as_str(), buffer))
        .await
    {
        Ok(_) => {
            if formatter.is_json() {
                formatter.json(&PipeOutput {
                    status: "success",
                    target: args.target.clone(),
                    size_bytes: size,
                    size_human: humansize::format_size(size, humansize::BINARY),
                });
            } else {
                formatter.success(&format!(
                    "Uploaded to {} ({})",
                    args.target,
                    humansize::format_size(size, humansize::BINARY)
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to upload: {e}"));
            ExitCode::from_error(&e)
        }
    }
}
