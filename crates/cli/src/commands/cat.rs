//! cat command - Display object contents
//!
//! Streams the object body to stdout as raw bytes.

use clap::Args;
use futures::StreamExt;
use std::io::{self, Write};

use crate::commands::{open_storage, stat::parse_object_path};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Display object contents
#[derive(Args, Debug)]
pub struct CatArgs {
    /// Object path (alias/bucket/key)
    pub path: String,
}

/// Execute the cat command
pub async fn execute(args: CatArgs, output_config: OutputConfig) -> ExitCode {
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

    match storage.get_object(&bucket, &key).await {
        Ok(object) => {
            let Some(mut body) = object.body else {
                // a directory key or an unreadable stream has no content
                return ExitCode::Success;
            };

            // Write directly to stdout, bypassing the formatter, to
            // preserve binary data
            let mut stdout = io::stdout();
            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        formatter.error(&format!("Failed while reading object: {e}"));
                        return ExitCode::GeneralError;
                    }
                };
                if let Err(e) = stdout.write_all(&chunk) {
                    formatter.error(&format!("Failed to write to stdout: {e}"));
                    return ExitCode::GeneralError;
                }
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to get '{}': {e}", args.path));
            ExitCode::from_error(&e)
        }
    }
}
