//! mb command - Create a bucket

use clap::Args;
use serde::Serialize;

use crate::commands::open_storage;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Create a bucket
#[derive(Args, Debug)]
pub struct MbArgs {
    /// Target path (alias/bucket)
    pub target: String,
}

#[derive(Debug, Serialize)]
struct MbOutput {
    status: &'static str,
    bucket: String,
    owner: String,
}

/// Execute the mb command
pub async fn execute(args: MbArgs, output_config: OutputConfig) -> ExitCode {
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

    match storage.create_bucket(&bucket).await {
        Ok(info) => {
            if formatter.is_json() {
                formatter.json(&MbOutput {
                    status: "success",
                    bucket: info.name,
                    owner: info.owner,
                });
            } else {
                formatter.success(&format!("Bucket '{alias_name}/{bucket}' created."));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to create bucket: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

/// Parse an `alias/bucket` path
pub(crate) fn parse_bucket_path(path: &str) -> Result<(String, String), String> {
    let path = path.trim_end_matches('/');

    if path.is_empty() {
        return Err("Path cannot be empty".to_string());
    }

    let parts: Vec<&str> = path.splitn(2, '/').collect();

    if parts.len() != 2 || parts[1].is_empty() {
        return Err(format!(
            "Invalid path format: '{path}'. Expected: alias/bucket"
        ));
    }

    Ok((parts[0].to_string(), parts[1].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket_path_valid() {
        let (alias, bucket) = parse_bucket_path("data/docs").unwrap();
        assert_eq!(alias, "data");
        assert_eq!(bucket, "docs");
    }

    #[test]
    fn test_parse_bucket_path_trailing_slash() {
        let (alias, bucket) = parse_bucket_path("data/docs/").unwrap();
        assert_eq!(alias, "data");
        assert_eq!(bucket, "docs");
    }

    #[test]
    fn test_parse_bucket_path_no_bucket() {
        assert!(parse_bucket_path("data").is_err());
    }

    #[test]
    fn test_parse_bucket_path_empty() {
        assert!(parse_bucket_path("").is_err());
    }
}
