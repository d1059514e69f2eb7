//! stat command - Show object metadata

use clap::Args;
use serde::Serialize;

use jiff::Timestamp;

use crate::commands::open_storage;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Show object metadata
#[derive(Args, Debug)]
pub struct StatArgs {
    /// Object path (alias/bucket/key)
    pub path: String,
}

#[derive(Debug, Serialize)]
struct StatOutput {
    name: String,
    bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified: Option<Timestamp>,
}

/// Execute the stat command
pub async fn execute(args: StatArgs, output_config: OutputConfig) -> ExitCode {
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

    match storage.get_object_metadata(&bucket, &key).await {
        Ok(record) => {
            if formatter.is_json() {
                formatter.json(&StatOutput {
                    name: record.key,
                    bucket: record.bucket,
                    size_bytes: record.size,
                    etag: record.etag,
                    last_modified: record.last_modified,
                });
            } else {
                formatter.println(&format!("Name   : {}", record.key));
                formatter.println(&format!("Bucket : {}", record.bucket));
                if let Some(size) = record.size {
                    formatter.println(&format!("Size   : {size} bytes"));
                }
                if let Some(etag) = &record.etag {
                    formatter.println(&format!("ETag   : {etag}"));
                }
                if let Some(modified) = record.last_modified {
                    formatter.println(&format!(
                        "Date   : {}",
                        modified.strftime("%Y-%m-%d %H:%M:%S UTC")
                    ));
                }
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to stat '{}': {e}", args.path));
            ExitCode::from_error(&e)
        }
    }
}

/// Parse an `alias/bucket/key` path
pub(crate) fn parse_object_path(path: &str) -> Result<(String, String, String), String> {
    if path.is_empty() {
        return Err("Path cannot be empty".to_string());
    }

    let parts: Vec<&str> = path.splitn(3, '/').collect();

    if parts.len() < 3 {
        return Err(format!(
            "Invalid path format: '{path}'. Expected: alias/bucket/key"
        ));
    }

    let (alias, bucket, key) = (parts[0], parts[1], parts[2]);

    if bucket.is_empty() {
        return Err("Bucket name cannot be empty".to_string());
    }
    if key.is_empty() {
        return Err("Object key cannot be empty".to_string());
    }

    Ok((alias.to_string(), bucket.to_string(), key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_path_valid() {
        let (alias, bucket, key) = parse_object_path("data/docs/file.txt").unwrap();
        assert_eq!(alias, "data");
        assert_eq!(bucket, "docs");
        assert_eq!(key, "file.txt");
    }

    #[test]
    fn test_parse_object_path_nested_key() {
        let (_, _, key) = parse_object_path("data/docs/path/to/file.txt").unwrap();
        assert_eq!(key, "path/to/file.txt");
    }

    #[test]
    fn test_parse_object_path_no_key() {
        assert!(parse_object_path("data/docs").is_err());
    }

    #[test]
    fn test_parse_object_path_empty() {
        assert!(parse_object_path("").is_err());
    }
}
