//! cp command - Copy objects
//!
//! Copies between the local filesystem and a store, or between two store
//! locations. Store-to-store copies go through the facade's copy
//! orchestration, which picks native copy or the rename fallback.

use std::path::Path;

use clap::Args;
use serde::Serialize;

use bk_core::path::leaf_name;
use bk_core::{CopyRequest, ParsedPath, PutRequest, StorePath, parse_path};

use crate::commands::open_storage;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Copy objects
#[derive(Args, Debug)]
pub struct CpArgs {
    /// Source path (local path or alias/bucket/key)
    pub source: String,

    /// Destination path (local path or alias/bucket/key)
    pub target: String,

    /// Overwrite a local destination if it exists
    #[arg(long, default_value = "true")]
    pub overwrite: bool,
}

#[derive(Debug, Serialize)]
struct CpOutput {
    status: &'static str,
    source: String,
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
}

/// Execute the cp command
pub async fn execute(args: CpArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let source = match parse_path(&args.source) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&format!("Invalid source path: {e}"));
            return ExitCode::UsageError;
        }
    };

    let target = match parse_path(&args.target) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&format!("Invalid target path: {e}"));
            return ExitCode::UsageError;
        }
    };

    match (&source, &target) {
        (ParsedPath::Local(src), ParsedPath::Store(dst)) => {
            upload_file(src, dst, &formatter).await
        }
        (ParsedPath::Store(src), ParsedPath::Local(dst)) => {
            download_file(src, dst, &args, &formatter).await
        }
        (ParsedPath::Store(src), ParsedPath::Store(dst)) => {
            copy_within_store(src, dst, &formatter).await
        }
        (ParsedPath::Local(_), ParsedPath::Local(_)) => {
            formatter.error("Cannot copy between two local paths. Use the system cp command.");
            ExitCode::UsageError
        }
    }
}

async fn upload_file(src: &Path, dst: &StorePath, formatter: &Formatter) -> ExitCode {
    if !src.is_file() {
        formatter.error(&format!("Source not found: {}", src.display()));
        return ExitCode::NotFound;
    }

    let storage = match open_storage(&dst.alias).await {
        Ok(s) => s,
        Err((code, message)) => {
            formatter.error(&message);
            return code;
        }
    };

    // A directory-shaped or empty destination key takes the source name
    let dst_key = if dst.key.is_empty() || dst.is_dir {
        let filename = src.file_name().unwrap_or_default().to_string_lossy();
        format!("{}{}", dst.key, filename)
    } else {
        dst.key.clone()
    };

    let data = match std::fs::read(src) {
        Ok(d) => d,
        Err(e) => {
            formatter.error(&format!("Failed to read {}: {e}", src.display()));
            return ExitCode::GeneralError;
        }
    };
    let size = data.len() as u64;

    match storage
        .put_object(&dst.bucket, PutRequest::from_bytes(dst_key.as_str(), data))
        .await
    {
        Ok(_) => {
            report(
                formatter,
                &src.display().to_string(),
                &format!("{}/{}/{dst_key}", dst.alias, dst.bucket),
                Some(size),
            );
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to upload {}: {e}", src.display()));
            ExitCode::from_error(&e)
        }
    }
}

async fn download_file(
    src: &StorePath,
    dst: &Path,
    args: &CpArgs,
    formatter: &Formatter,
) -> ExitCode {
    let storage = match open_storage(&src.alias).await {
        Ok(s) => s,
        Err((code, message)) => {
            formatter.error(&message);
            return code;
        }
    };

    let dst_path = if dst.is_dir() {
        dst.join(leaf_name(&src.key))
    } else {
        dst.to_path_buf()
    };

    if dst_path.exists() && !args.overwrite {
        formatter.error(&format!(
            "Destination exists: {}. Use --overwrite to replace.",
            dst_path.display()
        ));
        return ExitCode::Conflict;
    }

    match storage.get_object(&src.bucket, &src.key).await {
        Ok(object) => {
            let data = match object.into_bytes().await {
                Ok(d) => d,
                Err(e) => {
                    formatter.error(&format!("Failed while reading object: {e}"));
                    return ExitCode::GeneralError;
                }
            };
            let size = data.len() as u64;

            if let Some(parent) = dst_path.parent() {
                if !parent.exists() {
                    if let Err(e) = std::fs::create_dir_all(parent) {
                        formatter.error(&format!("Failed to create directory: {e}"));
                        return ExitCode::GeneralError;
                    }
                }
            }
            if let Err(e) = std::fs::write(&dst_path, &data) {
                formatter.error(&format!("Failed to write {}: {e}", dst_path.display()));
                return ExitCode::GeneralError;
            }

            report(
                formatter,
                &src.to_full_path(),
                &dst_path.display().to_string(),
                Some(size),
            );
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to download {}: {e}", src.to_full_path()));
            ExitCode::from_error(&e)
        }
    }
}

async fn copy_within_store(src: &StorePath, dst: &StorePath, formatter: &Formatter) -> ExitCode {
    if src.alias != dst.alias {
        formatter.error("Cross-alias copy is not supported. Download and re-upload instead.");
        return ExitCode::UnsupportedFeature;
    }

    let storage = match open_storage(&src.alias).await {
        Ok(s) => s,
        Err((code, message)) => {
            formatter.error(&message);
            return code;
        }
    };

    let request = CopyRequest::new(&src.bucket, &src.key, &dst.bucket, &dst.key);
    match storage.copy_object(&request).await {
        Ok(record) => {
            report(
                formatter,
                &src.to_full_path(),
                &dst.to_full_path(),
                record.size,
            );
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to copy: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

fn report(formatter: &Formatter, source: &str, target: &str, size: Option<u64>) {
    if formatter.is_json() {
        formatter.json(&CpOutput {
            status: "success",
            source: source.to_string(),
            target: target.to_string(),
            size_bytes: size,
        });
    } else {
        let human = size
            .map(|s| humansize::format_size(s, humansize::BINARY))
            .unwrap_or_default();
        formatter.println(&format!("{source} -> {target} ({human})"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_path() {
        let result = parse_path("./file.txt").unwrap();
        assert!(matches!(result, ParsedPath::Local(_)));
    }

    #[test]
    fn test_parse_store_path() {
        let result = parse_path("data/bucket/file.txt").unwrap();
        assert!(matches!(result, ParsedPath::Store(_)));
    }
}
