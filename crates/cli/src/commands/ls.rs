//! ls command - List buckets and objects
//!
//! Lists buckets when given an alias only, or one level of objects and
//! common prefixes when given a bucket path.

use clap::Args;
use serde::Serialize;

use bk_core::{BucketInfo, ListRequest, ListingChunk};

use crate::commands::open_storage;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List buckets or objects
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Path to list (alias[/bucket[/prefix]])
    pub path: String,

    /// Summarize output (show totals)
    #[arg(long)]
    pub summarize: bool,
}

#[derive(Debug, Serialize)]
struct BucketListOutput {
    buckets: Vec<BucketInfo>,
}

/// Execute the ls command
pub async fn execute(args: LsArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (alias_name, bucket, prefix) = match parse_ls_path(&args.path) {
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

    let Some(bucket) = bucket else {
        return list_buckets(&storage, &formatter, args.summarize).await;
    };

    let request = ListRequest {
        prefix,
        delimiter: Some("/".to_string()),
        ..Default::default()
    };

    match storage.list_objects(&bucket, &request).await {
        Ok(chunk) => {
            render_chunk(&chunk, &formatter, args.summarize);
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to list objects: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

async fn list_buckets(
    storage: &bk_facade::ObjectStorage<bk_fs::FsStore>,
    formatter: &Formatter,
    summarize: bool,
) -> ExitCode {
    match storage.list_buckets().await {
        Ok(buckets) => {
            if formatter.is_json() {
                formatter.json(&BucketListOutput { buckets });
            } else {
                for bucket in &buckets {
                    let date = bucket.created.strftime("%Y-%m-%d %H:%M:%S").to_string();
                    formatter.println(&format!("[{date}] {}/", bucket.name));
                }
                if summarize {
                    formatter.println(&format!("\nTotal: {} buckets", buckets.len()));
                }
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to list buckets: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

fn render_chunk(chunk: &ListingChunk, formatter: &Formatter, summarize: bool) {
    if formatter.is_json() {
        formatter.json(chunk);
        return;
    }

    for prefix in &chunk.common_prefixes {
        formatter.println(&format!("{:>21} {:>9} {prefix}", "", "DIR"));
    }
    for object in &chunk.objects {
        let date = object
            .last_modified
            .map(|d| format!("[{}]", d.strftime("%Y-%m-%d %H:%M:%S")))
            .unwrap_or_else(|| " ".repeat(21));
        let size = object
            .size
            .map(|s| humansize::format_size(s, humansize::BINARY))
            .unwrap_or_else(|| "0 B".to_string());
        formatter.println(&format!("{date} {size:>9} {}", object.key));
    }

    if summarize {
        let total: u64 = chunk.objects.iter().filter_map(|o| o.size).sum();
        formatter.println(&format!(
            "\nTotal: {} objects, {} prefixes, {}",
            chunk.objects.len(),
            chunk.common_prefixes.len(),
            humansize::format_size(total, humansize::BINARY)
        ));
    }
}

/// Parse ls path into (alias, bucket, prefix)
fn parse_ls_path(path: &str) -> Result<(String, Option<String>, Option<String>), String> {
    let path = path.trim_end_matches('/');

    if path.is_empty() {
        return Err("Path cannot be empty".to_string());
    }

    let parts: Vec<&str> = path.splitn(3, '/').collect();

    match parts.len() {
        1 => Ok((parts[0].to_string(), None, None)),
        2 => Ok((parts[0].to_string(), Some(parts[1].to_string()), None)),
        3 => Ok((
            parts[0].to_string(),
            Some(parts[1].to_string()),
            Some(format!("{}/", parts[2])),
        )),
        _ => Err(format!("Invalid path format: {path}")),
    }
}
