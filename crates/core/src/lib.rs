//! bk-core: Core library for bucketkit
//!
//! This crate provides the foundation shared by the facade, the backends,
//! and the CLI:
//! - Error taxonomy and exit-code mapping
//! - Object-key path utilities and CLI address parsing
//! - The TreeStore trait every hierarchical backend implements
//! - Protocol-facing data types (buckets, object records, listing chunks)
//! - Configuration and store-alias management
//!
//! The crate is independent of any concrete backend, which keeps the facade
//! testable against whatever implements the trait.

pub mod alias;
pub mod config;
pub mod error;
pub mod path;
pub mod store;
pub mod types;

pub use alias::{AliasManager, StoreAlias};
pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use path::{DELIMITER, ParsedPath, StorePath, parse_path};
pub use store::{ByteStream, ContainerMeta, Credentials, EntryMeta, TreeStore};
pub use types::{BucketInfo, CopyRequest, ListRequest, ListingChunk, ObjectRecord, PutRequest};
