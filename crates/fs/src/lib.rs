//! bk-fs: local filesystem backend for bucketkit
//!
//! Implements the TreeStore trait over a root directory. Top-level
//! directories are buckets; everything below is the hierarchical tree the
//! facade flattens into object keys.

pub mod store;

pub use store::FsStore;
