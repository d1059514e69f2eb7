//! bk-facade: the object-storage facade over hierarchical backends
//!
//! This crate is the translation adapter: it exposes an object-storage API
//! (buckets, keys, common prefixes, per-object metadata, copy/delete/list)
//! on top of any backend implementing `bk_core::TreeStore`. The backend is
//! a tree of directories and files; the object model is a flat key space
//! per bucket where "directories" are an illusion computed by grouping keys
//! that share a prefix up to a delimiter.
//!
//! Three things make the translation non-trivial, and each has a module:
//! - `listing` reconstructs the folder illusion from flat listings
//! - `meta` round-trips metadata between the two schemas without loss
//! - `copy` implements object copy even where the backend has no in-place
//!   rename, via a download/rename/reupload fallback that never corrupts
//!   data on partial failure
//!
//! `storage::ObjectStorage` composes them into the public surface.

mod copy;
mod listing;
pub mod meta;
mod storage;

pub use listing::partition_entries;
pub use storage::{Object, ObjectStorage};
