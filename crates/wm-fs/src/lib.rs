//! wm-fs - Filesystem layer for Waymark
//!
//! This crate provides the `FileSystem` trait consumed by migrations, a
//! tokio-backed implementation for the local disk, and the
//! `PathTransferEngine` that relocates a directory's contents via rename
//! when possible and copy otherwise.

pub mod error;
pub mod local;
pub mod traits;
pub mod transfer;

pub use error::{FsError, FsResult};
pub use local::LocalFileSystem;
pub use traits::{FileSystem, PathStat};
pub use transfer::{PathTransferEngine, Transfer, TransferReport};
