//! Storage module for complaint media
//!
//! Provides a local disk store for uploaded files and the URLs they are served under.

mod local_disk;

pub use local_disk::{LocalDiskStorage, StoredFile};
