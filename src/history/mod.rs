//! Version history for summary artifacts.
//!
//! This module provides:
//! - `entry`: version snapshot records and the ordered history view
//! - `repository`: the persistence seam and an in-memory implementation
//! - `store`: file-backed persistence
//! - `versions`: the write-ahead version store

mod entry;
mod repository;
mod store;
mod versions;

pub use entry::*;
pub use repository::*;
pub use store::*;
pub use versions::*;
