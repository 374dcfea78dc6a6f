//! Table export
//!
//! - [`Exporter`] - the contract the workflow depends on
//! - [`SnapshotExporter`] - reads a [`TableSource`] and writes one object to an [`ObjectStore`]
//! - [`FsObjectStore`] - object store rooted in a local directory
//! - [`HttpExporter`] - calls a remote export function

pub mod fs_store;
pub mod http;
pub mod models;
pub mod snapshot;
pub mod traits;

pub use fs_store::FsObjectStore;
pub use http::HttpExporter;
pub use snapshot::{export_key, SnapshotExporter};
pub use traits::{Exporter, ObjectStore, TableSource};
