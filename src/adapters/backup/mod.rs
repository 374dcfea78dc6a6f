//! Backup lookup
//!
//! - [`BackupLocator`] - the contract the workflow depends on
//! - [`CatalogBackupLocator`] - picks the latest entry from a [`BackupCatalog`] listing
//! - [`HttpBackupLocator`] - calls a remote lookup function

pub mod catalog;
pub mod http;
pub mod models;
pub mod traits;

pub use catalog::{select_latest, CatalogBackupLocator};
pub use http::HttpBackupLocator;
pub use traits::{BackupCatalog, BackupLocator};
