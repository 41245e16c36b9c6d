//! # Janitor Cleanup
//!
//! Single-asset removal with optional backup and dry run, plus the scale
//! coverage check for image sets.
//!
//! Backups are copied to `<catalog>/.janitor-backup/<name>-<timestamp>`
//! before anything is removed.

mod deletion;
mod error;
mod scales;

pub use deletion::{
    backup_dir, delete_asset, directory_size, try_delete, DeletionOptions, DeletionOutcome,
};
pub use error::{DeletionError, Result};
pub use scales::{check_missing_scales, find_missing_scales};
