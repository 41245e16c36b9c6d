//! # Janitor Indexer
//!
//! Asset catalog indexing and source tree discovery.
//!
//! ## Pipeline
//!
//! ```text
//! Project root
//!     │
//!     ├──> Catalog discovery (*.xcassets, vendored dirs pruned)
//!     │      └─> Asset sets (imageset, colorset, dataset, appiconset, launchimage)
//!     │             └─> AssetRecord (scales, metadata, mtime)
//!     │
//!     └──> File Scanner (build/VCS dirs pruned)
//!            └─> Swift / Objective-C / Interface Builder files
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use janitor_indexer::CatalogIndexer;
//!
//! fn main() -> janitor_indexer::Result<()> {
//!     let index = CatalogIndexer::new().index_project("/path/to/project")?;
//!
//!     println!("{} assets in {} catalogs", index.total_count(), index.catalogs.len());
//!     Ok(())
//! }
//! ```

mod catalog;
mod error;
mod indexer;
mod limits;
mod scanner;

pub use catalog::parse_catalog;
pub use error::{IndexerError, Result};
pub use indexer::CatalogIndexer;
pub use limits::{scan_batch_size_from_env, DEFAULT_SCAN_BATCH_SIZE, SCAN_BATCH_SIZE_ENV};
pub use scanner::{FileScanner, ScanOptions, SourceFile, DEFAULT_EXCLUDED_DIRS};
