//! Reference analysis for asset catalogs
//!
//! Answers "which indexed assets does the code actually use":
//!
//! ```text
//! swiftgen.yml ─► generated files ─► SymbolicMappings (raw name → Asset.x.y)
//!                                            │
//! source tree ─► FileScanner ─► batched scan ─► UsageIndex (literal + symbolic)
//!                                            │
//! CatalogIndex ─────────────────────────► classify ─► UnusedAssetReport
//! ```
//!
//! # Example
//!
//! ```no_run
//! use janitor_indexer::{CatalogIndexer, ScanOptions};
//! use janitor_usage::find_unused_assets;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let index = CatalogIndexer::new().index_project("/path/to/App")?;
//! let root = Path::new("/path/to/App");
//! let unused = find_unused_assets(&index, root, &ScanOptions::default()).await?;
//! for report in unused {
//!     println!("{} ({} bytes)", report.asset.name, report.estimated_size);
//! }
//! # Ok(())
//! # }
//! ```

mod classify;
mod error;
mod generator_config;
mod patterns;
mod scan;
mod symbolic;

pub use classify::{
    classify_unused, days_since_modified, estimated_size, find_unused_assets, is_used,
    UnusedFilter,
};
pub use error::{Result, UsageError};
pub use generator_config::{find_config, parse_outputs, GeneratedOutput, CONFIG_FILE_NAMES};
pub use patterns::{literal_names, literal_patterns, SymbolicMatcher};
pub use scan::{scan_content, UsageIndex, UsageScanner};
pub use symbolic::{parse_generated_source, SymbolicMappings, SymbolicResolver, FALLBACK_NAMESPACE};
