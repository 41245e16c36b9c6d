//! Operations over an Xcode project's asset catalogs
//!
//! [`Janitor`] owns the single-entry index cache and exposes the seven
//! operations as typed async methods. [`Janitor::dispatch`] runs them by name
//! on JSON arguments, which is how the CLI and the MCP server reach them.

mod cache;
mod config;
mod dispatch;
mod domain;
mod error;
mod janitor;
mod report;

pub use cache::IndexCache;
pub use config::{JanitorConfig, DEFAULT_REPORT_FILE_NAME, SYMBOLIC_SAMPLE_SIZE};
pub use dispatch::{ToolName, ToolRequest, ToolResponse, ToolStatus};
pub use domain::{
    AssetInfo, AssetUsage, CheckMissingScalesRequest, CheckSwiftgenStatusRequest,
    DeleteAssetRequest, FindAssetUsageRequest, FindUnusedAssetsRequest, GetAssetInfoRequest,
    IndexAssetsRequest, IndexSummary, ManagedAssetSample, MissingScalesSummary, SymbolicStatus,
    UnusedAssetsSummary,
};
pub use error::{Result, ServiceError};
pub use janitor::Janitor;
pub use report::{
    escape_html, format_mb, html_path, render_html, write_reports, ReportEntry, ReportPaths,
    ReportSummary, UnusedReport,
};
