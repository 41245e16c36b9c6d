//! Request and response shapes of the seven operations.
//!
//! Requests are flat: every field is a scalar and every field is optional at
//! the type level so that a missing required argument surfaces as a
//! `missing_argument` failure instead of a decoding error.

use janitor_protocol::{AssetKind, AssetRecord, MissingScaleReport, UsageReference};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct IndexAssetsRequest {
    #[schemars(description = "Absolute path to the Xcode project root (required)")]
    pub project_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FindUnusedAssetsRequest {
    #[schemars(description = "Absolute path to the Xcode project root (required)")]
    pub project_path: Option<String>,

    #[schemars(
        description = "JSON report path (default: <project_path>/unused_assets_report.json); the HTML report is written next to it"
    )]
    pub output_file: Option<String>,

    #[schemars(description = "Only report assets not modified for at least this many days")]
    pub minimum_age_days: Option<i64>,

    #[schemars(description = "Asset name filter, '*' matches any sequence (e.g. 'icon_*')")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FindAssetUsageRequest {
    #[schemars(description = "Absolute path to the Xcode project root (required)")]
    pub project_path: Option<String>,

    #[schemars(description = "Asset name, without the .imageset/.colorset suffix (required)")]
    pub asset_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DeleteAssetRequest {
    #[schemars(description = "Absolute path to the Xcode project root (required)")]
    pub project_path: Option<String>,

    #[schemars(description = "Asset name, without the set suffix (required)")]
    pub asset_name: Option<String>,

    #[schemars(description = "Report what would be deleted without deleting (default: false)")]
    pub dry_run: Option<bool>,

    #[schemars(description = "Copy the asset into <catalog>/.janitor-backup first (default: true)")]
    pub create_backup: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CheckMissingScalesRequest {
    #[schemars(description = "Absolute path to the Xcode project root (required)")]
    pub project_path: Option<String>,

    #[schemars(description = "Check only this asset (default: every image set)")]
    pub asset_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetAssetInfoRequest {
    #[schemars(description = "Absolute path to the Xcode project root (required)")]
    pub project_path: Option<String>,

    #[schemars(description = "Asset name, without the set suffix (required)")]
    pub asset_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CheckSwiftgenStatusRequest {
    #[schemars(description = "Absolute path to the Xcode project root (required)")]
    pub project_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexSummary {
    pub catalogs_found: usize,
    pub total_assets: usize,
    pub catalogs: Vec<PathBuf>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnusedAssetsSummary {
    pub unused_count: usize,
    pub total_size_bytes: u64,
    pub total_size_mb: String,
    pub json_report: PathBuf,
    pub html_report: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetUsage {
    pub asset_name: String,
    pub usage_count: usize,
    /// Whether the name is bound to a generated accessor.
    pub generator_managed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accessor_paths: Vec<String>,
    pub references: Vec<UsageReference>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissingScalesSummary {
    pub assets_with_missing_scales: usize,
    pub reports: Vec<MissingScaleReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetInfo {
    pub asset: AssetRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManagedAssetSample {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub catalog: String,
    pub accessor_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolicStatus {
    pub config_found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<PathBuf>,
    pub total_assets: usize,
    /// Indexed assets bound to a generated accessor.
    pub managed_count: usize,
    pub unmanaged_count: usize,
    /// Generated accessors per declared catalog input.
    pub catalog_breakdown: BTreeMap<String, usize>,
    pub managed_assets_sample: Vec<ManagedAssetSample>,
    pub message: String,
}
