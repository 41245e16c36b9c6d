use crate::error::Result;
use crate::patterns::SymbolicMatcher;
use crate::scan::{UsageIndex, UsageScanner};
use crate::symbolic::{SymbolicMappings, SymbolicResolver};
use chrono::{DateTime, Utc};
use janitor_indexer::ScanOptions;
use janitor_protocol::{AssetRecord, CatalogIndex, UnusedAssetReport};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A generator-managed asset counts as used only through one of its
/// accessors; raw-name literals are ignored for it. Any other asset is used
/// when its name appears in a literal reference.
pub fn is_used(asset: &AssetRecord, usage: &UsageIndex, mappings: &SymbolicMappings) -> bool {
    if mappings.is_managed(&asset.name) {
        return mappings
            .accessor_paths(&asset.name)
            .iter()
            .any(|path| usage.has_symbolic(path));
    }
    usage.has_literal(&asset.name)
}

/// Sum of the asset's scale file sizes. Missing files count as zero.
pub fn estimated_size(asset: &AssetRecord) -> u64 {
    asset
        .scales
        .values()
        .filter_map(|path| fs::metadata(path).ok())
        .map(|meta| meta.len())
        .sum()
}

pub fn days_since_modified(asset: &AssetRecord, now: DateTime<Utc>) -> Option<i64> {
    asset
        .last_modified
        .map(|modified| (now - modified).num_days())
}

/// Every asset in the index that no reference satisfies. No ordering
/// guarantee beyond index order.
pub fn classify_unused(
    index: &CatalogIndex,
    usage: &UsageIndex,
    mappings: &SymbolicMappings,
    now: DateTime<Utc>,
) -> Vec<UnusedAssetReport> {
    index
        .assets
        .iter()
        .filter(|asset| !is_used(asset, usage, mappings))
        .map(|asset| UnusedAssetReport {
            asset: asset.clone(),
            estimated_size: estimated_size(asset),
            days_since_modified: days_since_modified(asset, now),
        })
        .collect()
}

/// Filters applied after classification.
#[derive(Debug, Clone, Default)]
pub struct UnusedFilter {
    /// Drop assets modified more recently than this, and assets whose age is
    /// unknown.
    pub minimum_age_days: Option<i64>,
    /// `*` wildcard over asset names, case-insensitive.
    pub pattern: Option<String>,
}

impl UnusedFilter {
    pub fn apply(
        &self,
        index: &CatalogIndex,
        mut reports: Vec<UnusedAssetReport>,
    ) -> Vec<UnusedAssetReport> {
        if let Some(minimum) = self.minimum_age_days {
            reports.retain(|report| {
                report
                    .days_since_modified
                    .is_some_and(|days| days >= minimum)
            });
        }

        if let Some(pattern) = &self.pattern {
            let matching: HashSet<&str> = index
                .find_matching(pattern)
                .into_iter()
                .map(|asset| asset.name.as_str())
                .collect();
            reports.retain(|report| matching.contains(report.asset.name.as_str()));
        }

        reports
    }
}

/// Resolve accessors, scan the tree and classify in one pass.
///
/// Generated accessor files are excluded from the scan so their declarations
/// never count as usage.
pub async fn find_unused_assets(
    index: &CatalogIndex,
    project_root: &Path,
    options: &ScanOptions,
) -> Result<Vec<UnusedAssetReport>> {
    let resolver_root = project_root.to_path_buf();
    let mappings =
        tokio::task::spawn_blocking(move || SymbolicResolver::new(resolver_root).resolve())
            .await?;

    let matcher = SymbolicMatcher::new(mappings.all_accessor_paths());
    let usage = UsageScanner::new(options.clone())
        .with_symbolic_paths(matcher)
        .skipping(mappings.generated_files.iter().cloned())
        .scan(project_root)
        .await?;

    let unused = classify_unused(index, &usage, &mappings, Utc::now());
    log::info!(
        "{} of {} assets unused ({} generator-managed)",
        unused.len(),
        index.total_count(),
        mappings.len()
    );
    Ok(unused)
}
