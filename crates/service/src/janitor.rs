use crate::cache::IndexCache;
use crate::config::{JanitorConfig, SYMBOLIC_SAMPLE_SIZE};
use crate::domain::{
    AssetInfo, AssetUsage, CheckMissingScalesRequest, CheckSwiftgenStatusRequest,
    DeleteAssetRequest, FindAssetUsageRequest, FindUnusedAssetsRequest, GetAssetInfoRequest,
    IndexAssetsRequest, IndexSummary, ManagedAssetSample, MissingScalesSummary, SymbolicStatus,
    UnusedAssetsSummary,
};
use crate::error::{Result, ServiceError};
use crate::report::{format_mb, write_reports, UnusedReport};
use chrono::Utc;
use janitor_cleanup::{check_missing_scales, find_missing_scales, DeletionOptions};
use janitor_indexer::{CatalogIndexer, IndexerError};
use janitor_protocol::{AssetRecord, CatalogIndex, DeletionResult, UsageReference};
use janitor_usage::{
    find_unused_assets, SymbolicMappings, SymbolicMatcher, SymbolicResolver, UnusedFilter,
    UsageScanner,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Owner of the index cache and entry point for every operation.
pub struct Janitor {
    config: JanitorConfig,
    cache: Mutex<IndexCache>,
}

impl Default for Janitor {
    fn default() -> Self {
        Self::new(JanitorConfig::default())
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ServiceError::MissingArgument(name.to_string())),
    }
}

impl Janitor {
    pub fn new(config: JanitorConfig) -> Self {
        Self {
            config,
            cache: Mutex::new(IndexCache::default()),
        }
    }

    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    async fn build_index(&self, project_path: &str) -> Result<CatalogIndex> {
        let path = project_path.to_string();
        let exclude_dirs = self.config.scan.exclude_dirs.clone();
        let index = tokio::task::spawn_blocking(move || {
            CatalogIndexer::with_excluded_dirs(exclude_dirs).index_project(&path)
        })
        .await??;
        Ok(index)
    }

    /// Cached index for `project_path`, building it on a miss.
    pub async fn index_for(&self, project_path: &str) -> Result<Arc<CatalogIndex>> {
        let mut cache = self.cache.lock().await;
        if let Some(index) = cache.get(project_path) {
            log::debug!("Index cache hit for {project_path}");
            return Ok(index);
        }
        let index = self.build_index(project_path).await?;
        Ok(cache.store(project_path, index))
    }

    /// Rebuild unconditionally and replace the cached index.
    pub async fn reindex(&self, project_path: &str) -> Result<Arc<CatalogIndex>> {
        let mut cache = self.cache.lock().await;
        let index = self.build_index(project_path).await?;
        Ok(cache.store(project_path, index))
    }

    async fn resolve_mappings(&self, project_path: &str) -> Result<SymbolicMappings> {
        let root = PathBuf::from(project_path);
        let mappings =
            tokio::task::spawn_blocking(move || SymbolicResolver::new(root).resolve()).await?;
        Ok(mappings)
    }

    async fn find_asset(&self, project_path: &str, asset_name: &str) -> Result<AssetRecord> {
        let index = self.index_for(project_path).await?;
        index
            .find_by_name(asset_name)
            .cloned()
            .ok_or_else(|| ServiceError::AssetNotFound(asset_name.to_string()))
    }

    pub async fn index_assets(&self, request: IndexAssetsRequest) -> Result<IndexSummary> {
        let project_path = required(request.project_path, "project_path")?;
        let index = self.reindex(&project_path).await?;

        Ok(IndexSummary {
            catalogs_found: index.catalogs.len(),
            total_assets: index.total_count(),
            catalogs: index.catalogs.clone(),
            message: format!(
                "Indexed {} assets from {} catalogs",
                index.total_count(),
                index.catalogs.len()
            ),
        })
    }

    pub async fn find_unused_assets(
        &self,
        request: FindUnusedAssetsRequest,
    ) -> Result<UnusedAssetsSummary> {
        let project_path = required(request.project_path, "project_path")?;
        let index = self.index_for(&project_path).await?;

        let unused =
            find_unused_assets(&index, Path::new(&project_path), &self.config.scan).await?;
        let unused = UnusedFilter {
            minimum_age_days: request.minimum_age_days,
            pattern: request.pattern,
        }
        .apply(&index, unused);

        let report = UnusedReport::build(&project_path, index.total_count(), &unused, Utc::now());
        let json_path = self
            .config
            .report_path(&project_path, request.output_file.as_deref());
        let paths = write_reports(&report, &json_path)?;

        let total_size_mb = format_mb(report.summary.total_size_bytes);
        Ok(UnusedAssetsSummary {
            unused_count: report.summary.unused_count,
            total_size_bytes: report.summary.total_size_bytes,
            message: format!(
                "Found {} unused assets totaling {total_size_mb} MB. Reports saved to {} and {}",
                report.summary.unused_count,
                paths.json.display(),
                paths.html.display()
            ),
            total_size_mb,
            json_report: paths.json,
            html_report: paths.html,
        })
    }

    /// Literal references to the name plus, for generator-managed assets,
    /// references to its accessors. Sorted by file then line.
    pub async fn find_asset_usage(&self, request: FindAssetUsageRequest) -> Result<AssetUsage> {
        let project_path = required(request.project_path, "project_path")?;
        let asset_name = required(request.asset_name, "asset_name")?;
        if !Path::new(&project_path).exists() {
            return Err(IndexerError::ProjectNotFound(project_path).into());
        }

        let mappings = self.resolve_mappings(&project_path).await?;
        let accessor_paths = mappings.accessor_paths(&asset_name).to_vec();
        let usage = UsageScanner::new(self.config.scan.clone())
            .with_symbolic_paths(SymbolicMatcher::new(accessor_paths.iter().cloned()))
            .skipping(mappings.generated_files.iter().cloned())
            .scan(Path::new(&project_path))
            .await?;

        let mut references: Vec<UsageReference> = usage.literal_references(&asset_name).to_vec();
        for path in &accessor_paths {
            references.extend_from_slice(usage.symbolic_references(path));
        }
        references.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));

        Ok(AssetUsage {
            usage_count: references.len(),
            generator_managed: !accessor_paths.is_empty(),
            asset_name,
            accessor_paths,
            references,
        })
    }

    /// Deleting an asset on disk drops the cached index, which no longer
    /// matches the project.
    pub async fn delete_asset(&self, request: DeleteAssetRequest) -> Result<DeletionResult> {
        let project_path = required(request.project_path, "project_path")?;
        let asset_name = required(request.asset_name, "asset_name")?;
        let options = DeletionOptions {
            dry_run: request.dry_run.unwrap_or(false),
            create_backup: request.create_backup.unwrap_or(true),
        };

        let asset = self.find_asset(&project_path, &asset_name).await?;
        let result =
            tokio::task::spawn_blocking(move || janitor_cleanup::delete_asset(&asset, &options))
                .await?;

        if result.success && !options.dry_run {
            self.cache.lock().await.invalidate();
        }
        Ok(result)
    }

    pub async fn check_missing_scales(
        &self,
        request: CheckMissingScalesRequest,
    ) -> Result<MissingScalesSummary> {
        let project_path = required(request.project_path, "project_path")?;

        let reports = match request.asset_name.filter(|name| !name.trim().is_empty()) {
            Some(name) => {
                let asset = self.find_asset(&project_path, &name).await?;
                check_missing_scales(&asset).into_iter().collect()
            }
            None => {
                let index = self.index_for(&project_path).await?;
                find_missing_scales(&index.assets)
            }
        };

        Ok(MissingScalesSummary {
            assets_with_missing_scales: reports.len(),
            reports,
        })
    }

    pub async fn get_asset_info(&self, request: GetAssetInfoRequest) -> Result<AssetInfo> {
        let project_path = required(request.project_path, "project_path")?;
        let asset_name = required(request.asset_name, "asset_name")?;
        let asset = self.find_asset(&project_path, &asset_name).await?;
        Ok(AssetInfo { asset })
    }

    pub async fn check_swiftgen_status(
        &self,
        request: CheckSwiftgenStatusRequest,
    ) -> Result<SymbolicStatus> {
        let project_path = required(request.project_path, "project_path")?;
        let index = self.index_for(&project_path).await?;
        let mappings = self.resolve_mappings(&project_path).await?;

        let mut catalog_breakdown: BTreeMap<String, usize> = BTreeMap::new();
        for entry in &mappings.entries {
            *catalog_breakdown.entry(entry.catalog.clone()).or_default() += 1;
        }

        let managed: Vec<&AssetRecord> = index
            .assets
            .iter()
            .filter(|asset| mappings.is_managed(&asset.name))
            .collect();
        let managed_assets_sample = managed
            .iter()
            .take(SYMBOLIC_SAMPLE_SIZE)
            .filter_map(|asset| {
                let accessor_path = mappings.accessor_paths(&asset.name).first()?.clone();
                Some(ManagedAssetSample {
                    name: asset.name.clone(),
                    kind: asset.kind,
                    catalog: asset.catalog_name(),
                    accessor_path,
                })
            })
            .collect();

        let message = if !mappings.config_found() {
            "No SwiftGen configuration found. Assets are checked for direct name references only."
                .to_string()
        } else {
            format!(
                "SwiftGen manages {} of {} indexed assets. Those count as used only when their generated accessor is referenced.",
                managed.len(),
                index.total_count()
            )
        };

        Ok(SymbolicStatus {
            config_found: mappings.config_found(),
            config_path: mappings.config_path.clone(),
            total_assets: index.total_count(),
            managed_count: managed.len(),
            unmanaged_count: index.total_count() - managed.len(),
            catalog_breakdown,
            managed_assets_sample,
            message,
        })
    }
}
