use crate::error::{DeletionError, Result};
use chrono::Utc;
use janitor_protocol::{AssetRecord, DeletionResult, BACKUP_DIR_NAME};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionOptions {
    /// Report what would be freed without touching the filesystem.
    pub dry_run: bool,
    /// Copy the asset into `<catalog>/.janitor-backup` before removing it.
    pub create_backup: bool,
}

impl Default for DeletionOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            create_backup: true,
        }
    }
}

/// What a successful [`try_delete`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub bytes_freed: u64,
    pub backup_path: Option<PathBuf>,
}

/// Delete one asset and describe the outcome. Failures are reported in the
/// result rather than returned.
pub fn delete_asset(asset: &AssetRecord, options: &DeletionOptions) -> DeletionResult {
    match try_delete(asset, options) {
        Ok(outcome) => DeletionResult {
            asset: asset.name.clone(),
            success: true,
            backup_path: outcome.backup_path,
            bytes_freed: outcome.bytes_freed,
            error: None,
            error_code: None,
        },
        Err(err) => {
            log::warn!("Deleting {} failed: {err}", asset.name);
            DeletionResult {
                asset: asset.name.clone(),
                success: false,
                backup_path: err.backup_path().cloned(),
                bytes_freed: 0,
                error: Some(err.to_string()),
                error_code: Some(err.code().to_string()),
            }
        }
    }
}

/// Size the asset, optionally back it up, then remove its directory.
///
/// A backup failure leaves the asset untouched. A removal failure keeps the
/// backup and reports where it is.
pub fn try_delete(asset: &AssetRecord, options: &DeletionOptions) -> Result<DeletionOutcome> {
    if !asset.path.exists() {
        return Err(DeletionError::AssetPathMissing(asset.path.clone()));
    }

    let size = directory_size(&asset.path);
    if options.dry_run {
        log::info!("Dry run: {} would free {size} bytes", asset.name);
        return Ok(DeletionOutcome {
            bytes_freed: size,
            backup_path: None,
        });
    }

    let backup_path = if options.create_backup {
        Some(back_up(asset)?)
    } else {
        None
    };

    remove_path(&asset.path).map_err(|source| DeletionError::DeletionFailed {
        path: asset.path.clone(),
        backup_path: backup_path.clone(),
        source,
    })?;

    log::info!("Deleted {} ({size} bytes)", asset.path.display());
    Ok(DeletionOutcome {
        bytes_freed: size,
        backup_path,
    })
}

/// Total size of every file below `path`.
pub fn directory_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|meta| meta.len())
        .sum()
}

/// Backup directory for a catalog.
pub fn backup_dir(catalog_path: &Path) -> PathBuf {
    catalog_path.join(BACKUP_DIR_NAME)
}

fn back_up(asset: &AssetRecord) -> Result<PathBuf> {
    let backup_root = backup_dir(&asset.catalog_path);
    let failed = |path: &Path, source: io::Error| DeletionError::BackupFailed {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(&backup_root).map_err(|err| failed(&backup_root, err))?;

    let destination = unique_destination(&backup_root, &asset.name);
    if let Err(err) = copy_tree(&asset.path, &destination) {
        if destination.exists() {
            if let Err(cleanup) = fs::remove_dir_all(&destination) {
                log::warn!(
                    "Failed to remove partial backup {}: {cleanup}",
                    destination.display()
                );
            }
        }
        return Err(failed(&destination, err));
    }

    log::debug!("Backed up {} to {}", asset.path.display(), destination.display());
    Ok(destination)
}

fn unique_destination(backup_root: &Path, name: &str) -> PathBuf {
    let stamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
    let base = backup_root.join(format!("{name}-{stamp}"));
    if !base.exists() {
        return base;
    }
    (1..)
        .map(|n| backup_root.join(format!("{name}-{stamp}-{n}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(base)
}

fn copy_tree(source: &Path, destination: &Path) -> io::Result<()> {
    if source.is_file() {
        fs::copy(source, destination)?;
        return Ok(());
    }

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?;
        let target = destination.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn remove_path(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
