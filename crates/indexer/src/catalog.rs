use crate::error::{IndexerError, Result};
use chrono::{DateTime, Utc};
use janitor_protocol::{AssetKind, AssetMetadata, AssetRecord, BACKUP_DIR_NAME};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DESCRIPTOR_FILE: &str = "Contents.json";

#[derive(Debug, Default, Deserialize)]
struct Descriptor {
    #[serde(default)]
    images: Vec<FileEntry>,
    #[serde(default)]
    data: Vec<FileEntry>,
    #[serde(default)]
    colors: Vec<ColorEntry>,
    #[serde(default)]
    properties: Option<Properties>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    filename: Option<String>,
    scale: Option<String>,
    size: Option<String>,
    idiom: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ColorEntry {
    color: Option<ColorValue>,
}

#[derive(Debug, Deserialize)]
struct ColorValue {
    #[serde(rename = "color-space")]
    color_space: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    #[serde(rename = "template-rendering-intent")]
    template_rendering_intent: Option<String>,
}

/// Parses every asset set below one `.xcassets` directory.
///
/// Folders (groups) are descended into; asset set directories are parsed and
/// not descended into. A malformed set is logged and dropped.
pub fn parse_catalog(catalog: &Path) -> Result<Vec<AssetRecord>> {
    if !catalog.is_dir() {
        return Err(IndexerError::CatalogNotFound(catalog.display().to_string()));
    }

    let mut assets = Vec::new();
    let mut walker = WalkDir::new(catalog)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Failed to read catalog entry in {}: {err}", catalog.display());
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let dir_name = entry.file_name().to_string_lossy().into_owned();
        if dir_name == BACKUP_DIR_NAME {
            walker.skip_current_dir();
            continue;
        }
        let Some((kind, name)) = AssetKind::from_dir_name(&dir_name) else {
            continue;
        };
        walker.skip_current_dir();

        match parse_asset(entry.path(), kind, name, catalog) {
            Ok(asset) => assets.push(asset),
            Err(err) => log::warn!("Skipping asset {}: {err}", entry.path().display()),
        }
    }

    Ok(assets)
}

fn parse_asset(dir: &Path, kind: AssetKind, name: &str, catalog: &Path) -> Result<AssetRecord> {
    let descriptor = match kind {
        // Color sets are usable without a readable descriptor; nothing else is.
        AssetKind::ColorSet => read_descriptor(dir).unwrap_or_else(|err| {
            log::debug!("Color set {} has no usable descriptor: {err}", dir.display());
            Descriptor::default()
        }),
        _ => read_descriptor(dir)?,
    };

    let entries: &[FileEntry] = match kind {
        AssetKind::ImageSet | AssetKind::AppIconSet | AssetKind::LaunchImage => {
            descriptor.images.as_slice()
        }
        AssetKind::DataSet => descriptor.data.as_slice(),
        AssetKind::ColorSet => &[],
    };
    let files = resolve_files(dir, kind, entries);

    let mut metadata = first_file_metadata(kind, &files);
    metadata.color_space = descriptor
        .colors
        .iter()
        .find_map(|entry| entry.color.as_ref()?.color_space.clone());
    metadata.rendering_mode = descriptor
        .properties
        .and_then(|props| props.template_rendering_intent);

    Ok(AssetRecord {
        name: name.to_string(),
        kind,
        catalog_path: catalog.to_path_buf(),
        path: dir.to_path_buf(),
        scales: files.into_iter().collect(),
        metadata,
        last_modified: modified_at(dir),
    })
}

fn read_descriptor(dir: &Path) -> Result<Descriptor> {
    let path = dir.join(DESCRIPTOR_FILE);
    let raw = fs::read(&path)?;
    serde_json::from_slice(&raw).map_err(|err| IndexerError::invalid_descriptor(&path, err))
}

/// Returns `(scale key, absolute path)` pairs in descriptor order.
///
/// Keys are unique: an entry whose key is already taken (same scale on a
/// second idiom) is stored as `<idiom>-<key>`.
fn resolve_files(dir: &Path, kind: AssetKind, entries: &[FileEntry]) -> Vec<(String, PathBuf)> {
    let mut taken = HashSet::new();
    let mut files = Vec::new();

    for entry in entries {
        let Some(filename) = entry.filename.as_deref().filter(|f| !f.is_empty()) else {
            continue;
        };
        let idiom = entry.idiom.as_deref().unwrap_or("universal");
        let mut key = scale_key(kind, entry, idiom);
        if taken.contains(&key) {
            key = format!("{idiom}-{key}");
            if taken.contains(&key) {
                log::debug!("Duplicate {key} entry in {}", dir.display());
                continue;
            }
        }
        let path = dir.join(filename);
        taken.insert(key.clone());
        files.push((key, path));
    }

    files
}

fn scale_key(kind: AssetKind, entry: &FileEntry, idiom: &str) -> String {
    let scale = entry.scale.as_deref();
    let size = entry.size.as_deref();
    match kind {
        AssetKind::AppIconSet => match (size, scale) {
            (Some(size), Some(scale)) => format!("{size}@{scale}"),
            (Some(size), None) => size.to_string(),
            (None, Some(scale)) => scale.to_string(),
            (None, None) => idiom.to_string(),
        },
        AssetKind::DataSet => idiom.to_string(),
        _ => scale.or(size).unwrap_or(idiom).to_string(),
    }
}

/// Metadata of the first file that exists on disk; all fields stay empty
/// when none does.
fn first_file_metadata(kind: AssetKind, files: &[(String, PathBuf)]) -> AssetMetadata {
    let mut metadata = AssetMetadata::default();
    let Some((path, meta)) = files
        .iter()
        .find_map(|(_, path)| fs::metadata(path).ok().map(|meta| (path, meta)))
    else {
        return metadata;
    };

    metadata.file_size = Some(meta.len());
    metadata.format = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());

    if kind.is_raster() {
        match image::image_dimensions(path) {
            Ok((width, height)) => {
                metadata.width = Some(width);
                metadata.height = Some(height);
            }
            Err(err) => log::debug!("No dimensions for {}: {err}", path.display()),
        }
    }

    metadata
}

fn modified_at(path: &Path) -> Option<DateTime<Utc>> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(modified))
}
