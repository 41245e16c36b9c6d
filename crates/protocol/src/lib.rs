use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub mod name_filter;

pub use name_filter::WildcardPattern;

/// Directory suffix that marks an asset catalog root.
pub const CATALOG_SUFFIX: &str = ".xcassets";

/// Hidden directory inside a catalog that holds deletion backups.
pub const BACKUP_DIR_NAME: &str = ".janitor-backup";

/// Scale tokens every image set is expected to provide.
pub const EXPECTED_SCALES: [&str; 3] = ["1x", "2x", "3x"];

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    #[serde(rename = "imageset")]
    ImageSet,
    #[serde(rename = "colorset")]
    ColorSet,
    #[serde(rename = "dataset")]
    DataSet,
    #[serde(rename = "appiconset")]
    AppIconSet,
    #[serde(rename = "launchimage")]
    LaunchImage,
}

impl AssetKind {
    pub const ALL: [AssetKind; 5] = [
        AssetKind::ImageSet,
        AssetKind::ColorSet,
        AssetKind::DataSet,
        AssetKind::AppIconSet,
        AssetKind::LaunchImage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::ImageSet => "imageset",
            AssetKind::ColorSet => "colorset",
            AssetKind::DataSet => "dataset",
            AssetKind::AppIconSet => "appiconset",
            AssetKind::LaunchImage => "launchimage",
        }
    }

    /// Directory suffix including the leading dot, e.g. `.imageset`.
    pub fn suffix(self) -> &'static str {
        match self {
            AssetKind::ImageSet => ".imageset",
            AssetKind::ColorSet => ".colorset",
            AssetKind::DataSet => ".dataset",
            AssetKind::AppIconSet => ".appiconset",
            AssetKind::LaunchImage => ".launchimage",
        }
    }

    /// Splits `icon.imageset` into `(ImageSet, "icon")`.
    ///
    /// Returns `None` for plain folders and for a bare suffix with no name in front.
    pub fn from_dir_name(dir_name: &str) -> Option<(Self, &str)> {
        Self::ALL.into_iter().find_map(|kind| {
            dir_name
                .strip_suffix(kind.suffix())
                .filter(|name| !name.is_empty())
                .map(|name| (kind, name))
        })
    }

    /// Kinds whose scale map holds raster images.
    pub fn is_raster(self) -> bool {
        matches!(
            self,
            AssetKind::ImageSet | AssetKind::AppIconSet | AssetKind::LaunchImage
        )
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best-effort facts about an asset's first resolvable file.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AssetMetadata {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
    pub color_space: Option<String>,
    pub rendering_mode: Option<String>,
    pub file_size: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Directory name with the kind suffix removed.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    /// Owning `.xcassets` directory.
    pub catalog_path: PathBuf,
    /// The asset's own directory (`…/icon.imageset`).
    pub path: PathBuf,
    /// Scale or size token -> absolute file path.
    pub scales: BTreeMap<String, PathBuf>,
    pub metadata: AssetMetadata,
    pub last_modified: Option<DateTime<Utc>>,
}

impl AssetRecord {
    /// Catalog directory name, e.g. `Assets.xcassets`.
    pub fn catalog_name(&self) -> String {
        self.catalog_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.catalog_path.to_string_lossy().into_owned())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CatalogIndex {
    pub catalogs: Vec<PathBuf>,
    pub assets: Vec<AssetRecord>,
    pub indexed_at: DateTime<Utc>,
    pub project_path: String,
}

impl CatalogIndex {
    pub fn total_count(&self) -> usize {
        self.assets.len()
    }

    /// First asset with exactly this name, in catalog discovery order.
    pub fn find_by_name(&self, name: &str) -> Option<&AssetRecord> {
        self.assets.iter().find(|asset| asset.name == name)
    }

    /// Assets whose name matches a `*` wildcard pattern, case-insensitively.
    pub fn find_matching(&self, pattern: &str) -> Vec<&AssetRecord> {
        let pattern = match WildcardPattern::new(pattern) {
            Ok(pattern) => pattern,
            Err(err) => {
                log::warn!("Ignoring unusable asset name pattern {pattern:?}: {err}");
                return Vec::new();
            }
        };
        self.assets
            .iter()
            .filter(|asset| pattern.is_match(&asset.name))
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// A constructor-like call whose first string literal is the asset name.
    Literal,
    /// An occurrence of a generated accessor path such as `Asset.icon`.
    Symbolic,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SourceLanguage {
    Swift,
    ObjectiveC,
    InterfaceBuilder,
}

impl SourceLanguage {
    /// Maps a file extension (without the dot) to a scanned language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "swift" => Some(SourceLanguage::Swift),
            "m" | "mm" | "h" => Some(SourceLanguage::ObjectiveC),
            "xib" | "storyboard" => Some(SourceLanguage::InterfaceBuilder),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UsageReference {
    /// Raw asset name for literal matches, accessor path for symbolic ones.
    pub asset: String,
    pub file: PathBuf,
    /// 1-based.
    pub line: usize,
    pub context: String,
    pub kind: ReferenceKind,
    pub language: SourceLanguage,
}

/// One generated accessor bound to a raw asset name.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SymbolicMapping {
    pub asset_name: String,
    /// e.g. `Asset.Icons.euroSymbol`
    pub accessor_path: String,
    /// Catalog input as declared in the generator config.
    pub catalog: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UnusedAssetReport {
    pub asset: AssetRecord,
    pub estimated_size: u64,
    pub days_since_modified: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MissingScaleReport {
    pub asset: AssetRecord,
    pub missing_scales: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DeletionResult {
    pub asset: String,
    pub success: bool,
    pub backup_path: Option<PathBuf>,
    pub bytes_freed: u64,
    pub error: Option<String>,
    /// Stable code for `error`, e.g. `backup_failed`.
    pub error_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub hint: Option<String>,
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kind_suffix_is_stripped_from_directory_names() {
        assert_eq!(
            AssetKind::from_dir_name("icon_home.imageset"),
            Some((AssetKind::ImageSet, "icon_home"))
        );
        assert_eq!(
            AssetKind::from_dir_name("AppIcon.appiconset"),
            Some((AssetKind::AppIconSet, "AppIcon"))
        );
        assert_eq!(
            AssetKind::from_dir_name("Brand.colorset"),
            Some((AssetKind::ColorSet, "Brand"))
        );
        assert_eq!(AssetKind::from_dir_name("Icons"), None);
        assert_eq!(AssetKind::from_dir_name(".imageset"), None);
    }

    #[test]
    fn kinds_serialize_with_catalog_names() {
        let raw = serde_json::to_string(&AssetKind::AppIconSet).unwrap();
        assert_eq!(raw, "\"appiconset\"");
        for kind in AssetKind::ALL {
            assert_eq!(format!(".{kind}"), kind.suffix());
        }
    }

    #[test]
    fn source_language_follows_extension() {
        assert_eq!(
            SourceLanguage::from_extension("Swift"),
            Some(SourceLanguage::Swift)
        );
        assert_eq!(
            SourceLanguage::from_extension("storyboard"),
            Some(SourceLanguage::InterfaceBuilder)
        );
        assert_eq!(SourceLanguage::from_extension("rs"), None);
    }
}
