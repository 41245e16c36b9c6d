use crate::limits::scan_batch_size_from_env;
use ignore::WalkBuilder;
use janitor_protocol::SourceLanguage;
use std::path::{Path, PathBuf};

/// Directory names never descended into: build output, dependency caches,
/// VCS metadata and IDE state.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".build",
    "Pods",
    "DerivedData",
    ".git",
    "Carthage",
    "build",
    "xcuserdata",
    ".swiftpm",
    "node_modules",
];

/// Options for the source tree walk and the batched usage scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Files scanned concurrently before results are merged.
    pub batch_size: usize,
    /// Directory names pruned from the walk.
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            batch_size: scan_batch_size_from_env(),
            exclude_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl ScanOptions {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

/// A source file eligible for the usage scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: SourceLanguage,
}

/// Scanner for finding source files in a project
pub struct FileScanner {
    root: PathBuf,
    exclude_dirs: Vec<String>,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_options(root, &ScanOptions::default())
    }

    pub fn with_options(root: impl AsRef<Path>, options: &ScanOptions) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            exclude_dirs: options.exclude_dirs.clone(),
        }
    }

    /// Walk the tree and collect every scannable source file.
    ///
    /// Excluded directories are pruned, so nothing below them is visited.
    /// Hidden files and ignore files are not special.
    pub fn scan(&self) -> Vec<SourceFile> {
        let mut files = Vec::new();

        let exclude_dirs = self.exclude_dirs.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b));
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir && entry.depth() > 0 && Self::is_excluded_dir(entry.path(), &exclude_dirs))
        });

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    if let Some(language) = Self::source_language(entry.path()) {
                        files.push(SourceFile {
                            path: entry.into_path(),
                            language,
                        });
                    }
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        log::info!("Found {} source files", files.len());
        files
    }

    fn source_language(path: &Path) -> Option<SourceLanguage> {
        let ext = path.extension()?.to_str()?;
        SourceLanguage::from_extension(ext)
    }

    fn is_excluded_dir(path: &Path, exclude_dirs: &[String]) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| exclude_dirs.iter().any(|dir| dir == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn relative(root: &Path, files: &[SourceFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.path
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn skips_excluded_directories() {
        let temp = tempdir().unwrap();
        for dir in ["Pods/Kit", "DerivedData/Build", ".git/objects", "App"] {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        fs::write(temp.path().join("Pods/Kit/Kit.swift"), "").unwrap();
        fs::write(temp.path().join("DerivedData/Build/Gen.swift"), "").unwrap();
        fs::write(temp.path().join(".git/objects/x.swift"), "").unwrap();
        fs::write(temp.path().join("App/View.swift"), "").unwrap();

        let files = FileScanner::new(temp.path()).scan();
        assert_eq!(relative(temp.path(), &files), vec!["App/View.swift"]);
    }

    #[test]
    fn keeps_known_languages_only() {
        let temp = tempdir().unwrap();
        for name in [
            "A.swift",
            "B.m",
            "Main.storyboard",
            "Cell.xib",
            "README.md",
            "Info.plist",
        ] {
            fs::write(temp.path().join(name), "").unwrap();
        }

        let files = FileScanner::new(temp.path()).scan();
        let languages: Vec<_> = files.iter().map(|f| f.language).collect();
        assert_eq!(
            relative(temp.path(), &files),
            vec!["A.swift", "B.m", "Cell.xib", "Main.storyboard"]
        );
        assert_eq!(
            languages,
            vec![
                SourceLanguage::Swift,
                SourceLanguage::ObjectiveC,
                SourceLanguage::InterfaceBuilder,
                SourceLanguage::InterfaceBuilder,
            ]
        );
    }

    #[test]
    fn a_file_named_like_an_excluded_dir_is_kept() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("build.swift"), "").unwrap();
        let mut options = ScanOptions::default();
        options.exclude_dirs.push("build.swift".to_string());

        let files = FileScanner::with_options(temp.path(), &options).scan();
        assert_eq!(files.len(), 1);
    }
}
