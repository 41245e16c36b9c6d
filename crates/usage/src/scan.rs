//! Reverse usage index built over the source tree.
//!
//! Phase one walks the tree and collects eligible files. Phase two reads and
//! scans fixed-size batches of files concurrently; each task returns a private
//! partial [`UsageIndex`] and the coordinator merges them in submission order
//! once the batch completes.

use crate::error::Result;
use crate::patterns::{literal_names, SymbolicMatcher};
use janitor_indexer::{FileScanner, ScanOptions, SourceFile};
use janitor_protocol::{ReferenceKind, SourceLanguage, UsageReference};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Asset name (or accessor path) to every place it is referenced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageIndex {
    literal: HashMap<String, Vec<UsageReference>>,
    symbolic: HashMap<String, Vec<UsageReference>>,
    files_scanned: usize,
}

impl UsageIndex {
    /// Append every reference of `other` under its key. Nothing is replaced.
    pub fn merge(&mut self, other: UsageIndex) {
        for (name, refs) in other.literal {
            self.literal.entry(name).or_default().extend(refs);
        }
        for (path, refs) in other.symbolic {
            self.symbolic.entry(path).or_default().extend(refs);
        }
        self.files_scanned += other.files_scanned;
    }

    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }

    pub fn has_literal(&self, asset_name: &str) -> bool {
        self.literal.contains_key(asset_name)
    }

    pub fn has_symbolic(&self, accessor_path: &str) -> bool {
        self.symbolic.contains_key(accessor_path)
    }

    pub fn literal_references(&self, asset_name: &str) -> &[UsageReference] {
        self.literal
            .get(asset_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn symbolic_references(&self, accessor_path: &str) -> &[UsageReference] {
        self.symbolic
            .get(accessor_path)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn literal_names(&self) -> impl Iterator<Item = &str> {
        self.literal.keys().map(String::as_str)
    }

    /// Every reference, sorted by file, line, then asset. Handy when the
    /// cross-file order of the merge must not matter.
    pub fn sorted_references(&self) -> Vec<UsageReference> {
        let mut refs: Vec<UsageReference> = self
            .literal
            .values()
            .chain(self.symbolic.values())
            .flatten()
            .cloned()
            .collect();
        refs.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then(a.line.cmp(&b.line))
                .then_with(|| a.cmp(b))
        });
        refs
    }

    fn push(&mut self, kind: ReferenceKind, reference: UsageReference) {
        let map = match kind {
            ReferenceKind::Literal => &mut self.literal,
            ReferenceKind::Symbolic => &mut self.symbolic,
        };
        map.entry(reference.asset.clone()).or_default().push(reference);
    }
}

/// Scan one file's content. Pure: the result depends only on the arguments.
///
/// Lines are numbered from 1. Accessor matching only runs on Swift sources.
pub fn scan_content(
    path: &Path,
    language: SourceLanguage,
    content: &str,
    matcher: &SymbolicMatcher,
) -> UsageIndex {
    let mut index = UsageIndex {
        files_scanned: 1,
        ..UsageIndex::default()
    };
    let check_symbolic = language == SourceLanguage::Swift && !matcher.is_empty();

    for (offset, line) in content.lines().enumerate() {
        let line_number = offset + 1;
        let literals = literal_names(language, line);
        let accessors = if check_symbolic {
            matcher.matches(line)
        } else {
            Vec::new()
        };
        if literals.is_empty() && accessors.is_empty() {
            continue;
        }

        let context = line.trim();
        let reference = |asset: &str, kind: ReferenceKind| UsageReference {
            asset: asset.to_string(),
            file: path.to_path_buf(),
            line: line_number,
            context: context.to_string(),
            kind,
            language,
        };
        for name in literals {
            index.push(ReferenceKind::Literal, reference(name, ReferenceKind::Literal));
        }
        for accessor in accessors {
            index.push(
                ReferenceKind::Symbolic,
                reference(accessor, ReferenceKind::Symbolic),
            );
        }
    }

    index
}

async fn scan_file(file: SourceFile, matcher: Arc<SymbolicMatcher>) -> UsageIndex {
    match tokio::fs::read(&file.path).await {
        Ok(bytes) => {
            let content = String::from_utf8_lossy(&bytes);
            scan_content(&file.path, file.language, &content, &matcher)
        }
        Err(err) => {
            log::warn!("Skipping unreadable file {}: {err}", file.path.display());
            UsageIndex::default()
        }
    }
}

/// Concurrent reference scanner over a project tree.
#[derive(Debug, Clone)]
pub struct UsageScanner {
    options: ScanOptions,
    symbolic: Arc<SymbolicMatcher>,
    skip_files: Vec<PathBuf>,
}

impl UsageScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            symbolic: Arc::new(SymbolicMatcher::default()),
            skip_files: Vec::new(),
        }
    }

    /// Also report occurrences of these generated accessor paths.
    pub fn with_symbolic_paths(mut self, matcher: SymbolicMatcher) -> Self {
        self.symbolic = Arc::new(matcher);
        self
    }

    /// Files left out of the scan, such as the generator's own output.
    pub fn skipping(mut self, files: impl IntoIterator<Item = PathBuf>) -> Self {
        self.skip_files.extend(files);
        self
    }

    pub async fn scan(&self, root: &Path) -> Result<UsageIndex> {
        let root = tokio::fs::canonicalize(root).await?;
        let walk_options = self.options.clone();
        let files = tokio::task::spawn_blocking(move || {
            FileScanner::with_options(&root, &walk_options).scan()
        })
        .await?;

        let skip: HashSet<PathBuf> = self
            .skip_files
            .iter()
            .map(|path| path.canonicalize().unwrap_or_else(|_| path.clone()))
            .collect();
        let files: Vec<SourceFile> = files
            .into_iter()
            .filter(|file| !skip.contains(&file.path))
            .collect();

        self.scan_files(files).await
    }

    /// Phase two on an explicit file list.
    pub async fn scan_files(&self, files: Vec<SourceFile>) -> Result<UsageIndex> {
        let start = Instant::now();
        let total = files.len();
        let batch_size = self.options.batch_size.max(1);
        let mut index = UsageIndex::default();
        let mut processed = 0usize;

        for batch in files.chunks(batch_size) {
            let mut tasks = Vec::with_capacity(batch.len());
            for file in batch {
                let file = file.clone();
                let matcher = Arc::clone(&self.symbolic);
                tasks.push(tokio::spawn(scan_file(file, matcher)));
            }

            for task in tasks {
                index.merge(task.await?);
            }

            processed += batch.len();
            log::debug!("Processed {processed}/{total} files");
        }

        log::info!(
            "Scanned {} files in {} ms: {} literal names referenced",
            total,
            start.elapsed().as_millis(),
            index.literal.len()
        );
        Ok(index)
    }
}
