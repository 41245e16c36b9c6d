use janitor_indexer::ScanOptions;
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORT_FILE_NAME: &str = "unused_assets_report.json";

/// Managed-asset pairs listed by the symbolic status operation.
pub const SYMBOLIC_SAMPLE_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct JanitorConfig {
    pub scan: ScanOptions,
    /// Report file written into the project root when no output file is given.
    pub report_file_name: String,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            scan: ScanOptions::default(),
            report_file_name: DEFAULT_REPORT_FILE_NAME.to_string(),
        }
    }
}

impl JanitorConfig {
    pub fn with_scan_options(mut self, scan: ScanOptions) -> Self {
        self.scan = scan;
        self
    }

    /// Where the JSON report goes: the explicit path, or the default file
    /// name inside the project root.
    pub fn report_path(&self, project_path: &str, output_file: Option<&str>) -> PathBuf {
        match output_file.filter(|path| !path.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => Path::new(project_path).join(&self.report_file_name),
        }
    }
}
