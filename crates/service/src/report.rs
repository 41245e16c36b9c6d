//! JSON and HTML artifacts for the unused-asset scan.

use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use janitor_protocol::{AssetKind, UnusedAssetReport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const BYTES_PER_MB: f64 = 1_048_576.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnusedReport {
    pub generated_at: String,
    pub project_path: String,
    pub summary: ReportSummary,
    pub unused_assets: Vec<ReportEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportSummary {
    pub total_assets_scanned: usize,
    pub unused_count: usize,
    pub total_size_bytes: u64,
    pub total_size_mb: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub catalog: String,
    pub path: String,
    pub size_bytes: u64,
    pub size_mb: String,
    /// `-1` when the modification time is unknown.
    pub days_since_modified: i64,
    pub scales: BTreeMap<String, PathBuf>,
}

/// Paths of the two written artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub html: PathBuf,
}

pub fn format_mb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / BYTES_PER_MB)
}

impl UnusedReport {
    /// Entries are ordered largest first, ties broken by name.
    pub fn build(
        project_path: &str,
        total_assets_scanned: usize,
        unused: &[UnusedAssetReport],
        generated_at: DateTime<Utc>,
    ) -> Self {
        let mut unused_assets: Vec<ReportEntry> = unused
            .iter()
            .map(|report| ReportEntry {
                name: report.asset.name.clone(),
                kind: report.asset.kind,
                catalog: report.asset.catalog_path.display().to_string(),
                path: report.asset.path.display().to_string(),
                size_bytes: report.estimated_size,
                size_mb: format_mb(report.estimated_size),
                days_since_modified: report.days_since_modified.unwrap_or(-1),
                scales: report.asset.scales.clone(),
            })
            .collect();
        unused_assets.sort_by(|a, b| {
            b.size_bytes
                .cmp(&a.size_bytes)
                .then_with(|| a.name.cmp(&b.name))
        });

        let total_size_bytes: u64 = unused_assets.iter().map(|entry| entry.size_bytes).sum();
        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            project_path: project_path.to_string(),
            summary: ReportSummary {
                total_assets_scanned,
                unused_count: unused_assets.len(),
                total_size_bytes,
                total_size_mb: format_mb(total_size_bytes),
            },
            unused_assets,
        }
    }
}

/// The HTML report sits next to the JSON one with the extension swapped.
pub fn html_path(json_path: &Path) -> PathBuf {
    json_path.with_extension("html")
}

/// Write (overwriting) both artifacts. The parent directory must exist.
pub fn write_reports(report: &UnusedReport, json_path: &Path) -> Result<ReportPaths> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(json_path, json)?;

    let html = html_path(json_path);
    fs::write(&html, render_html(report))?;

    log::info!(
        "Reports written to {} and {}",
        json_path.display(),
        html.display()
    );
    Ok(ReportPaths {
        json: json_path.to_path_buf(),
        html,
    })
}

pub fn render_html(report: &UnusedReport) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("<title>Unused Assets Report</title>\n");
    html.push_str("<style>\n");
    html.push_str("body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; background: #f5f5f7; color: #1d1d1f; margin: 0; padding: 20px; }\n");
    html.push_str(".container { max-width: 1400px; margin: 0 auto; background: #fff; border-radius: 12px; overflow: hidden; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }\n");
    html.push_str(".header { background: #5a67d8; color: #fff; padding: 24px 30px; }\n");
    html.push_str(".summary { display: flex; gap: 40px; padding: 20px 30px; border-bottom: 1px solid #e5e5e7; }\n");
    html.push_str(".summary .value { font-size: 28px; font-weight: 600; }\n");
    html.push_str("table { width: 100%; border-collapse: collapse; }\n");
    html.push_str("th, td { text-align: left; padding: 10px 30px; border-bottom: 1px solid #f0f0f2; font-size: 14px; }\n");
    html.push_str("td.num { text-align: right; font-variant-numeric: tabular-nums; }\n");
    html.push_str(".path { font-family: ui-monospace, Menlo, monospace; font-size: 12px; color: #6e6e73; }\n");
    html.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n");

    html.push_str("<div class=\"header\">\n<h1>Unused Assets Report</h1>\n");
    html.push_str(&format!(
        "<div class=\"meta\">{} &middot; generated {}</div>\n</div>\n",
        escape_html(&report.project_path),
        escape_html(&report.generated_at)
    ));

    html.push_str("<div class=\"summary\">\n");
    for (label, value) in [
        (
            "Assets scanned",
            report.summary.total_assets_scanned.to_string(),
        ),
        ("Unused", report.summary.unused_count.to_string()),
        ("Reclaimable", format!("{} MB", report.summary.total_size_mb)),
    ] {
        html.push_str(&format!(
            "<div><div class=\"label\">{label}</div><div class=\"value\">{}</div></div>\n",
            escape_html(&value)
        ));
    }
    html.push_str("</div>\n");

    html.push_str("<table>\n<thead><tr><th>Name</th><th>Type</th><th>Catalog</th><th>Size</th><th>Age (days)</th><th>Path</th></tr></thead>\n<tbody>\n");
    if report.unused_assets.is_empty() {
        html.push_str("<tr><td colspan=\"6\">No unused assets found</td></tr>\n");
    }
    for entry in &report.unused_assets {
        let age = if entry.days_since_modified < 0 {
            "unknown".to_string()
        } else {
            entry.days_since_modified.to_string()
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{} MB</td><td class=\"num\">{}</td><td class=\"path\">{}</td></tr>\n",
            escape_html(&entry.name),
            entry.kind.as_str(),
            escape_html(&catalog_label(&entry.catalog)),
            escape_html(&entry.size_mb),
            age,
            escape_html(&entry.path),
        ));
    }
    html.push_str("</tbody>\n</table>\n</div>\n</body>\n</html>\n");
    html
}

fn catalog_label(catalog: &str) -> String {
    Path::new(catalog)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| catalog.to_string())
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
