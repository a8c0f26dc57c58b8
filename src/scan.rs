//! Batch analysis of an upload directory.
//!
//! Walks `[scan].root`, keeps files matching the include globs and not the
//! exclude globs, and analyzes them one at a time in path order. A file that
//! fails is recorded in the report; the scan itself keeps going.

use anyhow::{bail, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::analyzer::DocumentAnalyzer;
use crate::config::ScanConfig;
use crate::models::DocumentAnalysisResult;

/// Outcome for one scanned file.
#[derive(Debug)]
pub struct ScanEntry {
    /// Path relative to the scan root.
    pub relative_path: String,
    pub outcome: Result<DocumentAnalysisResult, String>,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub entries: Vec<ScanEntry>,
}

impl ScanReport {
    pub fn analyzed(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.analyzed()
    }

    pub fn systems(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().ok())
            .map(|r| r.extracted_systems.len())
            .sum()
    }
}

/// Lists matching files under the root, sorted by relative path.
pub fn discover(scan: &ScanConfig) -> Result<Vec<(PathBuf, String)>> {
    let root = &scan.root;
    if !root.exists() {
        bail!("Scan root does not exist: {}", root.display());
    }

    let include_set = build_globset(&scan.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(scan.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(scan.follow_symlinks) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }
        files.push((path.to_path_buf(), rel_str));
    }

    files.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(files)
}

/// Analyzes every discovered file sequentially.
pub async fn scan_uploads(analyzer: &DocumentAnalyzer, scan: &ScanConfig) -> Result<ScanReport> {
    let files = discover(scan)?;
    tracing::info!(root = %scan.root.display(), files = files.len(), "scanning uploads");

    let mut report = ScanReport::default();
    for (path, relative_path) in files {
        let outcome = match analyzer.analyze_path(&path).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!(file = %relative_path, error = %e, "analysis failed");
                Err(e.to_string())
            }
        };
        report.entries.push(ScanEntry {
            relative_path,
            outcome,
        });
    }
    Ok(report)
}

/// Extensions are matched case-insensitively, like file classification.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(GlobBuilder::new(pattern).case_insensitive(true).build()?);
    }
    Ok(builder.build()?)
}
