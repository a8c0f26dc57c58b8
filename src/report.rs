//! Human and JSON renderings of analysis results for the `edx` CLI.
//!
//! Everything is written to stdout; logs go to stderr, so `--json` output
//! can be piped straight into other tools.

use anyhow::Result;
use serde::Serialize;

use crate::models::{DocumentAnalysisResult, ExtractedEducationSystem, ParsedContent};
use crate::scan::ScanReport;

pub fn render_analysis(file_name: &str, result: &DocumentAnalysisResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("analyze {}\n", file_name));
    out.push_str(&format!("  systems: {}\n", result.extracted_systems.len()));
    out.push_str(&format!("  confidence: {:.2}\n", result.confidence));
    out.push_str(&format!("  summary: {}\n", result.summary));
    for rec in &result.recommendations {
        out.push_str(&format!("  - {}\n", rec));
    }
    for (i, system) in result.extracted_systems.iter().enumerate() {
        out.push('\n');
        out.push_str(&render_system(i + 1, system));
    }
    out
}

fn render_system(index: usize, s: &ExtractedEducationSystem) -> String {
    let mut out = format!("{}. {} {}\n", index, s.icon, s.name);
    out.push_str(&format!("   category: {}\n", s.category.as_str()));
    out.push_str(&format!("   confidence: {:.2}\n", s.confidence));
    out.push_str(&format!("   duration: {}\n", s.duration));
    out.push_str(&format!("   audience: {}\n", s.target_audience.join(", ")));
    out.push_str(&format!("   requirements: {}\n", s.requirements.join(" | ")));
    out.push_str(&format!("   benefits: {}\n", s.benefits.join(" | ")));
    out.push_str(&format!("   process: {}\n", s.process.join(" → ")));
    let first_line = s.description.lines().next().unwrap_or_default();
    out.push_str(&format!("   description: {}\n", first_line));
    out
}

pub fn render_parsed(parsed: &ParsedContent) -> String {
    format!("title: {}\n\n{}\n", parsed.title, parsed.content)
}

pub fn render_scan(report: &ScanReport) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        match &entry.outcome {
            Ok(result) => out.push_str(&format!(
                "  {:<40} systems={} confidence={:.2}\n",
                entry.relative_path,
                result.extracted_systems.len(),
                result.confidence
            )),
            Err(e) => out.push_str(&format!("  {:<40} FAILED: {}\n", entry.relative_path, e)),
        }
    }
    out.push_str(&format!("  files analyzed: {}\n", report.analyzed()));
    out.push_str(&format!("  files failed: {}\n", report.failed()));
    out.push_str(&format!("  systems extracted: {}\n", report.systems()));
    out.push_str("ok\n");
    out
}

#[derive(Serialize)]
struct ScanEntryJson<'a> {
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a DocumentAnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

pub fn scan_json(report: &ScanReport) -> Result<String> {
    let entries: Vec<ScanEntryJson<'_>> = report
        .entries
        .iter()
        .map(|e| ScanEntryJson {
            path: &e.relative_path,
            result: e.outcome.as_ref().ok(),
            error: e.outcome.as_ref().err().map(String::as_str),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}
