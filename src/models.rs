//! Core data models produced and consumed by the extractor.
//!
//! Everything here is transient: a [`DocumentAnalysisResult`] is built in
//! memory from one [`UploadedFile`] and handed back to the caller, usually an
//! admin form where a human reviews the candidates before saving them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AnalyzeError;

/// An uploaded file held entirely in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk. The file name (not the full path) becomes
    /// [`UploadedFile::name`], matching what a browser upload would carry.
    pub async fn read(path: &Path) -> Result<Self, AnalyzeError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| AnalyzeError::Read {
                name: name.clone(),
                source,
            })?;
        Ok(Self { name, bytes })
    }

    /// Lower-cased extension after the last `.`, if any.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.name.rsplit_once('.')?;
        Some(ext.to_lowercase())
    }

    /// File name with its final extension removed.
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }
}

/// Strips the final `.ext` from a file name. Dotfiles keep their name.
pub fn base_name(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem,
        _ => name,
    }
}

/// Container families the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Spreadsheet,
    WordProcessor,
    Presentation,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "xlsx" | "xls" => Some(FileKind::Spreadsheet),
            "pptx" | "ppt" => Some(FileKind::Presentation),
            "docx" | "doc" => Some(FileKind::WordProcessor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Spreadsheet => "spreadsheet",
            FileKind::WordProcessor => "word-processor",
            FileKind::Presentation => "presentation",
        }
    }
}

/// Closed set of education-system categories, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Certification,
    Training,
    Development,
    Specialization,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Certification,
        Category::Training,
        Category::Development,
        Category::Specialization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Certification => "certification",
            Category::Training => "training",
            Category::Development => "development",
            Category::Specialization => "specialization",
        }
    }

    /// Name shown to admins in summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Certification => "자격증 취득",
            Category::Training => "직무 교육",
            Category::Development => "개인 개발",
            Category::Specialization => "전문 분야",
        }
    }
}

/// A candidate education system extracted from a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedEducationSystem {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub target_audience: Vec<String>,
    pub duration: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub process: Vec<String>,
    pub icon: String,
    pub color: String,
    /// Heuristic quality score. Floors at 0.2 and may exceed 1.0.
    pub confidence: f64,
}

impl ExtractedEducationSystem {
    /// Converts the candidate into the payload the admin UI submits when a
    /// reviewer accepts it.
    pub fn to_draft(&self) -> EducationSystemDraft {
        EducationSystemDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category,
            target_audience: self.target_audience.clone(),
            duration: self.duration.clone(),
            requirements: self.requirements.clone(),
            benefits: self.benefits.clone(),
            process: self.process.clone(),
            icon: self.icon.clone(),
            color: self.color.clone(),
            is_active: true,
        }
    }
}

/// Create-request body for the education-system persistence API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationSystemDraft {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub target_audience: Vec<String>,
    pub duration: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub process: Vec<String>,
    pub icon: String,
    pub color: String,
    pub is_active: bool,
}

/// Outcome of analyzing one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysisResult {
    pub extracted_systems: Vec<ExtractedEducationSystem>,
    pub summary: String,
    pub recommendations: Vec<String>,
    /// Mean of per-system confidence, 0 when nothing was extracted.
    pub confidence: f64,
}

/// Title and body recovered from a plain text, Markdown, or JSON upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedContent {
    pub title: String,
    pub content: String,
}

/// A partially filled candidate, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub description: String,
    pub target_audience: Vec<String>,
    pub duration: Option<String>,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub process: Vec<String>,
    /// Category decided by the strategy itself; scoring fills it otherwise.
    pub category: Option<Category>,
    /// Source text the confidence is computed over.
    pub source_text: String,
}

impl Candidate {
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.description.is_empty()
    }
}
