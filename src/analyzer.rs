//! Document analysis pipeline.
//!
//! ```text
//! UploadedFile ──▶ classify ──▶ extract text ──▶ strategy ──▶ complete ──▶ summary
//!   (name, bytes)   (by ext)     (OOXML)         (candidates)  (defaults)   + recommendations
//! ```
//!
//! Fatal errors (unsupported extension, unreadable or unconvertible file)
//! abort the call with no partial result. Presentations are the exception:
//! a failed conversion is replaced by placeholder text so uploads of decks
//! never block the admin flow.

use std::path::Path;

use crate::config::{Config, ExtractionConfig, LimitsConfig};
use crate::error::AnalyzeError;
use crate::extract::extract_text;
use crate::models::{DocumentAnalysisResult, FileKind, UploadedFile};
use crate::scoring;
use crate::strategy::{ExtractContext, ExtractionStrategy, StrategyKind};

/// Runs the configured extraction strategy over uploaded documents.
pub struct DocumentAnalyzer {
    extraction: ExtractionConfig,
    limits: LimitsConfig,
    strategy: Box<dyn ExtractionStrategy>,
}

impl DocumentAnalyzer {
    pub fn new(config: &Config) -> Self {
        Self {
            extraction: config.extraction.clone(),
            limits: config.limits.clone(),
            strategy: config.extraction.strategy.build(),
        }
    }

    /// Overrides the strategy chosen in the configuration.
    pub fn with_strategy(mut self, kind: StrategyKind) -> Self {
        self.extraction.strategy = kind;
        self.strategy = kind.build();
        self
    }

    /// Installs a custom strategy implementation.
    pub fn with_custom_strategy(mut self, strategy: Box<dyn ExtractionStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Maps the file's extension to a supported container family.
    pub fn classify(file: &UploadedFile) -> Result<FileKind, AnalyzeError> {
        file.extension()
            .as_deref()
            .and_then(FileKind::from_extension)
            .ok_or_else(|| AnalyzeError::UnsupportedFormat(file.name.clone()))
    }

    /// Reads `path` and analyzes it.
    pub async fn analyze_path(&self, path: &Path) -> Result<DocumentAnalysisResult, AnalyzeError> {
        let file = UploadedFile::read(path).await?;
        self.analyze(&file)
    }

    pub fn analyze(&self, file: &UploadedFile) -> Result<DocumentAnalysisResult, AnalyzeError> {
        let kind = Self::classify(file)?;
        let text = self.document_text(file, kind)?;
        tracing::debug!(
            file = %file.name,
            kind = kind.as_str(),
            chars = text.chars().count(),
            "extracted document text"
        );
        let result = self.analyze_text(&text, &file.name);
        tracing::info!(
            file = %file.name,
            strategy = self.strategy.name(),
            systems = result.extracted_systems.len(),
            confidence = result.confidence,
            "document analyzed"
        );
        Ok(result)
    }

    /// Runs segmentation, completion and reporting over already-extracted text.
    pub fn analyze_text(&self, text: &str, file_name: &str) -> DocumentAnalysisResult {
        let ctx = ExtractContext {
            file_name,
            min_description_chars: self.extraction.min_description_chars,
            max_section_items: self.extraction.max_section_items,
        };
        let systems: Vec<_> = self
            .strategy
            .extract(text, &ctx)
            .into_iter()
            .map(scoring::complete)
            .collect();

        DocumentAnalysisResult {
            summary: scoring::summary(&systems),
            recommendations: scoring::recommendations(
                &systems,
                self.extraction.high_confidence_threshold,
            ),
            confidence: scoring::mean_confidence(&systems),
            extracted_systems: systems,
        }
    }

    fn document_text(&self, file: &UploadedFile, kind: FileKind) -> Result<String, AnalyzeError> {
        match extract_text(&file.bytes, kind, &self.limits) {
            Ok(text) => Ok(text),
            Err(e) if kind == FileKind::Presentation => {
                tracing::warn!(
                    file = %file.name,
                    error = %e,
                    "presentation conversion failed, using placeholder text"
                );
                Ok(presentation_placeholder(file.base_name()))
            }
            Err(source) => Err(AnalyzeError::Conversion { kind, source }),
        }
    }
}

/// Stand-in text for a presentation whose slides could not be read.
pub fn presentation_placeholder(base_name: &str) -> String {
    format!(
        "PowerPoint 프레젠테이션: {}\n\n이 파일은 PowerPoint 프레젠테이션입니다.",
        base_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionError;

    fn analyzer() -> DocumentAnalyzer {
        DocumentAnalyzer::new(&Config::default())
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        for name in ["notes.pdf", "image.png", "README", "archive.zip"] {
            let err = analyzer()
                .analyze(&UploadedFile::new(name, b"whatever".to_vec()))
                .unwrap_err();
            assert!(matches!(err, AnalyzeError::UnsupportedFormat(_)), "{}", name);
        }
    }

    #[test]
    fn broken_word_file_is_fatal() {
        let err = analyzer()
            .analyze(&UploadedFile::new("plan.docx", b"not a zip".to_vec()))
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyzeError::Conversion {
                kind: FileKind::WordProcessor,
                source: ConversionError::Archive(_)
            }
        ));
    }

    #[test]
    fn broken_presentation_degrades_to_placeholder() {
        let result = analyzer()
            .analyze(&UploadedFile::new("회의 자료.ppt", b"legacy".to_vec()))
            .unwrap();
        assert!(result.extracted_systems.is_empty());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn placeholder_text_feeds_section_strategy() {
        let analyzer = analyzer().with_strategy(StrategyKind::Section);
        let result = analyzer
            .analyze(&UploadedFile::new("신입사원 온보딩 과정.pptx", Vec::new()))
            .unwrap();
        assert_eq!(result.extracted_systems.len(), 1);
        assert_eq!(result.extracted_systems[0].name, "신입사원 온보딩 과정");
    }

    #[test]
    fn analyze_text_reports_not_found() {
        let result = analyzer().analyze_text("", "empty.xlsx");
        assert!(result.extracted_systems.is_empty());
        assert_eq!(result.summary, "문서에서 교육제도를 찾을 수 없습니다.");
        assert_eq!(
            result.recommendations,
            vec!["문서에 더 명확한 교육제도 정보를 추가해주세요."]
        );
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn analyze_text_end_to_end_example() {
        let text = "기초 교육 프로그램 안내\n이 교육은 신입사원을 대상으로 합니다\n대상: 신입사원, 경력사원\n혜택: 승진 가산점, 수당 지급";
        let result = analyzer().analyze_text(text, "plan.xlsx");
        assert_eq!(result.extracted_systems.len(), 1);
        let system = &result.extracted_systems[0];
        assert_eq!(system.name, "기초 교육 프로그램 안내");
        assert_eq!(system.description, "이 교육은 신입사원을 대상으로 합니다");
        assert!(system.target_audience.iter().any(|a| a == "경력사원"));
        assert!(system.benefits.iter().any(|b| b == "수당 지급"));
        assert!(system.confidence >= 0.2);
        assert_eq!(result.confidence, system.confidence);
        assert!(result.summary.contains("총 1개"));
    }
}
