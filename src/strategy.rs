//! Extraction strategies: how document text is carved into candidates.
//!
//! Two granularities exist side by side:
//!
//! | Strategy | Granularity | Segmentation |
//! |----------|-------------|--------------|
//! | [`LineScanStrategy`] | many systems per file | heading lines matching an education pattern |
//! | [`SectionStrategy`] | one system per file | keyword-anchored sections of the whole text |
//!
//! Both return raw [`Candidate`]s; defaults, icon, color, category and
//! confidence are filled in by [`crate::scoring::complete`].

use serde::Deserialize;

use crate::lexicon::{
    AUDIENCE_CUES, BENEFIT_ANCHORS, BENEFIT_CUES, BENEFIT_LIST_ANCHORS, BENEFIT_LIST_STOPS,
    DURATION_UNITS, EDUCATION_PATTERNS, PROCESS_ANCHORS, PROCESS_CUES, PROCESS_LIST_ANCHORS,
    PROCESS_LIST_STOPS, REQUIREMENT_ANCHORS, REQUIREMENT_CUES, REQUIREMENT_LIST_ANCHORS,
    REQUIREMENT_LIST_STOPS, SECTION_CATEGORY_KEYWORDS,
};
use crate::models::{base_name, Candidate};
use crate::scoring::{confidence, first_matching_category, CONFIDENCE_FLOOR};
use crate::sections::{
    char_len, contains_any, extract_duration, extract_list_items, extract_title,
    non_empty_lines, section_items, strip_label, structured_description,
};

/// Which strategy the analyzer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Many systems per file, one per heading line.
    #[default]
    LineScan,
    /// The whole file is one system.
    Section,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn ExtractionStrategy> {
        match self {
            StrategyKind::LineScan => Box::new(LineScanStrategy),
            StrategyKind::Section => Box::new(SectionStrategy),
        }
    }
}

/// Per-call inputs a strategy may need besides the text.
#[derive(Debug, Clone)]
pub struct ExtractContext<'a> {
    pub file_name: &'a str,
    pub min_description_chars: usize,
    pub max_section_items: usize,
}

/// Turns document text into candidate records.
pub trait ExtractionStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Extracts zero or more candidates from `text`.
    fn extract(&self, text: &str, ctx: &ExtractContext<'_>) -> Vec<Candidate>;
}

/// Splits the text at lines that look like program headings and collects
/// the lines under each heading into one candidate.
pub struct LineScanStrategy;

impl LineScanStrategy {
    fn is_heading(line: &str) -> bool {
        EDUCATION_PATTERNS.iter().any(|p| p.is_match(line))
    }

    fn push_if_complete(candidate: Candidate, out: &mut Vec<Candidate>) {
        if candidate.is_complete() {
            out.push(candidate);
        } else {
            tracing::debug!(name = %candidate.name, "dropping candidate without description");
        }
    }

    fn absorb_line(candidate: &mut Candidate, line: &str, ctx: &ExtractContext<'_>) {
        candidate.source_text.push('\n');
        candidate.source_text.push_str(line);

        if candidate.description.is_empty() && char_len(line) >= ctx.min_description_chars {
            candidate.description = line.to_string();
        }

        let fields: [(&[&str], &mut Vec<String>); 4] = [
            (AUDIENCE_CUES, &mut candidate.target_audience),
            (REQUIREMENT_CUES, &mut candidate.requirements),
            (BENEFIT_CUES, &mut candidate.benefits),
            (PROCESS_CUES, &mut candidate.process),
        ];
        for (cues, field) in fields {
            if contains_any(line, cues) {
                // Each line is split on its own; repeats across lines are kept.
                field.extend(extract_list_items(strip_label(line, cues)));
            }
        }

        if contains_any(line, DURATION_UNITS) {
            if let Some(duration) = extract_duration(line) {
                candidate.duration = Some(duration);
            }
        }
    }
}

impl ExtractionStrategy for LineScanStrategy {
    fn name(&self) -> &'static str {
        "line_scan"
    }

    fn extract(&self, text: &str, ctx: &ExtractContext<'_>) -> Vec<Candidate> {
        let mut out = Vec::new();
        let mut current: Option<Candidate> = None;
        let mut orphan_lines = 0usize;

        for line in non_empty_lines(text) {
            if Self::is_heading(line) {
                if let Some(previous) = current.take() {
                    Self::push_if_complete(previous, &mut out);
                }
                current = Some(Candidate {
                    name: line.to_string(),
                    source_text: line.to_string(),
                    ..Candidate::default()
                });
                continue;
            }

            match current.as_mut() {
                Some(candidate) => Self::absorb_line(candidate, line, ctx),
                None => orphan_lines += 1,
            }
        }

        if let Some(last) = current {
            Self::push_if_complete(last, &mut out);
        }

        if orphan_lines > 0 {
            tracing::debug!(orphan_lines, "lines before the first heading were ignored");
        }
        out
    }
}

/// Treats the whole file as one system: title from the file name, sections
/// carved by anchor keywords.
pub struct SectionStrategy;

impl SectionStrategy {
    fn title(text: &str, file_name: &str) -> String {
        let from_name = base_name(file_name).trim();
        if char_len(from_name) >= 3 {
            from_name.to_string()
        } else {
            extract_title(text)
        }
    }
}

impl ExtractionStrategy for SectionStrategy {
    fn name(&self) -> &'static str {
        "section"
    }

    fn extract(&self, text: &str, ctx: &ExtractContext<'_>) -> Vec<Candidate> {
        let text = text.trim();
        if char_len(text) <= 10 {
            return Vec::new();
        }

        let name = Self::title(text, ctx.file_name);
        let description = structured_description(text);

        let score = confidence(text, &name, &description);
        if score < CONFIDENCE_FLOOR {
            tracing::debug!(score, "discarding low-confidence document");
            return Vec::new();
        }

        let max = ctx.max_section_items;
        vec![Candidate {
            requirements: section_items(
                text,
                REQUIREMENT_ANCHORS,
                REQUIREMENT_LIST_ANCHORS,
                REQUIREMENT_LIST_STOPS,
                max,
            ),
            benefits: section_items(
                text,
                BENEFIT_ANCHORS,
                BENEFIT_LIST_ANCHORS,
                BENEFIT_LIST_STOPS,
                max,
            ),
            process: section_items(
                text,
                PROCESS_ANCHORS,
                PROCESS_LIST_ANCHORS,
                PROCESS_LIST_STOPS,
                max,
            ),
            category: first_matching_category(text, SECTION_CATEGORY_KEYWORDS),
            duration: extract_duration(text),
            target_audience: Vec::new(),
            source_text: text.to_string(),
            name,
            description,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn ctx(file_name: &str) -> ExtractContext<'_> {
        ExtractContext {
            file_name,
            min_description_chars: 20,
            max_section_items: 10,
        }
    }

    #[test]
    fn line_scan_example_document() {
        let text = "기초 교육 프로그램 안내\n이 교육은 신입사원을 대상으로 합니다\n대상: 신입사원, 경력사원\n혜택: 승진 가산점, 수당 지급";
        let found = LineScanStrategy.extract(text, &ctx("plan.xlsx"));
        assert_eq!(found.len(), 1);
        let c = &found[0];
        assert_eq!(c.name, "기초 교육 프로그램 안내");
        assert_eq!(c.description, "이 교육은 신입사원을 대상으로 합니다");
        assert!(c.target_audience.contains(&"신입사원".to_string()));
        assert!(c.target_audience.contains(&"경력사원".to_string()));
        assert_eq!(c.benefits, vec!["승진 가산점", "수당 지급"]);
        assert_eq!(c.source_text, text);
    }

    #[test]
    fn line_scan_keeps_items_repeated_on_later_lines() {
        let text = "리더 역량 강화 프로그램\n팀장급 관리자를 위한 리더십 강화 과정입니다\n혜택: 수당 지급, 수당 지급\n혜택: 수당 지급, 교육비 지원";
        let found = LineScanStrategy.extract(text, &ctx("x.xlsx"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].benefits, vec!["수당 지급", "수당 지급", "교육비 지원"]);
    }

    #[test]
    fn line_scan_splits_on_each_heading() {
        let text = "클라우드 자격증 취득 지원\n클라우드 자격증 응시료를 전액 지원하는 제도입니다\n기간: 6개월\n데이터 분석 교육 과정\n파이썬 기반 데이터 분석 실무를 익히는 과정입니다\n진행 단계: 이론, 실습, 프로젝트";
        let found = LineScanStrategy.extract(text, &ctx("x.xlsx"));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].duration.as_deref(), Some("6개월"));
        assert_eq!(found[1].name, "데이터 분석 교육 과정");
        assert!(found[1].process.contains(&"실습".to_string()));
    }

    #[test]
    fn line_scan_drops_heading_without_description() {
        let text = "스킬 업 워크숍\n짧은 줄\n리더 역량 강화 프로그램\n팀장급 관리자를 대상으로 리더십을 키우는 과정입니다";
        let found = LineScanStrategy.extract(text, &ctx("x.xlsx"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "리더 역량 강화 프로그램");
    }

    #[test]
    fn line_scan_ignores_text_without_headings() {
        let found = LineScanStrategy.extract("회의록\n참석자 명단입니다 참석자 명단입니다", &ctx("x.docx"));
        assert!(found.is_empty());
    }

    #[test]
    fn section_takes_title_from_file_name() {
        let text = "본 과정은 정보보안 전문인력을 양성하기 위한 교육입니다.\n\n과정 개요: 12주 동안 진행됩니다.\n\n혜택\n- 수료 시 인증서 발급\n- 보안 수당 지급 대상";
        let found = SectionStrategy.extract(text, &ctx("정보보안 전문가 과정.docx"));
        assert_eq!(found.len(), 1);
        let c = &found[0];
        assert_eq!(c.name, "정보보안 전문가 과정");
        assert!(c.description.starts_with("본 과정은 정보보안"));
        assert!(c.description.contains("📋 과정 개요"));
        assert_eq!(c.duration.as_deref(), Some("12주"));
        assert!(c.benefits.contains(&"수료 시 인증서 발급".to_string()));
        assert_eq!(c.category, Some(Category::Certification));
    }

    #[test]
    fn section_falls_back_to_text_title_for_short_names() {
        let text = "사내 멘토링 제도 안내. 선배 사원이 신입 사원을 지도합니다.";
        let found = SectionStrategy.extract(text, &ctx("a.docx"));
        assert_eq!(found[0].name, "사내 멘토링 제도 안내");
        assert_eq!(found[0].category, None);
    }

    #[test]
    fn section_skips_tiny_documents() {
        assert!(SectionStrategy.extract("  짧은 문서  ", &ctx("memo.docx")).is_empty());
    }

    #[test]
    fn strategy_kind_deserializes_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            strategy: StrategyKind,
        }
        let w: Wrapper = toml::from_str("strategy = \"line_scan\"").unwrap();
        assert_eq!(w.strategy, StrategyKind::LineScan);
        assert_eq!(StrategyKind::Section.build().name(), "section");
    }
}
