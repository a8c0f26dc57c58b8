//! Scoring, classification and reporting for extracted candidates.

use crate::lexicon::{
    CATEGORY_KEYWORDS, CONFIDENCE_KEYWORDS, DEFAULT_BENEFITS, DEFAULT_COLOR, DEFAULT_DURATION,
    DEFAULT_ICON, DEFAULT_PROCESS, DEFAULT_REQUIREMENTS, DEFAULT_TARGET_AUDIENCE, ICON_TABLE,
};
use crate::models::{Candidate, Category, ExtractedEducationSystem};
use crate::sections::{char_len, contains_ignore_case};

/// Lowest score a candidate can receive.
pub const CONFIDENCE_FLOOR: f64 = 0.2;

/// Deterministic, additive quality score for one candidate.
///
/// There is deliberately no upper clamp: long keyword-rich text scores above
/// 1.0, and the high-confidence recommendation counts those as well.
pub fn confidence(text: &str, title: &str, description: &str) -> f64 {
    let mut score = 0.3;

    let len = char_len(text);
    for threshold in [50, 100, 200] {
        if len > threshold {
            score += 0.1;
        }
    }

    let title_len = char_len(title);
    if title_len > 5 && title_len < 100 {
        score += 0.1;
    }
    if char_len(description) > 20 {
        score += 0.1;
    }

    let hits = CONFIDENCE_KEYWORDS
        .iter()
        .filter(|k| contains_ignore_case(text, k))
        .count();
    score += hits as f64 * 0.03;

    score.max(CONFIDENCE_FLOOR)
}

/// Scores each category by how many of its keywords occur in `text`.
/// Ties go to the earliest category; all-zero scores yield `Training`.
pub fn classify_category(text: &str) -> Category {
    let scores: Vec<(Category, usize)> = CATEGORY_KEYWORDS
        .iter()
        .map(|(category, keywords)| {
            let score = keywords.iter().filter(|k| text.contains(*k)).count();
            (*category, score)
        })
        .collect();

    let max = scores.iter().map(|(_, s)| *s).max().unwrap_or(0);
    if max == 0 {
        return Category::Training;
    }
    scores
        .iter()
        .find(|(_, s)| *s == max)
        .map(|(c, _)| *c)
        .unwrap_or(Category::Training)
}

/// Returns the category of the first table row with any keyword present.
pub fn first_matching_category(text: &str, table: &[(Category, &[&str])]) -> Option<Category> {
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| contains_ignore_case(text, k)))
        .map(|(c, _)| *c)
}

/// Icon and color for the first table keyword found in name or description.
pub fn icon_and_color(name: &str, description: &str) -> (&'static str, &'static str) {
    ICON_TABLE
        .iter()
        .find(|(keyword, _, _)| name.contains(keyword) || description.contains(keyword))
        .map(|(_, icon, color)| (*icon, *color))
        .unwrap_or((DEFAULT_ICON, DEFAULT_COLOR))
}

fn or_default(items: Vec<String>, default: &[&str]) -> Vec<String> {
    if items.is_empty() {
        default.iter().map(|s| s.to_string()).collect()
    } else {
        items
    }
}

/// Fills defaults, icon, color, category and confidence.
pub fn complete(candidate: Candidate) -> ExtractedEducationSystem {
    let confidence = confidence(
        &candidate.source_text,
        &candidate.name,
        &candidate.description,
    );
    let category = candidate.category.unwrap_or_else(|| {
        classify_category(&format!("{} {}", candidate.name, candidate.description))
    });
    let (icon, color) = icon_and_color(&candidate.name, &candidate.description);

    ExtractedEducationSystem {
        name: candidate.name,
        description: candidate.description,
        category,
        target_audience: or_default(candidate.target_audience, DEFAULT_TARGET_AUDIENCE),
        duration: candidate
            .duration
            .unwrap_or_else(|| DEFAULT_DURATION.to_string()),
        requirements: or_default(candidate.requirements, DEFAULT_REQUIREMENTS),
        benefits: or_default(candidate.benefits, DEFAULT_BENEFITS),
        process: or_default(candidate.process, DEFAULT_PROCESS),
        icon: icon.to_string(),
        color: color.to_string(),
        confidence,
    }
}

fn distinct_categories(systems: &[ExtractedEducationSystem]) -> Vec<Category> {
    let mut categories = Vec::new();
    for system in systems {
        if !categories.contains(&system.category) {
            categories.push(system.category);
        }
    }
    categories
}

pub fn summary(systems: &[ExtractedEducationSystem]) -> String {
    if systems.is_empty() {
        return "문서에서 교육제도를 찾을 수 없습니다.".to_string();
    }
    let names: Vec<&str> = distinct_categories(systems)
        .iter()
        .map(Category::display_name)
        .collect();
    format!(
        "문서에서 총 {}개의 교육제도를 발견했습니다. {} 분야의 프로그램들이 포함되어 있습니다.",
        systems.len(),
        names.join(", ")
    )
}

pub fn recommendations(systems: &[ExtractedEducationSystem], high_confidence: f64) -> Vec<String> {
    if systems.is_empty() {
        return vec!["문서에 더 명확한 교육제도 정보를 추가해주세요.".to_string()];
    }

    let mut out = vec![format!(
        "{}개의 교육제도를 시스템에 등록하는 것을 권장합니다.",
        systems.len()
    )];

    if distinct_categories(systems).len() > 1 {
        out.push(
            "다양한 분야의 교육제도가 포함되어 있어 종합적인 교육 프로그램 구축이 가능합니다."
                .to_string(),
        );
    }

    let confident = systems
        .iter()
        .filter(|s| s.confidence > high_confidence)
        .count();
    if confident > 0 {
        out.push(format!(
            "{}개의 교육제도가 높은 신뢰도로 추출되었습니다.",
            confident
        ));
    }

    out
}

pub fn mean_confidence(systems: &[ExtractedEducationSystem]) -> f64 {
    if systems.is_empty() {
        return 0.0;
    }
    systems.iter().map(|s| s.confidence).sum::<f64>() / systems.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(category: Category, confidence: f64) -> ExtractedEducationSystem {
        let mut s = complete(Candidate {
            name: "n".to_string(),
            description: "d".to_string(),
            ..Candidate::default()
        });
        s.category = category;
        s.confidence = confidence;
        s
    }

    #[test]
    fn zero_scores_default_to_training() {
        assert_eq!(classify_category("점심 메뉴"), Category::Training);
        assert_eq!(classify_category(""), Category::Training);
    }

    #[test]
    fn highest_score_wins_and_ties_go_first() {
        assert_eq!(classify_category("자격증 인증 교육"), Category::Certification);
        // one hit each for certification and development
        assert_eq!(classify_category("자격증 성장"), Category::Certification);
        assert_eq!(classify_category("개인개발 자기계발 개발"), Category::Development);
    }

    #[test]
    fn confidence_floor_and_base() {
        assert!((confidence("", "", "") - 0.3).abs() < 1e-9);
        assert!(confidence("", "", "") >= CONFIDENCE_FLOOR);
    }

    #[test]
    fn confidence_monotonic_in_length() {
        let at = |n: usize| confidence(&"x".repeat(n), "", "");
        let samples = [10, 51, 99, 101, 150, 201, 500];
        for pair in samples.windows(2) {
            assert!(at(pair[0]) <= at(pair[1]), "{} vs {}", pair[0], pair[1]);
        }
        assert!((at(201) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn confidence_is_not_clamped_above_one() {
        let text = format!("{} {}", crate::lexicon::CONFIDENCE_KEYWORDS.join(" "), "x".repeat(200));
        let score = confidence(&text, "온라인 역량 강화 과정", &"설".repeat(30));
        // 0.3 + 0.3 + 0.1 + 0.1 + 18 * 0.03
        assert!((score - 1.34).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn icon_first_table_match_wins() {
        assert_eq!(icon_and_color("데이터 보안 과정", ""), ("📊", "bg-blue-100 text-blue-800"));
        assert_eq!(icon_and_color("과정", "보안 점검"), ("🔒", "bg-red-100 text-red-800"));
        assert_eq!(icon_and_color("과정", "설명"), (DEFAULT_ICON, DEFAULT_COLOR));
    }

    #[test]
    fn complete_applies_defaults() {
        let s = complete(Candidate {
            name: "리더십 교육 프로그램".to_string(),
            description: "팀장 대상 리더십 향상 과정입니다".to_string(),
            ..Candidate::default()
        });
        assert_eq!(s.target_audience, vec!["모든 직원"]);
        assert_eq!(s.process, vec!["이론 학습", "실습", "평가"]);
        assert_eq!(s.duration, "미정");
        assert_eq!(s.category, Category::Training);
    }

    #[test]
    fn summary_lists_distinct_categories() {
        assert_eq!(summary(&[]), "문서에서 교육제도를 찾을 수 없습니다.");
        let systems = vec![
            system(Category::Training, 0.5),
            system(Category::Certification, 0.9),
            system(Category::Training, 0.8),
        ];
        assert_eq!(
            summary(&systems),
            "문서에서 총 3개의 교육제도를 발견했습니다. 직무 교육, 자격증 취득 분야의 프로그램들이 포함되어 있습니다."
        );
    }

    #[test]
    fn recommendations_follow_thresholds() {
        let systems = vec![
            system(Category::Training, 0.7),
            system(Category::Certification, 0.71),
        ];
        let recs = recommendations(&systems, 0.7);
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[2], "1개의 교육제도가 높은 신뢰도로 추출되었습니다.");

        let single = recommendations(&[system(Category::Training, 0.5)], 0.7);
        assert_eq!(single, vec!["1개의 교육제도를 시스템에 등록하는 것을 권장합니다."]);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean_confidence(&[]), 0.0);
        let systems = vec![system(Category::Training, 0.4), system(Category::Training, 0.8)];
        assert!((mean_confidence(&systems) - 0.6).abs() < 1e-9);
    }
}
