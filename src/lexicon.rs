//! Static keyword tables used by the extraction heuristics.
//!
//! All tables are ordered slices: lookups iterate front to back and the first
//! hit wins, so reordering an entry changes results.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Category;

/// Lines matching any of these start a new candidate in the line scanner.
pub static EDUCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)교육.*프로그램",
        r"(?i)자격증.*취득",
        r"(?i)전문가.*양성",
        r"(?i)교육.*과정",
        r"(?i)훈련.*프로그램",
        r"(?i)개발.*교육",
        r"(?i)스킬.*업",
        r"(?i)역량.*강화",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("education pattern is valid"))
    .collect()
});

/// `<number><unit>` durations such as `3개월`, `12 주`, `40시간`.
pub static DURATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*(개월|주|일|시간)").expect("duration pattern is valid"));

/// Markers that make a line worth checking for a duration.
pub const DURATION_UNITS: &[&str] = &["개월", "주", "일", "시간"];

/// Keyword-frequency table for category scoring, in tie-break order.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Certification,
        &["자격증", "인증", "certification", "license", "qualification"],
    ),
    (
        Category::Training,
        &["교육", "훈련", "training", "교육과정", "교육프로그램"],
    ),
    (
        Category::Development,
        &["개발", "성장", "development", "개인개발", "자기계발"],
    ),
    (
        Category::Specialization,
        &["전문", "특화", "specialization", "전문가", "전문분야"],
    ),
];

/// First-match category table used for whole-document extraction.
pub const SECTION_CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Certification, &["자격증", "인증", "수료증", "자격", "면허"]),
    (Category::Training, &["직무교육", "직무훈련", "직무개발", "직무역량"]),
    (Category::Development, &["개인개발", "자기계발", "역량개발", "스킬업"]),
    (Category::Specialization, &["전문교육", "전문과정", "전문자격", "전문인력"]),
];

/// Keyword → (icon, color classes).
pub const ICON_TABLE: &[(&str, &str, &str)] = &[
    ("클라우드", "☁️", "bg-orange-100 text-orange-800"),
    ("데이터", "📊", "bg-blue-100 text-blue-800"),
    ("AI", "🤖", "bg-purple-100 text-purple-800"),
    ("보안", "🔒", "bg-red-100 text-red-800"),
    ("네트워크", "🌐", "bg-green-100 text-green-800"),
    ("개발", "💻", "bg-indigo-100 text-indigo-800"),
    ("디자인", "🎨", "bg-pink-100 text-pink-800"),
    ("마케팅", "📱", "bg-yellow-100 text-yellow-800"),
    ("관리", "📋", "bg-gray-100 text-gray-800"),
    ("분석", "📈", "bg-teal-100 text-teal-800"),
];

pub const DEFAULT_ICON: &str = "📚";
pub const DEFAULT_COLOR: &str = "bg-gray-100 text-gray-800";

/// Each present keyword adds a fixed bonus to a candidate's confidence.
pub const CONFIDENCE_KEYWORDS: &[&str] = &[
    "교육", "자격", "과정", "프로그램", "훈련", "개발", "학습", "연수", "시스템", "제도", "인증",
    "수료", "직무", "전문", "역량", "스킬", "온라인", "디지털",
];

/// Cue words for list fields in the line scanner.
pub const AUDIENCE_CUES: &[&str] = &["대상", "참가자", "수강생"];
pub const REQUIREMENT_CUES: &[&str] = &["요구사항", "필수", "선수"];
pub const BENEFIT_CUES: &[&str] = &["혜택", "장점", "효과"];
pub const PROCESS_CUES: &[&str] = &["과정", "단계", "절차"];

/// Anchor keywords for section carving in whole-document extraction.
pub const REQUIREMENT_ANCHORS: &[&str] = &[
    "요구사항", "필수조건", "자격요건", "지원자격", "참가조건", "필요조건", "선수과목",
];
pub const BENEFIT_ANCHORS: &[&str] = &[
    "혜택", "장점", "효과", "기대효과", "성과", "효익", "이점",
];
pub const PROCESS_ANCHORS: &[&str] = &[
    "과정", "절차", "단계", "진행방법", "교육과정", "프로그램", "커리큘럼", "일정",
];

/// Anchors that open a bulleted block, and the keywords that close it.
pub const REQUIREMENT_LIST_ANCHORS: &[&str] = &["요구사항", "필수조건", "자격요건"];
pub const REQUIREMENT_LIST_STOPS: &[&str] = &["혜택", "과정", "교육", "프로그램"];
pub const BENEFIT_LIST_ANCHORS: &[&str] = &["혜택", "장점", "효과", "기대효과"];
pub const BENEFIT_LIST_STOPS: &[&str] = &["과정", "교육", "프로그램", "요구사항"];
pub const PROCESS_LIST_ANCHORS: &[&str] = &["과정", "절차", "단계", "진행방법", "교육과정"];
pub const PROCESS_LIST_STOPS: &[&str] = &["혜택", "요구사항", "교육", "프로그램"];

/// Paragraphs containing one of these are rendered as overview sections.
pub const OVERVIEW_HEADERS: &[&str] = &["개요", "목적", "소개", "설명", "개념", "정의"];

pub const DEFAULT_TARGET_AUDIENCE: &[&str] = &["모든 직원"];
pub const DEFAULT_REQUIREMENTS: &[&str] = &["기본적인 업무 지식"];
pub const DEFAULT_BENEFITS: &[&str] = &["전문성 향상", "업무 역량 강화"];
pub const DEFAULT_PROCESS: &[&str] = &["이론 학습", "실습", "평가"];
pub const DEFAULT_DURATION: &str = "미정";
