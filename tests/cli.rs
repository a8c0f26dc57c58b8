//! End-to-end tests driving the `edx` binary.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn edx_binary() -> std::path::PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    path.pop();
    path.push("edx");
    path
}

fn minimal_docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
        zip.start_file(
            "word/document.xml",
            zip::write::SimpleFileOptions::default(),
        )
        .unwrap();
        let xml = format!(
            "<?xml version=\"1.0\"?><w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}</w:body></w:document>",
            body
        );
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    buf
}

fn sample_docx() -> Vec<u8> {
    minimal_docx_with_paragraphs(&[
        "신입사원 교육 프로그램",
        "입사 후 첫 3개월 동안 진행되는 온보딩 교육입니다",
        "대상: 신입사원",
    ])
}

fn setup_env(config: &str) -> (TempDir, std::path::PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    fs::create_dir_all(root.join("config")).unwrap();
    fs::create_dir_all(root.join("uploads")).unwrap();
    let config_path = root.join("config").join("edx.toml");
    fs::write(&config_path, config).unwrap();
    (tmp, config_path)
}

fn run_edx(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(edx_binary())
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run edx: {}", e));
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn analyze_prints_text_report() {
    let (tmp, config_path) = setup_env("");
    let file = tmp.path().join("uploads").join("onboarding.docx");
    fs::write(&file, sample_docx()).unwrap();

    let (stdout, stderr, success) = run_edx(&config_path, &["analyze", file.to_str().unwrap()]);
    assert!(success, "analyze failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("systems: 1"), "{}", stdout);
    assert!(stdout.contains("신입사원 교육 프로그램"), "{}", stdout);
    assert!(stdout.contains("duration: 3개월"), "{}", stdout);
}

#[test]
fn analyze_json_is_parseable() {
    let (tmp, config_path) = setup_env("");
    let file = tmp.path().join("uploads").join("onboarding.docx");
    fs::write(&file, sample_docx()).unwrap();

    let (stdout, _, success) =
        run_edx(&config_path, &["analyze", file.to_str().unwrap(), "--json"]);
    assert!(success);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["extractedSystems"][0]["category"], "training");
    assert_eq!(json["extractedSystems"][0]["targetAudience"][0], "신입사원");
}

#[test]
fn analyze_drafts_are_active() {
    let (tmp, config_path) = setup_env("");
    let file = tmp.path().join("uploads").join("onboarding.docx");
    fs::write(&file, sample_docx()).unwrap();

    let (stdout, _, success) = run_edx(
        &config_path,
        &["analyze", file.to_str().unwrap(), "--json", "--drafts"],
    );
    assert!(success);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json[0]["isActive"], true);
    assert!(json[0].get("confidence").is_none());
}

#[test]
fn analyze_rejects_unsupported_format() {
    let (tmp, config_path) = setup_env("");
    let file = tmp.path().join("uploads").join("scan.pdf");
    fs::write(&file, b"%PDF-1.4").unwrap();

    let (_, stderr, success) = run_edx(&config_path, &["analyze", file.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("unsupported file format"), "{}", stderr);
}

#[test]
fn section_strategy_from_config() {
    let (tmp, config_path) = setup_env("[extraction]\nstrategy = \"section\"\n");
    let file = tmp.path().join("uploads").join("멘토링 제도.docx");
    fs::write(
        &file,
        minimal_docx_with_paragraphs(&["선배 사원이 신입 사원을 6개월간 지도하는 사내 제도입니다."]),
    )
    .unwrap();

    let (stdout, stderr, success) =
        run_edx(&config_path, &["analyze", file.to_str().unwrap(), "--json"]);
    assert!(success, "stderr={}", stderr);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["extractedSystems"][0]["name"], "멘토링 제도");
}

#[test]
fn parse_markdown_title() {
    let (tmp, config_path) = setup_env("");
    let file = tmp.path().join("uploads").join("guide.md");
    fs::write(&file, "# My Title\nSome body text\n").unwrap();

    let (stdout, _, success) = run_edx(&config_path, &["parse", file.to_str().unwrap(), "--json"]);
    assert!(success);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["title"], "My Title");
    assert_eq!(json["content"], "# My Title\nSome body text");
}

#[test]
fn scan_reports_failures_without_aborting() {
    let (tmp, config_path) = setup_env("");
    let uploads = tmp.path().join("uploads");
    fs::write(uploads.join("a_plan.docx"), sample_docx()).unwrap();
    fs::write(uploads.join("b_broken.docx"), b"not a zip").unwrap();
    fs::write(uploads.join("c_deck.pptx"), b"not a zip either").unwrap();
    fs::write(uploads.join("notes.txt"), "ignored").unwrap();

    let (stdout, stderr, success) =
        run_edx(&config_path, &["scan", "--root", uploads.to_str().unwrap()]);
    assert!(success, "scan failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("files analyzed: 2"), "{}", stdout);
    assert!(stdout.contains("files failed: 1"), "{}", stdout);
    assert!(stdout.contains("systems extracted: 1"), "{}", stdout);
    assert!(!stdout.contains("notes.txt"));
}

#[test]
fn invalid_config_is_reported() {
    let (tmp, config_path) = setup_env("[limits]\nxlsx_max_sheets = 0\n");
    let file = tmp.path().join("uploads").join("onboarding.docx");
    fs::write(&file, sample_docx()).unwrap();

    let (_, stderr, success) = run_edx(&config_path, &["analyze", file.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("xlsx_max_sheets"), "{}", stderr);
}
