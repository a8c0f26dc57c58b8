//! # Education Extractor
//!
//! Turns HR and education documents into structured "education system"
//! records for human review.
//!
//! Uploaded spreadsheets, Word documents and PowerPoint decks are converted
//! to text, segmented into candidate programs by keyword heuristics, and
//! completed with defaults, an icon, a category and a confidence score. Plain
//! text, Markdown and JSON uploads go through a simpler title/body parser.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ UploadedFile │──▶│   extract    │──▶│   strategy   │──▶│   scoring    │
//! │ xlsx/docx/pptx│  │ OOXML → text │   │ line / section│  │ defaults+score│
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                                                  ▼
//!                                                      DocumentAnalysisResult
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! edx analyze programs.xlsx                 # multi-system line scan
//! edx analyze onboarding.docx --strategy section --json
//! edx parse notes.md
//! edx scan --root ./uploads
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`analyzer`] | Analysis pipeline |
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Error taxonomy |
//! | [`extract`] | OOXML text conversion |
//! | [`file_parser`] | Text / Markdown / JSON title parsing |
//! | [`lexicon`] | Keyword tables |
//! | [`models`] | Core data types |
//! | [`report`] | CLI output rendering |
//! | [`scan`] | Upload directory batch analysis |
//! | [`scoring`] | Confidence, category, summary |
//! | [`sections`] | Text carving helpers |
//! | [`strategy`] | Extraction strategies |

pub mod analyzer;
pub mod config;
pub mod error;
pub mod extract;
pub mod file_parser;
pub mod lexicon;
pub mod models;
pub mod report;
pub mod scan;
pub mod scoring;
pub mod sections;
pub mod strategy;
