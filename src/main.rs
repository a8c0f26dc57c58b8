//! # Education Extractor CLI (`edx`)
//!
//! Extracts structured education-system candidates from uploaded documents.
//!
//! ## Usage
//!
//! ```bash
//! edx --config ./config/edx.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `edx analyze <file>` | Extract education systems from an xlsx/docx/pptx file |
//! | `edx parse <file>` | Title + body of a text, Markdown or JSON file |
//! | `edx scan` | Analyze every document under the configured upload root |
//! | `edx completions <shell>` | Print shell completions |
//!
//! Logs go to stderr and honor `RUST_LOG` (default `warn`).

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use education_extractor::analyzer::DocumentAnalyzer;
use education_extractor::config::{self, ScanConfig};
use education_extractor::file_parser;
use education_extractor::models::UploadedFile;
use education_extractor::report;
use education_extractor::scan;
use education_extractor::strategy::StrategyKind;

/// Education Extractor CLI: turns HR and education documents into
/// structured education-system records.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the file does not exist, built-in defaults are used.
#[derive(Parser)]
#[command(
    name = "edx",
    about = "Education Extractor: turns HR and education documents into structured education-system records",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/edx.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Extract education systems from a spreadsheet, Word or PowerPoint file.
    ///
    /// Prints the candidates with their category, confidence and list
    /// fields, followed by a summary and recommendations.
    Analyze {
        /// Path to an `.xlsx`, `.xls`, `.docx`, `.doc`, `.pptx` or `.ppt` file.
        file: PathBuf,

        /// Override the strategy from config: `line-scan` finds many systems
        /// per file, `section` treats the file as one system.
        #[arg(long, value_enum)]
        strategy: Option<StrategyKind>,

        /// Print the full result as JSON.
        #[arg(long)]
        json: bool,

        /// Print the create-request drafts instead of the analysis result.
        #[arg(long, requires = "json")]
        drafts: bool,
    },

    /// Parse a plain text, Markdown or JSON file into title and content.
    Parse {
        /// Path to the file.
        file: PathBuf,

        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Analyze every document under the upload root.
    ///
    /// Uses `[scan]` from the config; `--root` overrides or supplies it.
    Scan {
        /// Directory to scan.
        #[arg(long)]
        root: Option<PathBuf>,

        /// Override the strategy from config.
        #[arg(long, value_enum)]
        strategy: Option<StrategyKind>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print shell completions to stdout.
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn analyzer_for(cfg: &config::Config, strategy: Option<StrategyKind>) -> DocumentAnalyzer {
    let analyzer = DocumentAnalyzer::new(cfg);
    match strategy {
        Some(kind) => analyzer.with_strategy(kind),
        None => analyzer,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    // Commands that don't require config
    match &cli.command {
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "edx", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Parse { file, json } => {
            let upload = UploadedFile::read(file).await?;
            let parsed = file_parser::parse(&upload);
            if *json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else {
                print!("{}", report::render_parsed(&parsed));
            }
            return Ok(());
        }
        _ => {}
    }

    let cfg = config::load_config_or_default(&cli.config)?;

    match cli.command {
        Commands::Analyze {
            file,
            strategy,
            json,
            drafts,
        } => {
            let analyzer = analyzer_for(&cfg, strategy);
            let result = analyzer
                .analyze_path(&file)
                .await
                .with_context(|| format!("Failed to analyze {}", file.display()))?;
            if drafts {
                let drafts: Vec<_> = result.extracted_systems.iter().map(|s| s.to_draft()).collect();
                println!("{}", serde_json::to_string_pretty(&drafts)?);
            } else if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                print!("{}", report::render_analysis(&name, &result));
            }
        }
        Commands::Scan {
            root,
            strategy,
            json,
        } => {
            let scan_cfg = match (root, cfg.scan.clone()) {
                (Some(root), Some(mut configured)) => {
                    configured.root = root;
                    configured
                }
                (Some(root), None) => ScanConfig::with_root(root),
                (None, Some(configured)) => configured,
                (None, None) => anyhow::bail!("No scan root: pass --root or set [scan].root"),
            };
            let analyzer = analyzer_for(&cfg, strategy);
            let report = scan::scan_uploads(&analyzer, &scan_cfg).await?;
            if json {
                println!("{}", report::scan_json(&report)?);
            } else {
                println!("scan {} ({})", scan_cfg.root.display(), analyzer.strategy_name());
                print!("{}", report::render_scan(&report));
            }
        }
        Commands::Completions { .. } | Commands::Parse { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
