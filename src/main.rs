#![forbid(unsafe_code)]
//! # Bilingual Analysis CLI
//!
//! Command-line front end for the `bilingual_analysis` crate. It runs the
//! mixed Thai/English frequency analysis over plain-text corpora or over a
//! prepared JSON request, without writing Rust code.
//!
//! ## Features
//! - Analyze a single `.txt` file or every `.txt` file under a directory.
//! - Feed a ready-made JSON request (`{"items": [...], "top_k": 50}`).
//! - Export results as plain text, CSV or JSON, to stdout or a file.
//!
//! ## Example
//! ```bash
//! cargo run --release -- path/to/corpus --top-k 20 --export-format json
//! ```
//!
//! See `--help` for all available options.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::error;
use rayon::prelude::*;

use bilingual_analysis::export::{ExportFormat, render, save_report};
use bilingual_analysis::{
    AnalysisReport, AnalysisRequest, ContentItem, DEFAULT_TOP_K, analyze, analyze_items,
    collect_files,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Text file, directory of .txt files, or .json request to analyze
    path: String,

    /// Entries kept per ranked table (values below 1 are clamped to 1;
    /// overrides the request file's top_k when given)
    #[arg(long)]
    top_k: Option<i64>,

    /// Output format for export (txt, csv, json)
    #[arg(long, default_value = "txt")]
    export_format: ExportFormat,

    /// Write the report into this directory instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let path = Path::new(&cli.path);

    let is_request = path.extension().map(|e| e == "json").unwrap_or(false);
    let (report, failed_files) = if is_request {
        match analyze_request_file(path, cli.top_k) {
            Ok(report) => (report, Vec::new()),
            Err(e) => {
                error!("Error: {e}");
                process::exit(1);
            }
        }
    } else {
        match analyze_corpus(path, cli.top_k.unwrap_or(DEFAULT_TOP_K)) {
            Ok(pair) => pair,
            Err(e) => {
                error!("Error: {e}");
                process::exit(1);
            }
        }
    };

    match cli.out {
        Some(dir) => match save_report(&report, cli.export_format, dir) {
            Ok(written) => println!("{}", written.display()),
            Err(e) => {
                error!("Error writing report: {e}");
                process::exit(1);
            }
        },
        None => match render(&report, cli.export_format) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                error!("Error: {e}");
                process::exit(1);
            }
        },
    }

    if !failed_files.is_empty() {
        print_failed_files(&failed_files);
        process::exit(1);
    }
}

/// Parses a JSON request file and analyzes it. A `--top-k` flag takes
/// precedence over the value inside the file.
fn analyze_request_file(path: &Path, top_k: Option<i64>) -> Result<AnalysisReport, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Read {} failed: {e}", path.display()))?;
    let mut req: AnalysisRequest =
        serde_json::from_str(&raw).map_err(|e| format!("Parse {} failed: {e}", path.display()))?;
    if let Some(k) = top_k {
        req.top_k = k;
    }
    Ok(analyze(&req))
}

/// Collects the `.txt` files under `path`, reads them in parallel and
/// analyzes them as one batch. Unreadable files are reported, not fatal.
fn analyze_corpus(path: &Path, top_k: i64) -> Result<(AnalysisReport, Vec<String>), String> {
    let files = collect_files(path);
    if files.is_empty() {
        return Err(format!("No .txt files found under {}", path.display()));
    }

    let loaded: Vec<(PathBuf, Result<String, String>)> = files
        .par_iter()
        .map(|p| {
            let read = fs::read_to_string(p).map_err(|e| format!("{}: {e}", p.display()));
            (p.clone(), read)
        })
        .collect();

    let mut items = Vec::new();
    let mut failed_files = Vec::new();
    for (file, read) in loaded {
        match read {
            Ok(text) => items.push(ContentItem {
                kind: file
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                text,
            }),
            Err(e) => failed_files.push(e),
        }
    }
    Ok((analyze_items(&items, top_k), failed_files))
}

fn print_failed_files(failed: &[String]) {
    for f in failed {
        error!("Failed to read: {f}");
    }
}
