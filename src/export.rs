//! Report rendering and file export: plain text, CSV and JSON.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::prelude::*;
use clap::ValueEnum;

use crate::{AnalysisReport, TermStat};

/// Output format for a rendered [`AnalysisReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Txt,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Neutralizes spreadsheet formula injection: cells starting with `=`, `+`,
/// `-` or `@` get a leading single quote. Already-safe cells pass through
/// unchanged.
pub fn csv_safe_cell(cell: String) -> String {
    if cell.starts_with(['=', '+', '-', '@']) {
        format!("'{cell}")
    } else {
        cell
    }
}

/// Renders a report in the requested format.
pub fn render(report: &AnalysisReport, format: ExportFormat) -> Result<String, String> {
    match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(report).map_err(|e| format!("JSON export failed: {e}"))
        }
        ExportFormat::Txt => Ok(render_txt(report)),
        ExportFormat::Csv => render_csv(report),
    }
}

fn push_section(out: &mut String, title: &str, stats: &[TermStat]) {
    out.push_str(title);
    out.push('\n');
    if stats.is_empty() {
        out.push_str("  (none)\n");
    }
    for s in stats {
        out.push_str(&format!("  {} ({})\n", s.term, s.count));
    }
    out.push('\n');
}

fn render_txt(report: &AnalysisReport) -> String {
    let mut out = String::new();
    push_section(&mut out, "Top English terms:", &report.top_en);
    push_section(&mut out, "Top Thai terms:", &report.top_th);
    push_section(&mut out, "English phrases:", &report.en_phrases);
    push_section(&mut out, "Thai phrases:", &report.th_phrases);

    out.push_str("Bilingual patterns:\n");
    if report.bilingual_patterns.is_empty() {
        out.push_str("  (none)\n");
    }
    for p in &report.bilingual_patterns {
        out.push_str(&format!("  {} ({})\n", p.pattern, p.count));
    }
    out.push('\n');

    let m = &report.mixing;
    out.push_str(&format!(
        "Mixing: en_only={}, th_only={}, mixed={}, switches={}\n\n",
        m.en_only, m.th_only, m.mixed, m.switches
    ));

    out.push_str("Totals:\n");
    for (key, value) in &report.totals {
        out.push_str(&format!("  {key}: {value}\n"));
    }
    out
}

fn render_csv(report: &AnalysisReport) -> Result<String, String> {
    let err = |e: csv::Error| format!("CSV export failed: {e}");
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["section", "item", "count"]).map_err(err)?;

    let tables: [(&str, &[TermStat]); 4] = [
        ("top_en", &report.top_en),
        ("top_th", &report.top_th),
        ("en_phrases", &report.en_phrases),
        ("th_phrases", &report.th_phrases),
    ];
    for (section, stats) in tables {
        for s in stats {
            wtr.write_record([
                section.to_string(),
                csv_safe_cell(s.term.clone()),
                s.count.to_string(),
            ])
            .map_err(err)?;
        }
    }
    for p in &report.bilingual_patterns {
        wtr.write_record([
            "bilingual_patterns".to_string(),
            csv_safe_cell(p.pattern.clone()),
            p.count.to_string(),
        ])
        .map_err(err)?;
    }
    let m = &report.mixing;
    for (label, value) in [
        ("en_only", m.en_only),
        ("th_only", m.th_only),
        ("mixed", m.mixed),
        ("switches", m.switches),
    ] {
        wtr.write_record(["mixing".to_string(), label.to_string(), value.to_string()])
            .map_err(err)?;
    }
    for (key, value) in &report.totals {
        wtr.write_record(["totals".to_string(), key.clone(), value.to_string()])
            .map_err(err)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| format!("CSV export failed: {e}"))?;
    String::from_utf8(bytes).map_err(|e| format!("CSV export produced invalid UTF-8: {e}"))
}

/// Renders the report and writes it to `dir` under a timestamped file name.
/// Returns the full path of the written file.
pub fn save_report(
    report: &AnalysisReport,
    format: ExportFormat,
    mut dir: PathBuf,
) -> std::io::Result<PathBuf> {
    let local: DateTime<Local> = Local::now();
    let stamp = local.format("%Y_%m_%d_%H_%M_%S").to_string();
    dir.push(format!("{stamp}_bilingual_analysis.{}", format.extension()));

    let rendered = render(report, format).map_err(std::io::Error::other)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&dir)?;
    file.write_all(rendered.as_bytes())?;

    Ok(dir)
}
