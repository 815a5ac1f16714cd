//! Integration tests for `bilingual_analysis`.
//
// This suite verifies:
// - Library behavior over full batches (classification, tokenization,
//   ranking, report shape)
// - The serialized report field names consumed by callers
// - CLI behavior: txt corpus mode, JSON request mode, export formats,
//   --top-k, --out and failure reporting
//
// Notes:
// - CLI tests run the binary with a per-process working directory; nothing
//   here changes the global CWD.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value as Json;
use tempfile::tempdir;

use bilingual_analysis::{AnalysisReport, ContentItem, analyze_items};

// --------------------- helpers ---------------------

/// Create a file with content in a temp dir.
fn write_file(dir: &assert_fs::TempDir, name: &str, content: &str) -> PathBuf {
    let f = dir.child(name);
    f.write_str(content).unwrap();
    f.path().to_path_buf()
}

/// Run CLI successfully with a specific working directory.
fn run_cli_ok_in(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("bilingual_analysis").unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().success()
}

/// Run CLI expecting failure with a specific working directory.
fn run_cli_fail_in(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("bilingual_analysis").unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().failure()
}

/// Parse the report the CLI printed to stdout as JSON.
fn report_from_stdout(assert: &assert_cmd::assert::Assert) -> Json {
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    serde_json::from_str(&stdout).expect("valid report JSON on stdout")
}

/// Find an exported file whose name ends with a given suffix.
fn find_output_with_suffix(dir: &Path, suffix: &str) -> PathBuf {
    for entry in fs::read_dir(dir).unwrap().filter_map(|e| e.ok()) {
        let p = entry.path();
        if let Some(name) = p.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(suffix) {
                return p;
            }
        }
    }
    panic!("No export found ending with {}", suffix);
}

// --------------------- library tests ---------------------

#[test]
fn lib_full_batch_classification_and_ranking() {
    let items = vec![
        ContentItem {
            kind: "post".into(),
            text: "Hello world. Hello again!\nสวัสดีครับ ขอบคุณครับ".into(),
        },
        ContentItem {
            kind: "chat".into(),
            text: "ราคา iphone เท่าไหร่".into(),
        },
    ];
    let report = analyze_items(&items, 50);

    // two English sentences, one Thai, one mixed
    assert_eq!(report.mixing.en_only, 2);
    assert_eq!(report.mixing.th_only, 1);
    assert_eq!(report.mixing.mixed, 1);

    // "hello" leads the English table with count 2
    assert_eq!(report.top_en[0].term, "hello");
    assert_eq!(report.top_en[0].count, 2);

    // the spaced Thai sentence split into two words and one bigram
    assert!(report.top_th.iter().any(|s| s.term == "สวัสดีครับ"));
    assert!(
        report
            .th_phrases
            .iter()
            .any(|s| s.term == "สวัสดีครับ ขอบคุณครับ")
    );

    // the mixed sentence contributes both directional pattern labels
    let patterns: Vec<&str> = report
        .bilingual_patterns
        .iter()
        .map(|p| p.pattern.as_str())
        .collect();
    assert_eq!(patterns, vec!["TH→EN", "EN→TH"]);
}

#[test]
fn lib_report_serializes_with_wire_field_names() {
    let items = vec![ContentItem { kind: "msg".into(), text: "Hello สวัสดี".into() }];
    let report = analyze_items(&items, 10);
    let v: Json = serde_json::to_value(&report).unwrap();
    let obj = v.as_object().unwrap();

    for key in [
        "top_en",
        "top_th",
        "en_phrases",
        "th_phrases",
        "bilingual_patterns",
        "mixing",
        "totals",
    ] {
        assert!(obj.contains_key(key), "report is missing key {key:?}");
    }
    let mixing = obj["mixing"].as_object().unwrap();
    for key in ["en_only", "th_only", "mixed", "switches"] {
        assert!(mixing.contains_key(key), "mixing is missing key {key:?}");
    }
    let first = v["top_en"][0].as_object().unwrap();
    assert!(first.contains_key("term"));
    assert!(first.contains_key("count"));
    let totals = obj["totals"].as_object().unwrap();
    for key in [
        "total_tokens_en",
        "total_tokens_th",
        "sum_top_en",
        "sum_top_th",
        "sentences_en",
        "sentences_th",
        "sentences_mixed",
    ] {
        assert!(totals.contains_key(key), "totals is missing key {key:?}");
    }
}

#[test]
fn lib_request_json_deserializes_and_round_trips() {
    let raw = r#"{
        "items": [
            {"kind": "msg", "text": "Hello! ราคาเท่าไหร่ครับ"}
        ],
        "top_k": 5
    }"#;
    let req: bilingual_analysis::AnalysisRequest = serde_json::from_str(raw).unwrap();
    let report = bilingual_analysis::analyze(&req);
    assert_eq!(report.mixing.en_only, 1);
    assert_eq!(report.mixing.th_only, 1);

    // report survives a JSON round trip unchanged
    let json = serde_json::to_string(&report).unwrap();
    let back: AnalysisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

// --------------------- CLI tests ---------------------

#[test]
fn cli_txt_corpus_json_export() {
    let td = assert_fs::TempDir::new().unwrap();
    let _a = write_file(&td, "a.txt", "Hello world. Hello again.");
    let _b = write_file(&td, "b.txt", "สวัสดีครับ ขอบคุณครับ");

    let assert = run_cli_ok_in(td.path(), &[".", "--export-format", "json"]);
    let report = report_from_stdout(&assert);

    assert_eq!(report["top_en"][0]["term"], "hello");
    assert_eq!(report["top_en"][0]["count"], 2);
    assert_eq!(report["mixing"]["en_only"], 2);
    assert_eq!(report["mixing"]["th_only"], 1);
    assert_eq!(report["totals"]["sentences_en"], 2);
}

#[test]
fn cli_single_file_and_top_k_flag() {
    let td = assert_fs::TempDir::new().unwrap();
    let f = write_file(&td, "words.txt", "alpha bravo charlie. alpha bravo. alpha");

    let assert = run_cli_ok_in(
        td.path(),
        &[
            f.to_str().unwrap(),
            "--top-k",
            "2",
            "--export-format",
            "json",
        ],
    );
    let report = report_from_stdout(&assert);

    let top_en = report["top_en"].as_array().unwrap();
    assert_eq!(top_en.len(), 2);
    assert_eq!(top_en[0]["term"], "alpha");
    assert_eq!(top_en[0]["count"], 3);
    assert_eq!(top_en[1]["term"], "bravo");
    // raw totals ignore the truncation
    assert_eq!(report["totals"]["total_tokens_en"], 6);
    assert_eq!(report["totals"]["sum_top_en"], 5);
}

#[test]
fn cli_request_file_mode() {
    let td = assert_fs::TempDir::new().unwrap();
    let req = write_file(
        &td,
        "request.json",
        r#"{"items":[{"kind":"chat","text":"ราคา iphone เท่าไหร่"}]}"#,
    );

    let assert = run_cli_ok_in(
        td.path(),
        &[req.to_str().unwrap(), "--export-format", "json"],
    );
    let report = report_from_stdout(&assert);

    assert_eq!(report["mixing"]["mixed"], 1);
    assert_eq!(report["mixing"]["switches"], 2);
    let patterns = report["bilingual_patterns"].as_array().unwrap();
    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns[0]["pattern"], "TH→EN");
    assert_eq!(patterns[1]["pattern"], "EN→TH");
}

#[test]
fn cli_request_file_top_k_flag_wins() {
    let td = assert_fs::TempDir::new().unwrap();
    let req = write_file(
        &td,
        "request.json",
        r#"{"items":[{"kind":"t","text":"alpha bravo charlie delta"}],"top_k":50}"#,
    );

    let assert = run_cli_ok_in(
        td.path(),
        &[
            req.to_str().unwrap(),
            "--top-k",
            "1",
            "--export-format",
            "json",
        ],
    );
    let report = report_from_stdout(&assert);
    assert_eq!(report["top_en"].as_array().unwrap().len(), 1);
}

#[test]
fn cli_txt_output_has_all_sections() {
    let td = assert_fs::TempDir::new().unwrap();
    let _f = write_file(&td, "a.txt", "Hello world. สวัสดี iphone");

    run_cli_ok_in(td.path(), &["."])
        .stdout(predicate::str::contains("Top English terms:"))
        .stdout(predicate::str::contains("Top Thai terms:"))
        .stdout(predicate::str::contains("Bilingual patterns:"))
        .stdout(predicate::str::contains("Mixing:"))
        .stdout(predicate::str::contains("Totals:"))
        .stdout(predicate::str::contains("hello (1)"));
}

#[test]
fn cli_csv_export_to_stdout() {
    let td = assert_fs::TempDir::new().unwrap();
    let _f = write_file(&td, "a.txt", "Hello world");

    run_cli_ok_in(td.path(), &[".", "--export-format", "csv"])
        .stdout(predicate::str::starts_with("section,item,count"))
        .stdout(predicate::str::contains("top_en,hello,1"))
        .stdout(predicate::str::contains("totals,total_tokens_en,2"));
}

#[test]
fn cli_out_writes_timestamped_file() {
    let td = assert_fs::TempDir::new().unwrap();
    let _f = write_file(&td, "a.txt", "Hello world. สวัสดีครับผม");
    let out = tempdir().unwrap();

    let assert = run_cli_ok_in(
        td.path(),
        &[
            ".",
            "--export-format",
            "json",
            "--out",
            out.path().to_str().unwrap(),
        ],
    );
    // the CLI prints the written path
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.trim().ends_with("_bilingual_analysis.json"));

    let written = find_output_with_suffix(out.path(), "_bilingual_analysis.json");
    let report: Json = serde_json::from_str(&fs::read_to_string(written).unwrap()).unwrap();
    assert_eq!(report["mixing"]["en_only"], 1);
    assert_eq!(report["mixing"]["th_only"], 1);
}

#[test]
fn cli_fails_on_empty_corpus() {
    let td = assert_fs::TempDir::new().unwrap();
    run_cli_fail_in(td.path(), &["."]);
}

#[test]
fn cli_fails_on_malformed_request() {
    let td = assert_fs::TempDir::new().unwrap();
    let req = write_file(&td, "request.json", "{not json");
    run_cli_fail_in(td.path(), &[req.to_str().unwrap()]);
}
