//! End-to-end tests for the `topicwise` binary.
//!
//! Each test runs the real executable against a temporary home directory
//! and a file-backed history, so nothing outside the temp dir is touched.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

// ── Harness ──────────────────────────────────────────────────────────────

struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        let history = dir.path().join("history.jsonl");
        std::fs::write(
            &config,
            format!(
                "[history]\nbackend = \"file\"\npath = \"{}\"\n\n[allocation]\nmin_items = 3\nmax_items = 6\n",
                history.display()
            ),
        )
        .unwrap();
        Self { dir, config }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_topicwise"))
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .env("HOME", self.dir.path())
            .env("RUST_LOG", "warn")
            .env_remove("TOPICWISE_HISTORY_BACKEND")
            .env_remove("TOPICWISE_HISTORY_PATH")
            .output()
            .unwrap()
    }

    fn ok(&self, args: &[&str]) -> String {
        let out = self.run(args);
        assert!(
            out.status.success(),
            "topicwise {args:?} failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        String::from_utf8(out.stdout).unwrap()
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        serde_json::from_str(&self.ok(args)).unwrap()
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ── Commands ─────────────────────────────────────────────────────────────

#[test]
fn sample_marks_oversized_documents() {
    let ws = Workspace::new();
    let doc = ws.file("doc.txt", &"abcdefghij".repeat(200));

    let out = ws.ok(&["sample", arg(&doc), "--max-chars", "300"]);
    assert!(out.starts_with("[...START OF DOCUMENT...]"));
    assert!(out.contains("[...END OF DOCUMENT...]"));

    let small = ws.file("small.txt", "short text");
    assert_eq!(ws.ok(&["sample", arg(&small)]), "short text");
}

#[test]
fn recorded_session_shifts_the_next_plan() {
    let ws = Workspace::new();
    let topics = ws.file("topics.txt", "A\nB\nC\n");
    let items = ws.file("items.txt", "A\nA\nA\n");

    let first = ws.json(&["plan", "--scope", "deck", "--topics", arg(&topics), "--json"]);
    assert_eq!(first["total"], 3);
    assert_eq!(first["uncovered"].as_array().unwrap().len(), 3);

    let out = ws.ok(&["record", "--scope", "deck", "--items", arg(&items), "--session", "s1"]);
    assert!(out.contains("Recorded 3 items"));

    let second = ws.json(&["plan", "--scope", "deck", "--topics", arg(&topics), "--json"]);
    assert_eq!(second["history"]["A"], 3);
    assert_eq!(second["uncovered"], serde_json::json!(["B", "C"]));
    assert_eq!(second["quotas"][0]["topic"], "B");

    let block = ws.ok(&["plan", "--scope", "deck", "--topics", arg(&topics)]);
    assert!(block.contains("• A: 1 item"));
}

#[test]
fn coverage_report_as_json() {
    let ws = Workspace::new();
    let source = ws.file("source.txt", "Hepatite B\nTireoidite\nEsôfago de Barrett\n");
    let generated = ws.file("generated.txt", "hepatite\nesofago\n");

    let report = ws.json(&[
        "coverage",
        "--source",
        arg(&source),
        "--generated",
        arg(&generated),
        "--json",
    ]);
    assert_eq!(report["uncovered"], serde_json::json!(["Tireoidite"]));
    let ratio = report["coverage_ratio"].as_f64().unwrap();
    assert!((ratio - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(report["sessions_to_full_coverage"], 1);
}

#[test]
fn history_counts_and_clears() {
    let ws = Workspace::new();
    let items = ws.file("items.txt", "A\nB\n");
    ws.ok(&["record", "--scope", "deck", "--items", arg(&items)]);

    assert!(ws.ok(&["history", "--scope", "deck"]).contains("2 records"));
    assert!(ws.ok(&["history", "--scope", "deck", "--clear"]).contains("Removed 2"));
    assert!(ws.ok(&["history", "--scope", "deck"]).contains("0 records"));
}

#[test]
fn empty_topic_file_fails() {
    let ws = Workspace::new();
    let topics = ws.file("topics.txt", "\n\n");
    let out = ws.run(&["plan", "--scope", "deck", "--topics", arg(&topics)]);
    assert!(!out.status.success());
}

#[test]
fn init_writes_default_config() {
    let ws = Workspace::new();
    let target = ws.dir.path().join("fresh").join("config.toml");

    let out = Command::new(env!("CARGO_BIN_EXE_topicwise"))
        .args(["--config", arg(&target), "init"])
        .env("HOME", ws.dir.path())
        .output()
        .unwrap();
    assert!(out.status.success());

    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.contains("max_chars = 120000"));
}
