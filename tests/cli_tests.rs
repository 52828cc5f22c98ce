use std::io::Write;

use clap::Parser;
use jump_to::cli::commands::{cmd_commands, cmd_labels, cmd_replay, cmd_run};
use jump_to::cli::config::{AppConfig, Bindings, Cli, Commands, load_config, merge_overrides};
use jump_to::commands::controller::Controller;
use jump_to::input::key::parse_keys;
use jump_to::labels::overlay::MemorySurface;
use jump_to::page::snapshot::SnapshotPage;
use jump_to::trace::logger::TraceLogger;
use jump_to::trace::trace::text_fingerprint;

use crate::common::pages::{fixture, links};

mod common;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_replay() {
    let cli = Cli::parse_from([
        "jump-to",
        "replay",
        "--page",
        "page.json",
        "--keys",
        "k aa",
        "--reposition-delay-ms",
        "80",
    ]);
    match cli.command {
        Commands::Replay {
            page,
            keys,
            reposition_delay_ms,
        } => {
            assert_eq!(page, "page.json");
            assert_eq!(keys, "k aa");
            assert_eq!(reposition_delay_ms, Some(80));
        }
        _ => panic!("Expected Replay command"),
    }
}

#[test]
fn cli_parse_run_defaults() {
    let cli = Cli::parse_from(["jump-to", "run", "--scenario", "tests/"]);
    match cli.command {
        Commands::Run {
            scenario,
            format,
            output,
        } => {
            assert_eq!(scenario, "tests/");
            assert_eq!(format, "console");
            assert!(output.is_none());
        }
        _ => panic!("Expected Run command"),
    }
    assert_eq!(cli.verbose, 0);
}

#[test]
fn cli_parse_global_flags() {
    let cli = Cli::parse_from([
        "jump-to",
        "-vv",
        "labels",
        "--count",
        "100",
        "--trace",
        "t.jsonl",
        "--config",
        "c.yaml",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.trace.as_deref(), Some("t.jsonl"));
    assert_eq!(cli.config.as_deref(), Some("c.yaml"));
    assert!(matches!(cli.command, Commands::Labels { count: 100 }));
}

#[test]
fn cli_parse_labels_default_and_commands() {
    let cli = Cli::parse_from(["jump-to", "labels"]);
    assert!(matches!(cli.command, Commands::Labels { count: 26 }));
    let cli = Cli::parse_from(["jump-to", "commands"]);
    assert!(matches!(cli.command, Commands::Commands));
}

#[test]
fn cli_rejects_missing_keys() {
    assert!(Cli::try_parse_from(["jump-to", "replay", "--page", "p.json"]).is_err());
}

// ============================================================================
// Config file
// ============================================================================

#[test]
fn config_missing_file_gives_defaults() {
    let config = load_config(Some("/nonexistent/jump-to.yaml"));
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.reposition_delay_ms, 50);
    assert_eq!(config.comment_marker, "comment");
}

#[test]
fn config_partial_yaml_keeps_other_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "bindings:\n  jump: j\n  palette: ';'\ncomment_marker: discuss").unwrap();

    let config = load_config(file.path().to_str());

    assert_eq!(config.bindings.jump, 'j');
    assert_eq!(config.bindings.palette, ';');
    assert_eq!(config.bindings.search, Bindings::default().search);
    assert_eq!(config.comment_marker, "discuss");
    assert_eq!(config.reposition_delay_ms, 50);
}

#[test]
fn config_malformed_yaml_gives_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "bindings: [not, a, map").unwrap();

    assert_eq!(load_config(file.path().to_str()), AppConfig::default());
}

#[test]
fn overrides_win_over_file() {
    let config = merge_overrides(AppConfig::default(), Some("trace.jsonl"), Some(120));
    assert_eq!(config.trace_path.as_deref(), Some("trace.jsonl"));
    assert_eq!(config.reposition_delay_ms, 120);

    let untouched = merge_overrides(AppConfig::default(), None, None);
    assert_eq!(untouched, AppConfig::default());
}

// ============================================================================
// Subcommands
// ============================================================================

#[test]
fn run_writes_junit_report() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.xml");

    let passed = cmd_run(
        fixture("scenarios").to_str().unwrap(),
        "junit",
        out.to_str(),
        &AppConfig::default(),
    )
    .unwrap();

    assert!(passed);
    let xml = std::fs::read_to_string(&out).unwrap();
    assert!(xml.contains("tests=\"3\" failures=\"0\""));
}

#[test]
fn run_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.txt");

    let passed = cmd_run(
        fixture("failing.yaml").to_str().unwrap(),
        "console",
        out.to_str(),
        &AppConfig::default(),
    )
    .unwrap();

    assert!(!passed);
    assert!(std::fs::read_to_string(&out).unwrap().contains("[FAIL] Step 1: BadgeCount"));
}

#[test]
fn replay_runs_against_fixture_page() {
    let page = fixture("edge_page.json");
    assert!(cmd_replay(page.to_str().unwrap(), "k<C-f>da", &AppConfig::default()).is_ok());
    assert!(cmd_replay(page.to_str().unwrap(), "k<Esc", &AppConfig::default()).is_err());
    assert!(cmd_replay("/nonexistent/page.json", "k", &AppConfig::default()).is_err());
}

#[test]
fn listing_commands_do_not_fail() {
    cmd_labels(700);
    cmd_commands(&AppConfig::default());
}

#[test]
fn replay_fixture_page_loads() {
    let page = SnapshotPage::from_file(&fixture("news_page.json")).unwrap();
    assert_eq!(page.snapshot().elements.len(), 385);
}

// ============================================================================
// Session trace
// ============================================================================

#[test]
fn trace_records_session_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");
    let tracer = TraceLogger::new(&path);
    assert!(tracer.is_enabled());

    let mut controller =
        Controller::new(links(3), MemorySurface::new(), &AppConfig::default()).with_tracer(tracer);
    controller.install();
    for key in parse_keys("kba").unwrap() {
        controller.handle_key(&key);
    }

    let content = std::fs::read_to_string(&path).unwrap();
    let events: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let names: Vec<&str> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["started", "key", "key", "resolved"]);

    assert_eq!(events[0]["mode"], "links");
    assert_eq!(events[0]["visible"], 3);
    assert_eq!(events[1]["buffer"], "b");
    let resolved = &events[3];
    assert_eq!(resolved["label"], "ba");
    assert_eq!(resolved["target_fingerprint"], text_fingerprint("link 1").as_str());
    assert!(!content.contains("link 1"));
}

#[test]
fn trace_logger_disabled_on_bad_path() {
    let tracer = TraceLogger::new(std::path::Path::new("/nonexistent/dir/trace.jsonl"));
    assert!(!tracer.is_enabled());
}

#[test]
fn fingerprint_is_sha1_hex() {
    assert_eq!(text_fingerprint("abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
}
