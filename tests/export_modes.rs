#[path = "common/mod.rs"]
mod common;

use common::*;
use logscore::{FetchError, LogExport, OutputMode};
use serde_json::Value;
use std::fs;

fn export(mode: OutputMode, out: &std::path::Path) -> LogExport {
    LogExport::new()
        .anchor_time(NOW)
        .window_minutes(15)
        .output_mode(mode)
        .output_path(out)
        .progress(false)
}

/// Aggregate mode drains every page, writes the ranked object (first write wins,
/// stable ties) and prints a 1-indexed top list plus a count confirmation.
#[test]
fn aggregate_run_writes_ranked_summary() {
    let dir = scratch_dir();
    let out = dir.join("summary.json");
    let transport = ScriptedTransport::new(vec![
        ok_page(&["[Liam Estrada](lestrada@example.com): 21", "noise", "[B](b): 3"], Some("c1")),
        ok_page(&["[C](c): 3", "[Liam Estrada](lestrada@example.com): 99"], Some("c2")),
        ok_page(&["[Zed](z): 40"], None),
    ]);

    let mut report: Vec<u8> = Vec::new();
    let summary = export(OutputMode::Aggregate, &out)
        .run_with(&transport, &test_creds(), APP_ID, &mut report)
        .unwrap();

    assert_eq!(transport.call_count(), 3);
    assert_eq!(summary.pages, 3);
    assert_eq!(summary.outcome.records, 4);
    assert_eq!(summary.outcome.output_path, out);

    let text = fs::read_to_string(&out).unwrap();
    let doc: Value = serde_json::from_str(&text).unwrap();
    let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
    // check order on the raw text too
    assert_eq!(keys.len(), 4);
    let pos = |k: &str| text.find(k).unwrap();
    assert!(pos("[Zed](z)") < pos("[Liam Estrada]"));
    assert!(pos("[Liam Estrada]") < pos("[B](b)"));
    assert!(pos("[B](b)") < pos("[C](c)"));
    assert_eq!(doc["[Liam Estrada](lestrada@example.com)"], 21);

    let report = String::from_utf8(report).unwrap();
    assert!(report.contains("Top 10:"));
    assert!(report.contains("1. [Zed](z): 40"));
    assert!(report.contains("2. [Liam Estrada](lestrada@example.com): 21"));
    assert!(report.contains("3. [B](b): 3"));
    assert!(report.contains("4. [C](c): 3"));
    assert!(report.contains("Wrote 4 ranked entries."));
}

/// The console list stops at the configured top N.
#[test]
fn aggregate_report_is_capped() {
    let dir = scratch_dir();
    let lines: Vec<String> = (1..=12).map(|i| format!("[P{i}](p{i}): {i}")).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let transport = ScriptedTransport::new(vec![ok_page(&refs, None)]);

    let mut report: Vec<u8> = Vec::new();
    export(OutputMode::Aggregate, &dir.join("s.json"))
        .run_with(&transport, &test_creds(), APP_ID, &mut report)
        .unwrap();

    let report = String::from_utf8(report).unwrap();
    assert!(report.contains("1. [P12](p12): 12"));
    assert!(report.contains("10. [P3](p3): 3"));
    assert!(!report.contains("11. "));
}

/// Raw mode writes one line per page body, in arrival order.
#[test]
fn raw_run_writes_one_line_per_page() {
    let dir = scratch_dir();
    let out = dir.join("export.log");
    let transport = ScriptedTransport::new(vec![
        ok_page(&["a"], Some("c1")),
        ok_page(&["b", "c"], Some("c2")),
        ok_page(&[], None),
    ]);

    let mut report: Vec<u8> = Vec::new();
    let summary = export(OutputMode::Raw, &out)
        .run_with(&transport, &test_creds(), APP_ID, &mut report)
        .unwrap();

    assert_eq!(summary.outcome.records, 3);
    assert!(summary.outcome.ranking.is_none());
    let pages = read_jsonl_values(&out);
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0]["cursor"], "c1");
    assert_eq!(pages[1]["appLogs"].as_array().unwrap().len(), 2);
    assert!(pages[2].get("cursor").is_none());

    let report = String::from_utf8(report).unwrap();
    assert!(report.contains("Fetching logs...\n...\nDone fetching."), "{report}");
}

/// Raw lines are the server's page bodies byte for byte: key order and
/// integers wider than 64 bits are untouched.
#[test]
fn raw_run_keeps_page_body_verbatim() {
    let dir = scratch_dir();
    let out = dir.join("export.log");
    let body = r#"{"cursor":null,"appLogs":[{"zeta":1,"alpha":2,"traceId":123456789012345678901234567890,"body":{"stringValue":"[A](a): 1"}}]}"#;
    let transport = ScriptedTransport::new(vec![Ok(logscore::HttpResponse {
        status: 200,
        status_text: "OK".into(),
        body: body.into(),
    })]);

    export(OutputMode::Raw, &out)
        .run_with(&transport, &test_creds(), APP_ID, &mut Vec::<u8>::new())
        .unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), format!("{body}\n"));
}

/// Two good pages then a non-2xx: fetching stops, raw output keeps exactly the two
/// pages already received, and the run reports failure.
#[test]
fn raw_run_keeps_pages_before_failure() {
    let dir = scratch_dir();
    let out = dir.join("export.log");
    let transport = ScriptedTransport::new(vec![
        ok_page(&["[A](a): 1"], Some("c1")),
        ok_page(&["[B](b): 2"], Some("c2")),
        status_page(500, "Internal Server Error", "boom"),
    ]);

    let mut report: Vec<u8> = Vec::new();
    let err = export(OutputMode::Raw, &out)
        .run_with(&transport, &test_creds(), APP_ID, &mut report)
        .unwrap_err();

    assert_eq!(transport.call_count(), 3);
    let fetch_err = err.downcast_ref::<FetchError>().expect("fetch error in chain");
    assert_eq!(fetch_err.status(), Some(500));
    assert!(format!("{err:#}").contains("HTTP 500 Internal Server Error: boom"));

    let pages = read_jsonl_values(&out);
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1]["cursor"], "c2");
}

/// Same failure in aggregate mode: the run fails and no summary file is written.
#[test]
fn aggregate_run_writes_nothing_on_failure() {
    let dir = scratch_dir();
    let out = dir.join("summary.json");
    let transport = ScriptedTransport::new(vec![
        ok_page(&["[A](a): 1"], Some("c1")),
        ok_page(&["[B](b): 2"], Some("c2")),
        status_page(503, "Service Unavailable", ""),
    ]);

    let mut report: Vec<u8> = Vec::new();
    let err = export(OutputMode::Aggregate, &out)
        .run_with(&transport, &test_creds(), APP_ID, &mut report)
        .unwrap_err();

    assert_eq!(err.downcast_ref::<FetchError>().and_then(FetchError::status), Some(503));
    assert!(!out.exists());
    assert!(!String::from_utf8(report).unwrap().contains("Top 10:"));
}

/// Raw mode truncates its file at start, so a previous run's lines do not survive.
#[test]
fn raw_output_is_truncated_per_run() {
    let dir = scratch_dir();
    let out = dir.join("export.log");
    fs::write(&out, "{\"stale\":true}\n{\"stale\":true}\n").unwrap();

    let transport = ScriptedTransport::new(vec![ok_page(&["x"], None)]);
    export(OutputMode::Raw, &out)
        .run_with(&transport, &test_creds(), APP_ID, &mut Vec::<u8>::new())
        .unwrap();

    let pages = read_jsonl_values(&out);
    assert_eq!(pages.len(), 1);
    assert!(pages[0].get("stale").is_none());
}

/// An unwritable raw output path fails before any request is sent.
#[test]
fn unwritable_raw_path_fails_before_fetching() {
    let dir = scratch_dir();
    let blocker = dir.join("not_a_dir");
    fs::write(&blocker, "file").unwrap();
    let out = blocker.join("export.log");

    let transport = ScriptedTransport::new(vec![]);
    let res = export(OutputMode::Raw, &out).run_with(&transport, &test_creds(), APP_ID, &mut Vec::<u8>::new());
    assert!(res.is_err());
    assert_eq!(transport.call_count(), 0);
}

/// Query options from the builder reach the wire.
#[test]
fn builder_filters_reach_request() {
    let dir = scratch_dir();
    let transport = ScriptedTransport::new(vec![ok_page(&[], None)]);
    export(OutputMode::Aggregate, &dir.join("s.json"))
        .levels(["ERROR"])
        .scope_ids(["site-1"])
        .message_filter("needle")
        .environment(logscore::Environment::Staging)
        .window_minutes(500)
        .run_with(&transport, &test_creds(), APP_ID, &mut Vec::<u8>::new())
        .unwrap();

    let call = &transport.calls()[0];
    assert_eq!(call.params("level"), vec!["ERROR"]);
    assert_eq!(call.params("installationContext"), vec!["site-1"]);
    assert_eq!(call.params("message"), vec!["needle"]);
    assert_eq!(call.params("environmentId"), vec!["d325df3a-9f3c-4dab-84f4-b981f1b90d14"]);
    assert_eq!(call.params("startDate"), vec!["2025-03-01T11:00:00.000Z"]);
}
