use aiwatch_client::config_manager::Config;
use aiwatch_client::exporters::{JsonlWriter, LogWriterEnum};
use aiwatch_client::WatchdogClient;
use aiwatch_common::types::event::AuditEvent;
use aiwatch_common::types::snapshot::ProcessSnapshotEntry;
use chrono::{Duration, Utc};
use std::path::Path;

fn read_events(path: &Path) -> Vec<AuditEvent> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|line| serde_json::from_str(line).expect("every log line must parse as an event"))
        .collect()
}

/// End-to-end: an external catalog rule matches a curl invocation naming
/// the provider host, the event round-trips through the JSONL sink, and
/// the same live process never produces a second event.
#[tokio::test]
async fn external_catalog_scan_dedup_roundtrip() {
    let dir = tempfile::tempdir().unwrap();

    let catalog_path = dir.path().join("extra.signatures.yml");
    std::fs::write(
        &catalog_path,
        r#"
signatures:
  - id: cloud-ai-api
    description: command line names a cloud AI API host
    category: cloud-ai-api
    risk: high
    condition:
      command_contains: api.openai.com
"#,
    )
    .unwrap();

    let log_file = dir.path().join("events.jsonl");
    let config = Config {
        scan_interval_secs: 1,
        log_file: log_file.clone(),
        signatures_file: Some(catalog_path),
        realert_window_secs: None,
    };
    let writer = LogWriterEnum::Jsonl(JsonlWriter::try_new(log_file.clone()).unwrap());
    let mut client = WatchdogClient::new(config, writer);

    let mut entry = ProcessSnapshotEntry::from_name_and_args(
        4321,
        "curl",
        &["curl", "https://api.openai.com/v1/chat"],
    );
    entry.start_time = 1_700_000_000;

    let now = Utc::now();
    let first_tick = client
        .process_snapshot(std::slice::from_ref(&entry), now)
        .await
        .unwrap();
    let second_tick = client
        .process_snapshot(std::slice::from_ref(&entry), now + Duration::seconds(10))
        .await
        .unwrap();

    // the embedded openai_api_call rule and the external cloud-ai-api rule
    // both fire on the first tick; neither fires again while the process
    // lives
    assert_eq!(first_tick, 2);
    assert_eq!(second_tick, 0);

    let events = read_events(&log_file);
    assert_eq!(events.len(), 2);
    assert!(events.iter().any(|event| event.rule_id == "cloud-ai-api"));
    for event in &events {
        assert_eq!(event.pid, 4321);
        assert!(event.matched_fragment.len() <= 200);
        assert!(!event.category.is_empty());
    }
}

/// A real host snapshot drives a full tick without error, whatever the
/// host happens to be running.
#[tokio::test]
async fn real_snapshot_tick_completes() {
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("events.jsonl");
    let config = Config {
        scan_interval_secs: 1,
        log_file: log_file.clone(),
        signatures_file: None,
        realert_window_secs: None,
    };
    let writer = LogWriterEnum::Jsonl(JsonlWriter::try_new(log_file.clone()).unwrap());
    let mut client = WatchdogClient::new(config, writer);

    client.run_scan_tick().await.unwrap();

    for event in read_events(&log_file) {
        assert!(!event.rule_id.is_empty());
        assert!(event.matched_fragment.len() <= 200);
    }
}
