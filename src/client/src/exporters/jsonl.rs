use aiwatch_common::types::event::AuditEvent;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Append-only JSONL sink.
///
/// Each call appends exactly one newline-terminated record under a handle
/// scoped to the call, so the handle is released on every exit path and a
/// crash mid-write can only truncate the final line, never rewrite earlier
/// records. Readers must tolerate a partial trailing line.
pub struct JsonlWriter {
    path: PathBuf,
}

impl JsonlWriter {
    /// Creates the sink's parent directory and probes append access.
    /// Failure here is the one terminal error in the agent: with no
    /// writable sink there is nothing to detect into.
    pub fn try_new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating log directory {}", parent.display()))?;
        }
        open_for_append(&path)?;
        info!("Audit events will be appended to {}", path.display());
        Ok(Self { path })
    }

    pub async fn append_event(&self, event: &AuditEvent) -> Result<()> {
        let line = serde_json::to_string(event).context("serializing audit event")?;
        let mut file = open_for_append(&self.path)?;
        file.write_all(line.as_bytes())
            .and_then(|_| file.write_all(b"\n"))
            .with_context(|| format!("appending audit event to {}", self.path.display()))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn open_for_append(path: &Path) -> Result<fs::File> {
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("opening log sink {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiwatch_common::matcher::MatchResult;
    use aiwatch_common::signatures::Risk;
    use chrono::Utc;

    fn sample_event(pid: u32) -> AuditEvent {
        let match_result = MatchResult {
            pid,
            start_time: 1_700_000_000,
            rule_id: "openai_api_call".to_string(),
            category: "remote_llm".to_string(),
            risk: Risk::High,
            matched_fragment: "api.openai.com".to_string(),
            process_name: "curl".to_string(),
            user: "alice".to_string(),
        };
        AuditEvent::from_match(&match_result, "workstation-7", Utc::now())
    }

    #[tokio::test]
    async fn test_every_line_is_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let writer = JsonlWriter::try_new(dir.path().join("events.jsonl")).unwrap();

        for pid in 0..5 {
            writer.append_event(&sample_event(pid)).await.unwrap();
        }

        let contents = fs::read_to_string(writer.path()).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 5);
        for line in lines {
            let event: AuditEvent = serde_json::from_str(line).unwrap();
            assert_eq!(event.rule_id, "openai_api_call");
        }
    }

    #[tokio::test]
    async fn test_appends_rather_than_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        let writer = JsonlWriter::try_new(path.clone()).unwrap();
        writer.append_event(&sample_event(1)).await.unwrap();

        // a second writer instance over the same path keeps prior records
        let writer = JsonlWriter::try_new(path.clone()).unwrap();
        writer.append_event(&sample_event(2)).await.unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deeply/nested/logs/events.jsonl");
        let writer = JsonlWriter::try_new(nested.clone());
        assert!(writer.is_ok());
        assert!(nested.exists());
    }

    #[test]
    fn test_unwritable_sink_is_a_startup_error() {
        let result = JsonlWriter::try_new(PathBuf::from("/proc/aiwatch/events.jsonl"));
        assert!(result.is_err());
    }
}
