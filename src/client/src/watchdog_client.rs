use crate::config_manager::Config;
use crate::exporters::{EventWriter, LogWriterEnum};
use crate::tracker::{DedupKey, DedupTracker};
use aiwatch_common::matcher;
use aiwatch_common::signatures::SignatureCatalog;
use aiwatch_common::types::event::AuditEvent;
use aiwatch_common::types::snapshot::ProcessSnapshotEntry;
use aiwatch_extracts::SnapshotProvider;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use sysinfo::System;
use tracing::{debug, info, warn};

/// Owns everything one scan tick needs: the snapshot provider, the loaded
/// signature catalog, the dedup tracker and the log sink. Constructed at
/// startup, torn down at shutdown; there is no hidden module-level state.
pub struct WatchdogClient {
    config: Config,
    catalog: SignatureCatalog,
    provider: SnapshotProvider,
    tracker: DedupTracker,
    writer: LogWriterEnum,
    hostname: String,
}

impl WatchdogClient {
    pub fn new(config: Config, writer: LogWriterEnum) -> Self {
        info!("Initializing WatchdogClient");

        let catalog = SignatureCatalog::load(config.signatures_file.as_deref());
        if catalog.is_empty() {
            warn!("Signature catalog is empty; no process will ever match");
        }

        let tracker = DedupTracker::new(config.realert_window_secs);
        let hostname = System::host_name().unwrap_or_else(|| "unknown-host".to_string());

        info!(
            "Using {} with {} signatures",
            writer.variant_name(),
            catalog.len()
        );

        Self {
            config,
            catalog,
            provider: SnapshotProvider::new(),
            tracker,
            writer,
            hostname,
        }
    }

    /// One full tick: snapshot → match → dedup-filter → emit → sweep.
    /// Returns the number of audit events written. An emission failure
    /// costs only its own event; a failed snapshot fails the tick and is
    /// handled by the caller.
    pub async fn run_scan_tick(&mut self) -> Result<usize> {
        let entries = self.provider.snapshot().await?;
        self.process_snapshot(&entries, Utc::now()).await
    }

    /// Matching, dedup and emission half of a tick, separated from host
    /// inspection so it can be driven with synthetic snapshots.
    pub async fn process_snapshot(
        &mut self,
        entries: &[ProcessSnapshotEntry],
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let live: HashMap<u32, u64> = entries
            .iter()
            .map(|entry| (entry.pid, entry.start_time))
            .collect();

        let mut events_written = 0;
        for entry in entries {
            for match_result in matcher::match_entry(entry, &self.catalog) {
                let key = DedupKey::from(&match_result);
                if !self.tracker.should_emit(&key, now) {
                    continue;
                }

                let event = AuditEvent::from_match(&match_result, &self.hostname, now);
                match self.writer.append_event(&event).await {
                    Ok(()) => {
                        self.tracker.record_emitted(key, now);
                        events_written += 1;
                        debug!(
                            "[MATCH] {} (pid={}) -> {} [risk={}]",
                            event.process_name, event.pid, event.rule_id, event.risk
                        );
                    }
                    // not recorded as emitted, so the next tick may retry
                    Err(e) => warn!("Failed to append audit event: {e:#}"),
                }
            }
        }

        self.tracker.sweep(&live);
        Ok(events_written)
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &SignatureCatalog {
        &self.catalog
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn tracked_matches(&self) -> usize {
        self.tracker.len()
    }
}
