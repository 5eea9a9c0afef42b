use aiwatch_common::constants::SNAPSHOT_TIMEOUT_SECS;
use aiwatch_common::types::snapshot::ProcessSnapshotEntry;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use sysinfo::{Process, ProcessRefreshKind, System, Users};
use tokio::sync::RwLock;
use tracing::debug;

/// Point-in-time view of the host process table.
///
/// One `snapshot()` call per scan tick. The refresh runs on a blocking
/// worker and is bounded by a timeout so a stuck read of one process's
/// metadata cannot stall the tick; fields the host refuses to disclose
/// degrade to empty values instead of failing the snapshot.
pub struct SnapshotProvider {
    system: Arc<RwLock<System>>,
    users: Arc<RwLock<Users>>,
}

impl SnapshotProvider {
    pub fn new() -> Self {
        Self {
            system: Arc::new(RwLock::new(System::new())),
            users: Arc::new(RwLock::new(Users::new_with_refreshed_list())),
        }
    }

    /// Enumerates live processes, yielding one entry per process. An empty
    /// host table yields an empty vector, not an error; processes that
    /// exit between enumeration and inspection are simply absent.
    pub async fn snapshot(&self) -> Result<Vec<ProcessSnapshotEntry>> {
        self.refresh().await?;

        let system = self.system.read().await;
        let users = self.users.read().await;

        let entries: Vec<ProcessSnapshotEntry> = system
            .processes()
            .iter()
            .map(|(pid, process)| build_entry(pid.as_u32(), process, &users))
            .collect();

        debug!("Snapshot captured {} processes", entries.len());
        Ok(entries)
    }

    async fn refresh(&self) -> Result<()> {
        let system = Arc::clone(&self.system);
        let users = Arc::clone(&self.users);

        let refresh = tokio::task::spawn_blocking(move || {
            system
                .blocking_write()
                .refresh_processes_specifics(ProcessRefreshKind::everything());
            users.blocking_write().refresh_list();
        });

        tokio::time::timeout(Duration::from_secs(SNAPSHOT_TIMEOUT_SECS), refresh)
            .await
            .context("process table refresh timed out")?
            .context("process table refresh worker failed")?;
        Ok(())
    }
}

impl Default for SnapshotProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn build_entry(pid: u32, process: &Process, users: &Users) -> ProcessSnapshotEntry {
    let user = process
        .user_id()
        .and_then(|uid| users.get_user_by_id(uid))
        .map(|user| user.name().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    ProcessSnapshotEntry {
        pid,
        name: process.name().to_string(),
        exe_path: process
            .exe()
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_default(),
        cmdline: process.cmd().to_vec(),
        start_time: process.start_time(),
        user,
    }
}
