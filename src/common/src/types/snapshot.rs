use serde::{Deserialize, Serialize};
use std::path::Path;

/// One process as observed at a single scan tick. Fields the host refused
/// to disclose are empty rather than absent; the entry is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ProcessSnapshotEntry {
    pub pid: u32,
    pub name: String,
    /// Empty when the executable path is unreadable.
    pub exe_path: String,
    /// Empty when reading the command line was denied.
    pub cmdline: Vec<String>,
    /// Epoch seconds; distinguishes pid reuse across process lifetimes.
    pub start_time: u64,
    pub user: String,
}

impl ProcessSnapshotEntry {
    pub fn from_name_and_args(pid: u32, name: &str, args: &[&str]) -> Self {
        Self {
            pid,
            name: name.to_string(),
            exe_path: String::new(),
            cmdline: args.iter().map(|s| s.to_string()).collect(),
            start_time: 0,
            user: "unknown".to_string(),
        }
    }

    /// Basename of the executable path, falling back to the process name
    /// when the path is empty or has no final component.
    pub fn executable_basename(&self) -> &str {
        Path::new(&self.exe_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.name)
    }

    pub fn command_string(&self) -> String {
        self.cmdline.join(" ")
    }
}
