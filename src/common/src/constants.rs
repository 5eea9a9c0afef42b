pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 10;

/// Hard cap on the `matched_fragment` field of an audit event. A rule may
/// legitimately match inside a very long argument blob; the fragment is
/// truncated so the log never carries more command content than the rule
/// needed.
pub const MATCHED_FRAGMENT_MAX_LEN: usize = 200;

/// Bound on a single process-table refresh. A refresh that exceeds this is
/// abandoned and the tick is skipped.
pub const SNAPSHOT_TIMEOUT_SECS: u64 = 5;

pub const WATCHDOG_DIR_NAME: &str = ".aiwatch";
pub const LOG_DIR_NAME: &str = "logs";
pub const LOG_SINK_FILE_NAME: &str = "events.jsonl";
