use aiwatch_common::matcher::MatchResult;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Identity of one reported match: a specific process instance (pid plus
/// start time, so a reused pid is a different identity) under a specific
/// rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub pid: u32,
    pub start_time: u64,
    pub rule_id: String,
}

impl From<&MatchResult> for DedupKey {
    fn from(match_result: &MatchResult) -> Self {
        Self {
            pid: match_result.pid,
            start_time: match_result.start_time,
            rule_id: match_result.rule_id.clone(),
        }
    }
}

/// Suppresses repeat events for matches that are still live.
///
/// Owned by the scan loop and mutated only inside the active tick. Memory
/// is bounded by `sweep`: at most one entry per currently-live matched
/// process per rule survives a tick.
#[derive(Debug)]
pub struct DedupTracker {
    seen: HashMap<DedupKey, DateTime<Utc>>,
    realert_window: Option<Duration>,
}

impl DedupTracker {
    pub fn new(realert_window_secs: Option<u64>) -> Self {
        Self {
            seen: HashMap::new(),
            realert_window: realert_window_secs.map(|secs| Duration::seconds(secs as i64)),
        }
    }

    /// A key emits on first sight, and again only once the configured
    /// re-alert window has elapsed. Without a window it never re-emits
    /// while the entry survives sweeps.
    pub fn should_emit(&self, key: &DedupKey, now: DateTime<Utc>) -> bool {
        match self.seen.get(key) {
            None => true,
            Some(last_reported) => self
                .realert_window
                .is_some_and(|window| now - *last_reported >= window),
        }
    }

    pub fn record_emitted(&mut self, key: DedupKey, now: DateTime<Utc>) {
        self.seen.insert(key, now);
    }

    /// Drops entries whose process is gone or whose pid has been reused by
    /// a process with a different start time.
    pub fn sweep(&mut self, live: &HashMap<u32, u64>) {
        self.seen
            .retain(|key, _| live.get(&key.pid) == Some(&key.start_time));
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(pid: u32, start_time: u64, rule_id: &str) -> DedupKey {
        DedupKey {
            pid,
            start_time,
            rule_id: rule_id.to_string(),
        }
    }

    #[test]
    fn test_emits_once_per_live_process_instance() {
        let mut tracker = DedupTracker::new(None);
        let now = Utc::now();
        let k = key(100, 1_700_000_000, "openai_api_call");

        assert!(tracker.should_emit(&k, now));
        tracker.record_emitted(k.clone(), now);

        let live = HashMap::from([(100, 1_700_000_000)]);
        for tick in 1..50 {
            let later = now + Duration::seconds(tick * 10);
            assert!(!tracker.should_emit(&k, later));
            tracker.sweep(&live);
        }
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_sweep_drops_exited_process() {
        let mut tracker = DedupTracker::new(None);
        let now = Utc::now();
        let k = key(100, 1_700_000_000, "openai_api_call");
        tracker.record_emitted(k.clone(), now);

        tracker.sweep(&HashMap::new());
        assert!(tracker.is_empty());
        assert!(tracker.should_emit(&k, now));
    }

    #[test]
    fn test_pid_reuse_is_a_new_identity() {
        let mut tracker = DedupTracker::new(None);
        let now = Utc::now();
        tracker.record_emitted(key(100, 1_700_000_000, "openai_api_call"), now);

        // same pid, later start time: the old entry is swept and the new
        // identity may emit
        let live = HashMap::from([(100, 1_700_009_999)]);
        tracker.sweep(&live);
        assert!(tracker.is_empty());
        assert!(tracker.should_emit(&key(100, 1_700_009_999, "openai_api_call"), now));
    }

    #[test]
    fn test_same_pid_different_rules_are_independent() {
        let mut tracker = DedupTracker::new(None);
        let now = Utc::now();
        tracker.record_emitted(key(100, 1, "rule_a"), now);
        assert!(tracker.should_emit(&key(100, 1, "rule_b"), now));
    }

    #[test]
    fn test_realert_window_allows_re_emission() {
        let mut tracker = DedupTracker::new(Some(60));
        let now = Utc::now();
        let k = key(100, 1, "rule_a");
        tracker.record_emitted(k.clone(), now);

        assert!(!tracker.should_emit(&k, now + Duration::seconds(59)));
        assert!(tracker.should_emit(&k, now + Duration::seconds(60)));
    }
}
