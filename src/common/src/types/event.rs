use crate::matcher::MatchResult;
use crate::signatures::Risk;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted audit record, one JSON object per log line. Carries the
/// rule-driven fragment only; the raw command line and anything the user
/// typed into an AI client never appear here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub hostname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub pid: u32,
    pub process_name: String,
    pub rule_id: String,
    pub category: String,
    pub risk: Risk,
    pub matched_fragment: String,
}

impl AuditEvent {
    pub fn from_match(
        match_result: &MatchResult,
        hostname: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            hostname: hostname.to_string(),
            user: if match_result.user.is_empty() {
                None
            } else {
                Some(match_result.user.clone())
            },
            pid: match_result.pid,
            process_name: match_result.process_name.clone(),
            rule_id: match_result.rule_id.clone(),
            category: match_result.category.clone(),
            risk: match_result.risk,
            matched_fragment: match_result.matched_fragment.clone(),
        }
    }
}
