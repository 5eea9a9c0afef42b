pub mod catalog;
pub mod match_condition;
mod parser;

pub use catalog::SignatureCatalog;
pub use match_condition::MatchCondition;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single detection rule. Rules are declarative data: the match condition
/// is a tagged variant, never code, so the catalog stays auditable and can
/// be extended by adding entries.
#[derive(Debug, Clone)]
pub struct Signature {
    /// Stable identifier, unique within the catalog.
    pub id: String,
    /// Open set: e.g. local_llm, remote_llm, generic_ai, cli_tool.
    pub category: String,
    pub risk: Risk,
    pub description: String,
    pub condition: MatchCondition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    Low,
    Medium,
    High,
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Risk::Low => write!(f, "low"),
            Risk::Medium => write!(f, "medium"),
            Risk::High => write!(f, "high"),
        }
    }
}

impl FromStr for Risk {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Risk::Low),
            "medium" => Ok(Risk::Medium),
            "high" => Ok(Risk::High),
            other => bail!("Unknown risk level: {:?}", other),
        }
    }
}
