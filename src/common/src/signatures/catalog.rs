use crate::matcher::{self, MatchResult};
use crate::signatures::Signature;
use crate::types::snapshot::ProcessSnapshotEntry;
use crate::yaml::{load_yaml_array, YamlExt};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const EMBEDDED_SIGNATURES: &str = include_str!("yml_rules/aiwatch.signatures.yml");

/// Ordered set of detection rules, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct SignatureCatalog {
    signatures: Vec<Signature>,
}

impl SignatureCatalog {
    /// Builds the catalog from the embedded rules plus, when given, an
    /// external catalog file whose rules are appended after them. A
    /// malformed rule or an unreadable file costs only itself; the rest of
    /// the catalog still loads.
    pub fn load(extra_rules: Option<&Path>) -> Self {
        let mut signatures = match parse_signatures(EMBEDDED_SIGNATURES) {
            Ok(signatures) => signatures,
            Err(e) => {
                warn!("Failed to parse embedded signature catalog: {e:#}");
                Vec::new()
            }
        };

        if let Some(path) = extra_rules {
            match load_signatures_from_file(path) {
                Ok(mut extra) => signatures.append(&mut extra),
                Err(e) => warn!(
                    "Failed to load signature catalog {}: {e:#}",
                    path.display()
                ),
            }
        }

        let mut seen_ids = HashSet::new();
        signatures.retain(|signature| {
            if seen_ids.insert(signature.id.clone()) {
                true
            } else {
                warn!("Duplicate signature id {:?} skipped", signature.id);
                false
            }
        });

        debug!("Loaded {} detection signatures", signatures.len());
        Self { signatures }
    }

    pub fn from_signatures(signatures: Vec<Signature>) -> Self {
        Self { signatures }
    }

    /// Evaluates one snapshot entry against every rule, in catalog order.
    pub fn evaluate(&self, entry: &ProcessSnapshotEntry) -> Vec<MatchResult> {
        matcher::match_entry(entry, self)
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

pub fn load_signatures_from_file(path: &Path) -> Result<Vec<Signature>> {
    let yaml_str = fs::read_to_string(path)
        .with_context(|| format!("reading signature catalog {}", path.display()))?;
    parse_signatures(&yaml_str)
}

/// Converts each catalog entry individually: a malformed rule is skipped
/// and reported, never aborting its neighbours.
pub fn parse_signatures(yaml_str: &str) -> Result<Vec<Signature>> {
    Ok(load_yaml_array(yaml_str, "signatures")?
        .into_iter()
        .filter_map(|yaml| {
            let id = yaml
                .required_string("id")
                .unwrap_or_else(|_| "<missing id>".to_string());
            match Signature::try_from(yaml) {
                Ok(signature) => Some(signature),
                Err(e) => {
                    warn!("Skipping malformed signature rule {:?}: {e:#}", id);
                    None
                }
            }
        })
        .collect())
}
