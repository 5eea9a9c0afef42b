use crate::types::snapshot::ProcessSnapshotEntry;
use anyhow::Result;
use regex::{Regex, RegexBuilder};

/// Lowercased views of one snapshot entry, built once per entry so every
/// rule evaluation is case-insensitive without re-allocating.
#[derive(Debug)]
pub struct EntryText {
    pub process_name: String,
    pub exe_basename: String,
    pub command: String,
    pub argv: Vec<String>,
}

impl From<&ProcessSnapshotEntry> for EntryText {
    fn from(entry: &ProcessSnapshotEntry) -> Self {
        Self {
            process_name: entry.name.to_lowercase(),
            exe_basename: entry.executable_basename().to_lowercase(),
            command: entry.command_string().to_lowercase(),
            argv: entry.cmdline.iter().map(|arg| arg.to_lowercase()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaseInsensitiveRegex(Regex);

impl CaseInsensitiveRegex {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self(
            RegexBuilder::new(pattern).case_insensitive(true).build()?,
        ))
    }

    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.0.find(text).map(|m| m.as_str())
    }
}

/// Declarative matching conditions over one snapshot entry
#[derive(Debug, Clone)]
pub enum MatchCondition {
    ProcessNameIs(String),
    ProcessNameContains(String),
    CommandContains(String),
    CommandMatchesRegex(CaseInsensitiveRegex),
    /// Hostname appearing as a host component of a command-line token,
    /// e.g. `curl https://api.openai.com/v1/chat`.
    ApiHostname(String),
    And(Vec<MatchCondition>),
    Or(Vec<MatchCondition>),
}

impl MatchCondition {
    pub fn matches(&self, text: &EntryText) -> bool {
        self.get_match(text).is_some()
    }

    /// Returns the minimal fragment justifying the match, `None` when the
    /// entry does not satisfy this condition.
    pub fn get_match(&self, text: &EntryText) -> Option<String> {
        match self {
            MatchCondition::ProcessNameIs(name) => {
                (text.process_name == *name || text.exe_basename == *name).then(|| name.clone())
            }
            MatchCondition::ProcessNameContains(substr) => (text.process_name.contains(substr)
                || text.exe_basename.contains(substr))
            .then(|| substr.clone()),
            MatchCondition::CommandContains(substr) => {
                text.command.contains(substr).then(|| substr.clone())
            }
            MatchCondition::CommandMatchesRegex(regex) => {
                regex.find(&text.command).map(str::to_string)
            }
            MatchCondition::ApiHostname(host) => {
                text.argv.iter().find_map(|arg| find_hostname(arg, host))
            }
            MatchCondition::And(conditions) => conditions
                .iter()
                .map(|condition| condition.get_match(text))
                .collect::<Option<Vec<_>>>()?
                .into_iter()
                .max_by_key(|fragment| fragment.len()),
            MatchCondition::Or(conditions) => conditions
                .iter()
                .find_map(|condition| condition.get_match(text)),
        }
    }
}

/// Finds `host` inside `arg` as a whole host component: the occurrence must
/// not be preceded or followed by a character that would extend the domain
/// name, so `api.openai.com` matches inside `https://api.openai.com/v1` but
/// not inside `api.openai.community` or `notapi.openai.com`.
fn find_hostname(arg: &str, host: &str) -> Option<String> {
    let mut search_start = 0;
    while let Some(pos) = arg[search_start..].find(host) {
        let start = search_start + pos;
        let end = start + host.len();
        let before_ok = arg[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_hostname_char(c));
        let after_ok = arg[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_hostname_char(c));
        if before_ok && after_ok {
            return Some(host.to_string());
        }
        search_start = end;
    }
    None
}

fn is_hostname_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '.'
}
