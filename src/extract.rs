use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::config::DEFAULT_PAYLOAD_POINTER;

/// `[Name](contact): 21` → name, contact, digits.
const SCORE_LINE: &str = r"^\[([^\]]+)\]\(([^)]+)\):\s*([0-9]+)$";

static SCORE_RE: OnceLock<Regex> = OnceLock::new();

fn score_re() -> &'static Regex {
    SCORE_RE.get_or_init(|| Regex::new(SCORE_LINE).expect("score line pattern is valid"))
}

/// One extracted score line. `key` is the composite `[name](contact)` identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreRecord {
    pub key: String,
    pub value: u64,
}

impl ScoreRecord {
    pub fn new(key: impl Into<String>, value: u64) -> Self {
        Self { key: key.into(), value }
    }
}

/// Parse a score line. Anything that does not match (including digit runs that
/// overflow `u64`) yields `None`; most log lines are not score lines.
pub fn extract_score(payload: &str) -> Option<ScoreRecord> {
    let caps = score_re().captures(payload)?;
    let value = caps[3].parse::<u64>().ok()?;
    Some(ScoreRecord { key: format!("[{}]({})", &caps[1], &caps[2]), value })
}

/// Locates the score text inside a raw log entry and runs `extract_score` on it.
///
/// The log API nests the message at `/body/stringValue`; other shapes can be
/// targeted with a different JSON pointer.
#[derive(Clone, Debug)]
pub struct ScoreExtractor {
    pointer: String,
}

impl Default for ScoreExtractor {
    fn default() -> Self {
        Self { pointer: DEFAULT_PAYLOAD_POINTER.to_string() }
    }
}

impl ScoreExtractor {
    pub fn json_pointer(ptr: impl Into<String>) -> Self {
        Self { pointer: ptr.into() }
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Payload absent, not a string, or not a score line → `None`.
    pub fn extract_entry(&self, entry: &Value) -> Option<ScoreRecord> {
        entry.pointer(&self.pointer).and_then(|v| v.as_str()).and_then(extract_score)
    }
}
