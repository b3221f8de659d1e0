//! First-write-wins score table and its ranked, frozen form.
//! Insertion order is part of the result: it breaks ties in the final ranking.

use crate::extract::{ScoreExtractor, ScoreRecord};
use crate::fetch::PageResponse;
use ahash::AHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Insertion-ordered key → score map. A key keeps the first value it was recorded with.
#[derive(Clone, Debug, Default)]
pub struct ScoreBoard {
    entries: Vec<(String, u64)>,
    index: AHashMap<String, usize>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a score unless its key is already present. Returns true when inserted.
    pub fn record(&mut self, rec: ScoreRecord) -> bool {
        if self.index.contains_key(&rec.key) {
            return false;
        }
        self.index.insert(rec.key.clone(), self.entries.len());
        self.entries.push((rec.key, rec.value));
        true
    }

    /// Extract and record every score line of a page, in the page's entry order.
    /// Returns how many new keys were recorded.
    pub fn ingest_page(&mut self, page: &PageResponse, extractor: &ScoreExtractor) -> usize {
        let mut added = 0;
        for entry in page.entries() {
            if let Some(rec) = extractor.extract_entry(entry) {
                if self.record(rec) {
                    added += 1;
                }
            }
        }
        added
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze into a ranking: value descending, ties in first-insertion order.
    pub fn finalize(self) -> Ranking {
        let mut entries = self.entries;
        // stable: equal scores keep insertion order
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Ranking { entries }
    }
}

/// Final ranked table. Serializes as a JSON object whose keys appear in rank order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ranking {
    entries: Vec<(String, u64)>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn top(&self, n: usize) -> &[(String, u64)] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// Keys in rank order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }
}

impl Serialize for Ranking {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
