use std::cmp::Ordering;

use crate::command_index::CommandIndex;
use crate::model::CommandEntry;

/// One whitespace-separated query term, split into the literal fragments that
/// must appear in order inside a search key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatcher {
    fragments: Vec<String>,
}

impl TermMatcher {
    pub fn new(term: &str) -> Self {
        let lowered: String = term.chars().flat_map(|c| c.to_lowercase()).collect();
        let fragments = lowered
            .split(|c: char| !is_word_char(c))
            .filter(|fragment| !fragment.is_empty())
            .map(str::to_string)
            .collect();
        Self { fragments }
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Non-word runs in the term act as gaps of any length, so `p-cut`
    /// matches `polygonmulti-cut`. A term with no fragments matches anything.
    pub fn matches(&self, search_key: &str) -> bool {
        let mut rest = search_key;
        for fragment in &self.fragments {
            match rest.find(fragment.as_str()) {
                Some(position) => rest = &rest[position + fragment.len()..],
                None => return false,
            }
        }
        true
    }
}

pub fn tokenize(query: &str) -> Vec<TermMatcher> {
    query.split_whitespace().map(TermMatcher::new).collect()
}

/// Commands visible for `query`, pinned first and then by hierarchy.
///
/// Pinned commands are always included. Unpinned commands need at least one
/// term and must match every term.
pub fn filter<'a>(index: &'a CommandIndex, query: &str) -> Vec<&'a CommandEntry> {
    if index.is_empty() {
        return Vec::new();
    }

    let terms = tokenize(query);
    let mut matches: Vec<&CommandEntry> = index
        .entries()
        .filter(|entry| {
            entry.is_pinned()
                || (!terms.is_empty() && terms.iter().all(|t| t.matches(entry.search_key())))
        })
        .collect();

    matches.sort_by(|a, b| rank(a, b));
    matches
}

fn rank(a: &CommandEntry, b: &CommandEntry) -> Ordering {
    b.is_pinned()
        .cmp(&a.is_pinned())
        .then_with(|| a.hierarchy().cmp(b.hierarchy()))
        .then_with(|| a.id.cmp(&b.id))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
