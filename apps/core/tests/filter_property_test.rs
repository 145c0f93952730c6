use proptest::prelude::*;
use regex::Regex;

use cmdsearch_core::command_index::CommandIndex;
use cmdsearch_core::model::ScanItem;
use cmdsearch_core::search::filter;

fn build_index(paths: &[(String, String)], pinned: &[bool]) -> CommandIndex {
    let items = paths
        .iter()
        .enumerate()
        .map(|(i, (group, leaf))| ScanItem::action(&format!("cmd{i}"), &[group.as_str(), leaf.as_str()]))
        .collect();
    let mut index = CommandIndex::from_scan(items);
    for (i, pin) in pinned.iter().enumerate() {
        if *pin {
            index.set_pinned(&format!("cmd{i}"), true);
        }
    }
    index
}

/// Each non-word character in a term becomes `.*`, anchored loosely on both
/// sides and matched case-insensitively.
fn term_pattern(term: &str) -> Regex {
    let body: String = term
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c.to_string()
            } else {
                ".*".to_string()
            }
        })
        .collect();
    Regex::new(&format!("(?i)^.*{body}.*$")).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_pinned_entries_always_present(
        paths in prop::collection::vec(("[A-Z][a-z]{1,6}", "[A-Za-z ]{1,10}"), 1..20),
        pinned in prop::collection::vec(any::<bool>(), 20),
        query in "[a-z .-]{0,12}",
    ) {
        let index = build_index(&paths, &pinned);
        let results = filter(&index, &query);
        for entry in index.entries().filter(|e| e.is_pinned()) {
            prop_assert!(results.iter().any(|r| r.id == entry.id));
        }
    }

    #[test]
    fn prop_unpinned_included_iff_all_terms_match(
        paths in prop::collection::vec(("[A-Z][a-z]{1,6}", "[A-Za-z .-]{1,10}"), 1..20),
        query in "[a-z._-]{1,4}( [a-z._-]{1,4}){0,2}",
    ) {
        let index = build_index(&paths, &[]);
        let results = filter(&index, &query);
        let patterns: Vec<Regex> = query.split_whitespace().map(term_pattern).collect();
        for entry in index.entries() {
            let expected = patterns.iter().all(|re| re.is_match(entry.search_key()));
            let included = results.iter().any(|r| r.id == entry.id);
            prop_assert_eq!(expected, included, "query {:?} key {:?}", query, entry.search_key());
        }
    }

    #[test]
    fn prop_empty_query_is_sorted_pinned_subset(
        paths in prop::collection::vec(("[A-Z][a-z]{1,6}", "[A-Za-z ]{1,10}"), 1..20),
        pinned in prop::collection::vec(any::<bool>(), 20),
    ) {
        let index = build_index(&paths, &pinned);
        let results = filter(&index, "");
        let expected = index.entries().filter(|e| e.is_pinned()).count();
        prop_assert_eq!(results.len(), expected);
        prop_assert!(results.iter().all(|r| r.is_pinned()));
        prop_assert!(results.windows(2).all(|w| w[0].hierarchy() <= w[1].hierarchy()));
    }
}
