use super::{CompressedTrie, TrieNode};

use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};

/// Walk the whole trie and check the structural invariants.
fn validate_trie(t: &CompressedTrie) {
    assert!(!t.root.is_end_of_word(), "root must not be a word");

    let mut stack: Vec<(&TrieNode, bool)> = vec![(&t.root, true)];
    let mut words = 0usize;
    while let Some((node, is_root)) = stack.pop() {
        if node.is_end_of_word() {
            words += 1;
        }
        if !is_root {
            // Nothing is ever deleted, so a non-word node only exists as a
            // branching point.
            assert!(
                node.is_end_of_word() || node.edge_count() >= 2,
                "interior node with {} edge(s) should have been compressed",
                node.edge_count()
            );
        }

        let table = node.edge_table();
        assert_eq!(table.iter().count(), table.len());
        assert!(table.len() < table.capacity(), "edge table without free slot");

        let mut firsts = HashSet::new();
        for edge in node.edges() {
            assert!(!edge.label().is_empty(), "empty edge label");
            assert!(
                edge.label().bytes().all(|b| b.is_ascii_lowercase()),
                "label {:?} outside a..=z",
                edge.label()
            );
            assert!(
                firsts.insert(edge.first_char()),
                "duplicate first character {:?}",
                edge.first_char()
            );
            assert!(table.contains_label(edge.label()));
            stack.push((edge.child(), false));
        }
    }
    assert_eq!(words, t.len(), "word nodes must match CompressedTrie::len");
}

#[derive(Clone, Debug)]
enum Op {
    Insert(String),
    Record(String),
    Search(String),
}

fn word_strategy() -> impl Strategy<Value = String> + Clone {
    // A tiny alphabet forces shared prefixes and lots of edge splits.
    "[a-d]{1,8}"
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let word = word_strategy();
    let op = prop_oneof![
        45 => word.clone().prop_map(Op::Insert),
        35 => word.clone().prop_map(Op::Record),
        20 => word.prop_map(Op::Search),
    ];
    prop::collection::vec(op, 0..=400)
}

fn model_matches<'a>(m: &'a BTreeMap<String, u64>, prefix: &'a str) -> impl Iterator<Item = (&'a String, &'a u64)> {
    m.iter().filter(move |(w, _)| w.starts_with(prefix))
}

fn build(ops: Vec<Op>) -> (CompressedTrie, BTreeMap<String, u64>) {
    let mut t = CompressedTrie::new();
    let mut m: BTreeMap<String, u64> = BTreeMap::new();
    for op in ops {
        match op {
            Op::Insert(w) => {
                let added = t.insert(&w).unwrap();
                assert_eq!(added, !m.contains_key(&w));
                m.entry(w).or_insert(0);
            }
            Op::Record(w) => {
                let recorded = t.record_occurrence(&w);
                assert_eq!(recorded, m.contains_key(&w));
                if let Some(count) = m.get_mut(&w) {
                    *count += 1;
                }
            }
            Op::Search(w) => {
                assert_eq!(t.search(&w), m.contains_key(&w));
            }
        }
    }
    (t, m)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let (t, m) = build(ops);

        validate_trie(&t);
        prop_assert_eq!(t.len(), m.len());
        let mut got: Vec<(String, u64)> = t.iter().collect();
        got.sort();
        let expected: Vec<(String, u64)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_top_k(ops in ops_strategy(), prefix in "[a-d]{0,3}", k in 0usize..6) {
        let (t, m) = build(ops);
        let got = t.top_k(&prefix, k);

        let mut expected: Vec<u64> = model_matches(&m, &prefix).map(|(_, i)| *i).collect();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        expected.truncate(k);

        // Words with equal importance at the cut-off may be any of the tied
        // ones, so compare the importance profile and check each entry.
        let importances: Vec<u64> = got.iter().map(|w| w.importance).collect();
        prop_assert_eq!(importances, expected);
        for pair in got.windows(2) {
            prop_assert!(
                pair[0].importance > pair[1].importance
                    || (pair[0].importance == pair[1].importance && pair[0].word < pair[1].word)
            );
        }
        for entry in &got {
            prop_assert!(entry.word.starts_with(&prefix));
            prop_assert_eq!(m.get(&entry.word), Some(&entry.importance));
        }
    }

    #[test]
    fn prop_average_frequency(ops in ops_strategy(), prefix in "[a-d]{0,3}") {
        let (t, m) = build(ops);
        let matches: Vec<u64> = model_matches(&m, &prefix).map(|(_, i)| *i).collect();

        let has_anchor = t.node(&prefix).is_some();
        prop_assert_eq!(has_anchor, prefix.is_empty() || !matches.is_empty());

        let expected = if matches.is_empty() {
            0.0
        } else {
            matches.iter().sum::<u64>() as f64 / matches.len() as f64
        };
        prop_assert!((t.average_frequency(&prefix) - expected).abs() < 1e-9);
    }

    #[test]
    fn prop_next_letter_extends_prefix(ops in ops_strategy(), prefix in "[a-d]{0,3}") {
        let (t, m) = build(ops);
        match t.predict_next_letter(&prefix) {
            Some(c) => {
                let mut extended = prefix.clone();
                extended.push(c);
                prop_assert!(model_matches(&m, &extended).next().is_some());
            }
            None => {
                prop_assert!(m.keys().all(|w| !(w.starts_with(&prefix) && w.len() > prefix.len())));
            }
        }
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let words = ["test", "testing", "tester", "team", "t", "tea"];

    for_each_permutation(&words, |perm| {
        let mut t = CompressedTrie::new();
        for w in &perm {
            assert!(t.insert(w).unwrap());
        }

        validate_trie(&t);
        for w in &words {
            assert!(t.search(w), "{w} missing after order {perm:?}");
        }
        for w in ["te", "tes", "testi", "teams"] {
            assert!(!t.search(w), "{w} found after order {perm:?}");
        }
        let mut got: Vec<String> = t.iter().map(|(w, _)| w).collect();
        got.sort();
        let mut expected: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        expected.sort();
        assert_eq!(got, expected);
    });
}
