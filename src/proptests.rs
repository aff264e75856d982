use super::{BPlusTree, Entry, EntryId, NodeId, MAX_DEGREE, MIN_DEGREE};

use proptest::prelude::*;
use std::collections::BTreeSet;

// Leftmost entry below `node`, found by walking first children.
fn leftmost_entry(t: &BPlusTree, node: NodeId) -> EntryId {
    let mut current = node;
    while !t.nodes[current.0].is_leaf() {
        current = t.nodes[current.0].children()[0];
    }
    t.nodes[current.0]
        .as_leaf()
        .first()
        .expect("reachable leaf is never empty")
}

fn validate_node(t: &BPlusTree, node: NodeId, level: usize, leaves: &mut Vec<NodeId>) {
    let n = &t.nodes[node.0];
    assert_eq!(n.id(), node, "node must record its own slot");
    assert!(!n.is_empty(), "reachable node {node:?} is empty");
    assert!(n.len() <= t.degree, "node {node:?} exceeds the degree");

    // Every node but a root that has not split caches its leftmost entry
    match n.routing_key() {
        Some(key) => assert_eq!(key, leftmost_entry(t, node), "stale routing key on {node:?}"),
        None => assert_eq!(Some(node), t.root, "only the root may lack a routing key"),
    }

    if n.is_leaf() {
        assert_eq!(level, t.height(), "leaf {node:?} is not at the bottom level");
        let leaf = n.as_leaf();
        assert!(leaf.occupied().iter().all(Option::is_some));
        assert!(leaf.slots[leaf.len..].iter().all(Option::is_none));
        for entry in n.entries() {
            assert_eq!(t.entries[entry.0].leaf, node, "entry {entry:?} has a stale leaf");
            assert_eq!(t.entries[entry.0].slot_id, entry);
        }
        leaves.push(node);
        return;
    }

    let children = n.children();
    for (i, &child) in children.iter().enumerate() {
        assert_eq!(t.nodes[child.0].parent, Some(node), "child {child:?} has a stale parent");
        assert_eq!(
            children.iter().filter(|&&x| x == child).count(),
            1,
            "child {child:?} is listed twice"
        );
        if i > 0 {
            assert!(t.min_key(children[i - 1]) < t.min_key(child), "children out of order");
        }
        validate_node(t, child, level + 1, leaves);
    }
}

fn validate_tree(t: &BPlusTree) {
    let root = match t.root {
        Some(root) => root,
        None => {
            assert!(t.head.is_none());
            assert_eq!(t.len(), 0);
            return;
        }
    };
    assert_eq!(t.nodes[root.0].parent, None, "root must not have a parent");

    let mut leaves = Vec::new();
    validate_node(t, root, 1, &mut leaves);

    // The chain visits the leaves in tree order and ends at the last one
    assert_eq!(t.head, leaves.first().copied());
    for pair in leaves.windows(2) {
        assert_eq!(t.nodes[pair[0].0].next_leaf(), Some(pair[1]));
    }
    assert_eq!(leaves.last().and_then(|&leaf| t.nodes[leaf.0].next_leaf()), None);

    let keys: Vec<&str> = t.all_entries().map(Entry::key).collect();
    assert!(keys.windows(2).all(|pair| pair[0] < pair[1]), "leaf chain is not ascending");
    assert_eq!(keys.len(), t.len());
}

fn key_strategy() -> impl Strategy<Value = String> + Clone {
    "[a-z0-9]{1,8}"
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(degree in MIN_DEGREE..=MAX_DEGREE, keys in prop::collection::vec(key_strategy(), 0..=600)) {
        let mut t = BPlusTree::new(degree).unwrap();
        let mut m: BTreeSet<String> = BTreeSet::new();

        for key in &keys {
            let was_new = m.insert(key.clone());
            let before = t.search(key).map(Entry::id);
            let entry = t.insert(key).unwrap();
            prop_assert_eq!(entry.key(), key.as_str());
            if !was_new {
                prop_assert_eq!(Some(entry.id()), before);
            }
            prop_assert_eq!(t.len(), m.len());
        }

        validate_tree(&t);
        let got: Vec<&str> = t.all_entries().map(Entry::key).collect();
        let expected: Vec<&str> = m.iter().map(String::as_str).collect();
        prop_assert_eq!(got, expected);
        for key in &m {
            prop_assert_eq!(t.search(key).map(Entry::key), Some(key.as_str()));
        }
    }

    #[test]
    fn prop_reinsert_keeps_first_entry(keys in prop::collection::vec(key_strategy(), 1..=200)) {
        let mut t = BPlusTree::default();
        let first: Vec<EntryId> = keys.iter().map(|key| t.insert(key).unwrap().id()).collect();
        let len = t.len();

        // Later inserts of a repeated key return the id of its first insert
        for (key, &id) in keys.iter().zip(&first).rev() {
            let again = t.insert(key).unwrap().id();
            prop_assert_eq!(again, id);
            prop_assert_eq!(t.entry(again).key(), key.as_str());
            prop_assert_eq!(t.search(key).map(Entry::id), Some(again));
        }
        prop_assert_eq!(t.len(), len);
        validate_tree(&t);
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
    // Seven keys overflow a degree 5 leaf and exercise every split position
    let keys = ["a", "b", "c", "d", "e", "f", "g"];

    for_each_permutation(&keys, |perm| {
        let mut t = BPlusTree::new(5).unwrap();
        for key in &perm {
            t.insert(key).unwrap();
            validate_tree(&t);
        }
        let got: Vec<&str> = t.all_entries().map(Entry::key).collect();
        assert_eq!(got, keys);
    });
}

#[test]
fn descending_and_interleaved_inserts() {
    for degree in MIN_DEGREE..=MAX_DEGREE {
        let mut t = BPlusTree::new(degree).unwrap();
        for i in (0..500).rev() {
            t.insert(&format!("{i:04}")).unwrap();
        }
        for i in 0..500 {
            t.insert(&format!("{i:04}x")).unwrap();
        }
        validate_tree(&t);
        assert_eq!(t.len(), 1000);
    }
}
