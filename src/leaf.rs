use crate::{
    entry::{Entry, EntryId},
    index::Index,
    node::{right_size, split_index, Node, NodeId},
    tree::BPlusTree,
};

/// Fixed-capacity sorted run of entries, threaded into the leaf chain.
pub(crate) struct LeafNode {
    pub(crate) slots: Box<[Option<EntryId>]>,
    pub(crate) len: usize,
    pub(crate) next: Option<NodeId>,
}

impl LeafNode {
    #[must_use]
    pub fn new(degree: usize) -> LeafNode {
        LeafNode {
            slots: vec![None; degree].into_boxed_slice(),
            len: 0,
            next: None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    pub fn occupied(&self) -> &[Option<EntryId>] {
        &self.slots[..self.len]
    }

    pub fn first(&self) -> Option<EntryId> {
        self.slots[0]
    }

    pub fn get(&self, index: usize) -> Option<EntryId> {
        self.occupied().get(index).copied().flatten()
    }

    fn key_at<'a>(&self, index: usize, entries: &'a Index<Entry>) -> &'a str {
        let entry = self.slots[index].expect("occupied leaf slot holds an entry");
        &entries[entry.0].key
    }

    // Linear scan of the occupied slots.
    pub fn search(&self, key: &str, entries: &Index<Entry>) -> Option<EntryId> {
        for slot in self.occupied() {
            match slot {
                Some(entry) if &*entries[entry.0].key == key => return Some(*entry),
                Some(_) => {}
                None => break,
            }
        }
        None
    }

    /// Leftmost slot whose key is not less than `key`.
    pub fn find_insert_index(&self, key: &str, entries: &Index<Entry>) -> usize {
        if self.len == 0 {
            return 0;
        }
        if self.len == 1 {
            return if self.key_at(0, entries) > key { 0 } else { 1 };
        }

        let mut low = 0;
        let mut high = self.len - 1;
        while low + 1 < high {
            let middle = (low + high) / 2;
            match self.key_at(middle, entries).cmp(key) {
                std::cmp::Ordering::Equal => return middle,
                std::cmp::Ordering::Greater => high = middle,
                std::cmp::Ordering::Less => low = middle,
            }
        }
        assert_eq!(high, low + 1, "binary search window did not close");

        if self.key_at(low, entries) >= key {
            low
        } else if self.key_at(high, entries) >= key {
            high
        } else {
            high + 1
        }
    }

    // Shift the slots at and after `index` one to the right and write `entry`.
    pub fn insert_at(&mut self, index: usize, entry: EntryId) {
        assert!(self.len < self.slots.len(), "insert into a full leaf");
        assert!(index <= self.len, "insert index past the occupied slots");
        self.slots[index..=self.len].rotate_right(1);
        self.slots[index] = Some(entry);
        self.len += 1;
    }

    // Take the occupied slots from `at` onward, clearing everything past `at`.
    pub fn split_off(&mut self, at: usize) -> Vec<EntryId> {
        let moved = self.slots[at..self.len].iter().flatten().copied().collect();
        for slot in &mut self.slots[at..] {
            *slot = None;
        }
        self.len = at;
        moved
    }

    pub fn extend(&mut self, entries: &[EntryId]) {
        for &entry in entries {
            self.slots[self.len] = Some(entry);
            self.len += 1;
        }
    }
}

impl BPlusTree {
    pub(crate) fn search_leaf(&self, leaf: NodeId, key: &str) -> Option<EntryId> {
        self.nodes[leaf.0].as_leaf().search(key, &self.entries)
    }

    // Insert `key` into `leaf`, or return the entry already holding it.
    pub(crate) fn insert_into_leaf(&mut self, leaf: NodeId, key: &str) -> EntryId {
        if let Some(existing) = self.search_leaf(leaf, key) {
            return existing;
        }

        let entry = EntryId(
            self.entries
                .insert_with(|slot_id| Entry::new(slot_id, key, leaf)),
        );
        if self.nodes[leaf.0].as_leaf().is_full() {
            self.split_leaf(leaf, entry);
        } else {
            let index = self.nodes[leaf.0]
                .as_leaf()
                .find_insert_index(key, &self.entries);
            self.insert_into_leaf_at(leaf, entry, index);
        }
        entry
    }

    pub(crate) fn insert_into_leaf_at(&mut self, leaf: NodeId, entry: EntryId, index: usize) {
        self.nodes[leaf.0].as_leaf_mut().insert_at(index, entry);
        self.entries[entry.0].leaf = leaf;

        // A new minimum changes the routing key of every ancestor on the leftmost path
        if index == 0 && self.nodes[leaf.0].parent.is_some() {
            self.update_routing_key(leaf, entry);
        }
    }

    // Split a full leaf around the pending `entry` and link the new leaf after it.
    pub(crate) fn split_leaf(&mut self, leaf: NodeId, entry: EntryId) {
        let degree = self.degree;
        let split_index = split_index(degree);

        // Position among the full leaf, before anything moves
        let insert_index = self.nodes[leaf.0]
            .as_leaf()
            .find_insert_index(&self.entries[entry.0].key, &self.entries);

        let sibling = NodeId(
            self.nodes
                .insert_with(|slot_id| Node::leaf(slot_id, degree)),
        );
        let moved = self.nodes[leaf.0].as_leaf_mut().split_off(split_index);
        assert_eq!(moved.len(), right_size(degree));
        self.nodes[sibling.0].as_leaf_mut().extend(&moved);
        for moved_entry in &moved {
            self.entries[moved_entry.0].leaf = sibling;
        }

        if insert_index < split_index {
            self.insert_into_leaf_at(leaf, entry, insert_index);
        } else {
            self.insert_into_leaf_at(sibling, entry, insert_index - split_index);
        }

        let key = &self.entries[entry.0].key;
        assert!(
            self.search_leaf(leaf, key).is_some() || self.search_leaf(sibling, key).is_some(),
            "entry {key:?} is missing after splitting leaf {leaf:?}"
        );

        let next = self.nodes[leaf.0].as_leaf().next;
        self.nodes[sibling.0].as_leaf_mut().next = next;
        self.nodes[leaf.0].as_leaf_mut().next = Some(sibling);

        debug_log!(
            leaf = leaf.0,
            sibling = sibling.0,
            insert_index,
            "split leaf"
        );
        self.propagate(leaf, sibling);
    }
}
