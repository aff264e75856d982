use crate::{
    entry::{Entry, EntryId},
    error::{Error, Result},
    index::Index,
    node::{Node, NodeId, NodeKind},
};

/// Smallest accepted branching factor.
pub const MIN_DEGREE: usize = 5;
/// Largest accepted branching factor.
pub const MAX_DEGREE: usize = 20;
/// Branching factor used by [`BPlusTree::default`].
pub const DEFAULT_DEGREE: usize = 5;

/// In-memory B+-tree over string keys.
///
/// Inner nodes only route; every entry lives in a leaf, and the leaves form a
/// single chain in ascending key order.
///
/// ```
/// use bpindex::BPlusTree;
///
/// let mut tree = BPlusTree::new(5).expect("Invalid degree");
/// let first = tree.insert("apple").unwrap().id();
/// tree.insert("banana").unwrap();
///
/// // Inserting an existing key returns the entry already stored
/// assert_eq!(tree.insert("apple").unwrap().id(), first);
/// assert_eq!(tree.search("banana").map(|entry| entry.key()), Some("banana"));
///
/// let keys: Vec<&str> = tree.all_entries().map(|entry| entry.key()).collect();
/// assert_eq!(keys, ["apple", "banana"]);
/// ```
pub struct BPlusTree {
    pub(crate) degree: usize,
    pub(crate) root: Option<NodeId>,
    pub(crate) head: Option<NodeId>,
    pub(crate) nodes: Index<Node>,
    pub(crate) entries: Index<Entry>,
}

impl BPlusTree {
    /// Creates an empty tree whose nodes hold at most `degree` children or entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `degree` is outside
    /// [`MIN_DEGREE`]..=[`MAX_DEGREE`].
    pub fn new(degree: usize) -> Result<Self> {
        if !(MIN_DEGREE..=MAX_DEGREE).contains(&degree) {
            return Err(Error::Configuration {
                degree,
                min: MIN_DEGREE,
                max: MAX_DEGREE,
            });
        }
        Ok(BPlusTree {
            degree,
            root: None,
            head: None,
            nodes: Index::new(),
            entries: Index::new(),
        })
    }

    /// Inserts `key` unless it is already present.
    ///
    /// Returns the entry stored for `key` after the call: the new one, or the
    /// existing one untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `key` is empty; the tree is left
    /// unchanged.
    pub fn insert(&mut self, key: &str) -> Result<&Entry> {
        if key.is_empty() {
            return Err(Error::InvalidArgument("the insert key cannot be empty"));
        }

        // The first leaf is both the root and the head of the chain
        let root = match self.root {
            Some(root) => root,
            None => {
                let degree = self.degree;
                let leaf = NodeId(self.nodes.insert_with(|slot_id| Node::leaf(slot_id, degree)));
                self.root = Some(leaf);
                self.head = Some(leaf);
                leaf
            }
        };

        let entry = self.insert_node(root, key);
        Ok(&self.entries[entry.0])
    }

    #[must_use]
    pub fn search(&self, key: &str) -> Option<&Entry> {
        let root = self.root?;
        let entry = self.search_node(root, key)?;
        Some(&self.entries[entry.0])
    }

    /// Every entry in ascending key order, read along the leaf chain.
    #[must_use]
    pub fn all_entries(&self) -> Entries<'_> {
        Entries {
            tree: self,
            leaf: self.head,
            slot: 0,
        }
    }

    /// Depth as reported by the index: 0 when empty and 1 for a lone root
    /// leaf. Once the root is an inner node the entry level below the leaves
    /// is counted too, so the result is [`height`](Self::height) plus one.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self.root {
            None => 0,
            Some(root) if self.nodes[root.0].is_leaf() => 1,
            Some(_) => self.height() + 1,
        }
    }

    /// Number of node levels from the root down to the leaves, inclusive.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(node) = current {
            height += 1;
            current = self.nodes[node.0].children().first().copied();
        }
        height
    }

    /// Number of distinct keys stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// First leaf of the chain.
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn entry(&self, id: EntryId) -> &Entry {
        &self.entries[id.0]
    }

    /// Sets the routing key of `node` and carries it up to every ancestor for
    /// which the path so far is the leftmost child.
    pub(crate) fn update_routing_key(&mut self, node: NodeId, entry: EntryId) {
        let mut current = node;
        loop {
            if let NodeKind::Inner(inner) = &mut self.nodes[current.0].kind {
                inner.routing_key = Some(entry);
            }
            let parent = self.nodes[current.0].parent;
            match parent {
                Some(parent) if self.nodes[parent.0].children().first() == Some(&current) => {
                    current = parent;
                }
                _ => break,
            }
        }
    }

    /// Links `new_right`, freshly split off `node`, into the tree above them.
    pub(crate) fn propagate(&mut self, node: NodeId, new_right: NodeId) {
        // A root that never split has no routing key yet
        if !self.nodes[node.0].is_leaf() && self.nodes[node.0].routing_key().is_none() {
            let first = self.nodes[node.0].children()[0];
            let routing_key = self.nodes[first.0]
                .routing_key()
                .expect("first child has a routing key");
            self.update_routing_key(node, routing_key);
        }

        let parent = self.nodes[node.0].parent;
        match parent {
            None => {
                let degree = self.degree;
                let root = NodeId(
                    self.nodes
                        .insert_with(|slot_id| Node::inner(slot_id, degree, vec![node, new_right])),
                );
                self.nodes[node.0].parent = Some(root);
                self.nodes[new_right.0].parent = Some(root);
                self.root = Some(root);
                info_log!(root = root.0, height = self.height(), "installed new root");
            }
            Some(parent) if self.nodes[parent.0].len() < self.degree => {
                let inner = self.nodes[parent.0].as_inner_mut();
                let position = inner
                    .position(node)
                    .expect("split node is listed by its parent");
                inner.children.insert(position + 1, new_right);
                self.nodes[new_right.0].parent = Some(parent);
            }
            Some(parent) => self.split_inner(parent, node, new_right),
        }
    }
}

impl Default for BPlusTree {
    fn default() -> Self {
        BPlusTree::new(DEFAULT_DEGREE).expect("Invalid degree")
    }
}

impl<'a> IntoIterator for &'a BPlusTree {
    type Item = &'a Entry;
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Entries<'a> {
        self.all_entries()
    }
}

/// Iterator over the entries of a [`BPlusTree`] in ascending key order.
///
/// Created by [`BPlusTree::all_entries`].
pub struct Entries<'a> {
    tree: &'a BPlusTree,
    leaf: Option<NodeId>,
    slot: usize,
}

impl<'a> Iterator for Entries<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<&'a Entry> {
        while let Some(leaf_id) = self.leaf {
            let leaf = self.tree.nodes[leaf_id.0].as_leaf();
            if let Some(entry) = leaf.get(self.slot) {
                self.slot += 1;
                return Some(&self.tree.entries[entry.0]);
            }
            self.leaf = leaf.next;
            self.slot = 0;
        }
        None
    }
}
