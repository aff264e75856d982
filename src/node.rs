use crate::{entry::EntryId, inner::InnerNode, leaf::LeafNode};

/// Identifier of a node, stable for the lifetime of the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

pub(crate) enum NodeKind {
    Inner(InnerNode),
    Leaf(LeafNode),
}

/// A tree node: either a routing node or a leaf.
///
/// `parent` is a back-reference used only to walk upward after a split; the
/// parent owns its children through its child list, never the other way round.
pub struct Node {
    pub(crate) slot_id: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl Node {
    #[must_use]
    pub(crate) fn leaf(slot_id: usize, degree: usize) -> Node {
        Node {
            slot_id: NodeId(slot_id),
            parent: None,
            kind: NodeKind::Leaf(LeafNode::new(degree)),
        }
    }

    #[must_use]
    pub(crate) fn inner(slot_id: usize, degree: usize, children: Vec<NodeId>) -> Node {
        Node {
            slot_id: NodeId(slot_id),
            parent: None,
            kind: NodeKind::Inner(InnerNode::new(degree, children)),
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.slot_id
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Number of children of an inner node, or occupied slots of a leaf.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.kind {
            NodeKind::Inner(inner) => inner.children.len(),
            NodeKind::Leaf(leaf) => leaf.len,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Children in key order. Empty for a leaf.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Inner(inner) => &inner.children,
            NodeKind::Leaf(_) => &[],
        }
    }

    /// Entries held by a leaf, in key order. Empty for an inner node.
    pub fn entries(&self) -> impl Iterator<Item = EntryId> + '_ {
        let slots: &[Option<EntryId>] = match &self.kind {
            NodeKind::Inner(_) => &[],
            NodeKind::Leaf(leaf) => leaf.occupied(),
        };
        slots.iter().flatten().copied()
    }

    /// The next leaf in key order. Always `None` for an inner node.
    #[must_use]
    pub fn next_leaf(&self) -> Option<NodeId> {
        match &self.kind {
            NodeKind::Inner(_) => None,
            NodeKind::Leaf(leaf) => leaf.next,
        }
    }

    /// The entry holding the smallest key below this node.
    ///
    /// For a leaf this is its first slot. For an inner node it is the cached
    /// minimum of its leftmost descendant, unset on a root that has not split yet.
    #[must_use]
    pub fn routing_key(&self) -> Option<EntryId> {
        match &self.kind {
            NodeKind::Inner(inner) => inner.routing_key,
            NodeKind::Leaf(leaf) => leaf.first(),
        }
    }

    pub(crate) fn as_inner(&self) -> &InnerNode {
        match &self.kind {
            NodeKind::Inner(inner) => inner,
            NodeKind::Leaf(_) => panic!("node {:?} is a leaf, expected an inner node", self.slot_id),
        }
    }

    pub(crate) fn as_inner_mut(&mut self) -> &mut InnerNode {
        match &mut self.kind {
            NodeKind::Inner(inner) => inner,
            NodeKind::Leaf(_) => panic!("node {:?} is a leaf, expected an inner node", self.slot_id),
        }
    }

    pub(crate) fn as_leaf(&self) -> &LeafNode {
        match &self.kind {
            NodeKind::Leaf(leaf) => leaf,
            NodeKind::Inner(_) => panic!("node {:?} is an inner node, expected a leaf", self.slot_id),
        }
    }

    pub(crate) fn as_leaf_mut(&mut self) -> &mut LeafNode {
        match &mut self.kind {
            NodeKind::Leaf(leaf) => leaf,
            NodeKind::Inner(_) => panic!("node {:?} is an inner node, expected a leaf", self.slot_id),
        }
    }
}

/// Number of occupants a full node keeps on its left side when it splits.
#[must_use]
pub fn split_index(degree: usize) -> usize {
    if degree % 2 == 0 {
        degree / 2
    } else {
        (degree + 1) / 2
    }
}

/// Number of occupants a full leaf hands to its new right sibling.
///
/// Together with [`split_index`] this always accounts for all `degree`
/// occupants, so the split node and its sibling hold `degree + 1` once the
/// pending entry lands.
#[must_use]
pub fn right_size(degree: usize) -> usize {
    degree - split_index(degree)
}
