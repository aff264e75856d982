use crate::{
    entry::EntryId,
    node::{split_index, Node, NodeId},
    tree::BPlusTree,
};

/// Routing node. Children are ordered by the smallest key below each of them.
pub(crate) struct InnerNode {
    pub(crate) children: Vec<NodeId>,
    /// Smallest entry of the leftmost descendant, kept current by
    /// [`BPlusTree::update_routing_key`].
    pub(crate) routing_key: Option<EntryId>,
}

impl InnerNode {
    #[must_use]
    pub fn new(degree: usize, children: Vec<NodeId>) -> InnerNode {
        let mut node = InnerNode {
            children: Vec::with_capacity(degree),
            routing_key: None,
        };
        node.children.extend(children);
        node
    }

    pub fn position(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&x| x == child)
    }
}

impl BPlusTree {
    /// Smallest key below `node`.
    pub(crate) fn min_key(&self, node: NodeId) -> &str {
        let entry = self.nodes[node.0]
            .routing_key()
            .expect("node below the root has a routing key");
        &self.entries[entry.0].key
    }

    // Predecessor routing: the last child whose smallest key does not exceed `key`,
    // or the first child when every child exceeds it.
    pub(crate) fn route(&self, node: NodeId, key: &str) -> NodeId {
        let children = &self.nodes[node.0].as_inner().children;
        let exceeding = children.iter().position(|&child| self.min_key(child) > key);
        match exceeding {
            Some(0) => children[0],
            Some(index) => children[index - 1],
            None => children[children.len() - 1],
        }
    }

    pub(crate) fn search_node(&self, node: NodeId, key: &str) -> Option<EntryId> {
        if self.nodes[node.0].is_leaf() {
            self.search_leaf(node, key)
        } else {
            self.search_node(self.route(node, key), key)
        }
    }

    pub(crate) fn insert_node(&mut self, node: NodeId, key: &str) -> EntryId {
        if self.nodes[node.0].is_leaf() {
            self.insert_into_leaf(node, key)
        } else {
            let child = self.route(node, key);
            trace_log!(node = node.0, child = child.0, key, "route insert");
            self.insert_node(child, key)
        }
    }

    // Split the full inner `node` after its child `current` split off `new_right`.
    pub(crate) fn split_inner(&mut self, node: NodeId, current: NodeId, new_right: NodeId) {
        let degree = self.degree;
        let split_index = split_index(degree);
        let position = self.nodes[node.0]
            .as_inner()
            .position(current)
            .expect("split child is listed by its parent");

        let sibling = NodeId(
            self.nodes
                .insert_with(|slot_id| Node::inner(slot_id, degree, Vec::new())),
        );
        let moved = self.nodes[node.0].as_inner_mut().children.split_off(split_index);
        for child in &moved {
            self.nodes[child.0].parent = Some(sibling);
        }
        self.nodes[sibling.0].as_inner_mut().children.extend(moved);

        if position < split_index {
            self.nodes[node.0]
                .as_inner_mut()
                .children
                .insert(position + 1, new_right);
            self.nodes[new_right.0].parent = Some(node);
        } else {
            self.nodes[sibling.0]
                .as_inner_mut()
                .children
                .insert(position - split_index + 1, new_right);
            self.nodes[new_right.0].parent = Some(sibling);
        }

        let first = self.nodes[sibling.0].children()[0];
        let routing_key = self.nodes[first.0]
            .routing_key()
            .expect("first child of a split sibling has a routing key");
        self.update_routing_key(sibling, routing_key);

        debug_log!(
            node = node.0,
            sibling = sibling.0,
            position,
            "split inner node"
        );
        self.propagate(node, sibling);
    }
}
