use crate::node::NodeId;

/// Identifier of an entry, stable for the lifetime of the tree.
///
/// Two lookups of the same key return entries with the same id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub(crate) usize);

/// A stored key. The key is the payload; there is no separate value.
#[derive(Debug)]
pub struct Entry {
    pub(crate) slot_id: EntryId,
    pub(crate) key: Box<str>,
    pub(crate) leaf: NodeId,
}

impl Entry {
    #[must_use]
    pub(crate) fn new(slot_id: usize, key: &str, leaf: NodeId) -> Entry {
        Entry {
            slot_id: EntryId(slot_id),
            key: key.into(),
            leaf,
        }
    }

    #[must_use]
    pub fn id(&self) -> EntryId {
        self.slot_id
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The leaf currently holding this entry.
    #[must_use]
    pub fn leaf(&self) -> NodeId {
        self.leaf
    }
}
