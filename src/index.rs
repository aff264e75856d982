/// Slot storage backing the tree's nodes and entries.
///
/// Items are addressed by the slot they were given on insertion. Slots are
/// never released: the tree has no removal, so an id stays valid for the
/// lifetime of the tree.
pub struct Index<T> {
    slots: Vec<T>,
}

impl<T> Default for Index<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<T> {
    #[must_use]
    pub fn new() -> Self {
        Index { slots: Vec::new() }
    }

    // Allocate the next slot; `make` receives the slot id so the item can record it.
    pub fn insert_with(&mut self, make: impl FnOnce(usize) -> T) -> usize {
        let slot_id = self.slots.len();
        self.slots.push(make(slot_id));
        slot_id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

impl<T> std::ops::Index<usize> for Index<T> {
    type Output = T;

    fn index(&self, slot_id: usize) -> &T {
        &self.slots[slot_id]
    }
}

impl<T> std::ops::IndexMut<usize> for Index<T> {
    fn index_mut(&mut self, slot_id: usize) -> &mut T {
        &mut self.slots[slot_id]
    }
}
