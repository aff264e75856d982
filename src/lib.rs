#[macro_use]
mod tracing_helpers;

mod entry;
mod error;
mod index;
mod inner;
mod leaf;
mod node;
mod tree;

pub use entry::{Entry, EntryId};
pub use error::{Error, Result};
pub use node::{right_size, split_index, Node, NodeId};
pub use tree::{BPlusTree, Entries, DEFAULT_DEGREE, MAX_DEGREE, MIN_DEGREE};

#[cfg(test)]
mod proptests;
