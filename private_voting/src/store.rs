use crate::field::{fr_to_string, Fr};
use crate::Error;
use ark_ff::Zero;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A sparse merkle tree node, stored under its hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf { key: Fr, value: Fr },
    /// Children ordered by key bit: `left` is the `0` branch.
    Internal { left: Fr, right: Fr },
}

/// Storage for tree nodes
///
/// Implement this to back a tree with an out-of-process key-value store.
/// Writers must be serialized: every insert reads then rewrites the path
/// from the root.
pub trait NodeStore {
    /// Get a node by hash
    fn get_node(&self, hash: &Fr) -> Option<Node>;

    fn put_node(&mut self, hash: Fr, node: Node);

    fn delete_node(&mut self, hash: &Fr);

    /// The current root, zero for an empty tree.
    fn root(&self) -> Fr;

    fn set_root(&mut self, root: Fr);

    /// Get a node that must exist
    fn node(&self, hash: &Fr) -> Result<Node, Error> {
        self.get_node(hash)
            .ok_or_else(|| Error::MissingNode(fr_to_string(hash, 10)))
    }
}

/// In-memory store backed by a BTreeMap.
///
/// Clones share the node map until one of them writes, at which point the
/// writer gets its own copy.
#[derive(Debug, Clone)]
pub struct MemNodeStore {
    root: Fr,
    inner: Arc<BTreeMap<Fr, Node>>,
}

impl Default for MemNodeStore {
    fn default() -> Self {
        MemNodeStore {
            root: Fr::zero(),
            inner: Arc::new(BTreeMap::new()),
        }
    }
}

impl MemNodeStore {
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// True if both stores still share the same node map.
    pub fn shares_nodes_with(&self, other: &MemNodeStore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl NodeStore for MemNodeStore {
    fn get_node(&self, hash: &Fr) -> Option<Node> {
        self.inner.get(hash).copied()
    }

    fn put_node(&mut self, hash: Fr, node: Node) {
        Arc::make_mut(&mut self.inner).insert(hash, node);
    }

    fn delete_node(&mut self, hash: &Fr) {
        if self.inner.contains_key(hash) {
            Arc::make_mut(&mut self.inner).remove(hash);
        }
    }

    fn root(&self) -> Fr {
        self.root
    }

    fn set_root(&mut self, root: Fr) {
        self.root = root;
    }
}

impl From<Vec<(Fr, Node)>> for MemNodeStore {
    fn from(item: Vec<(Fr, Node)>) -> Self {
        let mut store = MemNodeStore::default();
        for (hash, node) in item {
            store.put_node(hash, node);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_on_write() {
        let mut store = MemNodeStore::default();
        let leaf = Node::Leaf {
            key: Fr::from(1u64),
            value: Fr::from(2u64),
        };
        store.put_node(Fr::from(10u64), leaf);
        store.set_root(Fr::from(10u64));

        let mut copy = store.clone();
        assert!(copy.shares_nodes_with(&store));

        copy.put_node(
            Fr::from(11u64),
            Node::Internal {
                left: Fr::from(10u64),
                right: Fr::zero(),
            },
        );
        copy.set_root(Fr::from(11u64));
        assert!(!copy.shares_nodes_with(&store));

        assert_eq!(store.len(), 1);
        assert_eq!(copy.len(), 2);
        assert_eq!(store.root(), Fr::from(10u64));
        assert_eq!(store.node(&Fr::from(10u64)).unwrap(), leaf);
        assert!(matches!(
            store.node(&Fr::from(11u64)),
            Err(Error::MissingNode(_))
        ));
    }

    #[test]
    fn test_delete() {
        let mut store = MemNodeStore::from(vec![(
            Fr::from(5u64),
            Node::Leaf {
                key: Fr::from(1u64),
                value: Fr::from(1u64),
            },
        )]);
        let copy = store.clone();
        store.delete_node(&Fr::from(5u64));
        assert!(store.is_empty());
        assert_eq!(copy.len(), 1);
    }
}
