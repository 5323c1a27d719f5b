//! Sparse merkle tree over the BN254 scalar field, compatible with the
//! circomlib `SMTVerifier` circuit.
//!
//! Leaves hash as `H(key, value, 1)` and internal nodes as `H(left, right)`.
//! A leaf sits at the shallowest level where its key prefix is unique, so
//! the root does not depend on insertion order.

use crate::field::{fr_to_string, key_bits, Fr};
use crate::store::{MemNodeStore, Node, NodeStore};
use crate::Error;
use ark_ff::{One, Zero};
use light_poseidon::{Poseidon, PoseidonHasher};

/// The two compression functions of the tree.
pub trait SmtHasher {
    /// Internal node hash.
    fn hash0(&self, left: &Fr, right: &Fr) -> Result<Fr, Error>;

    /// Leaf hash.
    fn hash1(&self, key: &Fr, value: &Fr) -> Result<Fr, Error>;
}

/// Poseidon with the circom parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseidonSmtHasher;

impl SmtHasher for PoseidonSmtHasher {
    fn hash0(&self, left: &Fr, right: &Fr) -> Result<Fr, Error> {
        Ok(Poseidon::<Fr>::new_circom(2)?.hash(&[*left, *right])?)
    }

    fn hash1(&self, key: &Fr, value: &Fr) -> Result<Fr, Error> {
        Ok(Poseidon::<Fr>::new_circom(3)?.hash(&[*key, *value, Fr::one()])?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindResult {
    Found { value: Fr },
    /// The path ends at a leaf holding another key.
    Collision { key: Fr, value: Fr },
    /// The path ends at an empty subtree.
    Empty,
}

/// Result of walking the tree towards a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub result: FindResult,
    /// Siblings along the path, root first.
    pub siblings: Vec<Fr>,
}

impl Lookup {
    pub fn found(&self) -> bool {
        matches!(self.result, FindResult::Found { .. })
    }
}

/// Membership proof for one leaf: the leaf and its siblings, padded with
/// zeros to a fixed depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
    pub key: Fr,
    pub value: Fr,
    pub siblings: Vec<Fr>,
}

impl MerkleProof {
    /// Recompute the root from the leaf and compare.
    ///
    /// The leaf depth is the position of the last non-zero sibling, as in
    /// `SMTVerifier`.
    pub fn verify_with<H: SmtHasher>(&self, hasher: &H, root: &Fr) -> Result<bool, Error> {
        let depth = self
            .siblings
            .iter()
            .rposition(|s| !s.is_zero())
            .map_or(0, |i| i + 1);
        let bits = key_bits(&self.key);

        let mut node = hasher.hash1(&self.key, &self.value)?;
        for level in (0..depth).rev() {
            let sibling = &self.siblings[level];
            node = if bits[level] {
                hasher.hash0(sibling, &node)?
            } else {
                hasher.hash0(&node, sibling)?
            };
        }
        Ok(node == *root)
    }

    pub fn verify(&self, root: &Fr) -> Result<bool, Error> {
        self.verify_with(&PoseidonSmtHasher, root)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SparseMerkleTree<S: NodeStore = MemNodeStore, H: SmtHasher = PoseidonSmtHasher> {
    store: S,
    hasher: H,
}

impl SparseMerkleTree {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: NodeStore, H: SmtHasher> SparseMerkleTree<S, H> {
    pub fn with_store(store: S, hasher: H) -> Self {
        SparseMerkleTree { store, hasher }
    }

    pub fn root(&self) -> Fr {
        self.store.root()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn find(&self, key: &Fr) -> Result<Lookup, Error> {
        let bits = key_bits(key);
        let mut siblings = Vec::new();
        let result = self.find_from(key, &bits, self.store.root(), 0, &mut siblings)?;
        Ok(Lookup { result, siblings })
    }

    fn find_from(
        &self,
        key: &Fr,
        bits: &[bool],
        node: Fr,
        level: usize,
        siblings: &mut Vec<Fr>,
    ) -> Result<FindResult, Error> {
        if node.is_zero() {
            return Ok(FindResult::Empty);
        }
        match self.store.node(&node)? {
            Node::Leaf {
                key: leaf_key,
                value,
            } => {
                if leaf_key == *key {
                    Ok(FindResult::Found { value })
                } else {
                    Ok(FindResult::Collision {
                        key: leaf_key,
                        value,
                    })
                }
            }
            Node::Internal { left, right } => {
                if level >= bits.len() {
                    return Err(Error::MissingNode(fr_to_string(&node, 10)));
                }
                let (next, sibling) = if bits[level] {
                    (right, left)
                } else {
                    (left, right)
                };
                siblings.push(sibling);
                self.find_from(key, bits, next, level + 1, siblings)
            }
        }
    }

    /// Insert a new leaf. Keys can only be inserted once.
    pub fn insert(&mut self, key: Fr, value: Fr) -> Result<(), Error> {
        let lookup = self.find(&key)?;
        let new_bits = key_bits(&key);
        let mut siblings = lookup.siblings.clone();

        // `old` tracks the hash of the subtree being replaced, level by level,
        // so the nodes it passes through can be dropped.
        let mut old = Fr::zero();
        let mut mixed = false;
        match lookup.result {
            FindResult::Found { .. } => {
                return Err(Error::DuplicateLeafKey(fr_to_string(&key, 10)));
            }
            FindResult::Collision {
                key: old_key,
                value: old_value,
            } => {
                // Push the leaves apart until their key bits differ.
                let old_bits = key_bits(&old_key);
                let mut level = siblings.len();
                while level < new_bits.len() && old_bits[level] == new_bits[level] {
                    siblings.push(Fr::zero());
                    level += 1;
                }
                old = self.hasher.hash1(&old_key, &old_value)?;
                siblings.push(old);
            }
            FindResult::Empty => {
                mixed = !siblings.is_empty();
            }
        }

        let mut inserts = Vec::with_capacity(siblings.len() + 1);
        let mut dels = Vec::new();

        let mut node = self.hasher.hash1(&key, &value)?;
        inserts.push((node, Node::Leaf { key, value }));

        for level in (0..siblings.len()).rev() {
            let sibling = siblings[level];
            if level < siblings.len() - 1 && !sibling.is_zero() {
                mixed = true;
            }
            if mixed {
                old = if new_bits[level] {
                    self.hasher.hash0(&sibling, &old)?
                } else {
                    self.hasher.hash0(&old, &sibling)?
                };
                dels.push(old);
            }

            let (left, right) = if new_bits[level] {
                (sibling, node)
            } else {
                (node, sibling)
            };
            node = self.hasher.hash0(&left, &right)?;
            inserts.push((node, Node::Internal { left, right }));
        }

        for (hash, inserted) in inserts {
            self.store.put_node(hash, inserted);
        }
        self.store.set_root(node);
        for hash in dels {
            self.store.delete_node(&hash);
        }
        Ok(())
    }

    /// Proof for a present key with the siblings zero padded to `depth`.
    pub fn proof(&self, key: &Fr, depth: usize) -> Result<MerkleProof, Error> {
        let lookup = self.find(key)?;
        let value = match lookup.result {
            FindResult::Found { value } => value,
            _ => return Err(Error::KeyNotFound(fr_to_string(key, 10))),
        };
        if lookup.siblings.len() > depth {
            return Err(Error::ProofTooDeep {
                depth,
                found: lookup.siblings.len(),
            });
        }
        let mut siblings = lookup.siblings;
        siblings.resize(depth, Fr::zero());

        Ok(MerkleProof {
            key: *key,
            value,
            siblings,
        })
    }
}
