//! The voting power accumulator: a sparse merkle tree committing to every
//! registered voter's id and voting power.
//!
//! Voters are sorted by public key hex and numbered from 1. The voter with
//! order `i` owns two leaves: key `2i - 1` holds its voter id and key `2i`
//! holds its voting power.

use crate::config::Config;
use crate::constants::{
    MAX_NUMBER_OF_VOTERS, MAX_NUMBER_OF_VOTE_OPTIONS, MAX_SMT_LEVEL, MIN_SMT_LEVEL, SMT_LEVEL,
};
use crate::field::Fr;
use crate::group::EllipticCurveGroup;
use crate::keys::PublicKey;
use crate::smt::{FindResult, MerkleProof, PoseidonSmtHasher, SparseMerkleTree};
use crate::store::{MemNodeStore, NodeStore};
use crate::voting_power::{IndividualVotingPower, RegistryEntry};
use crate::Error;
use ark_ff::Zero;
use std::collections::BTreeSet;

pub struct VotingPowerAccumulator<C: EllipticCurveGroup, S: NodeStore = MemNodeStore> {
    tree: SparseMerkleTree<S, PoseidonSmtHasher>,
    depth: usize,
    max_vote_options: usize,
    total_voting_power: u64,
    voters: Option<Vec<IndividualVotingPower<C>>>,
}

impl<C: EllipticCurveGroup> VotingPowerAccumulator<C> {
    /// Build an in-memory accumulator of depth `SMT_LEVEL`.
    pub fn build(voters: &[IndividualVotingPower<C>]) -> Result<Self, Error> {
        Self::build_with_depth(voters, SMT_LEVEL)
    }

    pub fn build_with_depth(
        voters: &[IndividualVotingPower<C>],
        depth: usize,
    ) -> Result<Self, Error> {
        Self::build_with_store(voters, MemNodeStore::default(), depth)
    }

    /// Build with the tree depth and option count the vote circuit was
    /// compiled for.
    pub fn build_with_config(
        voters: &[IndividualVotingPower<C>],
        config: &Config,
    ) -> Result<Self, Error> {
        let mut accumulator = Self::build_with_depth(voters, config.tree_depth)?;
        accumulator.max_vote_options = config.max_vote_options;
        Ok(accumulator)
    }

    /// Build from raw registry rows, validating every key and voting power.
    pub fn from_registry(entries: &[RegistryEntry]) -> Result<Self, Error> {
        let voters = entries
            .iter()
            .map(IndividualVotingPower::from_registry_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Self::build(&voters)
    }
}

impl<C: EllipticCurveGroup, S: NodeStore> VotingPowerAccumulator<C, S> {
    /// Build into the given, empty, store.
    ///
    /// The input order does not matter: the same set of voters always gives
    /// the same root and the same voter orders.
    pub fn build_with_store(
        voters: &[IndividualVotingPower<C>],
        store: S,
        depth: usize,
    ) -> Result<Self, Error> {
        if !(MIN_SMT_LEVEL..=MAX_SMT_LEVEL).contains(&depth) {
            return Err(Error::TreeDepthOutOfRange {
                min: MIN_SMT_LEVEL,
                max: MAX_SMT_LEVEL,
                found: depth,
            });
        }
        if !store.root().is_zero() {
            return Err(Error::StoreNotEmpty);
        }
        if voters.len() > MAX_NUMBER_OF_VOTERS {
            return Err(Error::TooManyVoters {
                max: MAX_NUMBER_OF_VOTERS,
                found: voters.len(),
            });
        }

        let mut sorted = voters.to_vec();
        sorted.sort_by(|a, b| {
            a.voter_public_signing_key
                .as_hex()
                .cmp(b.voter_public_signing_key.as_hex())
        });

        // The same point may be given in two encodings
        let mut seen = BTreeSet::new();
        for voter in sorted.iter() {
            if !seen.insert(voter.voter_public_signing_key.point().encode()?) {
                return Err(Error::DuplicateVoter(
                    voter.voter_public_signing_key.as_hex().to_owned(),
                ));
            }
        }

        let mut tree = SparseMerkleTree::with_store(store, PoseidonSmtHasher);
        let mut total_voting_power = 0u64;
        for (index, voter) in sorted.iter_mut().enumerate() {
            voter.voter_order = index + 1;
            let order = voter.voter_order as u64;
            tree.insert(
                Fr::from(2 * order - 1),
                voter.voter_public_signing_key.voter_id(),
            )?;
            tree.insert(Fr::from(2 * order), Fr::from(voter.voting_power))?;
            total_voting_power += voter.voting_power;
        }

        debug!(
            "built voting power accumulator: {} voters, total voting power {}, root {}",
            sorted.len(),
            total_voting_power,
            tree.root()
        );

        Ok(VotingPowerAccumulator {
            tree,
            depth,
            max_vote_options: MAX_NUMBER_OF_VOTE_OPTIONS,
            total_voting_power,
            voters: Some(sorted),
        })
    }

    pub fn root(&self) -> Fr {
        self.tree.root()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Largest number of options a ticket against this accumulator may have.
    pub fn max_vote_options(&self) -> usize {
        self.max_vote_options
    }

    pub fn total_voting_power(&self) -> u64 {
        self.total_voting_power
    }

    pub fn tree(&self) -> &SparseMerkleTree<S, PoseidonSmtHasher> {
        &self.tree
    }

    /// The ordered voter list, unless it has been forgotten.
    pub fn voters(&self) -> Option<&[IndividualVotingPower<C>]> {
        self.voters.as_deref()
    }

    /// Drop the in-memory voter list. The tree and its proofs are unaffected.
    pub fn forget_voters(&mut self) {
        self.voters = None;
    }

    /// Look a voter up by public key point.
    pub fn find_voter(&self, public_key: &PublicKey<C>) -> Option<&IndividualVotingPower<C>> {
        self.voters
            .as_ref()?
            .iter()
            .find(|voter| &voter.voter_public_signing_key == public_key)
    }

    /// Merkle proof for a leaf that must be present.
    pub fn get_siblings(&self, key: &Fr) -> Result<MerkleProof, Error> {
        self.tree.proof(key, self.depth)
    }

    /// Check that both leaves of `voter` hold its voter id and voting power.
    ///
    /// A wrong value is reported as `false`, never as an error.
    pub fn verify_total_voting_power_of_user(&self, voter: &IndividualVotingPower<C>) -> bool {
        let (id_key, power_key) = match voter.leaf_keys() {
            Some(keys) => keys,
            None => return false,
        };

        let expected = [
            (id_key, voter.voter_public_signing_key.voter_id()),
            (power_key, Fr::from(voter.voting_power)),
        ];
        for (key, value) in expected.iter() {
            match self.tree.find(&Fr::from(*key)) {
                Ok(lookup) => {
                    if lookup.result != (FindResult::Found { value: *value }) {
                        return false;
                    }
                }
                Err(e) => {
                    warn!("voting power check for leaf {} failed: {}", key, e);
                    return false;
                }
            }
        }
        true
    }
}

impl<C: EllipticCurveGroup, S: NodeStore + Clone> Clone for VotingPowerAccumulator<C, S> {
    fn clone(&self) -> Self {
        VotingPowerAccumulator {
            tree: self.tree.clone(),
            depth: self.depth,
            max_vote_options: self.max_vote_options,
            total_voting_power: self.total_voting_power,
            voters: self.voters.clone(),
        }
    }
}
