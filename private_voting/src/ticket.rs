//! Voting tickets: a voter's encrypted allocation across the vote options
//! together with the merkle proofs that it is entitled to that much power.

use crate::accumulator::VotingPowerAccumulator;
use crate::constants::MAX_NUMBER_OF_VOTE_OPTIONS;
use crate::field::{fr_from_biguint, fr_to_string, sample_randomness, Fr};
use crate::group::{CurvePoint, EllipticCurveGroup};
use crate::keys::{KeyPair, PublicKey};
use crate::signals::{CircuitSignals, ProvingEngine, PublicSignals};
use crate::smt::MerkleProof;
use crate::store::NodeStore;
use crate::vote::VotingOptionChange;
use crate::{Error, InvalidVotingTicketError};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde_json::{json, Value};

/// A voter's ballot, ready to be handed to the proving engine.
#[derive(Debug)]
pub struct VotingTicket<C: EllipticCurveGroup> {
    pub(crate) voting_option_changes: Vec<VotingOptionChange<C>>,
    pub(crate) voting_power_merkle_proof: MerkleProof,
    pub(crate) valid_voter_merkle_proof: MerkleProof,
    pub(crate) voter_key_pair: KeyPair<C>,
    pub(crate) committee_public_key: PublicKey<C>,
    pub(crate) voter_index: usize,
}

/// Build a ticket with fresh randomness from the operating system.
pub fn build_voting_ticket<C: EllipticCurveGroup, S: NodeStore>(
    allocation: &[u64],
    number_of_options: usize,
    voter: &KeyPair<C>,
    accumulator: &VotingPowerAccumulator<C, S>,
    committee_public_key: &PublicKey<C>,
) -> Result<VotingTicket<C>, Error> {
    build_voting_ticket_with_rng(
        &mut OsRng,
        allocation,
        number_of_options,
        voter,
        accumulator,
        committee_public_key,
    )
}

/// Build a ticket for `voter` spending `allocation[i]` on option `i`.
///
/// The whole of the voter's registered power must be allocated. Every check
/// runs before anything is encrypted; on error no ticket exists.
pub fn build_voting_ticket_with_rng<C, S, R>(
    rng: &mut R,
    allocation: &[u64],
    number_of_options: usize,
    voter: &KeyPair<C>,
    accumulator: &VotingPowerAccumulator<C, S>,
    committee_public_key: &PublicKey<C>,
) -> Result<VotingTicket<C>, Error>
where
    C: EllipticCurveGroup,
    S: NodeStore,
    R: RngCore + CryptoRng,
{
    let ticket = check_allocation(allocation, number_of_options, voter, accumulator)
        .and_then(|voter_order| {
            encrypt_ticket(
                rng,
                allocation,
                voter_order,
                voter,
                accumulator,
                committee_public_key,
            )
        });

    match ticket {
        Ok(ticket) => {
            debug!(
                "built voting ticket for voter {} over {} options",
                ticket.voter_index, number_of_options
            );
            Ok(ticket)
        }
        Err(e) => {
            warn!("rejected voting ticket request: {}", e);
            Err(e.into())
        }
    }
}

/// Validate a request, returning the voter's order in the accumulator.
fn check_allocation<C: EllipticCurveGroup, S: NodeStore>(
    allocation: &[u64],
    number_of_options: usize,
    voter: &KeyPair<C>,
    accumulator: &VotingPowerAccumulator<C, S>,
) -> Result<usize, InvalidVotingTicketError> {
    let max_vote_options = accumulator.max_vote_options();
    if number_of_options == 0 || number_of_options > max_vote_options {
        return Err(InvalidVotingTicketError::NumberOfOptionsOutOfRange {
            max: max_vote_options,
            found: number_of_options,
        });
    }
    if allocation.len() != number_of_options {
        return Err(InvalidVotingTicketError::WrongNumberOfAllocations {
            expected: number_of_options,
            found: allocation.len(),
        });
    }

    // Coarse bound first: no single option may exceed the registry total.
    let total = accumulator.total_voting_power();
    for (option, amount) in allocation.iter().enumerate() {
        if *amount > total {
            return Err(InvalidVotingTicketError::OptionExceedsTotalVotingPower {
                option,
                amount: *amount,
                total,
            });
        }
    }

    if accumulator.voters().is_none() {
        return Err(InvalidVotingTicketError::VoterListUnavailable);
    }
    let registered = accumulator
        .find_voter(voter.public_key())
        .ok_or(InvalidVotingTicketError::NotRegistered)?;

    let allocated: u64 = allocation.iter().sum();
    if allocated != registered.voting_power {
        return Err(InvalidVotingTicketError::AllocationMismatch {
            allocated,
            registered: registered.voting_power,
        });
    }

    if !accumulator.verify_total_voting_power_of_user(registered) {
        return Err(InvalidVotingTicketError::MembershipCheckFailed);
    }
    Ok(registered.voter_order)
}

fn encrypt_ticket<C, S, R>(
    rng: &mut R,
    allocation: &[u64],
    voter_order: usize,
    voter: &KeyPair<C>,
    accumulator: &VotingPowerAccumulator<C, S>,
    committee_public_key: &PublicKey<C>,
) -> Result<VotingTicket<C>, InvalidVotingTicketError>
where
    C: EllipticCurveGroup,
    S: NodeStore,
    R: RngCore + CryptoRng,
{
    let voting_option_changes = allocation
        .iter()
        .enumerate()
        .map(|(option, amount)| {
            VotingOptionChange::new(
                option,
                *amount,
                sample_randomness(&mut *rng),
                committee_public_key,
            )
            .map_err(|e| InvalidVotingTicketError::Encryption(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let order = voter_order as u64;
    let valid_voter_merkle_proof = accumulator
        .get_siblings(&Fr::from(2 * order - 1))
        .map_err(|e| InvalidVotingTicketError::MerkleProof(e.to_string()))?;
    let voting_power_merkle_proof = accumulator
        .get_siblings(&Fr::from(2 * order))
        .map_err(|e| InvalidVotingTicketError::MerkleProof(e.to_string()))?;

    Ok(VotingTicket {
        voting_option_changes,
        voting_power_merkle_proof,
        valid_voter_merkle_proof,
        voter_key_pair: voter.clone(),
        committee_public_key: committee_public_key.clone(),
        voter_index: voter_order - 1,
    })
}

fn decimal(value: &BigUint) -> Value {
    Value::String(fr_to_string(&fr_from_biguint(value), 10))
}

fn point_signal<C: EllipticCurveGroup>(point: &CurvePoint<C>) -> Value {
    json!([decimal(&point.x()), decimal(&point.y())])
}

fn siblings_signal(proof: &MerkleProof) -> Value {
    Value::Array(
        proof
            .siblings
            .iter()
            .map(|s| Value::String(fr_to_string(s, 10)))
            .collect(),
    )
}

impl<C: EllipticCurveGroup> VotingTicket<C> {
    pub fn voting_option_changes(&self) -> &[VotingOptionChange<C>] {
        &self.voting_option_changes
    }

    /// Proof for the voting power leaf, key `2 * voter_index + 2`.
    pub fn voting_power_merkle_proof(&self) -> &MerkleProof {
        &self.voting_power_merkle_proof
    }

    /// Proof for the voter id leaf, key `2 * voter_index + 1`.
    pub fn valid_voter_merkle_proof(&self) -> &MerkleProof {
        &self.valid_voter_merkle_proof
    }

    pub fn voter_key_pair(&self) -> &KeyPair<C> {
        &self.voter_key_pair
    }

    pub fn committee_public_key(&self) -> &PublicKey<C> {
        &self.committee_public_key
    }

    /// Zero based position of the voter, `voter_order - 1`.
    pub fn voter_index(&self) -> usize {
        self.voter_index
    }

    pub fn total_allocated(&self) -> u64 {
        self.voting_option_changes
            .iter()
            .map(|c| c.voted_power_amount())
            .sum()
    }

    /// The circuit input vector for this ticket against `root`.
    pub fn to_circuit_inputs(&self, root: &Fr) -> CircuitSignals {
        let changes = &self.voting_option_changes;
        let mut signals = CircuitSignals::new();

        signals.insert(
            "committeePublicKey",
            point_signal(self.committee_public_key.point()),
        );
        signals.insert(
            "encryptedRandomness",
            Value::Array(
                changes
                    .iter()
                    .map(|c| point_signal(c.encrypted_randomness()))
                    .collect(),
            ),
        );
        signals.insert(
            "encryptedMaskedVotingPowerAllocated",
            Value::Array(
                changes
                    .iter()
                    .map(|c| point_signal(c.encrypted_masked_voting_power_allocated()))
                    .collect(),
            ),
        );
        signals.insert(
            "votingPowerMerkleTreeRoot",
            Value::String(fr_to_string(root, 10)),
        );
        signals.insert(
            "votedPowerAmount",
            Value::Array(
                changes
                    .iter()
                    .map(|c| decimal(&BigUint::from(c.voted_power_amount())))
                    .collect(),
            ),
        );
        signals.insert(
            "randomness",
            Value::Array(changes.iter().map(|c| decimal(c.randomness())).collect()),
        );
        signals.insert(
            "voterPK",
            point_signal(self.voter_key_pair.public_key().point()),
        );
        signals.insert("voterIndex", json!(self.voter_index));
        signals.insert(
            "proofOfVoterId",
            siblings_signal(&self.valid_voter_merkle_proof),
        );
        signals.insert(
            "proofOfVotingPower",
            siblings_signal(&self.voting_power_merkle_proof),
        );
        signals
    }

    /// Prove this ticket with an external proving engine.
    pub fn prove<E: ProvingEngine>(
        &self,
        engine: &E,
        root: &Fr,
    ) -> Result<(E::Proof, PublicSignals), E::Error> {
        engine.full_prove(&self.to_circuit_inputs(root))
    }

    /// Check natively what the vote circuit enforces: well formed
    /// ciphertexts, both leaves proven against `root` at the voter's keys,
    /// the id leaf holding the voter id and the power leaf holding the sum
    /// of the allocations.
    pub fn verify_against_root(&self, root: &Fr) -> Result<bool, Error> {
        if self.voting_option_changes.is_empty()
            || self.voting_option_changes.len() > MAX_NUMBER_OF_VOTE_OPTIONS
        {
            return Ok(false);
        }
        for (option, change) in self.voting_option_changes.iter().enumerate() {
            if change.option_index() != option
                || change.committee_public_key() != &self.committee_public_key
                || !change.is_well_formed()
            {
                return Ok(false);
            }
        }

        let index = self.voter_index as u64;
        let id_proof = &self.valid_voter_merkle_proof;
        let power_proof = &self.voting_power_merkle_proof;

        Ok(id_proof.key == Fr::from(2 * index + 1)
            && power_proof.key == Fr::from(2 * index + 2)
            && id_proof.value == self.voter_key_pair.public_key().voter_id()
            && power_proof.value == Fr::from(self.total_allocated())
            && id_proof.verify(root)?
            && power_proof.verify(root)?)
    }
}

impl<C: EllipticCurveGroup> Clone for VotingTicket<C> {
    fn clone(&self) -> Self {
        VotingTicket {
            voting_option_changes: self.voting_option_changes.clone(),
            voting_power_merkle_proof: self.voting_power_merkle_proof.clone(),
            valid_voter_merkle_proof: self.valid_voter_merkle_proof.clone(),
            voter_key_pair: self.voter_key_pair.clone(),
            committee_public_key: self.committee_public_key.clone(),
            voter_index: self.voter_index,
        }
    }
}
