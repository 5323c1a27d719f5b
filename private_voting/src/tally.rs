use crate::group::{CurvePoint, EllipticCurveGroup};
use crate::keys::{PrivateKey, PublicKey};
use crate::ticket::VotingTicket;
use crate::vote::decrypt_to_point;
use crate::Error;
use num_bigint::BigUint;

/// Running homomorphic sum of tickets, one ElGamal pair per option.
#[derive(Debug)]
pub struct EncryptedTally<C: EllipticCurveGroup> {
    committee_public_key: PublicKey<C>,
    options: Vec<(CurvePoint<C>, CurvePoint<C>)>,
    num_tickets: usize,
}

impl<C: EllipticCurveGroup> EncryptedTally<C> {
    pub fn new(committee_public_key: PublicKey<C>, number_of_options: usize) -> Self {
        EncryptedTally {
            committee_public_key,
            options: vec![(CurvePoint::identity(), CurvePoint::identity()); number_of_options],
            num_tickets: 0,
        }
    }

    pub fn num_tickets(&self) -> usize {
        self.num_tickets
    }

    pub fn number_of_options(&self) -> usize {
        self.options.len()
    }

    /// Add a ticket's ciphertexts into the running sums.
    pub fn add_ticket(&mut self, ticket: &VotingTicket<C>) -> Result<(), Error> {
        if ticket.committee_public_key() != &self.committee_public_key {
            return Err(Error::MismatchedPublicKeys);
        }
        if let Some(change) = ticket
            .voting_option_changes()
            .iter()
            .find(|c| c.option_index() >= self.options.len())
        {
            return Err(Error::OptionIndexOutOfRange(change.option_index()));
        }

        for change in ticket.voting_option_changes() {
            let (randomness, masked) = &mut self.options[change.option_index()];
            *randomness = *randomness + *change.encrypted_randomness();
            *masked = *masked + *change.encrypted_masked_voting_power_allocated();
        }
        self.num_tickets += 1;
        Ok(())
    }

    /// Summed ciphertext of one option.
    pub fn option(&self, index: usize) -> Option<&(CurvePoint<C>, CurvePoint<C>)> {
        self.options.get(index)
    }

    /// Decrypt every option total. Totals are found by trying every value up
    /// to `max_total`, so keep it to the registry's total voting power.
    pub fn decrypt(
        &self,
        committee_private_key: &PrivateKey<C>,
        max_total: u64,
    ) -> Result<Vec<u64>, Error> {
        self.options
            .iter()
            .map(|(randomness, masked)| {
                let point = decrypt_to_point(committee_private_key, randomness, masked);
                discrete_log(&point, max_total)
            })
            .collect()
    }
}

/// Find `m <= bound` with `m*G == point`.
pub fn discrete_log<C: EllipticCurveGroup>(point: &CurvePoint<C>, bound: u64) -> Result<u64, Error> {
    let generator = CurvePoint::<C>::generator();
    let mut candidate = CurvePoint::<C>::identity();
    for m in 0..=bound {
        if candidate == *point {
            return Ok(m);
        }
        candidate = candidate + generator;
    }
    Err(Error::DiscreteLogNotFound(bound))
}

/// `m*G` for a small integer, handy for checking decrypted points.
pub fn encode_amount<C: EllipticCurveGroup>(amount: u64) -> CurvePoint<C> {
    CurvePoint::mul_generator(&BigUint::from(amount))
}
