use crate::constants::MAX_NUMBER_OF_VOTE_OPTIONS;
use crate::group::{CurvePoint, EllipticCurveGroup};
use crate::keys::{PrivateKey, PublicKey};
use crate::Error;
use num_bigint::BigUint;

/// One option of a ticket, encrypted with exponential ElGamal under the
/// committee key: `(r*G, amount*G + r*PK)`.
///
/// Encryptions under the same committee key add up option by option, so the
/// committee only ever decrypts totals.
#[derive(Debug)]
pub struct VotingOptionChange<C: EllipticCurveGroup> {
    pub(crate) option_index: usize,
    pub(crate) randomness: BigUint,
    pub(crate) voted_power_amount: u64,
    pub(crate) encrypted_randomness: CurvePoint<C>,
    pub(crate) encrypted_masked_voting_power_allocated: CurvePoint<C>,
    pub(crate) committee_public_key: PublicKey<C>,
}

impl<C: EllipticCurveGroup> VotingOptionChange<C> {
    /// Encrypt `voted_power_amount` for option `option_index`. `randomness`
    /// must be fresh for every option of every ticket.
    pub fn new(
        option_index: usize,
        voted_power_amount: u64,
        randomness: BigUint,
        committee_public_key: &PublicKey<C>,
    ) -> Result<Self, Error> {
        if option_index >= MAX_NUMBER_OF_VOTE_OPTIONS {
            return Err(Error::OptionIndexOutOfRange(option_index));
        }

        let encrypted_randomness = CurvePoint::mul_generator(&randomness);
        let encrypted_masked_voting_power_allocated =
            CurvePoint::mul_generator(&BigUint::from(voted_power_amount))
                + committee_public_key.point().scalar_mul(&randomness);

        Ok(VotingOptionChange {
            option_index,
            randomness,
            voted_power_amount,
            encrypted_randomness,
            encrypted_masked_voting_power_allocated,
            committee_public_key: committee_public_key.clone(),
        })
    }

    pub fn option_index(&self) -> usize {
        self.option_index
    }

    pub fn randomness(&self) -> &BigUint {
        &self.randomness
    }

    pub fn voted_power_amount(&self) -> u64 {
        self.voted_power_amount
    }

    /// `r*G`
    pub fn encrypted_randomness(&self) -> &CurvePoint<C> {
        &self.encrypted_randomness
    }

    /// `amount*G + r*PK`
    pub fn encrypted_masked_voting_power_allocated(&self) -> &CurvePoint<C> {
        &self.encrypted_masked_voting_power_allocated
    }

    pub fn committee_public_key(&self) -> &PublicKey<C> {
        &self.committee_public_key
    }

    /// True if both points are what the stored opening produces.
    pub fn is_well_formed(&self) -> bool {
        let expected_randomness = CurvePoint::<C>::mul_generator(&self.randomness);
        let expected_masked = CurvePoint::<C>::mul_generator(&BigUint::from(
            self.voted_power_amount,
        )) + self.committee_public_key.point().scalar_mul(&self.randomness);

        self.option_index < MAX_NUMBER_OF_VOTE_OPTIONS
            && self.encrypted_randomness == expected_randomness
            && self.encrypted_masked_voting_power_allocated == expected_masked
    }
}

impl<C: EllipticCurveGroup> Clone for VotingOptionChange<C> {
    fn clone(&self) -> Self {
        VotingOptionChange {
            option_index: self.option_index,
            randomness: self.randomness.clone(),
            voted_power_amount: self.voted_power_amount,
            encrypted_randomness: self.encrypted_randomness,
            encrypted_masked_voting_power_allocated: self.encrypted_masked_voting_power_allocated,
            committee_public_key: self.committee_public_key.clone(),
        }
    }
}

/// `amount*G` recovered from an ElGamal pair with the committee private key:
/// `C2 - sk*C1`.
pub fn decrypt_to_point<C: EllipticCurveGroup>(
    committee_private_key: &PrivateKey<C>,
    encrypted_randomness: &CurvePoint<C>,
    encrypted_masked_amount: &CurvePoint<C>,
) -> CurvePoint<C> {
    *encrypted_masked_amount - encrypted_randomness.scalar_mul(committee_private_key.scalar())
}
