use crate::constants::MAX_TOTAL_VOTING_POWER;
use crate::group::EllipticCurveGroup;
use crate::keys::PublicKey;
use crate::Error;

/// One row of the voter registry as it arrives from outside.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub public_key: String,
    pub voting_power: u64,
}

/// A registered voter and its voting power.
///
/// `voter_order` is 0 until the voter is placed in an accumulator, then it
/// is the 1-based rank of the voter's public key hex.
#[derive(Debug)]
pub struct IndividualVotingPower<C: EllipticCurveGroup> {
    pub voting_power: u64,
    pub voter_public_signing_key: PublicKey<C>,
    pub voter_order: usize,
}

impl<C: EllipticCurveGroup> IndividualVotingPower<C> {
    pub fn new(voting_power: u64, voter_public_signing_key: PublicKey<C>) -> Result<Self, Error> {
        if voting_power > MAX_TOTAL_VOTING_POWER {
            return Err(Error::VotingPowerTooLarge(voting_power));
        }
        Ok(IndividualVotingPower {
            voting_power,
            voter_public_signing_key,
            voter_order: 0,
        })
    }

    pub fn from_registry_entry(entry: &RegistryEntry) -> Result<Self, Error> {
        Self::new(entry.voting_power, PublicKey::new(&entry.public_key)?)
    }

    /// Tree keys of the voter id leaf and the voting power leaf, or `None`
    /// if the voter has not been ordered yet.
    pub fn leaf_keys(&self) -> Option<(u64, u64)> {
        if self.voter_order == 0 {
            return None;
        }
        let order = self.voter_order as u64;
        Some((2 * order - 1, 2 * order))
    }
}

impl<C: EllipticCurveGroup> Clone for IndividualVotingPower<C> {
    fn clone(&self) -> Self {
        IndividualVotingPower {
            voting_power: self.voting_power,
            voter_public_signing_key: self.voter_public_signing_key.clone(),
            voter_order: self.voter_order,
        }
    }
}
