use crate::group::EllipticCurveGroup;
use crate::keys::KeyPair;
use crate::voting_power::IndividualVotingPower;
use crate::Error;
use rand::Rng;
use rand::{CryptoRng, RngCore};

pub fn generate_keypair<C: EllipticCurveGroup>() -> Result<KeyPair<C>, Error> {
    let mut csprng = rand::rngs::OsRng {};
    KeyPair::generate(&mut csprng)
}

/// Fresh voters with random voting powers below `max_power`, for demos and tests.
pub fn generate_sample_voting_powers<C, R>(
    rng: &mut R,
    number_of_voters: usize,
    max_power: u64,
) -> Result<(Vec<KeyPair<C>>, Vec<IndividualVotingPower<C>>), Error>
where
    C: EllipticCurveGroup,
    R: RngCore + CryptoRng,
{
    let mut voters = Vec::with_capacity(number_of_voters);
    let mut voting_powers = Vec::with_capacity(number_of_voters);
    for _ in 0..number_of_voters {
        let pair = KeyPair::<C>::generate(rng)?;
        let power = rng.gen_range(0..max_power.max(1));
        voting_powers.push(IndividualVotingPower::new(power, pair.public_key().clone())?);
        voters.push(pair);
    }
    Ok((voters, voting_powers))
}

/// Split `total_voting_power` over the options at random cut points.
pub fn generate_random_vote_power_allocation<R: RngCore>(
    rng: &mut R,
    total_voting_power: u64,
    number_of_options: usize,
) -> Vec<u64> {
    if number_of_options == 0 {
        return Vec::new();
    }
    let mut cuts: Vec<u64> = (1..number_of_options)
        .map(|_| rng.gen_range(0..=total_voting_power))
        .collect();
    cuts.push(0);
    cuts.push(total_voting_power);
    cuts.sort_unstable();
    cuts.windows(2).map(|pair| pair[1] - pair[0]).collect()
}
