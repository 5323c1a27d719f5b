use super::*;
use num_bigint::BigUint;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn end_to_end_election<C: EllipticCurveGroup>() {
    let mut rng = ChaCha20Rng::seed_from_u64(2022);

    // Register three voters
    let voters: Vec<KeyPair<C>> = (0..3)
        .map(|_| KeyPair::generate(&mut rng).unwrap())
        .collect();
    let registry: Vec<IndividualVotingPower<C>> = voters
        .iter()
        .zip([10u64, 20, 5].iter())
        .map(|(pair, power)| IndividualVotingPower::new(*power, pair.public_key().clone()).unwrap())
        .collect();

    // The committee key that every allocation is encrypted under
    let committee = KeyPair::<C>::generate(&mut rng).unwrap();

    // Build the voting power accumulator
    let accumulator = VotingPowerAccumulator::build(&registry).unwrap();
    assert_eq!(accumulator.total_voting_power(), 35);
    let root = accumulator.root();

    // The voter with power 20 spends all of it on the first option
    let strong_voter = &voters[1];
    let ticket = build_voting_ticket_with_rng(
        &mut rng,
        &[20, 0, 0],
        3,
        strong_voter,
        &accumulator,
        committee.public_key(),
    )
    .unwrap();
    assert!(ticket.verify_against_root(&root).unwrap());
    assert_eq!(ticket.to_circuit_inputs(&root).len(), 10);

    // One short of the registered power
    let result = build_voting_ticket_with_rng(
        &mut rng,
        &[19, 0, 0],
        3,
        strong_voter,
        &accumulator,
        committee.public_key(),
    );
    assert!(matches!(result, Err(Error::InvalidVotingTicket(_))));

    // Someone who never registered
    let stranger = KeyPair::<C>::generate(&mut rng).unwrap();
    let result = build_voting_ticket_with_rng(
        &mut rng,
        &[10, 0, 0],
        3,
        &stranger,
        &accumulator,
        committee.public_key(),
    );
    match result {
        Err(Error::InvalidVotingTicket(InvalidVotingTicketError::NotRegistered)) => {}
        other => panic!("expected NotRegistered, got {:?}", other),
    }
    assert!(InvalidVotingTicketError::NotRegistered
        .to_string()
        .contains("does not have the right to vote"));

    // The other two voters split their power
    let second = build_voting_ticket_with_rng(
        &mut rng,
        &[4, 6, 0],
        3,
        &voters[0],
        &accumulator,
        committee.public_key(),
    )
    .unwrap();
    let third = build_voting_ticket_with_rng(
        &mut rng,
        &[0, 2, 3],
        3,
        &voters[2],
        &accumulator,
        committee.public_key(),
    )
    .unwrap();

    // Voting is over: add the tickets up and let the committee decrypt the totals
    let mut tally = EncryptedTally::new(committee.public_key().clone(), 3);
    for ticket in [&ticket, &second, &third] {
        tally.add_ticket(ticket).unwrap();
    }
    assert_eq!(tally.num_tickets(), 3);

    let totals = tally
        .decrypt(committee.private_key(), accumulator.total_voting_power())
        .unwrap();
    assert_eq!(totals, vec![24, 8, 3]);

    // A ticket for another committee is refused
    let other_committee = KeyPair::<C>::generate(&mut rng).unwrap();
    let mut other_tally = EncryptedTally::new(other_committee.public_key().clone(), 3);
    assert!(other_tally.add_ticket(&ticket).is_err());
}

#[test]
fn end_to_end_election_secp256k1() {
    end_to_end_election::<Secp256k1>();
}

#[test]
fn end_to_end_election_babyjub() {
    end_to_end_election::<BabyJub>();
}

#[test]
fn homomorphic_addition() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let committee = KeyPair::<BabyJub>::generate(&mut rng).unwrap();

    let a = VotingOptionChange::new(0, 7, sample_randomness(&mut rng), committee.public_key())
        .unwrap();
    let b = VotingOptionChange::new(0, 12, sample_randomness(&mut rng), committee.public_key())
        .unwrap();

    let randomness = *a.encrypted_randomness() + *b.encrypted_randomness();
    let masked =
        *a.encrypted_masked_voting_power_allocated() + *b.encrypted_masked_voting_power_allocated();
    let point = decrypt_to_point(committee.private_key(), &randomness, &masked);

    assert_eq!(point, CurvePoint::mul_generator(&BigUint::from(19u8)));
    assert_eq!(discrete_log(&point, 100).unwrap(), 19);
}

#[test]
fn tampered_voter_fails_membership_on_clone_only() {
    let mut rng = ChaCha20Rng::seed_from_u64(8);
    let (_, registry) = generate_sample_voting_powers::<Secp256k1, _>(&mut rng, 5, 1000).unwrap();
    let accumulator = VotingPowerAccumulator::build(&registry).unwrap();
    let copy = accumulator.clone();

    for voter in accumulator.voters().unwrap() {
        let mut tampered = voter.clone();
        tampered.voting_power += 1;
        assert!(!copy.verify_total_voting_power_of_user(&tampered));
        assert!(accumulator.verify_total_voting_power_of_user(voter));
        assert!(copy.verify_total_voting_power_of_user(voter));
    }
}

#[test]
fn random_allocations_always_build() {
    let mut rng = ChaCha20Rng::seed_from_u64(9);
    let (voters, registry) = generate_sample_voting_powers::<BabyJub, _>(&mut rng, 4, 50).unwrap();
    let committee = KeyPair::<BabyJub>::generate(&mut rng).unwrap();
    let accumulator = VotingPowerAccumulator::build(&registry).unwrap();

    for (voter, power) in voters.iter().zip(registry.iter()) {
        let allocation = generate_random_vote_power_allocation(&mut rng, power.voting_power, 4);
        let ticket = build_voting_ticket_with_rng(
            &mut rng,
            &allocation,
            4,
            voter,
            &accumulator,
            committee.public_key(),
        )
        .unwrap();
        assert!(ticket.verify_against_root(&accumulator.root()).unwrap());
    }
}

#[test]
fn registry_json_to_ticket() {
    let context = EccContext::with_curve(CurveKind::Secp256k1);
    let voter = context.gen_key_pair().unwrap();
    let other = context.gen_key_pair().unwrap();

    let json = format!(
        r#"[
            {{"publicKey": "{}", "votingPower": 3}},
            {{"publicKey": "{}", "votingPower": 4}}
        ]"#,
        voter.public_key, other.public_key
    );
    let entries: Vec<RegistryEntry> = serde_json::from_str(&json).unwrap();
    let accumulator = VotingPowerAccumulator::<Secp256k1>::from_registry(&entries).unwrap();

    let pair = KeyPair::<Secp256k1>::from_hex(&voter.private_key, &voter.public_key).unwrap();
    let committee = generate_keypair::<Secp256k1>().unwrap();
    let ticket =
        build_voting_ticket(&[1, 2], 2, &pair, &accumulator, committee.public_key()).unwrap();

    assert_eq!(
        ticket.valid_voter_merkle_proof().value,
        fr_from_decimal(&context.voter_id(&voter.public_key).unwrap())
    );
}

fn fr_from_decimal(s: &str) -> Fr {
    fr_from_biguint(&BigUint::parse_bytes(s.as_bytes(), 10).unwrap())
}
