/// Depth of the voting power tree. Every merkle proof is padded to this many siblings.
pub const SMT_LEVEL: usize = 10;

/// Two leaves per voter, so the largest leaf key is `2 * MAX_NUMBER_OF_VOTERS`.
pub const MAX_NUMBER_OF_VOTERS: usize = 256;

/// Smallest tree depth whose key space holds every leaf key up to `2 * MAX_NUMBER_OF_VOTERS`.
pub const MIN_SMT_LEVEL: usize = (usize::BITS - (2 * MAX_NUMBER_OF_VOTERS).leading_zeros()) as usize;

/// Keys are field elements, so no path is longer than 256 bits.
pub const MAX_SMT_LEVEL: usize = 256;

pub const MAX_NUMBER_OF_VOTE_OPTIONS: usize = 8;

/// Upper bound on the voting power of a single voter (not on the registry total).
pub const MAX_TOTAL_VOTING_POWER: u64 = 1_000_000_000;

/// Ticket randomness and Baby Jubjub private keys are sampled below `2^253`.
pub const MAX_NUM_BITS_OF_RANDOMNESS: u64 = 253;
