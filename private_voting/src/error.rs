use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("private_voting: invalid context: {0}")]
    InvalidContext(String),

    #[error("private_voting: invalid private key - must be a non-empty hexadecimal string without prefix")]
    PrivateKeyBadHex,

    #[error("private_voting: invalid private key - expected {min} to {max} hex characters, found {found}")]
    PrivateKeyBadLen { min: usize, max: usize, found: usize },

    #[error("private_voting: invalid public key - must be a non-empty hexadecimal string without prefix")]
    PublicKeyBadHex,

    #[error("private_voting: invalid public key - length {0} is not a valid encoding length")]
    PublicKeyBadLen(usize),

    #[error("private_voting: invalid point encoding: {0}")]
    InvalidPointEncoding(String),

    #[error("private_voting: point is not on the curve")]
    PointNotOnCurve,

    #[error("private_voting: the identity point is not a valid key")]
    IdentityPoint,

    #[error("private_voting: point is not in the prime order subgroup")]
    PointNotInSubgroup,

    #[error("private_voting: node store already holds a tree")]
    StoreNotEmpty,

    #[error("private_voting: merkle tree depth must be between {min} and {max}, found {found}")]
    TreeDepthOutOfRange { min: usize, max: usize, found: usize },

    #[error("private_voting: private key is zero modulo the group order")]
    ZeroPrivateKey,

    #[error("private_voting: mismatched public keys")]
    MismatchedPublicKeys,

    #[error("private_voting: invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    #[error("private_voting: failed to decrypt message")]
    DecryptionError,

    #[error("private_voting: malformed signature: {0}")]
    MalformedSignature(String),

    #[error("private_voting: signing failed: {0}")]
    SigningError(String),

    #[error("private_voting: poseidon error: {0}")]
    PoseidonError(#[from] light_poseidon::PoseidonError),

    #[error("private_voting: merkle tree node {0} is missing from the store")]
    MissingNode(String),

    #[error("private_voting: merkle tree key {0} already exists")]
    DuplicateLeafKey(String),

    #[error("private_voting: merkle tree key {0} not found")]
    KeyNotFound(String),

    #[error("private_voting: merkle proof has {found} siblings, more than the tree depth {depth}")]
    ProofTooDeep { depth: usize, found: usize },

    #[error("private_voting: voting power {0} exceeds the maximum voting power")]
    VotingPowerTooLarge(u64),

    #[error("private_voting: {found} voters exceed the maximum of {max}")]
    TooManyVoters { max: usize, found: usize },

    #[error("private_voting: public key {0} is registered more than once")]
    DuplicateVoter(String),

    #[error("private_voting: vote option index {0} is out of range")]
    OptionIndexOutOfRange(usize),

    #[error("private_voting: no voting power found among the first {0} candidates")]
    DiscreteLogNotFound(u64),

    #[error("private_voting: configuration error: {0}")]
    Config(String),

    #[error("private_voting: {0}")]
    InvalidVotingTicket(#[from] InvalidVotingTicketError),
}

/// Voting ticket validation errors
///
/// Raised by the ticket builder before any ciphertext is produced, so a
/// rejected request never yields a partial ticket.
#[derive(Debug, Error)]
pub enum InvalidVotingTicketError {
    #[error("invalid voting ticket: expected {expected} allocations, found {found}")]
    WrongNumberOfAllocations { expected: usize, found: usize },

    #[error("invalid voting ticket: number of vote options must be between 1 and {max}, found {found}")]
    NumberOfOptionsOutOfRange { max: usize, found: usize },

    #[error("invalid voting ticket: you cannot vote more than {total} power! (option {option} requested {amount})")]
    OptionExceedsTotalVotingPower {
        option: usize,
        amount: u64,
        total: u64,
    },

    #[error("invalid voting ticket: user does not have the right to vote")]
    NotRegistered,

    #[error("invalid voting ticket: allocated {allocated} voting power but {registered} is registered")]
    AllocationMismatch { allocated: u64, registered: u64 },

    #[error("invalid voting ticket: the accumulator no longer holds its voter list")]
    VoterListUnavailable,

    #[error("invalid voting ticket: voter is not included in the voting power tree")]
    MembershipCheckFailed,

    #[error("invalid voting ticket: failed to build merkle proof: {0}")]
    MerkleProof(String),

    #[error("invalid voting ticket: {0}")]
    Encryption(String),
}
