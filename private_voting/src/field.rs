//! Helpers around the BN254 scalar field, the prime field shared by the voting
//! power tree, the Poseidon hash and the Baby Jubjub coordinates.

use crate::constants::MAX_NUM_BITS_OF_RANDOMNESS;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

pub use ark_bn254::Fr;

/// Reduce an arbitrary integer into the field.
pub fn fr_from_biguint(value: &BigUint) -> Fr {
    Fr::from_be_bytes_mod_order(&value.to_bytes_be())
}

/// Canonical integer representative of a field element.
pub fn fr_to_biguint(element: &Fr) -> BigUint {
    BigUint::from_bytes_be(&element.into_bigint().to_bytes_be())
}

/// Canonical big-endian 32 byte representation of a field element.
pub fn fr_to_bytes_be(element: &Fr) -> [u8; 32] {
    let bytes = element.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Render a field element in the given radix (2..=36).
pub fn fr_to_string(element: &Fr, radix: u32) -> String {
    fr_to_biguint(element).to_str_radix(radix)
}

/// The field modulus `r`.
pub fn field_modulus() -> BigUint {
    BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be())
}

/// Least-significant-first bits of a field element, always 256 long.
pub fn key_bits(element: &Fr) -> Vec<bool> {
    let mut bits = element.into_bigint().to_bits_le();
    bits.resize(256, false);
    bits
}

/// Collapse a point `(x, y)` into a single field element: `x*y + x + y mod r`.
pub fn voter_id(x: &BigUint, y: &BigUint) -> Fr {
    let u = fr_from_biguint(x);
    let v = fr_from_biguint(y);
    u * v + u + v
}

/// Sample an integer uniformly from `[0, 2^253)`, rejecting 256-bit draws above the bound.
pub fn sample_randomness<R: RngCore + CryptoRng>(rng: &mut R) -> BigUint {
    let bound = BigUint::from(1u8) << MAX_NUM_BITS_OF_RANDOMNESS;
    loop {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        let candidate = BigUint::from_bytes_be(&bytes);
        if candidate < bound {
            return candidate;
        }
    }
}
