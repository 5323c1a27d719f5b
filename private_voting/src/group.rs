//! Curve-agnostic group abstraction.
//!
//! Every key, ciphertext and accumulator type in this crate is generic over an
//! [`EllipticCurveGroup`]. The two backends are [`Secp256k1`](crate::Secp256k1),
//! used for general purpose signing, and [`BabyJub`](crate::BabyJub), the
//! SNARK-friendly twisted Edwards curve used inside proofs.

use crate::Error;
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

/// Operations a curve backend provides to the rest of the crate.
pub trait EllipticCurveGroup:
    Copy + Clone + fmt::Debug + PartialEq + Eq + Send + Sync + 'static
{
    /// Backend-native point representation.
    type Point: Copy + Clone + PartialEq + fmt::Debug + Send + Sync;

    const KIND: CurveKind;

    /// Inclusive bounds on the length of a private key hex string.
    const PRIVATE_KEY_HEX_LENGTH: (usize, usize);

    /// Accepted lengths of a public key hex string.
    const PUBLIC_KEY_HEX_LENGTHS: &'static [usize];

    fn generator() -> Self::Point;

    fn identity() -> Self::Point;

    fn add(lhs: &Self::Point, rhs: &Self::Point) -> Self::Point;

    fn negate(point: &Self::Point) -> Self::Point;

    fn scalar_mul(point: &Self::Point, scalar: &BigUint) -> Self::Point;

    fn x(point: &Self::Point) -> BigUint;

    fn y(point: &Self::Point) -> BigUint;

    fn encode(point: &Self::Point) -> Result<String, Error>;

    fn decode(hex: &str) -> Result<Self::Point, Error>;

    /// Fresh private key as a hex string accepted by [`PrivateKey::new`](crate::PrivateKey::new).
    fn generate_private_key<R: RngCore + CryptoRng>(rng: &mut R) -> String;

    /// Sign a 16 byte folded digest, returning the signature as hex.
    fn sign_prehash(private_key: &BigUint, prehash: &[u8]) -> Result<String, Error>;

    fn verify_prehash(public_key: &Self::Point, prehash: &[u8], signature: &str) -> bool;
}

/// The supported curve backends, selectable by name at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveKind {
    Secp256k1,
    BabyJub,
}

impl CurveKind {
    pub fn name(&self) -> &'static str {
        match self {
            CurveKind::Secp256k1 => "secp256k1",
            CurveKind::BabyJub => "babyjub",
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CurveKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "secp256k1" => Ok(CurveKind::Secp256k1),
            "babyjub" => Ok(CurveKind::BabyJub),
            _ => Err(Error::InvalidContext(format!(
                "{} is not a supported ECC curve",
                s
            ))),
        }
    }
}

/// A group element of the curve `C`.
pub struct CurvePoint<C: EllipticCurveGroup>(C::Point);

impl<C: EllipticCurveGroup> CurvePoint<C> {
    pub fn from_raw(point: C::Point) -> Self {
        CurvePoint(point)
    }

    pub fn generator() -> Self {
        CurvePoint(C::generator())
    }

    pub fn identity() -> Self {
        CurvePoint(C::identity())
    }

    pub fn raw(&self) -> &C::Point {
        &self.0
    }

    pub fn scalar_mul(&self, k: &BigUint) -> Self {
        CurvePoint(C::scalar_mul(&self.0, k))
    }

    /// `k * G`
    pub fn mul_generator(k: &BigUint) -> Self {
        Self::generator().scalar_mul(k)
    }

    pub fn x(&self) -> BigUint {
        C::x(&self.0)
    }

    pub fn y(&self) -> BigUint {
        C::y(&self.0)
    }

    pub fn encode(&self) -> Result<String, Error> {
        C::encode(&self.0)
    }

    pub fn decode(hex: &str) -> Result<Self, Error> {
        C::decode(hex).map(CurvePoint)
    }
}

impl<C: EllipticCurveGroup> Clone for CurvePoint<C> {
    fn clone(&self) -> Self {
        CurvePoint(self.0)
    }
}

impl<C: EllipticCurveGroup> Copy for CurvePoint<C> {}

impl<C: EllipticCurveGroup> PartialEq for CurvePoint<C> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<C: EllipticCurveGroup> fmt::Debug for CurvePoint<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("CurvePoint").field(&self.0).finish()
    }
}

impl<C: EllipticCurveGroup> Add for CurvePoint<C> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        CurvePoint(C::add(&self.0, &rhs.0))
    }
}

impl<C: EllipticCurveGroup> Neg for CurvePoint<C> {
    type Output = Self;

    fn neg(self) -> Self {
        CurvePoint(C::negate(&self.0))
    }
}

impl<C: EllipticCurveGroup> Sub for CurvePoint<C> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}
