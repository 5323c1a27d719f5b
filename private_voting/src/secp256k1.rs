//! secp256k1 backend on top of `k256`.

use crate::group::{CurveKind, EllipticCurveGroup};
use crate::Error;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{EncodedPoint, FieldBytes, NonZeroScalar, ProjectivePoint, Scalar, SecretKey, U256};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

/// Order of the secp256k1 group.
const SECP256K1_ORDER_HEX: &str =
    "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";

pub const SECP256K1_COMPRESSED_HEX_LENGTH: usize = 66;
pub const SECP256K1_UNCOMPRESSED_HEX_LENGTH: usize = 130;

/// secp256k1 backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1;

impl Secp256k1 {
    pub fn order() -> BigUint {
        // Constant is valid hex
        BigUint::parse_bytes(SECP256K1_ORDER_HEX.as_bytes(), 16).unwrap_or_default()
    }
}

/// Reduce an integer of any size modulo the group order.
fn to_scalar(value: &BigUint) -> Scalar {
    let reduced = value % Secp256k1::order();
    let bytes = reduced.to_bytes_be();
    let mut repr = [0u8; 32];
    repr[32 - bytes.len()..].copy_from_slice(&bytes);
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(repr))
}

fn signing_key(private_key: &BigUint) -> Result<SigningKey, Error> {
    let scalar: Option<NonZeroScalar> = NonZeroScalar::new(to_scalar(private_key)).into();
    scalar.map(SigningKey::from).ok_or(Error::ZeroPrivateKey)
}

fn coordinate(point: &ProjectivePoint, y: bool) -> BigUint {
    let encoded = point.to_encoded_point(false);
    let bytes = if y { encoded.y() } else { encoded.x() };
    match bytes {
        Some(bytes) => BigUint::from_bytes_be(bytes),
        None => BigUint::default(),
    }
}

impl EllipticCurveGroup for Secp256k1 {
    type Point = ProjectivePoint;

    const KIND: CurveKind = CurveKind::Secp256k1;
    const PRIVATE_KEY_HEX_LENGTH: (usize, usize) = (50, 64);
    const PUBLIC_KEY_HEX_LENGTHS: &'static [usize] = &[
        SECP256K1_COMPRESSED_HEX_LENGTH,
        SECP256K1_UNCOMPRESSED_HEX_LENGTH,
    ];

    fn generator() -> ProjectivePoint {
        ProjectivePoint::GENERATOR
    }

    fn identity() -> ProjectivePoint {
        ProjectivePoint::IDENTITY
    }

    fn add(lhs: &ProjectivePoint, rhs: &ProjectivePoint) -> ProjectivePoint {
        lhs + rhs
    }

    fn negate(point: &ProjectivePoint) -> ProjectivePoint {
        -*point
    }

    fn scalar_mul(point: &ProjectivePoint, scalar: &BigUint) -> ProjectivePoint {
        point * &to_scalar(scalar)
    }

    fn x(point: &ProjectivePoint) -> BigUint {
        coordinate(point, false)
    }

    fn y(point: &ProjectivePoint) -> BigUint {
        coordinate(point, true)
    }

    fn encode(point: &ProjectivePoint) -> Result<String, Error> {
        let encoded = point.to_encoded_point(false);
        if encoded.is_identity() {
            return Err(Error::IdentityPoint);
        }
        Ok(hex::encode(encoded.as_bytes()))
    }

    fn decode(hex: &str) -> Result<ProjectivePoint, Error> {
        if !Self::PUBLIC_KEY_HEX_LENGTHS.contains(&hex.len()) {
            return Err(Error::InvalidPointEncoding(format!(
                "{} is not a SEC1 point length",
                hex.len()
            )));
        }
        let bytes =
            hex::decode(hex).map_err(|e| Error::InvalidPointEncoding(e.to_string()))?;
        let encoded = EncodedPoint::from_bytes(&bytes)
            .map_err(|e| Error::InvalidPointEncoding(e.to_string()))?;
        let point: Option<ProjectivePoint> = ProjectivePoint::from_encoded_point(&encoded).into();
        point.ok_or(Error::PointNotOnCurve)
    }

    fn generate_private_key<R: RngCore + CryptoRng>(rng: &mut R) -> String {
        hex::encode(SecretKey::random(rng).to_bytes())
    }

    fn sign_prehash(private_key: &BigUint, prehash: &[u8]) -> Result<String, Error> {
        let signature: Signature = signing_key(private_key)?
            .sign_prehash(prehash)
            .map_err(|e| Error::SigningError(e.to_string()))?;
        Ok(hex::encode(signature.to_der().as_bytes()))
    }

    fn verify_prehash(public_key: &ProjectivePoint, prehash: &[u8], signature: &str) -> bool {
        let verifying_key = match VerifyingKey::from_affine(public_key.to_affine()) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let signature = match hex::decode(signature)
            .ok()
            .and_then(|der| Signature::from_der(&der).ok())
        {
            Some(signature) => signature,
            None => return false,
        };
        verifying_key.verify_prehash(prehash, &signature).is_ok()
    }
}
