//! Baby Jubjub, the twisted Edwards curve `a*x^2 + y^2 = 1 + d*x^2*y^2` defined
//! over the BN254 scalar field, with the circomlib parameters and generator.
//!
//! Group arithmetic is done by `babyjubjub_rs`. Points are kept with arkworks
//! coordinates so they share the field of the voting power tree.

use crate::field::{field_modulus, fr_from_biguint, fr_to_biguint, fr_to_bytes_be, fr_to_string};
use crate::field::{sample_randomness, Fr};
use crate::group::{CurveKind, EllipticCurveGroup};
use crate::Error;
use ark_ff::{Field, MontFp, One, Zero};
use babyjubjub_rs::Point;
use num_bigint::{BigInt, BigUint};
use rand::{CryptoRng, RngCore};

type JubJubFr = babyjubjub_rs::Fr;

/// circomlib `Base8`; `babyjubjub_rs` keeps its own copy private.
fn b8() -> Point {
    Point {
        x: <JubJubFr as ff_ce::PrimeField>::from_str(
            "5299619240641551281634865583518297030282874472190772894086521144482721001553",
        )
        .unwrap(),
        y: <JubJubFr as ff_ce::PrimeField>::from_str(
            "16950150798460657717958625567821834550301663161624707787222815936182638968203",
        )
        .unwrap(),
    }
}

pub const BABYJUB_A: Fr = MontFp!("168700");
pub const BABYJUB_D: Fr = MontFp!("168696");

/// Order of the subgroup generated by `Base8`. It is smaller than the field
/// modulus, so it fits in a field element.
const BABYJUB_SUBORDER: Fr =
    MontFp!("2736030358979909402780800718157159386076813972158567259200215660948447373041");

const COORDINATE_BYTES: usize = 32;
/// Each byte is written as a zero padded 4 digit hex word.
const HEX_DIGITS_PER_BYTE: usize = 4;
pub const BABYJUB_POINT_HEX_LENGTH: usize = 2 * COORDINATE_BYTES * HEX_DIGITS_PER_BYTE;

/// An affine Baby Jubjub point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BabyJubPoint {
    pub x: Fr,
    pub y: Fr,
}

impl BabyJubPoint {
    /// Build a point from coordinates, checking the curve equation.
    pub fn new(x: Fr, y: Fr) -> Result<Self, Error> {
        let point = BabyJubPoint { x, y };
        if !point.in_curve() {
            return Err(Error::PointNotOnCurve);
        }
        Ok(point)
    }

    pub fn in_curve(&self) -> bool {
        let x2 = self.x.square();
        let y2 = self.y.square();
        BABYJUB_A * x2 + y2 == Fr::one() + BABYJUB_D * x2 * y2
    }

    /// True when the point lies in the prime order subgroup generated by `Base8`.
    pub fn in_subgroup(&self) -> bool {
        if !self.in_curve() {
            return false;
        }
        BabyJub::scalar_mul(self, &BabyJub::subgroup_order()) == BabyJub::identity()
    }
}

// Both libraries work over the BN254 scalar field, so a canonical element
// always converts.
fn to_jubjub_fr(element: &Fr) -> JubJubFr {
    <JubJubFr as ff_ce::PrimeField>::from_str(&fr_to_string(element, 10))
        .unwrap_or_else(<JubJubFr as ff_ce::Field>::zero)
}

fn from_jubjub_fr(element: &JubJubFr) -> Fr {
    let value = BigUint::parse_bytes(ff_ce::to_hex(element).as_bytes(), 16).unwrap_or_default();
    fr_from_biguint(&value)
}

fn to_jubjub(point: &BabyJubPoint) -> Point {
    Point {
        x: to_jubjub_fr(&point.x),
        y: to_jubjub_fr(&point.y),
    }
}

fn from_jubjub(point: &Point) -> BabyJubPoint {
    BabyJubPoint {
        x: from_jubjub_fr(&point.x),
        y: from_jubjub_fr(&point.y),
    }
}

/// Baby Jubjub backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BabyJub;

impl BabyJub {
    pub fn subgroup_order() -> BigUint {
        fr_to_biguint(&BABYJUB_SUBORDER)
    }
}

fn decode_coordinate(words: &str) -> Result<Fr, Error> {
    let mut bytes = [0u8; COORDINATE_BYTES];
    for (i, byte) in bytes.iter_mut().enumerate() {
        let word = &words[i * HEX_DIGITS_PER_BYTE..(i + 1) * HEX_DIGITS_PER_BYTE];
        let value = u16::from_str_radix(word, 16)
            .map_err(|_| Error::InvalidPointEncoding(format!("bad hex word {}", word)))?;
        if value > 0xff {
            return Err(Error::InvalidPointEncoding(format!(
                "word {} does not hold a byte",
                word
            )));
        }
        *byte = value as u8;
    }

    let value = BigUint::from_bytes_be(&bytes);
    if value >= field_modulus() {
        return Err(Error::InvalidPointEncoding(
            "coordinate is not a canonical field element".to_owned(),
        ));
    }
    Ok(fr_from_biguint(&value))
}

impl EllipticCurveGroup for BabyJub {
    type Point = BabyJubPoint;

    const KIND: CurveKind = CurveKind::BabyJub;
    const PRIVATE_KEY_HEX_LENGTH: (usize, usize) = (64, 64);
    const PUBLIC_KEY_HEX_LENGTHS: &'static [usize] = &[BABYJUB_POINT_HEX_LENGTH];

    fn generator() -> BabyJubPoint {
        from_jubjub(&b8())
    }

    fn identity() -> BabyJubPoint {
        BabyJubPoint {
            x: Fr::zero(),
            y: Fr::one(),
        }
    }

    fn add(lhs: &BabyJubPoint, rhs: &BabyJubPoint) -> BabyJubPoint {
        let sum = to_jubjub(lhs)
            .projective()
            .add(&to_jubjub(rhs).projective())
            .affine();
        from_jubjub(&sum)
    }

    fn negate(point: &BabyJubPoint) -> BabyJubPoint {
        BabyJubPoint {
            x: -point.x,
            y: point.y,
        }
    }

    fn scalar_mul(point: &BabyJubPoint, scalar: &BigUint) -> BabyJubPoint {
        from_jubjub(&to_jubjub(point).mul_scalar(&BigInt::from(scalar.clone())))
    }

    fn x(point: &BabyJubPoint) -> BigUint {
        fr_to_biguint(&point.x)
    }

    fn y(point: &BabyJubPoint) -> BigUint {
        fr_to_biguint(&point.y)
    }

    fn encode(point: &BabyJubPoint) -> Result<String, Error> {
        if !point.in_curve() {
            return Err(Error::PointNotOnCurve);
        }
        let mut out = String::with_capacity(BABYJUB_POINT_HEX_LENGTH);
        for coordinate in [&point.x, &point.y] {
            for byte in fr_to_bytes_be(coordinate).iter() {
                out.push_str(&format!("{:04x}", byte));
            }
        }
        Ok(out)
    }

    /// Only points of the prime order subgroup, other than the identity,
    /// decode.
    fn decode(hex: &str) -> Result<BabyJubPoint, Error> {
        if hex.len() != BABYJUB_POINT_HEX_LENGTH {
            return Err(Error::InvalidPointEncoding(format!(
                "expected {} hex characters, found {}",
                BABYJUB_POINT_HEX_LENGTH,
                hex.len()
            )));
        }
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidPointEncoding(
                "point is not a hex string".to_owned(),
            ));
        }
        let half = BABYJUB_POINT_HEX_LENGTH / 2;
        let x = decode_coordinate(&hex[..half])?;
        let y = decode_coordinate(&hex[half..])?;
        let point = BabyJubPoint::new(x, y)?;

        if point == Self::identity() {
            return Err(Error::IdentityPoint);
        }
        if !point.in_subgroup() {
            return Err(Error::PointNotInSubgroup);
        }
        Ok(point)
    }

    fn generate_private_key<R: RngCore + CryptoRng>(rng: &mut R) -> String {
        format!("{:0>64}", sample_randomness(rng).to_str_radix(16))
    }

    // Not a signature scheme: anyone holding the public key can compute this value.
    fn sign_prehash(private_key: &BigUint, prehash: &[u8]) -> Result<String, Error> {
        let public_key = Self::scalar_mul(&Self::generator(), private_key);
        let digest = BigUint::from_bytes_be(prehash);
        Self::encode(&Self::scalar_mul(&public_key, &digest))
    }

    fn verify_prehash(public_key: &BabyJubPoint, prehash: &[u8], signature: &str) -> bool {
        let digest = BigUint::from_bytes_be(prehash);
        match Self::encode(&Self::scalar_mul(public_key, &digest)) {
            Ok(expected) => expected == signature,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn fr(s: &str) -> Fr {
        Fr::from_str(s).unwrap()
    }

    fn low_order_point() -> BabyJubPoint {
        BabyJubPoint::new(Fr::zero(), -Fr::one()).unwrap()
    }

    #[test]
    fn test_add_known_points() {
        let p = BabyJubPoint::new(
            fr("17777552123799933955779906779655732241715742912184938656739573121738514868268"),
            fr("2626589144620713026669568689430873010625803728049924121243784502389097019475"),
        )
        .unwrap();
        let q = BabyJubPoint::new(
            fr("16540640123574156134436876038791482806971768689494387082833631921987005038935"),
            fr("20819045374670962167435360035096875258406992893633759881276124905556507972311"),
        )
        .unwrap();

        let sum = BabyJub::add(&p, &q);
        assert_eq!(
            sum.x,
            fr("7916061937171219682591368294088513039687205273691143098332585753343424131937")
        );
        assert_eq!(
            sum.y,
            fr("14035240266687799601661095864649209771790948434046947201833777492504781204499")
        );
    }

    #[test]
    fn test_double_known_point() {
        let p = BabyJubPoint::new(
            fr("17777552123799933955779906779655732241715742912184938656739573121738514868268"),
            fr("2626589144620713026669568689430873010625803728049924121243784502389097019475"),
        )
        .unwrap();

        let doubled = BabyJub::add(&p, &p);
        assert_eq!(
            doubled.x,
            fr("6890855772600357754907169075114257697580319025794532037257385534741338397365")
        );
        assert_eq!(
            doubled.y,
            fr("4338620300185947561074059802482547481416142213883829469920100239455078257889")
        );
        assert_eq!(BabyJub::scalar_mul(&p, &BigUint::from(2u8)), doubled);
    }

    #[test]
    fn test_identity() {
        let zero = BabyJub::identity();
        assert_eq!(BabyJub::add(&zero, &zero), zero);
        assert!(zero.in_curve());
        assert_eq!(
            BabyJub::scalar_mul(&BabyJub::generator(), &BigUint::default()),
            zero
        );
    }

    #[test]
    fn test_generator_is_base8() {
        let g = BabyJub::generator();
        assert_eq!(
            g.x,
            fr("5299619240641551281634865583518297030282874472190772894086521144482721001553")
        );
        assert_eq!(
            g.y,
            fr("16950150798460657717958625567821834550301663161624707787222815936182638968203")
        );
        assert!(g.in_curve());
        assert!(g.in_subgroup());
        assert_eq!(
            BabyJub::scalar_mul(&g, &BabyJub::subgroup_order()),
            BabyJub::identity()
        );
    }

    #[test]
    fn test_encoding() {
        let g = BabyJub::generator();
        let encoded = BabyJub::encode(&g).unwrap();
        assert_eq!(encoded.len(), 256);
        assert!(encoded.starts_with("00"));
        assert_eq!(BabyJub::decode(&encoded).unwrap(), g);

        // A word that does not hold a byte
        let mut bad = encoded.clone();
        bad.replace_range(0..4, "0100");
        assert!(BabyJub::decode(&bad).is_err());

        // Signs are not hex digits
        let mut signed = encoded.clone();
        signed.replace_range(0..4, "+0ff");
        assert!(matches!(
            BabyJub::decode(&signed),
            Err(Error::InvalidPointEncoding(_))
        ));

        // Not on the curve
        let mut off_curve = encoded.clone();
        off_curve.replace_range(252..256, "0000");
        assert!(matches!(
            BabyJub::decode(&off_curve),
            Err(Error::PointNotOnCurve)
        ));

        assert!(BabyJub::decode(&encoded[..128]).is_err());
    }

    #[test]
    fn test_small_subgroup_points_rejected() {
        let low = low_order_point();
        assert!(!low.in_subgroup());
        assert_eq!(BabyJub::add(&low, &low), BabyJub::identity());

        let encoded = BabyJub::encode(&low).unwrap();
        assert!(matches!(
            BabyJub::decode(&encoded),
            Err(Error::PointNotInSubgroup)
        ));

        // On the curve but outside the subgroup
        let mixed = BabyJub::add(&low, &BabyJub::generator());
        assert!(mixed.in_curve());
        assert!(matches!(
            BabyJub::decode(&BabyJub::encode(&mixed).unwrap()),
            Err(Error::PointNotInSubgroup)
        ));

        let identity = BabyJub::encode(&BabyJub::identity()).unwrap();
        assert!(matches!(
            BabyJub::decode(&identity),
            Err(Error::IdentityPoint)
        ));
    }

    #[test]
    fn test_off_curve_point_rejected() {
        assert!(matches!(
            BabyJubPoint::new(Fr::from(1u64), Fr::from(1u64)),
            Err(Error::PointNotOnCurve)
        ));
    }
}
