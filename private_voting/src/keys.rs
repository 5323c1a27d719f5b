use crate::field::{voter_id, Fr};
use crate::group::{CurvePoint, EllipticCurveGroup};
use crate::Error;
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

fn is_hex_without_prefix(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// A private scalar kept as the hex string it was created from.
pub struct PrivateKey<C: EllipticCurveGroup> {
    hex: String,
    scalar: BigUint,
    _curve: PhantomData<C>,
}

impl<C: EllipticCurveGroup> PrivateKey<C> {
    /// Parse and validate a private key. Fails if the string is not plain
    /// hexadecimal or its length is outside the bounds of the curve.
    pub fn new(hex: &str) -> Result<Self, Error> {
        if !is_hex_without_prefix(hex) {
            return Err(Error::PrivateKeyBadHex);
        }
        let (min, max) = C::PRIVATE_KEY_HEX_LENGTH;
        if hex.len() < min || hex.len() > max {
            return Err(Error::PrivateKeyBadLen {
                min,
                max,
                found: hex.len(),
            });
        }
        let scalar = BigUint::parse_bytes(hex.as_bytes(), 16).ok_or(Error::PrivateKeyBadHex)?;

        Ok(PrivateKey {
            hex: hex.to_owned(),
            scalar,
            _curve: PhantomData,
        })
    }

    /// Fresh random key.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, Error> {
        Self::new(&C::generate_private_key(rng))
    }

    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    pub fn scalar(&self) -> &BigUint {
        &self.scalar
    }

    /// `sk * G`
    pub fn public_key(&self) -> Result<PublicKey<C>, Error> {
        let point = CurvePoint::<C>::mul_generator(&self.scalar);
        if point == CurvePoint::identity() {
            return Err(Error::ZeroPrivateKey);
        }
        PublicKey::from_point(point)
    }
}

impl<C: EllipticCurveGroup> Clone for PrivateKey<C> {
    fn clone(&self) -> Self {
        PrivateKey {
            hex: self.hex.clone(),
            scalar: self.scalar.clone(),
            _curve: PhantomData,
        }
    }
}

impl<C: EllipticCurveGroup> PartialEq for PrivateKey<C> {
    fn eq(&self, other: &Self) -> bool {
        self.scalar == other.scalar
    }
}

impl<C: EllipticCurveGroup> fmt::Debug for PrivateKey<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PrivateKey<{}>(..)", C::KIND)
    }
}

/// A curve point together with the hex string it was read from.
///
/// Two public keys are equal when their points are equal, even if one was
/// given in compressed form and the other uncompressed.
pub struct PublicKey<C: EllipticCurveGroup> {
    hex: String,
    point: CurvePoint<C>,
}

impl<C: EllipticCurveGroup> PublicKey<C> {
    pub fn new(hex: &str) -> Result<Self, Error> {
        if !is_hex_without_prefix(hex) {
            return Err(Error::PublicKeyBadHex);
        }
        if !C::PUBLIC_KEY_HEX_LENGTHS.contains(&hex.len()) {
            return Err(Error::PublicKeyBadLen(hex.len()));
        }
        let point = CurvePoint::decode(hex)?;

        Ok(PublicKey {
            hex: hex.to_owned(),
            point,
        })
    }

    /// Same checks as [`PublicKey::new`] on the encoding of `point`.
    pub fn from_point(point: CurvePoint<C>) -> Result<Self, Error> {
        Self::new(&point.encode()?)
    }

    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    pub fn point(&self) -> &CurvePoint<C> {
        &self.point
    }

    pub fn x(&self) -> BigUint {
        self.point.x()
    }

    pub fn y(&self) -> BigUint {
        self.point.y()
    }

    /// Field element identifying this key inside the voting power tree.
    pub fn voter_id(&self) -> Fr {
        voter_id(&self.x(), &self.y())
    }
}

impl<C: EllipticCurveGroup> Clone for PublicKey<C> {
    fn clone(&self) -> Self {
        PublicKey {
            hex: self.hex.clone(),
            point: self.point,
        }
    }
}

impl<C: EllipticCurveGroup> PartialEq for PublicKey<C> {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
    }
}

impl<C: EllipticCurveGroup> fmt::Debug for PublicKey<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PublicKey<{}>({})", C::KIND, self.hex)
    }
}

impl<C: EllipticCurveGroup> fmt::Display for PublicKey<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

impl<C: EllipticCurveGroup> Serialize for PublicKey<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex)
    }
}

impl<'de, C: EllipticCurveGroup> Deserialize<'de> for PublicKey<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        PublicKey::new(&hex).map_err(serde::de::Error::custom)
    }
}

/// A private key and the public key derived from it.
pub struct KeyPair<C: EllipticCurveGroup> {
    private_key: PrivateKey<C>,
    public_key: PublicKey<C>,
}

impl<C: EllipticCurveGroup> KeyPair<C> {
    /// Pair up existing keys, checking that `public == private * G`.
    pub fn new(private_key: PrivateKey<C>, public_key: PublicKey<C>) -> Result<Self, Error> {
        if private_key.public_key()? != public_key {
            return Err(Error::MismatchedPublicKeys);
        }
        Ok(KeyPair {
            private_key,
            public_key,
        })
    }

    pub fn from_private_key(private_key: PrivateKey<C>) -> Result<Self, Error> {
        let public_key = private_key.public_key()?;
        Ok(KeyPair {
            private_key,
            public_key,
        })
    }

    pub fn from_hex(private_key: &str, public_key: &str) -> Result<Self, Error> {
        Self::new(PrivateKey::new(private_key)?, PublicKey::new(public_key)?)
    }

    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, Error> {
        Self::from_private_key(PrivateKey::generate(rng)?)
    }

    pub fn private_key(&self) -> &PrivateKey<C> {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey<C> {
        &self.public_key
    }
}

impl<C: EllipticCurveGroup> Clone for KeyPair<C> {
    fn clone(&self) -> Self {
        KeyPair {
            private_key: self.private_key.clone(),
            public_key: self.public_key.clone(),
        }
    }
}

impl<C: EllipticCurveGroup> fmt::Debug for KeyPair<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BabyJub, Secp256k1};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_private_key_validation() {
        assert!(matches!(
            PrivateKey::<Secp256k1>::new("0x1234"),
            Err(Error::PrivateKeyBadHex)
        ));
        assert!(matches!(
            PrivateKey::<Secp256k1>::new(""),
            Err(Error::PrivateKeyBadHex)
        ));
        assert!(matches!(
            PrivateKey::<Secp256k1>::new(&"a".repeat(49)),
            Err(Error::PrivateKeyBadLen { found: 49, .. })
        ));
        assert!(PrivateKey::<Secp256k1>::new(&"a".repeat(50)).is_ok());
        assert!(PrivateKey::<Secp256k1>::new(&"a".repeat(65)).is_err());

        assert!(PrivateKey::<BabyJub>::new(&"1".repeat(63)).is_err());
        assert!(PrivateKey::<BabyJub>::new(&"1".repeat(64)).is_ok());
    }

    #[test]
    fn test_public_key_validation() {
        assert!(matches!(
            PublicKey::<BabyJub>::new(&"0".repeat(130)),
            Err(Error::PublicKeyBadLen(130))
        ));
        assert!(matches!(
            PublicKey::<Secp256k1>::new(&"g".repeat(66)),
            Err(Error::PublicKeyBadHex)
        ));
    }

    fn check_key_derivation<C: EllipticCurveGroup>() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let pair = KeyPair::<C>::generate(&mut rng).unwrap();

        let expected = CurvePoint::<C>::mul_generator(pair.private_key().scalar());
        assert_eq!(pair.public_key().point(), &expected);

        let reparsed = PublicKey::<C>::new(pair.public_key().as_hex()).unwrap();
        assert_eq!(&reparsed, pair.public_key());

        // Pairs are rebuilt from their hex halves
        let rebuilt = KeyPair::<C>::from_hex(
            pair.private_key().as_hex(),
            pair.public_key().as_hex(),
        )
        .unwrap();
        assert_eq!(rebuilt.public_key(), pair.public_key());

        let other = KeyPair::<C>::generate(&mut rng).unwrap();
        assert!(matches!(
            KeyPair::new(pair.private_key().clone(), other.public_key().clone()),
            Err(Error::MismatchedPublicKeys)
        ));
    }

    #[test]
    fn test_key_derivation_secp256k1() {
        check_key_derivation::<Secp256k1>();
    }

    #[test]
    fn test_key_derivation_babyjub() {
        check_key_derivation::<BabyJub>();
    }

    #[test]
    fn test_compressed_and_uncompressed_keys_are_equal() {
        let private = PrivateKey::<Secp256k1>::new(&format!("{:0>64}", "1")).unwrap();
        let public = private.public_key().unwrap();
        let compressed = PublicKey::<Secp256k1>::new(
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
        )
        .unwrap();
        assert_eq!(public, compressed);
        assert_ne!(public.as_hex(), compressed.as_hex());
        assert_eq!(public.voter_id(), compressed.voter_id());
    }

    #[test]
    fn test_low_order_public_key_rejected() {
        use crate::{BabyJubPoint, Fr};
        use ark_ff::{One, Zero};

        // (0, -1) has order two, so anything encrypted under it is public
        let low = BabyJubPoint::new(Fr::zero(), -Fr::one()).unwrap();
        let encoded = CurvePoint::<BabyJub>::from_raw(low).encode().unwrap();
        assert!(matches!(
            PublicKey::<BabyJub>::new(&encoded),
            Err(Error::PointNotInSubgroup)
        ));
        assert!(PublicKey::<BabyJub>::from_point(CurvePoint::from_raw(low)).is_err());
        assert!(PublicKey::<BabyJub>::from_point(CurvePoint::identity()).is_err());
    }

    #[test]
    fn test_zero_private_key() {
        let private = PrivateKey::<Secp256k1>::new(&"0".repeat(64)).unwrap();
        assert!(matches!(private.public_key(), Err(Error::ZeroPrivateKey)));
    }

    #[test]
    fn test_public_key_serde() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let pair = KeyPair::<BabyJub>::generate(&mut rng).unwrap();
        let json = serde_json::to_string(pair.public_key()).unwrap();
        assert_eq!(json, format!("\"{}\"", pair.public_key().as_hex()));
        let back: PublicKey<BabyJub> = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, pair.public_key());

        assert!(serde_json::from_str::<PublicKey<BabyJub>>("\"abcd\"").is_err());
    }
}
