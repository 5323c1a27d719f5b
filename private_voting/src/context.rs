//! String-level facade over the curve backends.
//!
//! An `EccContext` carries the selected curve explicitly. Each call resolves
//! the backend with a single match and then runs the generic operation, so
//! two contexts on different curves can be used side by side.

use crate::config::Config;
use crate::ecdh;
use crate::group::{CurveKind, CurvePoint, EllipticCurveGroup};
use crate::keys::{KeyPair, PrivateKey, PublicKey};
use crate::{BabyJub, Error, Secp256k1};
use rand::rngs::OsRng;

/// A key pair as hex strings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyStringPair {
    pub private_key: String,
    pub public_key: String,
}

impl<C: EllipticCurveGroup> From<&KeyPair<C>> for KeyStringPair {
    fn from(pair: &KeyPair<C>) -> Self {
        KeyStringPair {
            private_key: pair.private_key().as_hex().to_owned(),
            public_key: pair.public_key().as_hex().to_owned(),
        }
    }
}

/// Run `$body` with `$curve` bound to the backend type selected by `$kind`.
macro_rules! with_curve {
    ($kind:expr, $curve:ident => $body:expr) => {
        match $kind {
            CurveKind::Secp256k1 => {
                type $curve = Secp256k1;
                $body
            }
            CurveKind::BabyJub => {
                type $curve = BabyJub;
                $body
            }
        }
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EccContext {
    curve: Option<CurveKind>,
}

impl EccContext {
    /// A context with no curve selected yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_curve(curve: CurveKind) -> Self {
        EccContext { curve: Some(curve) }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_curve(config.curve)
    }

    /// Select a curve by name. An unknown name leaves the context unchanged.
    pub fn init(&mut self, name: &str) -> Result<CurveKind, Error> {
        let curve: CurveKind = name.parse()?;
        self.curve = Some(curve);
        debug!("ECC context initialised with {}", curve);
        Ok(curve)
    }

    pub fn curve(&self) -> Result<CurveKind, Error> {
        self.curve
            .ok_or_else(|| Error::InvalidContext("ECC context is not initialised".to_owned()))
    }

    /// The generator of the selected curve, hex encoded. Fails if no curve
    /// was selected.
    pub fn assert_initialized(&self) -> Result<String, Error> {
        with_curve!(self.curve()?, C => CurvePoint::<C>::generator().encode())
    }

    pub fn generator(&self) -> Result<String, Error> {
        self.assert_initialized()
    }

    pub fn gen_key_pair(&self) -> Result<KeyStringPair, Error> {
        with_curve!(self.curve()?, C => {
            let pair = KeyPair::<C>::generate(&mut OsRng)?;
            Ok(KeyStringPair::from(&pair))
        })
    }

    /// Public key hex for a private key hex.
    pub fn public_key_of(&self, private_key: &str) -> Result<String, Error> {
        with_curve!(self.curve()?, C => {
            let public = PrivateKey::<C>::new(private_key)?.public_key()?;
            Ok(public.as_hex().to_owned())
        })
    }

    pub fn ecdh_encrypt(
        &self,
        private_key: &str,
        public_key: &str,
        message: &str,
    ) -> Result<String, Error> {
        with_curve!(self.curve()?, C => ecdh::ecdh_encrypt(
            &PrivateKey::<C>::new(private_key)?,
            &PublicKey::<C>::new(public_key)?,
            message.as_bytes(),
        ))
    }

    pub fn ecdh_decrypt(
        &self,
        private_key: &str,
        public_key: &str,
        ciphertext: &str,
    ) -> Result<String, Error> {
        let plaintext = with_curve!(self.curve()?, C => ecdh::ecdh_decrypt(
            &PrivateKey::<C>::new(private_key)?,
            &PublicKey::<C>::new(public_key)?,
            ciphertext,
        ))?;
        String::from_utf8(plaintext).map_err(|_| Error::DecryptionError)
    }

    pub fn ecdsa_sign(&self, private_key: &str, message: &str) -> Result<String, Error> {
        with_curve!(self.curve()?, C => ecdh::ecdsa_sign(
            &PrivateKey::<C>::new(private_key)?,
            message.as_bytes(),
        ))
    }

    /// Malformed keys are errors; a signature that does not match is `false`.
    pub fn ecdsa_verify(
        &self,
        public_key: &str,
        message: &str,
        signature: &str,
    ) -> Result<bool, Error> {
        with_curve!(self.curve()?, C => Ok(ecdh::ecdsa_verify(
            &PublicKey::<C>::new(public_key)?,
            message.as_bytes(),
            signature,
        )))
    }

    /// Voter id of a public key, as a decimal string.
    pub fn voter_id(&self, public_key: &str) -> Result<String, Error> {
        with_curve!(self.curve()?, C => {
            let id = PublicKey::<C>::new(public_key)?.voter_id();
            Ok(crate::field::fr_to_string(&id, 10))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialised_context() {
        let context = EccContext::new();
        assert!(matches!(
            context.assert_initialized(),
            Err(Error::InvalidContext(_))
        ));
        assert!(matches!(
            context.gen_key_pair(),
            Err(Error::InvalidContext(_))
        ));
    }

    #[test]
    fn test_init() {
        let mut context = EccContext::new();
        assert!(matches!(
            context.init("ed25519"),
            Err(Error::InvalidContext(_))
        ));
        assert!(context.curve().is_err());

        assert_eq!(context.init("babyjub").unwrap(), CurveKind::BabyJub);
        assert_eq!(context.assert_initialized().unwrap().len(), 256);

        assert_eq!(context.init("secp256k1").unwrap(), CurveKind::Secp256k1);
        assert!(context
            .generator()
            .unwrap()
            .starts_with("0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"));
    }

    fn check_round_trips(curve: CurveKind) {
        let context = EccContext::with_curve(curve);
        let alice = context.gen_key_pair().unwrap();
        let bob = context.gen_key_pair().unwrap();
        assert_eq!(
            context.public_key_of(&alice.private_key).unwrap(),
            alice.public_key
        );

        let message = "hello committee";
        let encrypted = context
            .ecdh_encrypt(&alice.private_key, &bob.public_key, message)
            .unwrap();
        let decrypted = context
            .ecdh_decrypt(&bob.private_key, &alice.public_key, &encrypted)
            .unwrap();
        assert_eq!(decrypted, message);

        let signature = context.ecdsa_sign(&alice.private_key, message).unwrap();
        assert!(context
            .ecdsa_verify(&alice.public_key, message, &signature)
            .unwrap());
        assert!(!context
            .ecdsa_verify(&bob.public_key, message, &signature)
            .unwrap());

        assert!(context.voter_id(&alice.public_key).is_ok());
        assert!(context.voter_id("abc").is_err());
    }

    #[test]
    fn test_round_trips_secp256k1() {
        check_round_trips(CurveKind::Secp256k1);
    }

    #[test]
    fn test_round_trips_babyjub() {
        check_round_trips(CurveKind::BabyJub);
    }

    #[test]
    fn test_contexts_are_independent() {
        let secp = EccContext::with_curve(CurveKind::Secp256k1);
        let babyjub = EccContext::with_curve(CurveKind::BabyJub);
        let secp_pair = secp.gen_key_pair().unwrap();

        // A secp256k1 key is not a Baby Jubjub key
        assert!(babyjub.voter_id(&secp_pair.public_key).is_err());
        assert!(secp.voter_id(&secp_pair.public_key).is_ok());
    }
}
