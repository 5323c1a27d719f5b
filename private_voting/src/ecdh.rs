//! ECDH message encryption and message signing over either curve.
//!
//! The symmetric layer is AES-128-CBC with the fixed IV `[0, 1, .., 15]` and
//! zero padding. It is deterministic: the same shared key and plaintext always
//! give the same ciphertext, so it must not be relied on for semantic security.

use crate::group::EllipticCurveGroup;
use crate::keys::{PrivateKey, PublicKey};
use crate::Error;
use aes::Aes128;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use sha2::{Digest, Sha256};

const AES_BLOCK_SIZE: usize = 16;
const AES_KEY_LENGTH: usize = 16;

const AES_IV: [u8; AES_BLOCK_SIZE] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Shrink a byte string to at most 16 bytes by XOR-ing the last byte into the
/// byte 16 positions before it and dropping it, until 16 bytes remain.
pub fn fold_to_16_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut folded = bytes.to_vec();
    while folded.len() > AES_KEY_LENGTH {
        let last = folded.len() - 1;
        folded[last - AES_KEY_LENGTH] ^= folded[last];
        folded.truncate(last);
    }
    folded
}

/// AES key shared by `private_key` and the owner of `public_key`.
pub fn ecdh_shared_key<C: EllipticCurveGroup>(
    private_key: &PrivateKey<C>,
    public_key: &PublicKey<C>,
) -> Result<Vec<u8>, Error> {
    let shared = public_key.point().scalar_mul(private_key.scalar());
    let bytes = hex::decode(shared.encode()?)
        .map_err(|e| Error::InvalidPointEncoding(e.to_string()))?;
    Ok(fold_to_16_bytes(&bytes))
}

/// Encrypt `message` for the owner of `public_key`. Returns hex.
pub fn ecdh_encrypt<C: EllipticCurveGroup>(
    private_key: &PrivateKey<C>,
    public_key: &PublicKey<C>,
    message: &[u8],
) -> Result<String, Error> {
    let key = ecdh_shared_key(private_key, public_key)?;
    let cipher = Aes128CbcEnc::new_from_slices(&key, &AES_IV)
        .map_err(|e| Error::InvalidCiphertext(e.to_string()))?;

    let mut padded = message.to_vec();
    let remainder = padded.len() % AES_BLOCK_SIZE;
    if remainder != 0 {
        padded.resize(padded.len() + AES_BLOCK_SIZE - remainder, 0);
    }

    let encrypted = cipher.encrypt_padded_vec_mut::<NoPadding>(&padded);
    Ok(hex::encode(encrypted))
}

/// Decrypt a hex ciphertext produced by the owner of `public_key`. Trailing
/// NUL bytes are stripped from the plaintext.
pub fn ecdh_decrypt<C: EllipticCurveGroup>(
    private_key: &PrivateKey<C>,
    public_key: &PublicKey<C>,
    ciphertext: &str,
) -> Result<Vec<u8>, Error> {
    let encrypted =
        hex::decode(ciphertext).map_err(|e| Error::InvalidCiphertext(e.to_string()))?;
    if encrypted.len() % AES_BLOCK_SIZE != 0 {
        return Err(Error::InvalidCiphertext(format!(
            "length {} is not a multiple of the block size",
            encrypted.len()
        )));
    }
    if encrypted.is_empty() {
        return Ok(Vec::new());
    }

    let key = ecdh_shared_key(private_key, public_key)?;
    let cipher = Aes128CbcDec::new_from_slices(&key, &AES_IV)
        .map_err(|e| Error::InvalidCiphertext(e.to_string()))?;
    let mut decrypted = cipher
        .decrypt_padded_vec_mut::<NoPadding>(&encrypted)
        .map_err(|_| Error::DecryptionError)?;

    while decrypted.last() == Some(&0) {
        decrypted.pop();
    }
    Ok(decrypted)
}

/// The 16 byte value that is actually signed: the lowercase hex SHA-256
/// digest of the message, folded.
pub fn message_prehash(message: &[u8]) -> Vec<u8> {
    let digest = hex::encode(Sha256::digest(message));
    fold_to_16_bytes(digest.as_bytes())
}

pub fn ecdsa_sign<C: EllipticCurveGroup>(
    private_key: &PrivateKey<C>,
    message: &[u8],
) -> Result<String, Error> {
    C::sign_prehash(private_key.scalar(), &message_prehash(message))
}

pub fn ecdsa_verify<C: EllipticCurveGroup>(
    public_key: &PublicKey<C>,
    message: &[u8],
    signature: &str,
) -> bool {
    C::verify_prehash(public_key.point().raw(), &message_prehash(message), signature)
}
