use libsecp256k1::{Message, PublicKey, SecretKey, Signature};
use rand::RngCore;
use std::fmt::{Debug, Formatter};

use super::{decode_fixed, encode_hex, Address, CryptoError, Hash};

pub const SECRET_KEY_SIZE: usize = 32;
pub const PUBLIC_KEY_SIZE: usize = 33;
pub const SIGNATURE_SIZE: usize = 64;

/// secp256k1 account key pair
#[derive(Clone)]
pub struct KeyPair {
    secret: SecretKey,
    public: PublicKey,
    address: Address,
}

impl KeyPair {
    pub fn from_secret_bytes(bytes: &[u8; SECRET_KEY_SIZE]) -> Result<Self, CryptoError> {
        let secret = SecretKey::parse(bytes).map_err(|_| CryptoError::InvalidSecretKey)?;
        let public = PublicKey::from_secret_key(&secret);
        let address = Address::from_public_key(&public.serialize_compressed());

        Ok(Self {
            secret,
            public,
            address,
        })
    }

    pub fn from_private_key_hex(value: &str) -> Result<Self, CryptoError> {
        let bytes = decode_fixed::<SECRET_KEY_SIZE>(value)?;
        Self::from_secret_bytes(&bytes)
    }

    /// Generate a fresh key pair, resampling the rare out-of-range scalars
    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        loop {
            let mut bytes = [0u8; SECRET_KEY_SIZE];
            rng.fill_bytes(&mut bytes);
            if let Ok(key_pair) = Self::from_secret_bytes(&bytes) {
                return key_pair;
            }
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn public_key(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.public.serialize_compressed()
    }

    pub fn private_key_hex(&self) -> String {
        encode_hex(self.secret.serialize())
    }

    pub fn sign(&self, hash: &Hash) -> [u8; SIGNATURE_SIZE] {
        let message = Message::parse(hash.as_bytes());
        let (signature, _) = libsecp256k1::sign(&message, &self.secret);
        signature.serialize()
    }
}

impl Debug for KeyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Check a compact signature over `hash` against a compressed public key
pub fn verify_signature(
    hash: &Hash,
    signature: &[u8],
    public_key: &[u8],
) -> Result<bool, CryptoError> {
    let public =
        PublicKey::parse_slice(public_key, None).map_err(|_| CryptoError::InvalidPublicKey)?;
    let signature =
        Signature::parse_standard_slice(signature).map_err(|_| CryptoError::InvalidSignature)?;
    let message = Message::parse(hash.as_bytes());
    Ok(libsecp256k1::verify(&message, &signature, &public))
}
