//! Signing identity
//!
//! An ed25519 key derived from a 32-byte seed. Loading the seed (mnemonic,
//! keystore, ...) is the caller's business.

use crate::error::{Result, TypesError};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use std::fmt;

/// Ed25519 identity used to sign deployments and ledger calls
#[derive(Clone)]
pub struct Identity {
    key: SigningKey,
}

impl Identity {
    /// Create an identity from a raw 32-byte seed
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(&seed),
        }
    }

    /// Create an identity from a hex-encoded seed, with or without `0x`
    pub fn from_hex_seed(seed: &str) -> Result<Self> {
        let raw = hex::decode(seed.trim_start_matches("0x"))
            .map_err(|e| TypesError::InvalidSeed(e.to_string()))?;
        let seed: [u8; 32] = raw
            .try_into()
            .map_err(|v: Vec<u8>| TypesError::InvalidSeed(format!("expected 32 bytes, got {}", v.len())))?;
        Ok(Self::from_seed(seed))
    }

    pub fn public_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }

    /// Hex-encoded public key
    pub fn address(&self) -> String {
        hex::encode(self.public_key().as_bytes())
    }

    /// Sign a message, returning the raw 64-byte signature
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.key.sign(message).to_bytes()
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for Identity {}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("public_key", &self.address())
            .finish()
    }
}
