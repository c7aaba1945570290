//! # Key Management
//!
//! This module handles cryptographic key generation and management.
//!
//! ## Key Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          KEY TYPES                                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SymmetricKey (AES)                                             │   │
//! │  │  ──────────────────                                              │   │
//! │  │                                                                  │   │
//! │  │  Purpose:                                                       │   │
//! │  │  • Sealing and opening envelopes (AES-GCM)                      │   │
//! │  │                                                                  │   │
//! │  │  Format:                                                        │   │
//! │  │  • 16, 24 or 32 raw bytes (zeroized on drop)                   │   │
//! │  │  • Stored on disk as lowercase hex                             │   │
//! │  │                                                                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  KeyPair (ECDSA P-256)                                          │   │
//! │  │  ─────────────────────                                           │   │
//! │  │                                                                  │   │
//! │  │  Purpose:                                                       │   │
//! │  │  • Producing detached signatures                                │   │
//! │  │                                                                  │   │
//! │  │  Format:                                                        │   │
//! │  │  • Private scalar: 32 bytes (zeroized on drop)                 │   │
//! │  │  • Public point: always derived as scalar · G                  │   │
//! │  │                                                                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  PublicKey (P-256 point)                                        │   │
//! │  │  ───────────────────────                                         │   │
//! │  │                                                                  │   │
//! │  │  Shared freely; verifies signatures made by the key pair.      │   │
//! │  │                                                                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Equality on all key types compares the underlying values. Secret values
//! are compared in constant time.

use std::fmt;

use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::elliptic_curve::subtle::ConstantTimeEq;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::entropy;
use crate::error::{Error, Result};

// ============================================================================
// SYMMETRIC KEYS
// ============================================================================

/// Supported AES key sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum KeySize {
    /// AES-128 (16 bytes)
    Aes128,
    /// AES-192 (24 bytes)
    Aes192,
    /// AES-256 (32 bytes)
    #[default]
    Aes256,
}

impl KeySize {
    /// All supported sizes, smallest first
    pub const ALL: [KeySize; 3] = [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256];

    /// Key length in bytes
    pub const fn len(self) -> usize {
        match self {
            KeySize::Aes128 => 16,
            KeySize::Aes192 => 24,
            KeySize::Aes256 => 32,
        }
    }

    /// Map a byte length to a key size
    pub fn from_len(len: usize) -> Result<Self> {
        match len {
            16 => Ok(KeySize::Aes128),
            24 => Ok(KeySize::Aes192),
            32 => Ok(KeySize::Aes256),
            other => Err(Error::InvalidKeySize(other)),
        }
    }
}

impl TryFrom<usize> for KeySize {
    type Error = Error;

    fn try_from(len: usize) -> Result<Self> {
        KeySize::from_len(len)
    }
}

impl From<KeySize> for usize {
    fn from(size: KeySize) -> usize {
        size.len()
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AES-{}", self.len() * 8)
    }
}

/// An AES key of one of the supported sizes
///
/// ## Security
///
/// - Key bytes are zeroized when this struct is dropped
/// - `Debug` never prints the key
#[derive(Clone, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: Vec<u8>,
    #[zeroize(skip)]
    size: KeySize,
}

impl SymmetricKey {
    /// Generate a new random key of the given size
    pub fn generate<R: CryptoRngCore + ?Sized>(size: KeySize, rng: &mut R) -> Result<Self> {
        let mut bytes = vec![0u8; size.len()];
        if let Err(e) = entropy::fill(rng, &mut bytes) {
            bytes.zeroize();
            return Err(e);
        }
        tracing::debug!("Generated {} key", size);
        Ok(Self { bytes, size })
    }

    /// Create from raw bytes
    ///
    /// Fails with `InvalidKeySize` unless the slice is 16, 24 or 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let size = KeySize::from_len(bytes.len())?;
        Ok(Self {
            bytes: bytes.to_vec(),
            size,
        })
    }

    /// Decode from a hex string (surrounding whitespace is ignored)
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            hex::decode(hex_str.trim())
                .map_err(|e| Error::InvalidKey(format!("Invalid key hex: {}", e)))?,
        );
        Self::from_slice(&bytes)
    }

    /// Encode as lowercase hex
    ///
    /// ## Security Warning
    ///
    /// Only use this for secure storage. Never log or transmit the result.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.bytes))
    }

    /// The key size
    pub fn size(&self) -> KeySize {
        self.size
    }

    /// Get the raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl PartialEq for SymmetricKey {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && bool::from(self.bytes.ct_eq(&other.bytes))
    }
}

impl Eq for SymmetricKey {}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SIGNING KEYS
// ============================================================================

/// ECDSA P-256 key pair
///
/// Only the secret scalar is stored; the public point is derived from it on
/// demand, so the two can never disagree.
#[derive(Clone)]
pub struct KeyPair {
    /// Private scalar (p256 zeroizes it on drop)
    secret: p256::SecretKey,
}

impl KeyPair {
    /// Generate a new random key pair
    ///
    /// Draws 32 bytes at a time and rejects the (astronomically rare) values
    /// that are zero or not below the curve order.
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Result<Self> {
        loop {
            let mut candidate = Zeroizing::new([0u8; 32]);
            entropy::fill(rng, &mut candidate[..])?;
            if let Ok(secret) = p256::SecretKey::from_slice(&candidate[..]) {
                tracing::debug!("Generated P-256 key pair");
                return Ok(Self { secret });
            }
        }
    }

    /// Create from a 32-byte big-endian scalar
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self> {
        let secret = p256::SecretKey::from_slice(bytes)
            .map_err(|_| Error::InvalidKey("Scalar is zero or out of range".into()))?;
        Ok(Self { secret })
    }

    /// Get the secret scalar bytes (big-endian)
    ///
    /// ## Security Warning
    ///
    /// Only use this for secure storage. Never log or transmit these bytes.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.secret.to_bytes().into())
    }

    /// Get the public key
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: self.secret.public_key(),
        }
    }

    pub(crate) fn secret_key(&self) -> &p256::SecretKey {
        &self.secret
    }

    pub(crate) fn from_secret_key(secret: p256::SecretKey) -> Self {
        Self { secret }
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        let ours = self.secret_bytes();
        let theirs = other.secret_bytes();
        bool::from(ours[..].ct_eq(&theirs[..]))
    }
}

impl Eq for KeyPair {}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// ECDSA P-256 public key
///
/// This contains only public information and can be shared freely.
#[derive(Clone)]
pub struct PublicKey {
    inner: p256::PublicKey,
}

impl PublicKey {
    /// Parse an uncompressed or compressed SEC1 point
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        let inner = p256::PublicKey::from_sec1_bytes(bytes)
            .map_err(|_| Error::InvalidKey("Not a valid P-256 point".into()))?;
        Ok(Self { inner })
    }

    /// Uncompressed SEC1 encoding (65 bytes, `0x04 || x || y`)
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        self.inner.to_encoded_point(false).as_bytes().to_vec()
    }

    /// Encode as hex string (for display)
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_sec1_bytes())
    }

    pub(crate) fn inner(&self) -> &p256::PublicKey {
        &self.inner
    }

    pub(crate) fn from_inner(inner: p256::PublicKey) -> Self {
        Self { inner }
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.inner.as_affine() == other.inner.as_affine()
    }
}

impl Eq for PublicKey {}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.to_hex()).finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
