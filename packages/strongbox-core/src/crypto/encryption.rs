//! # Encryption Module
//!
//! Provides AES-GCM authenticated encryption for data at rest.
//!
//! ## Seal / Open Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SEAL / OPEN FLOW                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  SEAL                                                                  │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  AES-GCM(                                                    │       │
//! │  │    key        = 16 / 24 / 32 bytes,                         │       │
//! │  │    nonce      = 12 bytes (unique per key!),                 │       │
//! │  │    plaintext  = payload,                                    │       │
//! │  │    aad        = context bound to the payload                │       │
//! │  │  )                                                          │       │
//! │  │           ↓                                                  │       │
//! │  │  Ciphertext + 16-byte Auth Tag                              │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! │  OPEN                                                                  │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  AES-GCM-Decrypt(same key, same nonce, ct || tag, same aad) │       │
//! │  │           ↓                                                  │       │
//! │  │  Plaintext, or AuthenticationFailed with nothing released   │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sealing is deterministic: the same key, nonce, plaintext and AAD always
//! give the same output. Keeping nonces unique per key is the caller's job;
//! [`crate::crypto::envelope`] draws a fresh random nonce for every call.
//!
//! ## Security Properties
//!
//! | Property | Guarantee |
//! |----------|-----------|
//! | Confidentiality | Only holders of the key can read the payload |
//! | Integrity | Any modification to ciphertext, tag, nonce or AAD is detected |
//! | Fail-closed | `open` never releases partial plaintext |

use aes_gcm::{
    aead::{consts::U12, Aead, KeyInit, Payload},
    aes::Aes192,
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce as AesNonce,
};
use rand_core::CryptoRngCore;

use crate::crypto::entropy;
use crate::crypto::keys::{KeySize, SymmetricKey};
use crate::error::{Error, Result};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// AES-192 in GCM mode with the standard 96-bit nonce
type Aes192Gcm = AesGcm<Aes192, U12>;

/// A nonce (number used once) for AES-GCM encryption
///
/// ## Critical Security Requirement
///
/// **NEVER reuse a nonce with the same key!**
///
/// Nonce reuse completely breaks AES-GCM security:
/// - Allows recovering the authentication key
/// - Allows forging messages
/// - Reveals the XOR of the two plaintexts
///
/// Random nonces are safe for up to 2^32 messages per key (birthday bound
/// for 96-bit nonces).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nonce(pub [u8; NONCE_SIZE]);

impl Nonce {
    /// Generate a random nonce from the given source
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Result<Self> {
        let mut bytes = [0u8; NONCE_SIZE];
        entropy::fill(rng, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Create from existing bytes
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from a slice (must be exactly 12 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; NONCE_SIZE] = slice.try_into().map_err(|_| {
            Error::MalformedEnvelope(format!(
                "Nonce must be {} bytes, got {}",
                NONCE_SIZE,
                slice.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

/// AES-GCM instance keyed for one of the supported key sizes
#[derive(Clone)]
enum Engine {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

/// A keyed AEAD cipher
///
/// Construct once per key and reuse for any number of seal/open calls.
/// `Cipher` holds no mutable state and is `Send + Sync`.
#[derive(Clone)]
pub struct Cipher {
    engine: Engine,
    size: KeySize,
}

impl Cipher {
    /// Key an AES-GCM cipher with a validated key
    pub fn new(key: &SymmetricKey) -> Result<Self> {
        Self::from_slice(key.as_bytes())
    }

    /// Key an AES-GCM cipher from raw bytes
    ///
    /// Fails with `InvalidKeySize` unless `key` is 16, 24 or 32 bytes.
    pub fn from_slice(key: &[u8]) -> Result<Self> {
        let size = KeySize::from_len(key.len())?;
        let invalid = |_| Error::InvalidKeySize(key.len());

        let engine = match size {
            KeySize::Aes128 => Engine::Aes128(Aes128Gcm::new_from_slice(key).map_err(invalid)?),
            KeySize::Aes192 => Engine::Aes192(Aes192Gcm::new_from_slice(key).map_err(invalid)?),
            KeySize::Aes256 => Engine::Aes256(Aes256Gcm::new_from_slice(key).map_err(invalid)?),
        };

        Ok(Self { engine, size })
    }

    /// The key size this cipher was built with
    pub fn key_size(&self) -> KeySize {
        self.size
    }

    /// Encrypt and authenticate `plaintext`, binding `aad`
    ///
    /// Returns `ciphertext || tag` (`plaintext.len() + TAG_SIZE` bytes).
    /// Fails with `PlaintextTooLarge` past the AES-GCM length limit.
    pub fn seal(&self, nonce: &Nonce, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        let nonce = AesNonce::from_slice(&nonce.0);
        let payload = Payload {
            msg: plaintext,
            aad,
        };

        let sealed = match &self.engine {
            Engine::Aes128(c) => c.encrypt(nonce, payload),
            Engine::Aes192(c) => c.encrypt(nonce, payload),
            Engine::Aes256(c) => c.encrypt(nonce, payload),
        };

        // Only reachable for plaintexts beyond the GCM length limit (~64 GiB)
        sealed.map_err(|_| Error::PlaintextTooLarge(plaintext.len()))
    }

    /// Authenticate and decrypt `ciphertext` (which carries the tag)
    ///
    /// ## Errors
    ///
    /// Returns `AuthenticationFailed` if:
    /// - The ciphertext or tag was tampered with
    /// - The AAD doesn't match
    /// - The key is wrong
    /// - The nonce is wrong
    ///
    /// The error does not say which.
    pub fn open(&self, nonce: &Nonce, ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        let nonce = AesNonce::from_slice(&nonce.0);
        let payload = Payload {
            msg: ciphertext,
            aad,
        };

        let opened = match &self.engine {
            Engine::Aes128(c) => c.decrypt(nonce, payload),
            Engine::Aes192(c) => c.decrypt(nonce, payload),
            Engine::Aes256(c) => c.decrypt(nonce, payload),
        };

        opened.map_err(|_| {
            tracing::warn!("Rejected ciphertext of {} bytes", ciphertext.len());
            Error::AuthenticationFailed
        })
    }
}

/// Encrypt a payload with AES-GCM
///
/// ## Parameters
///
/// - `key`: 128, 192 or 256-bit key
/// - `nonce`: 96-bit nonce, never reused with this key
/// - `plaintext`: Payload to encrypt
/// - `aad`: Additional authenticated data (not encrypted, but authenticated)
///
/// ## Example
///
/// ```ignore
/// let key = SymmetricKey::from_slice(b"Test1234Test1234")?;
/// let nonce = Nonce::generate(&mut OsRng)?;
/// let sealed = seal(&key, &nonce, b"hello, world", b"")?;
/// ```
pub fn seal(key: &SymmetricKey, nonce: &Nonce, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    Cipher::new(key)?.seal(nonce, plaintext, aad)
}

/// Decrypt a payload with AES-GCM
///
/// Fails with `AuthenticationFailed` on any mismatch.
pub fn open(key: &SymmetricKey, nonce: &Nonce, ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    Cipher::new(key)?.open(nonce, ciphertext, aad)
}

// ============================================================================
// TESTS
// ============================================================================
