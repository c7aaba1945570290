//! # Envelope Codec
//!
//! Lays out a sealed payload as one self-contained byte string and splits it
//! again.
//!
//! ## Wire Format
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          ENVELOPE FORMAT                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────┬──────────────────────────────┬──────────────────┐    │
//! │  │ nonce (12)   │ ciphertext (len(plaintext))  │ tag (16)         │    │
//! │  └──────────────┴──────────────────────────────┴──────────────────┘    │
//! │                                                                         │
//! │  No header, no length prefix, no version. Both sides agree on          │
//! │  AES-GCM with a 12-byte nonce out of band.                             │
//! │                                                                         │
//! │  Minimum length: 12 + 16 = 28 bytes (empty plaintext).                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`unwrap`] only checks shape. It never calls the cipher, so malformed
//! input is rejected before any cryptographic work.

use std::sync::atomic::{AtomicU64, Ordering};

use rand_core::CryptoRngCore;

use crate::crypto::encryption::{Cipher, Nonce, NONCE_SIZE, TAG_SIZE};
use crate::crypto::keys::SymmetricKey;
use crate::error::{Error, Result};

/// Smallest well-formed envelope (nonce plus tag, empty plaintext)
pub const MIN_ENVELOPE_SIZE: usize = NONCE_SIZE + TAG_SIZE;

/// Number of random nonces one key may use before collisions become a risk
pub const RANDOM_NONCE_LIMIT: u64 = 1 << 32;

/// Join a nonce and a sealed payload into envelope bytes
pub fn wrap(nonce: &Nonce, ciphertext: &[u8]) -> Vec<u8> {
    let mut envelope = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    envelope.extend_from_slice(nonce.as_bytes());
    envelope.extend_from_slice(ciphertext);
    envelope
}

/// Split envelope bytes into the nonce and the sealed payload
///
/// ## Errors
///
/// `MalformedEnvelope` if `envelope` is shorter than [`MIN_ENVELOPE_SIZE`].
pub fn unwrap(envelope: &[u8]) -> Result<(Nonce, &[u8])> {
    if envelope.len() < MIN_ENVELOPE_SIZE {
        return Err(Error::MalformedEnvelope(format!(
            "Envelope is {} bytes, need at least {}",
            envelope.len(),
            MIN_ENVELOPE_SIZE
        )));
    }

    let (nonce, ciphertext) = envelope.split_at(NONCE_SIZE);
    Ok((Nonce::from_slice(nonce)?, ciphertext))
}

/// Seal `plaintext` under a fresh random nonce and wrap it
pub fn seal_envelope<R: CryptoRngCore + ?Sized>(
    key: &SymmetricKey,
    plaintext: &[u8],
    aad: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let cipher = Cipher::new(key)?;
    let nonce = Nonce::generate(rng)?;
    let sealed = cipher.seal(&nonce, plaintext, aad)?;
    Ok(wrap(&nonce, &sealed))
}

/// Unwrap an envelope and open it
pub fn open_envelope(key: &SymmetricKey, envelope: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = Cipher::new(key)?;
    let (nonce, sealed) = unwrap(envelope)?;
    cipher.open(&nonce, sealed, aad)
}

/// A keyed envelope sealer that enforces the random-nonce budget
///
/// ## Usage Accounting
///
/// ```text
/// seal_envelope() ──► reserve slot (atomic) ──► draw nonce ──► seal ──► wrap
///                          │
///                          └── slot >= limit ──► NonceBudgetExhausted
/// ```
///
/// A slot is consumed even if the later steps fail, so the count never
/// under-reports nonces that might have been drawn. `Sealer` can be shared
/// between threads; each caller brings its own random source.
pub struct Sealer {
    cipher: Cipher,
    sealed: AtomicU64,
    limit: u64,
}

impl Sealer {
    /// Create a sealer with the standard 2^32 budget
    pub fn new(key: &SymmetricKey) -> Result<Self> {
        Self::with_limit(key, RANDOM_NONCE_LIMIT)
    }

    /// Create a sealer with a custom budget
    pub fn with_limit(key: &SymmetricKey, limit: u64) -> Result<Self> {
        Ok(Self {
            cipher: Cipher::new(key)?,
            sealed: AtomicU64::new(0),
            limit,
        })
    }

    /// Seal `plaintext` into a new envelope
    pub fn seal_envelope<R: CryptoRngCore + ?Sized>(
        &self,
        plaintext: &[u8],
        aad: &[u8],
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        self.reserve()?;
        let nonce = Nonce::generate(rng)?;
        let sealed = self.cipher.seal(&nonce, plaintext, aad)?;
        Ok(wrap(&nonce, &sealed))
    }

    /// Open an envelope sealed under the same key
    ///
    /// Opening does not count against the budget.
    pub fn open_envelope(&self, envelope: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        let (nonce, sealed) = unwrap(envelope)?;
        self.cipher.open(&nonce, sealed, aad)
    }

    /// Number of envelopes sealed so far
    pub fn sealed_count(&self) -> u64 {
        self.sealed.load(Ordering::Relaxed)
    }

    /// Seals left before the budget is exhausted
    pub fn remaining(&self) -> u64 {
        self.limit - self.sealed_count()
    }

    fn reserve(&self) -> Result<()> {
        let limit = self.limit;
        self.sealed
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |used| {
                (used < limit).then_some(used + 1)
            })
            .map(|_| ())
            .map_err(|_| {
                tracing::warn!("Sealer refused: {} nonces already used with this key", limit);
                Error::NonceBudgetExhausted
            })
    }
}

// ============================================================================
// TESTS
// ============================================================================
