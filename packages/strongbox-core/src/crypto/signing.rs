//! # Digital Signatures Module
//!
//! Provides detached ECDSA P-256 signatures over SHA-256 message digests.
//!
//! ## Signature Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SIGNING FLOW                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  SIGNER                                                                │
//! │  ─────────────────────────────────────────────────────────────────      │
//! │                                                                         │
//! │  ┌──────────────┐   SHA-256    ┌──────────────────┐                    │
//! │  │   Message    │ ───────────► │ MessageDigest    │ (caller's step)    │
//! │  └──────────────┘              │ 32 bytes         │                    │
//! │                                └────────┬─────────┘                    │
//! │                                         │                              │
//! │                                         ▼                              │
//! │  ┌───────────────────────────────────────────────────────────┐        │
//! │  │  ECDSA-P256 Sign (hedged)                                 │        │
//! │  │                                                           │        │
//! │  │  1. Draw 32 fresh bytes from the injected RNG             │        │
//! │  │  2. k = RFC6979(secret, digest) mixed with those bytes    │        │
//! │  │  3. r = (k·G).x mod n,  s = k⁻¹(digest + r·secret) mod n │        │
//! │  └─────────────────────────┬─────────────────────────────────┘        │
//! │                            ▼                                           │
//! │                DER SEQUENCE { r INTEGER, s INTEGER }                  │
//! │                                                                         │
//! │  VERIFIER                                                              │
//! │  ─────────────────────────────────────────────────────────────────      │
//! │                                                                         │
//! │  verify(public_key, digest, signature) ──► true / false                │
//! │  (malformed signatures are simply false)                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Per-Signature Nonce
//!
//! `k` must never repeat for two different digests under one key; that would
//! reveal the private key. It is derived with RFC 6979 from the secret and
//! the digest, with 32 bytes from the caller's RNG mixed in, so every call
//! consumes randomness and two signatures over one digest differ.
//!
//! ## Digest Contract
//!
//! The engine signs digests, not messages. Hash with SHA-256 first (see
//! [`MessageDigest::sha256`]); no other hash is accepted.

use p256::ecdsa::signature::hazmat::{PrehashVerifier, RandomizedPrehashSigner};
use p256::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use rand_core::CryptoRngCore;
use sha2::{Digest, Sha256};

use crate::crypto::entropy;
use crate::crypto::keys::{KeyPair, PublicKey};
use crate::error::{Error, Result};

/// Size of a SHA-256 digest in bytes
pub const DIGEST_SIZE: usize = 32;

/// Largest DER encoding of a P-256 signature
pub const MAX_SIGNATURE_SIZE: usize = 72;

/// A SHA-256 message digest, the quantity that gets signed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageDigest([u8; DIGEST_SIZE]);

impl MessageDigest {
    /// Hash a message with SHA-256
    pub fn sha256(message: &[u8]) -> Self {
        Self(Sha256::digest(message).into())
    }

    /// Wrap an existing SHA-256 output
    pub fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Wrap an existing SHA-256 output given as a slice
    ///
    /// Fails with `InvalidDigest` unless the slice is 32 bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; DIGEST_SIZE] = slice
            .try_into()
            .map_err(|_| Error::InvalidDigest(slice.len()))?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }
}

/// A DER-encoded ECDSA signature
///
/// The bytes are kept as received; they are parsed only inside [`verify`],
/// which turns any parse failure into `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Wrap DER bytes without validating them
    pub fn from_der(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Get the DER bytes
    pub fn as_der(&self) -> &[u8] {
        &self.0
    }

    /// Encode as hex string
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Decode from hex string
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| Error::DecodeError(format!("Invalid signature hex: {}", e)))?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Sign a digest with ECDSA P-256
///
/// ## Parameters
///
/// - `keypair`: The signing key pair (contains the private scalar)
/// - `digest`: SHA-256 digest of the message
/// - `rng`: Source of the fresh per-signature entropy
///
/// ## Errors
///
/// - `EntropySourceFailure` if `rng` cannot supply randomness; no signature
///   is produced in that case
/// - `SigningFailed` if the signer rejects the digest
///
/// ## Example
///
/// ```ignore
/// let keypair = KeyPair::generate(&mut OsRng)?;
/// let digest = MessageDigest::sha256(b"Hello, World!");
/// let signature = sign(&keypair, &digest, &mut OsRng)?;
/// ```
pub fn sign<R: CryptoRngCore + ?Sized>(
    keypair: &KeyPair,
    digest: &MessageDigest,
    rng: &mut R,
) -> Result<Signature> {
    let mut hedge = entropy::fork(rng)?;
    let signing_key = SigningKey::from(keypair.secret_key());

    let sig: EcdsaSignature = signing_key
        .sign_prehash_with_rng(&mut hedge, digest.as_bytes())
        .map_err(|e| Error::SigningFailed(e.to_string()))?;

    Ok(Signature(sig.to_der().as_bytes().to_vec()))
}

/// Verify an ECDSA P-256 signature over a digest
///
/// Returns `true` only for a well-formed signature made by the private key
/// matching `public_key` over exactly this digest. Everything else,
/// including undecodable signature bytes, is `false`.
pub fn verify(public_key: &PublicKey, digest: &MessageDigest, signature: &Signature) -> bool {
    let sig = match EcdsaSignature::from_der(signature.as_der()) {
        Ok(sig) => sig,
        Err(_) => {
            tracing::debug!("Signature of {} bytes is not valid DER", signature.0.len());
            return false;
        }
    };

    let verifying_key = VerifyingKey::from(public_key.inner());
    verifying_key
        .verify_prehash(digest.as_bytes(), &sig)
        .is_ok()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::entropy::testing::FailingRng;
    use crate::crypto::entropy::OsRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sign_verify() {
        let keypair = KeyPair::generate(&mut OsRng).unwrap();
        let digest = MessageDigest::sha256(b"Hello, World!");

        let signature = sign(&keypair, &digest, &mut OsRng).unwrap();

        assert!(verify(&keypair.public_key(), &digest, &signature));
        assert!(signature.as_der().len() <= MAX_SIGNATURE_SIZE);
    }

    #[test]
    fn test_verify_wrong_digest_fails() {
        let keypair = KeyPair::generate(&mut OsRng).unwrap();
        let digest = MessageDigest::sha256(b"Hello, World!");
        let wrong = MessageDigest::sha256(b"Wrong message!");

        let signature = sign(&keypair, &digest, &mut OsRng).unwrap();

        assert!(!verify(&keypair.public_key(), &wrong, &signature));
    }

    #[test]
    fn test_verify_wrong_key_fails() {
        let keypair1 = KeyPair::generate(&mut OsRng).unwrap();
        let keypair2 = KeyPair::generate(&mut OsRng).unwrap();
        let digest = MessageDigest::sha256(b"Hello, World!");

        let signature = sign(&keypair1, &digest, &mut OsRng).unwrap();

        assert!(!verify(&keypair2.public_key(), &digest, &signature));
    }

    #[test]
    fn test_malformed_signature_is_false() {
        let keypair = KeyPair::generate(&mut OsRng).unwrap();
        let digest = MessageDigest::sha256(b"msg");

        for bytes in [&b""[..], &b"\x30\x00"[..], &[0xFFu8; 70][..]] {
            assert!(!verify(&keypair.public_key(), &digest, &Signature::from_der(bytes)));
        }
    }

    #[test]
    fn test_truncated_signature_is_false() {
        let keypair = KeyPair::generate(&mut OsRng).unwrap();
        let digest = MessageDigest::sha256(b"msg");
        let signature = sign(&keypair, &digest, &mut OsRng).unwrap();

        let der = signature.as_der();
        let truncated = Signature::from_der(&der[..der.len() - 1]);
        assert!(!verify(&keypair.public_key(), &digest, &truncated));
    }

    #[test]
    fn test_signatures_are_randomized() {
        let keypair = KeyPair::generate(&mut OsRng).unwrap();
        let digest = MessageDigest::sha256(b"Hello, World!");

        let sig1 = sign(&keypair, &digest, &mut OsRng).unwrap();
        let sig2 = sign(&keypair, &digest, &mut OsRng).unwrap();

        // Fresh entropy per call gives a fresh k, hence a different r
        assert_ne!(sig1, sig2);
        assert!(verify(&keypair.public_key(), &digest, &sig1));
        assert!(verify(&keypair.public_key(), &digest, &sig2));
    }

    #[test]
    fn test_seeded_rng_gives_reproducible_signature() {
        let keypair = KeyPair::generate(&mut OsRng).unwrap();
        let digest = MessageDigest::sha256(b"fixture");

        let sig1 = sign(&keypair, &digest, &mut StdRng::seed_from_u64(1)).unwrap();
        let sig2 = sign(&keypair, &digest, &mut StdRng::seed_from_u64(1)).unwrap();

        assert_eq!(sig1, sig2);
    }

    #[test]
    fn test_sign_entropy_failure() {
        let keypair = KeyPair::generate(&mut OsRng).unwrap();
        let digest = MessageDigest::sha256(b"msg");

        assert!(matches!(
            sign(&keypair, &digest, &mut FailingRng),
            Err(Error::EntropySourceFailure(_))
        ));
    }

    #[test]
    fn test_digest_from_slice() {
        let digest = MessageDigest::sha256(b"abc");
        assert_eq!(
            hex::encode(digest.as_bytes()),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(MessageDigest::from_slice(digest.as_bytes()).unwrap(), digest);
        assert!(matches!(
            MessageDigest::from_slice(&[0u8; 20]),
            Err(Error::InvalidDigest(20))
        ));
    }

    #[test]
    fn test_signature_hex() {
        let keypair = KeyPair::generate(&mut OsRng).unwrap();
        let signature = sign(&keypair, &MessageDigest::sha256(b"test"), &mut OsRng).unwrap();

        let restored = Signature::from_hex(&signature.to_hex()).unwrap();
        assert_eq!(signature, restored);
        assert!(Signature::from_hex("zz").is_err());
    }
}
