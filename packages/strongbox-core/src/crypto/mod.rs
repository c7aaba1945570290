//! # Cryptography Module
//!
//! All cryptographic primitives used by Strongbox Core.
//!
//! ## Security Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CRYPTOGRAPHIC ARCHITECTURE                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    KEY MATERIAL                                 │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │            Injected CSPRNG (OsRng in production)               │   │
//! │  │                          │                                      │   │
//! │  │            ┌─────────────┴─────────────┐                       │   │
//! │  │            ▼                           ▼                       │   │
//! │  │  ┌─────────────────┐         ┌─────────────────┐              │   │
//! │  │  │  SymmetricKey   │         │    KeyPair      │              │   │
//! │  │  │  (AES 128/192/  │         │  (ECDSA P-256)  │              │   │
//! │  │  │   256)          │         │                 │              │   │
//! │  │  │ • Hex key file  │         │ • PKCS#8 PEM    │              │   │
//! │  │  │ • Envelopes     │         │ • SPKI PEM      │              │   │
//! │  │  └─────────────────┘         └─────────────────┘              │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 ENCRYPTION SCHEME                               │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  Data at rest (AES-GCM)                                        │   │
//! │  │  ─────────────────────                                          │   │
//! │  │                                                                 │   │
//! │  │  1. Nonce: 96 bits, random per seal                            │   │
//! │  │  2. Seal: AES-GCM(key, nonce, plaintext, associated_data)     │   │
//! │  │     • 128-bit authentication tag appended                      │   │
//! │  │  3. Envelope: nonce || ciphertext || tag                       │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 SIGNATURE SCHEME                                │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  Detached Signatures (ECDSA)                                   │   │
//! │  │  ───────────────────────────                                    │   │
//! │  │                                                                 │   │
//! │  │  • Curve: NIST P-256 (secp256r1)                               │   │
//! │  │  • Digest: SHA-256, computed by the caller                     │   │
//! │  │  • Encoding: ASN.1 DER, at most 72 bytes                       │   │
//! │  │  • Nonce: RFC 6979 hedged with fresh randomness                │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm Choices & Rationale
//!
//! | Algorithm | Purpose | Why Chosen |
//! |-----------|---------|------------|
//! | AES-GCM | Encryption | Hardware acceleration, AEAD |
//! | ECDSA P-256 | Signing | Interoperable with OpenSSL and X.509 tooling |
//! | SHA-256 | Digest | Matches the P-256 security level |
//! | PKCS#8 / SPKI | Key files | Standard, readable by `openssl pkey` |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: Secret key bytes are zeroized when dropped
//! 2. **Constant-Time Comparison**: Key equality never short-circuits
//! 3. **Injected Randomness**: Every random draw goes through a caller-supplied RNG
//! 4. **Nonce Budget**: [`Sealer`] stops after 2^32 random nonces per key

pub mod entropy;
mod encryption;
mod envelope;
mod keys;
pub mod pem;
mod signing;

pub use encryption::{open, seal, Cipher, Nonce, NONCE_SIZE, TAG_SIZE};
pub use entropy::OsRng;
pub use envelope::{
    open_envelope, seal_envelope, unwrap, wrap, Sealer, MIN_ENVELOPE_SIZE, RANDOM_NONCE_LIMIT,
};
pub use keys::{KeyPair, KeySize, PublicKey, SymmetricKey};
pub use signing::{sign, verify, MessageDigest, Signature, DIGEST_SIZE, MAX_SIGNATURE_SIZE};
