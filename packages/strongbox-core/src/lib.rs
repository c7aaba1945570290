//! # Strongbox Core
//!
//! Authenticated encryption at rest and detached ECDSA signatures, with keys
//! that travel as standard PEM text.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       STRONGBOX CORE MODULES                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                          Storage                                │   │
//! │  │  encrypt_file · decrypt_file · sign_file · verify_file         │   │
//! │  │  atomic writes · distinct input/output · key files             │   │
//! │  └──────────────────────────────┬──────────────────────────────────┘   │
//! │                                 │                                      │
//! │  ┌──────────────────────────────┴──────────────────────────────────┐   │
//! │  │                          Crypto                                 │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌────────┐ │   │
//! │  │  │ Encryption  │  │  Envelope   │  │   Signing   │  │  PEM   │ │   │
//! │  │  │             │  │             │  │             │  │        │ │   │
//! │  │  │ - AES-GCM   │  │ - wrap      │  │ - P-256     │  │ PKCS#8 │ │   │
//! │  │  │ - seal/open │  │ - unwrap    │  │ - SHA-256   │  │ SPKI   │ │   │
//! │  │  │             │  │ - Sealer    │  │ - DER       │  │        │ │   │
//! │  │  └──────┬──────┘  └──────┬──────┘  └──────┬──────┘  └───┬────┘ │   │
//! │  │         └────────────────┴────────┬───────┴─────────────┘      │   │
//! │  │                                   ▼                            │   │
//! │  │                 Keys  ◄──────  Entropy (injected RNG)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Config (TOML)                    Error (codes 300-699)                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire library
//! - [`crypto`] - Cryptographic primitives (keys, encryption, envelopes, signing, PEM)
//! - [`storage`] - File operations with atomic writes
//! - [`config`] - TOML configuration
//!
//! ## Quick Start
//!
//! ```ignore
//! use strongbox_core::crypto::{self, KeySize, OsRng, SymmetricKey};
//!
//! let key = SymmetricKey::generate(KeySize::Aes256, &mut OsRng)?;
//! let envelope = crypto::seal_envelope(&key, b"hello, world", b"", &mut OsRng)?;
//! let plaintext = crypto::open_envelope(&key, &envelope, b"")?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod config;
pub mod crypto;
pub mod error;
pub mod storage;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use config::Config;
pub use crypto::{KeyPair, KeySize, MessageDigest, PublicKey, Signature, SymmetricKey};
pub use error::{Error, Result};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of Strongbox Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
