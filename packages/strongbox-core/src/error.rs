//! # Error Handling
//!
//! This module provides the error type shared by every Strongbox component.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Crypto Errors (300-399)                                           │
//! │  │   ├── InvalidKeySize        - Key length not 16/24/32 bytes         │
//! │  │   ├── AuthenticationFailed  - AEAD tag mismatch                     │
//! │  │   ├── MalformedEnvelope     - Envelope too short                    │
//! │  │   ├── InvalidKey            - Unusable key bytes or hex             │
//! │  │   ├── InvalidDigest         - Digest is not 32 bytes                │
//! │  │   ├── SigningFailed         - Signer rejected the digest            │
//! │  │   ├── EntropySourceFailure  - Random source unavailable             │
//! │  │   ├── NonceBudgetExhausted  - Too many random nonces for one key    │
//! │  │   └── PlaintextTooLarge     - Beyond the AES-GCM length limit       │
//! │  │                                                                      │
//! │  ├── Encoding Errors (400-499)                                         │
//! │  │   ├── DecodeError           - PEM block missing/mislabeled/corrupt  │
//! │  │   └── EncodeError           - Key could not be serialized           │
//! │  │                                                                      │
//! │  ├── File Errors (500-599)                                             │
//! │  │   ├── ReadError             - Failed to read input                  │
//! │  │   ├── WriteError            - Failed to write output                │
//! │  │   └── SamePath              - Input and output are the same file    │
//! │  │                                                                      │
//! │  └── Config Errors (600-699)                                           │
//! │      └── Config                - Config file unreadable or invalid     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Signature verification has no error kind: a signature that does not
//! verify is reported as `false`.

use thiserror::Error;

/// Result type alias for Strongbox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Strongbox
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Crypto Errors (300-399)
    // ========================================================================

    /// Symmetric key length is not a supported AES key size
    #[error("Invalid key size: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeySize(usize),

    /// AEAD authentication failed
    ///
    /// Carries no detail; the caller learns only that the envelope was
    /// rejected.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Envelope bytes cannot be split into nonce and ciphertext
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Invalid key format or value
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Digest has the wrong length for the signature scheme
    #[error("Invalid digest: {0} bytes (expected 32)")]
    InvalidDigest(usize),

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Random number generation failed
    #[error("Entropy source failure: {0}")]
    EntropySourceFailure(String),

    /// A sealer has used up its random nonce budget
    #[error("Nonce budget exhausted for this key; rotate the key")]
    NonceBudgetExhausted,

    /// Plaintext is longer than one AES-GCM invocation can seal
    #[error("Plaintext of {0} bytes exceeds the AES-GCM limit")]
    PlaintextTooLarge(usize),

    // ========================================================================
    // Encoding Errors (400-499)
    // ========================================================================

    /// Key text could not be decoded
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Key could not be encoded
    #[error("Encode error: {0}")]
    EncodeError(String),

    // ========================================================================
    // File Errors (500-599)
    // ========================================================================

    /// Failed to read a file
    #[error("Failed to read: {0}")]
    ReadError(String),

    /// Failed to write a file
    #[error("Failed to write: {0}")]
    WriteError(String),

    /// Input and output resolve to the same file
    #[error("Input and output must be different files: {0}")]
    SamePath(String),

    // ========================================================================
    // Config Errors (600-699)
    // ========================================================================

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Get the numeric error code
    ///
    /// Error codes are organized by category:
    /// - 300-399: Crypto
    /// - 400-499: Encoding
    /// - 500-599: Files
    /// - 600-699: Config
    pub fn code(&self) -> i32 {
        match self {
            // Crypto (300-399)
            Error::InvalidKeySize(_) => 300,
            Error::AuthenticationFailed => 301,
            Error::MalformedEnvelope(_) => 302,
            Error::InvalidKey(_) => 303,
            Error::InvalidDigest(_) => 304,
            Error::SigningFailed(_) => 305,
            Error::EntropySourceFailure(_) => 306,
            Error::NonceBudgetExhausted => 307,
            Error::PlaintextTooLarge(_) => 308,

            // Encoding (400-499)
            Error::DecodeError(_) => 400,
            Error::EncodeError(_) => 401,

            // Files (500-599)
            Error::ReadError(_) => 500,
            Error::WriteError(_) => 501,
            Error::SamePath(_) => 502,

            // Config (600-699)
            Error::Config(_) => 600,
        }
    }

    /// Check if retrying the same call could succeed
    ///
    /// Only a transient entropy or I/O problem qualifies; a bad key or a
    /// tampered envelope fails the same way every time.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::EntropySourceFailure(_) | Error::ReadError(_) | Error::WriteError(_)
        )
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================
