//! # Storage Module
//!
//! Everything that touches the filesystem.
//!
//! ## On-Disk Formats
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         FILE FORMATS                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Envelope file      raw bytes: nonce (12) || ciphertext || tag (16)    │
//! │  Signature file     raw ASN.1 DER signature bytes                      │
//! │  Symmetric key      lowercase hex, one line                            │
//! │  Signing key        PEM: PRIVATE KEY block, then PUBLIC KEY block      │
//! │  Public key         PEM: PUBLIC KEY block                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All writes are atomic (temp file + rename), and an operation never
//! writes over its own input.

pub mod files;

pub use files::{
    decrypt_file, encrypt_file, ensure_distinct, ensure_distinct_outputs, read_key_pair,
    read_public_key, read_symmetric_key, sign_file, verify_file, write_atomic, write_key_pair,
    write_public_key, write_symmetric_key, FileReport,
};
