//! # File Vault
//!
//! Encrypt, decrypt, sign and verify files on disk.
//!
//! ## Write Path
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         FILE OPERATIONS                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  input ──► ensure_distinct(input, output) ──► SamePath?                │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │            read input fully                                            │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │       seal / open / sign in memory   ──► error? nothing written        │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  write_atomic(output):                                                 │
//! │    1. temp file in the output's directory                              │
//! │    2. write all bytes, fsync                                           │
//! │    3. rename over the output path                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Readers of `output` see either the old file or the complete new one.
//! A decryption that fails authentication leaves no output at all.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand_core::CryptoRngCore;
use tempfile::NamedTempFile;
use zeroize::Zeroizing;

use crate::crypto::{self, pem, KeyPair, MessageDigest, PublicKey, Signature, SymmetricKey};
use crate::error::{Error, Result};

/// Sizes of one file operation's input and output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileReport {
    /// Bytes read from the input file
    pub input_len: usize,
    /// Bytes written to the output file
    pub output_len: usize,
}

// ============================================================================
// DATA FILES
// ============================================================================

/// Encrypt `input` into an envelope file at `output`
pub fn encrypt_file<R: CryptoRngCore + ?Sized>(
    key: &SymmetricKey,
    input: &Path,
    output: &Path,
    aad: &[u8],
    rng: &mut R,
) -> Result<FileReport> {
    ensure_distinct(input, output)?;
    let plaintext = Zeroizing::new(read(input)?);

    let envelope = crypto::seal_envelope(key, &plaintext, aad, rng)?;
    write_atomic(output, &envelope)?;

    let report = FileReport {
        input_len: plaintext.len(),
        output_len: envelope.len(),
    };
    tracing::info!(
        "Encrypted {} ({} bytes) -> {} ({} bytes)",
        input.display(),
        report.input_len,
        output.display(),
        report.output_len
    );
    Ok(report)
}

/// Decrypt the envelope file `input` into `output`
///
/// `output` is only created once authentication has succeeded.
pub fn decrypt_file(
    key: &SymmetricKey,
    input: &Path,
    output: &Path,
    aad: &[u8],
) -> Result<FileReport> {
    ensure_distinct(input, output)?;
    let envelope = read(input)?;

    let plaintext = Zeroizing::new(crypto::open_envelope(key, &envelope, aad)?);
    write_atomic(output, &plaintext)?;

    let report = FileReport {
        input_len: envelope.len(),
        output_len: plaintext.len(),
    };
    tracing::info!(
        "Decrypted {} ({} bytes) -> {} ({} bytes)",
        input.display(),
        report.input_len,
        output.display(),
        report.output_len
    );
    Ok(report)
}

/// Sign the SHA-256 digest of `input`, writing DER signature bytes to `output`
pub fn sign_file<R: CryptoRngCore + ?Sized>(
    keypair: &KeyPair,
    input: &Path,
    output: &Path,
    rng: &mut R,
) -> Result<FileReport> {
    ensure_distinct(input, output)?;
    let message = read(input)?;

    let digest = MessageDigest::sha256(&message);
    let signature = crypto::sign(keypair, &digest, rng)?;
    write_atomic(output, signature.as_der())?;

    tracing::info!("Signed {} -> {}", input.display(), output.display());
    Ok(FileReport {
        input_len: message.len(),
        output_len: signature.as_der().len(),
    })
}

/// Check a detached signature file against `input`
///
/// I/O problems are errors; a signature that does not match is `Ok(false)`.
pub fn verify_file(public_key: &PublicKey, input: &Path, signature_path: &Path) -> Result<bool> {
    let message = read(input)?;
    let signature = Signature::from_der(&read(signature_path)?);

    let valid = crypto::verify(public_key, &MessageDigest::sha256(&message), &signature);
    if valid {
        tracing::info!("Signature over {} is valid", input.display());
    } else {
        tracing::warn!("Signature over {} is NOT valid", input.display());
    }
    Ok(valid)
}

// ============================================================================
// KEY FILES
// ============================================================================

/// Write a symmetric key as a hex line
pub fn write_symmetric_key(path: &Path, key: &SymmetricKey) -> Result<()> {
    let mut text = key.to_hex();
    text.push('\n');
    write_atomic(path, text.as_bytes())
}

/// Read a symmetric key from a hex key file
pub fn read_symmetric_key(path: &Path) -> Result<SymmetricKey> {
    let text = Zeroizing::new(read_to_string(path)?);
    SymmetricKey::from_hex(&text)
}

/// Write a signing key pair as a two-block PEM key file
pub fn write_key_pair(path: &Path, keypair: &KeyPair) -> Result<()> {
    let text = pem::encode_key_file(keypair)?;
    write_atomic(path, text.as_bytes())
}

/// Read a signing key pair from a PEM key file
pub fn read_key_pair(path: &Path) -> Result<KeyPair> {
    let text = Zeroizing::new(read_to_string(path)?);
    pem::decode_key_file(&text)
}

/// Write a public key as an SPKI PEM file
pub fn write_public_key(path: &Path, public_key: &PublicKey) -> Result<()> {
    write_atomic(path, pem::encode_public(public_key)?.as_bytes())
}

/// Read a public key from an SPKI PEM file
pub fn read_public_key(path: &Path) -> Result<PublicKey> {
    pem::decode_public(&read_to_string(path)?)
}

// ============================================================================
// PRIMITIVES
// ============================================================================

/// Replace `path` with `bytes` in one step
///
/// The data goes to a temporary file beside `path`, is flushed to disk, and
/// is then renamed into place. On any failure the temporary file is removed
/// and `path` is left as it was.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let write_err = |e: io::Error| Error::WriteError(format!("{}: {}", path.display(), e));

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Fail with `SamePath` if `input` and `output` name the same file
///
/// Paths are compared after resolving symlinks and `..`, so different
/// spellings of one file are caught. `output` may not exist yet.
pub fn ensure_distinct(input: &Path, output: &Path) -> Result<()> {
    let input_real = fs::canonicalize(input)
        .map_err(|e| Error::ReadError(format!("{}: {}", input.display(), e)))?;

    if resolve_output(output)? == input_real {
        return Err(Error::SamePath(output.display().to_string()));
    }
    Ok(())
}

/// Fail with `SamePath` if two outputs, neither of which need exist yet,
/// would land on the same file
pub fn ensure_distinct_outputs(first: &Path, second: &Path) -> Result<()> {
    if resolve_output(first)? == resolve_output(second)? {
        return Err(Error::SamePath(second.display().to_string()));
    }
    Ok(())
}

fn resolve_output(output: &Path) -> Result<PathBuf> {
    if let Ok(real) = fs::canonicalize(output) {
        return Ok(real);
    }

    let name = output
        .file_name()
        .ok_or_else(|| Error::WriteError(format!("{}: not a file path", output.display())))?;
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent_real = fs::canonicalize(parent)
        .map_err(|e| Error::WriteError(format!("{}: {}", parent.display(), e)))?;
    Ok(parent_real.join(name))
}

fn read(path: &Path) -> Result<Vec<u8>> {
    let bytes =
        fs::read(path).map_err(|e| Error::ReadError(format!("{}: {}", path.display(), e)))?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::ReadError(format!("{}: {}", path.display(), e)))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{KeySize, OsRng, MIN_ENVELOPE_SIZE};
    use tempfile::TempDir;

    fn key() -> SymmetricKey {
        SymmetricKey::generate(KeySize::Aes128, &mut OsRng).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.pdf");
        let sealed = dir.path().join("ciphertext.pdf");
        let restored = dir.path().join("restored.pdf");
        fs::write(&input, b"%PDF-1.7 hello, world").unwrap();

        let key = key();
        let report = encrypt_file(&key, &input, &sealed, b"", &mut OsRng).unwrap();
        assert_eq!(report.input_len, 21);
        assert_eq!(report.output_len, 21 + MIN_ENVELOPE_SIZE);

        let report = decrypt_file(&key, &sealed, &restored, b"").unwrap();
        assert_eq!(report.output_len, 21);
        assert_eq!(fs::read(&restored).unwrap(), b"%PDF-1.7 hello, world");
        // Source untouched
        assert_eq!(fs::read(&input).unwrap(), b"%PDF-1.7 hello, world");
    }

    #[test]
    fn test_same_path_rejected() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.pdf");
        fs::write(&input, b"data").unwrap();

        let result = encrypt_file(&key(), &input, &input, b"", &mut OsRng);
        assert!(matches!(result, Err(Error::SamePath(_))));
        assert_eq!(fs::read(&input).unwrap(), b"data");
    }

    #[test]
    fn test_same_path_through_dot_dot() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let input = dir.path().join("input.bin");
        fs::write(&input, b"data").unwrap();
        let alias = dir.path().join("sub").join("..").join("input.bin");

        assert!(matches!(
            ensure_distinct(&input, &alias),
            Err(Error::SamePath(_))
        ));
    }

    #[test]
    fn test_distinct_outputs() {
        let dir = TempDir::new().unwrap();
        let keys = dir.path().join("signer.pem");
        let public = dir.path().join("signer.pub.pem");
        let alias = dir.path().join(".").join("signer.pem");

        ensure_distinct_outputs(&keys, &public).unwrap();
        assert!(matches!(
            ensure_distinct_outputs(&keys, &alias),
            Err(Error::SamePath(_))
        ));
        assert!(!keys.exists());
    }

    #[test]
    fn test_failed_decrypt_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("plain.txt");
        let sealed = dir.path().join("sealed.bin");
        let output = dir.path().join("out.txt");
        fs::write(&input, b"secret").unwrap();

        encrypt_file(&key(), &input, &sealed, b"", &mut OsRng).unwrap();

        let result = decrypt_file(&key(), &sealed, &output, b"");
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
        assert!(!output.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_decrypt_wrong_aad_fails() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("plain.txt");
        let sealed = dir.path().join("sealed.bin");
        fs::write(&input, b"secret").unwrap();

        let key = key();
        encrypt_file(&key, &input, &sealed, b"v1", &mut OsRng).unwrap();
        let result = decrypt_file(&key, &sealed, &dir.path().join("out"), b"v2");
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_missing_input_is_read_error() {
        let dir = TempDir::new().unwrap();
        let result = decrypt_file(
            &key(),
            &dir.path().join("missing"),
            &dir.path().join("out"),
            b"",
        );
        assert!(matches!(result, Err(Error::ReadError(_))));
    }

    #[test]
    fn test_sign_verify_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("release.tar");
        let sig = dir.path().join("release.tar.sig");
        fs::write(&input, b"release contents").unwrap();

        let keypair = KeyPair::generate(&mut OsRng).unwrap();
        sign_file(&keypair, &input, &sig, &mut OsRng).unwrap();
        assert!(verify_file(&keypair.public_key(), &input, &sig).unwrap());

        fs::write(&input, b"release contents!").unwrap();
        assert!(!verify_file(&keypair.public_key(), &input, &sig).unwrap());
    }

    #[test]
    fn test_verify_garbage_signature_file_is_false() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("msg");
        let sig = dir.path().join("msg.sig");
        fs::write(&input, b"msg").unwrap();
        fs::write(&sig, b"not der").unwrap();

        let keypair = KeyPair::generate(&mut OsRng).unwrap();
        assert!(!verify_file(&keypair.public_key(), &input, &sig).unwrap());
    }

    #[test]
    fn test_key_files_round_trip() {
        let dir = TempDir::new().unwrap();

        let key = key();
        let key_path = dir.path().join("data.key");
        write_symmetric_key(&key_path, &key).unwrap();
        assert_eq!(read_symmetric_key(&key_path).unwrap(), key);

        let keypair = KeyPair::generate(&mut OsRng).unwrap();
        let pair_path = dir.path().join("signing.pem");
        let pub_path = dir.path().join("signing.pub.pem");
        write_key_pair(&pair_path, &keypair).unwrap();
        write_public_key(&pub_path, &keypair.public_key()).unwrap();

        assert_eq!(read_key_pair(&pair_path).unwrap(), keypair);
        assert_eq!(read_public_key(&pub_path).unwrap(), keypair.public_key());
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.bin");
        fs::write(&path, b"old contents that are longer").unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("out.bin");
        assert!(matches!(write_atomic(&path, b"x"), Err(Error::WriteError(_))));
    }
}
