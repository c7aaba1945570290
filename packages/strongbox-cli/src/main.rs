//! Strongbox CLI
//!
//! File-oriented front end for `strongbox-core`:
//!
//! 1. **Keys**: generate AES keys (hex files) and P-256 signing keys (PEM).
//!
//! 2. **Encryption at rest**: seal a file into a `nonce || ciphertext || tag`
//!    envelope and open it again into a *different* file.
//!
//! 3. **Detached signatures**: sign the SHA-256 digest of a file and verify
//!    the DER signature against a public key.
//!
//! # Usage
//!
//! ```bash
//! strongbox keygen symmetric --size 16 --out data.key
//! strongbox encrypt --key data.key --input input.pdf --output ciphertext.pdf
//! strongbox decrypt --key data.key --input ciphertext.pdf --output restored.pdf
//!
//! strongbox keygen signing --out signer.pem --public-out signer.pub.pem
//! strongbox sign --keys signer.pem --input release.tar --output release.tar.sig
//! strongbox verify --public signer.pub.pem --input release.tar --signature release.tar.sig
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success (signature valid)
//! - 1: Signature did not verify
//! - 2: Error (bad key, failed authentication, I/O), reported on stderr

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, Result, WrapErr};

use strongbox_core::crypto::{KeyPair, KeySize, OsRng, SymmetricKey};
use strongbox_core::crypto::pem;
use strongbox_core::{storage, Config};

/// Exit codes for the CLI.
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const VERIFICATION_FAILED: u8 = 1;
    pub const ERROR: u8 = 2;
}

// ── CLI Arguments ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "strongbox", version, about = "Encrypt, decrypt, sign and verify files")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "STRONGBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new key
    Keygen {
        #[command(subcommand)]
        kind: KeygenCommands,
    },

    /// Extract the public key from a signing key file
    PublicKey {
        /// Signing key file (PEM)
        #[arg(short, long)]
        keys: PathBuf,

        /// Where to write the public key; stdout if omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Encrypt a file into an envelope
    Encrypt(CipherArgs),

    /// Decrypt an envelope into a different file
    Decrypt(CipherArgs),

    /// Sign the SHA-256 digest of a file
    Sign {
        /// Signing key file (PEM)
        #[arg(short, long, env = "STRONGBOX_SIGNING_KEY")]
        keys: PathBuf,

        /// File to sign
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the DER signature
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Verify a detached signature
    Verify {
        /// Public key file (PEM)
        #[arg(short, long)]
        public: PathBuf,

        /// Signed file
        #[arg(short, long)]
        input: PathBuf,

        /// DER signature file
        #[arg(short, long)]
        signature: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum KeygenCommands {
    /// AES key, written as hex
    Symmetric {
        /// Key length in bytes: 16, 24 or 32 (config `key_size` if omitted)
        #[arg(long, value_parser = parse_key_size)]
        size: Option<KeySize>,

        /// Key file to create
        #[arg(short, long)]
        out: PathBuf,

        /// Replace an existing key file
        #[arg(long)]
        force: bool,
    },

    /// ECDSA P-256 key pair, written as PEM
    Signing {
        /// Key file to create (private and public blocks)
        #[arg(short, long)]
        out: PathBuf,

        /// Also write the public key alone to this file
        #[arg(long)]
        public_out: Option<PathBuf>,

        /// Replace existing key files
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct CipherArgs {
    /// Symmetric key file (hex)
    #[arg(short, long, env = "STRONGBOX_KEY")]
    key: PathBuf,

    /// File to read
    #[arg(short, long)]
    input: PathBuf,

    /// File to write; must differ from the input
    #[arg(short, long)]
    output: PathBuf,

    /// Associated data bound to the envelope (config `associated_data` if omitted)
    #[arg(long)]
    aad: Option<String>,
}

fn parse_key_size(s: &str) -> std::result::Result<KeySize, String> {
    let len: usize = s.parse().map_err(|_| format!("not a number: {}", s))?;
    KeySize::from_len(len).map_err(|e| e.to_string())
}

// ── Entry Point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => ExitCode::from(code),
        Err(report) => {
            eprintln!("Error: {:?}", report);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn try_main() -> Result<u8> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    init_tracing(cli.verbose || config.verbose_logging);
    tracing::debug!("Strongbox v{}", strongbox_core::version());

    run(cli.command, &config)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("strongbox=debug,strongbox_core=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "strongbox=info,strongbox_core=info".into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run(command: Commands, config: &Config) -> Result<u8> {
    match command {
        Commands::Keygen { kind } => cmd_keygen(kind, config)?,
        Commands::PublicKey { keys, out } => cmd_public_key(&keys, out.as_deref())?,
        Commands::Encrypt(args) => cmd_encrypt(&args, config)?,
        Commands::Decrypt(args) => cmd_decrypt(&args, config)?,
        Commands::Sign {
            keys,
            input,
            output,
        } => cmd_sign(&keys, &input, &output)?,
        Commands::Verify {
            public,
            input,
            signature,
        } => return cmd_verify(&public, &input, &signature),
    }
    Ok(exit_codes::SUCCESS)
}

fn cmd_keygen(kind: KeygenCommands, config: &Config) -> Result<()> {
    match kind {
        KeygenCommands::Symmetric { size, out, force } => {
            refuse_overwrite(&out, force)?;
            let size = size.unwrap_or(config.key_size);
            let key = SymmetricKey::generate(size, &mut OsRng)?;
            storage::write_symmetric_key(&out, &key)
                .wrap_err_with(|| format!("writing key to {}", out.display()))?;
            println!("Generated {} key: {}", size, out.display());
        }
        KeygenCommands::Signing {
            out,
            public_out,
            force,
        } => {
            refuse_overwrite(&out, force)?;
            if let Some(path) = &public_out {
                storage::ensure_distinct_outputs(&out, path)?;
                refuse_overwrite(path, force)?;
            }

            let keypair = KeyPair::generate(&mut OsRng)?;
            storage::write_key_pair(&out, &keypair)
                .wrap_err_with(|| format!("writing key pair to {}", out.display()))?;
            println!("Generated P-256 signing key: {}", out.display());

            if let Some(path) = public_out {
                storage::write_public_key(&path, &keypair.public_key())?;
                println!("Public key: {}", path.display());
            }
        }
    }
    Ok(())
}

fn refuse_overwrite(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to replace it", path.display());
    }
    Ok(())
}

fn cmd_public_key(keys: &Path, out: Option<&Path>) -> Result<()> {
    let keypair = storage::read_key_pair(keys)
        .wrap_err_with(|| format!("loading signing key {}", keys.display()))?;

    match out {
        Some(path) => storage::write_public_key(path, &keypair.public_key())?,
        None => print!("{}", pem::encode_public(&keypair.public_key())?),
    }
    Ok(())
}

fn cmd_encrypt(args: &CipherArgs, config: &Config) -> Result<()> {
    let key = load_key(args)?;
    let aad = args.aad.as_deref().unwrap_or(&config.associated_data);

    let report = storage::encrypt_file(&key, &args.input, &args.output, aad.as_bytes(), &mut OsRng)?;
    println!("LEN: {} -> {}", report.input_len, report.output_len);
    Ok(())
}

fn cmd_decrypt(args: &CipherArgs, config: &Config) -> Result<()> {
    let key = load_key(args)?;
    let aad = args.aad.as_deref().unwrap_or(&config.associated_data);

    let report = storage::decrypt_file(&key, &args.input, &args.output, aad.as_bytes())?;
    println!("LEN: {} -> {}", report.input_len, report.output_len);
    Ok(())
}

fn cmd_sign(keys: &Path, input: &Path, output: &Path) -> Result<()> {
    let keypair = storage::read_key_pair(keys)
        .wrap_err_with(|| format!("loading signing key {}", keys.display()))?;
    storage::sign_file(&keypair, input, output, &mut OsRng)?;
    println!("Signature: {}", output.display());
    Ok(())
}

fn cmd_verify(public: &Path, input: &Path, signature: &Path) -> Result<u8> {
    let public_key = storage::read_public_key(public)
        .wrap_err_with(|| format!("loading public key {}", public.display()))?;

    if storage::verify_file(&public_key, input, signature)? {
        println!("Signature OK");
        Ok(exit_codes::SUCCESS)
    } else {
        println!("Signature INVALID");
        Ok(exit_codes::VERIFICATION_FAILED)
    }
}

fn load_key(args: &CipherArgs) -> Result<SymmetricKey> {
    storage::read_symmetric_key(&args.key)
        .wrap_err_with(|| format!("loading key {}", args.key.display()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("strongbox").chain(args.iter().copied())).unwrap()
    }

    fn path_arg(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).display().to_string()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_key_size_parser() {
        assert_eq!(parse_key_size("24").unwrap(), KeySize::Aes192);
        assert!(parse_key_size("20").is_err());
        assert!(parse_key_size("big").is_err());
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        fs::write(dir.path().join("input.pdf"), b"hello, world").unwrap();

        let key = path_arg(&dir, "data.key");
        let input = path_arg(&dir, "input.pdf");
        let sealed = path_arg(&dir, "ciphertext.pdf");
        let restored = path_arg(&dir, "restored.pdf");

        let cli = parse(&["keygen", "symmetric", "--size", "16", "--out", &key]);
        run(cli.command, &config).unwrap();

        let cli = parse(&["encrypt", "--key", &key, "--input", &input, "--output", &sealed]);
        run(cli.command, &config).unwrap();
        assert_eq!(fs::read(&sealed).unwrap().len(), 40);

        let cli = parse(&["decrypt", "--key", &key, "--input", &sealed, "--output", &restored]);
        run(cli.command, &config).unwrap();
        assert_eq!(fs::read(&restored).unwrap(), b"hello, world");
    }

    #[test]
    fn test_output_onto_input_refused() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        fs::write(dir.path().join("input.pdf"), b"data").unwrap();

        let key = path_arg(&dir, "data.key");
        let input = path_arg(&dir, "input.pdf");

        run(parse(&["keygen", "symmetric", "--out", &key]).command, &config).unwrap();
        let cli = parse(&["encrypt", "--key", &key, "--input", &input, "--output", &input]);
        assert!(run(cli.command, &config).is_err());
        assert_eq!(fs::read(dir.path().join("input.pdf")).unwrap(), b"data");
    }

    #[test]
    fn test_config_aad_applies() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("input"), b"data").unwrap();

        let key = path_arg(&dir, "data.key");
        let input = path_arg(&dir, "input");
        let sealed = path_arg(&dir, "sealed");
        let restored = path_arg(&dir, "restored");

        let with_aad = Config {
            associated_data: "ctx".into(),
            ..Config::default()
        };

        run(parse(&["keygen", "symmetric", "--out", &key]).command, &with_aad).unwrap();
        run(
            parse(&["encrypt", "--key", &key, "--input", &input, "--output", &sealed]).command,
            &with_aad,
        )
        .unwrap();

        // Same AAD given explicitly opens it; the default empty AAD does not
        let cli = parse(&["decrypt", "--key", &key, "--input", &sealed, "--output", &restored]);
        assert!(run(cli.command, &Config::default()).is_err());

        let cli = parse(&[
            "decrypt", "--key", &key, "--input", &sealed, "--output", &restored, "--aad", "ctx",
        ]);
        run(cli.command, &Config::default()).unwrap();
    }

    #[test]
    fn test_sign_verify_exit_codes() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        fs::write(dir.path().join("release.tar"), b"contents").unwrap();

        let keys = path_arg(&dir, "signer.pem");
        let public = path_arg(&dir, "signer.pub.pem");
        let input = path_arg(&dir, "release.tar");
        let sig = path_arg(&dir, "release.tar.sig");

        let cli = parse(&["keygen", "signing", "--out", &keys, "--public-out", &public]);
        run(cli.command, &config).unwrap();

        let cli = parse(&["sign", "--keys", &keys, "--input", &input, "--output", &sig]);
        run(cli.command, &config).unwrap();

        let cli = parse(&["verify", "--public", &public, "--input", &input, "--signature", &sig]);
        assert_eq!(run(cli.command, &config).unwrap(), exit_codes::SUCCESS);

        fs::write(dir.path().join("release.tar"), b"tampered").unwrap();
        let cli = parse(&["verify", "--public", &public, "--input", &input, "--signature", &sig]);
        assert_eq!(
            run(cli.command, &config).unwrap(),
            exit_codes::VERIFICATION_FAILED
        );
    }

    #[test]
    fn test_keygen_public_out_onto_key_file_refused() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        let keys = path_arg(&dir, "k.pem");

        let cli = parse(&["keygen", "signing", "--out", &keys, "--public-out", &keys]);
        assert!(run(cli.command, &config).is_err());
        assert!(!dir.path().join("k.pem").exists());

        let cli = parse(&["keygen", "signing", "--out", &keys]);
        run(cli.command, &config).unwrap();
        let cli = parse(&["keygen", "signing", "--out", &keys, "--public-out", &keys, "--force"]);
        assert!(run(cli.command, &config).is_err());
        assert!(storage::read_key_pair(&dir.path().join("k.pem")).is_ok());
    }

    #[test]
    fn test_keygen_keeps_existing_key_without_force() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        let key = path_arg(&dir, "data.key");

        run(parse(&["keygen", "symmetric", "--out", &key]).command, &config).unwrap();
        let original = fs::read(&key).unwrap();

        assert!(run(parse(&["keygen", "symmetric", "--out", &key]).command, &config).is_err());
        assert_eq!(fs::read(&key).unwrap(), original);

        run(parse(&["keygen", "symmetric", "--out", &key, "--force"]).command, &config).unwrap();
        assert_ne!(fs::read(&key).unwrap(), original);
    }

    #[test]
    fn test_public_key_extraction() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();

        let keys = path_arg(&dir, "signer.pem");
        let public = path_arg(&dir, "signer.pub.pem");

        run(parse(&["keygen", "signing", "--out", &keys]).command, &config).unwrap();
        run(parse(&["public-key", "--keys", &keys, "--out", &public]).command, &config).unwrap();

        let keypair = storage::read_key_pair(&dir.path().join("signer.pem")).unwrap();
        let extracted = storage::read_public_key(&dir.path().join("signer.pub.pem")).unwrap();
        assert_eq!(keypair.public_key(), extracted);
    }
}
