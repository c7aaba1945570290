//! # Digital Signature Demo
//!
//! Demonstrates ECDSA P-256 signatures and PEM key exchange.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example signing_demo
//! ```

use strongbox_core::crypto::{pem, sign, verify, KeyPair, MessageDigest, OsRng, Signature};

fn main() {
    println!("=== Strongbox Core: Digital Signature Demo ===\n");

    // Step 1: Create a keypair
    println!("Step 1: Creating P-256 signing keypair...");

    let keypair = KeyPair::generate(&mut OsRng).expect("Failed to create keypair");

    println!(
        "  Public key (SEC1 hex): {}...",
        &keypair.public_key().to_hex()[..32]
    );
    println!();

    // Step 2: Explain the signing process
    println!("Step 2: Understanding ECDSA Signatures");
    println!();
    println!("  ┌─────────────────────────────────────────────────────────────┐");
    println!("  │                   SIGNATURE FLOW                            │");
    println!("  ├─────────────────────────────────────────────────────────────┤");
    println!("  │                                                             │");
    println!("  │  SIGNING (Private Key Holder Only):                        │");
    println!("  │                                                             │");
    println!("  │    Message ─► SHA-256 ─► Digest ──┐                        │");
    println!("  │                                   ▼                        │");
    println!("  │    Private ─────────────────► ECDSA ─► DER Signature       │");
    println!("  │    Key         fresh random ──► Sign                       │");
    println!("  │                                                             │");
    println!("  │  VERIFICATION (Anyone with Public Key):                    │");
    println!("  │                                                             │");
    println!("  │    Message ─► SHA-256 ─► Digest ──┐                        │");
    println!("  │                                   ▼                        │");
    println!("  │    Public ──────────────────► ECDSA ─► true / false        │");
    println!("  │    Key         Signature ──► Verify                        │");
    println!("  │                                                             │");
    println!("  │  PROPERTIES:                                               │");
    println!("  │  • Randomized: same digest gives a new signature each time │");
    println!("  │  • Anyone with public key can verify                       │");
    println!("  │  • Malformed signatures simply fail to verify              │");
    println!("  │                                                             │");
    println!("  └─────────────────────────────────────────────────────────────┘");
    println!();

    // Step 3: Sign a message
    println!("Step 3: Signing a message...");

    let message = b"This message was sent by me and has not been tampered with.";
    println!("  Message: \"{}\"", String::from_utf8_lossy(message));

    let digest = MessageDigest::sha256(message);
    let signature = sign(&keypair, &digest, &mut OsRng).expect("Signing failed");

    println!("  Signature (DER hex): {}", signature.to_hex());
    println!("  Signature length: {} bytes", signature.as_der().len());
    println!();

    // Step 4: Verify the signature
    println!("Step 4: Verifying the signature...");

    if verify(&keypair.public_key(), &digest, &signature) {
        println!("  [OK] Signature is valid!");
    } else {
        println!("  [FAILED] Signature verification failed!");
    }
    println!();

    // Step 5: Demonstrate forgery detection
    println!("Step 5: Forgery detection...");

    let tampered = MessageDigest::sha256(b"This message was sent by me and HAS been tampered with.");
    if verify(&keypair.public_key(), &tampered, &signature) {
        println!("  [FAILED] Tampered message was accepted!");
    } else {
        println!("  [OK] Tampered message rejected");
    }

    let impostor = KeyPair::generate(&mut OsRng).expect("Failed to create keypair");
    if verify(&impostor.public_key(), &digest, &signature) {
        println!("  [FAILED] Wrong public key was accepted!");
    } else {
        println!("  [OK] Wrong public key rejected");
    }

    if verify(&keypair.public_key(), &digest, &Signature::from_der(b"garbage")) {
        println!("  [FAILED] Garbage signature was accepted!");
    } else {
        println!("  [OK] Garbage signature rejected");
    }
    println!();

    // Step 6: Share the public key as PEM
    println!("Step 6: Exporting keys as PEM...");

    let public_pem = pem::encode_public(&keypair.public_key()).expect("Failed to encode public key");
    println!("{}", public_pem);

    let restored = pem::decode_public(&public_pem).expect("Failed to decode public key");
    if verify(&restored, &digest, &signature) {
        println!("  [OK] Signature verifies against the PEM-restored key");
    } else {
        println!("  [FAILED] PEM-restored key rejected the signature!");
    }
    println!();

    println!("=== Example Complete ===");
}
