//! # Encryption Demo
//!
//! Demonstrates sealing data at rest into a self-contained envelope.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example encryption_demo
//! ```

use strongbox_core::crypto::{
    open_envelope, seal, unwrap, wrap, KeySize, Nonce, OsRng, Sealer, SymmetricKey,
};

fn main() {
    println!("=== Strongbox Core: Encryption at Rest Demo ===\n");

    // Step 1: Generate a key
    println!("Step 1: Generating an AES-128 key...");

    let key = SymmetricKey::generate(KeySize::Aes128, &mut OsRng).expect("Failed to generate key");
    println!("  Key size: {}", key.size());
    println!();

    // Step 2: Seal with a fresh nonce
    println!("Step 2: Sealing a payload (AES-GCM)...");

    let message = b"hello, world";
    let associated_data = b"input.pdf";
    let nonce = Nonce::generate(&mut OsRng).expect("Failed to draw nonce");

    let sealed = seal(&key, &nonce, message, associated_data).expect("Encryption failed");

    println!("  Plaintext: \"{}\"", String::from_utf8_lossy(message));
    println!("  Nonce (hex): {}", hex::encode(nonce.as_bytes()));
    println!(
        "  Sealed length: {} bytes (plaintext: {} bytes + 16-byte tag)",
        sealed.len(),
        message.len()
    );
    println!();

    // Step 3: Lay out the envelope
    println!("Step 3: Wrapping into an envelope...");
    println!();
    println!("  ┌──────────────┬──────────────────────────────┬──────────────────┐");
    println!("  │ nonce (12)   │ ciphertext (len(plaintext))  │ tag (16)         │");
    println!("  └──────────────┴──────────────────────────────┴──────────────────┘");
    println!();

    let envelope = wrap(&nonce, &sealed);
    println!("  Envelope length: {} bytes", envelope.len());

    let (parsed_nonce, _) = unwrap(&envelope).expect("Envelope should parse");
    if parsed_nonce == nonce {
        println!("  [OK] Nonce recovered from envelope prefix");
    } else {
        println!("  [FAILED] Nonce mismatch!");
        return;
    }
    println!();

    // Step 4: Open the envelope
    println!("Step 4: Opening the envelope...");

    let opened =
        open_envelope(&key, &envelope, associated_data).expect("Decryption failed");
    println!("  Decrypted: \"{}\"", String::from_utf8_lossy(&opened));

    if opened == message {
        println!("  [OK] Payload recovered");
    } else {
        println!("  [FAILED] Decryption produced wrong result!");
    }
    println!();

    // Step 5: Tamper detection
    println!("Step 5: Tamper detection (AEAD integrity)...");

    let mut tampered = envelope.clone();
    let last = tampered.len() - 1;
    tampered[last] ^= 0x01;

    match open_envelope(&key, &tampered, associated_data) {
        Ok(_) => println!("  [FAILED] Tampered envelope was accepted!"),
        Err(e) => println!("  [OK] Tampered envelope rejected: {}", e),
    }

    match open_envelope(&key, &envelope, b"other.pdf") {
        Ok(_) => println!("  [FAILED] Wrong associated data was accepted!"),
        Err(e) => println!("  [OK] Wrong associated data rejected: {}", e),
    }

    let other_key =
        SymmetricKey::generate(KeySize::Aes128, &mut OsRng).expect("Failed to generate key");
    match open_envelope(&other_key, &envelope, associated_data) {
        Ok(_) => println!("  [FAILED] Wrong key was accepted!"),
        Err(e) => println!("  [OK] Wrong key rejected: {}", e),
    }

    match open_envelope(&key, &envelope[..20], associated_data) {
        Ok(_) => println!("  [FAILED] Truncated envelope was accepted!"),
        Err(e) => println!("  [OK] Truncated envelope rejected: {}", e),
    }
    println!();

    // Step 6: Nonce budget
    println!("Step 6: Sealer with a nonce budget...");

    let sealer = Sealer::with_limit(&key, 3).expect("Failed to create sealer");
    for i in 0..4 {
        match sealer.seal_envelope(format!("record {}", i).as_bytes(), b"", &mut OsRng) {
            Ok(env) => println!("  Sealed record {} ({} bytes)", i, env.len()),
            Err(e) => println!("  [OK] Record {} refused: {}", i, e),
        }
    }
    println!("  Sealed so far: {}", sealer.sealed_count());
    println!();

    println!("=== Example Complete ===");
}
