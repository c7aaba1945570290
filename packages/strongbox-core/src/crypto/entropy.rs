//! # Entropy Source
//!
//! Every operation that needs randomness takes the random source as an
//! argument. Nothing in this crate reaches for a global RNG on its own, so
//! tests can substitute seeded or failing sources.
//!
//! ```text
//! caller ──► &mut impl CryptoRngCore ──► fill() ──► nonce / key bytes
//!                                   └──► fork() ──► one-shot StdRng ──► ECDSA
//! ```
//!
//! `OsRng` is the production choice: it asks the operating system on every
//! call and holds no state, so concurrent callers can each use their own
//! handle.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// The default random source (operating system CSPRNG)
pub use rand::rngs::OsRng;

/// Fill `dest` from `rng`, surfacing source failures as errors
pub fn fill<R: CryptoRngCore + ?Sized>(rng: &mut R, dest: &mut [u8]) -> Result<()> {
    rng.try_fill_bytes(dest).map_err(|e| {
        tracing::error!("Entropy source failed while filling {} bytes", dest.len());
        Error::EntropySourceFailure(e.to_string())
    })
}

/// Draw a fresh 256-bit seed from `rng` and return a generator built on it
///
/// For APIs that pull randomness through the infallible
/// `RngCore::fill_bytes` (hedged ECDSA). Source failures surface here, before
/// the API is called.
pub(crate) fn fork<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Result<StdRng> {
    let mut seed = Zeroizing::new([0u8; 32]);
    fill(rng, &mut seed[..])?;
    Ok(StdRng::from_seed(*seed))
}

/// Random sources for tests
#[cfg(test)]
pub(crate) mod testing {
    use rand_core::{CryptoRng, RngCore};

    /// An entropy source whose every request fails
    pub(crate) struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand_core::Error> {
            Err(rand_core::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "entropy pool unavailable",
            )))
        }
    }

    impl CryptoRng for FailingRng {}
}

// ============================================================================
// TESTS
// ============================================================================
