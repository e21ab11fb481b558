//! Random byte sources for the engine.
//!
//! The protocol requires "cryptographically acceptable" randomness seeded
//! before first use, but does not mandate a specific source (spec §9). This
//! module expresses that as a small trait so the default can be OS entropy
//! while tests inject a deterministic stream.

use rand_core::RngCore;

use crate::error::{Error, Result};

/// A source of random bytes suitable for nonces, ephemeral keys, and the
/// mutual-authentication challenge `R`.
pub trait SecureRandom {
    /// Fill `dest` with random bytes. Returns [`Error::RngFailure`] if the
    /// source cannot produce the requested number of bytes.
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()>;
}

/// Default [`SecureRandom`] backed by the operating system's CSPRNG via
/// `rand_core::OsRng`, matching the "seeded from a non-deterministic source"
/// requirement without pinning callers to a specific RNG algorithm.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl SecureRandom for OsRandom {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        rand_core::OsRng
            .try_fill_bytes(dest)
            .map_err(|_| Error::RngFailure)
    }
}

impl<T: RngCore> SecureRandom for &mut T {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        RngCore::try_fill_bytes(*self, dest).map_err(|_| Error::RngFailure)
    }
}
