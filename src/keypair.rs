//! Ephemeral key pairs used once per `OPEN SECURE CHANNEL` handshake.

use zeroize::Zeroize;

use crate::crypto;
use crate::rng::SecureRandom;

/// An ephemeral P-256 key pair. The private scalar is zeroized on drop; the
/// public point is exchanged with the card in the clear as part of the
/// certificate/handshake messages.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct EphemeralKeyPair {
    private_key: [u8; 32],
    #[zeroize(skip)]
    public_key: [u8; 64],
}

impl EphemeralKeyPair {
    /// Generate a new ephemeral key pair from `rng`.
    pub fn generate<R: SecureRandom>(rng: &mut R) -> crate::error::Result<Self> {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed)?;
        let mut csprng = SeedRng::new(seed);
        let (private_key, public_key) = crypto::generate_keypair(&mut csprng);
        Ok(Self { private_key, public_key })
    }

    pub fn public_key(&self) -> &[u8; 64] {
        &self.public_key
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }
}

/// Adapts a 32-byte seed from a [`SecureRandom`] into the `rand_core`
/// traits `p256`'s key generation expects, without depending on a specific
/// third-party RNG algorithm at the API boundary.
struct SeedRng {
    state: [u8; 32],
    counter: u64,
}

impl SeedRng {
    fn new(seed: [u8; 32]) -> Self {
        Self { state: seed, counter: 0 }
    }
}

impl rand_core::RngCore for SeedRng {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(32) {
            self.counter += 1;
            let block = crypto::sha512(&[self.state.as_slice(), &self.counter.to_le_bytes()].concat());
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl rand_core::CryptoRng for SeedRng {}
