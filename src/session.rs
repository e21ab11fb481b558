//! Secure channel session state: the derived keys and rolling IV that
//! secure-messaging wrap/unwrap operate on.

use zeroize::Zeroize;

use crate::crypto::{BLOCK_LEN, KEY_LEN};

/// The key/IV material for an open secure channel.
///
/// `k_enc` and `k_mac` are fixed for the lifetime of the channel; `iv` rolls
/// forward after every secure command per the asymmetric rule in spec §4.3.
/// Zeroized on drop so key material doesn't linger in freed memory.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SecureSession {
    k_enc: [u8; KEY_LEN],
    k_mac: [u8; KEY_LEN],
    iv: [u8; BLOCK_LEN],
    #[zeroize(skip)]
    open: bool,
}

impl SecureSession {
    /// A session with no key material, not open. The starting state before
    /// `OPEN SECURE CHANNEL`/`MUTUALLY AUTHENTICATE` complete.
    pub fn new() -> Self {
        Self {
            k_enc: [0u8; KEY_LEN],
            k_mac: [0u8; KEY_LEN],
            iv: [0u8; BLOCK_LEN],
            open: false,
        }
    }

    /// Install freshly derived keys and the initial rolling IV, and mark the
    /// session open. Called once `MUTUALLY AUTHENTICATE` has succeeded.
    pub fn install(&mut self, k_enc: [u8; KEY_LEN], k_mac: [u8; KEY_LEN], iv: [u8; BLOCK_LEN]) {
        self.k_enc = k_enc;
        self.k_mac = k_mac;
        self.iv = iv;
        self.open = true;
    }

    /// Replace the rolling IV with the MAC received from the last secure
    /// command's response, per spec §4.3's received-MAC-becomes-next-IV rule.
    pub fn roll_iv(&mut self, new_iv: [u8; BLOCK_LEN]) {
        self.iv = new_iv;
    }

    /// Zero all key material and mark the session closed. Called on
    /// disconnect or any unrecoverable secure-messaging failure.
    pub fn clear(&mut self) {
        self.k_enc.zeroize();
        self.k_mac.zeroize();
        self.iv.zeroize();
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn k_enc(&self) -> &[u8; KEY_LEN] {
        &self.k_enc
    }

    pub fn k_mac(&self) -> &[u8; KEY_LEN] {
        &self.k_mac
    }

    pub fn iv(&self) -> &[u8; BLOCK_LEN] {
        &self.iv
    }
}

impl Default for SecureSession {
    fn default() -> Self {
        Self::new()
    }
}
