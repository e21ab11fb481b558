//! The generic secure-messaging wrapper (spec §4.2): encrypt-then-MAC on
//! send, MAC-then-decrypt on receive, with the asymmetric IV rule that
//! decrypts under the *sent* MAC but rolls the session IV to the *received*
//! MAC.

use crate::apdu::Apdu;
use crate::constants::MAX_TRANSMITTED_LEN;
use crate::crypto::{self, BLOCK_LEN};
use crate::error::{Error, Result};
use crate::session::SecureSession;

/// A secure command's decrypted result.
pub struct Unwrapped {
    pub data: Vec<u8>,
    pub sw1: u8,
    pub sw2: u8,
}

/// Encrypt and MAC a plaintext application command under the session's
/// current keys and IV, returning the APDU ready for transmission.
pub fn wrap(session: &SecureSession, cla: u8, ins: u8, p1: u8, p2: u8, plaintext: &[u8]) -> Result<Apdu> {
    let c = crypto::aes_cbc_encrypt(session.k_enc(), session.iv(), &crypto::pad_bit(plaintext))?;
    if c.len() > MAX_TRANSMITTED_LEN {
        return Err(Error::InvalidLength("secure command ciphertext exceeds the one-byte length field"));
    }

    let transmitted_len = (c.len() + BLOCK_LEN) as u8;
    let mut mac_in = vec![cla, ins, p1, p2, transmitted_len];
    mac_in.resize(BLOCK_LEN, 0x00);
    mac_in.extend_from_slice(&c);
    let m = crypto::cbc_mac(session.k_mac(), &mac_in)?;

    let mut data = Vec::with_capacity(BLOCK_LEN + c.len());
    data.extend_from_slice(&m);
    data.extend_from_slice(&c);

    Ok(Apdu::new(cla, ins, p1, p2, data))
}

/// Verify and decrypt a secure command's response, rolling the session's IV
/// forward on success. `sent_mac` is the MAC this engine computed when
/// building the request (used as the decryption IV, per the protocol's
/// asymmetric IV rule); the session's own rolling IV is left untouched until
/// the response MAC has verified.
pub fn unwrap(
    session: &mut SecureSession,
    sent_mac: &[u8; BLOCK_LEN],
    response_body: &[u8],
    sw1: u8,
    sw2: u8,
) -> Result<Unwrapped> {
    if response_body.len() < BLOCK_LEN {
        return Err(Error::UnexpectedResponseLength {
            expected: BLOCK_LEN,
            actual: response_body.len(),
        });
    }
    let (received_mac_bytes, ciphertext) = response_body.split_at(BLOCK_LEN);
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(Error::InvalidLength("secure response ciphertext must be a multiple of 16 bytes"));
    }

    let transmitted_len = ciphertext.len() as u8;
    let mut mac_in = vec![transmitted_len];
    mac_in.resize(BLOCK_LEN, 0x00);
    mac_in.extend_from_slice(ciphertext);
    let computed_mac = crypto::cbc_mac(session.k_mac(), &mac_in)?;

    if computed_mac.as_slice() != received_mac_bytes {
        return Err(Error::MacMismatch);
    }

    let plaintext = if ciphertext.is_empty() {
        Vec::new()
    } else {
        crypto::unpad_bit(&crypto::aes_cbc_decrypt(session.k_enc(), sent_mac, ciphertext)?)?
    };

    let mut next_iv = [0u8; BLOCK_LEN];
    next_iv.copy_from_slice(received_mac_bytes);
    session.roll_iv(next_iv);

    Ok(Unwrapped { data: plaintext, sw1, sw2 })
}
