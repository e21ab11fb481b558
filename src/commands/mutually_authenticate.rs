//! `MUTUALLY AUTHENTICATE` — encrypts a random challenge `R` under the
//! freshly derived session keys and transmits it with a CBC-MAC, completing
//! the handshake.

use crate::apdu::Apdu;
use crate::constants::{ins, response_len, OPC_INITIAL_IV};
use crate::crypto::{self, BLOCK_LEN, KEY_LEN};
use crate::error::{Error, Result};

/// Outcome of building the `MUTUALLY AUTHENTICATE` command: the APDU to send
/// and the MAC computed over its header and ciphertext (kept only for
/// callers that want to log it; the engine does not reuse it).
pub struct Built {
    pub apdu: Apdu,
}

/// Build the `MUTUALLY AUTHENTICATE` command for challenge `r` under the
/// session keys just derived from the handshake.
pub fn build(k_enc: &[u8; KEY_LEN], k_mac: &[u8; KEY_LEN], r: &[u8; 32]) -> Result<Built> {
    let c_r = crypto::aes_cbc_encrypt(k_enc, &OPC_INITIAL_IV, &crypto::pad_bit(r))?;

    let transmitted_len = (c_r.len() + BLOCK_LEN) as u8;
    let mut mac_in = vec![
        ins::CLA_WALLET,
        ins::MUTUALLY_AUTHENTICATE,
        0x00,
        0x00,
        transmitted_len,
    ];
    mac_in.resize(BLOCK_LEN, 0x00);
    mac_in.extend_from_slice(&c_r);

    let m_r = crypto::cbc_mac(k_mac, &mac_in)?;

    let mut data = Vec::with_capacity(BLOCK_LEN + c_r.len());
    data.extend_from_slice(&m_r);
    data.extend_from_slice(&c_r);

    let apdu = Apdu::new(ins::CLA_WALLET, ins::MUTUALLY_AUTHENTICATE, 0x00, 0x00, data);
    Ok(Built { apdu })
}

/// Parse the response body: the card's response MAC, which becomes the
/// channel's initial rolling IV, and the trailing ciphertext (not decrypted
/// here; this step only needs the MAC to install the session).
pub fn parse(body: &[u8]) -> Result<[u8; BLOCK_LEN]> {
    if body.len() != response_len::MUTUALLY_AUTHENTICATE {
        return Err(Error::UnexpectedResponseLength {
            expected: response_len::MUTUALLY_AUTHENTICATE,
            actual: body.len(),
        });
    }
    let mut iv = [0u8; BLOCK_LEN];
    iv.copy_from_slice(&body[0..BLOCK_LEN]);
    Ok(iv)
}
