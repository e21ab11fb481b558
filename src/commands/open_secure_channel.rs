//! `OPEN SECURE CHANNEL` — exchanges the host's ephemeral public key for the
//! card's key-derivation salt.

use crate::apdu::Apdu;
use crate::constants::{ins, response_len};
use crate::error::{Error, Result};

/// Build the `OPEN SECURE CHANNEL` command carrying the host's uncompressed
/// ephemeral public key.
pub fn build(host_pub: &[u8; 64]) -> Apdu {
    let mut data = Vec::with_capacity(65);
    data.push(0x04);
    data.extend_from_slice(host_pub);
    Apdu::new(ins::CLA_WALLET, ins::OPEN_SECURE_CHANNEL, 0x00, 0x00, data)
}

/// Parse the response body into the 32-byte salt.
pub fn parse(body: &[u8]) -> Result<[u8; 32]> {
    if body.len() != response_len::OPEN_SECURE_CHANNEL {
        return Err(Error::UnexpectedResponseLength {
            expected: response_len::OPEN_SECURE_CHANNEL,
            actual: body.len(),
        });
    }
    let mut salt = [0u8; 32];
    salt.copy_from_slice(body);
    Ok(salt)
}
