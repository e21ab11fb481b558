//! `GET CARD CERTIFICATE` — retrieves the card's ephemeral key and signature,
//! bound to a host-chosen nonce.

use crate::apdu::Apdu;
use crate::certificate::CardCertificate;
use crate::constants::{ins, response_len};
use crate::error::{Error, Result};

/// Build the `GET CARD CERTIFICATE` command carrying `nonce`.
pub fn build(nonce: &[u8; 8]) -> Apdu {
    Apdu::new(ins::CLA_WALLET, ins::GET_CARD_CERTIFICATE, 0x00, 0x00, nonce.to_vec())
}

/// Parse the response body into a [`CardCertificate`], checking the fixed
/// length before handing off to certificate-level validation.
pub fn parse(body: &[u8]) -> Result<CardCertificate> {
    if body.len() != response_len::GET_CARD_CERTIFICATE {
        return Err(Error::UnexpectedResponseLength {
            expected: response_len::GET_CARD_CERTIFICATE,
            actual: body.len(),
        });
    }
    CardCertificate::parse(body)
}
