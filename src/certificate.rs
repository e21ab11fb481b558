//! The card certificate returned by `GET CARD CERTIFICATE`: the card's
//! ephemeral public key plus a signature over it, bound to the host's nonce.

use crate::constants::certificate_layout as layout;
use crate::error::{Error, Result};

/// Parsed `GET CARD CERTIFICATE` response body (invariant I5).
#[derive(Debug, Clone)]
pub struct CardCertificate {
    /// Format identifier; must equal `'C'`.
    pub format_id: u8,
    /// Host-chosen nonce echoed back by the card.
    pub nonce: [u8; 8],
    /// Card's ephemeral public key, uncompressed SEC1 point (`0x04` ‖ X ‖ Y).
    pub card_ephemeral_pub: [u8; 65],
    /// DER-encoded signature trailer, opaque to this engine (verification is
    /// out of scope, see DESIGN.md open question 3).
    pub signature: Vec<u8>,
}

impl CardCertificate {
    /// Parse a 146-byte `GET CARD CERTIFICATE` response body.
    ///
    /// Enforces invariant I5: the format byte must be `'C'` and byte 9 (the
    /// start of the card's public key) must be the uncompressed-point marker
    /// `0x04`.
    pub fn parse(body: &[u8]) -> Result<Self> {
        if body.len() != layout::TOTAL_LEN {
            return Err(Error::UnexpectedResponseLength {
                expected: layout::TOTAL_LEN,
                actual: body.len(),
            });
        }
        if body[layout::FORMAT_ID] != layout::FORMAT_ID_VALUE {
            return Err(Error::InvalidCertificate);
        }
        if body[layout::POINT_MARKER] != layout::POINT_MARKER_VALUE {
            return Err(Error::InvalidCertificate);
        }

        let mut nonce = [0u8; 8];
        nonce.copy_from_slice(&body[layout::NONCE]);

        let mut card_ephemeral_pub = [0u8; 65];
        card_ephemeral_pub.copy_from_slice(&body[layout::POINT_MARKER..layout::CARD_EPHEMERAL_PUB.end]);

        let signature = body[layout::SIGNATURE].to_vec();

        Ok(Self {
            format_id: body[layout::FORMAT_ID],
            nonce,
            card_ephemeral_pub,
            signature,
        })
    }

    /// The card's ephemeral public key without the leading `0x04` marker,
    /// as `ecdh_shared_secret` expects it.
    pub fn card_ephemeral_pub_xy(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out.copy_from_slice(&self.card_ephemeral_pub[1..]);
        out
    }
}
