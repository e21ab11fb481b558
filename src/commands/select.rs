//! `SELECT` — selects the Cryptnox wallet application by AID.

use crate::apdu::Apdu;
use crate::constants::{ins, AID};

/// Build the `SELECT` command for the fixed wallet AID.
pub fn build() -> Apdu {
    Apdu::new(ins::SELECT_CLA, ins::SELECT_INS, ins::SELECT_P1, ins::SELECT_P2, AID.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_expected_wire_bytes() {
        let bytes = build().to_bytes();
        assert_eq!(&bytes[..], [0x00, 0xA4, 0x04, 0x00, 0x07, 0xA0, 0x00, 0x00, 0x10, 0x00, 0x01, 0x12]);
    }
}
