//! Protocol-fixed constants: the wallet AID, the pairing string, the two
//! fixed IVs, the success status word, and the certificate's byte offsets.

/// The Cryptnox wallet application identifier.
pub const AID: &[u8] = &[0xA0, 0x00, 0x00, 0x10, 0x00, 0x01, 0x12];

/// Pairing-key string used in session key derivation. Fixed for the
/// "Basic" device class; exactly 32 ASCII bytes, no trailing null.
pub const PAIRING_STRING: &[u8] = b"Cryptnox Basic CommonPairingData";

/// Initial IV used to encrypt the random challenge `R` sent as part of
/// `MUTUALLY AUTHENTICATE`: 16 bytes of `0x01`.
pub const OPC_INITIAL_IV: [u8; 16] = [0x01; 16];

/// Seed IV for every AES-CBC-MAC computation: 16 bytes of `0x00`.
pub const MAC_SEED_IV: [u8; 16] = [0x00; 16];

/// `SW1 SW2` value signalling success.
pub const SW_SUCCESS: (u8, u8) = (0x90, 0x00);

/// Instruction/class bytes for the four fixed wallet APDUs and the two
/// secure commands this spec exercises.
pub mod ins {
    /// `SELECT` CLA.
    pub const SELECT_CLA: u8 = 0x00;
    /// `SELECT` INS.
    pub const SELECT_INS: u8 = 0xA4;
    /// `SELECT` P1.
    pub const SELECT_P1: u8 = 0x04;
    /// `SELECT` P2.
    pub const SELECT_P2: u8 = 0x00;

    /// CLA shared by all wallet-specific commands.
    pub const CLA_WALLET: u8 = 0x80;

    /// `GET CARD CERTIFICATE` INS.
    pub const GET_CARD_CERTIFICATE: u8 = 0xF8;
    /// `OPEN SECURE CHANNEL` INS.
    pub const OPEN_SECURE_CHANNEL: u8 = 0x10;
    /// `MUTUALLY AUTHENTICATE` INS.
    pub const MUTUALLY_AUTHENTICATE: u8 = 0x11;
    /// `VERIFY PIN` INS.
    pub const VERIFY_PIN: u8 = 0x20;
    /// `GET CARD INFO` INS.
    pub const GET_CARD_INFO: u8 = 0xFA;
}

/// Byte offsets within the 146-byte `GET CARD CERTIFICATE` response body
/// (excluding the trailing `SW1 SW2`).
pub mod certificate_layout {
    /// Offset of the one-byte format identifier (`'C'`).
    pub const FORMAT_ID: usize = 0;
    /// Offset/length of the host-chosen nonce.
    pub const NONCE: std::ops::Range<usize> = 1..9;
    /// Offset of the uncompressed-point marker (must be `0x04`).
    pub const POINT_MARKER: usize = 9;
    /// Offset/length of the card's ephemeral public key (`0x04` ‖ X ‖ Y).
    pub const CARD_EPHEMERAL_PUB: std::ops::Range<usize> = 9..74;
    /// Offset/length of the DER signature trailer.
    pub const SIGNATURE: std::ops::Range<usize> = 74..146;
    /// Total body length.
    pub const TOTAL_LEN: usize = 146;
    /// Expected format identifier value.
    pub const FORMAT_ID_VALUE: u8 = b'C';
    /// Expected uncompressed-point marker value.
    pub const POINT_MARKER_VALUE: u8 = 0x04;
}

/// Fixed response lengths (body only, excluding `SW1 SW2`) for the
/// handshake steps.
pub mod response_len {
    /// `SELECT` response body length (FCI template for this fixed AID).
    pub const SELECT: usize = 24;
    /// `GET CARD CERTIFICATE` response body length.
    pub const GET_CARD_CERTIFICATE: usize = super::certificate_layout::TOTAL_LEN;
    /// `OPEN SECURE CHANNEL` response body length (32-byte salt).
    pub const OPEN_SECURE_CHANNEL: usize = 32;
    /// `MUTUALLY AUTHENTICATE` response body length (16-byte MAC + 48-byte ciphertext).
    pub const MUTUALLY_AUTHENTICATE: usize = 64;
}

/// The largest ciphertext length (MAC + encrypted body) that fits in the
/// protocol's single transmitted-length byte. See DESIGN.md open question 1.
pub const MAX_TRANSMITTED_LEN: usize = 0xFF - 16;
