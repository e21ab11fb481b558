//! APDU transport contract: the boundary between this engine and whatever
//! moves bytes to and from the card (an NFC reader, a PC/SC stack, a mock).

use std::fmt;

use crate::error::Result;

/// Minimal capability interface a card transport must provide. The engine
/// never reasons about reader internals, UID reads, or passive-target
/// listing; it only sends command bytes and reads back a response plus
/// status word.
pub trait Transport: fmt::Debug {
    /// Whether a card is currently present in the field.
    fn is_card_present(&mut self) -> bool;

    /// Send a full command APDU and return `(data, sw1, sw2)`, where `data`
    /// excludes the trailing status bytes.
    fn send_apdu(&mut self, command: &[u8]) -> Result<(Vec<u8>, u8, u8)>;

    /// Reset the reader. Must be idempotent and safe to call with no card
    /// present.
    fn reset_reader(&mut self) -> Result<()>;
}
