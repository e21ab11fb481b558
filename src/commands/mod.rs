//! The command codec: builders and parsers for the four fixed wallet APDUs,
//! plus the generic secure-messaging wrapper used by every command after the
//! handshake.

pub mod get_card_certificate;
pub mod mutually_authenticate;
pub mod open_secure_channel;
pub mod secure_messaging;
pub mod select;
