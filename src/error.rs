//! Error types for the Cryptnox secure channel engine.
//!
//! This module centralizes every failure mode the engine can produce so that
//! callers match on a single taxonomy instead of threading ad hoc string
//! errors through the handshake and secure-messaging paths.

use thiserror::Error;

/// Result type for Cryptnox secure channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the Cryptnox secure channel engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The transport reported no passive target in the field.
    #[error("no card present")]
    NoCard,

    /// The `SELECT` step failed in a way consistent with a non-ISO-DEP card
    /// having been listed by the reader.
    #[error("card does not support the Cryptnox application")]
    CardNotSupported,

    /// The underlying APDU exchange failed.
    #[error("transport failed: {0}")]
    TransportFailed(String),

    /// A handshake step returned a status word other than `9000`.
    #[error("unexpected status word {sw1:02X}{sw2:02X}")]
    UnexpectedSw {
        /// First status byte.
        sw1: u8,
        /// Second status byte.
        sw2: u8,
    },

    /// A handshake response had a length other than the one the protocol
    /// fixes for that step.
    #[error("unexpected response length: expected {expected}, got {actual}")]
    UnexpectedResponseLength {
        /// Length mandated by the protocol for this step.
        expected: usize,
        /// Length actually observed.
        actual: usize,
    },

    /// The card certificate's format byte or uncompressed-point marker was
    /// wrong (invariant I5).
    #[error("invalid card certificate")]
    InvalidCertificate,

    /// ECDH shared-secret computation failed or returned an all-zero point.
    #[error("ECDH key agreement failed")]
    EcdhFailure,

    /// The RNG could not produce the requested number of bytes.
    #[error("RNG failure")]
    RngFailure,

    /// Secure-messaging response MAC verification failed.
    #[error("MAC mismatch on secure channel response")]
    MacMismatch,

    /// A secure command was attempted while the session was not open.
    #[error("secure channel is not open")]
    SessionClosed,

    /// A padding/no-padding precondition was violated, or a secure-command
    /// payload would overflow the one-byte transmitted-length field.
    #[error("invalid length: {0}")]
    InvalidLength(&'static str),

    /// The secure command succeeded cryptographically but the card returned
    /// a non-`9000` application status. Recoverable: the session stays open.
    #[error("application status {sw1:02X}{sw2:02X}")]
    AppStatus {
        /// First status byte.
        sw1: u8,
        /// Second status byte.
        sw2: u8,
        /// Decrypted response body, if any.
        body: Vec<u8>,
    },
}
