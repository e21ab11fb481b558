//! A secure channel protocol engine for Cryptnox contactless smart cards.
//!
//! This crate implements the host side of the Cryptnox wallet's mutual
//! authentication and secure-messaging protocol: `SELECT` the wallet
//! application, exchange ephemeral EC Diffie-Hellman keys on NIST P-256,
//! derive session keys with SHA-512, and wrap every subsequent command in
//! AES-CBC encryption with AES-CBC-MAC integrity under a rolling IV.
//!
//! The physical transport (NFC reader, PC/SC stack) and any debug logging
//! are external collaborators supplied by the caller through the
//! [`transport::Transport`] and [`sink::DebugSink`] traits; this crate only
//! models the protocol itself.

pub mod apdu;
pub mod certificate;
pub mod commands;
pub mod constants;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod keypair;
pub mod rng;
pub mod session;
pub mod sink;
pub mod transport;

pub use engine::{ConnectionState, CryptnoxClient, EngineOptions};
pub use error::{Error, Result};
