//! The protocol engine: the state machine that drives `connect`,
//! `establish_secure_channel`, `verify_pin`, `get_card_info`,
//! `send_secure_command`, and `disconnect`.

use bytes::Bytes;
use zeroize::Zeroize;

use crate::commands::{get_card_certificate, mutually_authenticate, open_secure_channel, secure_messaging, select};
use crate::constants::ins;
use crate::crypto;
use crate::error::{Error, Result};
use crate::keypair::EphemeralKeyPair;
use crate::rng::SecureRandom;
use crate::session::SecureSession;
use crate::sink::{DebugSink, NullSink};
use crate::transport::Transport;

/// Engine configuration knobs. The engine is a protocol state machine, not a
/// service, so this stays small: a hint transports can use to size their
/// read buffer up front, matching the 255-byte response buffer this
/// protocol never exceeds.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Suggested response buffer size. Informational: this crate's own
    /// buffers are `Vec`s that grow as needed.
    pub response_buffer_hint: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { response_buffer_hint: 255 }
    }
}

/// The engine's connection state, mirroring the handshake's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Selected,
    CertReceived,
    OpcSent,
    Authenticated,
}

/// The Cryptnox secure channel protocol engine.
///
/// Owns a [`SecureSession`] and drives it through the handshake and
/// subsequent secure commands against a caller-supplied [`Transport`]. `R`
/// is the randomness source and `S` the optional debug sink; both are
/// generic so embedded callers can use static dispatch.
pub struct CryptnoxClient<T: Transport, R: SecureRandom, S: DebugSink = NullSink> {
    transport: T,
    rng: R,
    sink: S,
    options: EngineOptions,
    session: SecureSession,
    state: ConnectionState,
}

impl<T: Transport, R: SecureRandom> CryptnoxClient<T, R, NullSink> {
    /// Construct an engine with no debug sink and default options.
    pub fn new(transport: T, rng: R) -> Self {
        Self::with_sink(transport, rng, NullSink)
    }
}

impl<T: Transport, R: SecureRandom, S: DebugSink> CryptnoxClient<T, R, S> {
    /// Construct an engine with an explicit debug sink and default options.
    pub fn with_sink(transport: T, rng: R, sink: S) -> Self {
        Self::with_options(transport, rng, sink, EngineOptions::default())
    }

    /// Construct an engine with explicit options.
    pub fn with_options(transport: T, rng: R, sink: S, options: EngineOptions) -> Self {
        Self {
            transport,
            rng,
            sink,
            options,
            session: SecureSession::new(),
            state: ConnectionState::Idle,
        }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// Connect to the card and establish the secure channel. Equivalent to
    /// checking card presence then calling [`Self::establish_secure_channel`].
    pub fn connect(&mut self) -> Result<()> {
        if !self.transport.is_card_present() {
            return Err(Error::NoCard);
        }
        self.establish_secure_channel()
    }

    /// Run the full handshake: `SELECT`, `GET CARD CERTIFICATE`,
    /// `OPEN SECURE CHANNEL`, key derivation, `MUTUALLY AUTHENTICATE`.
    /// On any failure the session is cleared and the engine returns to
    /// `Idle`.
    pub fn establish_secure_channel(&mut self) -> Result<()> {
        match self.establish_secure_channel_inner() {
            Ok(()) => Ok(()),
            Err(e) => {
                self.session.clear();
                self.state = ConnectionState::Idle;
                Err(e)
            }
        }
    }

    fn establish_secure_channel_inner(&mut self) -> Result<()> {
        // A non-ISO-DEP card listed by the reader surfaces here as SELECT
        // failing; reported as CardNotSupported rather than a generic SW
        // mismatch.
        self.exchange_expect_ok(select::build().to_bytes())
            .map_err(|_| Error::CardNotSupported)?;
        self.state = ConnectionState::Selected;

        let mut nonce = [0u8; 8];
        self.rng.fill_bytes(&mut nonce)?;
        let cert_body = self.exchange_expect_ok(get_card_certificate::build(&nonce).to_bytes())?;
        let certificate = get_card_certificate::parse(&cert_body)?;
        self.state = ConnectionState::CertReceived;

        let host_keypair = EphemeralKeyPair::generate(&mut self.rng)?;

        let opc_body = self.exchange_expect_ok(open_secure_channel::build(host_keypair.public_key()).to_bytes())?;
        let salt = open_secure_channel::parse(&opc_body)?;
        self.state = ConnectionState::OpcSent;

        let mut z = crypto::ecdh_shared_secret(&certificate.card_ephemeral_pub_xy(), host_keypair.private_key())?;
        let (k_enc, k_mac) = crypto::derive_session_keys(&z, crate::constants::PAIRING_STRING, &salt);
        z.zeroize();

        let mut r = [0u8; 32];
        self.rng.fill_bytes(&mut r)?;
        let built = mutually_authenticate::build(&k_enc, &k_mac, &r)?;
        r.zeroize();
        let ma_body = self.exchange_expect_ok(built.apdu.to_bytes())?;
        let iv = mutually_authenticate::parse(&ma_body)?;

        self.session.install(k_enc, k_mac, iv);
        self.state = ConnectionState::Authenticated;
        Ok(())
    }

    /// `VERIFY PIN`: send the ASCII PIN (at most 8 bytes) as a secure
    /// command. `Ok` with a non-success status word surfaces as
    /// [`Error::AppStatus`]; the session stays open.
    pub fn verify_pin(&mut self, pin_ascii: &[u8]) -> Result<()> {
        self.send_secure_command(ins::CLA_WALLET, ins::VERIFY_PIN, 0x00, 0x00, pin_ascii)?;
        Ok(())
    }

    /// `GET CARD INFO`: a fixed one-byte-payload secure command.
    pub fn get_card_info(&mut self) -> Result<Vec<u8>> {
        self.send_secure_command(ins::CLA_WALLET, ins::GET_CARD_INFO, 0x00, 0x00, &[0x00])
    }

    /// Send an arbitrary secure application command. Requires the channel
    /// to be open (invariant I4); rolls the session IV on a MAC-verified
    /// response regardless of the application status word.
    pub fn send_secure_command(&mut self, cla: u8, ins: u8, p1: u8, p2: u8, data: &[u8]) -> Result<Vec<u8>> {
        if !self.session.is_open() {
            return Err(Error::SessionClosed);
        }

        let apdu = secure_messaging::wrap(&self.session, cla, ins, p1, p2, data)?;
        let sent_mac: [u8; 16] = apdu.data[0..16].try_into().expect("wrap always prefixes a 16-byte MAC");

        self.sink.print_hex("send", &apdu.to_bytes());
        let (resp_body, sw1, sw2) = self.transport.send_apdu(&apdu.to_bytes())?;
        self.sink.print_hex("recv", &resp_body);

        match secure_messaging::unwrap(&mut self.session, &sent_mac, &resp_body, sw1, sw2) {
            Ok(unwrapped) if unwrapped.sw1 == 0x90 && unwrapped.sw2 == 0x00 => Ok(unwrapped.data),
            Ok(unwrapped) => Err(Error::AppStatus {
                sw1: unwrapped.sw1,
                sw2: unwrapped.sw2,
                body: unwrapped.data,
            }),
            Err(e) => {
                self.session.clear();
                self.state = ConnectionState::Idle;
                Err(e)
            }
        }
    }

    /// Tear down the channel: zeroize session key material and reset the
    /// reader. Idempotent: calling it on an already-closed session is a
    /// no-op (property P7).
    pub fn disconnect(&mut self) -> Result<()> {
        self.session.clear();
        self.state = ConnectionState::Idle;
        self.transport.reset_reader()
    }

    fn exchange_expect_ok(&mut self, command: Bytes) -> Result<Vec<u8>> {
        self.sink.print_hex("send", &command);
        let (data, sw1, sw2) = self.transport.send_apdu(&command)?;
        self.sink.print_hex("recv", &data);
        if (sw1, sw2) != crate::constants::SW_SUCCESS {
            return Err(Error::UnexpectedSw { sw1, sw2 });
        }
        Ok(data)
    }
}
