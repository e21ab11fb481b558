//! Debug sink: an optional hex-dump/line-printing hook for the handshake
//! and secure-messaging paths. The engine never relies on a sink being
//! present or its output being observable (spec §6).

/// Minimal line-printing/hex-dump contract a debug sink must satisfy.
pub trait DebugSink {
    /// Print a labelled hex dump of `bytes`.
    fn print_hex(&mut self, label: &str, bytes: &[u8]);

    /// Print a plain message.
    fn println(&mut self, msg: &str);
}

/// A sink that discards everything. The default when no caller-supplied
/// sink is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn print_hex(&mut self, _label: &str, _bytes: &[u8]) {}
    fn println(&mut self, _msg: &str) {}
}

/// A sink that forwards to `tracing` at `trace` level, for callers who want
/// the dump folded into their existing structured logs rather than a
/// separate sink implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DebugSink for TracingSink {
    fn print_hex(&mut self, label: &str, bytes: &[u8]) {
        tracing::trace!(%label, bytes = %hex_string(bytes), "apdu trace");
    }

    fn println(&mut self, msg: &str) {
        tracing::trace!("{msg}");
    }
}

fn hex_string(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}
