//! APDU command/response value types and their wire encoding.

use bytes::{BufMut, Bytes, BytesMut};

use crate::constants::SW_SUCCESS;

/// A command APDU: `CLA INS P1 P2 [Lc Data] [Le]`. This engine only ever
/// builds case-3 APDUs (data present, no `Le`), matching the four fixed
/// wallet commands and the secure-messaging wrapper.
#[derive(Debug, Clone)]
pub struct Apdu {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: Vec<u8>,
}

impl Apdu {
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8, data: Vec<u8>) -> Self {
        Self { cla, ins, p1, p2, data }
    }

    /// Serialize to wire bytes: `CLA INS P1 P2 Lc Data`. `Lc` is the data
    /// length, which must fit in a single byte (protocol commands never
    /// exceed 255 bytes of data; see DESIGN.md open question 1).
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(5 + self.data.len());
        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);
        buffer.put_u8(self.data.len() as u8);
        buffer.put_slice(&self.data);
        buffer.freeze()
    }
}

/// A response APDU: the data body plus the two trailing status bytes.
#[derive(Debug, Clone)]
pub struct Response {
    pub data: Bytes,
    pub sw1: u8,
    pub sw2: u8,
}

impl Response {
    pub fn new(data: impl Into<Bytes>, sw1: u8, sw2: u8) -> Self {
        Self { data: data.into(), sw1, sw2 }
    }

    /// Whether `sw1 sw2` is the success sentinel `9000`.
    pub fn is_success(&self) -> bool {
        (self.sw1, self.sw2) == SW_SUCCESS
    }
}
