//! CRC-16/CCITT-FALSE: poly 0x1021, init 0xFFFF, no reflection, no final XOR.

use crate::error::{PayloadError, Result};

const POLY: u16 = 0x1021;
const INIT: u16 = 0xFFFF;

pub fn crc16_ccitt_false(data: &[u8]) -> u16 {
    let mut crc = INIT;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Four uppercase hex digits over the ASCII bytes of `prefixed`, which is
/// expected to already end in `6304`.
pub fn checksum(prefixed: &str) -> Result<String> {
    if !prefixed.is_ascii() {
        return Err(PayloadError::MalformedPayload(
            "checksum input must be ASCII".to_string(),
        ));
    }
    Ok(format!("{:04X}", crc16_ccitt_false(prefixed.as_bytes())))
}
