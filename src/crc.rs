//! CRC16 for Modbus RTU frames
//!
//! Polynomial 0xA001 (reflected 0x8005), initial register 0xFFFF, no final
//! xor. The checksum goes on the wire low byte first.

use ::crc::{Crc, CRC_16_MODBUS};

/// CRC calculator for RTU frames
const CRC_MODBUS: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

/// Compute the Modbus CRC16 register over `data`.
#[inline]
pub fn crc16(data: &[u8]) -> u16 {
    CRC_MODBUS.checksum(data)
}

/// Compute the Modbus CRC16 over `data` in wire order (little-endian).
#[inline]
pub fn crc16_bytes(data: &[u8]) -> [u8; 2] {
    crc16(data).to_le_bytes()
}
