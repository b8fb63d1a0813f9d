//! Assistant protocol constants
//!
//! Values observed on HF-LPB100 based logger sticks:
//! - The assistant listens on UDP port 48899
//! - Modbus frames are tunnelled with `AT+INVDATA` and always address slave 0x01

use std::time::Duration;

// ============================================================================
// Transport
// ============================================================================

/// UDP port of the logger's assistant endpoint
pub const ASSIST_PORT: u16 = 48899;

/// Receive buffer size, one UDP datagram's worth
pub const RECV_BUFFER_SIZE: usize = 1500;

/// Settling time the device needs after each write
pub const DEFAULT_PACING: Duration = Duration::from_secs(1);

/// Maximum wait for a response datagram
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Unlock codes
// ============================================================================

/// Unlock code accepted by most current firmwares
pub const UNLOCK_CODE_WIFIKIT: &str = "WIFIKIT-214028-READ";

/// Unlock code of the older HF-A11 assistant
pub const UNLOCK_CODE_HF_A11: &str = "HF-A11ASSISTHREAD";

/// Default unlock code
pub const DEFAULT_UNLOCK_CODE: &str = UNLOCK_CODE_WIFIKIT;

// ============================================================================
// AT commands
// ============================================================================

/// Acknowledges the unlock handshake
pub const ACK: &str = "+ok";

/// Leaves command mode
pub const AT_QUIT: &str = "AT+Q\n";

/// AP mode, SSID and channel
pub const AT_WAP: &str = "AT+WAP\n";

/// AP encryption
pub const AT_WAKEY: &str = "AT+WAKEY\n";

/// Station SSID
pub const AT_WSSSID: &str = "AT+WSSSID\n";

/// Station key
pub const AT_WSKEY: &str = "AT+WSKEY\n";

/// Station IP
pub const AT_WANN: &str = "AT+WANN\n";

/// Web login
pub const AT_WEBU: &str = "AT+WEBU\n";

/// Binary-send wrapper used to forward Modbus frames to the serial side
pub const AT_INVDATA: &str = "AT+INVDATA";

/// Marker the device puts in front of query answers
pub const OK_PREFIX: &str = "+ok=";

/// Byte the AT transport leaves in tunnelled Modbus responses
pub const CONTROL_BYTE: u8 = 0x10;

// ============================================================================
// Modbus framing
// ============================================================================

/// Slave address used for every tunnelled frame
pub const SLAVE_ID: u8 = 0x01;

/// Read Holding Registers (FC03)
pub const FC_READ_HOLDING_REGISTERS: u8 = 0x03;

/// Write Multiple Registers (FC16)
pub const FC_WRITE_MULTIPLE_REGISTERS: u8 = 0x10;

/// Hex length of a read payload: address(2) + quantity(2)
pub const READ_PAYLOAD_HEX_LEN: usize = 8;

/// Minimum hex length of a write payload: address(2) + quantity(2) + byte count(1) + value(>=2)
pub const MIN_WRITE_PAYLOAD_HEX_LEN: usize = 14;

/// Maximum registers for FC16 (Write Multiple Registers)
///
/// Request PDU: FC(1) + address(2) + quantity(2) + byte count(1) + N x 2 <= 253
pub const MAX_WRITE_REGISTERS: usize = 123;

/// CRC length in bytes
pub const CRC_LEN: usize = 2;
