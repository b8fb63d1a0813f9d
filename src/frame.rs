//! Modbus RTU frames tunnelled through `AT+INVDATA`
//!
//! The logger forwards whatever follows `AT+INVDATA=<len>,` to its serial
//! side, so the client builds a complete RTU ADU itself:
//!
//! ```text
//! +----------+----------+-----------------+---------+
//! | slave id | function | payload         | CRC16   |
//! | 0x01     | 03 / 10  | address, qty .. | LE      |
//! +----------+----------+-----------------+---------+
//! ```
//!
//! and sends it hex encoded. The numeric argument of the wrapper is the byte
//! length of the ADU, CRC included.
//!
//! Sessions frame the operator's hex text with
//! [`ModbusFrame::from_payload_hex`]. [`FrameBuilder`] is the typed entry
//! point for library callers that hold register addresses and values instead
//! of hex; its frames are identical on the wire.

use tracing::debug;

use crate::constants::{
    AT_INVDATA, CRC_LEN, FC_READ_HOLDING_REGISTERS, FC_WRITE_MULTIPLE_REGISTERS,
    MAX_WRITE_REGISTERS, SLAVE_ID,
};
use crate::crc::{crc16, crc16_bytes};
use crate::error::{AssistError, AssistResult};

/// Function codes that can be tunnelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModbusFunction {
    /// FC03
    ReadHoldingRegisters,
    /// FC16
    WriteMultipleRegisters,
}

impl ModbusFunction {
    /// Raw function code
    pub fn to_u8(self) -> u8 {
        match self {
            Self::ReadHoldingRegisters => FC_READ_HOLDING_REGISTERS,
            Self::WriteMultipleRegisters => FC_WRITE_MULTIPLE_REGISTERS,
        }
    }

    /// Slave id + function code, hex encoded
    pub fn prefix(self) -> &'static str {
        match self {
            Self::ReadHoldingRegisters => "0103",
            Self::WriteMultipleRegisters => "0110",
        }
    }

    /// Human-readable name
    pub fn description(self) -> &'static str {
        match self {
            Self::ReadHoldingRegisters => "Read Holding Registers",
            Self::WriteMultipleRegisters => "Write Multiple Registers",
        }
    }
}

/// Decode a hex string, accepting either case.
pub fn decode_hex(input: &str) -> AssistResult<Vec<u8>> {
    hex::decode(input).map_err(|e| AssistError::malformed_hex(format!("'{}': {}", input, e)))
}

/// A complete RTU frame (slave id, function, payload, CRC)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModbusFrame {
    /// Raw ADU bytes including the trailing CRC
    data: Vec<u8>,
    /// Wire text of `data`
    hex: String,
}

impl ModbusFrame {
    /// Frame a caller supplied payload.
    ///
    /// `payload` is the hex text that follows the function code: address and
    /// quantity for reads, plus byte count and values for writes. The text is
    /// kept as given so the device sees exactly what the operator typed, with
    /// the checksum appended.
    ///
    /// # Example
    ///
    /// ```rust
    /// use logger_assist::{ModbusFrame, ModbusFunction};
    ///
    /// let frame = ModbusFrame::from_payload_hex(ModbusFunction::ReadHoldingRegisters, "00120001").unwrap();
    /// assert_eq!(frame.len(), 8);
    /// assert_eq!(frame.to_at_command(), "AT+INVDATA=8,010300120001240f\n");
    /// ```
    pub fn from_payload_hex(function: ModbusFunction, payload: &str) -> AssistResult<Self> {
        let body = format!("{}{}", function.prefix(), payload);
        let mut data = decode_hex(&body)?;
        let crc = crc16_bytes(&data);
        data.extend_from_slice(&crc);

        let frame = Self {
            hex: format!("{}{}", body, hex::encode(crc)),
            data,
        };
        debug!(
            "Frame built: FC={:02X} ({}), total_len={}",
            function.to_u8(),
            function.description(),
            frame.len()
        );
        Ok(frame)
    }

    /// Raw ADU bytes
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Hex text of the ADU as it goes on the wire
    #[inline]
    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    /// ADU length in bytes, CRC included
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Slave address
    #[inline]
    pub fn slave_id(&self) -> Option<u8> {
        self.data.first().copied()
    }

    /// Function code
    #[inline]
    pub fn function_code(&self) -> Option<u8> {
        self.data.get(1).copied()
    }

    /// Transmitted checksum
    pub fn crc(&self) -> Option<u16> {
        let n = self.data.len();
        if n < 2 + CRC_LEN {
            return None;
        }
        Some(u16::from_le_bytes([self.data[n - 2], self.data[n - 1]]))
    }

    /// True if the trailing CRC matches the rest of the frame.
    pub fn is_crc_valid(&self) -> bool {
        let n = self.data.len();
        match self.crc() {
            Some(crc) => crc16(&self.data[..n - CRC_LEN]) == crc,
            None => false,
        }
    }

    /// Wrap the frame in the binary-send command: `AT+INVDATA=<len>,<hex>\n`
    pub fn to_at_command(&self) -> String {
        format!("{}={},{}\n", AT_INVDATA, self.len(), self.hex)
    }
}

/// Frame builder - fluent API for typed register operations
pub struct FrameBuilder {
    data: Vec<u8>,
}

impl FrameBuilder {
    /// Start a frame for the fixed slave and the given function
    pub fn new(function: ModbusFunction) -> Self {
        Self {
            data: vec![SLAVE_ID, function.to_u8()],
        }
    }

    /// Add a big-endian address
    #[inline]
    pub fn address(mut self, addr: u16) -> Self {
        self.data.extend_from_slice(&addr.to_be_bytes());
        self
    }

    /// Add a big-endian quantity
    #[inline]
    pub fn quantity(mut self, qty: u16) -> Self {
        self.data.extend_from_slice(&qty.to_be_bytes());
        self
    }

    /// Add a byte
    #[inline]
    pub fn byte(mut self, b: u8) -> Self {
        self.data.push(b);
        self
    }

    /// Add data
    #[inline]
    pub fn data(mut self, data: &[u8]) -> Self {
        self.data.extend_from_slice(data);
        self
    }

    /// Append the CRC and finish the frame
    pub fn build(mut self) -> ModbusFrame {
        let crc = crc16_bytes(&self.data);
        self.data.extend_from_slice(&crc);
        ModbusFrame {
            hex: hex::encode(&self.data),
            data: self.data,
        }
    }

    /// Build a FC03 frame
    pub fn read_holding_registers(address: u16, quantity: u16) -> ModbusFrame {
        Self::new(ModbusFunction::ReadHoldingRegisters)
            .address(address)
            .quantity(quantity)
            .build()
    }

    /// Build a FC16 frame
    pub fn write_multiple_registers(address: u16, values: &[u16]) -> AssistResult<ModbusFrame> {
        if values.is_empty() || values.len() > MAX_WRITE_REGISTERS {
            return Err(AssistError::configuration(format!(
                "Invalid register count for FC16: {}",
                values.len()
            )));
        }

        let mut builder = Self::new(ModbusFunction::WriteMultipleRegisters)
            .address(address)
            .quantity(values.len() as u16)
            .byte((values.len() * 2) as u8);
        for &value in values {
            builder = builder.data(&value.to_be_bytes());
        }
        Ok(builder.build())
    }
}
