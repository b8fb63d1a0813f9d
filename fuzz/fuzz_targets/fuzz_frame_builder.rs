#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use logger_assist::{ModbusFrame, ModbusFunction};

#[derive(Debug, Arbitrary)]
struct Input {
    write: bool,
    payload: String,
}

fuzz_target!(|input: Input| {
    let function = if input.write {
        ModbusFunction::WriteMultipleRegisters
    } else {
        ModbusFunction::ReadHoldingRegisters
    };

    if let Ok(frame) = ModbusFrame::from_payload_hex(function, &input.payload) {
        assert!(frame.is_crc_valid());
        assert_eq!(frame.len() * 2, frame.as_hex().len());
        assert!(frame
            .to_at_command()
            .starts_with(&format!("AT+INVDATA={},", frame.len())));
    }
});
