#![no_main]

use libfuzzer_sys::fuzz_target;
use logger_assist::normalize::{strip_control_byte, strip_ok_prefix};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    let stripped = strip_control_byte(&text);
    assert!(!stripped.contains('\x10'));
    assert!(stripped.len() <= text.len());

    let unmarked = strip_ok_prefix(&text);
    assert!(text.len() - unmarked.len() <= 4);
});
