//! Response cleanup
//!
//! Pure transforms from the raw text of a datagram to what the operator sees.
//! Query answers carry a `+ok=` marker; tunnelled Modbus answers carry stray
//! 0x10 bytes from the stick's own serial framing. Never apply the `+ok=`
//! rule to Modbus or passthrough answers.

use crate::constants::{CONTROL_BYTE, OK_PREFIX};

/// Remove the first `+ok=` marker.
///
/// ```rust
/// use logger_assist::normalize::strip_ok_prefix;
///
/// assert_eq!(strip_ok_prefix("+ok=HF-LPB100\r\n"), "HF-LPB100\r\n");
/// assert_eq!(strip_ok_prefix("no-marker"), "no-marker");
/// ```
pub fn strip_ok_prefix(response: &str) -> String {
    response.replacen(OK_PREFIX, "", 1)
}

/// Remove every 0x10 byte, keeping everything else in order.
pub fn strip_control_byte(response: &str) -> String {
    response
        .chars()
        .filter(|&c| c != char::from(CONTROL_BYTE))
        .collect()
}
