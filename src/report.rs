//! Operator-facing results of a session

use std::fmt;

use crate::normalize::strip_ok_prefix;

/// Settings read by the credential query, in device response order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CredentialReport {
    /// `AT+WAP`: mode, SSID and channel
    pub ap_ssid: String,
    /// `AT+WAKEY`
    pub ap_encryption: String,
    /// `AT+WSSSID`
    pub station_ssid: String,
    /// `AT+WSKEY`
    pub station_key: String,
    /// `AT+WANN`
    pub station_ip: String,
    /// `AT+WEBU`
    pub web_login: String,
}

impl CredentialReport {
    /// Build from the six raw answers, stripping the `+ok=` marker from each.
    pub fn from_raw(raw: [&str; 6]) -> Self {
        let [ap_ssid, ap_encryption, station_ssid, station_key, station_ip, web_login] =
            raw.map(strip_ok_prefix);
        Self {
            ap_ssid,
            ap_encryption,
            station_ssid,
            station_key,
            station_ip,
            web_login,
        }
    }
}

impl fmt::Display for CredentialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AP settings")?;
        writeln!(f, "\t{:<24}{}", "Mode, SSID and Channel:", self.ap_ssid)?;
        writeln!(f, "\t{:<24}{}", "Encryption:", self.ap_encryption)?;
        writeln!(f, "Station settings")?;
        writeln!(f, "\t{:<24}{}", "SSID:", self.station_ssid)?;
        writeln!(f, "\t{:<24}{}", "Key:", self.station_key)?;
        writeln!(f, "\t{:<24}{}", "IP:", self.station_ip)?;
        writeln!(f, "Web settings")?;
        write!(f, "\t{:<24}{}", "Login:", self.web_login)
    }
}

/// Result of the command sequence of one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionReport {
    /// Credential query result
    Credentials(CredentialReport),
    /// Raw answer to an AT passthrough command
    AtResponse(String),
    /// Tunnelled Modbus exchange
    ModbusResponse {
        /// AT command that carried the frame, without line terminator
        request: String,
        /// Answer with the AT transport's control bytes removed
        response: String,
    },
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credentials(report) => write!(f, "{}", report),
            Self::AtResponse(response) => write!(f, "{}", response),
            Self::ModbusResponse { response, .. } => write!(f, "{}", response),
        }
    }
}
