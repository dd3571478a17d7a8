//! Daemon configuration model and parser.
//!
//! The configuration source is a plain-text resource holding three
//! whitespace-separated tokens:
//!
//! ```text
//! <vendor-id> <product-id> <input-source-code>
//! ```
//!
//! e.g. `ABC123 DEF456 15`. The format is an observable contract shared
//! with existing deployments, so it is parsed by hand rather than through a
//! structured config format. Tokens past the third are ignored.

use thiserror::Error;

/// The DDC/CI VCP feature code for Input Source Select (VESA MCCS).
///
/// Writing a value to this feature switches the monitor's active video
/// input. This is the wire-level contract with the physical display and
/// must not change.
pub const INPUT_SELECT_VCP_CODE: u8 = 0x60;

/// Errors produced while parsing the configuration text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigParseError {
    /// Fewer than three whitespace-separated tokens were present.
    #[error("config must contain vendor id, product id, and input source code")]
    MissingToken,

    /// The third token was not an unsigned integer.
    #[error("input source code is not a number: {0:?}")]
    InvalidInputSource(String),
}

/// The USB device signature that triggers an input switch.
///
/// Both fields are matched as case-sensitive substrings of the device
/// interface path reported by the OS (paths carry firmware-reported
/// identifiers, typically uppercase).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDeviceSpec {
    /// Vendor identifier fragment, e.g. `"046D"`.
    pub vendor_id: String,
    /// Product identifier fragment, e.g. `"C52B"`.
    pub product_id: String,
}

/// A VCP Input Source Select value identifying one video input
/// (e.g. 15 = DisplayPort-1, 17 = HDMI-1 on most monitors).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSourceCode(pub u32);

/// Complete daemon configuration, loaded once at startup and immutable for
/// the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// Device signature that arms the switch.
    pub device: TargetDeviceSpec,
    /// Input source the primary display is switched to on arrival.
    pub input_source: InputSourceCode,
}

impl DaemonConfig {
    /// Parses the three-token configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigParseError`] if a token is missing or the input
    /// source code is not an unsigned integer.
    pub fn parse(text: &str) -> Result<Self, ConfigParseError> {
        let mut tokens = text.split_whitespace();
        let vendor_id = tokens.next().ok_or(ConfigParseError::MissingToken)?;
        let product_id = tokens.next().ok_or(ConfigParseError::MissingToken)?;
        let code = tokens.next().ok_or(ConfigParseError::MissingToken)?;

        let code: u32 = code
            .parse()
            .map_err(|_| ConfigParseError::InvalidInputSource(code.to_string()))?;

        Ok(Self {
            device: TargetDeviceSpec {
                vendor_id: vendor_id.to_string(),
                product_id: product_id.to_string(),
            },
            input_source: InputSourceCode(code),
        })
    }
}
