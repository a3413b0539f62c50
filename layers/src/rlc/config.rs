//! RLC bearer modes and configuration
//! 
//! Mirrors the RLC-Config information element RRC hands over when it sets up a
//! bearer (3GPP TS 36.331, 6.3.2).

use crate::LayerError;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

/// RLC mode, numbered as RRC encodes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RlcMode {
    /// Acknowledged Mode
    Am = 0,
    /// Unacknowledged Mode, bi-directional
    UmBi = 1,
    /// Unacknowledged Mode, uplink only
    UmUniUl = 2,
    /// Unacknowledged Mode, downlink only
    UmUniDl = 3,
    /// Transparent Mode
    Tm = 4,
}

impl RlcMode {
    /// Decode an RRC mode value, `None` if it names no known mode
    pub fn from_rrc(value: u8) -> Option<Self> {
        Self::from_u8(value)
    }
    
    /// RRC encoding of this mode
    pub fn to_rrc(self) -> u8 {
        self as u8
    }
}

/// Transfer directions supported by an unacknowledged-mode entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UmDirection {
    Bidirectional,
    UplinkOnly,
    DownlinkOnly,
}

impl UmDirection {
    /// Whether SDUs from PDCP may be transmitted
    pub fn transmits(self) -> bool {
        !matches!(self, UmDirection::DownlinkOnly)
    }
    
    /// Whether PDUs from MAC may be received
    pub fn receives(self) -> bool {
        !matches!(self, UmDirection::UplinkOnly)
    }
}

/// Uplink AM parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UlAmConfig {
    /// t-PollRetransmit in ms
    pub t_poll_retx_ms: u32,
    /// pollPDU, `None` is infinity
    pub poll_pdu: Option<u32>,
    /// pollByte in kB, `None` is infinity
    pub poll_byte_kb: Option<u32>,
    /// maxRetxThreshold
    pub max_retx_thresh: u32,
}

impl Default for UlAmConfig {
    fn default() -> Self {
        Self {
            t_poll_retx_ms: 45,
            poll_pdu: None,
            poll_byte_kb: None,
            max_retx_thresh: 4,
        }
    }
}

/// Downlink AM parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DlAmConfig {
    /// t-Reordering in ms
    pub t_reordering_ms: u32,
    /// t-StatusProhibit in ms
    pub t_status_prohibit_ms: u32,
}

impl Default for DlAmConfig {
    fn default() -> Self {
        Self {
            t_reordering_ms: 35,
            t_status_prohibit_ms: 0,
        }
    }
}

/// Uplink UM parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UlUmConfig {
    /// SN field length in bits (5 or 10)
    pub sn_field_length: u8,
}

impl Default for UlUmConfig {
    fn default() -> Self {
        Self { sn_field_length: 10 }
    }
}

/// Downlink UM parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DlUmConfig {
    /// SN field length in bits (5 or 10)
    pub sn_field_length: u8,
    /// t-Reordering in ms
    pub t_reordering_ms: u32,
}

impl Default for DlUmConfig {
    fn default() -> Self {
        Self {
            sn_field_length: 10,
            t_reordering_ms: 35,
        }
    }
}

/// RLC bearer configuration as received from RRC
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RlcConfig {
    pub ul_am: UlAmConfig,
    pub dl_am: DlAmConfig,
    pub ul_um: UlUmConfig,
    pub dl_um: DlUmConfig,
}

impl UlAmConfig {
    /// Validate the uplink AM parameters
    pub fn validate(&self) -> Result<(), LayerError> {
        if self.poll_pdu == Some(0) {
            return Err(LayerError::InvalidConfiguration("pollPDU must be non-zero".into()));
        }
        if self.poll_byte_kb == Some(0) {
            return Err(LayerError::InvalidConfiguration("pollByte must be non-zero".into()));
        }
        if self.max_retx_thresh == 0 {
            return Err(LayerError::InvalidConfiguration(
                "maxRetxThreshold must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

fn validate_sn_field_length(sn_field_length: u8) -> Result<(), LayerError> {
    match sn_field_length {
        5 | 10 => Ok(()),
        other => Err(LayerError::InvalidConfiguration(format!(
            "Invalid UM SN field length: {} (must be 5 or 10 bits)",
            other
        ))),
    }
}

impl UlUmConfig {
    /// Validate the uplink UM parameters
    pub fn validate(&self) -> Result<(), LayerError> {
        validate_sn_field_length(self.sn_field_length)
    }
}

impl DlUmConfig {
    /// Validate the downlink UM parameters
    pub fn validate(&self) -> Result<(), LayerError> {
        validate_sn_field_length(self.sn_field_length)
    }
}
