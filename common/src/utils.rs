//! Common Utilities
//! 
//! Provides utility functions used across the UE protocol stack

/// Number of payload bytes rendered by [`hex_preview`] before truncating
pub const HEX_PREVIEW_LEN: usize = 32;

/// Convert a byte slice to hex string for debugging
pub fn bytes_to_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hex dump of at most [`HEX_PREVIEW_LEN`] bytes, used for per-PDU log lines
pub fn hex_preview(data: &[u8]) -> String {
    if data.len() <= HEX_PREVIEW_LEN {
        bytes_to_hex(data)
    } else {
        format!("{} ...", bytes_to_hex(&data[..HEX_PREVIEW_LEN]))
    }
}
