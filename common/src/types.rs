//! Common Types for the UE protocol stack
//! 
//! Defines radio bearer numbering shared by RRC, PDCP, RLC and MAC

use std::borrow::Cow;

/// Number of radio bearer slots (logical channels) handled by the stack
pub const N_RADIO_BEARERS: usize = 32;

/// Signalling radio bearer 0, always present and always in transparent mode
pub const RB_ID_SRB0: u32 = 0;
/// Signalling radio bearer 1
pub const RB_ID_SRB1: u32 = 1;
/// Signalling radio bearer 2
pub const RB_ID_SRB2: u32 = 2;
/// First data radio bearer
pub const RB_ID_DRB1: u32 = 3;

/// Check whether a logical channel id lies inside the bearer table
pub fn lcid_in_range(lcid: u32) -> bool {
    (lcid as usize) < N_RADIO_BEARERS
}

/// Human readable radio bearer name for a logical channel id
pub fn rb_id_text(lcid: u32) -> Cow<'static, str> {
    match lcid {
        RB_ID_SRB0 => Cow::Borrowed("SRB0"),
        RB_ID_SRB1 => Cow::Borrowed("SRB1"),
        RB_ID_SRB2 => Cow::Borrowed("SRB2"),
        id if lcid_in_range(id) => Cow::Owned(format!("DRB{}", id - RB_ID_DRB1 + 1)),
        id => Cow::Owned(format!("INVALID({})", id)),
    }
}
