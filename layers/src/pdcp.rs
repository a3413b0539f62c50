//! Packet Data Convergence Protocol (PDCP) interface
//! 
//! PDCP sits on top of RLC. Only the service access point RLC delivers into is
//! defined here; PDCP itself lives outside this crate.

use bytes::Bytes;

/// PDCP-RLC interface, called by RLC to hand received data upwards
pub trait PdcpRlcInterface: Send + Sync {
    /// Deliver a reassembled SDU received on bearer `lcid`
    fn write_pdu(&self, lcid: u32, sdu: Bytes);
    
    /// Deliver a BCCH message received on the BCH (MIB)
    fn write_pdu_bcch_bch(&self, sdu: Bytes);
    
    /// Deliver a BCCH message received on the DL-SCH (SIBs)
    fn write_pdu_bcch_dlsch(&self, sdu: Bytes);
}
