//! Radio Resource Control (RRC) interface
//! 
//! RRC configures RLC bearers and is told by acknowledged-mode entities when a
//! bearer has exhausted its retransmissions.

/// RRC-RLC interface, called by RLC entities
pub trait RrcRlcInterface: Send + Sync {
    /// Radio link failure trigger: maxRetxThreshold reached on bearer `lcid`
    fn max_retx_attempted(&self, lcid: u32);
}
