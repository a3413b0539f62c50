//! RLC entity contract
//! 
//! Every logical channel is served by one entity. The set of entity kinds is
//! closed, so [`RlcEntity`] is an enum dispatching the shared [`RlcCommon`]
//! operations to the mode-specific implementation.

use super::am::RlcAm;
use super::config::{RlcConfig, RlcMode};
use super::tm::RlcTm;
use super::um::RlcUm;
use crate::rrc::RrcRlcInterface;
use crate::LayerError;
use bytes::Bytes;
use common::rb_id_text;
use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Collaborators handed to an entity when it is created.
///
/// Received SDUs are not pushed to PDCP by the entity: [`RlcCommon::take_sdu`]
/// hands them back and the dispatcher delivers them once the bearer lock is
/// released, so PDCP and RRC may call straight back into the RLC.
#[derive(Clone)]
pub struct RlcContext {
    /// Logical channel served by the entity
    pub lcid: u32,
    /// Control plane, reserved for the AM radio link failure trigger
    /// ([`RrcRlcInterface::max_retx_attempted`])
    pub rrc: Arc<dyn RrcRlcInterface>,
}

impl RlcContext {
    /// Bearer name used in log lines
    pub fn rb_name(&self) -> Cow<'static, str> {
        rb_id_text(self.lcid)
    }
}

/// Operations shared by all RLC entities
pub trait RlcCommon: Send {
    /// Mode the entity was created for
    fn mode(&self) -> RlcMode;
    
    /// Apply RRC provided parameters
    fn configure(&mut self, cnfg: &RlcConfig) -> Result<(), LayerError>;
    
    /// Accept an SDU from PDCP for transmission
    fn write_sdu(&mut self, sdu: Bytes);
    
    /// Bytes waiting for transmission
    fn get_buffer_state(&self) -> u32;
    
    /// Build the next PDU into `payload`, returning the number of bytes written
    fn read_pdu(&mut self, payload: &mut [u8]) -> usize;
    
    /// Accept a PDU received from MAC
    fn write_pdu(&mut self, payload: &[u8]);
    
    /// Next received SDU ready for PDCP, if any
    fn take_sdu(&mut self) -> Option<Bytes>;
}

/// RLC entity serving one logical channel
pub enum RlcEntity {
    Tm(RlcTm),
    Um(RlcUm),
    Am(RlcAm),
}

impl RlcEntity {
    /// Create the entity kind serving `mode`
    pub fn new(mode: RlcMode, ctx: RlcContext) -> Self {
        match mode {
            RlcMode::Tm => RlcEntity::Tm(RlcTm::new(ctx)),
            RlcMode::UmBi | RlcMode::UmUniUl | RlcMode::UmUniDl => RlcEntity::Um(RlcUm::new(ctx, mode)),
            RlcMode::Am => RlcEntity::Am(RlcAm::new(ctx)),
        }
    }
    
    fn inner(&self) -> &dyn RlcCommon {
        match self {
            RlcEntity::Tm(tm) => tm as &dyn RlcCommon,
            RlcEntity::Um(um) => um,
            RlcEntity::Am(am) => am,
        }
    }
    
    fn inner_mut(&mut self) -> &mut dyn RlcCommon {
        match self {
            RlcEntity::Tm(tm) => tm as &mut dyn RlcCommon,
            RlcEntity::Um(um) => um,
            RlcEntity::Am(am) => am,
        }
    }
}

impl fmt::Debug for RlcEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RlcEntity")
            .field("mode", &self.mode())
            .field("buffer_state", &self.get_buffer_state())
            .finish()
    }
}

impl RlcCommon for RlcEntity {
    fn mode(&self) -> RlcMode {
        self.inner().mode()
    }
    
    fn configure(&mut self, cnfg: &RlcConfig) -> Result<(), LayerError> {
        self.inner_mut().configure(cnfg)
    }
    
    fn write_sdu(&mut self, sdu: Bytes) {
        self.inner_mut().write_sdu(sdu)
    }
    
    fn get_buffer_state(&self) -> u32 {
        self.inner().get_buffer_state()
    }
    
    fn read_pdu(&mut self, payload: &mut [u8]) -> usize {
        self.inner_mut().read_pdu(payload)
    }
    
    fn write_pdu(&mut self, payload: &[u8]) {
        self.inner_mut().write_pdu(payload)
    }
    
    fn take_sdu(&mut self) -> Option<Bytes> {
        self.inner_mut().take_sdu()
    }
}

/// FIFO of whole SDUs with a running byte count
#[derive(Debug, Default)]
pub(crate) struct SduQueue {
    sdus: VecDeque<Bytes>,
    n_bytes: usize,
}

impl SduQueue {
    pub(crate) fn push(&mut self, sdu: Bytes) {
        self.n_bytes += sdu.len();
        self.sdus.push_back(sdu);
    }
    
    pub(crate) fn pop(&mut self) -> Option<Bytes> {
        let sdu = self.sdus.pop_front()?;
        self.n_bytes -= sdu.len();
        Some(sdu)
    }
    
    /// Queued bytes, saturated to what MAC can be told
    pub(crate) fn buffer_state(&self) -> u32 {
        u32::try_from(self.n_bytes).unwrap_or(u32::MAX)
    }
    
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.sdus.len()
    }
    
    /// Copy the head SDU into `payload` if it fits whole.
    ///
    /// An SDU larger than the grant stays queued and nothing is written.
    pub(crate) fn pop_into(&mut self, payload: &mut [u8], lcid: u32) -> usize {
        let Some(head_len) = self.sdus.front().map(Bytes::len) else {
            return 0;
        };
        if head_len > payload.len() {
            warn!(
                "{}: SDU of {} bytes does not fit grant of {} bytes",
                rb_id_text(lcid),
                head_len,
                payload.len()
            );
            return 0;
        }
        match self.pop() {
            Some(sdu) => {
                payload[..head_len].copy_from_slice(&sdu);
                head_len
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_sdu_queue_accounting() {
        let mut queue = SduQueue::default();
        queue.push(Bytes::from_static(&[1, 2, 3]));
        queue.push(Bytes::from_static(&[4, 5]));
        assert_eq!(queue.buffer_state(), 5);
        assert_eq!(queue.len(), 2);
        
        assert_eq!(queue.pop().unwrap(), Bytes::from_static(&[1, 2, 3]));
        assert_eq!(queue.buffer_state(), 2);
    }
    
    #[test]
    fn test_pop_into_respects_grant() {
        let mut queue = SduQueue::default();
        queue.push(Bytes::from_static(&[9; 10]));
        
        let mut small = [0u8; 4];
        assert_eq!(queue.pop_into(&mut small, 3), 0);
        assert_eq!(queue.buffer_state(), 10);
        
        let mut big = [0u8; 16];
        assert_eq!(queue.pop_into(&mut big, 3), 10);
        assert_eq!(&big[..10], &[9; 10]);
        assert_eq!(queue.buffer_state(), 0);
        assert_eq!(queue.pop_into(&mut big, 3), 0);
    }
}
