//! Transparent Mode (TM) entity
//! 
//! SDUs pass through unmodified: no header, no segmentation. Used for SRB0
//! and the common control channels.

use super::config::{RlcConfig, RlcMode};
use super::entity::{RlcCommon, RlcContext, SduQueue};
use crate::LayerError;
use bytes::Bytes;
use tracing::{debug, warn};

/// Transparent mode entity
pub struct RlcTm {
    ctx: RlcContext,
    tx_queue: SduQueue,
    rx_queue: SduQueue,
}

impl RlcTm {
    /// Create a new TM entity
    pub fn new(ctx: RlcContext) -> Self {
        Self {
            ctx,
            tx_queue: SduQueue::default(),
            rx_queue: SduQueue::default(),
        }
    }
}

impl RlcCommon for RlcTm {
    fn mode(&self) -> RlcMode {
        RlcMode::Tm
    }
    
    fn configure(&mut self, _cnfg: &RlcConfig) -> Result<(), LayerError> {
        // TM has no parameters
        debug!("{}: TM entity ignores RLC configuration", self.ctx.rb_name());
        Ok(())
    }
    
    fn write_sdu(&mut self, sdu: Bytes) {
        if sdu.is_empty() {
            warn!("{}: dropping empty SDU", self.ctx.rb_name());
            return;
        }
        self.tx_queue.push(sdu);
    }
    
    fn get_buffer_state(&self) -> u32 {
        self.tx_queue.buffer_state()
    }
    
    fn read_pdu(&mut self, payload: &mut [u8]) -> usize {
        self.tx_queue.pop_into(payload, self.ctx.lcid)
    }
    
    fn write_pdu(&mut self, payload: &[u8]) {
        self.rx_queue.push(Bytes::copy_from_slice(payload));
    }
    
    fn take_sdu(&mut self) -> Option<Bytes> {
        self.rx_queue.pop()
    }
}
