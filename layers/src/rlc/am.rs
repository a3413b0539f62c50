//! Acknowledged Mode (AM) entity
//! 
//! Holds the AM parameters RRC configured for the bearer and transfers whole
//! SDUs in both directions.

use super::config::{DlAmConfig, RlcConfig, RlcMode, UlAmConfig};
use super::entity::{RlcCommon, RlcContext, SduQueue};
use crate::LayerError;
use bytes::Bytes;
use tracing::debug;

/// Acknowledged mode entity
pub struct RlcAm {
    ctx: RlcContext,
    ul_config: UlAmConfig,
    dl_config: DlAmConfig,
    tx_queue: SduQueue,
    rx_queue: SduQueue,
}

impl RlcAm {
    /// Create a new AM entity with default parameters
    pub fn new(ctx: RlcContext) -> Self {
        Self {
            ctx,
            ul_config: UlAmConfig::default(),
            dl_config: DlAmConfig::default(),
            tx_queue: SduQueue::default(),
            rx_queue: SduQueue::default(),
        }
    }
    
    /// Active uplink parameters
    pub fn ul_config(&self) -> &UlAmConfig {
        &self.ul_config
    }
    
    /// Active downlink parameters
    pub fn dl_config(&self) -> &DlAmConfig {
        &self.dl_config
    }
}

impl RlcCommon for RlcAm {
    fn mode(&self) -> RlcMode {
        RlcMode::Am
    }
    
    fn configure(&mut self, cnfg: &RlcConfig) -> Result<(), LayerError> {
        cnfg.ul_am.validate()?;
        self.ul_config = cnfg.ul_am;
        self.dl_config = cnfg.dl_am;
        
        debug!(
            "{}: AM configured: t_poll_retx={}ms, poll_pdu={:?}, poll_byte={:?}kB, max_retx={}, t_reordering={}ms, t_status_prohibit={}ms",
            self.ctx.rb_name(),
            self.ul_config.t_poll_retx_ms,
            self.ul_config.poll_pdu,
            self.ul_config.poll_byte_kb,
            self.ul_config.max_retx_thresh,
            self.dl_config.t_reordering_ms,
            self.dl_config.t_status_prohibit_ms
        );
        Ok(())
    }
    
    fn write_sdu(&mut self, sdu: Bytes) {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rlc::test_util::test_context;
    
    #[test]
    fn test_am_configure() {
        let mut am = RlcAm::new(test_context(3));
        
        let mut cnfg = RlcConfig::default();
        cnfg.ul_am.poll_pdu = Some(16);
        cnfg.dl_am.t_status_prohibit_ms = 10;
        assert!(am.configure(&cnfg).is_ok());
        assert_eq!(am.ul_config().poll_pdu, Some(16));
        assert_eq!(am.dl_config().t_status_prohibit_ms, 10);
    }
    
    #[test]
    fn test_am_rejects_invalid_config() {
        let mut am = RlcAm::new(test_context(3));
        
        let mut cnfg = RlcConfig::default();
        cnfg.ul_am.max_retx_thresh = 0;
        assert!(am.configure(&cnfg).is_err());
        assert_eq!(am.ul_config(), &UlAmConfig::default());
    }
    
    #[test]
    fn test_am_transfer() {
        let mut am = RlcAm::new(test_context(5));
        
        am.write_sdu(Bytes::from_static(&[0xAA; 20]));
        am.write_sdu(Bytes::from_static(&[0xBB; 5]));
        assert_eq!(am.get_buffer_state(), 25);
        
        let mut pdu = [0u8; 20];
        assert_eq!(am.read_pdu(&mut pdu), 20);
        assert_eq!(am.get_buffer_state(), 5);
        
        am.write_pdu(&[1, 2]);
        am.write_pdu(&[3]);
        assert_eq!(am.take_sdu(), Some(Bytes::from_static(&[1, 2])));
        assert_eq!(am.take_sdu(), Some(Bytes::from_static(&[3])));
        assert_eq!(am.take_sdu(), None);
    }
}
