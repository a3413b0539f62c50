//! Unacknowledged Mode (UM) entity
//! 
//! Serves the bi-directional and both uni-directional UM flavours; the
//! flavour only decides which transfer directions are open.

use super::config::{DlUmConfig, RlcConfig, RlcMode, UlUmConfig, UmDirection};
use super::entity::{RlcCommon, RlcContext, SduQueue};
use crate::LayerError;
use bytes::Bytes;
use tracing::{debug, warn};

/// Unacknowledged mode entity
pub struct RlcUm {
    ctx: RlcContext,
    mode: RlcMode,
    direction: UmDirection,
    ul_config: UlUmConfig,
    dl_config: DlUmConfig,
    tx_queue: SduQueue,
    rx_queue: SduQueue,
}

impl RlcUm {
    /// Create a new UM entity for one of the UM modes
    pub fn new(ctx: RlcContext, mode: RlcMode) -> Self {
        let direction = match mode {
            RlcMode::UmUniUl => UmDirection::UplinkOnly,
            RlcMode::UmUniDl => UmDirection::DownlinkOnly,
            _ => UmDirection::Bidirectional,
        };
        
        Self {
            ctx,
            mode,
            direction,
            ul_config: UlUmConfig::default(),
            dl_config: DlUmConfig::default(),
            tx_queue: SduQueue::default(),
            rx_queue: SduQueue::default(),
        }
    }
    
    /// Transfer directions open on this entity
    pub fn direction(&self) -> UmDirection {
        self.direction
    }
    
    /// Active uplink parameters
    pub fn ul_config(&self) -> &UlUmConfig {
        &self.ul_config
    }
    
    /// Active downlink parameters
    pub fn dl_config(&self) -> &DlUmConfig {
        &self.dl_config
    }
}

impl RlcCommon for RlcUm {
    fn mode(&self) -> RlcMode {
        self.mode
    }
    
    fn configure(&mut self, cnfg: &RlcConfig) -> Result<(), LayerError> {
        if self.direction.transmits() {
            cnfg.ul_um.validate()?;
        }
        if self.direction.receives() {
            cnfg.dl_um.validate()?;
        }
        if self.direction.transmits() {
            self.ul_config = cnfg.ul_um;
        }
        if self.direction.receives() {
            self.dl_config = cnfg.dl_um;
        }
        
        debug!(
            "{}: UM configured: direction={:?}, ul_sn={}, dl_sn={}, t_reordering={}ms",
            self.ctx.rb_name(),
            self.direction,
            self.ul_config.sn_field_length,
            self.dl_config.sn_field_length,
            self.dl_config.t_reordering_ms
        );
        Ok(())
    }
    
    fn write_sdu(&mut self, sdu: Bytes) {
        if !self.direction.transmits() {
            warn!("{}: dropping SDU on downlink-only UM bearer", self.ctx.rb_name());
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
        if !self.direction.receives() {
            warn!("{}: dropping PDU on uplink-only UM bearer", self.ctx.rb_name());
            return;
        }
        self.rx_queue.push(Bytes::copy_from_slice(payload));
    }
    
    fn take_sdu(&mut self) -> Option<Bytes> {
        self.rx_queue.pop()
    }
}
