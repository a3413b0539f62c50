//! Radio Link Control (RLC) Layer Implementation
//! 
//! UE-side RLC dispatcher according to 3GPP TS 36.322. Routes SDUs from PDCP
//! and PDUs from MAC to the entity serving each logical channel, creates
//! entities on RRC request, and buffers BCCH messages until the UE service
//! loop hands them to PDCP.
//!
//! Every call coming from a neighbouring layer is fire-and-forget: an unknown
//! or unconfigured logical channel turns the call into a logged no-op.

pub mod am;
pub mod bearer_table;
pub mod broadcast;
pub mod config;
pub mod entity;
pub mod tm;
pub mod um;

use crate::pdcp::PdcpRlcInterface;
use crate::rrc::RrcRlcInterface;
use crate::ue::UeInterface;
use crate::{LayerError, ProtocolLayer};
use async_trait::async_trait;
use bytes::Bytes;
use common::{hex_preview, rb_id_text, BufferPool, N_RADIO_BEARERS, RB_ID_SRB0};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

pub use bearer_table::BearerTable;
pub use broadcast::{BcchChannel, BroadcastQueue, BCCH_QUEUE_CAPACITY};
pub use config::{DlAmConfig, DlUmConfig, RlcConfig, RlcMode, UlAmConfig, UlUmConfig, UmDirection};
pub use entity::{RlcCommon, RlcContext, RlcEntity};

/// RLC layer: bearer table plus BCCH queues
pub struct Rlc {
    pdcp: Arc<dyn PdcpRlcInterface>,
    rrc: Arc<dyn RrcRlcInterface>,
    ue: Arc<dyn UeInterface>,
    pool: Arc<BufferPool>,
    bearers: BearerTable,
    bcch_bch_queue: BroadcastQueue,
    bcch_dlsch_queue: BroadcastQueue,
}

impl Rlc {
    /// Create the RLC layer with SRB0 already in place
    pub fn new(
        pdcp: Arc<dyn PdcpRlcInterface>,
        rrc: Arc<dyn RrcRlcInterface>,
        ue: Arc<dyn UeInterface>,
        pool: Arc<BufferPool>,
    ) -> Self {
        let rlc = Self {
            pdcp,
            rrc,
            ue,
            pool,
            bearers: BearerTable::new(),
            bcch_bch_queue: BroadcastQueue::new(BcchChannel::Bch, BCCH_QUEUE_CAPACITY),
            bcch_dlsch_queue: BroadcastQueue::new(BcchChannel::DlSch, BCCH_QUEUE_CAPACITY),
        };
        rlc.reset();
        rlc
    }
    
    /// Create the RLC layer with a custom BCCH queue depth
    pub fn with_bcch_capacity(
        pdcp: Arc<dyn PdcpRlcInterface>,
        rrc: Arc<dyn RrcRlcInterface>,
        ue: Arc<dyn UeInterface>,
        pool: Arc<BufferPool>,
        bcch_capacity: usize,
    ) -> Result<Self, LayerError> {
        if bcch_capacity == 0 {
            return Err(LayerError::InvalidConfiguration(
                "BCCH queue capacity must be non-zero".into(),
            ));
        }
        
        let mut rlc = Self::new(pdcp, rrc, ue, pool);
        rlc.bcch_bch_queue = BroadcastQueue::new(BcchChannel::Bch, bcch_capacity);
        rlc.bcch_dlsch_queue = BroadcastQueue::new(BcchChannel::DlSch, bcch_capacity);
        Ok(rlc)
    }
    
    /// Drop every bearer and re-create SRB0 in transparent mode
    pub fn reset(&self) {
        self.bearers.clear();
        let srb0 = RlcEntity::new(RlcMode::Tm, self.context(RB_ID_SRB0));
        if let Err(e) = self.bearers.install(RB_ID_SRB0, srb0) {
            error!("Failed to create SRB0: {}", e);
        }
    }
    
    /// Drop every bearer
    pub fn stop(&self) {
        self.bearers.clear();
    }
    
    fn context(&self, lcid: u32) -> RlcContext {
        RlcContext {
            lcid,
            rrc: self.rrc.clone(),
        }
    }
    
    /// Run `f` on the entity at `lcid`, logging why the call is dropped otherwise
    fn dispatch<R>(&self, lcid: u32, op: &str, f: impl FnOnce(&mut RlcEntity) -> R) -> Option<R> {
        match self.bearers.with_entity(lcid, f) {
            Ok(result) => Some(result),
            Err(e @ LayerError::InvalidLcid { .. }) => {
                warn!("{}: {}", op, e);
                None
            }
            Err(e) => {
                trace!("{}: {}", op, e);
                None
            }
        }
    }
    
    /*************************************************************************
     * PDCP interface
     *************************************************************************/
    
    /// Queue an SDU for transmission on bearer `lcid`
    pub fn write_sdu(&self, lcid: u32, sdu: Bytes) {
        self.dispatch(lcid, "write_sdu", |entity| entity.write_sdu(sdu));
    }
    
    /*************************************************************************
     * MAC interface
     *************************************************************************/
    
    /// Bytes pending on bearer `lcid`, 0 when the bearer does not exist
    pub fn get_buffer_state(&self, lcid: u32) -> u32 {
        self.dispatch(lcid, "get_buffer_state", |entity| entity.get_buffer_state())
            .unwrap_or(0)
    }
    
    /// Fill `payload` with the next PDU of bearer `lcid`, returning its length
    pub fn read_pdu(&self, lcid: u32, payload: &mut [u8]) -> usize {
        self.dispatch(lcid, "read_pdu", |entity| entity.read_pdu(payload))
            .unwrap_or(0)
    }
    
    /// Hand a received PDU to bearer `lcid`
    pub fn write_pdu(&self, lcid: u32, payload: &[u8]) {
        let delivered = self.dispatch(lcid, "write_pdu", |entity| {
            debug!(
                "DL {} PDU ({} bytes): {}",
                rb_id_text(lcid),
                payload.len(),
                hex_preview(payload)
            );
            entity.write_pdu(payload);
        });
        
        if delivered.is_some() {
            self.ue.notify();
        }
    }
    
    /// BCCH message received on the BCH
    pub fn write_pdu_bcch_bch(&self, payload: &[u8]) {
        self.write_pdu_bcch(BcchChannel::Bch, payload);
    }
    
    /// BCCH message received on the DL-SCH
    pub fn write_pdu_bcch_dlsch(&self, payload: &[u8]) {
        self.write_pdu_bcch(BcchChannel::DlSch, payload);
    }
    
    /// Copy a BCCH message into a pool buffer and queue it for the service loop
    pub fn write_pdu_bcch(&self, channel: BcchChannel, payload: &[u8]) {
        info!(
            "{} message received ({} bytes): {}",
            channel,
            payload.len(),
            hex_preview(payload)
        );
        
        let buf = match self.pool.copy_from(payload) {
            Ok(buf) => buf,
            Err(e) => {
                warn!("Dropping {} message: {}", channel, e);
                return;
            }
        };
        
        self.bcch_queue(channel).push(buf);
        self.ue.notify();
    }
    
    /// Queue backing `channel`
    pub fn bcch_queue(&self, channel: BcchChannel) -> &BroadcastQueue {
        match channel {
            BcchChannel::Bch => &self.bcch_bch_queue,
            BcchChannel::DlSch => &self.bcch_dlsch_queue,
        }
    }
    
    /*************************************************************************
     * RRC interface
     *************************************************************************/
    
    /// Create the entity for bearer `lcid`, replacing any existing one.
    ///
    /// `rlc_mode` is the RRC encoding of [`RlcMode`]. The slot is left
    /// untouched when the id, the mode or the configuration is rejected.
    pub fn add_bearer(
        &self,
        lcid: u32,
        rlc_mode: u8,
        cnfg: Option<&RlcConfig>,
    ) -> Result<(), LayerError> {
        if !common::lcid_in_range(lcid) {
            let err = LayerError::InvalidLcid { lcid, max: N_RADIO_BEARERS };
            error!("{}", err);
            return Err(err);
        }
        info!("Adding radio bearer {}", rb_id_text(lcid));
        
        let Some(mode) = RlcMode::from_rrc(rlc_mode) else {
            let err = LayerError::InvalidMode(rlc_mode);
            error!("{}", err);
            return Err(err);
        };
        
        let mut entity = RlcEntity::new(mode, self.context(lcid));
        if let Some(cnfg) = cnfg {
            if let Err(e) = entity.configure(cnfg) {
                error!("Cannot add RLC entity for {} - {}", rb_id_text(lcid), e);
                return Err(e);
            }
        }
        
        if let Some(old) = self.bearers.install(lcid, entity)? {
            info!(
                "Replaced {:?} entity on {}, {} pending bytes discarded",
                old.mode(),
                rb_id_text(lcid),
                old.get_buffer_state()
            );
        }
        Ok(())
    }
    
    /// Mode of the entity serving `lcid`, if any
    pub fn bearer_mode(&self, lcid: u32) -> Option<RlcMode> {
        self.bearers.mode(lcid)
    }
    
    /// Number of configured bearers
    pub fn active_bearers(&self) -> usize {
        self.bearers.active_count()
    }
    
    /// Whether `lcid` is in range and configured
    pub fn valid_lcid(&self, lcid: u32) -> bool {
        self.bearers.is_valid(lcid)
    }
    
    /*************************************************************************
     * UE interface
     *************************************************************************/
    
    /// One pass of downlink work for the UE service loop.
    ///
    /// Hands at most one queued message per BCCH to PDCP, then one received
    /// SDU per bearer in ascending lcid order. Returns `true` if anything was
    /// done. SDUs are delivered after the bearer lock is released, so PDCP may
    /// call back into the RLC from `write_pdu`.
    pub fn check_dl_buffers(&self) -> bool {
        let mut ret = false;
        
        if let Some(buf) = self.bcch_bch_queue.pop() {
            self.pdcp.write_pdu_bcch_bch(buf);
            ret = true;
        }
        if let Some(buf) = self.bcch_dlsch_queue.pop() {
            self.pdcp.write_pdu_bcch_dlsch(buf);
            ret = true;
        }
        
        for lcid in 0..N_RADIO_BEARERS as u32 {
            if let Some(sdu) = self.bearers.take_sdu(lcid) {
                self.pdcp.write_pdu(lcid, sdu);
                ret = true;
            }
        }
        
        ret
    }
}

#[async_trait]
impl ProtocolLayer for Rlc {
    async fn initialize(&mut self) -> Result<(), LayerError> {
        info!("Initializing RLC layer");
        self.reset();
        info!("RLC layer initialized with {} bearer slots", N_RADIO_BEARERS);
        Ok(())
    }
    
    async fn shutdown(&mut self) -> Result<(), LayerError> {
        info!("Shutting down RLC layer");
        self.stop();
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    
    /// PDCP stand-in recording everything RLC delivers
    #[derive(Default)]
    pub struct RecordingPdcp {
        sdus: Mutex<Vec<(u32, Bytes)>>,
        bch: Mutex<Vec<Bytes>>,
        dlsch: Mutex<Vec<Bytes>>,
    }
    
    impl RecordingPdcp {
        pub fn sdus(&self) -> Vec<(u32, Bytes)> {
            self.sdus.lock().clone()
        }
        
        pub fn bch(&self) -> Vec<Bytes> {
            self.bch.lock().clone()
        }
        
        pub fn dlsch(&self) -> Vec<Bytes> {
            self.dlsch.lock().clone()
        }
    }
    
    impl PdcpRlcInterface for RecordingPdcp {
        fn write_pdu(&self, lcid: u32, sdu: Bytes) {
            self.sdus.lock().push((lcid, sdu));
        }
        
        fn write_pdu_bcch_bch(&self, sdu: Bytes) {
            self.bch.lock().push(sdu);
        }
        
        fn write_pdu_bcch_dlsch(&self, sdu: Bytes) {
            self.dlsch.lock().push(sdu);
        }
    }
    
    pub struct NullRrc;
    
    impl RrcRlcInterface for NullRrc {
        fn max_retx_attempted(&self, _lcid: u32) {}
    }
    
    /// Notification sink counting wake-ups
    #[derive(Default)]
    pub struct CountingUe {
        pub notifications: AtomicUsize,
    }
    
    impl CountingUe {
        pub fn count(&self) -> usize {
            self.notifications.load(Ordering::SeqCst)
        }
    }
    
    impl UeInterface for CountingUe {
        fn notify(&self) {
            self.notifications.fetch_add(1, Ordering::SeqCst);
        }
    }
    
    pub fn test_context(lcid: u32) -> RlcContext {
        RlcContext {
            lcid,
            rrc: Arc::new(NullRrc),
        }
    }
    
    pub fn test_rlc() -> (Rlc, Arc<RecordingPdcp>, Arc<CountingUe>) {
        let pdcp = Arc::new(RecordingPdcp::default());
        let ue = Arc::new(CountingUe::default());
        let rlc = Rlc::new(
            pdcp.clone(),
            Arc::new(NullRrc),
            ue.clone(),
            Arc::new(BufferPool::new(64)),
        );
        (rlc, pdcp, ue)
    }
}
