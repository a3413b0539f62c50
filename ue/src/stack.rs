//! UE stack wiring and service loop
//! 
//! Owns the shared buffer pool, the wake-up notifier and the RLC layer, and
//! runs the cooperative loop that drains RLC downlink work whenever a layer
//! signals it.

use anyhow::Context;
use bytes::Bytes;
use common::{hex_preview, rb_id_text, BufferPool, PoolStats};
use layers::pdcp::PdcpRlcInterface;
use layers::rlc::{BcchChannel, Rlc};
use layers::rrc::RrcRlcInterface;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::UeConfig;

/// Fallback period of the service loop when nobody notifies it
pub const SERVICE_TICK: Duration = Duration::from_millis(10);

/// PDCP stand-in logging what RLC delivers
pub struct LoggingPdcp;

impl PdcpRlcInterface for LoggingPdcp {
    fn write_pdu(&self, lcid: u32, sdu: Bytes) {
        info!("PDCP rx {} SDU ({} bytes): {}", rb_id_text(lcid), sdu.len(), hex_preview(&sdu));
    }
    
    fn write_pdu_bcch_bch(&self, sdu: Bytes) {
        info!("PDCP rx BCCH BCH ({} bytes): {}", sdu.len(), hex_preview(&sdu));
    }
    
    fn write_pdu_bcch_dlsch(&self, sdu: Bytes) {
        info!("PDCP rx BCCH DLSCH ({} bytes): {}", sdu.len(), hex_preview(&sdu));
    }
}

/// RRC stand-in logging radio link failure triggers
pub struct LoggingRrc;

impl RrcRlcInterface for LoggingRrc {
    fn max_retx_attempted(&self, lcid: u32) {
        warn!("RRC: max retransmissions reached on {}", rb_id_text(lcid));
    }
}

/// Stack statistics snapshot
#[derive(Debug, Clone, Copy)]
pub struct StackStats {
    pub active_bearers: usize,
    pub bcch_bch_dropped: u64,
    pub bcch_dlsch_dropped: u64,
    pub pool: PoolStats,
}

/// UE protocol stack state
pub struct UeStack {
    rlc: Arc<Rlc>,
    pool: Arc<BufferPool>,
    notify: Arc<Notify>,
    running: Arc<RwLock<bool>>,
}

impl UeStack {
    /// Build the stack with logging PDCP/RRC stand-ins
    pub fn new(config: &UeConfig) -> anyhow::Result<Self> {
        Self::with_upper_layers(config, Arc::new(LoggingPdcp), Arc::new(LoggingRrc))
    }
    
    /// Build the stack on top of the given PDCP and RRC
    pub fn with_upper_layers(
        config: &UeConfig,
        pdcp: Arc<dyn PdcpRlcInterface>,
        rrc: Arc<dyn RrcRlcInterface>,
    ) -> anyhow::Result<Self> {
        let pool = Arc::new(BufferPool::new(config.rlc.buffer_size));
        let notify = Arc::new(Notify::new());
        
        let rlc = Rlc::with_bcch_capacity(
            pdcp,
            rrc,
            notify.clone(),
            pool.clone(),
            config.rlc.bcch_queue_capacity,
        )?;
        
        for bearer in &config.bearers {
            rlc.add_bearer(bearer.lcid, bearer.mode.to_rrc(), bearer.rlc.as_ref())
                .with_context(|| format!("Failed to add bearer {}", rb_id_text(bearer.lcid)))?;
            info!("  {}: {:?}", rb_id_text(bearer.lcid), bearer.mode);
        }
        
        Ok(Self {
            rlc: Arc::new(rlc),
            pool,
            notify,
            running: Arc::new(RwLock::new(true)),
        })
    }
    
    /// RLC layer, for the lower layers to call into
    pub fn rlc(&self) -> Arc<Rlc> {
        self.rlc.clone()
    }
    
    /// Start the service loop in the background
    pub fn spawn_service_loop(&self) -> JoinHandle<()> {
        let rlc = self.rlc.clone();
        let notify = self.notify.clone();
        let running = self.running.clone();
        tokio::spawn(async move {
            run_service_loop(rlc, notify, running).await;
        })
    }
    
    /// Ask the service loop to exit and drop every bearer
    pub async fn shutdown(&self) {
        *self.running.write().await = false;
        self.notify.notify_one();
        self.rlc.stop();
    }
    
    /// Current statistics
    pub fn stats(&self) -> StackStats {
        StackStats {
            active_bearers: self.rlc.active_bearers(),
            bcch_bch_dropped: self.rlc.bcch_queue(BcchChannel::Bch).dropped(),
            bcch_dlsch_dropped: self.rlc.bcch_queue(BcchChannel::DlSch).dropped(),
            pool: self.pool.stats(),
        }
    }
}

/// Wait for a wake-up (or the fallback tick) and drain RLC downlink work
pub async fn run_service_loop(rlc: Arc<Rlc>, notify: Arc<Notify>, running: Arc<RwLock<bool>>) {
    let mut interval = tokio::time::interval(SERVICE_TICK);
    info!("UE service loop started");
    
    while *running.read().await {
        tokio::select! {
            _ = notify.notified() => {}
            _ = interval.tick() => {}
        }
        
        let mut passes = 0u32;
        while rlc.check_dl_buffers() {
            passes += 1;
            tokio::task::yield_now().await;
        }
        if passes > 0 {
            debug!("Service loop handled {} passes of downlink work", passes);
        }
    }
    
    info!("UE service loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BearerConfig;
    use layers::rlc::RlcMode;
    use tokio::sync::mpsc;
    
    struct ChannelPdcp(mpsc::UnboundedSender<(Option<u32>, Bytes)>);
    
    impl PdcpRlcInterface for ChannelPdcp {
        fn write_pdu(&self, lcid: u32, sdu: Bytes) {
            let _ = self.0.send((Some(lcid), sdu));
        }
        
        fn write_pdu_bcch_bch(&self, sdu: Bytes) {
            let _ = self.0.send((None, sdu));
        }
        
        fn write_pdu_bcch_dlsch(&self, sdu: Bytes) {
            let _ = self.0.send((None, sdu));
        }
    }
    
    fn config_with_drb() -> UeConfig {
        let mut config = UeConfig::default();
        config.bearers.push(BearerConfig {
            lcid: 3,
            mode: RlcMode::Am,
            rlc: None,
        });
        config
    }
    
    #[tokio::test]
    async fn test_stack_builds_configured_bearers() {
        let stack = UeStack::new(&config_with_drb()).unwrap();
        assert_eq!(stack.rlc().bearer_mode(3), Some(RlcMode::Am));
        assert_eq!(stack.stats().active_bearers, 2);
    }
    
    #[tokio::test]
    async fn test_stack_rejects_bad_bearer() {
        let mut config = UeConfig::default();
        config.bearers.push(BearerConfig {
            lcid: 99,
            mode: RlcMode::Am,
            rlc: None,
        });
        assert!(UeStack::new(&config).is_err());
    }
    
    #[tokio::test]
    async fn test_service_loop_delivers_downlink() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stack = UeStack::with_upper_layers(
            &config_with_drb(),
            Arc::new(ChannelPdcp(tx)),
            Arc::new(LoggingRrc),
        )
        .unwrap();
        let handle = stack.spawn_service_loop();
        
        let rlc = stack.rlc();
        rlc.write_pdu_bcch_bch(&[0x11; 40]);
        rlc.write_pdu(3, b"drb1");
        
        let first = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        assert_eq!(first, (None, Bytes::from_static(&[0x11; 40])));
        let second = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        assert_eq!(second, (Some(3), Bytes::from_static(b"drb1")));
        
        stack.shutdown().await;
        tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
        assert_eq!(stack.stats().active_bearers, 0);
    }
}
