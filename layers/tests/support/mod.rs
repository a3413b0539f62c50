use bytes::Bytes;
use common::BufferPool;
use layers::pdcp::PdcpRlcInterface;
use layers::rlc::Rlc;
use layers::rrc::RrcRlcInterface;
use layers::ue::UeInterface;
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::Mutex;
use std::sync::Arc;

/// What PDCP received from RLC, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdcpEvent {
    Sdu(u32, Bytes),
    BcchBch(Bytes),
    BcchDlsch(Bytes),
}

/// A PDCP sink for testing purposes
/// Collects everything RLC delivers upwards for later inspection
#[derive(Default)]
pub struct PdcpSink {
    events: Mutex<Vec<PdcpEvent>>,
}

impl PdcpSink {
    pub fn take_events(&self) -> Vec<PdcpEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl PdcpRlcInterface for PdcpSink {
    fn write_pdu(&self, lcid: u32, sdu: Bytes) {
        tracing::debug!("write_pdu lcid={} len={}", lcid, sdu.len());
        self.events.lock().push(PdcpEvent::Sdu(lcid, sdu));
    }
    
    fn write_pdu_bcch_bch(&self, sdu: Bytes) {
        self.events.lock().push(PdcpEvent::BcchBch(sdu));
    }
    
    fn write_pdu_bcch_dlsch(&self, sdu: Bytes) {
        self.events.lock().push(PdcpEvent::BcchDlsch(sdu));
    }
}

/// RRC stand-in, the entities never reach the retransmission limit
pub struct RrcSink;

impl RrcRlcInterface for RrcSink {
    fn max_retx_attempted(&self, lcid: u32) {
        tracing::debug!("max_retx_attempted lcid={}", lcid);
    }
}

/// Notification sink counting wake-ups
#[derive(Default)]
pub struct WakeCounter {
    count: AtomicUsize,
}

impl WakeCounter {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl UeInterface for WakeCounter {
    fn notify(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Harness {
    pub rlc: Rlc,
    pub pdcp: Arc<PdcpSink>,
    pub ue: Arc<WakeCounter>,
}

pub fn harness() -> Harness {
    let pdcp = Arc::new(PdcpSink::default());
    let ue = Arc::new(WakeCounter::default());
    let rlc = Rlc::new(
        pdcp.clone(),
        Arc::new(RrcSink),
        ue.clone(),
        Arc::new(BufferPool::default()),
    );
    Harness { rlc, pdcp, ue }
}
