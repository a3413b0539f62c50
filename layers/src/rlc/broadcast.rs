//! BCCH message queues
//! 
//! System information arrives in MAC callback context and is consumed by the
//! UE service loop. Each broadcast channel gets a small bounded queue; when it
//! is full the oldest message is discarded so MAC never waits.

use bytes::Bytes;
use crossbeam::queue::ArrayQueue;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Default number of messages buffered per broadcast channel
pub const BCCH_QUEUE_CAPACITY: usize = 2;

/// Broadcast channel a system information message arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BcchChannel {
    /// BCCH mapped on BCH (MIB)
    Bch,
    /// BCCH mapped on DL-SCH (SIBs)
    DlSch,
}

impl fmt::Display for BcchChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BcchChannel::Bch => write!(f, "BCCH BCH"),
            BcchChannel::DlSch => write!(f, "BCCH DLSCH"),
        }
    }
}

/// Bounded single-producer/single-consumer queue of BCCH messages
pub struct BroadcastQueue {
    channel: BcchChannel,
    queue: ArrayQueue<Bytes>,
    dropped: AtomicU64,
}

impl BroadcastQueue {
    /// Create a queue holding at most `capacity` messages
    ///
    /// # Panics
    /// Panics if `capacity` is zero
    pub fn new(channel: BcchChannel, capacity: usize) -> Self {
        Self {
            channel,
            queue: ArrayQueue::new(capacity),
            dropped: AtomicU64::new(0),
        }
    }
    
    /// Enqueue a message, evicting the oldest one if the queue is full
    pub fn push(&self, buf: Bytes) {
        if let Some(evicted) = self.queue.force_push(buf) {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            warn!(
                "{} queue full, dropped oldest message ({} bytes, {} dropped so far)",
                self.channel,
                evicted.len(),
                dropped
            );
        }
    }
    
    /// Dequeue the oldest message without blocking
    pub fn pop(&self) -> Option<Bytes> {
        self.queue.pop()
    }
    
    /// Messages currently queued
    pub fn len(&self) -> usize {
        self.queue.len()
    }
    
    /// Whether no message is queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
    
    /// Messages discarded because the queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
    
    /// Channel served by this queue
    pub fn channel(&self) -> BcchChannel {
        self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    
    #[test]
    fn test_fifo_order() {
        let queue = BroadcastQueue::new(BcchChannel::Bch, BCCH_QUEUE_CAPACITY);
        queue.push(Bytes::from_static(b"mib-1"));
        queue.push(Bytes::from_static(b"mib-2"));
        
        assert_eq!(queue.pop().unwrap(), Bytes::from_static(b"mib-1"));
        assert_eq!(queue.pop().unwrap(), Bytes::from_static(b"mib-2"));
        assert!(queue.pop().is_none());
    }
    
    #[test]
    fn test_overflow_drops_oldest() {
        let queue = BroadcastQueue::new(BcchChannel::DlSch, 2);
        queue.push(Bytes::from_static(b"sib1"));
        queue.push(Bytes::from_static(b"sib2"));
        queue.push(Bytes::from_static(b"sib3"));
        
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dropped(), 1);
        assert_eq!(queue.pop().unwrap(), Bytes::from_static(b"sib2"));
        assert_eq!(queue.pop().unwrap(), Bytes::from_static(b"sib3"));
        assert!(queue.is_empty());
    }
    
    #[test]
    fn test_cross_thread_handoff() {
        let queue = Arc::new(BroadcastQueue::new(BcchChannel::Bch, 64));
        
        let producer = {
            let queue = queue.clone();
            thread::spawn(move || {
                for i in 0..32u8 {
                    queue.push(Bytes::from(vec![i]));
                }
            })
        };
        producer.join().unwrap();
        
        let received: Vec<u8> = std::iter::from_fn(|| queue.pop()).map(|b| b[0]).collect();
        assert_eq!(received, (0..32u8).collect::<Vec<_>>());
        assert_eq!(queue.dropped(), 0);
    }
}
