//! UE service loop interface
//! 
//! Layers call [`UeInterface::notify`] whenever they queued work for the
//! polled service loop. The call never blocks and repeated notifications
//! before the loop wakes up coalesce into a single wake-up.

use tokio::sync::Notify;

/// Wake-up sink for the UE service loop
pub trait UeInterface: Send + Sync {
    /// Signal that new downlink work may be ready
    fn notify(&self);
}

impl UeInterface for Notify {
    fn notify(&self) {
        // notify_one stores at most one permit when nobody is waiting
        self.notify_one();
    }
}
