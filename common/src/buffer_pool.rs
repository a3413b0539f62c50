//! Shared byte-buffer pool
//! 
//! Hands out fixed-capacity buffers to the layers. The pool is created once by
//! the stack and shared by reference (`Arc<BufferPool>`) with every layer that
//! needs to take a copy of a lower-layer owned payload.

use bytes::{BufMut, Bytes, BytesMut};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::trace;

/// Default buffer size in bytes, large enough for the biggest transport block
pub const DEFAULT_BUFFER_SIZE: usize = 12756;

/// Buffer pool errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Payload of {len} bytes exceeds buffer size of {capacity} bytes")]
    PayloadTooLarge { len: usize, capacity: usize },
}

/// Buffer pool statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Buffers handed out
    pub allocated: u64,
    /// Copy requests refused because the payload did not fit
    pub rejected: u64,
}

/// Thread-safe allocator of fixed-capacity byte buffers
#[derive(Debug)]
pub struct BufferPool {
    buffer_size: usize,
    allocated: AtomicU64,
    rejected: AtomicU64,
}

impl BufferPool {
    /// Create a new pool handing out buffers of `buffer_size` bytes
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size,
            allocated: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }
    
    /// Capacity of every buffer handed out by this pool
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }
    
    /// Allocate an empty buffer with the pool's fixed capacity
    pub fn allocate(&self) -> BytesMut {
        self.allocated.fetch_add(1, Ordering::Relaxed);
        BytesMut::with_capacity(self.buffer_size)
    }
    
    /// Copy `payload` into a freshly allocated pool buffer
    pub fn copy_from(&self, payload: &[u8]) -> Result<Bytes, PoolError> {
        if payload.len() > self.buffer_size {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            return Err(PoolError::PayloadTooLarge {
                len: payload.len(),
                capacity: self.buffer_size,
            });
        }
        
        let mut buf = self.allocate();
        buf.put_slice(payload);
        trace!("Pool buffer filled with {} bytes", payload.len());
        Ok(buf.freeze())
    }
    
    /// Snapshot of the pool counters
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            allocated: self.allocated.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}
