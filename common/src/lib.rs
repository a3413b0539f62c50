//! Common Utilities and Types Library
//! 
//! This crate provides shared types and utilities used across the UE protocol stack.

pub mod buffer_pool;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use buffer_pool::*;
pub use types::*;
pub use utils::*;
