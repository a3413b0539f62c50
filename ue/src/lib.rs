//! Albor Space UE protocol stack
//! 
//! Wires the RLC dispatcher to its neighbouring layers and drives the polled
//! UE service loop.

pub mod config;
pub mod stack;

pub use config::UeConfig;
pub use stack::UeStack;
