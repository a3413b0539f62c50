//! Protocol Stack Layers Library
//! 
//! This crate implements the UE-side protocol stack layers around the RLC
//! dispatcher: the RLC layer itself and the interfaces it uses to reach PDCP,
//! RRC and the UE service loop.

pub mod rlc;
pub mod pdcp;
pub mod rrc;
pub mod ue;

use async_trait::async_trait;
use thiserror::Error;

/// Common errors for protocol layers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    #[error("Radio bearer id must be in [0:{max}) - {lcid}")]
    InvalidLcid { lcid: u32, max: usize },
    
    #[error("Radio bearer {0} is not configured")]
    BearerNotConfigured(u32),
    
    #[error("Cannot add RLC entity - invalid mode {0}")]
    InvalidMode(u8),
    
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Common trait for all protocol layers
#[async_trait]
pub trait ProtocolLayer: Send + Sync {
    /// Initialize the layer
    async fn initialize(&mut self) -> Result<(), LayerError>;
    
    /// Shutdown the layer
    async fn shutdown(&mut self) -> Result<(), LayerError>;
}
