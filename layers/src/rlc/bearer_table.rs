//! Bearer table
//! 
//! Fixed-size table of RLC entities indexed by logical channel id. Each slot
//! has its own lock, so MAC callbacks on one bearer never wait for traffic on
//! another. Entities are built completely before being swapped into a slot.

use super::config::RlcMode;
use super::entity::{RlcCommon, RlcEntity};
use crate::LayerError;
use bytes::Bytes;
use common::{lcid_in_range, N_RADIO_BEARERS};
use parking_lot::Mutex;

/// Lcid-indexed table owning at most one entity per slot
pub struct BearerTable {
    slots: Box<[Mutex<Option<RlcEntity>>]>,
}

impl BearerTable {
    /// Create a table with every slot empty
    pub fn new() -> Self {
        Self {
            slots: (0..N_RADIO_BEARERS).map(|_| Mutex::new(None)).collect(),
        }
    }
    
    fn slot(&self, lcid: u32) -> Result<&Mutex<Option<RlcEntity>>, LayerError> {
        if !lcid_in_range(lcid) {
            return Err(LayerError::InvalidLcid { lcid, max: N_RADIO_BEARERS });
        }
        Ok(&self.slots[lcid as usize])
    }
    
    /// Put `entity` into slot `lcid`, returning whatever occupied it before
    pub fn install(&self, lcid: u32, entity: RlcEntity) -> Result<Option<RlcEntity>, LayerError> {
        let slot = self.slot(lcid)?;
        Ok(slot.lock().replace(entity))
    }
    
    /// Run `f` on the entity at `lcid`
    pub fn with_entity<R>(
        &self,
        lcid: u32,
        f: impl FnOnce(&mut RlcEntity) -> R,
    ) -> Result<R, LayerError> {
        let mut guard = self.slot(lcid)?.lock();
        match guard.as_mut() {
            Some(entity) => Ok(f(entity)),
            None => Err(LayerError::BearerNotConfigured(lcid)),
        }
    }
    
    /// Whether `lcid` is in range and has an entity
    pub fn is_valid(&self, lcid: u32) -> bool {
        self.slot(lcid).map(|slot| slot.lock().is_some()).unwrap_or(false)
    }
    
    /// Mode of the entity at `lcid`, if any
    pub fn mode(&self, lcid: u32) -> Option<RlcMode> {
        self.with_entity(lcid, |entity| entity.mode()).ok()
    }
    
    /// Take the next received SDU of the entity at `lcid`.
    ///
    /// The slot lock is released before returning, so the caller can hand the
    /// SDU to a layer that calls back into this table.
    pub fn take_sdu(&self, lcid: u32) -> Option<Bytes> {
        self.with_entity(lcid, |entity| entity.take_sdu()).ok().flatten()
    }
    
    /// Drop every entity
    pub fn clear(&self) {
        for slot in self.slots.iter() {
            // Drop outside the lock
            let old = slot.lock().take();
            drop(old);
        }
    }
    
    /// Number of occupied slots
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.lock().is_some()).count()
    }
}

impl Default for BearerTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rlc::test_util::test_context;
    
    #[test]
    fn test_empty_table() {
        let table = BearerTable::new();
        assert_eq!(table.active_count(), 0);
        assert!(!table.is_valid(0));
        assert_eq!(
            table.with_entity(0, |_| ()).unwrap_err(),
            LayerError::BearerNotConfigured(0)
        );
    }
    
    #[test]
    fn test_out_of_range() {
        let table = BearerTable::new();
        let ctx = test_context(N_RADIO_BEARERS as u32);
        let err = table
            .install(N_RADIO_BEARERS as u32, RlcEntity::new(RlcMode::Tm, ctx))
            .unwrap_err();
        assert_eq!(err, LayerError::InvalidLcid { lcid: N_RADIO_BEARERS as u32, max: N_RADIO_BEARERS });
        assert!(!table.is_valid(u32::MAX));
    }
    
    #[test]
    fn test_install_replaces() {
        let table = BearerTable::new();
        let ctx = test_context(3);
        
        assert!(table.install(3, RlcEntity::new(RlcMode::UmBi, ctx.clone())).unwrap().is_none());
        let old = table.install(3, RlcEntity::new(RlcMode::Am, ctx)).unwrap();
        assert_eq!(old.map(|e| e.mode()), Some(RlcMode::UmBi));
        assert_eq!(table.mode(3), Some(RlcMode::Am));
        assert_eq!(table.active_count(), 1);
    }
    
    #[test]
    fn test_take_sdu_releases_slot() {
        let table = BearerTable::new();
        table.install(2, RlcEntity::new(RlcMode::Tm, test_context(2))).unwrap();
        table.with_entity(2, |e| e.write_pdu(b"paging")).unwrap();
        
        let sdu = table.take_sdu(2);
        assert_eq!(sdu, Some(Bytes::from_static(b"paging")));
        // Slot is free again while the SDU is still held
        assert!(table.install(2, RlcEntity::new(RlcMode::Am, test_context(2))).unwrap().is_some());
        assert_eq!(table.take_sdu(2), None);
        assert_eq!(table.take_sdu(9), None);
        assert_eq!(table.take_sdu(u32::MAX), None);
        
        table.clear();
        assert_eq!(table.active_count(), 0);
    }
}
