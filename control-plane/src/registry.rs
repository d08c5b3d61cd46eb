//! System-global registry (§3, §5 "Shared resource policy"): a read-mostly
//! index from id to port/aggregator record. Add/remove are serialized
//! through the registry's own lock; iteration snapshots under a read lock.
//! The link between a port and its aggregator is the id, never a pointer
//! (§9 "Cyclic references"), which sidesteps delete-ordering entirely.

use std::collections::HashMap;

use parking_lot::RwLock;
use pdu_codec::bpdu::BridgeId;
use pdu_codec::frame::SystemId;

use crate::aggregator::Aggregator;
use crate::error::RegistryError;
use crate::ids::{AggregatorId, PortId};
use crate::port::LacpPort;
use crate::rstp::port::RstpPort;

#[derive(Debug, Clone, Copy)]
pub struct SystemIdentity {
    pub mac: SystemId,
    pub priority: u16,
    pub enabled: bool,
}

#[derive(Default)]
struct Inner {
    system: Option<SystemIdentity>,
    ports: HashMap<PortId, LacpPort>,
    aggregators: HashMap<AggregatorId, Aggregator>,
    bridge_id: Option<BridgeId>,
    rstp_ports: HashMap<PortId, RstpPort>,
}

/// Owns every port and aggregator for one System. Cheaply cloned as an
/// `Arc` and shared across the per-port actor tasks that read and write
/// through it.
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            inner: RwLock::new(Inner::default()),
        }
    }

    pub fn set_system(&self, identity: SystemIdentity) {
        self.inner.write().system = Some(identity);
    }

    pub fn system(&self) -> Option<SystemIdentity> {
        self.inner.read().system
    }

    pub fn add_aggregator(&self, agg: Aggregator) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();
        if inner.aggregators.contains_key(&agg.id) {
            return Err(RegistryError::DuplicateAggregator(agg.id.0));
        }
        inner.aggregators.insert(agg.id, agg);
        Ok(())
    }

    pub fn remove_aggregator(&self, id: AggregatorId) -> Result<Aggregator, RegistryError> {
        self.inner
            .write()
            .aggregators
            .remove(&id)
            .ok_or(RegistryError::AggregatorNotFound(id.0))
    }

    pub fn add_port(&self, port: LacpPort) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();
        if inner.ports.contains_key(&port.id) {
            return Err(RegistryError::DuplicatePort(port.id.0));
        }
        inner.ports.insert(port.id, port);
        Ok(())
    }

    /// Port delete (§5 "Cancellation and teardown"): detach from any
    /// aggregator first so sibling ports re-run Selection, then drop the
    /// record.
    pub fn remove_port(&self, id: PortId) -> Result<LacpPort, RegistryError> {
        let mut inner = self.inner.write();
        let port = inner.ports.remove(&id).ok_or(RegistryError::PortNotFound(id.0))?;
        if let Some(agg_id) = port.aggregator {
            if let Some(agg) = inner.aggregators.get_mut(&agg_id) {
                agg.detach(id);
            }
        }
        Ok(port)
    }

    pub fn with_port<R>(&self, id: PortId, f: impl FnOnce(&LacpPort) -> R) -> Option<R> {
        self.inner.read().ports.get(&id).map(f)
    }

    pub fn with_port_mut<R>(&self, id: PortId, f: impl FnOnce(&mut LacpPort) -> R) -> Option<R> {
        self.inner.write().ports.get_mut(&id).map(f)
    }

    pub fn with_aggregator<R>(&self, id: AggregatorId, f: impl FnOnce(&Aggregator) -> R) -> Option<R> {
        self.inner.read().aggregators.get(&id).map(f)
    }

    pub fn with_aggregator_mut<R>(
        &self,
        id: AggregatorId,
        f: impl FnOnce(&mut Aggregator) -> R,
    ) -> Option<R> {
        self.inner.write().aggregators.get_mut(&id).map(f)
    }

    /// Candidate aggregators for Selection (§4.7), in ascending id order so
    /// the "lowest numeric id" tie-break is just "first match".
    pub fn aggregators_by_key(&self, key: u16) -> Vec<AggregatorId> {
        let inner = self.inner.read();
        let mut ids: Vec<AggregatorId> = inner
            .aggregators
            .values()
            .filter(|a| a.admin_key == key)
            .map(|a| a.id)
            .collect();
        ids.sort();
        ids
    }

    /// A stable, id-ordered snapshot for management get-bulk reads (§6).
    pub fn port_ids(&self) -> Vec<PortId> {
        let inner = self.inner.read();
        let mut ids: Vec<PortId> = inner.ports.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn aggregator_ids(&self) -> Vec<AggregatorId> {
        let inner = self.inner.read();
        let mut ids: Vec<AggregatorId> = inner.aggregators.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn set_bridge_id(&self, id: BridgeId) {
        self.inner.write().bridge_id = Some(id);
    }

    pub fn bridge_id(&self) -> Option<BridgeId> {
        self.inner.read().bridge_id
    }

    pub fn add_rstp_port(&self, port: RstpPort) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();
        if inner.rstp_ports.contains_key(&port.id) {
            return Err(RegistryError::DuplicatePort(port.id.0));
        }
        inner.rstp_ports.insert(port.id, port);
        Ok(())
    }

    pub fn remove_rstp_port(&self, id: PortId) -> Result<RstpPort, RegistryError> {
        self.inner.write().rstp_ports.remove(&id).ok_or(RegistryError::PortNotFound(id.0))
    }

    pub fn with_rstp_port<R>(&self, id: PortId, f: impl FnOnce(&RstpPort) -> R) -> Option<R> {
        self.inner.read().rstp_ports.get(&id).map(f)
    }

    pub fn with_rstp_port_mut<R>(&self, id: PortId, f: impl FnOnce(&mut RstpPort) -> R) -> Option<R> {
        self.inner.write().rstp_ports.get_mut(&id).map(f)
    }

    pub fn rstp_port_ids(&self) -> Vec<PortId> {
        let inner = self.inner.read();
        let mut ids: Vec<PortId> = inner.rstp_ports.keys().copied().collect();
        ids.sort();
        ids
    }

    /// A snapshot of every RSTP port, id-ordered, for PRS's whole-bridge
    /// role computation (§4.11 PRS runs once per bridge, not per port).
    pub fn rstp_ports_snapshot(&self) -> Vec<RstpPort> {
        let inner = self.inner.read();
        let mut ports: Vec<RstpPort> = inner.rstp_ports.values().cloned().collect();
        ports.sort_by_key(|p| p.id);
        ports
    }
}
