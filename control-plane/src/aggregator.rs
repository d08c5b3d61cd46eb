//! The Aggregator record (§3): a logical bundle of member ports behaving as
//! one L2 port, maintained by the System registry and mutated by Selection.

use pdu_codec::frame::SystemId;

use crate::ids::{AggregatorId, PortId};
use config::HashMode;

/// Cumulative counters surfaced to management reads (§6).
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkStatistics {
    pub lacpdus_rx: u64,
    pub lacpdus_tx: u64,
    pub marker_rx: u64,
    pub illegal_rx: u64,
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    pub id: AggregatorId,
    pub name: String,
    pub admin_key: u16,
    pub oper_key: u16,
    pub partner_system: Option<SystemId>,
    pub partner_key: u16,
    pub mac: SystemId,
    pub min_links: u16,
    pub admin_up: bool,
    pub oper_up: bool,
    pub members: Vec<PortId>,
    pub distributing: Vec<PortId>,
    pub hash_mode: HashMode,
    pub stats: LinkStatistics,
    /// Gates Mux's Waiting → Attached (§4.6, §4.7): true once this
    /// aggregator has no port still converging.
    pub ready: bool,
}

impl Aggregator {
    pub fn new(id: AggregatorId, name: String, key: u16, mac: SystemId, min_links: u16) -> Self {
        Aggregator {
            id,
            name,
            admin_key: key,
            oper_key: key,
            partner_system: None,
            partner_key: 0,
            mac,
            min_links,
            admin_up: true,
            oper_up: false,
            members: Vec::new(),
            distributing: Vec::new(),
            hash_mode: HashMode::default(),
            stats: LinkStatistics::default(),
            ready: false,
        }
    }

    pub fn attach(&mut self, port: PortId) {
        if !self.members.contains(&port) {
            self.members.push(port);
        }
        // Gates Mux's Waiting -> Attached (§4.6): simplified to "has at
        // least one candidate port", rather than the full readyN consensus
        // across every simultaneously-selecting port (§4.7 Ready procedure).
        self.ready = true;
    }

    pub fn detach(&mut self, port: PortId) {
        self.members.retain(|p| *p != port);
        self.distributing.retain(|p| *p != port);
        if self.members.is_empty() {
            self.ready = false;
        }
        self.recompute_oper_up();
    }

    pub fn mark_distributing(&mut self, port: PortId) {
        if self.members.contains(&port) && !self.distributing.contains(&port) {
            self.distributing.push(port);
        }
        self.recompute_oper_up();
    }

    pub fn unmark_distributing(&mut self, port: PortId) {
        self.distributing.retain(|p| *p != port);
        self.recompute_oper_up();
    }

    fn recompute_oper_up(&mut self) {
        self.oper_up = self.admin_up && self.distributing.len() as u16 >= self.min_links.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg() -> Aggregator {
        Aggregator::new(AggregatorId(100), "agg100".into(), 100, SystemId([0; 6]), 1)
    }

    #[test]
    fn attach_marks_ready_and_detach_of_last_member_clears_it() {
        let mut a = agg();
        assert!(!a.ready);
        a.attach(PortId(10));
        assert!(a.ready);
        assert_eq!(a.members, vec![PortId(10)]);

        a.detach(PortId(10));
        assert!(!a.ready);
        assert!(a.members.is_empty());
    }

    #[test]
    fn attach_is_idempotent() {
        let mut a = agg();
        a.attach(PortId(10));
        a.attach(PortId(10));
        assert_eq!(a.members, vec![PortId(10)]);
    }

    #[test]
    fn oper_up_requires_min_links_distributing_members() {
        let mut a = Aggregator::new(AggregatorId(100), "agg".into(), 100, SystemId([0; 6]), 2);
        a.attach(PortId(10));
        a.mark_distributing(PortId(10));
        assert!(!a.oper_up, "one distributing member shouldn't satisfy min_links=2");

        a.attach(PortId(20));
        a.mark_distributing(PortId(20));
        assert!(a.oper_up);

        a.unmark_distributing(PortId(10));
        assert!(!a.oper_up);
    }

    #[test]
    fn detach_with_remaining_members_keeps_ready() {
        let mut a = agg();
        a.attach(PortId(10));
        a.attach(PortId(20));
        a.detach(PortId(10));
        assert!(a.ready);
        assert_eq!(a.members, vec![PortId(20)]);
    }
}
