//! Management reads (§6): get-bulk over ports/aggregators with
//! (marker, count) pagination, returning a snapshot of operational state.

use pdu_codec::frame::SystemId;

use crate::ids::{AggregatorId, PortId};
use crate::port::Selected;
use crate::registry::Registry;
use crate::rstp::PortRole;

#[derive(Debug, Clone)]
pub struct PortSummary {
    pub id: PortId,
    pub selected: Selected,
    pub partner_system: SystemId,
    pub actor_collecting: bool,
    pub actor_distributing: bool,
    pub churn_count: u64,
    pub illegal_pdu_count: u64,
}

#[derive(Debug, Clone)]
pub struct AggregatorSummary {
    pub id: AggregatorId,
    pub name: String,
    pub oper_up: bool,
    pub members: Vec<PortId>,
    pub distributing: Vec<PortId>,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The id to pass as `marker` on the next call. `None` whenever this
    /// page came back short of `count` -- a partial page means there is
    /// nothing left to return, so callers never need a trailing empty call.
    pub next_marker: Option<u16>,
}

/// Get-bulk over ports, ids in ascending order starting strictly after
/// `marker` (`None` starts from the beginning).
pub fn get_bulk_ports(registry: &Registry, marker: Option<u16>, count: usize) -> Page<PortSummary> {
    let ids: Vec<PortId> = registry
        .port_ids()
        .into_iter()
        .filter(|id| marker.map_or(true, |m| id.0 > m))
        .take(count)
        .collect();

    let next_marker = if ids.len() == count { ids.last().map(|id| id.0) } else { None };
    let items = ids
        .into_iter()
        .filter_map(|id| {
            registry.with_port(id, |p| PortSummary {
                id: p.id,
                selected: p.selected,
                partner_system: p.partner_oper.system,
                actor_collecting: p.actor_oper.state.collecting(),
                actor_distributing: p.actor_oper.state.distributing(),
                churn_count: p.churn_count,
                illegal_pdu_count: p.illegal_pdu_count,
            })
        })
        .collect();

    Page { items, next_marker }
}

pub fn get_bulk_aggregators(registry: &Registry, marker: Option<u16>, count: usize) -> Page<AggregatorSummary> {
    let ids: Vec<AggregatorId> = registry
        .aggregator_ids()
        .into_iter()
        .filter(|id| marker.map_or(true, |m| id.0 > m))
        .take(count)
        .collect();

    let next_marker = if ids.len() == count { ids.last().map(|id| id.0) } else { None };
    let items = ids
        .into_iter()
        .filter_map(|id| {
            registry.with_aggregator(id, |a| AggregatorSummary {
                id: a.id,
                name: a.name.clone(),
                oper_up: a.oper_up,
                members: a.members.clone(),
                distributing: a.distributing.clone(),
            })
        })
        .collect();

    Page { items, next_marker }
}

#[derive(Debug, Clone)]
pub struct RstpPortSummary {
    pub id: PortId,
    pub role: PortRole,
    pub learning: bool,
    pub forwarding: bool,
    pub oper_edge: bool,
}

/// Get-bulk over RSTP ports, same pagination contract as [`get_bulk_ports`].
pub fn get_bulk_rstp_ports(registry: &Registry, marker: Option<u16>, count: usize) -> Page<RstpPortSummary> {
    let ids: Vec<PortId> = registry
        .rstp_port_ids()
        .into_iter()
        .filter(|id| marker.map_or(true, |m| id.0 > m))
        .take(count)
        .collect();

    let next_marker = if ids.len() == count { ids.last().map(|id| id.0) } else { None };
    let items = ids
        .into_iter()
        .filter_map(|id| {
            registry.with_rstp_port(id, |p| RstpPortSummary {
                id: p.id,
                role: p.role,
                learning: p.learning,
                forwarding: p.forwarding,
                oper_edge: p.oper_edge,
            })
        })
        .collect();

    Page { items, next_marker }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Aggregator;
    use crate::port::{LacpPort, PortMode};

    #[test]
    fn pagination_advances_the_marker() {
        let registry = Registry::new();
        for id in [10u16, 20, 30] {
            registry
                .add_port(LacpPort::new(PortId(id), 0x8000, 100, PortMode::Active, SystemId([0, 0, 0, 0, 0, id as u8])))
                .unwrap();
        }
        let page = get_bulk_ports(&registry, None, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_marker, Some(20));

        let page2 = get_bulk_ports(&registry, page.next_marker, 2);
        assert_eq!(page2.items.len(), 1);
        assert_eq!(page2.next_marker, None, "a partial page means pagination is exhausted");
    }

    #[test]
    fn rstp_page_reflects_role() {
        use crate::rstp::port::RstpPort;
        use pdu_codec::bpdu::BridgeId;

        let registry = Registry::new();
        let bridge = BridgeId { priority: 0x8000, address: SystemId([0, 0, 0, 0, 0, 1]) };
        let mut port = RstpPort::new(PortId(10), 1, bridge);
        port.role = PortRole::Designated;
        registry.add_rstp_port(port).unwrap();

        let page = get_bulk_rstp_ports(&registry, None, 10);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].role, PortRole::Designated);
    }

    #[test]
    fn aggregator_summary_reflects_membership() {
        let registry = Registry::new();
        registry
            .add_aggregator(Aggregator::new(AggregatorId(100), "agg".into(), 100, SystemId([0; 6]), 1))
            .unwrap();
        registry.with_aggregator_mut(AggregatorId(100), |a| a.attach(PortId(10)));
        let page = get_bulk_aggregators(&registry, None, 10);
        assert_eq!(page.items[0].members, vec![PortId(10)]);
    }
}
