//! Port Role Selection (§4.11 PRS, 802.1D-2004 §17.19): runs once per
//! bridge whenever any port sets `reselect`, assigning every port a role.

use crate::ids::PortId;
use crate::rstp::{PortRole, PriorityVector};

#[derive(Debug, Clone)]
pub struct PortCandidate {
    pub id: PortId,
    pub enabled: bool,
    pub vector: PriorityVector,
}

#[derive(Debug, Clone, Copy)]
pub struct RoleAssignment {
    pub id: PortId,
    pub role: PortRole,
}

/// `bridge_vector` is this bridge's own priority vector (root id = its own
/// bridge id, cost 0) used when no port has heard anything better.
pub fn select_roles(ports: &[PortCandidate], bridge_vector: &PriorityVector) -> Vec<RoleAssignment> {
    let mut assignments = Vec::with_capacity(ports.len());

    let root = ports
        .iter()
        .filter(|p| p.enabled)
        .map(|p| &p.vector)
        .fold(bridge_vector, |best, v| if v.is_superior_to(best) { v } else { best });

    let is_root_bridge = root == bridge_vector;

    for port in ports {
        let role = if !port.enabled {
            PortRole::Disabled
        } else if is_root_bridge {
            PortRole::Designated
        } else if &port.vector == root {
            PortRole::Root
        } else if port.vector.designated_bridge_id == bridge_vector.designated_bridge_id {
            // A vector learned from this same bridge on another port: the
            // peer already designates, so this port backs it up.
            PortRole::Backup
        } else if port.vector.is_superior_to(bridge_vector) {
            PortRole::Designated
        } else {
            PortRole::Alternate
        };
        assignments.push(RoleAssignment { id: port.id, role });
    }

    assignments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdu_codec::bpdu::BridgeId;
    use pdu_codec::frame::SystemId;

    fn bridge_id(last: u8) -> BridgeId {
        BridgeId { priority: 0x8000, address: SystemId([0, 0, 0, 0, 0, last]) }
    }

    fn own_vector(bridge: BridgeId, port_id: u16) -> PriorityVector {
        PriorityVector {
            root_id: bridge,
            root_path_cost: 0,
            designated_bridge_id: bridge,
            designated_port_id: port_id,
            receiving_port_id: port_id,
        }
    }

    #[test]
    fn root_bridge_designates_every_enabled_port() {
        let own = bridge_id(1);
        let bridge_vector = own_vector(own, 0x8001);
        let ports = vec![
            PortCandidate { id: PortId(10), enabled: true, vector: bridge_vector },
            PortCandidate { id: PortId(20), enabled: true, vector: bridge_vector },
        ];
        let roles = select_roles(&ports, &bridge_vector);
        assert!(roles.iter().all(|r| r.role == PortRole::Designated));
    }

    #[test]
    fn best_heard_vector_wins_root_role() {
        let own = bridge_id(2);
        let bridge_vector = own_vector(own, 0x8001);
        let better_root = bridge_id(1);
        let heard = PriorityVector {
            root_id: better_root,
            root_path_cost: 4,
            designated_bridge_id: better_root,
            designated_port_id: 0x8001,
            receiving_port_id: 0x8001,
        };
        let ports = vec![PortCandidate { id: PortId(10), enabled: true, vector: heard }];
        let roles = select_roles(&ports, &bridge_vector);
        assert_eq!(roles[0].role, PortRole::Root);
    }

    #[test]
    fn disabled_port_is_disabled_role() {
        let own = bridge_id(1);
        let bridge_vector = own_vector(own, 0x8001);
        let ports = vec![PortCandidate { id: PortId(10), enabled: false, vector: bridge_vector }];
        let roles = select_roles(&ports, &bridge_vector);
        assert_eq!(roles[0].role, PortRole::Disabled);
    }
}
