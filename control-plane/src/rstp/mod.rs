//! The eight coupled RSTP per-port machines (§4.11, 802.1D-2004 §17).
//! Each is a pure `(state, event, snapshot) -> (state, side_effects)`
//! function, same discipline as the LACP machines in `crate::lacp`.

pub mod pim;
pub mod ppm;
pub mod port;
pub mod prs;
pub mod prt;
pub mod prx;
pub mod pst;
pub mod tcm;
pub mod tx;

use pdu_codec::bpdu::BridgeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRole {
    Root,
    Designated,
    Alternate,
    Backup,
    Disabled,
}

/// IEEE 802.1D-2004 §17.6: the five-tuple compared to decide superiority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PriorityVector {
    pub root_id: BridgeId,
    pub root_path_cost: u32,
    pub designated_bridge_id: BridgeId,
    pub designated_port_id: u16,
    pub receiving_port_id: u16,
}

impl PriorityVector {
    /// Lower is better, per the tie-break chain in §4.11 PRS: lowest root
    /// id, then lowest root path cost, then lowest designated bridge id,
    /// then lowest designated port id, then lowest receiving port id --
    /// exactly the derived `Ord` field order above.
    pub fn is_superior_to(&self, other: &PriorityVector) -> bool {
        self < other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoIs {
    Disabled,
    Aged,
    Mine,
    Received,
}
