//! The per-port RSTP record (§3 "Port (RSTP)").

use pdu_codec::bpdu::BridgeId;

use crate::ids::PortId;
use crate::rstp::{InfoIs, PortRole, PriorityVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminPointToPoint {
    ForceTrue,
    ForceFalse,
    Auto,
}

#[derive(Debug, Clone)]
pub struct RstpPort {
    pub id: PortId,
    pub ifindex: u32,
    pub priority: u8,
    pub admin_enabled: bool,
    pub port_enabled: bool,
    pub path_cost: u32,
    pub admin_point_to_point: AdminPointToPoint,
    pub oper_point_to_point: bool,
    pub admin_edge: bool,
    pub oper_edge: bool,

    pub designated_priority: PriorityVector,
    pub port_priority: PriorityVector,
    pub info_is: InfoIs,

    pub role: PortRole,
    pub selected_role: PortRole,

    pub learning: bool,
    pub forwarding: bool,

    pub sync: bool,
    pub synced: bool,
    pub agreed: bool,
    pub proposed: bool,
    pub proposing: bool,
    pub reselect: bool,
    pub selected: bool,
    pub disputed: bool,

    pub tc: bool,
    pub tc_while: u32,
    pub edge_delay_while: u32,
    pub fd_while: u32,
    pub rr_while: u32,
    pub rb_while: u32,
    pub mdelay_while: u32,
    pub rcvd_info_while: u32,

    pub hello_time: u32,
    pub forward_delay: u32,
    pub max_age: u32,

    pub send_rstp: bool,
    pub rcvd_bpdu: bool,
    pub rcvd_msg: bool,
    pub rcvd_stp: bool,
    pub rcvd_rstp: bool,
    pub rcvd_tc: bool,
    pub rcvd_tc_ack: bool,
    pub rcvd_tcn: bool,
}

pub const DEFAULT_HELLO_TIME_SECS: u32 = 2;
pub const DEFAULT_FORWARD_DELAY_SECS: u32 = 15;
pub const DEFAULT_MAX_AGE_SECS: u32 = 20;
pub const MIGRATE_TIME_SECS: u32 = 3;

impl RstpPort {
    pub fn new(id: PortId, ifindex: u32, bridge_id: BridgeId) -> Self {
        let port_id = ((0x80u16) << 8) | id.0;
        let vector = PriorityVector {
            root_id: bridge_id,
            root_path_cost: 0,
            designated_bridge_id: bridge_id,
            designated_port_id: port_id,
            receiving_port_id: port_id,
        };
        RstpPort {
            id,
            ifindex,
            priority: 0x80,
            admin_enabled: true,
            port_enabled: false,
            path_cost: 200_000,
            admin_point_to_point: AdminPointToPoint::Auto,
            oper_point_to_point: true,
            admin_edge: false,
            oper_edge: false,
            designated_priority: vector,
            port_priority: vector,
            info_is: InfoIs::Disabled,
            role: PortRole::Disabled,
            selected_role: PortRole::Disabled,
            learning: false,
            forwarding: false,
            sync: true,
            synced: false,
            agreed: false,
            proposed: false,
            proposing: false,
            reselect: true,
            selected: false,
            disputed: false,
            tc: false,
            tc_while: 0,
            edge_delay_while: 0,
            fd_while: 0,
            rr_while: 0,
            rb_while: 0,
            mdelay_while: 0,
            rcvd_info_while: 0,
            hello_time: DEFAULT_HELLO_TIME_SECS,
            forward_delay: DEFAULT_FORWARD_DELAY_SECS,
            max_age: DEFAULT_MAX_AGE_SECS,
            send_rstp: true,
            rcvd_bpdu: false,
            rcvd_msg: false,
            rcvd_stp: false,
            rcvd_rstp: false,
            rcvd_tc: false,
            rcvd_tc_ack: false,
            rcvd_tcn: false,
        }
    }
}
