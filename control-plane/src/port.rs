//! The per-port LACP record (§3 "Port (LACP)"): the shared variables that
//! RX, PTX, Mux, CD, TX, Selection and the Marker Responder all read and
//! some subset of them own the write side of.

use pdu_codec::frame::SystemId;
use pdu_codec::lacp::PortInfo;

use crate::ids::{AggregatorId, PortId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortMode {
    Active,
    Passive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortTimeout {
    Short,
    Long,
}

/// A port's binding to an aggregator, owned by Selection (§4.7) and read by
/// Mux (§4.6) to gate Waiting → Attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selected {
    #[default]
    Unselected,
    Standby,
    Selected,
}

/// The complete LACP per-port record (§3). Created on port BEGIN, torn down
/// on delete after every machine acks Kill.
#[derive(Debug, Clone)]
pub struct LacpPort {
    pub id: PortId,
    pub priority: u16,
    pub key: u16,
    pub admin_mode: PortMode,
    pub admin_enabled: bool,
    pub oper_enabled: bool,
    pub interface: String,
    pub mac: SystemId,
    pub admin_timeout: PortTimeout,

    pub actor_admin: PortInfo,
    pub actor_oper: PortInfo,
    pub partner_admin: PortInfo,
    pub partner_oper: PortInfo,

    pub aggregator: Option<AggregatorId>,
    pub selected: Selected,

    pub port_moved: bool,
    pub ntt: bool,
    pub begin: bool,

    pub current_while: u32,
    pub periodic: u32,
    pub wait_while: u32,
    pub churn_actor: u32,
    pub churn_partner: u32,

    pub illegal_pdu_count: u64,
    pub invalid_transition_count: u64,
    pub churn_count: u64,
    pub marker_response_count: u64,
    pub marker_illegal_count: u64,
}

impl LacpPort {
    pub fn new(id: PortId, priority: u16, key: u16, mode: PortMode, mac: SystemId) -> Self {
        let mut actor_admin = PortInfo {
            system_priority: 0,
            system: mac,
            key,
            port_priority: priority,
            port: id.0,
            state: Default::default(),
        };
        actor_admin.state.set_activity(mode == PortMode::Active);
        actor_admin.state.set_aggregation(true);

        LacpPort {
            id,
            priority,
            key,
            admin_mode: mode,
            admin_enabled: true,
            oper_enabled: false,
            interface: String::new(),
            mac,
            admin_timeout: PortTimeout::Long,
            actor_admin,
            actor_oper: actor_admin,
            partner_admin: PortInfo::default(),
            partner_oper: PortInfo::default(),
            aggregator: None,
            selected: Selected::Unselected,
            port_moved: false,
            ntt: false,
            begin: true,
            current_while: 0,
            periodic: 0,
            wait_while: 0,
            churn_actor: 0,
            churn_partner: 0,
            illegal_pdu_count: 0,
            invalid_transition_count: 0,
            churn_count: 0,
            marker_response_count: 0,
            marker_illegal_count: 0,
        }
    }

    /// §4.4 Initialize entry action: clear selected, clear port_moved, reset
    /// actor_oper from actor_admin.
    pub fn initialize(&mut self) {
        self.selected = Selected::Unselected;
        self.port_moved = false;
        self.actor_oper = self.actor_admin;
    }

    /// A priority vector comparison as used by `update_selected` (§4.4): the
    /// six fields that must stay equal or Selection is invalidated.
    pub fn partner_vector_matches(&self, other: &PortInfo) -> bool {
        let mine = &self.partner_oper;
        mine.system == other.system
            && mine.system_priority == other.system_priority
            && mine.key == other.key
            && mine.port == other.port
            && mine.port_priority == other.port_priority
            && mine.state.aggregation() == other.state.aggregation()
    }
}
