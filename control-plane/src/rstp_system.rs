//! The RSTP bridge actor (§4.11): drives PRX, PPM, PIM, PRS, PRT, PST, TCM
//! and TX for every port of one bridge from a single task. Unlike the LACP
//! machines in `system.rs`, which are independent per port, Port Role
//! Selection runs once per bridge over every port's priority vector, so one
//! task owns the whole bridge rather than one task per port.
//!
//! Simplifications versus the full standard, carried over from the same
//! judgment calls made for LACP's Mux/Ready handling: `selected` is set
//! unconditionally by role assignment rather than gated by a bridge-wide
//! sync handshake, and the proposal/agreement fast-forwarding handshake is
//! not modeled on the wire -- ports always take the legacy two-step
//! forward-delay path to Forwarding.

use std::collections::HashMap;
use std::sync::Arc;

use pdu_codec::bpdu::{Bpdu, BpduFlags, BridgeId, ConfigBody, WireRole, WireTime};
use tokio::sync::mpsc;

use crate::asic::AsicAdapter;
use crate::ids::PortId;
use crate::registry::Registry;
use crate::rstp::pim::{self, PimEffect, PimEvent, PimState};
use crate::rstp::port::DEFAULT_HELLO_TIME_SECS;
use crate::rstp::ppm::{self, PpmEffect, PpmEvent, PpmState};
use crate::rstp::prs::{self, PortCandidate};
use crate::rstp::prt::{self, DesignatedPortState, RoleTransitionGuards, RootPortState};
use crate::rstp::prx::{self, PrxEffect, PrxEvent, PrxState};
use crate::rstp::pst::{self, PortState, PstEffect};
use crate::rstp::tcm::{self, TcmEffect, TcmEvent, TcmState};
use crate::rstp::tx::{BpduTxLimiter, TxDecision};
use crate::rstp::{InfoIs, PortRole, PriorityVector};
use timer::{TickSource, TimerBank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RstpTimerKind {
    Hello,
    RcvdInfoWhile,
    MdelayWhile,
    EdgeDelayWhile,
    TcWhile,
    FdWhile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RstpTimerKey {
    port: PortId,
    kind: RstpTimerKind,
}

struct PortMachines {
    prx: PrxState,
    ppm: PpmState,
    pim: PimState,
    tcm: TcmState,
    tx_limiter: BpduTxLimiter,
    forwarding_state: PortState,
}

impl PortMachines {
    fn new() -> Self {
        PortMachines {
            prx: PrxState::Discard,
            ppm: PpmState::CheckingRstp,
            pim: PimState::Disabled,
            tcm: TcmState::Inactive,
            tx_limiter: BpduTxLimiter::default(),
            forwarding_state: PortState::Discarding,
        }
    }
}

pub enum RstpBusEvent {
    Bpdu(PortId, Bpdu),
    PortEnabled(PortId, bool),
}

/// The sending half handed to the PDU receive path and management.
#[derive(Clone)]
pub struct RstpBusHandle {
    tx: mpsc::Sender<RstpBusEvent>,
    kill_tx: mpsc::Sender<()>,
}

impl RstpBusHandle {
    pub async fn send_bpdu(&self, port: PortId, bpdu: Bpdu) {
        let _ = self.tx.send(RstpBusEvent::Bpdu(port, bpdu)).await;
    }

    pub async fn set_port_enabled(&self, port: PortId, enabled: bool) {
        let _ = self.tx.send(RstpBusEvent::PortEnabled(port, enabled)).await;
    }

    pub async fn kill(&self) {
        let _ = self.kill_tx.send(()).await;
    }
}

pub struct RstpBridgeActor {
    registry: Arc<Registry>,
    asic: Arc<dyn AsicAdapter>,
    bus_rx: mpsc::Receiver<RstpBusEvent>,
    kill_rx: mpsc::Receiver<()>,
    ticks: TickSource,
    timers: TimerBank<RstpTimerKey>,
    machines: HashMap<PortId, PortMachines>,
    bridge_id: BridgeId,
}

impl RstpBridgeActor {
    pub fn new(registry: Arc<Registry>, asic: Arc<dyn AsicAdapter>) -> (Self, RstpBusHandle) {
        Self::with_ticks(registry, asic, TickSource::real_time())
    }

    pub fn with_ticks(registry: Arc<Registry>, asic: Arc<dyn AsicAdapter>, ticks: TickSource) -> (Self, RstpBusHandle) {
        let (tx, bus_rx) = mpsc::channel(1000);
        let (kill_tx, kill_rx) = mpsc::channel(1);
        let bridge_id = registry.bridge_id().unwrap_or_default();
        let machines = registry.rstp_port_ids().into_iter().map(|id| (id, PortMachines::new())).collect();
        (
            RstpBridgeActor {
                registry,
                asic,
                bus_rx,
                kill_rx,
                ticks,
                timers: TimerBank::new(),
                machines,
                bridge_id,
            },
            RstpBusHandle { tx, kill_tx },
        )
    }

    fn hello_time(&self, port_id: PortId) -> u32 {
        self.registry.with_rstp_port(port_id, |p| p.hello_time).unwrap_or(DEFAULT_HELLO_TIME_SECS)
    }

    pub async fn run(mut self) {
        for id in self.registry.rstp_port_ids() {
            let hello = self.hello_time(id);
            self.timers.start(RstpTimerKey { port: id, kind: RstpTimerKind::Hello }, hello);
        }
        self.run_prs().await;
        loop {
            tokio::select! {
                biased;
                _ = self.kill_rx.recv() => return,
                Some(event) = self.bus_rx.recv() => self.handle_bus_event(event).await,
                _ = self.ticks.tick() => self.handle_tick().await,
                else => return,
            }
        }
    }

    async fn handle_bus_event(&mut self, event: RstpBusEvent) {
        match event {
            RstpBusEvent::Bpdu(port, bpdu) => self.handle_bpdu(port, bpdu).await,
            RstpBusEvent::PortEnabled(port, enabled) => self.handle_port_enabled(port, enabled).await,
        }
    }

    async fn handle_port_enabled(&mut self, port_id: PortId, enabled: bool) {
        self.registry.with_rstp_port_mut(port_id, |p| {
            p.admin_enabled = enabled;
            p.port_enabled = enabled;
        });
        let machines = self.machines.entry(port_id).or_insert_with(PortMachines::new);
        let prx_event = if enabled { PrxEvent::Begin } else { PrxEvent::PortDisabled };
        let (prx_next, _) = prx::transition(machines.prx, prx_event);
        machines.prx = prx_next;

        if enabled {
            let (ppm_next, ppm_effects) = ppm::transition(machines.ppm, PpmEvent::Begin);
            machines.ppm = ppm_next;
            self.apply_ppm_effects(port_id, ppm_effects);
            let hello = self.hello_time(port_id);
            self.timers.start(RstpTimerKey { port: port_id, kind: RstpTimerKind::Hello }, hello);
        }
        self.registry.with_rstp_port_mut(port_id, |p| p.reselect = true);
        self.run_prs().await;
    }

    fn apply_ppm_effects(&mut self, port_id: PortId, effects: Vec<PpmEffect>) {
        for effect in effects {
            match effect {
                PpmEffect::SetSendRstp(v) => {
                    self.registry.with_rstp_port_mut(port_id, |p| p.send_rstp = v);
                }
                PpmEffect::LoadMdelayWhile(secs) => {
                    self.timers.start(RstpTimerKey { port: port_id, kind: RstpTimerKind::MdelayWhile }, secs);
                }
                PpmEffect::Notify(notification) => {
                    tracing::debug!(?port_id, ?notification, "PPMM notification");
                }
            }
        }
    }

    async fn handle_bpdu(&mut self, port_id: PortId, bpdu: Bpdu) {
        let machines = self.machines.entry(port_id).or_insert_with(PortMachines::new);
        let (prx_next, prx_effects) = prx::transition(machines.prx, PrxEvent::Bpdu(bpdu));
        machines.prx = prx_next;

        let mut tc_event = None;
        for effect in prx_effects {
            match effect {
                PrxEffect::SetRcvdBpdu(v) => {
                    self.registry.with_rstp_port_mut(port_id, |p| p.rcvd_bpdu = v);
                }
                PrxEffect::SetRcvdStp(v) => {
                    self.registry.with_rstp_port_mut(port_id, |p| p.rcvd_stp = v);
                }
                PrxEffect::SetRcvdRstp(v) => {
                    self.registry.with_rstp_port_mut(port_id, |p| p.rcvd_rstp = v);
                }
                PrxEffect::SetRcvdMsg(v) => {
                    self.registry.with_rstp_port_mut(port_id, |p| p.rcvd_msg = v);
                }
                PrxEffect::SetRcvdTc(v) => {
                    self.registry.with_rstp_port_mut(port_id, |p| p.rcvd_tc = v);
                    if v {
                        tc_event = Some(TcmEvent::RcvdTc);
                    }
                }
                PrxEffect::SetRcvdTcAck(v) => {
                    self.registry.with_rstp_port_mut(port_id, |p| p.rcvd_tc_ack = v);
                }
                PrxEffect::SetRcvdTcn(v) => {
                    self.registry.with_rstp_port_mut(port_id, |p| p.rcvd_tcn = v);
                    if v {
                        tc_event = Some(TcmEvent::RcvdTcn);
                    }
                }
                PrxEffect::LoadEdgeDelayWhile(secs) => {
                    self.timers.start(RstpTimerKey { port: port_id, kind: RstpTimerKind::EdgeDelayWhile }, secs);
                    self.registry.with_rstp_port_mut(port_id, |p| p.edge_delay_while = secs);
                }
                PrxEffect::ClearOperEdge => {
                    self.registry.with_rstp_port_mut(port_id, |p| p.oper_edge = false);
                }
            }
        }

        let send_rstp_now = self.registry.with_rstp_port(port_id, |p| p.send_rstp).unwrap_or(true);
        let ppm_event = match &bpdu {
            Bpdu::Rstp(_) => PpmEvent::RcvdRstp { send_rstp: send_rstp_now },
            Bpdu::Config(_) | Bpdu::Tcn if send_rstp_now => PpmEvent::RcvdStpAndSendRstp,
            _ => PpmEvent::RcvdXst,
        };
        let machines = self.machines.get_mut(&port_id).unwrap();
        let (ppm_next, ppm_effects) = ppm::transition(machines.ppm, ppm_event);
        machines.ppm = ppm_next;
        self.apply_ppm_effects(port_id, ppm_effects);

        if let Bpdu::Tcn = bpdu {
            self.drive_tcm(port_id, TcmEvent::RcvdTcn).await;
            return;
        }

        let body: ConfigBody = match bpdu {
            Bpdu::Config(b) | Bpdu::Rstp(b) => b,
            Bpdu::Tcn => unreachable!("handled above"),
        };
        let received_is_designated = match bpdu {
            Bpdu::Rstp(b) => matches!(b.flags.role, Some(WireRole::Designated)),
            Bpdu::Config(_) => true,
            Bpdu::Tcn => false,
        };
        let receiving_port_id = self.registry.with_rstp_port(port_id, |p| p.port_priority.receiving_port_id).unwrap_or(0);
        let received_vector = PriorityVector {
            root_id: body.root_id,
            root_path_cost: body.root_path_cost,
            designated_bridge_id: body.bridge_id,
            designated_port_id: body.port_id,
            receiving_port_id,
        };
        let stored_vector = self.registry.with_rstp_port(port_id, |p| p.port_priority).unwrap_or(received_vector);
        let class = pim::classify(&received_vector, &stored_vector, received_is_designated);

        let machines = self.machines.get_mut(&port_id).unwrap();
        let (pim_next, pim_effects) = pim::transition(machines.pim, PimEvent::RcvdMsg(class));
        machines.pim = pim_next;
        self.apply_pim_effects(port_id, pim_effects, Some(received_vector));

        if let Some(event) = tc_event {
            self.drive_tcm(port_id, event).await;
        }

        let reselect_needed = self.registry.with_rstp_port(port_id, |p| p.reselect).unwrap_or(false);
        if reselect_needed {
            self.run_prs().await;
        }
    }

    fn apply_pim_effects(&mut self, port_id: PortId, effects: Vec<PimEffect>, received: Option<PriorityVector>) {
        let bridge_id = self.bridge_id;
        for effect in effects {
            match effect {
                PimEffect::RecordPriorityFromMessage => {
                    if let Some(v) = received {
                        self.registry.with_rstp_port_mut(port_id, |p| p.port_priority = v);
                    }
                }
                PimEffect::RecordDispute => {
                    self.registry.with_rstp_port_mut(port_id, |p| p.disputed = true);
                }
                PimEffect::SetReselect => {
                    self.registry.with_rstp_port_mut(port_id, |p| p.reselect = true);
                }
                PimEffect::ClearSelected => {
                    self.registry.with_rstp_port_mut(port_id, |p| p.selected = false);
                }
                PimEffect::SetAgreedFalse => {
                    self.registry.with_rstp_port_mut(port_id, |p| p.agreed = false);
                }
                PimEffect::LoadRcvdInfoWhile(multiplier) => {
                    let hello = self.hello_time(port_id);
                    let secs = multiplier * hello;
                    self.timers.start(RstpTimerKey { port: port_id, kind: RstpTimerKind::RcvdInfoWhile }, secs);
                    self.registry.with_rstp_port_mut(port_id, |p| p.rcvd_info_while = secs);
                }
                PimEffect::AgeOutInfo => {
                    self.registry.with_rstp_port_mut(port_id, |p| {
                        p.info_is = InfoIs::Aged;
                        p.port_priority = PriorityVector {
                            root_id: bridge_id,
                            root_path_cost: 0,
                            designated_bridge_id: bridge_id,
                            designated_port_id: p.port_priority.receiving_port_id,
                            receiving_port_id: p.port_priority.receiving_port_id,
                        };
                    });
                }
            }
        }
    }

    async fn drive_tcm(&mut self, port_id: PortId, event: TcmEvent) {
        let hello = self.hello_time(port_id);
        let machines = self.machines.entry(port_id).or_insert_with(PortMachines::new);
        let (next, effects) = tcm::transition(machines.tcm, event, port_id, hello);
        machines.tcm = next;
        for effect in effects {
            match effect {
                TcmEffect::LoadTcWhile(secs) => {
                    self.timers.start(RstpTimerKey { port: port_id, kind: RstpTimerKind::TcWhile }, secs);
                    self.registry.with_rstp_port_mut(port_id, |p| p.tc_while = secs);
                }
                TcmEffect::SetTc(v) => {
                    self.registry.with_rstp_port_mut(port_id, |p| p.tc = v);
                }
                TcmEffect::FlushOtherPorts { except } => {
                    for other in self.registry.rstp_port_ids() {
                        if other != except {
                            self.asic.flush_macs(other).await;
                        }
                    }
                }
                TcmEffect::SetTcAck => {
                    self.transmit_bpdu(port_id, true).await;
                }
            }
        }
    }

    /// Runs Port Role Selection over every port of the bridge (§4.11 PRS),
    /// then drives each port's role sub-FSM to reflect the new assignment.
    async fn run_prs(&mut self) {
        let ports = self.registry.rstp_ports_snapshot();
        let bridge_vector = PriorityVector {
            root_id: self.bridge_id,
            root_path_cost: 0,
            designated_bridge_id: self.bridge_id,
            designated_port_id: 0,
            receiving_port_id: 0,
        };
        let candidates: Vec<PortCandidate> = ports
            .iter()
            .map(|p| PortCandidate {
                id: p.id,
                enabled: p.port_enabled && p.admin_enabled,
                vector: p.port_priority,
            })
            .collect();
        let assignments = prs::select_roles(&candidates, &bridge_vector);

        for assignment in assignments {
            self.registry.with_rstp_port_mut(assignment.id, |p| {
                p.role = assignment.role;
                p.selected_role = assignment.role;
                p.selected = true;
                p.reselect = false;
            });
            self.advance_prt(assignment.id, false).await;
        }
    }

    async fn advance_prt(&mut self, port_id: PortId, forward_delay_elapsed: bool) {
        let Some(snapshot) = self.registry.with_rstp_port(port_id, |p| p.clone()) else {
            return;
        };
        let machines = self.machines.entry(port_id).or_insert_with(PortMachines::new);
        let previous = machines.forwarding_state;
        let guards = RoleTransitionGuards {
            agreed: snapshot.agreed,
            forward_delay_elapsed,
            rstp_and_point_to_point: snapshot.send_rstp && snapshot.oper_point_to_point,
        };
        let next = match snapshot.role {
            PortRole::Root => from_root_state(prt::root_port_transition(to_root_state(previous), guards)),
            PortRole::Designated => {
                from_designated_state(prt::designated_port_transition(to_designated_state(previous), guards))
            }
            PortRole::Alternate | PortRole::Backup | PortRole::Disabled => PortState::Discarding,
        };
        machines.forwarding_state = next;
        let effects = pst::apply(previous, next);
        for effect in &effects {
            match effect {
                PstEffect::AsicSetLearning(v) => {
                    self.asic.set_learning(port_id, *v).await;
                    self.registry.with_rstp_port_mut(port_id, |p| p.learning = *v);
                }
                PstEffect::AsicSetForwarding(v) => {
                    self.asic.set_forwarding(port_id, *v).await;
                    self.registry.with_rstp_port_mut(port_id, |p| p.forwarding = *v);
                }
                PstEffect::AsicFlushMacs => {
                    self.asic.flush_macs(port_id).await;
                }
            }
        }

        let still_converging = next != PortState::Forwarding && matches!(snapshot.role, PortRole::Root | PortRole::Designated);
        if still_converging {
            self.timers.start(RstpTimerKey { port: port_id, kind: RstpTimerKind::FdWhile }, snapshot.forward_delay);
        } else if next == PortState::Forwarding && previous != PortState::Forwarding {
            self.drive_tcm(port_id, TcmEvent::RoleChangedToDesignatedOrRoot).await;
        }
    }

    async fn handle_tick(&mut self) {
        let fired = self.timers.advance();
        for key in fired {
            match key.kind {
                RstpTimerKind::Hello => self.fire_hello(key.port).await,
                RstpTimerKind::RcvdInfoWhile => {
                    let machines = self.machines.entry(key.port).or_insert_with(PortMachines::new);
                    let (next, effects) = pim::transition(machines.pim, PimEvent::RcvdInfoWhileExpired);
                    machines.pim = next;
                    self.apply_pim_effects(key.port, effects, None);
                    self.run_prs().await;
                }
                RstpTimerKind::MdelayWhile => {
                    let machines = self.machines.entry(key.port).or_insert_with(PortMachines::new);
                    let (next, _) = ppm::transition(machines.ppm, PpmEvent::MdelayWhileExpired);
                    machines.ppm = next;
                }
                RstpTimerKind::EdgeDelayWhile => {
                    self.registry.with_rstp_port_mut(key.port, |p| {
                        if p.admin_edge {
                            p.oper_edge = true;
                        }
                    });
                }
                RstpTimerKind::TcWhile => {
                    self.drive_tcm(key.port, TcmEvent::TcWhileExpired).await;
                }
                RstpTimerKind::FdWhile => {
                    self.advance_prt(key.port, true).await;
                }
            }
        }
    }

    async fn fire_hello(&mut self, port_id: PortId) {
        let hello = self.hello_time(port_id);
        self.timers.start(RstpTimerKey { port: port_id, kind: RstpTimerKind::Hello }, hello);
        if let Some(m) = self.machines.get_mut(&port_id) {
            m.tx_limiter.hello_when_expired();
        }
        self.transmit_bpdu(port_id, false).await;
    }

    async fn transmit_bpdu(&mut self, port_id: PortId, tc_ack: bool) {
        let Some(port) = self.registry.with_rstp_port(port_id, |p| p.clone()) else {
            return;
        };
        if !tc_ack && !matches!(port.role, PortRole::Root | PortRole::Designated) {
            return;
        }
        let Some(machines) = self.machines.get_mut(&port_id) else {
            return;
        };
        if !matches!(machines.tx_limiter.try_transmit(), TxDecision::Send) {
            return;
        }
        let role_bits = match port.role {
            PortRole::Root => WireRole::Root,
            PortRole::Designated => WireRole::Designated,
            _ => WireRole::Unknown,
        };
        let body = ConfigBody {
            flags: BpduFlags {
                topology_change: port.tc,
                proposal: false,
                role: Some(role_bits),
                learning: port.learning,
                forwarding: port.forwarding,
                agreement: port.agreed,
                topology_change_ack: tc_ack,
            },
            root_id: port.port_priority.root_id,
            root_path_cost: port.port_priority.root_path_cost,
            bridge_id: self.bridge_id,
            port_id: port.port_priority.receiving_port_id,
            message_age: WireTime::from_secs(0),
            max_age: WireTime::from_secs(port.max_age as u16),
            hello_time: WireTime::from_secs(port.hello_time as u16),
            forward_delay: WireTime::from_secs(port.forward_delay as u16),
        };
        let bpdu = if port.send_rstp { Bpdu::Rstp(body) } else { Bpdu::Config(body) };
        self.asic.send_frame(port_id, bpdu.encode()).await;
    }
}

fn to_root_state(s: PortState) -> RootPortState {
    match s {
        PortState::Discarding => RootPortState::Discarding,
        PortState::Learning => RootPortState::Learning,
        PortState::Forwarding => RootPortState::Forwarding,
    }
}

fn from_root_state(s: RootPortState) -> PortState {
    match s {
        RootPortState::Discarding => PortState::Discarding,
        RootPortState::Learning => PortState::Learning,
        RootPortState::Forwarding => PortState::Forwarding,
    }
}

fn to_designated_state(s: PortState) -> DesignatedPortState {
    match s {
        PortState::Discarding => DesignatedPortState::Discarding,
        PortState::Learning => DesignatedPortState::Learning,
        PortState::Forwarding => DesignatedPortState::Forwarding,
    }
}

fn from_designated_state(s: DesignatedPortState) -> PortState {
    match s {
        DesignatedPortState::Discarding => PortState::Discarding,
        DesignatedPortState::Learning => PortState::Learning,
        DesignatedPortState::Forwarding => PortState::Forwarding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asic::InProcessAsic;
    use crate::asic::AsicCall;
    use crate::rstp::port::RstpPort;
    use pdu_codec::frame::SystemId;
    use timer::TickSource;

    fn bridge(last: u8) -> BridgeId {
        BridgeId { priority: 0x8000, address: SystemId([0, 0, 0, 0, 0, last]) }
    }

    /// A root bridge with no better BPDUs ever arriving designates its one
    /// enabled port and walks it to Forwarding across two forward-delay
    /// ticks, since the proposal/agreement fast path isn't wired to the
    /// wire in this simplified bridge.
    #[tokio::test]
    async fn lone_port_on_root_bridge_converges_to_forwarding() {
        let registry = Arc::new(Registry::new());
        let own = bridge(1);
        registry.set_bridge_id(own);
        registry.add_rstp_port(RstpPort::new(PortId(10), 1, own)).unwrap();
        let asic = Arc::new(InProcessAsic::new());
        let (ticks, ticker) = TickSource::manual();
        let (actor, handle) = RstpBridgeActor::with_ticks(registry.clone(), asic.clone(), ticks);
        let task = tokio::spawn(actor.run());

        handle.set_port_enabled(PortId(10), true).await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let role = registry.with_rstp_port(PortId(10), |p| p.role).unwrap();
        assert_eq!(role, PortRole::Designated);

        // Two forward-delay windows: Discarding -> Learning -> Forwarding.
        for _ in 0..2 {
            ticker.fire().await;
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(registry.with_rstp_port(PortId(10), |p| p.forwarding).unwrap());
        assert!(asic.calls().contains(&AsicCall::SetForwarding(PortId(10), true)));

        handle.kill().await;
        let _ = task.await;
    }

    /// A superior BPDU on one port makes this bridge's port Root instead of
    /// Designated, and the other enabled port without any peer stays
    /// Designated for its own segment.
    #[tokio::test]
    async fn superior_bpdu_assigns_root_role() {
        let registry = Arc::new(Registry::new());
        let own = bridge(2);
        registry.set_bridge_id(own);
        registry.add_rstp_port(RstpPort::new(PortId(10), 1, own)).unwrap();
        let asic = Arc::new(InProcessAsic::new());
        let (ticks, _ticker) = TickSource::manual();
        let (actor, handle) = RstpBridgeActor::with_ticks(registry.clone(), asic, ticks);
        let task = tokio::spawn(actor.run());

        handle.set_port_enabled(PortId(10), true).await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let better_root = bridge(1);
        let better = ConfigBody {
            flags: BpduFlags { role: Some(WireRole::Designated), ..Default::default() },
            root_id: better_root,
            root_path_cost: 4,
            bridge_id: better_root,
            port_id: 0x8001,
            message_age: WireTime::from_secs(0),
            max_age: WireTime::from_secs(20),
            hello_time: WireTime::from_secs(2),
            forward_delay: WireTime::from_secs(15),
        };
        handle.send_bpdu(PortId(10), Bpdu::Rstp(better)).await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let role = registry.with_rstp_port(PortId(10), |p| p.role).unwrap();
        assert_eq!(role, PortRole::Root);

        handle.kill().await;
        let _ = task.await;
    }
}
