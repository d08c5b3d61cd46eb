//! Wires the per-port LACP machines together into the actor described in
//! §5: one task per port, suspending only at its event-bus receive, driving
//! RX → {Selection, PTX, Mux, CD} → TX on every relevant mutation.

use std::sync::Arc;
use std::time::Duration;

use pdu_codec::lacp::LacpDu;
use pdu_codec::marker::MarkerPdu;
use pdu_codec::Decoded;
use timer::{TickSource, TimerBank};

use crate::asic::AsicAdapter;
use crate::event_bus::{ControlEvent, EventBus, EventBusHandle, NextEvent, PduEvent, TimerKind};
use crate::ids::PortId;
use crate::lacp::{cd, marker_responder, mux, ptx, rx, selection, tx as lacp_tx};
use crate::port::Selected;
use crate::registry::Registry;

const ADAPTER_CALL_TIMEOUT: Duration = Duration::from_millis(500);

/// One port's worth of running machine state. `LacpPort` (the shared
/// record in the registry) holds the data every machine reads; this holds
/// the state each machine is *in*, which only `system.rs` touches.
struct MachineStates {
    rx: rx::RxState,
    ptx: ptx::PtxState,
    mux: mux::MuxState,
    cd_actor: cd::CdState,
    cd_partner: cd::CdState,
    tx_limiter: lacp_tx::TxLimiter,
}

impl MachineStates {
    fn new() -> Self {
        MachineStates {
            rx: rx::RxState::Initialize,
            ptx: ptx::PtxState::NoPeriodic,
            mux: mux::MuxState::Detached,
            cd_actor: cd::CdState::NoChurn,
            cd_partner: cd::CdState::NoChurn,
            tx_limiter: lacp_tx::TxLimiter::new(),
        }
    }
}

pub struct LacpPortActor {
    id: PortId,
    registry: Arc<Registry>,
    asic: Arc<dyn AsicAdapter>,
    bus: EventBus,
    states: MachineStates,
    ticks: TickSource,
    timers: TimerBank<TimerKind>,
}

impl LacpPortActor {
    pub fn new(id: PortId, registry: Arc<Registry>, asic: Arc<dyn AsicAdapter>) -> (Self, EventBusHandle) {
        Self::with_ticks(id, registry, asic, TickSource::real_time())
    }

    /// Same as [`Self::new`] but takes an explicit 1Hz tick source, so tests
    /// can drive timer-boundary behavior with a [`timer::ManualTicker`]
    /// instead of racing real time.
    pub fn with_ticks(
        id: PortId,
        registry: Arc<Registry>,
        asic: Arc<dyn AsicAdapter>,
        ticks: TickSource,
    ) -> (Self, EventBusHandle) {
        let bus = EventBus::new();
        let handle = bus.handle.clone();
        (
            LacpPortActor {
                id,
                registry,
                asic,
                bus,
                states: MachineStates::new(),
                ticks,
                timers: TimerBank::new(),
            },
            handle,
        )
    }

    pub async fn run(mut self) {
        self.apply_rx(rx::RxEvent::Begin).await;
        loop {
            tokio::select! {
                biased;
                event = self.bus.recv() => match event {
                    NextEvent::Killed => {
                        self.teardown().await;
                        return;
                    }
                    NextEvent::Control(event) => self.handle_control(event).await,
                    NextEvent::Pdu(event) => self.handle_pdu(event).await,
                },
                _ = self.ticks.tick() => self.handle_tick().await,
            }
        }
    }

    /// Decrement every running timer by one second and react to whichever
    /// ones reached zero on this tick.
    async fn handle_tick(&mut self) {
        // The TX rate-limit window rolls over every tick regardless of
        // which timers fire (§4.9: "retry when the 1-second window rolls
        // over").
        self.states.tx_limiter.roll_window();
        let fired = self.timers.advance();
        for kind in fired {
            match kind {
                TimerKind::CurrentWhile => self.apply_rx(rx::RxEvent::CurrentWhileExpired).await,
                TimerKind::Periodic => self.fire_periodic().await,
                TimerKind::WaitWhile => self.tick_mux(mux::MuxEvent::WaitWhileExpired).await,
                TimerKind::ChurnActor => {
                    let (s, effects) = cd::transition(self.states.cd_actor, cd::CdEvent::ChurnTimerExpired);
                    self.states.cd_actor = s;
                    self.apply_cd_effects(effects, true);
                }
                TimerKind::ChurnPartner => {
                    let (s, effects) = cd::transition(self.states.cd_partner, cd::CdEvent::ChurnTimerExpired);
                    self.states.cd_partner = s;
                    self.apply_cd_effects(effects, false);
                }
            }
        }
    }

    async fn handle_control(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Begin => self.apply_rx(rx::RxEvent::Begin).await,
            ControlEvent::PortEnabled(enabled) => {
                self.registry.with_port_mut(self.id, |p| p.oper_enabled = enabled);
                let ev = if enabled { rx::RxEvent::PortEnabled } else { rx::RxEvent::PortDisabledAdmin };
                self.apply_rx(ev).await;
            }
            ControlEvent::PortMoved => {
                self.registry.with_port_mut(self.id, |p| p.port_moved = true);
                self.apply_rx(rx::RxEvent::PortMoved).await;
            }
            ControlEvent::TimerExpired(TimerKind::CurrentWhile) => {
                self.apply_rx(rx::RxEvent::CurrentWhileExpired).await;
            }
            ControlEvent::TimerExpired(TimerKind::ChurnActor) => {
                let (s, effects) = cd::transition(self.states.cd_actor, cd::CdEvent::ChurnTimerExpired);
                self.states.cd_actor = s;
                self.apply_cd_effects(effects, true);
            }
            ControlEvent::TimerExpired(TimerKind::ChurnPartner) => {
                let (s, effects) = cd::transition(self.states.cd_partner, cd::CdEvent::ChurnTimerExpired);
                self.states.cd_partner = s;
                self.apply_cd_effects(effects, false);
            }
            ControlEvent::TimerExpired(TimerKind::Periodic) => self.tick_ptx().await,
            ControlEvent::TimerExpired(TimerKind::WaitWhile) => self.tick_mux(mux::MuxEvent::WaitWhileExpired).await,
            ControlEvent::SelectionChanged => self.tick_mux(mux::MuxEvent::SelectedChanged).await,
        }
    }

    async fn handle_pdu(&mut self, event: PduEvent) {
        match event.decoded {
            Decoded::Lacp(du) => self.apply_rx(rx::RxEvent::Pdu(du)).await,
            Decoded::Marker(pdu) => self.handle_marker(pdu).await,
            Decoded::Bpdu(_) => {}
            Decoded::Invalid(e) => {
                self.registry.with_port_mut(self.id, |p| p.illegal_pdu_count += 1);
                tracing::debug!(port = self.id.0, error = %e, "dropped malformed PDU");
            }
        }
    }

    async fn handle_marker(&mut self, pdu: MarkerPdu) {
        let (_, action) = marker_responder::handle(pdu);
        match action {
            marker_responder::MarkerAction::Respond(response) => {
                let src = self.registry.with_port(self.id, |p| p.mac).unwrap_or_default();
                let frame = pdu_codec::marker::encode_frame(src, &response);
                let _ = tokio::time::timeout(ADAPTER_CALL_TIMEOUT, self.asic.send_frame(self.id, frame)).await;
            }
            marker_responder::MarkerAction::CountResponse => {
                self.registry.with_port_mut(self.id, |p| p.marker_response_count += 1);
            }
        }
    }

    async fn apply_rx(&mut self, event: rx::RxEvent) {
        let guards = self
            .registry
            .with_port(self.id, |p| rx::RxGuards { port_enabled: p.oper_enabled, lacp_enabled: true })
            .unwrap_or(rx::RxGuards { port_enabled: false, lacp_enabled: true });

        let incoming_du = match &event {
            rx::RxEvent::Pdu(du) => Some(*du),
            _ => None,
        };
        let (mut next, mut effects) = rx::transition(self.states.rx, event, guards);

        // Initialize is a pass-through state (§4.4): it falls to
        // PortDisabled unconditionally rather than waiting on another
        // event, and PortDisabled in turn re-evaluates immediately against
        // the ports's current enable guards.
        if next == rx::RxState::Initialize {
            let (n2, e2) = rx::transition(next, rx::RxEvent::PortEnabled, guards);
            next = n2;
            effects.extend(e2);
        }
        if next == rx::RxState::PortDisabled {
            let (n3, e3) = rx::transition(next, rx::RxEvent::PortEnabled, guards);
            next = n3;
            effects.extend(e3);
        }
        self.states.rx = next;

        let mut selection_requested = false;
        self.registry.with_port_mut(self.id, |p| {
            for effect in &effects {
                match effect {
                    rx::RxEffect::ClearSelected => p.selected = Selected::Unselected,
                    rx::RxEffect::ClearPortMoved => p.port_moved = false,
                    rx::RxEffect::ResetActorOperFromAdmin => p.actor_oper = p.actor_admin,
                    rx::RxEffect::RecordDefault => p.partner_oper = p.partner_admin,
                    rx::RxEffect::RecordPdu(du) => p.partner_oper = du.actor,
                    rx::RxEffect::UpdateSelected => {
                        if let Some(du) = incoming_du {
                            if !p.partner_vector_matches(&du.partner) {
                                p.selected = Selected::Unselected;
                            }
                        }
                    }
                    rx::RxEffect::UpdateNtt => p.ntt = true,
                    rx::RxEffect::SetActorExpired(v) => p.actor_oper.state.set_expired(*v),
                    rx::RxEffect::SetPartnerSyncFalse => p.partner_oper.state.set_synchronization(false),
                    rx::RxEffect::SetPartnerTimeout(crate::lacp::ShortOrLong::Short) => {
                        p.partner_oper.state.set_timeout_short(true)
                    }
                    rx::RxEffect::SetPartnerTimeout(crate::lacp::ShortOrLong::Long) => {
                        p.partner_oper.state.set_timeout_short(false)
                    }
                    rx::RxEffect::LoadCurrentWhile(secs) => {
                        p.current_while = *secs;
                        self.timers.start(TimerKind::CurrentWhile, *secs);
                    }
                    rx::RxEffect::NotifySelection => selection_requested = true,
                    rx::RxEffect::IncrementIllegalPdu => p.illegal_pdu_count += 1,
                }
            }
        });

        if matches!(next, rx::RxState::Defaulted | rx::RxState::PortDisabled) {
            selection_requested = true;
        }
        // Any effect pass that leaves the port Unselected owes it a trip
        // through Selection, not just the defaulting/disabling paths.
        let still_unselected =
            self.registry.with_port(self.id, |p| p.selected == Selected::Unselected).unwrap_or(false);
        if still_unselected {
            selection_requested = true;
        }
        if selection_requested {
            self.run_selection().await;
        }
        self.tick_ptx().await;
    }

    async fn run_selection(&mut self) {
        let unselected = self
            .registry
            .with_port(self.id, |p| p.selected == Selected::Unselected)
            .unwrap_or(false);
        if !unselected {
            return;
        }
        let key = match self.registry.with_port(self.id, selection::candidate_key) {
            Some(k) => k,
            None => return,
        };
        let candidate_ids = self.registry.aggregators_by_key(key.actor_admin_key);
        let candidates: Vec<_> = candidate_ids
            .into_iter()
            .filter_map(|id| self.registry.with_aggregator(id, |a| a.clone()).map(|a| (id, a)))
            .collect();

        if let Some((agg_id, selected)) = selection::select(key, candidates) {
            self.registry.with_port_mut(self.id, |p| {
                p.aggregator = Some(agg_id);
                p.selected = selected;
            });
            self.registry.with_aggregator_mut(agg_id, |a| a.attach(self.id));
        }
        self.tick_mux(mux::MuxEvent::SelectedChanged).await;
    }

    /// Re-evaluates PTX against the partner's currently advertised timeout.
    /// Called after any RX mutation, since a flip in the partner's timeout
    /// bit re-arms the periodic timer at a different rate (§4.5).
    async fn tick_ptx(&mut self) {
        let event = if self.registry.with_port(self.id, |p| p.partner_oper.state.timeout_short()).unwrap_or(true) {
            ptx::PtxEvent::PartnerTimeoutShort
        } else {
            ptx::PtxEvent::PartnerTimeoutLong
        };
        self.drive_ptx(event).await;
    }

    /// Called when the periodic timer armed by `tick_ptx`'s `LoadPeriodic`
    /// effect reaches zero: pulses PTX through `PeriodicTx`, which asks for
    /// an LACPDU to go out.
    async fn fire_periodic(&mut self) {
        self.drive_ptx(ptx::PtxEvent::PeriodicTimerExpired).await;
    }

    async fn drive_ptx(&mut self, event: ptx::PtxEvent) {
        let guards = self
            .registry
            .with_port(self.id, |p| ptx::PtxGuards {
                actor_activity: p.actor_oper.state.activity(),
                partner_activity: p.partner_oper.state.activity(),
            })
            .unwrap_or(ptx::PtxGuards { actor_activity: false, partner_activity: false });
        let (next, effects) = ptx::transition(self.states.ptx, event, guards);
        self.states.ptx = next;
        for effect in effects {
            match effect {
                ptx::PtxEffect::SetNtt => {
                    self.registry.with_port_mut(self.id, |p| p.ntt = true);
                    self.try_transmit().await;
                }
                ptx::PtxEffect::LoadPeriodic(secs) => {
                    self.registry.with_port_mut(self.id, |p| p.periodic = secs);
                    self.timers.start(TimerKind::Periodic, secs);
                }
            }
        }
    }

    async fn tick_mux(&mut self, event: mux::MuxEvent) {
        let guards = self
            .registry
            .with_port(self.id, |p| mux::MuxGuards {
                selected: p.selected,
                ready: p.aggregator.is_some(),
                partner_sync: p.partner_oper.state.synchronization(),
            })
            .unwrap_or(mux::MuxGuards { selected: Selected::Unselected, ready: false, partner_sync: false });

        let ready = match self.registry.with_port(self.id, |p| p.aggregator) {
            Some(Some(agg)) => self.registry.with_aggregator(agg, |a| a.ready).unwrap_or(false),
            _ => false,
        };
        let guards = mux::MuxGuards { ready, ..guards };

        let (mut next, mut effects) = mux::transition(self.states.mux, event, guards);
        let previous = self.states.mux;

        // Attached/Collecting re-check partner_sync against the *current*
        // guards as soon as they're entered (§4.6 UCT): a partner already
        // reporting sync shouldn't have to wait for another SelectedChanged
        // to arrive before Mux keeps walking to Distributing.
        loop {
            let (n, e) = mux::transition(next, mux::MuxEvent::SelectedChanged, guards);
            if n == next {
                break;
            }
            next = n;
            effects.extend(e);
        }
        self.states.mux = next;

        for effect in effects {
            match effect {
                mux::MuxEffect::SetActorSync(v) => {
                    self.registry.with_port_mut(self.id, |p| p.actor_oper.state.set_synchronization(v));
                }
                mux::MuxEffect::SetCollecting => {
                    self.registry.with_port_mut(self.id, |p| p.actor_oper.state.set_collecting(true));
                }
                mux::MuxEffect::ClearCollecting => {
                    self.registry.with_port_mut(self.id, |p| p.actor_oper.state.set_collecting(false));
                }
                mux::MuxEffect::SetDistributing => {
                    self.registry.with_port_mut(self.id, |p| p.actor_oper.state.set_distributing(true));
                    if let Some(Some(agg)) = self.registry.with_port(self.id, |p| p.aggregator) {
                        self.registry.with_aggregator_mut(agg, |a| a.mark_distributing(self.id));
                        let _ = tokio::time::timeout(
                            ADAPTER_CALL_TIMEOUT,
                            self.asic.set_distributing(agg, self.id, true),
                        )
                        .await;
                    }
                }
                mux::MuxEffect::ClearDistributing => {
                    self.registry.with_port_mut(self.id, |p| p.actor_oper.state.set_distributing(false));
                    if let Some(Some(agg)) = self.registry.with_port(self.id, |p| p.aggregator) {
                        self.registry.with_aggregator_mut(agg, |a| a.unmark_distributing(self.id));
                    }
                }
                mux::MuxEffect::SetNtt => {
                    self.registry.with_port_mut(self.id, |p| p.ntt = true);
                    self.try_transmit().await;
                }
                mux::MuxEffect::AsicEnableCollecting => {
                    let _ = tokio::time::timeout(ADAPTER_CALL_TIMEOUT, self.asic.set_learning(self.id, true)).await;
                }
                mux::MuxEffect::AsicDisableDistributing | mux::MuxEffect::AsicRemoveFromDistribution => {
                    if let Some(Some(agg)) = self.registry.with_port(self.id, |p| p.aggregator) {
                        let _ = tokio::time::timeout(
                            ADAPTER_CALL_TIMEOUT,
                            self.asic.set_distributing(agg, self.id, false),
                        )
                        .await;
                    }
                }
                mux::MuxEffect::LoadWaitWhile(secs) => {
                    self.timers.start(TimerKind::WaitWhile, secs);
                }
                mux::MuxEffect::AsicAddToDistribution => {}
            }
        }

        if previous != self.states.mux {
            self.maybe_transition_churn(previous).await;
        }
    }

    async fn maybe_transition_churn(&mut self, previous: mux::MuxState) {
        let sync_now = self.registry.with_port(self.id, |p| p.actor_oper.state.synchronization()).unwrap_or(false);
        let was_syncing = previous != mux::MuxState::Detached;
        let event = if sync_now && was_syncing {
            cd::CdEvent::SyncTrue
        } else {
            cd::CdEvent::SyncTransitioned
        };
        let (s, effects) = cd::transition(self.states.cd_actor, event);
        self.states.cd_actor = s;
        self.apply_cd_effects(effects, true);
    }

    fn apply_cd_effects(&mut self, effects: Vec<cd::CdEffect>, actor: bool) {
        for effect in effects {
            match effect {
                cd::CdEffect::IncrementChurnCounter => {
                    self.registry.with_port_mut(self.id, |p| p.churn_count += 1);
                }
                cd::CdEffect::LoadChurnTimer(secs) => {
                    let kind = if actor { TimerKind::ChurnActor } else { TimerKind::ChurnPartner };
                    self.timers.start(kind, secs);
                    self.registry.with_port_mut(self.id, |p| {
                        if actor {
                            p.churn_actor = secs;
                        } else {
                            p.churn_partner = secs;
                        }
                    });
                }
            }
        }
    }

    async fn try_transmit(&mut self) {
        let ntt = self.registry.with_port(self.id, |p| p.ntt).unwrap_or(false);
        if !ntt {
            return;
        }
        if let lacp_tx::TxDecision::Defer = self.states.tx_limiter.try_transmit() {
            return;
        }
        let frame = self.registry.with_port_mut(self.id, |p| {
            p.ntt = false;
            let du = LacpDu { version: 1, actor: p.actor_oper, partner: p.partner_oper, collector_max_delay: 0 };
            pdu_codec::lacp::encode_frame(p.mac, &du)
        });
        if let Some(frame) = frame {
            let _ = tokio::time::timeout(ADAPTER_CALL_TIMEOUT, self.asic.send_frame(self.id, frame)).await;
        }
    }

    async fn teardown(&mut self) {
        let (_, effects) = mux::transition(self.states.mux, mux::MuxEvent::Kill, mux::MuxGuards {
            selected: Selected::Unselected,
            ready: false,
            partner_sync: false,
        });
        for effect in effects {
            if let mux::MuxEffect::AsicDisableDistributing = effect {
                let _ = self.asic.set_port_enabled(self.id, false).await;
            }
        }
        let _ = self.registry.remove_port(self.id);
    }
}
