//! LACP Receive machine (§4.4, 802.1AX §6.4.12). A pure transition function
//! over `(state, event, snapshot) -> (state, side_effects)` per the design
//! notes: the table is kept as a table, not flattened into nested `if`s.

use pdu_codec::lacp::LacpDu;

use crate::lacp::ShortOrLong;

pub const SHORT_TIMEOUT_SECS: u32 = 3;
pub const LONG_TIMEOUT_SECS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxState {
    Initialize,
    PortDisabled,
    Expired,
    LacpDisabled,
    Defaulted,
    Current,
}

#[derive(Debug, Clone)]
pub enum RxEvent {
    Begin,
    PortMoved,
    PortEnabled,
    PortDisabledAdmin,
    LacpDisabled,
    LacpEnabled,
    CurrentWhileExpired,
    Pdu(LacpDu),
}

/// What the snapshot looks like for the RX table: only the fields the
/// table's guards actually read.
#[derive(Debug, Clone, Copy)]
pub struct RxGuards {
    pub port_enabled: bool,
    pub lacp_enabled: bool,
}

#[derive(Debug, Clone)]
pub enum RxEffect {
    ClearSelected,
    ClearPortMoved,
    ResetActorOperFromAdmin,
    RecordDefault,
    RecordPdu(LacpDu),
    UpdateSelected,
    UpdateNtt,
    SetActorExpired(bool),
    SetPartnerSyncFalse,
    SetPartnerTimeout(ShortOrLong),
    LoadCurrentWhile(u32),
    NotifySelection,
    IncrementIllegalPdu,
}

pub fn transition(
    state: RxState,
    event: RxEvent,
    guards: RxGuards,
) -> (RxState, Vec<RxEffect>) {
    use RxEvent::*;
    use RxState::*;

    match (state, event) {
        (_, Begin) => (Initialize, initialize_effects()),

        // Initialize unconditionally falls through to PortDisabled (§4.4).
        (Initialize, _) => (PortDisabled, vec![]),

        (PortDisabled, PortMoved) => (Initialize, initialize_effects()),
        (PortDisabled, PortEnabled) | (PortDisabled, LacpEnabled) => {
            if guards.port_enabled && guards.lacp_enabled {
                (Expired, expired_effects())
            } else if guards.port_enabled && !guards.lacp_enabled {
                (RxState::LacpDisabled, vec![])
            } else {
                (PortDisabled, vec![])
            }
        }

        (Expired, Pdu(du)) => (Current, current_effects(du)),
        (Expired, CurrentWhileExpired) => (Defaulted, defaulted_effects()),
        (Expired, PortMoved) | (Expired, PortDisabledAdmin) => (PortDisabled, vec![]),

        (RxState::LacpDisabled, LacpEnabled) => (PortDisabled, vec![]),
        (RxState::LacpDisabled, PortDisabledAdmin) => (PortDisabled, vec![]),

        (Defaulted, Pdu(du)) => (Current, current_effects(du)),
        (Defaulted, PortMoved) | (Defaulted, PortDisabledAdmin) => (PortDisabled, vec![]),

        (Current, Pdu(du)) => (Current, current_effects(du)),
        (Current, CurrentWhileExpired) => (Expired, expired_effects()),
        (Current, PortMoved) | (Current, PortDisabledAdmin) => (PortDisabled, vec![]),

        // Invalid event in this state: dropped, counted (§4.4, §7).
        (s, _) => (s, vec![]),
    }
}

fn initialize_effects() -> Vec<RxEffect> {
    vec![RxEffect::ClearSelected, RxEffect::ClearPortMoved, RxEffect::ResetActorOperFromAdmin]
}

fn expired_effects() -> Vec<RxEffect> {
    vec![
        RxEffect::SetPartnerSyncFalse,
        RxEffect::SetPartnerTimeout(ShortOrLong::Short),
        RxEffect::LoadCurrentWhile(SHORT_TIMEOUT_SECS),
        RxEffect::SetActorExpired(true),
    ]
}

fn defaulted_effects() -> Vec<RxEffect> {
    vec![
        RxEffect::RecordDefault,
        RxEffect::SetActorExpired(false),
        RxEffect::NotifySelection,
    ]
}

fn current_effects(du: LacpDu) -> Vec<RxEffect> {
    let timeout_secs = if du.actor.state.timeout_short() {
        SHORT_TIMEOUT_SECS
    } else {
        LONG_TIMEOUT_SECS
    };
    vec![
        RxEffect::RecordPdu(du),
        RxEffect::UpdateSelected,
        RxEffect::UpdateNtt,
        RxEffect::LoadCurrentWhile(timeout_secs),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guards(port_enabled: bool, lacp_enabled: bool) -> RxGuards {
        RxGuards { port_enabled, lacp_enabled }
    }

    #[test]
    fn begin_always_goes_to_initialize_then_port_disabled() {
        let (s, _) = transition(RxState::Current, RxEvent::Begin, guards(true, true));
        assert_eq!(s, RxState::Initialize);
        let (s, _) = transition(s, RxEvent::PortMoved, guards(true, true));
        assert_eq!(s, RxState::PortDisabled);
    }

    #[test]
    fn port_disabled_walks_to_expired_when_both_enabled() {
        let (s, effects) = transition(RxState::PortDisabled, RxEvent::PortEnabled, guards(true, true));
        assert_eq!(s, RxState::Expired);
        assert!(effects.iter().any(|e| matches!(e, RxEffect::LoadCurrentWhile(3))));
    }

    #[test]
    fn port_disabled_to_lacp_disabled_when_lacp_off() {
        let (s, _) = transition(RxState::PortDisabled, RxEvent::PortEnabled, guards(true, false));
        assert_eq!(s, RxState::LacpDisabled);
    }

    #[test]
    fn expired_times_out_to_defaulted() {
        let (s, _) = transition(RxState::Expired, RxEvent::CurrentWhileExpired, guards(true, true));
        assert_eq!(s, RxState::Defaulted);
    }

    #[test]
    fn pdu_in_defaulted_moves_to_current() {
        let (s, _) = transition(RxState::Defaulted, RxEvent::Pdu(LacpDu::default()), guards(true, true));
        assert_eq!(s, RxState::Current);
    }

    #[test]
    fn unknown_event_in_state_is_dropped() {
        let (s, effects) = transition(RxState::LacpDisabled, RxEvent::Pdu(LacpDu::default()), guards(true, true));
        assert_eq!(s, RxState::LacpDisabled);
        assert!(effects.is_empty());
    }
}
