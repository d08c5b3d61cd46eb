//! Topology Change machine (§4.11 TCM, 802.1D-2004 §17.25): on a detected
//! topology change, flood TC for `tcWhile = HelloTime + 1s` and flush every
//! other port's learned MAC entries.

use crate::ids::PortId;

pub fn tc_while_secs(hello_time_secs: u32) -> u32 {
    hello_time_secs + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcmState {
    Inactive,
    Learning,
    Detected,
    Active,
    NotifiedTcn,
    NotifiedTc,
    Propagating,
    Acknowledged,
}

#[derive(Debug, Clone, Copy)]
pub enum TcmEvent {
    Begin,
    RoleChangedToDesignatedOrRoot,
    RcvdTcn,
    RcvdTc,
    TcWhileExpired,
}

#[derive(Debug, Clone)]
pub enum TcmEffect {
    LoadTcWhile(u32),
    SetTc(bool),
    FlushOtherPorts { except: PortId },
    SetTcAck,
}

pub fn transition(state: TcmState, event: TcmEvent, receiving_port: PortId, hello_time: u32) -> (TcmState, Vec<TcmEffect>) {
    use TcmEvent::*;
    use TcmState::*;

    match (state, event) {
        (_, Begin) => (Inactive, vec![]),

        (_, RcvdTcn) => (
            NotifiedTcn,
            vec![
                TcmEffect::LoadTcWhile(tc_while_secs(hello_time)),
                TcmEffect::SetTc(true),
                TcmEffect::FlushOtherPorts { except: receiving_port },
                TcmEffect::SetTcAck,
            ],
        ),

        (_, RcvdTc) | (_, RoleChangedToDesignatedOrRoot) => (
            Active,
            vec![
                TcmEffect::LoadTcWhile(tc_while_secs(hello_time)),
                TcmEffect::SetTc(true),
                TcmEffect::FlushOtherPorts { except: receiving_port },
            ],
        ),

        (Active, TcWhileExpired) | (NotifiedTcn, TcWhileExpired) => (Inactive, vec![TcmEffect::SetTc(false)]),

        (s, _) => (s, vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tcn_floods_and_acks() {
        let (s, effects) = transition(TcmState::Inactive, TcmEvent::RcvdTcn, PortId(10), 2);
        assert_eq!(s, TcmState::NotifiedTcn);
        assert!(effects.iter().any(|e| matches!(e, TcmEffect::LoadTcWhile(3))));
        assert!(effects
            .iter()
            .any(|e| matches!(e, TcmEffect::FlushOtherPorts { except: PortId(10) })));
        assert!(effects.iter().any(|e| matches!(e, TcmEffect::SetTcAck)));
    }

    #[test]
    fn tc_while_expiry_clears_tc() {
        let (s, effects) = transition(TcmState::Active, TcmEvent::TcWhileExpired, PortId(10), 2);
        assert_eq!(s, TcmState::Inactive);
        assert!(effects.iter().any(|e| matches!(e, TcmEffect::SetTc(false))));
    }
}
