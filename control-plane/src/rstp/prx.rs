//! Port Receive machine (§4.11 PRX, 802.1D-2004 §17.23). Validates an
//! already-decoded BPDU (the codec has already rejected bad length and
//! msg_age >= max_age — §4.1) and derives rcvdSTP/rcvdRSTP.

use pdu_codec::bpdu::Bpdu;

use crate::rstp::port::MIGRATE_TIME_SECS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrxState {
    Discard,
    Receive,
}

#[derive(Debug, Clone)]
pub enum PrxEvent {
    Begin,
    PortDisabled,
    Bpdu(Bpdu),
    MessageConsumed,
}

#[derive(Debug, Clone)]
pub enum PrxEffect {
    SetRcvdBpdu(bool),
    SetRcvdStp(bool),
    SetRcvdRstp(bool),
    SetRcvdMsg(bool),
    SetRcvdTc(bool),
    SetRcvdTcAck(bool),
    SetRcvdTcn(bool),
    LoadEdgeDelayWhile(u32),
    ClearOperEdge,
}

pub fn transition(state: PrxState, event: PrxEvent) -> (PrxState, Vec<PrxEffect>) {
    use PrxEvent::*;
    use PrxState::*;

    match (state, event) {
        (_, Begin) | (_, PortDisabled) => (Discard, vec![]),

        (Discard, Bpdu(bpdu)) | (Receive, Bpdu(bpdu)) => (Receive, bpdu_effects(&bpdu)),

        (Receive, MessageConsumed) => (
            Receive,
            vec![
                PrxEffect::SetRcvdBpdu(false),
                PrxEffect::SetRcvdMsg(false),
                PrxEffect::SetRcvdTc(false),
                PrxEffect::SetRcvdTcAck(false),
                PrxEffect::SetRcvdTcn(false),
            ],
        ),

        (s, _) => (s, vec![]),
    }
}

fn bpdu_effects(bpdu: &Bpdu) -> Vec<PrxEffect> {
    let mut effects = vec![
        PrxEffect::SetRcvdBpdu(true),
        PrxEffect::SetRcvdMsg(true),
        PrxEffect::LoadEdgeDelayWhile(MIGRATE_TIME_SECS),
        PrxEffect::ClearOperEdge,
    ];
    match bpdu {
        Bpdu::Config(body) => {
            effects.push(PrxEffect::SetRcvdStp(true));
            effects.push(PrxEffect::SetRcvdRstp(false));
            if body.flags.topology_change {
                effects.push(PrxEffect::SetRcvdTc(true));
            }
            if body.flags.topology_change_ack {
                effects.push(PrxEffect::SetRcvdTcAck(true));
            }
        }
        Bpdu::Rstp(body) => {
            effects.push(PrxEffect::SetRcvdStp(false));
            effects.push(PrxEffect::SetRcvdRstp(true));
            if body.flags.topology_change {
                effects.push(PrxEffect::SetRcvdTc(true));
            }
        }
        Bpdu::Tcn => {
            effects.push(PrxEffect::SetRcvdStp(true));
            effects.push(PrxEffect::SetRcvdRstp(false));
            effects.push(PrxEffect::SetRcvdTcn(true));
        }
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdu_codec::bpdu::{BridgeId, ConfigBody, WireTime};
    use pdu_codec::frame::SystemId;

    fn rstp_body() -> ConfigBody {
        ConfigBody {
            max_age: WireTime::from_secs(20),
            hello_time: WireTime::from_secs(2),
            forward_delay: WireTime::from_secs(15),
            root_id: BridgeId { priority: 0x8000, address: SystemId([0; 6]) },
            bridge_id: BridgeId { priority: 0x8000, address: SystemId([0; 6]) },
            ..Default::default()
        }
    }

    #[test]
    fn valid_rstp_bpdu_sets_rcvd_rstp_not_stp() {
        let (s, effects) = transition(PrxState::Discard, PrxEvent::Bpdu(Bpdu::Rstp(rstp_body())));
        assert_eq!(s, PrxState::Receive);
        assert!(effects.iter().any(|e| matches!(e, PrxEffect::SetRcvdRstp(true))));
        assert!(effects.iter().any(|e| matches!(e, PrxEffect::SetRcvdStp(false))));
        assert!(effects
            .iter()
            .any(|e| matches!(e, PrxEffect::LoadEdgeDelayWhile(MIGRATE_TIME_SECS))));
    }

    #[test]
    fn config_bpdu_sets_rcvd_stp() {
        let (_, effects) = transition(PrxState::Discard, PrxEvent::Bpdu(Bpdu::Config(rstp_body())));
        assert!(effects.iter().any(|e| matches!(e, PrxEffect::SetRcvdStp(true))));
    }
}
