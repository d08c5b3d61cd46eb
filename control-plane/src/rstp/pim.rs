//! Port Information machine (§4.11 PIM, 802.1D-2004 §17.21): classifies an
//! incoming message's priority vector against the port's stored one.

use crate::rstp::PriorityVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    SuperiorDesignated,
    RepeatedDesignated,
    InferiorDesignated,
    Other,
}

pub fn classify(received: &PriorityVector, stored: &PriorityVector, received_is_designated: bool) -> MessageClass {
    if !received_is_designated {
        return MessageClass::Other;
    }
    if received.is_superior_to(stored) {
        MessageClass::SuperiorDesignated
    } else if received == stored {
        MessageClass::RepeatedDesignated
    } else {
        MessageClass::InferiorDesignated
    }
}

pub const RCVD_INFO_WHILE_HELLO_MULTIPLIER: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PimState {
    Disabled,
    AgedInfo,
    UpdateInfo,
    CurrentInfo,
    ReceiveInfo,
    SuperiorDesignated,
    RepeatedDesignated,
    InferiorDesignated,
    NotDesignated,
    OtherInfo,
}

#[derive(Debug, Clone, Copy)]
pub enum PimEvent {
    Begin,
    PortDisabled,
    RcvdMsg(MessageClass),
    RcvdInfoWhileExpired,
}

#[derive(Debug, Clone, Copy)]
pub enum PimEffect {
    RecordPriorityFromMessage,
    RecordDispute,
    SetReselect,
    ClearSelected,
    SetAgreedFalse,
    LoadRcvdInfoWhile(u32),
    AgeOutInfo,
}

pub fn transition(state: PimState, event: PimEvent) -> (PimState, Vec<PimEffect>) {
    use PimEvent::*;
    use PimState::*;

    match (state, event) {
        (_, Begin) | (_, PortDisabled) => (Disabled, vec![]),

        (_, RcvdMsg(MessageClass::SuperiorDesignated)) => (
            SuperiorDesignated,
            vec![
                PimEffect::RecordPriorityFromMessage,
                PimEffect::SetReselect,
                PimEffect::ClearSelected,
                PimEffect::SetAgreedFalse,
                PimEffect::LoadRcvdInfoWhile(RCVD_INFO_WHILE_HELLO_MULTIPLIER),
            ],
        ),
        (_, RcvdMsg(MessageClass::RepeatedDesignated)) => {
            (RepeatedDesignated, vec![PimEffect::LoadRcvdInfoWhile(RCVD_INFO_WHILE_HELLO_MULTIPLIER)])
        }
        (_, RcvdMsg(MessageClass::InferiorDesignated)) => (InferiorDesignated, vec![PimEffect::RecordDispute]),
        (_, RcvdMsg(MessageClass::Other)) => (OtherInfo, vec![]),

        (_, RcvdInfoWhileExpired) => (AgedInfo, vec![PimEffect::AgeOutInfo, PimEffect::SetReselect]),

        (s, _) => (s, vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdu_codec::bpdu::BridgeId;
    use pdu_codec::frame::SystemId;

    fn vector(cost: u32) -> PriorityVector {
        PriorityVector {
            root_id: BridgeId { priority: 0x8000, address: SystemId([0; 6]) },
            root_path_cost: cost,
            designated_bridge_id: BridgeId { priority: 0x8000, address: SystemId([0; 6]) },
            designated_port_id: 0x8001,
            receiving_port_id: 0x8001,
        }
    }

    #[test]
    fn lower_cost_is_superior() {
        assert_eq!(
            classify(&vector(0), &vector(10), true),
            MessageClass::SuperiorDesignated
        );
    }

    #[test]
    fn equal_vector_is_repeated() {
        assert_eq!(classify(&vector(10), &vector(10), true), MessageClass::RepeatedDesignated);
    }

    #[test]
    fn higher_cost_is_inferior() {
        assert_eq!(classify(&vector(20), &vector(10), true), MessageClass::InferiorDesignated);
    }

    #[test]
    fn superior_clears_selected_and_arms_timer() {
        let (s, effects) = transition(PimState::CurrentInfo, PimEvent::RcvdMsg(MessageClass::SuperiorDesignated));
        assert_eq!(s, PimState::SuperiorDesignated);
        assert!(effects.iter().any(|e| matches!(e, PimEffect::ClearSelected)));
        assert!(effects.iter().any(|e| matches!(e, PimEffect::SetAgreedFalse)));
    }
}
