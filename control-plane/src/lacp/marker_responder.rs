//! Marker Responder (§4.10, IEEE 802.3 Annex 57B). A Marker Information
//! TLV gets echoed back with its type flipped to Response; a Response we
//! receive (we never sent a request) just counts.

use pdu_codec::marker::MarkerPdu;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    WaitForMarker,
    RespondToMarker,
}

pub enum MarkerAction {
    /// Send this PDU back to the given destination and return to
    /// WaitForMarker.
    Respond(MarkerPdu),
    /// A Response arrived while we were waiting; counted, not echoed.
    CountResponse,
}

pub fn handle(pdu: MarkerPdu) -> (MarkerState, MarkerAction) {
    match pdu {
        MarkerPdu::Information(_) => (MarkerState::WaitForMarker, MarkerAction::Respond(pdu.into_response())),
        MarkerPdu::Response(_) => (MarkerState::WaitForMarker, MarkerAction::CountResponse),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdu_codec::frame::SystemId;
    use pdu_codec::marker::MarkerInfo;

    fn sample() -> MarkerInfo {
        MarkerInfo {
            requester_port: 10,
            requester_system: SystemId([0, 0, 0, 0, 0, 0x64]),
            requester_transaction_id: 7,
            pad: 0,
        }
    }

    #[test]
    fn information_is_echoed_as_response() {
        let (state, action) = handle(MarkerPdu::Information(sample()));
        assert_eq!(state, MarkerState::WaitForMarker);
        match action {
            MarkerAction::Respond(MarkerPdu::Response(info)) => assert_eq!(info, sample()),
            _ => panic!("expected a response to be sent"),
        }
    }

    #[test]
    fn response_is_counted_not_echoed() {
        let (_, action) = handle(MarkerPdu::Response(sample()));
        assert!(matches!(action, MarkerAction::CountResponse));
    }
}
