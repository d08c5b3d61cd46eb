//! Bit-exact encode/decode for LACPDU, Marker PDU, and STP/RSTP BPDU
//! (IEEE 802.1AX §6.4 and 802.1D-2004 §9).
//!
//! Decoding never panics: every malformed frame produces a typed
//! [`error::DecodeError`] instead of propagating up, per the control
//! plane's error-handling policy.

pub mod bpdu;
pub mod constants;
pub mod error;
pub mod frame;
pub mod lacp;
pub mod marker;

pub use bpdu::Bpdu;
pub use error::{DecodeError, DecodeResult};
pub use frame::SystemId;
pub use lacp::LacpDu;
pub use marker::MarkerPdu;

/// The result of classifying and decoding an arbitrary received frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Lacp(LacpDu),
    Marker(MarkerPdu),
    Bpdu(Bpdu),
    Invalid(DecodeError),
}

/// Classify `frame` by its EtherType/802.3-length field and slow-protocol
/// subtype, then decode it. Frames that are too short to carry even an
/// Ethernet header are reported as `Invalid`, never panicked on.
pub fn decode(frame: &[u8]) -> Decoded {
    if frame.len() < 14 {
        return Decoded::Invalid(DecodeError::TooShort {
            need: 14,
            got: frame.len(),
        });
    }
    let ethertype_or_len = u16::from_be_bytes([frame[12], frame[13]]);

    if ethertype_or_len == constants::SLOW_PROTOCOLS_ETHERTYPE {
        if frame.len() < 15 {
            return Decoded::Invalid(DecodeError::TooShort {
                need: 15,
                got: frame.len(),
            });
        }
        return match frame[14] {
            constants::LACP_SUBTYPE => match lacp::decode_frame(frame) {
                Ok(du) => Decoded::Lacp(du),
                Err(e) => Decoded::Invalid(e),
            },
            constants::MARKER_SUBTYPE => match marker::decode_frame(frame) {
                Ok(pdu) => Decoded::Marker(pdu),
                Err(e) => Decoded::Invalid(e),
            },
            other => Decoded::Invalid(DecodeError::UnknownSubtype(other)),
        };
    }

    // 802.3 length field (<= 0x05DC): LLC-encapsulated BPDU.
    match bpdu::decode_frame(frame) {
        Ok(b) => Decoded::Bpdu(b),
        Err(e) => {
            tracing::debug!(error = %e, "dropped malformed frame");
            Decoded::Invalid(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpdu::{Bpdu, BridgeId, ConfigBody, WireTime};

    #[test]
    fn classifies_lacp() {
        let du = LacpDu::default();
        let frame = lacp::encode_frame(SystemId([0; 6]), &du);
        assert!(matches!(decode(&frame), Decoded::Lacp(_)));
    }

    #[test]
    fn classifies_marker() {
        let pdu = MarkerPdu::Information(Default::default());
        let frame = marker::encode_frame(SystemId([0; 6]), &pdu);
        assert!(matches!(decode(&frame), Decoded::Marker(_)));
    }

    #[test]
    fn classifies_bpdu() {
        let body = ConfigBody {
            root_id: BridgeId {
                priority: 0x8000,
                address: SystemId([0, 0, 0, 0, 0, 1]),
            },
            bridge_id: BridgeId {
                priority: 0x8000,
                address: SystemId([0, 0, 0, 0, 0, 1]),
            },
            max_age: WireTime::from_secs(20),
            hello_time: WireTime::from_secs(2),
            forward_delay: WireTime::from_secs(15),
            ..Default::default()
        };
        let frame = bpdu::encode_frame(SystemId([0; 6]), &Bpdu::Config(body));
        assert!(matches!(decode(&frame), Decoded::Bpdu(_)));
    }

    #[test]
    fn garbage_is_invalid_never_panics() {
        let garbage = vec![0xFFu8; 20];
        assert!(matches!(decode(&garbage), Decoded::Invalid(_)));
    }

    #[test]
    fn truncated_frame_is_invalid() {
        assert!(matches!(decode(&[1, 2, 3]), Decoded::Invalid(_)));
    }
}
