//! Marker protocol PDU encode/decode (IEEE 802.3 Annex 57B).

use crate::constants::*;
use crate::error::{DecodeError, DecodeResult};
use crate::frame::{EthernetHeader, SystemId};

/// Marker information carried by both Marker Information and Marker
/// Response TLVs; they share a wire layout and differ only in TLV type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerInfo {
    pub requester_port: u16,
    pub requester_system: SystemId,
    pub requester_transaction_id: u32,
    pub pad: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerPdu {
    Information(MarkerInfo),
    Response(MarkerInfo),
}

impl MarkerPdu {
    const BODY_LEN: usize = 2 + MARKER_TLV_LEN as usize + 2; // subtype+version, TLV, terminator

    pub fn encode(&self) -> [u8; SLOW_PROTOCOL_PDU_LEN] {
        let (tlv_type, info) = match self {
            MarkerPdu::Information(i) => (MARKER_TLV_INFO, i),
            MarkerPdu::Response(i) => (MARKER_TLV_RESPONSE, i),
        };
        let mut body = Vec::with_capacity(SLOW_PROTOCOL_PDU_LEN);
        body.push(MARKER_SUBTYPE);
        body.push(1); // version
        body.push(tlv_type);
        body.push(MARKER_TLV_LEN);
        body.extend_from_slice(&info.requester_port.to_be_bytes());
        body.extend_from_slice(&info.requester_system.0);
        body.extend_from_slice(&info.requester_transaction_id.to_be_bytes());
        body.extend_from_slice(&info.pad.to_be_bytes());
        body.push(TLV_TYPE_TERMINATOR);
        body.push(TLV_LEN_TERMINATOR);
        body.resize(SLOW_PROTOCOL_PDU_LEN, 0);
        let mut out = [0u8; SLOW_PROTOCOL_PDU_LEN];
        out.copy_from_slice(&body);
        out
    }

    pub fn decode(body: &[u8]) -> DecodeResult<Self> {
        if body.len() < Self::BODY_LEN {
            return Err(DecodeError::TooShort {
                need: Self::BODY_LEN,
                got: body.len(),
            });
        }
        if body[0] != MARKER_SUBTYPE {
            return Err(DecodeError::UnknownSubtype(body[0]));
        }
        let tlv_type = body[2];
        let len = body[3];
        if len != MARKER_TLV_LEN || (tlv_type != MARKER_TLV_INFO && tlv_type != MARKER_TLV_RESPONSE)
        {
            return Err(DecodeError::BadMarkerTlv { tlv_type, len });
        }
        let mut system = [0u8; 6];
        system.copy_from_slice(&body[6..12]);
        let info = MarkerInfo {
            requester_port: u16::from_be_bytes([body[4], body[5]]),
            requester_system: SystemId(system),
            requester_transaction_id: u32::from_be_bytes([
                body[12], body[13], body[14], body[15],
            ]),
            pad: u16::from_be_bytes([body[16], body[17]]),
        };
        if tlv_type == MARKER_TLV_INFO {
            Ok(MarkerPdu::Information(info))
        } else {
            Ok(MarkerPdu::Response(info))
        }
    }

    /// Flip a Marker Information PDU into its Marker Response, leaving
    /// every other field unchanged, per 802.3 Annex 57B.
    pub fn into_response(self) -> MarkerPdu {
        match self {
            MarkerPdu::Information(info) => MarkerPdu::Response(info),
            other @ MarkerPdu::Response(_) => other,
        }
    }
}

pub fn encode_frame(src: SystemId, pdu: &MarkerPdu) -> Vec<u8> {
    let header = EthernetHeader {
        dst: SystemId(SLOW_PROTOCOLS_DMAC),
        src,
        ethertype: SLOW_PROTOCOLS_ETHERTYPE,
    };
    let mut frame = header.encode().to_vec();
    frame.extend_from_slice(&pdu.encode());
    frame
}

pub fn decode_frame(frame: &[u8]) -> DecodeResult<MarkerPdu> {
    let header = EthernetHeader::decode(frame)?;
    if header.dst.0 != SLOW_PROTOCOLS_DMAC {
        return Err(DecodeError::WrongDestination {
            got: header.dst.0,
            want: SLOW_PROTOCOLS_DMAC,
        });
    }
    if header.ethertype != SLOW_PROTOCOLS_ETHERTYPE {
        return Err(DecodeError::WrongEtherType {
            got: header.ethertype,
            want: SLOW_PROTOCOLS_ETHERTYPE,
        });
    }
    MarkerPdu::decode(&frame[EthernetHeader::WIRE_LEN..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MarkerInfo {
        MarkerInfo {
            requester_port: 10,
            requester_system: SystemId([0, 0, 0, 0, 0, 0x64]),
            requester_transaction_id: 42,
            pad: 0,
        }
    }

    #[test]
    fn info_round_trips() {
        let pdu = MarkerPdu::Information(sample());
        let decoded = MarkerPdu::decode(&pdu.encode()).unwrap();
        assert_eq!(pdu, decoded);
    }

    #[test]
    fn into_response_flips_type_only() {
        let info = MarkerPdu::Information(sample());
        let response = info.into_response();
        match response {
            MarkerPdu::Response(i) => assert_eq!(i, sample()),
            _ => panic!("expected response"),
        }
    }

    #[test]
    fn response_is_not_re_flipped() {
        let response = MarkerPdu::Response(sample());
        assert_eq!(response.into_response(), MarkerPdu::Response(sample()));
    }

    #[test]
    fn malformed_tlv_is_rejected() {
        let mut bytes = MarkerPdu::Information(sample()).encode();
        bytes[3] = 0x04; // corrupt length
        assert!(matches!(
            MarkerPdu::decode(&bytes),
            Err(DecodeError::BadMarkerTlv { .. })
        ));
    }
}
