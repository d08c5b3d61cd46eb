//! LACPDU encode/decode (IEEE 802.1AX §6.4.2.3).

pub mod state;

use crate::constants::*;
use crate::error::{DecodeError, DecodeResult};
use crate::frame::{EthernetHeader, SystemId};
use state::PortState;

/// One TLV's worth of actor or partner information (type 0x01/0x02, len 0x14).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortInfo {
    pub system_priority: u16,
    pub system: SystemId,
    pub key: u16,
    pub port_priority: u16,
    pub port: u16,
    pub state: PortState,
}

impl PortInfo {
    const WIRE_LEN: usize = 20;

    fn encode(&self, out: &mut Vec<u8>, tlv_type: u8) {
        out.push(tlv_type);
        out.push(TLV_LEN_ACTOR); // actor and partner TLVs share length 0x14
        out.extend_from_slice(&self.system_priority.to_be_bytes());
        out.extend_from_slice(&self.system.0);
        out.extend_from_slice(&self.key.to_be_bytes());
        out.extend_from_slice(&self.port_priority.to_be_bytes());
        out.extend_from_slice(&self.port.to_be_bytes());
        out.push(self.state.0);
        out.extend_from_slice(&[0u8; 3]); // reserved
    }

    fn decode(buf: &[u8], expected_type: u8) -> DecodeResult<Self> {
        if buf.len() < Self::WIRE_LEN {
            return Err(DecodeError::TooShort {
                need: Self::WIRE_LEN,
                got: buf.len(),
            });
        }
        let tlv_type = buf[0];
        let len = buf[1];
        if tlv_type != expected_type || len != TLV_LEN_ACTOR {
            let err = if expected_type == TLV_TYPE_ACTOR {
                DecodeError::BadActorTlv { tlv_type, len }
            } else {
                DecodeError::BadPartnerTlv { tlv_type, len }
            };
            return Err(err);
        }
        let mut system = [0u8; 6];
        system.copy_from_slice(&buf[4..10]);
        Ok(PortInfo {
            system_priority: u16::from_be_bytes([buf[2], buf[3]]),
            system: SystemId(system),
            key: u16::from_be_bytes([buf[10], buf[11]]),
            port_priority: u16::from_be_bytes([buf[12], buf[13]]),
            port: u16::from_be_bytes([buf[14], buf[15]]),
            state: PortState(buf[16]),
            // buf[17..20] reserved, ignored on decode
        })
    }
}

/// A fully decoded LACPDU: actor TLV, partner TLV, collector max-delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LacpDu {
    pub version: u8,
    pub actor: PortInfo,
    pub partner: PortInfo,
    pub collector_max_delay: u16,
}

impl LacpDu {
    /// Encode to the fixed 128-byte LACPDU body (subtype through padding).
    /// This does not include the preceding Ethernet addresses/EtherType;
    /// see [`crate::encode_lacp_frame`] for the full frame.
    pub fn encode(&self) -> [u8; SLOW_PROTOCOL_PDU_LEN] {
        let mut body = Vec::with_capacity(SLOW_PROTOCOL_PDU_LEN);
        body.push(LACP_SUBTYPE);
        body.push(self.version);
        self.actor.encode(&mut body, TLV_TYPE_ACTOR);
        self.partner.encode(&mut body, TLV_TYPE_PARTNER);
        body.push(TLV_TYPE_COLLECTOR);
        body.push(TLV_LEN_COLLECTOR);
        body.extend_from_slice(&self.collector_max_delay.to_be_bytes());
        body.extend_from_slice(&[0u8; 12]);
        body.push(TLV_TYPE_TERMINATOR);
        body.push(TLV_LEN_TERMINATOR);
        body.resize(SLOW_PROTOCOL_PDU_LEN, 0);

        let mut out = [0u8; SLOW_PROTOCOL_PDU_LEN];
        out.copy_from_slice(&body);
        out
    }

    /// Decode a LACPDU body (post EtherType, pre-padding-stripped).
    ///
    /// Per 802.1AX §6.2.4.2 an unrecognized LACP `version` is still parsed
    /// as long as the actor/partner/collector TLVs are well-formed
    /// (forward compatibility with future version-2 TLVs we don't model).
    pub fn decode(body: &[u8]) -> DecodeResult<Self> {
        if body.len() < 2 {
            return Err(DecodeError::TooShort {
                need: 2,
                got: body.len(),
            });
        }
        if body[0] != LACP_SUBTYPE {
            return Err(DecodeError::UnknownSubtype(body[0]));
        }
        let version = body[1];
        let mut offset = 2;

        let actor = PortInfo::decode(&body[offset..], TLV_TYPE_ACTOR)?;
        offset += PortInfo::WIRE_LEN;

        let partner = PortInfo::decode(&body[offset..], TLV_TYPE_PARTNER)?;
        offset += PortInfo::WIRE_LEN;

        if body.len() < offset + 16 {
            return Err(DecodeError::TooShort {
                need: offset + 16,
                got: body.len(),
            });
        }
        let collector_type = body[offset];
        let collector_len = body[offset + 1];
        if collector_type != TLV_TYPE_COLLECTOR || collector_len != TLV_LEN_COLLECTOR {
            return Err(DecodeError::BadCollectorTlv {
                tlv_type: collector_type,
                len: collector_len,
            });
        }
        let collector_max_delay = u16::from_be_bytes([body[offset + 2], body[offset + 3]]);

        Ok(LacpDu {
            version,
            actor,
            partner,
            collector_max_delay,
        })
    }
}

/// Encode a full Ethernet frame (addresses + EtherType + LACPDU body) ready
/// for the packet adapter.
pub fn encode_frame(src: SystemId, du: &LacpDu) -> Vec<u8> {
    let header = EthernetHeader {
        dst: SystemId(SLOW_PROTOCOLS_DMAC),
        src,
        ethertype: SLOW_PROTOCOLS_ETHERTYPE,
    };
    let mut frame = header.encode().to_vec();
    frame.extend_from_slice(&du.encode());
    frame
}

/// Decode a full Ethernet frame into a [`LacpDu`], validating the header.
pub fn decode_frame(frame: &[u8]) -> DecodeResult<LacpDu> {
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
    LacpDu::decode(&frame[EthernetHeader::WIRE_LEN..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LacpDu {
        let mut actor = PortInfo {
            system_priority: 0x8000,
            system: SystemId([0x00, 0x00, 0x00, 0x00, 0x00, 0x64]),
            key: 100,
            port_priority: 0x8000,
            port: 10,
            state: PortState::empty(),
        };
        actor.state.set_activity(true);
        actor.state.set_aggregation(true);
        LacpDu {
            version: 1,
            actor,
            partner: PortInfo::default(),
            collector_max_delay: 0,
        }
    }

    #[test]
    fn encode_is_128_bytes() {
        assert_eq!(sample().encode().len(), SLOW_PROTOCOL_PDU_LEN);
    }

    #[test]
    fn encode_decode_round_trip() {
        let du = sample();
        let decoded = LacpDu::decode(&du.encode()).unwrap();
        assert_eq!(du, decoded);
    }

    #[test]
    fn frame_round_trip() {
        let du = sample();
        let src = SystemId([0x00, 0x00, 0x00, 0x00, 0x00, 0xC8]);
        let frame = encode_frame(src, &du);
        let decoded = decode_frame(&frame).unwrap();
        assert_eq!(du, decoded);
    }

    #[test]
    fn rejects_wrong_destination() {
        let mut frame = encode_frame(SystemId([0; 6]), &sample());
        frame[0] = 0xFF;
        assert!(matches!(
            decode_frame(&frame),
            Err(DecodeError::WrongDestination { .. })
        ));
    }

    #[test]
    fn unknown_version_still_decodes() {
        let mut du = sample();
        du.version = 7;
        let decoded = LacpDu::decode(&du.encode()).unwrap();
        assert_eq!(decoded.version, 7);
    }

    #[test]
    fn bad_actor_tlv_is_rejected_not_panicking() {
        let mut bytes = sample().encode();
        bytes[2] = 0x09; // corrupt actor TLV type
        assert!(matches!(
            LacpDu::decode(&bytes),
            Err(DecodeError::BadActorTlv { .. })
        ));
    }
}
