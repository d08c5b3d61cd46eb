//! STP/RSTP BPDU encode/decode (IEEE 802.1D-2004 §9, §17.8).

use crate::constants::*;
use crate::error::{DecodeError, DecodeResult};
use crate::frame::{Dot3LlcHeader, SystemId};

/// A bridge or port priority vector's bridge identifier: 16-bit priority
/// (already includes any extended-system-id bits the caller wants to pack
/// in) plus the bridge's MAC address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct BridgeId {
    pub priority: u16,
    pub address: SystemId,
}

impl BridgeId {
    const WIRE_LEN: usize = 8;

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.priority.to_be_bytes());
        out.extend_from_slice(&self.address.0);
    }

    fn decode(buf: &[u8]) -> DecodeResult<Self> {
        if buf.len() < Self::WIRE_LEN {
            return Err(DecodeError::TooShort {
                need: Self::WIRE_LEN,
                got: buf.len(),
            });
        }
        let mut mac = [0u8; 6];
        mac.copy_from_slice(&buf[2..8]);
        Ok(BridgeId {
            priority: u16::from_be_bytes([buf[0], buf[1]]),
            address: SystemId(mac),
        })
    }
}

/// A timer value as carried on the wire, in units of 1/256 second
/// (802.1D §9.2.7). All of this system's timers operate on whole seconds,
/// so [`Self::from_secs`]/[`Self::as_secs_round`] are the only conversions
/// needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct WireTime(pub u16);

impl WireTime {
    pub fn from_secs(secs: u16) -> Self {
        WireTime(secs.saturating_mul(BPDU_TIME_UNIT_DENOM as u16))
    }

    pub fn as_secs_round(&self) -> u16 {
        (self.0 as u32 / BPDU_TIME_UNIT_DENOM) as u16
    }
}

/// RSTP port role as packed into the two role bits of the flags octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireRole {
    Unknown,
    AlternateOrBackup,
    Root,
    Designated,
}

impl WireRole {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => WireRole::Unknown,
            0b01 => WireRole::AlternateOrBackup,
            0b10 => WireRole::Root,
            _ => WireRole::Designated,
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            WireRole::Unknown => 0b00,
            WireRole::AlternateOrBackup => 0b01,
            WireRole::Root => 0b10,
            WireRole::Designated => 0b11,
        }
    }
}

/// RSTP flags octet (802.1D-2004 Table 9-2). For classic STP config BPDUs
/// only `topology_change` and `topology_change_ack` are meaningful; the
/// rest are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BpduFlags {
    pub topology_change: bool,
    pub proposal: bool,
    pub role: Option<WireRole>,
    pub learning: bool,
    pub forwarding: bool,
    pub agreement: bool,
    pub topology_change_ack: bool,
}

impl BpduFlags {
    fn encode(&self) -> u8 {
        let mut b = 0u8;
        if self.topology_change {
            b |= 1 << 0;
        }
        if self.proposal {
            b |= 1 << 1;
        }
        b |= self.role.unwrap_or(WireRole::Unknown).to_bits() << 2;
        if self.learning {
            b |= 1 << 4;
        }
        if self.forwarding {
            b |= 1 << 5;
        }
        if self.agreement {
            b |= 1 << 6;
        }
        if self.topology_change_ack {
            b |= 1 << 7;
        }
        b
    }

    fn decode(b: u8, rstp: bool) -> Self {
        BpduFlags {
            topology_change: b & (1 << 0) != 0,
            proposal: b & (1 << 1) != 0,
            role: rstp.then(|| WireRole::from_bits(b >> 2)),
            learning: b & (1 << 4) != 0,
            forwarding: b & (1 << 5) != 0,
            agreement: b & (1 << 6) != 0,
            topology_change_ack: b & (1 << 7) != 0,
        }
    }
}

/// The common config/RSTP body shared by both BPDU types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigBody {
    pub flags: BpduFlags,
    pub root_id: BridgeId,
    pub root_path_cost: u32,
    pub bridge_id: BridgeId,
    pub port_id: u16,
    pub message_age: WireTime,
    pub max_age: WireTime,
    pub hello_time: WireTime,
    pub forward_delay: WireTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bpdu {
    Config(ConfigBody),
    Tcn,
    Rstp(ConfigBody),
}

impl Bpdu {
    pub fn version(&self) -> u8 {
        match self {
            Bpdu::Config(_) | Bpdu::Tcn => BPDU_VERSION_STP,
            Bpdu::Rstp(_) => BPDU_VERSION_RSTP,
        }
    }

    fn encode_config_body(body: &ConfigBody, out: &mut Vec<u8>, rstp: bool) {
        out.push(body.flags.encode());
        body.root_id.encode(out);
        out.extend_from_slice(&body.root_path_cost.to_be_bytes());
        body.bridge_id.encode(out);
        out.extend_from_slice(&body.port_id.to_be_bytes());
        out.extend_from_slice(&body.message_age.0.to_be_bytes());
        out.extend_from_slice(&body.max_age.0.to_be_bytes());
        out.extend_from_slice(&body.hello_time.0.to_be_bytes());
        out.extend_from_slice(&body.forward_delay.0.to_be_bytes());
        if rstp {
            out.push(0); // version 1 length, always zero (no version-1 TLVs)
        }
    }

    /// Encode the BPDU body (protocol id through the end; excludes the
    /// preceding 802.3 length field and LLC header).
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BPDU_LEN_RSTP);
        out.extend_from_slice(&BPDU_PROTOCOL_ID.to_be_bytes());
        match self {
            Bpdu::Tcn => {
                out.push(BPDU_VERSION_STP);
                out.push(BPDU_TYPE_TCN);
            }
            Bpdu::Config(body) => {
                out.push(BPDU_VERSION_STP);
                out.push(BPDU_TYPE_CONFIG);
                Self::encode_config_body(body, &mut out, false);
            }
            Bpdu::Rstp(body) => {
                out.push(BPDU_VERSION_RSTP);
                out.push(BPDU_TYPE_RSTP);
                Self::encode_config_body(body, &mut out, true);
            }
        }
        out
    }

    fn decode_config_body(buf: &[u8], rstp: bool) -> DecodeResult<ConfigBody> {
        let flags = BpduFlags::decode(buf[0], rstp);
        let root_id = BridgeId::decode(&buf[1..9])?;
        let root_path_cost = u32::from_be_bytes([buf[9], buf[10], buf[11], buf[12]]);
        let bridge_id = BridgeId::decode(&buf[13..21])?;
        let port_id = u16::from_be_bytes([buf[21], buf[22]]);
        let message_age = WireTime(u16::from_be_bytes([buf[23], buf[24]]));
        let max_age = WireTime(u16::from_be_bytes([buf[25], buf[26]]));
        let hello_time = WireTime(u16::from_be_bytes([buf[27], buf[28]]));
        let forward_delay = WireTime(u16::from_be_bytes([buf[29], buf[30]]));
        if message_age.0 >= max_age.0 {
            return Err(DecodeError::MessageAgeExceedsMaxAge {
                msg_age: message_age.0,
                max_age: max_age.0,
            });
        }
        Ok(ConfigBody {
            flags,
            root_id,
            root_path_cost,
            bridge_id,
            port_id,
            message_age,
            max_age,
            hello_time,
            forward_delay,
        })
    }

    /// Decode the BPDU body (protocol id through the end).
    pub fn decode(buf: &[u8]) -> DecodeResult<Self> {
        if buf.len() < 4 {
            return Err(DecodeError::TooShort {
                need: 4,
                got: buf.len(),
            });
        }
        let version = buf[2];
        let bpdu_type = buf[3];
        match bpdu_type {
            BPDU_TYPE_TCN => {
                if buf.len() != BPDU_LEN_TCN {
                    return Err(DecodeError::BadBpduLength {
                        bpdu_type,
                        want: BPDU_LEN_TCN,
                        got: buf.len(),
                    });
                }
                Ok(Bpdu::Tcn)
            }
            BPDU_TYPE_CONFIG => {
                if buf.len() != BPDU_LEN_CONFIG {
                    return Err(DecodeError::BadBpduLength {
                        bpdu_type,
                        want: BPDU_LEN_CONFIG,
                        got: buf.len(),
                    });
                }
                Ok(Bpdu::Config(Self::decode_config_body(&buf[4..], false)?))
            }
            BPDU_TYPE_RSTP => {
                if buf.len() != BPDU_LEN_RSTP || version < BPDU_VERSION_RSTP {
                    return Err(DecodeError::BadBpduLength {
                        bpdu_type,
                        want: BPDU_LEN_RSTP,
                        got: buf.len(),
                    });
                }
                Ok(Bpdu::Rstp(Self::decode_config_body(&buf[4..], true)?))
            }
            other => Err(DecodeError::UnknownSubtype(other)),
        }
    }
}

pub fn encode_frame(src: SystemId, bpdu: &Bpdu) -> Vec<u8> {
    let body = bpdu.encode();
    let llc = Dot3LlcHeader {
        dst: SystemId(BPDU_DMAC),
        src,
        length: (3 + body.len()) as u16,
        dsap: LLC_DSAP,
        ssap: LLC_SSAP,
        control: LLC_CONTROL,
    };
    let mut frame = llc.encode().to_vec();
    frame.extend_from_slice(&body);
    frame
}

pub fn decode_frame(frame: &[u8]) -> DecodeResult<Bpdu> {
    let llc = Dot3LlcHeader::decode(frame)?;
    if llc.dst.0 != BPDU_DMAC {
        return Err(DecodeError::WrongDestination {
            got: llc.dst.0,
            want: BPDU_DMAC,
        });
    }
    Bpdu::decode(&frame[Dot3LlcHeader::WIRE_LEN..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_body() -> ConfigBody {
        ConfigBody {
            flags: BpduFlags::default(),
            root_id: BridgeId {
                priority: 0x8000,
                address: SystemId([0, 0, 0, 0, 0, 1]),
            },
            root_path_cost: 0,
            bridge_id: BridgeId {
                priority: 0x8000,
                address: SystemId([0, 0, 0, 0, 0, 1]),
            },
            port_id: 0x8001,
            message_age: WireTime::from_secs(0),
            max_age: WireTime::from_secs(20),
            hello_time: WireTime::from_secs(2),
            forward_delay: WireTime::from_secs(15),
        }
    }

    #[test]
    fn config_round_trips() {
        let bpdu = Bpdu::Config(sample_body());
        assert_eq!(bpdu.encode().len(), BPDU_LEN_CONFIG);
        let decoded = Bpdu::decode(&bpdu.encode()).unwrap();
        assert_eq!(bpdu, decoded);
    }

    #[test]
    fn rstp_round_trips() {
        let mut body = sample_body();
        body.flags.role = Some(WireRole::Designated);
        body.flags.forwarding = true;
        let bpdu = Bpdu::Rstp(body);
        assert_eq!(bpdu.encode().len(), BPDU_LEN_RSTP);
        let decoded = Bpdu::decode(&bpdu.encode()).unwrap();
        assert_eq!(bpdu, decoded);
    }

    #[test]
    fn tcn_round_trips() {
        let bpdu = Bpdu::Tcn;
        assert_eq!(bpdu.encode().len(), BPDU_LEN_TCN);
        assert_eq!(Bpdu::decode(&bpdu.encode()).unwrap(), bpdu);
    }

    #[test]
    fn msg_age_equal_to_max_age_is_invalid() {
        let mut body = sample_body();
        body.message_age = body.max_age;
        let bytes = Bpdu::Config(body).encode();
        assert!(matches!(
            Bpdu::decode(&bytes),
            Err(DecodeError::MessageAgeExceedsMaxAge { .. })
        ));
    }

    #[test]
    fn msg_age_one_less_than_max_age_is_valid() {
        let mut body = sample_body();
        body.message_age = WireTime(body.max_age.0 - 1);
        let bytes = Bpdu::Config(body).encode();
        assert!(Bpdu::decode(&bytes).is_ok());
    }

    #[test]
    fn wrong_length_for_type_is_rejected() {
        let mut bytes = Bpdu::Config(sample_body()).encode();
        bytes.push(0); // now 36 bytes, but type says config (35)
        assert!(matches!(
            Bpdu::decode(&bytes),
            Err(DecodeError::BadBpduLength { .. })
        ));
    }
}
