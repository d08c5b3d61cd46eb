//! Shared Ethernet/LLC framing helpers used by both the slow-protocols
//! codec (LACP, Marker) and the BPDU codec.

use crate::error::{DecodeError, DecodeResult};

/// A six-octet MAC address, doubling as the 802.1AX "System" identifier
/// when paired with a priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SystemId(pub [u8; 6]);

impl SystemId {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Ethernet II header: dst MAC, src MAC, EtherType. Used for LACP/Marker
/// frames, which carry an EtherType rather than an 802.3 length field.
#[derive(Debug, Clone, Copy)]
pub struct EthernetHeader {
    pub dst: SystemId,
    pub src: SystemId,
    pub ethertype: u16,
}

impl EthernetHeader {
    pub const WIRE_LEN: usize = 14;

    pub fn encode(&self) -> [u8; Self::WIRE_LEN] {
        let mut out = [0u8; Self::WIRE_LEN];
        out[0..6].copy_from_slice(&self.dst.0);
        out[6..12].copy_from_slice(&self.src.0);
        out[12..14].copy_from_slice(&self.ethertype.to_be_bytes());
        out
    }

    pub fn decode(frame: &[u8]) -> DecodeResult<Self> {
        if frame.len() < Self::WIRE_LEN {
            return Err(DecodeError::TooShort {
                need: Self::WIRE_LEN,
                got: frame.len(),
            });
        }
        let mut dst = [0u8; 6];
        let mut src = [0u8; 6];
        dst.copy_from_slice(&frame[0..6]);
        src.copy_from_slice(&frame[6..12]);
        Ok(EthernetHeader {
            dst: SystemId(dst),
            src: SystemId(src),
            ethertype: u16::from_be_bytes([frame[12], frame[13]]),
        })
    }
}

/// 802.3 header used by BPDU frames: dst MAC, src MAC, 802.3 length field,
/// then the 3-octet LLC header (DSAP/SSAP/control).
#[derive(Debug, Clone, Copy)]
pub struct Dot3LlcHeader {
    pub dst: SystemId,
    pub src: SystemId,
    pub length: u16,
    pub dsap: u8,
    pub ssap: u8,
    pub control: u8,
}

impl Dot3LlcHeader {
    pub const WIRE_LEN: usize = 17;

    pub fn encode(&self) -> [u8; Self::WIRE_LEN] {
        let mut out = [0u8; Self::WIRE_LEN];
        out[0..6].copy_from_slice(&self.dst.0);
        out[6..12].copy_from_slice(&self.src.0);
        out[12..14].copy_from_slice(&self.length.to_be_bytes());
        out[14] = self.dsap;
        out[15] = self.ssap;
        out[16] = self.control;
        out
    }

    pub fn decode(frame: &[u8]) -> DecodeResult<Self> {
        if frame.len() < Self::WIRE_LEN {
            return Err(DecodeError::TooShort {
                need: Self::WIRE_LEN,
                got: frame.len(),
            });
        }
        let mut dst = [0u8; 6];
        let mut src = [0u8; 6];
        dst.copy_from_slice(&frame[0..6]);
        src.copy_from_slice(&frame[6..12]);
        let header = Dot3LlcHeader {
            dst: SystemId(dst),
            src: SystemId(src),
            length: u16::from_be_bytes([frame[12], frame[13]]),
            dsap: frame[14],
            ssap: frame[15],
            control: frame[16],
        };
        if header.dsap != crate::constants::LLC_DSAP
            || header.ssap != crate::constants::LLC_SSAP
            || header.control != crate::constants::LLC_CONTROL
        {
            return Err(DecodeError::BadLlcHeader {
                dsap: header.dsap,
                ssap: header.ssap,
                control: header.control,
            });
        }
        Ok(header)
    }
}
