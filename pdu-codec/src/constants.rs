//! Wire-level constants for the slow-protocols family (LACP, Marker) and for
//! STP/RSTP BPDUs. Values are pulled directly from IEEE 802.1AX and 802.1D.

/// Destination MAC for LACP and Marker frames (slow protocols multicast).
pub const SLOW_PROTOCOLS_DMAC: [u8; 6] = [0x01, 0x80, 0xC2, 0x00, 0x00, 0x02];

/// EtherType carrying LACP and Marker PDUs.
pub const SLOW_PROTOCOLS_ETHERTYPE: u16 = 0x8809;

/// LACPDU subtype, carried in the first octet after the EtherType.
pub const LACP_SUBTYPE: u8 = 1;

/// Marker PDU subtype.
pub const MARKER_SUBTYPE: u8 = 2;

/// LACPDU and Marker PDU are always padded to this many octets on the wire.
pub const SLOW_PROTOCOL_PDU_LEN: usize = 128;

/// Actor information TLV type, length 0x14 (20 octets of payload).
pub const TLV_TYPE_ACTOR: u8 = 0x01;
/// Partner information TLV type, length 0x14.
pub const TLV_TYPE_PARTNER: u8 = 0x02;
/// Collector information TLV type, length 0x10.
pub const TLV_TYPE_COLLECTOR: u8 = 0x03;
/// Terminator TLV, length 0x00.
pub const TLV_TYPE_TERMINATOR: u8 = 0x00;

pub const TLV_LEN_ACTOR: u8 = 0x14;
pub const TLV_LEN_PARTNER: u8 = 0x14;
pub const TLV_LEN_COLLECTOR: u8 = 0x10;
pub const TLV_LEN_TERMINATOR: u8 = 0x00;

/// Marker Information / Marker Response TLV type and length (802.3 Annex 57B).
pub const MARKER_TLV_INFO: u8 = 1;
pub const MARKER_TLV_RESPONSE: u8 = 2;
pub const MARKER_TLV_LEN: u8 = 0x10;

/// Destination MAC for STP/RSTP BPDUs (bridge-group address).
pub const BPDU_DMAC: [u8; 6] = [0x01, 0x80, 0xC2, 0x00, 0x00, 0x00];

/// LLC DSAP/SSAP/control octets preceding a BPDU.
pub const LLC_DSAP: u8 = 0x42;
pub const LLC_SSAP: u8 = 0x42;
pub const LLC_CONTROL: u8 = 0x03;

/// BPDU protocol identifier, always zero.
pub const BPDU_PROTOCOL_ID: u16 = 0x0000;

/// BPDU protocol version: classic STP vs. RSTP.
pub const BPDU_VERSION_STP: u8 = 0;
pub const BPDU_VERSION_RSTP: u8 = 2;

/// BPDU type octet values.
pub const BPDU_TYPE_CONFIG: u8 = 0x00;
pub const BPDU_TYPE_TCN: u8 = 0x80;
pub const BPDU_TYPE_RSTP: u8 = 0x02;

/// Body length in octets for each BPDU variant (excludes LLC header).
pub const BPDU_LEN_CONFIG: usize = 35;
pub const BPDU_LEN_TCN: usize = 4;
pub const BPDU_LEN_RSTP: usize = 36;

/// BPDU ages (message age, max age, hello time, forward delay) are encoded
/// in units of 1/256 second.
pub const BPDU_TIME_UNIT_DENOM: u32 = 256;
