use thiserror::Error;

/// Reasons a frame failed to decode as a LACPDU, Marker PDU, or BPDU.
///
/// Decoding never panics; every malformed input maps to one of these
/// variants so the caller can count it and drop the frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("frame too short: need at least {need} bytes, got {got}")]
    TooShort { need: usize, got: usize },

    #[error("unexpected destination MAC {got:02x?}, expected {want:02x?}")]
    WrongDestination { got: [u8; 6], want: [u8; 6] },

    #[error("unexpected ethertype {got:#06x}, expected {want:#06x}")]
    WrongEtherType { got: u16, want: u16 },

    #[error("unknown slow-protocol subtype {0:#04x}")]
    UnknownSubtype(u8),

    #[error("actor TLV malformed: type {tlv_type:#04x} len {len:#04x}")]
    BadActorTlv { tlv_type: u8, len: u8 },

    #[error("partner TLV malformed: type {tlv_type:#04x} len {len:#04x}")]
    BadPartnerTlv { tlv_type: u8, len: u8 },

    #[error("collector TLV malformed: type {tlv_type:#04x} len {len:#04x}")]
    BadCollectorTlv { tlv_type: u8, len: u8 },

    #[error("marker TLV malformed: type {tlv_type:#04x} len {len:#04x}")]
    BadMarkerTlv { tlv_type: u8, len: u8 },

    #[error("bad LLC header: dsap {dsap:#04x} ssap {ssap:#04x} control {control:#04x}")]
    BadLlcHeader { dsap: u8, ssap: u8, control: u8 },

    #[error("bpdu length {got} does not match type {bpdu_type:#04x} (want {want})")]
    BadBpduLength {
        bpdu_type: u8,
        want: usize,
        got: usize,
    },

    #[error("bpdu message age {msg_age} not less than max age {max_age}")]
    MessageAgeExceedsMaxAge { msg_age: u16, max_age: u16 },
}

pub type DecodeResult<T> = Result<T, DecodeError>;
