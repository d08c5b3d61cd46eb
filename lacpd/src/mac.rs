//! Parses the colon-separated MAC strings config files carry into the
//! six-octet `SystemId` the control plane operates on.

use anyhow::{anyhow, Result};
use pdu_codec::frame::SystemId;

pub fn parse_mac(s: &str) -> Result<SystemId> {
    let mut octets = [0u8; 6];
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 6 {
        return Err(anyhow!("invalid MAC address {s:?}: expected 6 colon-separated octets"));
    }
    for (i, part) in parts.iter().enumerate() {
        octets[i] = u8::from_str_radix(part, 16).map_err(|_| anyhow!("invalid MAC address {s:?}: bad octet {part:?}"))?;
    }
    Ok(SystemId(octets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_mac() {
        let mac = parse_mac("00:11:22:33:44:55").unwrap();
        assert_eq!(mac.0, [0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    }

    #[test]
    fn rejects_wrong_octet_count() {
        assert!(parse_mac("00:11:22").is_err());
    }

    #[test]
    fn rejects_non_hex_octet() {
        assert!(parse_mac("zz:11:22:33:44:55").is_err());
    }
}
