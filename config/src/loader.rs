use std::collections::HashSet;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::types::LacpdConfig;

impl LacpdConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: LacpdConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: LacpdConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Structural validation only: uniqueness of ids and that referenced
    /// member ports exist. A port's key mismatching its aggregator's key
    /// is deliberately NOT rejected here — per the error-handling policy
    /// that's a "configuration conflict" the port still gets created for,
    /// just left Unselected (see control-plane's Selection procedure).
    pub fn validate(&self) -> ConfigResult<()> {
        let mut agg_ids = HashSet::new();
        for agg in &self.aggregators {
            if !agg_ids.insert(agg.id) {
                return Err(ConfigError::Validation(format!(
                    "duplicate aggregator id {}",
                    agg.id
                )));
            }
            if agg.min_links == 0 {
                return Err(ConfigError::Validation(format!(
                    "aggregator {} min_links must be >= 1",
                    agg.id
                )));
            }
        }

        let mut port_ids = HashSet::new();
        for port in &self.ports {
            if !port_ids.insert(port.id) {
                return Err(ConfigError::Validation(format!(
                    "duplicate port id {}",
                    port.id
                )));
            }
        }

        for agg in &self.aggregators {
            for member in &agg.members {
                if !port_ids.contains(member) {
                    return Err(ConfigError::Validation(format!(
                        "aggregator {} references unknown port {}",
                        agg.id, member
                    )));
                }
            }
        }

        if self.rstp.is_none() && self.ports.iter().any(|p| p.rstp.is_some()) {
            return Err(ConfigError::Validation(
                "ports declare an rstp block but no bridge-level rstp priority is configured".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AggregatorConfig, PortMode, PortTimeout};
    use std::io::Write;

    #[test]
    fn rejects_duplicate_aggregator_ids() {
        let config = LacpdConfig {
            aggregators: vec![
                AggregatorConfig {
                    id: 100,
                    name: "a".into(),
                    key: 100,
                    min_links: 1,
                    hash_mode: Default::default(),
                    members: vec![],
                },
                AggregatorConfig {
                    id: 100,
                    name: "b".into(),
                    key: 100,
                    min_links: 1,
                    hash_mode: Default::default(),
                    members: vec![],
                },
            ],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_dangling_member_reference() {
        let config = LacpdConfig {
            aggregators: vec![AggregatorConfig {
                id: 100,
                name: "a".into(),
                key: 100,
                min_links: 1,
                hash_mode: Default::default(),
                members: vec![10],
            }],
            ports: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_port_rstp_without_bridge_rstp() {
        use crate::types::RstpPortConfig;

        let config = LacpdConfig {
            ports: vec![crate::types::PortConfig {
                id: 10,
                key: 100,
                mode: PortMode::Active,
                timeout: PortTimeout::Long,
                priority: 0x8000,
                interface: "eth0".into(),
                mac: "00:00:00:00:00:0a".into(),
                enabled: true,
                rstp: Some(RstpPortConfig {
                    enabled: true,
                    priority: 0x80,
                    path_cost: None,
                    admin_edge: false,
                }),
            }],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_well_formed_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
system:
  mac: "00:00:00:00:00:64"
  priority: 32768
aggregators:
  - id: 100
    name: agg100
    key: 100
    members: [10]
ports:
  - id: 10
    key: 100
    mode: active
    interface: eth0
    mac: "00:00:00:00:00:0a"
"#
        )
        .unwrap();
        let loaded = LacpdConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(loaded.aggregators.len(), 1);
        assert_eq!(loaded.ports.len(), 1);
        assert_eq!(loaded.ports[0].id, 10);
        assert_eq!(loaded.ports[0].mode, PortMode::Active);
        assert_eq!(loaded.ports[0].interface, "eth0");
    }
}
