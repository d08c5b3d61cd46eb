//! Typed configuration for a lacpd System: loading, structural
//! validation, and the CRUD events dispatched to the control-plane
//! registry (§6 Configuration interface, consumed).

pub mod error;
pub mod loader;
pub mod types;

pub use error::{ConfigError, ConfigResult};
pub use types::{
    AggregatorConfig, ConfigEvent, HashMode, LacpdConfig, PortConfig, PortMode, PortTimeout,
    RstpBridgeConfig, RstpPortConfig, SystemConfig,
};
