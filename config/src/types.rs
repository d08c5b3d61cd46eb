use serde::{Deserialize, Serialize};

/// A System's configured identity: MAC address and LACP priority.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SystemConfig {
    pub mac: String,
    pub priority: u16,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Hash-distribution mode an aggregator spreads frames across member
/// ports with. Conversation-aware distribution (LACPv2 §6.6) is a
/// documented non-goal; these are the classic link-selection hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HashMode {
    SrcMac,
    DstMac,
    SrcDstMac,
    SrcDstIp,
}

impl Default for HashMode {
    fn default() -> Self {
        HashMode::SrcDstMac
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AggregatorConfig {
    pub id: u16,
    pub name: String,
    pub key: u16,
    #[serde(default = "default_min_links")]
    pub min_links: u16,
    #[serde(default)]
    pub hash_mode: HashMode,
    #[serde(default)]
    pub members: Vec<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortMode {
    Active,
    Passive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortTimeout {
    Short,
    Long,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PortConfig {
    pub id: u16,
    pub key: u16,
    pub mode: PortMode,
    #[serde(default = "default_port_timeout")]
    pub timeout: PortTimeout,
    #[serde(default = "default_priority")]
    pub priority: u16,
    pub interface: String,
    pub mac: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub rstp: Option<RstpPortConfig>,
}

/// Per-bridge RSTP identity: priority combines with the System MAC to form
/// the bridge id (§4.11 Port (RSTP)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RstpBridgeConfig {
    #[serde(default = "default_rstp_bridge_priority")]
    pub priority: u16,
}

/// Per-port RSTP participation, independent of whether the same port also
/// carries LACP -- a port can run one, the other, both, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RstpPortConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_rstp_port_priority")]
    pub priority: u8,
    /// `None` selects path cost automatically from link speed; not
    /// currently derived from the ASIC adapter, so it falls back to the
    /// 1Gbit/s default (§3 Port (RSTP) "path-cost (auto or fixed)").
    #[serde(default)]
    pub path_cost: Option<u32>,
    #[serde(default)]
    pub admin_edge: bool,
}

fn default_rstp_bridge_priority() -> u16 {
    0x8000
}

fn default_rstp_port_priority() -> u8 {
    0x80
}

fn default_true() -> bool {
    true
}

fn default_min_links() -> u16 {
    1
}

fn default_priority() -> u16 {
    0x8000
}

fn default_port_timeout() -> PortTimeout {
    PortTimeout::Long
}

/// Top-level configuration document: one System plus its Aggregators and
/// Ports, as loaded from YAML/TOML at startup (§6 Configuration interface,
/// consumed).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct LacpdConfig {
    pub system: Option<SystemConfig>,
    #[serde(default)]
    pub rstp: Option<RstpBridgeConfig>,
    #[serde(default)]
    pub aggregators: Vec<AggregatorConfig>,
    #[serde(default)]
    pub ports: Vec<PortConfig>,
}

/// Typed CRUD events dispatched to the registry, per §6's "Updates
/// dispatched as typed events to the affected actors".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEvent {
    AddSystem(SystemConfig),
    RemoveSystem,
    AddAggregator(AggregatorConfig),
    UpdateAggregator(AggregatorConfig),
    RemoveAggregator { id: u16 },
    AddPort(PortConfig),
    UpdatePort(PortConfig),
    RemovePort { id: u16 },
}
