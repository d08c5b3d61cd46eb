use thiserror::Error;

/// Errors local to a single machine's observation of the world. None of
/// these ever climb across a queue boundary (§7 propagation policy): a
/// machine that hits one of these counts it and keeps running.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MachineError {
    #[error("malformed PDU: {0}")]
    MalformedPdu(String),

    #[error("event {event} is not valid in state {state}")]
    UnknownEventInState { state: String, event: String },

    #[error("ASIC adapter call timed out after {0:?}")]
    AdapterTimeout(std::time::Duration),

    #[error("configuration conflict: {0}")]
    ConfigConflict(String),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no system configured")]
    NoSystem,

    #[error("aggregator {0} not found")]
    AggregatorNotFound(u16),

    #[error("port {0} not found")]
    PortNotFound(u16),

    #[error("duplicate aggregator id {0}")]
    DuplicateAggregator(u16),

    #[error("duplicate port id {0}")]
    DuplicatePort(u16),
}
