//! Per-port LACP and RSTP state machines, Selection, and the ASIC adapter
//! façade: the control-plane core described in the top-level design (§2,
//! "THE CORE").
//!
//! Every machine is modeled as a pure `(state, event, snapshot) ->
//! (state, side_effects)` function (§9 Design notes); `system.rs` is the
//! only place that owns an actor loop and mutates the shared port record.

pub mod aggregator;
pub mod asic;
pub mod error;
pub mod event_bus;
pub mod ids;
pub mod lacp;
pub mod management;
pub mod port;
pub mod registry;
pub mod rstp;
pub mod rstp_system;
pub mod system;

pub use aggregator::Aggregator;
pub use asic::{AsicAdapter, InProcessAsic};
pub use ids::{AggregatorId, PortId};
pub use port::LacpPort;
pub use registry::{Registry, SystemIdentity};
pub use rstp_system::{RstpBridgeActor, RstpBusHandle};
pub use system::LacpPortActor;
