//! The ASIC adapter façade (§4.12): the only boundary the core crosses to
//! reach the forwarding plane. Strictly synchronous from the core's point
//! of view — every call must return within a bounded time, enforced by the
//! caller wrapping it in `tokio::time::timeout`.

use async_trait::async_trait;

use crate::ids::{AggregatorId, PortId};

#[async_trait]
pub trait AsicAdapter: Send + Sync {
    async fn set_port_enabled(&self, port: PortId, enabled: bool);
    async fn set_distributing(&self, agg: AggregatorId, port: PortId, enabled: bool);
    async fn set_forwarding(&self, port: PortId, enabled: bool);
    async fn set_learning(&self, port: PortId, enabled: bool);
    async fn flush_macs(&self, port: PortId);
    async fn send_frame(&self, port: PortId, frame: Vec<u8>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsicCall {
    SetPortEnabled(PortId, bool),
    SetDistributing(AggregatorId, PortId, bool),
    SetForwarding(PortId, bool),
    SetLearning(PortId, bool),
    FlushMacs(PortId),
    SendFrame(PortId),
}

/// An in-process adapter for tests (§9 "Packet I/O": inject send/receive so
/// tests can use an in-process bridge). Records every call it was asked to
/// make instead of touching real hardware.
#[derive(Default)]
pub struct InProcessAsic {
    calls: parking_lot::Mutex<Vec<AsicCall>>,
    sent_frames: parking_lot::Mutex<Vec<(PortId, Vec<u8>)>>,
}

impl InProcessAsic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<AsicCall> {
        self.calls.lock().clone()
    }

    pub fn take_sent_frames(&self) -> Vec<(PortId, Vec<u8>)> {
        std::mem::take(&mut self.sent_frames.lock())
    }
}

#[async_trait]
impl AsicAdapter for InProcessAsic {
    async fn set_port_enabled(&self, port: PortId, enabled: bool) {
        self.calls.lock().push(AsicCall::SetPortEnabled(port, enabled));
    }

    async fn set_distributing(&self, agg: AggregatorId, port: PortId, enabled: bool) {
        self.calls
            .lock()
            .push(AsicCall::SetDistributing(agg, port, enabled));
    }

    async fn set_forwarding(&self, port: PortId, enabled: bool) {
        self.calls.lock().push(AsicCall::SetForwarding(port, enabled));
    }

    async fn set_learning(&self, port: PortId, enabled: bool) {
        self.calls.lock().push(AsicCall::SetLearning(port, enabled));
    }

    async fn flush_macs(&self, port: PortId) {
        self.calls.lock().push(AsicCall::FlushMacs(port));
    }

    async fn send_frame(&self, port: PortId, frame: Vec<u8>) {
        self.calls.lock().push(AsicCall::SendFrame(port));
        self.sent_frames.lock().push((port, frame));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_in_order() {
        let asic = InProcessAsic::new();
        asic.set_port_enabled(PortId(10), true).await;
        asic.set_distributing(AggregatorId(100), PortId(10), true).await;
        assert_eq!(
            asic.calls(),
            vec![
                AsicCall::SetPortEnabled(PortId(10), true),
                AsicCall::SetDistributing(AggregatorId(100), PortId(10), true),
            ]
        );
    }
}
