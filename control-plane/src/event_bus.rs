//! Per-machine event queues (§4.3): one bounded control queue, one bounded
//! PDU queue that drops the oldest entry on overflow, and a oneshot kill
//! signal. Control events are drained ahead of PDU events whenever both are
//! ready, so a PDU flood cannot starve a state transition (§5 "Ordering
//! guarantees").

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use pdu_codec::Decoded;
use tokio::sync::{mpsc, Notify};

const CONTROL_CAPACITY: usize = 10;
const PDU_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    CurrentWhile,
    Periodic,
    WaitWhile,
    ChurnActor,
    ChurnPartner,
}

#[derive(Debug, Clone)]
pub enum ControlEvent {
    Begin,
    PortEnabled(bool),
    PortMoved,
    TimerExpired(TimerKind),
    SelectionChanged,
}

#[derive(Debug, Clone)]
pub struct PduEvent {
    pub decoded: Decoded,
}

/// A fixed-capacity ring buffer: pushing past capacity evicts the oldest
/// queued entry rather than blocking or rejecting the new one, since a slow
/// machine should never stall packet reception.
struct PduQueue {
    buf: Mutex<VecDeque<PduEvent>>,
    notify: Notify,
}

impl PduQueue {
    fn new() -> Self {
        PduQueue { buf: Mutex::new(VecDeque::with_capacity(PDU_CAPACITY)), notify: Notify::new() }
    }

    /// Returns `true` if an older entry was evicted to make room.
    fn push(&self, event: PduEvent) -> bool {
        let mut buf = self.buf.lock();
        let evicted = if buf.len() >= PDU_CAPACITY {
            buf.pop_front();
            true
        } else {
            false
        };
        buf.push_back(event);
        drop(buf);
        self.notify.notify_one();
        evicted
    }

    async fn recv(&self) -> PduEvent {
        loop {
            // Registered before the emptiness check so a push() racing with
            // this call is never missed (tokio::sync::Notify's documented
            // pattern for a single waiter).
            let notified = self.notify.notified();
            if let Some(event) = self.buf.lock().pop_front() {
                return event;
            }
            notified.await;
        }
    }

    fn try_recv(&self) -> Option<PduEvent> {
        self.buf.lock().pop_front()
    }
}

/// The sending half handed to producers (the RX path, the timer service,
/// Selection). Cheaply cloned; every clone shares the same bounded queues.
#[derive(Clone)]
pub struct EventBusHandle {
    control_tx: mpsc::Sender<ControlEvent>,
    pdu_queue: Arc<PduQueue>,
    kill_tx: mpsc::Sender<()>,
    overflow_count: Arc<std::sync::atomic::AtomicU64>,
}

impl EventBusHandle {
    /// Control events apply backpressure (the producer awaits a free slot);
    /// a control queue that is perpetually full indicates a stuck machine,
    /// not a condition this layer papers over.
    pub async fn send_control(&self, event: ControlEvent) {
        let _ = self.control_tx.send(event).await;
    }

    /// PDU events drop the oldest entry on overflow rather than blocking.
    pub fn send_pdu(&self, event: PduEvent) {
        if self.pdu_queue.push(event) {
            self.overflow_count
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            tracing::debug!("PDU queue full, dropped oldest");
        }
    }

    pub async fn kill(&self) {
        let _ = self.kill_tx.send(()).await;
    }

    pub fn overflow_count(&self) -> u64 {
        self.overflow_count.load(std::sync::atomic::Ordering::Relaxed)
    }
}

pub struct EventBus {
    pub handle: EventBusHandle,
    control_rx: mpsc::Receiver<ControlEvent>,
    pdu_queue: Arc<PduQueue>,
    kill_rx: mpsc::Receiver<()>,
}

pub enum NextEvent {
    Control(ControlEvent),
    Pdu(PduEvent),
    Killed,
}

impl EventBus {
    pub fn new() -> Self {
        let (control_tx, control_rx) = mpsc::channel(CONTROL_CAPACITY);
        let (kill_tx, kill_rx) = mpsc::channel(1);
        let pdu_queue = Arc::new(PduQueue::new());
        EventBus {
            handle: EventBusHandle {
                control_tx,
                pdu_queue: pdu_queue.clone(),
                kill_tx,
                overflow_count: Arc::new(std::sync::atomic::AtomicU64::new(0)),
            },
            control_rx,
            pdu_queue,
            kill_rx,
        }
    }

    /// Suspend until the next event is ready, preferring control events and
    /// kill over queued PDUs via `biased` selection.
    pub async fn recv(&mut self) -> NextEvent {
        tokio::select! {
            biased;
            _ = self.kill_rx.recv() => NextEvent::Killed,
            Some(event) = self.control_rx.recv() => NextEvent::Control(event),
            event = self.pdu_queue.recv() => NextEvent::Pdu(event),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn control_events_are_preferred_over_pending_pdus() {
        let mut bus = EventBus::new();
        bus.handle
            .send_pdu(PduEvent {
                decoded: Decoded::Invalid(pdu_codec::DecodeError::TooShort { need: 1, got: 0 }),
            });
        bus.handle.send_control(ControlEvent::Begin).await;
        match bus.recv().await {
            NextEvent::Control(ControlEvent::Begin) => {}
            _ => panic!("expected the control event first"),
        }
    }

    #[tokio::test]
    async fn kill_is_observed() {
        let mut bus = EventBus::new();
        bus.handle.kill().await;
        assert!(matches!(bus.recv().await, NextEvent::Killed));
    }

    #[tokio::test]
    async fn pdu_overflow_drops_oldest_not_newest() {
        let mut bus = EventBus::new();
        // Fill the queue, tagging each entry by its TooShort `got` field so
        // we can tell which ones survive the overflow.
        for i in 0..PDU_CAPACITY {
            bus.handle.send_pdu(PduEvent {
                decoded: Decoded::Invalid(pdu_codec::DecodeError::TooShort { need: 1, got: i }),
            });
        }
        // One more push should evict index 0, not itself.
        bus.handle.send_pdu(PduEvent {
            decoded: Decoded::Invalid(pdu_codec::DecodeError::TooShort { need: 1, got: PDU_CAPACITY }),
        });
        assert_eq!(bus.handle.overflow_count(), 1);

        let first = bus.pdu_queue.try_recv().expect("queue should still be full");
        match first.decoded {
            Decoded::Invalid(pdu_codec::DecodeError::TooShort { got, .. }) => assert_eq!(got, 1),
            _ => panic!("unexpected variant"),
        }
    }
}
