//! LACP Churn Detection machine (§4.8, 802.1AX §6.4.17). One instance
//! watches `actor_oper.state.sync`, a mirror instance watches the
//! partner's; `system.rs` runs two copies per port.

pub const CHURN_TIMEOUT_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdState {
    NoChurn,
    ChurnMonitor,
    Churn,
}

#[derive(Debug, Clone, Copy)]
pub enum CdEvent {
    Begin,
    SyncTransitioned,
    SyncTrue,
    ChurnTimerExpired,
}

#[derive(Debug, Clone, Copy)]
pub enum CdEffect {
    LoadChurnTimer(u32),
    IncrementChurnCounter,
}

pub fn transition(state: CdState, event: CdEvent) -> (CdState, Vec<CdEffect>) {
    use CdEvent::*;
    use CdState::*;

    match (state, event) {
        (_, Begin) => (NoChurn, vec![]),

        (NoChurn, SyncTransitioned) => (ChurnMonitor, vec![CdEffect::LoadChurnTimer(CHURN_TIMEOUT_SECS)]),

        (ChurnMonitor, SyncTrue) => (NoChurn, vec![]),
        (ChurnMonitor, ChurnTimerExpired) => (Churn, vec![CdEffect::IncrementChurnCounter]),

        (Churn, SyncTrue) => (NoChurn, vec![]),
        (Churn, SyncTransitioned) => (ChurnMonitor, vec![CdEffect::LoadChurnTimer(CHURN_TIMEOUT_SECS)]),

        (s, _) => (s, vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn churn_fires_once_then_waits_for_resume_and_re_stop() {
        let (s, effects) = transition(CdState::NoChurn, CdEvent::SyncTransitioned);
        assert_eq!(s, CdState::ChurnMonitor);
        assert!(effects.iter().any(|e| matches!(e, CdEffect::LoadChurnTimer(60))));

        let (s, effects) = transition(s, CdEvent::ChurnTimerExpired);
        assert_eq!(s, CdState::Churn);
        assert!(effects.iter().any(|e| matches!(e, CdEffect::IncrementChurnCounter)));

        // Does not fire again while still in Churn without sync resuming.
        let (s, effects) = transition(s, CdEvent::ChurnTimerExpired);
        assert_eq!(s, CdState::Churn);
        assert!(effects.is_empty());

        let (s, _) = transition(s, CdEvent::SyncTrue);
        assert_eq!(s, CdState::NoChurn);
    }
}
