//! Port Protocol Migration machine (§4.11 PPM, 802.1D-2004 §17.24): latches
//! the per-port send-STP/send-RSTP mode and runs the migration delay when a
//! mismatched BPDU version is seen.

use crate::rstp::port::MIGRATE_TIME_SECS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpmState {
    CheckingRstp,
    SelectingStp,
    Sensing,
}

#[derive(Debug, Clone, Copy)]
pub enum PpmEvent {
    Begin,
    MdelayWhileExpired,
    /// A valid RSTP BPDU arrived. `send_rstp` carries this port's current
    /// mode so the transition can tell `RcvdRSTP` apart from the
    /// `NotSendRSTPAndRcvdRSTP` notification guard (§4.11 PPM).
    RcvdRstp { send_rstp: bool },
    RcvdStpAndSendRstp,
    RcvdXst,
}

/// The PPMM notifications §4.11 names, raised as observable side effects
/// so `system.rs` can assert on them in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpmNotification {
    RstpVersionAndNotSendRstpAndRcvdRstp,
    StpVersionAndSendRstpAndRcvdStp,
}

#[derive(Debug, Clone, Copy)]
pub enum PpmEffect {
    SetSendRstp(bool),
    LoadMdelayWhile(u32),
    Notify(PpmNotification),
}

pub fn transition(state: PpmState, event: PpmEvent) -> (PpmState, Vec<PpmEffect>) {
    use PpmEvent::*;
    use PpmState::*;

    match (state, event) {
        (_, Begin) => (CheckingRstp, vec![PpmEffect::SetSendRstp(true), PpmEffect::LoadMdelayWhile(MIGRATE_TIME_SECS)]),

        (CheckingRstp, MdelayWhileExpired) => (Sensing, vec![]),
        (CheckingRstp, RcvdStpAndSendRstp) => (
            SelectingStp,
            vec![
                PpmEffect::Notify(PpmNotification::StpVersionAndSendRstpAndRcvdStp),
                PpmEffect::SetSendRstp(false),
                PpmEffect::LoadMdelayWhile(MIGRATE_TIME_SECS),
            ],
        ),

        (SelectingStp, MdelayWhileExpired) => (Sensing, vec![]),

        (Sensing, RcvdRstp { send_rstp: false }) => {
            (Sensing, vec![PpmEffect::Notify(PpmNotification::RstpVersionAndNotSendRstpAndRcvdRstp)])
        }
        (Sensing, RcvdRstp { send_rstp: true }) => (Sensing, vec![]),
        (Sensing, RcvdStpAndSendRstp) => (
            SelectingStp,
            vec![
                PpmEffect::Notify(PpmNotification::StpVersionAndSendRstpAndRcvdStp),
                PpmEffect::SetSendRstp(false),
                PpmEffect::LoadMdelayWhile(MIGRATE_TIME_SECS),
            ],
        ),
        (Sensing, RcvdXst) => (Sensing, vec![]),

        (s, _) => (s, vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rstp_receiving_stp_downgrades_then_re_arms_mdelay() {
        let (s, effects) = transition(PpmState::Sensing, PpmEvent::RcvdStpAndSendRstp);
        assert_eq!(s, PpmState::SelectingStp);
        assert!(effects.iter().any(|e| matches!(e, PpmEffect::SetSendRstp(false))));
        assert!(effects
            .iter()
            .any(|e| matches!(e, PpmEffect::LoadMdelayWhile(MIGRATE_TIME_SECS))));

        let (s, _) = transition(s, PpmEvent::MdelayWhileExpired);
        assert_eq!(s, PpmState::Sensing);
    }

    #[test]
    fn rstp_bpdu_while_not_sending_rstp_raises_notification() {
        let (s, effects) = transition(PpmState::Sensing, PpmEvent::RcvdRstp { send_rstp: false });
        assert_eq!(s, PpmState::Sensing);
        assert!(effects.iter().any(|e| matches!(
            e,
            PpmEffect::Notify(PpmNotification::RstpVersionAndNotSendRstpAndRcvdRstp)
        )));
    }
}
