//! LACP Mux machine (§4.6, 802.1AX §6.4.14), separate-collecting/
//! distributing variant only — the coupled variant is an open question
//! resolved against in `DESIGN.md`.

use crate::port::Selected;

pub const WAIT_WHILE_SECS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxState {
    Detached,
    Waiting,
    Attached,
    Collecting,
    Distributing,
}

#[derive(Debug, Clone, Copy)]
pub enum MuxEvent {
    Begin,
    SelectedChanged,
    WaitWhileExpired,
    Kill,
}

#[derive(Debug, Clone, Copy)]
pub struct MuxGuards {
    pub selected: Selected,
    pub ready: bool,
    pub partner_sync: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum MuxEffect {
    LoadWaitWhile(u32),
    SetActorSync(bool),
    ClearCollecting,
    ClearDistributing,
    SetCollecting,
    SetDistributing,
    SetNtt,
    AsicDisableDistributing,
    AsicEnableCollecting,
    AsicAddToDistribution,
    AsicRemoveFromDistribution,
}

pub fn transition(state: MuxState, event: MuxEvent, guards: MuxGuards) -> (MuxState, Vec<MuxEffect>) {
    use MuxEvent::*;
    use MuxState::*;

    if matches!(event, Kill) {
        return (Detached, detach_effects());
    }
    if guards.selected == Selected::Unselected && state != Detached {
        return (Detached, detach_effects());
    }

    match (state, event) {
        (_, Begin) => (Detached, detach_effects()),

        (Detached, SelectedChanged) if guards.selected != Selected::Unselected => {
            (Waiting, vec![MuxEffect::LoadWaitWhile(WAIT_WHILE_SECS)])
        }

        (Waiting, WaitWhileExpired) | (Waiting, SelectedChanged) => {
            if guards.selected == Selected::Selected && guards.ready {
                (Attached, attach_effects())
            } else {
                (Waiting, vec![])
            }
        }

        (Attached, SelectedChanged) => {
            if guards.partner_sync {
                (Collecting, vec![MuxEffect::SetCollecting, MuxEffect::AsicEnableCollecting])
            } else {
                (Attached, vec![])
            }
        }

        (Collecting, SelectedChanged) => {
            if guards.partner_sync {
                (
                    Distributing,
                    vec![
                        MuxEffect::SetDistributing,
                        MuxEffect::AsicAddToDistribution,
                        MuxEffect::SetNtt,
                    ],
                )
            } else {
                (Attached, attach_effects())
            }
        }

        (Distributing, SelectedChanged) if !guards.partner_sync => (Attached, attach_effects()),

        (s, _) => (s, vec![]),
    }
}

fn detach_effects() -> Vec<MuxEffect> {
    vec![
        MuxEffect::SetActorSync(false),
        MuxEffect::ClearCollecting,
        MuxEffect::ClearDistributing,
        MuxEffect::AsicDisableDistributing,
        MuxEffect::AsicRemoveFromDistribution,
    ]
}

fn attach_effects() -> Vec<MuxEffect> {
    vec![
        MuxEffect::SetActorSync(true),
        MuxEffect::ClearCollecting,
        MuxEffect::ClearDistributing,
        MuxEffect::AsicDisableDistributing,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guards(selected: Selected, ready: bool, partner_sync: bool) -> MuxGuards {
        MuxGuards { selected, ready, partner_sync }
    }

    #[test]
    fn waiting_holds_until_ready_and_selected() {
        let (s, _) = transition(
            MuxState::Waiting,
            MuxEvent::WaitWhileExpired,
            guards(Selected::Selected, false, false),
        );
        assert_eq!(s, MuxState::Waiting);

        let (s, effects) = transition(
            MuxState::Waiting,
            MuxEvent::WaitWhileExpired,
            guards(Selected::Selected, true, false),
        );
        assert_eq!(s, MuxState::Attached);
        assert!(effects.iter().any(|e| matches!(e, MuxEffect::SetActorSync(true))));
    }

    #[test]
    fn unselected_forces_detached_from_any_state() {
        let (s, _) = transition(
            MuxState::Distributing,
            MuxEvent::SelectedChanged,
            guards(Selected::Unselected, true, true),
        );
        assert_eq!(s, MuxState::Detached);
    }

    #[test]
    fn full_path_to_distributing_sets_ntt() {
        let (s, _) = transition(
            MuxState::Attached,
            MuxEvent::SelectedChanged,
            guards(Selected::Selected, true, true),
        );
        assert_eq!(s, MuxState::Collecting);

        let (s, effects) = transition(
            MuxState::Collecting,
            MuxEvent::SelectedChanged,
            guards(Selected::Selected, true, true),
        );
        assert_eq!(s, MuxState::Distributing);
        assert!(effects.iter().any(|e| matches!(e, MuxEffect::SetNtt)));
    }
}
