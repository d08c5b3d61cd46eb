//! Port State Transitions (§4.11 PST, 802.1D-2004 §17.28): maintains
//! `learning`/`forwarding` from the role sub-FSM's discrete state and
//! emits the corresponding ASIC commands. Enforces forwarding ⇒ learning.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    Discarding,
    Learning,
    Forwarding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PstEffect {
    AsicSetLearning(bool),
    AsicSetForwarding(bool),
    AsicFlushMacs,
}

pub fn apply(previous: PortState, next: PortState) -> Vec<PstEffect> {
    if previous == next {
        return vec![];
    }
    let mut effects = vec![];
    match next {
        PortState::Discarding => {
            effects.push(PstEffect::AsicSetForwarding(false));
            effects.push(PstEffect::AsicSetLearning(false));
            effects.push(PstEffect::AsicFlushMacs);
        }
        PortState::Learning => {
            effects.push(PstEffect::AsicSetForwarding(false));
            effects.push(PstEffect::AsicSetLearning(true));
        }
        PortState::Forwarding => {
            effects.push(PstEffect::AsicSetLearning(true));
            effects.push(PstEffect::AsicSetForwarding(true));
        }
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarding_always_implies_learning_is_set_first() {
        let effects = apply(PortState::Learning, PortState::Forwarding);
        assert_eq!(
            effects,
            vec![PstEffect::AsicSetLearning(true), PstEffect::AsicSetForwarding(true)]
        );
    }

    #[test]
    fn dropping_to_discarding_flushes_macs() {
        let effects = apply(PortState::Forwarding, PortState::Discarding);
        assert!(effects.contains(&PstEffect::AsicFlushMacs));
        assert!(effects.contains(&PstEffect::AsicSetForwarding(false)));
    }

    #[test]
    fn no_change_is_a_no_op() {
        assert!(apply(PortState::Forwarding, PortState::Forwarding).is_empty());
    }
}
