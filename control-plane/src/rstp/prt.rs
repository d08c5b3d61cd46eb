//! Port Role Transitions (§4.11 PRT, 802.1D-2004 §17.29): the per-role
//! sub-FSM driving the proposing/proposed/sync/agreed handshake. Modeled
//! per role rather than as one monolithic table, matching how the standard
//! itself splits Root/Designated/Alternate-and-Backup port transitions.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootPortState {
    Discarding,
    Learning,
    Forwarding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignatedPortState {
    Discarding,
    Learning,
    Forwarding,
}

#[derive(Debug, Clone, Copy)]
pub struct RoleTransitionGuards {
    pub agreed: bool,
    pub forward_delay_elapsed: bool,
    pub rstp_and_point_to_point: bool,
}

/// Root port entering Forwarding: the "fast path" (proposal/agreement,
/// skipping 2x ForwardDelay) applies only when both ends are RSTP and the
/// link is point-to-point (§4.11 PRT).
pub fn root_port_transition(state: RootPortState, guards: RoleTransitionGuards) -> RootPortState {
    use RootPortState::*;
    let can_fast_forward = guards.rstp_and_point_to_point && guards.agreed;
    match state {
        Discarding if can_fast_forward || guards.forward_delay_elapsed => Learning,
        Learning if can_fast_forward || guards.forward_delay_elapsed => Forwarding,
        other => other,
    }
}

pub fn designated_port_transition(
    state: DesignatedPortState,
    guards: RoleTransitionGuards,
) -> DesignatedPortState {
    use DesignatedPortState::*;
    let can_fast_forward = guards.rstp_and_point_to_point && guards.agreed;
    match state {
        Discarding if can_fast_forward || guards.forward_delay_elapsed => Learning,
        Learning if can_fast_forward || guards.forward_delay_elapsed => Forwarding,
        other => other,
    }
}

/// Alternate and Backup ports never forward or learn; they sit in
/// Discarding for as long as they hold that role.
pub fn alternate_or_backup_is_discarding() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agreement_skips_forward_delay_on_rstp_point_to_point() {
        let guards = RoleTransitionGuards {
            agreed: true,
            forward_delay_elapsed: false,
            rstp_and_point_to_point: true,
        };
        let s = root_port_transition(RootPortState::Discarding, guards);
        assert_eq!(s, RootPortState::Learning);
        let s = root_port_transition(s, guards);
        assert_eq!(s, RootPortState::Forwarding);
    }

    #[test]
    fn legacy_path_waits_for_forward_delay() {
        let guards = RoleTransitionGuards {
            agreed: false,
            forward_delay_elapsed: false,
            rstp_and_point_to_point: false,
        };
        assert_eq!(
            root_port_transition(RootPortState::Discarding, guards),
            RootPortState::Discarding
        );
        let guards = RoleTransitionGuards { forward_delay_elapsed: true, ..guards };
        assert_eq!(root_port_transition(RootPortState::Discarding, guards), RootPortState::Learning);
    }
}
