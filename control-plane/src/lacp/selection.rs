//! Selection (§4.7, 802.1AX §6.4.9): binds an Unselected port to an
//! aggregator whose (partner system id, partner key, actor admin key,
//! individual flag) matches, tie-breaking on the lowest aggregator id.

use pdu_codec::frame::SystemId;

use crate::aggregator::Aggregator;
use crate::ids::AggregatorId;
use crate::port::{LacpPort, Selected};

/// The candidate key a port presents to Selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateKey {
    pub partner_system: SystemId,
    pub partner_key: u16,
    pub actor_admin_key: u16,
    pub individual: bool,
}

pub fn candidate_key(port: &LacpPort) -> CandidateKey {
    CandidateKey {
        partner_system: port.partner_oper.system,
        partner_key: port.partner_oper.key,
        actor_admin_key: port.actor_admin.key,
        individual: !port.partner_oper.state.aggregation(),
    }
}

fn aggregator_matches(agg: &Aggregator, key: &CandidateKey) -> bool {
    if key.individual {
        return false;
    }
    agg.admin_key == key.actor_admin_key
        && (agg.partner_system.is_none() || agg.partner_system == Some(key.partner_system))
        && (agg.partner_system.is_none() || agg.partner_key == key.partner_key)
}

/// Picks the lowest-numbered aggregator id among all matches (§9 Open
/// Questions tie-break), regardless of the order `candidates` is given in.
pub fn select(
    key: CandidateKey,
    candidates: impl IntoIterator<Item = (AggregatorId, Aggregator)>,
) -> Option<(AggregatorId, Selected)> {
    let mut best: Option<(AggregatorId, Aggregator)> = None;
    for (id, agg) in candidates {
        if !aggregator_matches(&agg, &key) {
            continue;
        }
        let is_better = match &best {
            Some((best_id, _)) => id < *best_id,
            None => true,
        };
        if is_better {
            best = Some((id, agg));
        }
    }
    best.map(|(id, agg)| {
        let selected = if agg.ready { Selected::Selected } else { Selected::Standby };
        (id, selected)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(id: u16, key: u16, ready: bool) -> Aggregator {
        let mut a = Aggregator::new(AggregatorId(id), format!("agg{id}"), key, SystemId([0; 6]), 1);
        a.ready = ready;
        a
    }

    #[test]
    fn picks_lowest_id_among_matches() {
        let key = CandidateKey {
            partner_system: SystemId([0; 6]),
            partner_key: 0,
            actor_admin_key: 100,
            individual: false,
        };
        let candidates = vec![(AggregatorId(200), agg(200, 100, true)), (AggregatorId(100), agg(100, 100, true))];
        let (id, selected) = select(key, candidates).unwrap();
        assert_eq!(id, AggregatorId(100));
        assert_eq!(selected, Selected::Selected);
    }

    #[test]
    fn individual_partner_never_selects() {
        let key = CandidateKey {
            partner_system: SystemId([0; 6]),
            partner_key: 0,
            actor_admin_key: 100,
            individual: true,
        };
        let candidates = vec![(AggregatorId(100), agg(100, 100, true))];
        assert!(select(key, candidates).is_none());
    }

    #[test]
    fn not_ready_yields_standby() {
        let key = CandidateKey {
            partner_system: SystemId([0; 6]),
            partner_key: 0,
            actor_admin_key: 100,
            individual: false,
        };
        let candidates = vec![(AggregatorId(100), agg(100, 100, false))];
        let (_, selected) = select(key, candidates).unwrap();
        assert_eq!(selected, Selected::Standby);
    }
}
