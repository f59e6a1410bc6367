//! Double-elimination playoffs for 8 seeded alliances (2023+ FRC format).
//!
//! Slots are only written by seeding and by propagation from upstream results.
//! Changing any result re-propagates downstream so the whole graph stays consistent.

use crate::models::{
    Alliance, BracketConfig, BracketState, Entrant, FinalsFormat, FinalsStatus, Match, MatchId,
    SeededAlliance, SelectionError, Side, WinnerRejection, MAX_ALLIANCES,
};
use std::collections::BTreeMap;

/// Where a result sends an alliance.
#[derive(Clone, Copy, Debug)]
struct Edge {
    to: &'static [MatchId],
    side: Side,
}

/// Outgoing edges of one match. `lose` is absent once a loss eliminates.
#[derive(Clone, Copy, Debug)]
struct Flow {
    win: Edge,
    lose: Option<Edge>,
}

const FINALS: &[MatchId] = &[MatchId::M14, MatchId::M15, MatchId::M16];

const fn edge(to: &'static [MatchId], side: Side) -> Edge {
    Edge { to, side }
}

/// Upper round 1 pairings as (match, red seed, blue seed): 1v8, 4v5, 2v7, 3v6.
const OPENING_ROUND: [(MatchId, usize, usize); 4] = [
    (MatchId::M1, 1, 8),
    (MatchId::M2, 4, 5),
    (MatchId::M3, 2, 7),
    (MatchId::M4, 3, 6),
];

/// Bracket adjacency. Finals targets that are absent from the bracket (single-final mode) are skipped.
const FLOW: [(MatchId, Flow); 13] = {
    use MatchId::*;
    use Side::{Blue, Red};
    [
        (M1, Flow { win: edge(&[M7], Red), lose: Some(edge(&[M5], Red)) }),
        (M2, Flow { win: edge(&[M7], Blue), lose: Some(edge(&[M5], Blue)) }),
        (M3, Flow { win: edge(&[M8], Red), lose: Some(edge(&[M6], Red)) }),
        (M4, Flow { win: edge(&[M8], Blue), lose: Some(edge(&[M6], Blue)) }),
        (M5, Flow { win: edge(&[M10], Blue), lose: None }),
        (M6, Flow { win: edge(&[M9], Blue), lose: None }),
        (M7, Flow { win: edge(&[M11], Red), lose: Some(edge(&[M9], Red)) }),
        (M8, Flow { win: edge(&[M11], Blue), lose: Some(edge(&[M10], Red)) }),
        (M9, Flow { win: edge(&[M12], Red), lose: None }),
        (M10, Flow { win: edge(&[M12], Blue), lose: None }),
        (M11, Flow { win: edge(FINALS, Red), lose: Some(edge(&[M13], Red)) }),
        (M12, Flow { win: edge(&[M13], Blue), lose: None }),
        (M13, Flow { win: edge(FINALS, Blue), lose: None }),
    ]
};

fn flow(id: MatchId) -> Option<Flow> {
    FLOW.iter().find(|(from, _)| *from == id).map(|(_, f)| *f)
}

/// Build the bracket from the drafted alliances (alliance i is seed i+1). Missing seeds become byes.
pub fn seed_bracket(alliances: &[Alliance], config: BracketConfig) -> BracketState {
    let entrants: Vec<Entrant> = (0..MAX_ALLIANCES)
        .map(|i| match alliances.get(i) {
            Some(a) => Entrant::Alliance(SeededAlliance::from_alliance(i + 1, a)),
            None => Entrant::Bye { seed: i + 1 },
        })
        .collect();

    let matches: BTreeMap<MatchId, Match> = MatchId::ALL
        .into_iter()
        .filter(|&id| config.finals == FinalsFormat::BestOfThree || id <= MatchId::M14)
        .map(|id| (id, Match::new(id, config.finals)))
        .collect();
    let mut state = BracketState { config, matches };

    for (id, red_seed, blue_seed) in OPENING_ROUND {
        if let Some(m) = state.matches.get_mut(&id) {
            m.red = Some(entrants[red_seed - 1].clone());
            m.blue = Some(entrants[blue_seed - 1].clone());
        }
    }
    if config.auto_advance_byes {
        for (id, _, _) in OPENING_ROUND {
            if state.matches.get_mut(&id).is_some_and(settle_bye) {
                propagate(&mut state, id);
            }
        }
    }
    lock_tiebreaker(&mut state);
    log::info!(
        "bracket seeded with {} alliance(s), {} bye(s)",
        alliances.len().min(MAX_ALLIANCES),
        MAX_ALLIANCES - alliances.len().min(MAX_ALLIANCES)
    );
    state
}

/// Record (or, when `side` already won, clear) a match result and re-propagate.
pub fn set_match_winner(
    state: &mut BracketState,
    id: MatchId,
    side: Side,
) -> Result<(), SelectionError> {
    let invalid = SelectionError::InvalidWinnerAssignment;
    let m = state
        .matches
        .get(&id)
        .ok_or(invalid(WinnerRejection::UnknownMatch(id)))?;
    if m.red.is_none() || m.blue.is_none() {
        return Err(invalid(WinnerRejection::NotReady(id)));
    }
    if state.config.auto_advance_byes && m.has_bye() {
        return Err(invalid(WinnerRejection::ByeMatch(id)));
    }
    if id == MatchId::M16 && !finals_status(state).needs_tiebreaker {
        return Err(invalid(WinnerRejection::TiebreakerLocked));
    }

    if let Some(m) = state.matches.get_mut(&id) {
        m.winner = if m.winner == Some(side) { None } else { Some(side) };
        log::debug!("{} ({}) winner: {:?}", id, m.label, m.winner);
    }
    propagate(state, id);
    lock_tiebreaker(state);
    Ok(())
}

/// Champion colour and whether Finals 3 is live.
pub fn finals_status(state: &BracketState) -> FinalsStatus {
    match state.config.finals {
        FinalsFormat::SingleFinal => FinalsStatus {
            champion: state.winner(MatchId::M14),
            needs_tiebreaker: false,
        },
        FinalsFormat::BestOfThree => {
            match (state.winner(MatchId::M14), state.winner(MatchId::M15)) {
                (Some(first), Some(second)) if first == second => FinalsStatus {
                    champion: Some(first),
                    needs_tiebreaker: false,
                },
                (Some(_), Some(_)) => FinalsStatus {
                    champion: state.winner(MatchId::M16),
                    needs_tiebreaker: true,
                },
                _ => FinalsStatus::default(),
            }
        }
    }
}

/// The champion alliance, once the finals are decided.
pub fn champion(state: &BracketState) -> Option<&Entrant> {
    let side = finals_status(state).champion?;
    // Every finals match holds the same two finalists.
    state.get(MatchId::M14).and_then(|m| m.slot(side))
}

fn propagate(state: &mut BracketState, source: MatchId) {
    let Some(flow) = flow(source) else {
        return;
    };
    let Some(m) = state.matches.get(&source) else {
        return;
    };
    let winner = m.winning_entrant().cloned();
    let loser = m.losing_entrant().cloned();

    for &target in flow.win.to {
        update_slot(state, target, flow.win.side, winner.clone());
    }
    if let Some(lose) = flow.lose {
        for &target in lose.to {
            update_slot(state, target, lose.side, loser.clone());
        }
    }
}

fn update_slot(state: &mut BracketState, target: MatchId, side: Side, entrant: Option<Entrant>) {
    let auto_advance_byes = state.config.auto_advance_byes;
    let Some(m) = state.matches.get_mut(&target) else {
        return;
    };
    if m.slot(side) == entrant.as_ref() {
        return;
    }
    *m.slot_mut(side) = entrant;
    m.winner = None;
    if auto_advance_byes {
        settle_bye(m);
    }
    propagate(state, target);
}

/// Decide a ready match that involves a bye: the real alliance advances; two byes send red on.
fn settle_bye(m: &mut Match) -> bool {
    let (Some(red), Some(blue)) = (&m.red, &m.blue) else {
        return false;
    };
    let winner = match (red.is_bye(), blue.is_bye()) {
        (false, false) => return false,
        (true, false) => Side::Blue,
        _ => Side::Red,
    };
    m.winner = Some(winner);
    true
}

/// Finals 3 only counts after a 1-1 split; clear it otherwise.
fn lock_tiebreaker(state: &mut BracketState) {
    if finals_status(state).needs_tiebreaker {
        return;
    }
    if let Some(m) = state.matches.get_mut(&MatchId::M16) {
        if m.winner.take().is_some() {
            log::debug!("Finals 3 result cleared; finals are not split");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_match_except_finals_has_an_outgoing_edge() {
        for id in MatchId::ALL {
            assert_eq!(flow(id).is_some(), !FINALS.contains(&id), "{id}");
        }
    }

    #[test]
    fn upper_round_losers_drop_and_lower_round_losers_are_eliminated() {
        use MatchId::*;
        for id in [M1, M2, M3, M4, M7, M8, M11] {
            assert!(flow(id).unwrap().lose.is_some(), "{id}");
        }
        for id in [M5, M6, M9, M10, M12, M13] {
            assert!(flow(id).unwrap().lose.is_none(), "{id}");
        }
    }
}
