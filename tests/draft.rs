//! Integration tests for alliance selection: captain promotion, snake order, removal.

use frc_alliance_draft::{
    advance, initialize, pick, pick_into_slot, remove_pick, reset, Advance, DraftState,
    DraftStatus, Phase, PickPointer, PickRejection, Round, SelectionError, Team, TeamNumber,
};
use std::collections::BTreeSet;

/// Team numbers are 1000 + rank so the two are easy to tell apart.
fn rankings(n: u32) -> Vec<Team> {
    (1..=n)
        .map(|rank| Team::new(1000 + rank, format!("Team {rank}"), rank))
        .collect()
}

fn assert_consistent(state: &DraftState) {
    let seated = state.seated_team_numbers();
    let unique: BTreeSet<TeamNumber> = seated.iter().copied().collect();
    assert_eq!(unique.len(), seated.len(), "a team is seated twice");
    assert_eq!(unique, state.selected, "selected set drifted from the alliances");
}

/// Lowest-ranked unselected team, so captains stay at ranks 1..=8.
fn worst_available(state: &DraftState) -> TeamNumber {
    state.unselected_teams().last().unwrap().team_number
}

/// Run a whole 24-team draft, always picking the worst available team.
fn complete_draft() -> DraftState {
    let mut state = initialize(&rankings(24)).unwrap();
    while !state.complete {
        let team = worst_available(&state);
        pick(&mut state, team).unwrap();
        assert_consistent(&state);
    }
    state
}

#[test]
fn initialize_makes_top_seed_first_captain() {
    let state = initialize(&rankings(24)).unwrap();
    assert_eq!(state.alliances.len(), 1);
    assert_eq!(state.alliances[0].number, 1);
    assert_eq!(state.alliances[0].captain.rank, 1);
    assert_eq!(state.current_pick, PickPointer::pick(0, Round::First));
    assert!(!state.complete);
    assert_eq!(state.status(), DraftStatus::FormingAlliances);
    assert_consistent(&state);
}

#[test]
fn initialize_rejects_empty_rankings() {
    assert_eq!(initialize(&[]), Err(SelectionError::EmptyRankings));
}

#[test]
fn initialize_orders_by_rank_not_input_order() {
    let mut teams = rankings(10);
    teams.reverse();
    let state = initialize(&teams).unwrap();
    assert_eq!(state.alliances[0].captain.team_number, 1001);
    assert_eq!(state.available_teams[9].rank, 10);
}

#[test]
fn full_draft_interleaves_captains_then_snakes_back() {
    let mut state = initialize(&rankings(24)).unwrap();
    let mut order = Vec::new();
    while let Some(slot) = state.on_the_clock() {
        order.push(slot);
        let team = worst_available(&state);
        pick(&mut state, team).unwrap();
    }
    let expected: Vec<(usize, usize)> = (0..8)
        .map(|i| (i, 0))
        .chain((0..8).rev().map(|i| (i, 1)))
        .collect();
    assert_eq!(order, expected);

    assert!(state.complete);
    assert_eq!(state.status(), DraftStatus::Complete);
    assert_eq!(state.selected.len(), 24);
    let captain_ranks: Vec<u32> = state.alliances.iter().map(|a| a.captain.rank).collect();
    assert_eq!(captain_ranks, (1..=8).collect::<Vec<_>>());
    assert_consistent(&state);
}

#[test]
fn next_captain_is_best_unselected_team() {
    let mut state = initialize(&rankings(24)).unwrap();
    // Alliance 1 takes the second seed, so the third seed captains alliance 2.
    let outcome = pick(&mut state, 1002).unwrap();
    assert!(matches!(outcome, Advance::CaptainPromoted(ref t) if t.team_number == 1003));
    assert_eq!(state.alliances[1].captain.team_number, 1003);
    assert_eq!(state.current_pick, PickPointer::pick(1, Round::First));
}

#[test]
fn captains_are_promoted_in_rank_order_before_any_pick() {
    let mut state = initialize(&rankings(8)).unwrap();
    for _ in 0..6 {
        assert!(matches!(advance(&mut state), Advance::CaptainPromoted(_)));
    }
    // The eighth captain takes the last ranked team, leaving nobody to pick.
    assert_eq!(advance(&mut state), Advance::Exhausted);

    let captain_ranks: Vec<u32> = state.alliances.iter().map(|a| a.captain.rank).collect();
    assert_eq!(captain_ranks, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert!(state.complete);
    assert_eq!(advance(&mut state), Advance::Complete);
    assert_consistent(&state);
}

#[test]
fn snake_order_with_all_captains_seated() {
    let mut state = initialize(&rankings(24)).unwrap();
    for _ in 0..7 {
        advance(&mut state);
    }
    let mut indices = Vec::new();
    while !state.complete {
        indices.push(state.current_pick.alliance_index);
        let team = worst_available(&state);
        pick(&mut state, team).unwrap();
    }
    let expected: Vec<usize> = (0..8).chain((0..8).rev()).collect();
    assert_eq!(indices, expected);
}

#[test]
fn picking_a_seated_team_is_rejected() {
    let mut state = initialize(&rankings(24)).unwrap();
    pick(&mut state, 1024).unwrap();
    let before = state.clone();
    assert_eq!(
        pick(&mut state, 1024),
        Err(SelectionError::InvalidPick(PickRejection::TeamUnavailable(1024)))
    );
    // Captains are seated too.
    assert_eq!(
        pick(&mut state, 1002),
        Err(SelectionError::InvalidPick(PickRejection::TeamUnavailable(1002)))
    );
    assert_eq!(state, before);
}

#[test]
fn slot_targeted_pick_only_accepts_the_slot_on_the_clock() {
    let mut state = initialize(&rankings(24)).unwrap();
    pick(&mut state, 1024).unwrap();

    assert_eq!(
        pick_into_slot(&mut state, 0, 0, 1023),
        Err(SelectionError::InvalidPick(PickRejection::SlotFilled {
            alliance_index: 0,
            pick_index: 0
        }))
    );
    assert_eq!(
        pick_into_slot(&mut state, 0, 1, 1023),
        Err(SelectionError::InvalidPick(PickRejection::NotOnTheClock {
            alliance_index: 0,
            pick_index: 1
        }))
    );
    assert_eq!(
        pick_into_slot(&mut state, 5, 0, 1023),
        Err(SelectionError::InvalidPick(PickRejection::NoSuchPick {
            alliance_index: 5,
            pick_index: 0
        }))
    );
    assert!(pick_into_slot(&mut state, 1, 0, 1023).is_ok());
    assert_eq!(state.alliances[1].picks[0].as_ref().map(|t| t.team_number), Some(1023));
}

#[test]
fn pick_after_completion_is_rejected() {
    let mut state = complete_draft();
    assert_eq!(
        pick(&mut state, 1001),
        Err(SelectionError::InvalidPick(PickRejection::SelectionComplete))
    );
}

#[test]
fn rankings_running_out_forces_completion_with_fewer_alliances() {
    let mut state = initialize(&rankings(10)).unwrap();
    let mut last = None;
    while !state.complete {
        let team = worst_available(&state);
        last = Some(pick(&mut state, team).unwrap());
    }
    assert_eq!(last, Some(Advance::Exhausted));
    assert_eq!(state.alliances.len(), 5);
    assert_eq!(state.current_pick.phase, Phase::Captain);
    assert_eq!(state.status(), DraftStatus::Complete);
    assert_consistent(&state);
}

#[test]
fn remove_then_repick_second_round_restores_rosters() {
    let original = complete_draft();
    let mut state = original.clone();
    let team = state.alliances[3].picks[1].clone().unwrap();

    let freed = remove_pick(&mut state, 3, 1).unwrap();
    assert_eq!(freed, vec![team.team_number]);
    assert!(!state.complete);
    assert_eq!(state.current_pick, PickPointer::pick(3, Round::Second));
    assert_consistent(&state);

    pick(&mut state, team.team_number).unwrap();
    assert_eq!(state.alliances, original.alliances);
    assert_eq!(state.selected, original.selected);
    assert!(state.complete);
}

#[test]
fn remove_first_pick_of_last_alliance_keeps_slot_positions() {
    let original = complete_draft();
    let mut state = original.clone();
    let team = state.alliances[7].picks[0].clone().unwrap();

    remove_pick(&mut state, 7, 0).unwrap();
    assert_eq!(state.alliances.len(), 8);
    assert!(state.alliances[7].picks[1].is_some());
    assert_eq!(state.on_the_clock(), Some((7, 0)));

    pick_into_slot(&mut state, 7, 0, team.team_number).unwrap();
    assert_eq!(state.alliances, original.alliances);
    assert_eq!(state.selected, original.selected);
}

#[test]
fn removing_a_first_round_pick_dissolves_later_alliances() {
    let mut state = complete_draft();
    let freed = remove_pick(&mut state, 2, 0).unwrap();

    // The pick itself plus captain and both picks of alliances 4..=8.
    assert_eq!(freed.len(), 1 + 5 * 3);
    assert_eq!(state.alliances.len(), 3);
    assert_eq!(state.current_pick, PickPointer::pick(2, Round::First));
    assert_eq!(state.status(), DraftStatus::FormingAlliances);
    assert_consistent(&state);

    // Drafting resumes: the freed fourth seed captains alliance 4 again.
    let team = worst_available(&state);
    pick(&mut state, team).unwrap();
    assert_eq!(state.alliances[3].captain.rank, 4);
    assert_consistent(&state);
}

#[test]
fn removing_an_empty_slot_is_rejected() {
    let mut state = initialize(&rankings(24)).unwrap();
    assert_eq!(
        remove_pick(&mut state, 0, 0),
        Err(SelectionError::InvalidPick(PickRejection::NoSuchPick {
            alliance_index: 0,
            pick_index: 0
        }))
    );
    assert!(remove_pick(&mut state, 9, 0).is_err());
}

#[test]
fn reset_matches_initialize() {
    let mut state = complete_draft();
    reset(&mut state, &rankings(24)).unwrap();
    assert_eq!(state, initialize(&rankings(24)).unwrap());
}

#[test]
fn alliance_serializes_positional_slots_with_empty_as_null() {
    let mut state = complete_draft();
    remove_pick(&mut state, 7, 0).unwrap();
    let value = serde_json::to_value(&state.alliances[7]).unwrap();
    let picks = value["picks"].as_array().unwrap();
    assert_eq!(picks.len(), 2);
    assert!(picks[0].is_null());
    assert_eq!(picks[1]["rank"], 16);
    assert_eq!(value["number"], 8);
}
