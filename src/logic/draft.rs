//! Alliance selection: captain promotion interleaved with round-1 picks, then a snake draft.
//!
//! Every operation validates before it mutates, so a rejected call leaves the
//! `DraftState` exactly as it was.

use crate::logic::rankings::prepare_rankings;
use crate::models::{
    Advance, Alliance, DraftState, PickPointer, PickRejection, Round, SelectionError, Team,
    TeamNumber, MAX_ALLIANCES, MAX_PICKS_PER_ALLIANCE,
};
use std::collections::BTreeSet;

/// Start a draft: the top seed captains Alliance 1 and is on the clock for its first pick.
pub fn initialize(rankings: &[Team]) -> Result<DraftState, SelectionError> {
    let queue = prepare_rankings(rankings)?;
    let first_captain = queue[0].clone();
    let mut selected = BTreeSet::new();
    selected.insert(first_captain.team_number);
    let complete = queue.len() == 1;
    log::debug!(
        "draft initialized with {} ranked teams, alliance 1 captain {}",
        queue.len(),
        first_captain.team_number
    );
    Ok(DraftState {
        alliances: vec![Alliance::new(1, first_captain)],
        available_teams: queue,
        selected,
        current_pick: PickPointer::pick(0, Round::First),
        complete,
    })
}

/// Start over from the same (or refreshed) rankings.
pub fn reset(state: &mut DraftState, rankings: &[Team]) -> Result<(), SelectionError> {
    *state = initialize(rankings)?;
    Ok(())
}

/// Give `team_number` to the alliance currently on the clock, then advance.
pub fn pick(state: &mut DraftState, team_number: TeamNumber) -> Result<Advance, SelectionError> {
    let (alliance_index, pick_index) = state
        .on_the_clock()
        .ok_or(SelectionError::InvalidPick(PickRejection::SelectionComplete))?;
    place(state, alliance_index, pick_index, team_number)
}

/// Place a team into an explicit slot (tap/drop on a slot). Only the slot on the clock accepts a team.
pub fn pick_into_slot(
    state: &mut DraftState,
    alliance_index: usize,
    pick_index: usize,
    team_number: TeamNumber,
) -> Result<Advance, SelectionError> {
    if state.complete {
        return Err(SelectionError::InvalidPick(PickRejection::SelectionComplete));
    }
    let alliance = state
        .alliances
        .get(alliance_index)
        .filter(|_| pick_index < MAX_PICKS_PER_ALLIANCE)
        .ok_or(SelectionError::InvalidPick(PickRejection::NoSuchPick {
            alliance_index,
            pick_index,
        }))?;
    if alliance.has_pick(pick_index) {
        return Err(SelectionError::InvalidPick(PickRejection::SlotFilled {
            alliance_index,
            pick_index,
        }));
    }
    if state.on_the_clock() != Some((alliance_index, pick_index)) {
        return Err(SelectionError::InvalidPick(PickRejection::NotOnTheClock {
            alliance_index,
            pick_index,
        }));
    }
    place(state, alliance_index, pick_index, team_number)
}

fn place(
    state: &mut DraftState,
    alliance_index: usize,
    pick_index: usize,
    team_number: TeamNumber,
) -> Result<Advance, SelectionError> {
    let team = state
        .team(team_number)
        .cloned()
        .ok_or(SelectionError::InvalidPick(PickRejection::UnknownTeam(team_number)))?;
    if state.is_selected(team_number) {
        return Err(SelectionError::InvalidPick(PickRejection::TeamUnavailable(
            team_number,
        )));
    }
    let slot = state
        .alliances
        .get_mut(alliance_index)
        .and_then(|a| a.picks.get_mut(pick_index))
        .ok_or(SelectionError::InvalidPick(PickRejection::NoSuchPick {
            alliance_index,
            pick_index,
        }))?;
    if slot.is_some() {
        return Err(SelectionError::InvalidPick(PickRejection::SlotFilled {
            alliance_index,
            pick_index,
        }));
    }
    *slot = Some(team);
    state.selected.insert(team_number);
    log::debug!(
        "alliance {} pick {}: team {}",
        alliance_index + 1,
        pick_index + 1,
        team_number
    );
    Ok(advance(state))
}

/// Move the draft forward: form the next alliance while fewer than 8 exist, otherwise follow snake order.
pub fn advance(state: &mut DraftState) -> Advance {
    if state.complete {
        return Advance::Complete;
    }
    if state.alliances.len() < MAX_ALLIANCES {
        promote_captain(state)
    } else {
        recalculate_pick_position(state)
    }
}

/// Remove a pick and free its team. Removing a round-1 pick discards every later alliance,
/// since those captains were only promoted because of the picks before them.
/// Returns every freed team number.
pub fn remove_pick(
    state: &mut DraftState,
    alliance_index: usize,
    pick_index: usize,
) -> Result<Vec<TeamNumber>, SelectionError> {
    let removed = state
        .alliances
        .get_mut(alliance_index)
        .and_then(|a| a.picks.get_mut(pick_index))
        .and_then(Option::take)
        .ok_or(SelectionError::InvalidPick(PickRejection::NoSuchPick {
            alliance_index,
            pick_index,
        }))?;

    let mut freed = vec![removed.team_number];
    if pick_index == 0 && alliance_index + 1 < state.alliances.len() {
        for later in state.alliances.drain(alliance_index + 1..) {
            freed.extend(later.members().map(|t| t.team_number));
        }
    }
    for team_number in &freed {
        state.selected.remove(team_number);
    }
    log::debug!(
        "removed alliance {} pick {}; freed {:?}",
        alliance_index + 1,
        pick_index + 1,
        freed
    );

    state.complete = false;
    recalculate_pick_position(state);
    Ok(freed)
}

fn promote_captain(state: &mut DraftState) -> Advance {
    let captain = match state.next_unselected() {
        Some(team) => team.clone(),
        None => {
            state.current_pick = PickPointer::captain_seat(state.alliances.len());
            return exhaust(state);
        }
    };
    let number = state.alliances.len() + 1;
    state.selected.insert(captain.team_number);
    state.alliances.push(Alliance::new(number, captain.clone()));
    log::debug!("alliance {} captain: team {}", number, captain.team_number);
    match recalculate_pick_position(state) {
        Advance::OnTheClock(_) => Advance::CaptainPromoted(captain),
        other => other,
    }
}

/// Point at the first alliance missing its round-1 pick; with all 8 formed, the last alliance
/// (scanning backwards) missing its round-2 pick; otherwise form another alliance or finish.
fn recalculate_pick_position(state: &mut DraftState) -> Advance {
    let round_one = state
        .alliances
        .iter()
        .position(|a| !a.has_pick(Round::First.pick_index()))
        .map(|i| PickPointer::pick(i, Round::First));
    let next = round_one.or_else(|| {
        if state.alliances.len() < MAX_ALLIANCES {
            return None;
        }
        state
            .alliances
            .iter()
            .rposition(|a| !a.has_pick(Round::Second.pick_index()))
            .map(|i| PickPointer::pick(i, Round::Second))
    });

    match next {
        Some(pointer) => {
            state.current_pick = pointer;
            if state.next_unselected().is_some() {
                state.complete = false;
                Advance::OnTheClock(pointer)
            } else {
                exhaust(state)
            }
        }
        None if state.alliances.len() < MAX_ALLIANCES => promote_captain(state),
        None => {
            state.complete = true;
            log::info!("alliance selection complete");
            Advance::Complete
        }
    }
}

fn exhaust(state: &mut DraftState) -> Advance {
    state.complete = true;
    log::info!(
        "{} with {} alliance(s)",
        SelectionError::DraftExhausted,
        state.alliances.len()
    );
    Advance::Exhausted
}
