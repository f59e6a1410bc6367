//! Alliances, the pick pointer, and the DraftState the draft engine transforms.

use crate::models::team::{Team, TeamNumber};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Playoff alliances formed at an event.
pub const MAX_ALLIANCES: usize = 8;
/// Picks per alliance in addition to the captain.
pub const MAX_PICKS_PER_ALLIANCE: usize = 2;

/// An alliance: a captain plus positional pick slots (slot 0 = round 1, slot 1 = round 2).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Alliance {
    /// 1-based alliance number (also its playoff seed).
    pub number: usize,
    pub captain: Team,
    pub picks: [Option<Team>; MAX_PICKS_PER_ALLIANCE],
}

impl Alliance {
    pub fn new(number: usize, captain: Team) -> Self {
        Self {
            number,
            captain,
            picks: Default::default(),
        }
    }

    /// Filled picks in slot order.
    pub fn filled_picks(&self) -> impl Iterator<Item = &Team> {
        self.picks.iter().flatten()
    }

    /// Captain followed by filled picks.
    pub fn members(&self) -> impl Iterator<Item = &Team> {
        std::iter::once(&self.captain).chain(self.filled_picks())
    }

    pub fn has_pick(&self, pick_index: usize) -> bool {
        matches!(self.picks.get(pick_index), Some(Some(_)))
    }

    pub fn pick_count(&self) -> usize {
        self.filled_picks().count()
    }
}

/// Draft round; selects which pick slot is being filled.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    #[default]
    First,
    Second,
}

impl Round {
    /// Pick slot this round fills.
    pub fn pick_index(self) -> usize {
        match self {
            Round::First => 0,
            Round::Second => 1,
        }
    }

    /// 1 or 2, for display.
    pub fn number(self) -> u8 {
        match self {
            Round::First => 1,
            Round::Second => 2,
        }
    }
}

/// What the pointer is waiting for.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// A new alliance needs a captain. Only observed when the rankings ran out before one could be promoted.
    Captain,
    #[default]
    Pick,
}

/// Whose turn it is.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PickPointer {
    pub alliance_index: usize,
    pub round: Round,
    pub phase: Phase,
}

impl PickPointer {
    pub fn pick(alliance_index: usize, round: Round) -> Self {
        Self {
            alliance_index,
            round,
            phase: Phase::Pick,
        }
    }

    pub fn captain_seat(alliance_index: usize) -> Self {
        Self {
            alliance_index,
            round: Round::First,
            phase: Phase::Captain,
        }
    }
}

/// Coarse progress, matching the status banner shown to the scout.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    /// Fewer than 8 alliances exist; round-1 picks and captain promotions interleave.
    FormingAlliances,
    /// All 8 captains seated; snake draft in progress.
    Picking,
    Complete,
}

/// Result of moving the draft forward after a pick.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Advance {
    /// A new alliance was formed around this captain.
    CaptainPromoted(Team),
    /// The pointer moved; this alliance/round is now picking.
    OnTheClock(PickPointer),
    /// Every pick slot is filled.
    Complete,
    /// Rankings ran out before every slot could be filled. Terminal, not an error.
    Exhausted,
}

/// Full alliance-selection state.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DraftState {
    pub alliances: Vec<Alliance>,
    /// Every ranked team in rank order. Availability is `!selected.contains(..)`.
    pub available_teams: Vec<Team>,
    /// Team numbers currently seated as captain or pick.
    pub selected: BTreeSet<TeamNumber>,
    pub current_pick: PickPointer,
    pub complete: bool,
}

impl DraftState {
    /// Team from the rankings by number.
    pub fn team(&self, team_number: TeamNumber) -> Option<&Team> {
        self.available_teams
            .iter()
            .find(|t| t.team_number == team_number)
    }

    pub fn is_selected(&self, team_number: TeamNumber) -> bool {
        self.selected.contains(&team_number)
    }

    /// In the rankings and not yet seated.
    pub fn is_available(&self, team_number: TeamNumber) -> bool {
        self.team(team_number).is_some() && !self.is_selected(team_number)
    }

    /// Unseated teams, best rank first.
    pub fn unselected_teams(&self) -> impl Iterator<Item = &Team> {
        self.available_teams
            .iter()
            .filter(move |t| !self.selected.contains(&t.team_number))
    }

    /// Highest-ranked unseated team: the next captain.
    pub fn next_unselected(&self) -> Option<&Team> {
        self.unselected_teams().next()
    }

    /// `(alliance_index, pick_index)` of the slot currently picking, if any.
    pub fn on_the_clock(&self) -> Option<(usize, usize)> {
        if self.complete || self.current_pick.phase != Phase::Pick {
            return None;
        }
        Some((
            self.current_pick.alliance_index,
            self.current_pick.round.pick_index(),
        ))
    }

    pub fn total_picks(&self) -> usize {
        self.alliances.iter().map(Alliance::pick_count).sum()
    }

    pub fn status(&self) -> DraftStatus {
        let all_formed = self.alliances.len() >= MAX_ALLIANCES;
        let all_picked = all_formed && self.total_picks() >= MAX_ALLIANCES * MAX_PICKS_PER_ALLIANCE;
        if self.complete || all_picked {
            DraftStatus::Complete
        } else if !all_formed {
            DraftStatus::FormingAlliances
        } else {
            DraftStatus::Picking
        }
    }

    /// Team numbers of every captain and pick currently seated, in alliance order.
    pub fn seated_team_numbers(&self) -> Vec<TeamNumber> {
        self.alliances
            .iter()
            .flat_map(|a| a.members().map(|t| t.team_number))
            .collect()
    }
}
