//! Errors raised by the draft and bracket engines.

use crate::models::bracket::MatchId;
use crate::models::team::TeamNumber;

/// Why a pick was refused. The draft is left untouched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PickRejection {
    /// Team is not in the loaded rankings.
    UnknownTeam(TeamNumber),
    /// Team is already a captain or a pick.
    TeamUnavailable(TeamNumber),
    /// The targeted pick slot already holds a team.
    SlotFilled { alliance_index: usize, pick_index: usize },
    /// The targeted slot is not the one currently picking.
    NotOnTheClock { alliance_index: usize, pick_index: usize },
    /// No alliance or pick at the given position.
    NoSuchPick { alliance_index: usize, pick_index: usize },
    /// The draft already finished.
    SelectionComplete,
}

/// Why a match result was refused.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WinnerRejection {
    /// Match id is not part of this bracket (e.g. m15 in single-final mode).
    UnknownMatch(MatchId),
    /// One or both slots are still empty.
    NotReady(MatchId),
    /// Finals 3 is only played after a 1-1 split.
    TiebreakerLocked,
    /// Bye matches are decided automatically.
    ByeMatch(MatchId),
}

/// Errors that can occur during draft or bracket operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SelectionError {
    InvalidPick(PickRejection),
    InvalidWinnerAssignment(WinnerRejection),
    /// Draft cannot start without at least one ranked team.
    EmptyRankings,
    /// Rankings list is malformed (duplicate team, rank 0).
    InvalidRankings(String),
    /// No teams remain to fill a captain or pick slot. The draft is complete, not broken.
    DraftExhausted,
    /// Session or draft is not in a state that allows this action.
    InvalidState,
    /// CSV import/export failure.
    Csv(String),
}

impl std::fmt::Display for PickRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickRejection::UnknownTeam(t) => write!(f, "team {} is not in the rankings", t),
            PickRejection::TeamUnavailable(t) => write!(f, "team {} has already been selected", t),
            PickRejection::SlotFilled { alliance_index, pick_index } => write!(
                f,
                "alliance {} pick {} is already filled",
                alliance_index + 1,
                pick_index + 1
            ),
            PickRejection::NotOnTheClock { alliance_index, pick_index } => write!(
                f,
                "alliance {} pick {} is not the current pick",
                alliance_index + 1,
                pick_index + 1
            ),
            PickRejection::NoSuchPick { alliance_index, pick_index } => write!(
                f,
                "alliance {} has no pick {}",
                alliance_index + 1,
                pick_index + 1
            ),
            PickRejection::SelectionComplete => write!(f, "alliance selection is complete"),
        }
    }
}

impl std::fmt::Display for WinnerRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinnerRejection::UnknownMatch(id) => write!(f, "match {} is not in this bracket", id),
            WinnerRejection::NotReady(id) => write!(f, "match {} does not have both alliances yet", id),
            WinnerRejection::TiebreakerLocked => {
                write!(f, "Finals 3 is only played when the first two finals are split 1-1")
            }
            WinnerRejection::ByeMatch(id) => write!(f, "match {} is a bye and advances automatically", id),
        }
    }
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::InvalidPick(r) => write!(f, "Invalid pick: {}", r),
            SelectionError::InvalidWinnerAssignment(r) => write!(f, "Invalid winner: {}", r),
            SelectionError::EmptyRankings => write!(f, "Rankings are empty"),
            SelectionError::InvalidRankings(msg) => write!(f, "Invalid rankings: {}", msg),
            SelectionError::DraftExhausted => {
                write!(f, "No more teams available. Selection complete.")
            }
            SelectionError::InvalidState => write!(f, "Invalid state for this action"),
            SelectionError::Csv(msg) => write!(f, "CSV error: {}", msg),
        }
    }
}

impl std::error::Error for SelectionError {}

impl From<csv::Error> for SelectionError {
    fn from(e: csv::Error) -> Self {
        SelectionError::Csv(e.to_string())
    }
}
