//! Data structures for alliance selection and the playoff bracket.

mod bracket;
mod draft;
mod error;
mod session;
mod team;

pub use bracket::{
    BracketConfig, BracketState, Entrant, FinalsFormat, FinalsStatus, Match, MatchId, MatchStatus,
    SeededAlliance, Side, BYE,
};
pub use draft::{
    Advance, Alliance, DraftState, DraftStatus, Phase, PickPointer, Round, MAX_ALLIANCES,
    MAX_PICKS_PER_ALLIANCE,
};
pub use error::{PickRejection, SelectionError, WinnerRejection};
pub use session::{SelectionSession, SessionId};
pub use team::{Team, TeamNumber};
