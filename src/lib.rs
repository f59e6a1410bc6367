//! FRC alliance selection and playoff bracket: library with models and the draft/bracket engines.

pub mod export;
pub mod logic;
pub mod models;

pub use export::{
    export_file_name, export_selection, read_rankings_csv, write_alliances_csv, SelectionExport,
};
pub use logic::{
    advance, champion, finals_status, generate_test_rankings, initialize, pick, pick_into_slot,
    prepare_rankings, remove_pick, reset, seed_bracket, set_match_winner,
};
pub use models::{
    Advance, Alliance, BracketConfig, BracketState, DraftState, DraftStatus, Entrant,
    FinalsFormat, FinalsStatus, Match, MatchId, MatchStatus, Phase, PickPointer, PickRejection,
    Round, SeededAlliance, SelectionError, SelectionSession, SessionId, Side, Team, TeamNumber,
    WinnerRejection, BYE, MAX_ALLIANCES, MAX_PICKS_PER_ALLIANCE,
};
