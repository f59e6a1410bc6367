//! One event's live alliance selection and, once the draft is done, its playoff bracket.

use crate::logic::{initialize, pick, pick_into_slot, remove_pick, reset, seed_bracket, set_match_winner};
use crate::models::bracket::{BracketConfig, BracketState, MatchId, Side};
use crate::models::draft::{Advance, DraftState};
use crate::models::error::SelectionError;
use crate::models::team::{Team, TeamNumber};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a selection session.
pub type SessionId = Uuid;

/// Draft plus bracket for a single event. The host owns exactly one per session and
/// serializes calls into it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectionSession {
    pub id: SessionId,
    /// Event key (e.g. "2024casj").
    pub event: String,
    /// Rankings as loaded; reset starts from these.
    pub rankings: Vec<Team>,
    pub draft: DraftState,
    pub bracket_config: BracketConfig,
    /// None until the playoffs are started.
    pub bracket: Option<BracketState>,
}

impl SelectionSession {
    /// Start a draft for `event` from its rankings.
    pub fn new(
        event: impl Into<String>,
        rankings: Vec<Team>,
        bracket_config: BracketConfig,
    ) -> Result<Self, SelectionError> {
        let draft = initialize(&rankings)?;
        Ok(Self {
            id: Uuid::new_v4(),
            event: event.into(),
            rankings,
            draft,
            bracket_config,
            bracket: None,
        })
    }

    /// Pick for the alliance on the clock. Draft edits are closed once playoffs start.
    pub fn pick(&mut self, team_number: TeamNumber) -> Result<Advance, SelectionError> {
        self.ensure_draft_open()?;
        pick(&mut self.draft, team_number)
    }

    pub fn pick_into_slot(
        &mut self,
        alliance_index: usize,
        pick_index: usize,
        team_number: TeamNumber,
    ) -> Result<Advance, SelectionError> {
        self.ensure_draft_open()?;
        pick_into_slot(&mut self.draft, alliance_index, pick_index, team_number)
    }

    pub fn remove_pick(
        &mut self,
        alliance_index: usize,
        pick_index: usize,
    ) -> Result<Vec<TeamNumber>, SelectionError> {
        self.ensure_draft_open()?;
        remove_pick(&mut self.draft, alliance_index, pick_index)
    }

    /// Back to a fresh draft from the loaded rankings; drops any bracket.
    pub fn reset(&mut self) -> Result<(), SelectionError> {
        reset(&mut self.draft, &self.rankings)?;
        self.bracket = None;
        Ok(())
    }

    /// Seed the playoffs from the completed draft.
    pub fn start_bracket(&mut self) -> Result<&BracketState, SelectionError> {
        if !self.draft.complete || self.bracket.is_some() {
            return Err(SelectionError::InvalidState);
        }
        let bracket = seed_bracket(&self.draft.alliances, self.bracket_config);
        Ok(&*self.bracket.insert(bracket))
    }

    pub fn set_match_winner(&mut self, match_id: MatchId, side: Side) -> Result<(), SelectionError> {
        let bracket = self.bracket.as_mut().ok_or(SelectionError::InvalidState)?;
        set_match_winner(bracket, match_id, side)
    }

    fn ensure_draft_open(&self) -> Result<(), SelectionError> {
        if self.bracket.is_some() {
            return Err(SelectionError::InvalidState);
        }
        Ok(())
    }
}
