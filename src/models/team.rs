//! Team data as delivered by the event rankings.

use serde::{Deserialize, Serialize};

/// FRC team number (e.g. 254).
pub type TeamNumber = u32;

/// A ranked team at an event. Immutable once loaded; the draft never re-sorts or edits it.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_number: TeamNumber,
    #[serde(default)]
    pub nickname: String,
    /// 1 is the top seed.
    pub rank: u32,
}

impl Team {
    pub fn new(team_number: TeamNumber, nickname: impl Into<String>, rank: u32) -> Self {
        Self {
            team_number,
            nickname: nickname.into(),
            rank,
        }
    }
}
