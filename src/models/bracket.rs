//! Double-elimination playoff bracket: match ids, entrants, and bracket state.

use crate::models::draft::Alliance;
use crate::models::team::Team;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Captain label used for a bye in exports.
pub const BYE: &str = "BYE";

/// Fixed bracket node. Upper round 1 is m1..m4; finals are m14..m16.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchId {
    M1,
    M2,
    M3,
    M4,
    M5,
    M6,
    M7,
    M8,
    M9,
    M10,
    M11,
    M12,
    M13,
    M14,
    M15,
    M16,
}

impl MatchId {
    pub const ALL: [MatchId; 16] = [
        MatchId::M1,
        MatchId::M2,
        MatchId::M3,
        MatchId::M4,
        MatchId::M5,
        MatchId::M6,
        MatchId::M7,
        MatchId::M8,
        MatchId::M9,
        MatchId::M10,
        MatchId::M11,
        MatchId::M12,
        MatchId::M13,
        MatchId::M14,
        MatchId::M15,
        MatchId::M16,
    ];

    /// 1..=16
    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Display label for this match under the given finals format.
    pub fn label(self, finals: FinalsFormat) -> &'static str {
        use MatchId::*;
        match self {
            M1 | M2 | M3 | M4 => "Upper Round 1",
            M5 | M6 => "Lower Round 1",
            M7 | M8 => "Upper Round 2",
            M9 | M10 => "Lower Round 2",
            M11 => "Upper Semi-Final",
            M12 => "Lower Round 3",
            M13 => "Lower Final",
            M14 => match finals {
                FinalsFormat::BestOfThree => "Finals 1",
                FinalsFormat::SingleFinal => "Finals",
            },
            M15 => "Finals 2",
            M16 => "Finals 3",
        }
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m{}", self.number())
    }
}

impl std::str::FromStr for MatchId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .strip_prefix(['m', 'M'])
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(MatchId::from_number)
            .ok_or_else(|| format!("unknown match id '{}'", s))
    }
}

/// Alliance colour within a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }
}

/// An alliance as it enters the playoffs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeededAlliance {
    pub seed: usize,
    pub captain: Team,
    pub picks: Vec<Team>,
}

impl SeededAlliance {
    pub fn from_alliance(seed: usize, alliance: &Alliance) -> Self {
        Self {
            seed,
            captain: alliance.captain.clone(),
            picks: alliance.filled_picks().cloned().collect(),
        }
    }
}

/// Occupant of a match slot: a real alliance or a bye for an unfilled seed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entrant {
    Alliance(SeededAlliance),
    Bye { seed: usize },
}

impl Entrant {
    pub fn seed(&self) -> usize {
        match self {
            Entrant::Alliance(a) => a.seed,
            Entrant::Bye { seed } => *seed,
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Entrant::Bye { .. })
    }

    pub fn as_alliance(&self) -> Option<&SeededAlliance> {
        match self {
            Entrant::Alliance(a) => Some(a),
            Entrant::Bye { .. } => None,
        }
    }
}

/// Per-match lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// One or both slots empty.
    Pending,
    /// Both slots filled, no winner.
    Ready,
    Decided,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub red: Option<Entrant>,
    pub blue: Option<Entrant>,
    pub winner: Option<Side>,
    pub label: String,
}

impl Match {
    pub fn new(id: MatchId, finals: FinalsFormat) -> Self {
        Self {
            id,
            red: None,
            blue: None,
            winner: None,
            label: id.label(finals).to_string(),
        }
    }

    pub fn status(&self) -> MatchStatus {
        match (&self.red, &self.blue, self.winner) {
            (Some(_), Some(_), Some(_)) => MatchStatus::Decided,
            (Some(_), Some(_), None) => MatchStatus::Ready,
            _ => MatchStatus::Pending,
        }
    }

    pub fn slot(&self, side: Side) -> Option<&Entrant> {
        match side {
            Side::Red => self.red.as_ref(),
            Side::Blue => self.blue.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut Option<Entrant> {
        match side {
            Side::Red => &mut self.red,
            Side::Blue => &mut self.blue,
        }
    }

    pub fn winning_entrant(&self) -> Option<&Entrant> {
        self.winner.and_then(|side| self.slot(side))
    }

    pub fn losing_entrant(&self) -> Option<&Entrant> {
        self.winner.and_then(|side| self.slot(side.opposite()))
    }

    /// Either slot holds a bye.
    pub fn has_bye(&self) -> bool {
        self.red.as_ref().is_some_and(Entrant::is_bye) || self.blue.as_ref().is_some_and(Entrant::is_bye)
    }
}

/// How the championship is decided.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalsFormat {
    /// Finals 1, Finals 2 and a Finals 3 tiebreaker only reachable on a 1-1 split.
    #[default]
    BestOfThree,
    /// One final match (m14).
    SingleFinal,
}

impl std::str::FromStr for FinalsFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best_of_three" | "bo3" => Ok(FinalsFormat::BestOfThree),
            "single_final" | "single" => Ok(FinalsFormat::SingleFinal),
            other => Err(format!("unknown finals format '{}'", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketConfig {
    #[serde(default)]
    pub finals: FinalsFormat,
    /// Decide matches against a bye automatically for the real alliance.
    #[serde(default = "default_auto_advance_byes")]
    pub auto_advance_byes: bool,
}

fn default_auto_advance_byes() -> bool {
    true
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            finals: FinalsFormat::default(),
            auto_advance_byes: default_auto_advance_byes(),
        }
    }
}

/// Finals outcome so far. `champion` is the winning colour of the finals series.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FinalsStatus {
    pub champion: Option<Side>,
    pub needs_tiebreaker: bool,
}

/// Every match in the bracket, keyed by id. Slots change only through seeding and propagation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketState {
    pub config: BracketConfig,
    pub matches: BTreeMap<MatchId, Match>,
}

impl BracketState {
    pub fn get(&self, id: MatchId) -> Option<&Match> {
        self.matches.get(&id)
    }

    pub fn winner(&self, id: MatchId) -> Option<Side> {
        self.matches.get(&id).and_then(|m| m.winner)
    }

    pub fn status(&self, id: MatchId) -> Option<MatchStatus> {
        self.matches.get(&id).map(Match::status)
    }
}
