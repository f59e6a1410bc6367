//! Downloadable results: a JSON document for the draft and playoffs, CSV for alliance rosters,
//! and CSV import of rankings.

use crate::logic::champion;
use crate::models::{
    BracketState, DraftState, Entrant, MatchId, SelectionError, Side, Team, TeamNumber, BYE,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Exported roster of one alliance.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExportedAlliance {
    pub alliance_number: usize,
    pub captain: Team,
    pub picks: Vec<Team>,
}

/// Captain reference in a playoff match: a team number, or "BYE".
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaptainRef {
    Team(TeamNumber),
    Bye(String),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExportedEntrant {
    pub seed: usize,
    pub captain: CaptainRef,
    pub picks: Vec<TeamNumber>,
}

impl From<&Entrant> for ExportedEntrant {
    fn from(entrant: &Entrant) -> Self {
        match entrant {
            Entrant::Alliance(a) => Self {
                seed: a.seed,
                captain: CaptainRef::Team(a.captain.team_number),
                picks: a.picks.iter().map(|t| t.team_number).collect(),
            },
            Entrant::Bye { seed } => Self {
                seed: *seed,
                captain: CaptainRef::Bye(BYE.to_string()),
                picks: Vec::new(),
            },
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExportedMatch {
    pub match_id: MatchId,
    pub label: String,
    pub red_alliance: Option<ExportedEntrant>,
    pub blue_alliance: Option<ExportedEntrant>,
    pub winner: Option<Side>,
    pub winner_alliance: Option<ExportedEntrant>,
}

/// Full export document.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SelectionExport {
    pub event: String,
    pub exported_at: DateTime<Utc>,
    pub alliances: Vec<ExportedAlliance>,
    /// Absent until the playoffs start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playoff_matches: Option<Vec<ExportedMatch>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub champion: Option<ExportedEntrant>,
}

/// Build the export document from the current draft and (optional) bracket.
pub fn export_selection(
    event: &str,
    draft: &DraftState,
    bracket: Option<&BracketState>,
    exported_at: DateTime<Utc>,
) -> SelectionExport {
    let alliances = draft
        .alliances
        .iter()
        .map(|a| ExportedAlliance {
            alliance_number: a.number,
            captain: a.captain.clone(),
            picks: a.filled_picks().cloned().collect(),
        })
        .collect();

    let playoff_matches = bracket.map(|b| {
        b.matches
            .values()
            .map(|m| ExportedMatch {
                match_id: m.id,
                label: m.label.clone(),
                red_alliance: m.red.as_ref().map(ExportedEntrant::from),
                blue_alliance: m.blue.as_ref().map(ExportedEntrant::from),
                winner: m.winner,
                winner_alliance: m.winning_entrant().map(ExportedEntrant::from),
            })
            .collect()
    });

    SelectionExport {
        event: event.to_string(),
        exported_at,
        alliances,
        playoff_matches,
        champion: bracket.and_then(champion).map(ExportedEntrant::from),
    }
}

/// Download name, e.g. `alliance-selection-2024casj-2024-04-06.json`.
pub fn export_file_name(prefix: &str, event: &str, date: NaiveDate, extension: &str) -> String {
    format!("{}-{}-{}.{}", prefix, event, date.format("%Y-%m-%d"), extension)
}

#[derive(Serialize)]
struct AllianceCsvRow<'a> {
    alliance: usize,
    role: &'static str,
    team_number: TeamNumber,
    nickname: &'a str,
    rank: u32,
}

/// Write alliance rosters as CSV: one row per captain or pick, in slot order.
pub fn write_alliances_csv<W: Write>(draft: &DraftState, writer: W) -> Result<(), SelectionError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for alliance in &draft.alliances {
        let captain = std::iter::once(("captain", &alliance.captain));
        let picks = alliance
            .picks
            .iter()
            .zip(["pick_1", "pick_2"])
            .filter_map(|(slot, role)| slot.as_ref().map(|t| (role, t)));
        for (role, team) in captain.chain(picks) {
            wtr.serialize(AllianceCsvRow {
                alliance: alliance.number,
                role,
                team_number: team.team_number,
                nickname: &team.nickname,
                rank: team.rank,
            })?;
        }
    }
    wtr.flush()
        .map_err(|e| SelectionError::Csv(e.to_string()))?;
    Ok(())
}

/// Read rankings from CSV with a `rank,team_number,nickname` header (any column order).
pub fn read_rankings_csv<R: Read>(reader: R) -> Result<Vec<Team>, SelectionError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut teams = Vec::new();
    for row in rdr.deserialize() {
        let team: Team = row?;
        teams.push(team);
    }
    Ok(teams)
}
