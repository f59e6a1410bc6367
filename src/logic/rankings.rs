//! Ranked team lists: validation, ordering, and generated test events.

use crate::models::{SelectionError, Team};
use std::collections::HashSet;

/// Validate and order rankings for the draft queue (stable sort by rank, best first).
pub fn prepare_rankings(rankings: &[Team]) -> Result<Vec<Team>, SelectionError> {
    if rankings.is_empty() {
        return Err(SelectionError::EmptyRankings);
    }
    let mut seen = HashSet::new();
    for team in rankings {
        if team.rank == 0 {
            return Err(SelectionError::InvalidRankings(format!(
                "team {} has rank 0",
                team.team_number
            )));
        }
        if !seen.insert(team.team_number) {
            return Err(SelectionError::InvalidRankings(format!(
                "team {} is listed more than once",
                team.team_number
            )));
        }
    }
    let mut queue = rankings.to_vec();
    queue.sort_by_key(|t| t.rank);
    Ok(queue)
}

/// Teams for a generated test event, ranked in team order (the first team is the top seed).
///
/// Keys ending in `test1`, `test2`, `test3` give teams 1-5, 6-10, 11-15.
/// Any other key gives no teams.
pub fn generate_test_rankings(event_key: &str) -> Vec<Team> {
    let numbers = if event_key.ends_with("test1") {
        1..6
    } else if event_key.ends_with("test2") {
        6..11
    } else if event_key.ends_with("test3") {
        11..16
    } else {
        return Vec::new();
    };
    numbers
        .zip(1..)
        .map(|(n, rank)| Team::new(n, format!("Test Team {n}"), rank))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_keys_rank_teams_in_order() {
        let teams = generate_test_rankings("2024test2");
        let ranked: Vec<(u32, u32)> = teams.iter().map(|t| (t.team_number, t.rank)).collect();
        assert_eq!(ranked, vec![(6, 1), (7, 2), (8, 3), (9, 4), (10, 5)]);
        assert_eq!(teams[0].nickname, "Test Team 6");
    }

    #[test]
    fn unknown_keys_give_nothing() {
        assert!(generate_test_rankings("2024casj").is_empty());
        assert!(generate_test_rankings("2024mock4000000000").is_empty());
    }

    #[test]
    fn prepare_rejects_duplicates_and_sorts() {
        let dup = vec![Team::new(1, "a", 1), Team::new(1, "b", 2)];
        assert!(matches!(
            prepare_rankings(&dup),
            Err(SelectionError::InvalidRankings(_))
        ));
        let unordered = vec![Team::new(5, "", 2), Team::new(9, "", 1)];
        let queue = prepare_rankings(&unordered).unwrap();
        assert_eq!(queue[0].team_number, 9);
    }
}
