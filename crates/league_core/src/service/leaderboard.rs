//! Leaderboard derivation.
//!
//! Standings are never stored; they are recomputed from a league's pairs and
//! matches on every read.

use crate::model::ids::PairId;
use crate::model::league::League;

/// Points awarded to the winning pair of one match.
pub const POINTS_FOR_WIN: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    /// 1-based position.
    pub rank: usize,
    pub pair_id: PairId,
    pub pair_name: String,
    pub points: u32,
}

/// Ranks every pair of `league` by accumulated win points.
///
/// Matches whose winner is no longer a pair of the league are skipped, and
/// tied matches award nothing. Pairs with equal points keep pair-list order.
pub fn compute_leaderboard(league: &League) -> Vec<LeaderboardRow> {
    let mut standings: Vec<(&PairId, &str, u32)> = league
        .pairs
        .iter()
        .map(|pair| (&pair.id, pair.name.as_str(), 0))
        .collect();

    for m in &league.matches {
        let Some(winner) = m.winner() else {
            continue;
        };
        if let Some(entry) = standings.iter_mut().find(|(id, _, _)| *id == winner) {
            entry.2 += POINTS_FOR_WIN;
        }
    }

    // `sort_by` is stable, so equal points keep insertion order.
    standings.sort_by(|left, right| right.2.cmp(&left.2));

    standings
        .into_iter()
        .enumerate()
        .map(|(index, (pair_id, pair_name, points))| LeaderboardRow {
            rank: index + 1,
            pair_id: pair_id.clone(),
            pair_name: pair_name.to_string(),
            points,
        })
        .collect()
}
