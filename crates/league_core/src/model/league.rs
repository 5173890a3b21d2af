//! League aggregate and its owned entities.
//!
//! # Responsibility
//! - Define players, pairs, and matches owned by exactly one league.
//! - Plan and apply cascading removals without leaving dangling references.
//!
//! # Invariants
//! - Every `Pair` references two distinct players of the same league.
//! - Every `Match` references two distinct pairs of the same league.
//! - Removal always drops matches first, then pairs, then the player.

use super::ids::{LeagueId, MatchId, PairId, PlayerId};
use serde::{Deserialize, Serialize};

/// Display fallback for player lookups that miss.
pub const UNKNOWN_PLAYER_NAME: &str = "Unknown Player";
/// Display fallback for pair lookups that miss.
pub const UNKNOWN_PAIR_NAME: &str = "Unknown Team";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

/// A doubles team of exactly two distinct players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    pub id: PairId,
    pub name: String,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
}

impl Pair {
    pub fn has_member(&self, player_id: &PlayerId) -> bool {
        &self.player1_id == player_id || &self.player2_id == player_id
    }

    /// Returns whether this pair is made of the same two players, in any order.
    pub fn same_members(&self, first: &PlayerId, second: &PlayerId) -> bool {
        (&self.player1_id == first && &self.player2_id == second)
            || (&self.player1_id == second && &self.player2_id == first)
    }
}

/// One recorded result between two pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub pair1_id: PairId,
    pub pair2_id: PairId,
    pub pair1_score: u32,
    pub pair2_score: u32,
}

impl Match {
    pub fn involves(&self, pair_id: &PairId) -> bool {
        &self.pair1_id == pair_id || &self.pair2_id == pair_id
    }

    /// Returns the winning pair, or `None` for a tied score.
    pub fn winner(&self) -> Option<&PairId> {
        match self.pair1_score.cmp(&self.pair2_score) {
            std::cmp::Ordering::Greater => Some(&self.pair1_id),
            std::cmp::Ordering::Less => Some(&self.pair2_id),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Dependents computed before a removal is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalPlan {
    pub player: Option<PlayerId>,
    pub pairs: Vec<PairId>,
    pub matches: Vec<MatchId>,
}

/// Entities actually removed by [`League::apply_removal`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub player: Option<PlayerId>,
    pub pairs: Vec<PairId>,
    pub matches: Vec<MatchId>,
}

impl RemovalReport {
    pub fn is_empty(&self) -> bool {
        self.player.is_none() && self.pairs.is_empty() && self.matches.is_empty()
    }
}

/// Aggregate root: an isolated collection of players, pairs, and matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub pairs: Vec<Pair>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl League {
    /// Creates an empty league.
    pub fn new(id: LeagueId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            players: Vec::new(),
            pairs: Vec::new(),
            matches: Vec::new(),
        }
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| &player.id == player_id)
    }

    pub fn pair(&self, pair_id: &PairId) -> Option<&Pair> {
        self.pairs.iter().find(|pair| &pair.id == pair_id)
    }

    pub fn player_name(&self, player_id: &PlayerId) -> &str {
        self.player(player_id)
            .map_or(UNKNOWN_PLAYER_NAME, |player| player.name.as_str())
    }

    pub fn pair_name(&self, pair_id: &PairId) -> &str {
        self.pair(pair_id)
            .map_or(UNKNOWN_PAIR_NAME, |pair| pair.name.as_str())
    }

    /// Case-insensitive lookup used by uniqueness checks.
    pub fn has_player_named(&self, name: &str) -> bool {
        self.players
            .iter()
            .any(|player| names_match(player.name.as_str(), name))
    }

    /// Case-insensitive lookup used by uniqueness checks.
    pub fn has_pair_named(&self, name: &str) -> bool {
        self.pairs
            .iter()
            .any(|pair| names_match(pair.name.as_str(), name))
    }

    /// Returns the pair a player belongs to, if any.
    pub fn pair_of(&self, player_id: &PlayerId) -> Option<&Pair> {
        self.pairs.iter().find(|pair| pair.has_member(player_id))
    }

    /// Matches in newest-first order.
    pub fn match_history(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().rev()
    }

    /// Computes everything that must go before `player_id` can be removed.
    ///
    /// Returns `None` when the player does not exist.
    pub fn plan_player_removal(&self, player_id: &PlayerId) -> Option<RemovalPlan> {
        self.player(player_id)?;

        let pairs: Vec<PairId> = self
            .pairs
            .iter()
            .filter(|pair| pair.has_member(player_id))
            .map(|pair| pair.id.clone())
            .collect();

        Some(RemovalPlan {
            player: Some(player_id.clone()),
            matches: self.matches_involving(&pairs),
            pairs,
        })
    }

    /// Computes the matches that must go before `pair_id` can be removed.
    ///
    /// Returns `None` when the pair does not exist.
    pub fn plan_pair_removal(&self, pair_id: &PairId) -> Option<RemovalPlan> {
        self.pair(pair_id)?;
        let pairs = vec![pair_id.clone()];

        Some(RemovalPlan {
            player: None,
            matches: self.matches_involving(&pairs),
            pairs,
        })
    }

    /// Removes planned entities in dependency order: matches, pairs, player.
    pub fn apply_removal(&mut self, plan: RemovalPlan) -> RemovalReport {
        let mut report = RemovalReport::default();

        self.matches.retain(|m| {
            let doomed = plan.matches.contains(&m.id);
            if doomed {
                report.matches.push(m.id.clone());
            }
            !doomed
        });

        self.pairs.retain(|pair| {
            let doomed = plan.pairs.contains(&pair.id);
            if doomed {
                report.pairs.push(pair.id.clone());
            }
            !doomed
        });

        if let Some(player_id) = plan.player {
            let before = self.players.len();
            self.players.retain(|player| player.id != player_id);
            if self.players.len() != before {
                report.player = Some(player_id);
            }
        }

        report
    }

    fn matches_involving(&self, pairs: &[PairId]) -> Vec<MatchId> {
        self.matches
            .iter()
            .filter(|m| pairs.iter().any(|pair_id| m.involves(pair_id)))
            .map(|m| m.id.clone())
            .collect()
    }
}

/// Compares display names the way uniqueness rules expect.
pub fn names_match(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_league() -> League {
        let mut league = League::new(LeagueId::from("l1"), "Tuesday Club");
        for (id, name) in [("p1", "Ana"), ("p2", "Ben"), ("p3", "Cy"), ("p4", "Dee")] {
            league.players.push(Player {
                id: PlayerId::from(id),
                name: name.to_string(),
            });
        }
        league.pairs.push(Pair {
            id: PairId::from("a"),
            name: "Smash".to_string(),
            player1_id: PlayerId::from("p1"),
            player2_id: PlayerId::from("p2"),
        });
        league.pairs.push(Pair {
            id: PairId::from("b"),
            name: "Drop".to_string(),
            player1_id: PlayerId::from("p3"),
            player2_id: PlayerId::from("p4"),
        });
        league.matches.push(Match {
            id: MatchId::from("m1"),
            pair1_id: PairId::from("a"),
            pair2_id: PairId::from("b"),
            pair1_score: 21,
            pair2_score: 15,
        });
        league
    }

    #[test]
    fn winner_follows_higher_score() {
        let league = sample_league();
        assert_eq!(league.matches[0].winner(), Some(&PairId::from("a")));

        let mut tied = league.matches[0].clone();
        tied.pair2_score = 21;
        assert_eq!(tied.winner(), None);
    }

    #[test]
    fn player_removal_plan_covers_pair_and_matches() {
        let league = sample_league();
        let plan = league
            .plan_player_removal(&PlayerId::from("p2"))
            .expect("player exists");

        assert_eq!(plan.pairs, vec![PairId::from("a")]);
        assert_eq!(plan.matches, vec![MatchId::from("m1")]);
    }

    #[test]
    fn plan_for_missing_player_is_none() {
        assert!(sample_league()
            .plan_player_removal(&PlayerId::from("ghost"))
            .is_none());
    }

    #[test]
    fn name_lookups_fall_back_for_unknown_ids() {
        let league = sample_league();
        assert_eq!(league.player_name(&PlayerId::from("zz")), UNKNOWN_PLAYER_NAME);
        assert_eq!(league.pair_name(&PairId::from("zz")), UNKNOWN_PAIR_NAME);
        assert_eq!(league.pair_name(&PairId::from("b")), "Drop");
    }

    #[test]
    fn names_match_ignores_case_and_padding() {
        assert!(names_match("Sam", " sam "));
        assert!(!names_match("Sam", "Samantha"));
    }
}
