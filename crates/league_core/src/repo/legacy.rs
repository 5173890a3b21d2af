//! Translation from the legacy single-league document layout.
//!
//! Early documents stored `players`, `pairs`, and `matches` at the top level
//! with no league wrapper. [`migrate_legacy`] maps that shape onto the
//! multi-league [`Store`] without touching storage.

use crate::model::ids::{LeagueId, PairId, PlayerId};
use crate::model::league::{League, Match, Pair, Player};
use crate::model::store::Store;
use serde::Deserialize;
use serde_json::Value;

/// Name given to the league synthesized from a legacy document.
pub const DEFAULT_LEAGUE_NAME: &str = "My First League";

const UNKNOWN_MEMBER_NAME: &str = "Unknown";

/// Flat pre-league document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LegacyDocument {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub pairs: Vec<LegacyPair>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

/// Legacy pairs could be stored without a team name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPair {
    pub id: PairId,
    #[serde(default)]
    pub name: Option<String>,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
}

/// Returns whether a decoded JSON document uses the legacy flat layout.
///
/// A document is legacy when it has no usable `leagues` entry but carries a
/// `players` entry.
pub fn is_legacy_document(value: &Value) -> bool {
    let has_leagues = value.get("leagues").is_some_and(|v| !v.is_null());
    let has_players = value.get("players").is_some_and(|v| !v.is_null());
    !has_leagues && has_players
}

/// Synthesizes one active league from a legacy document.
///
/// Unnamed pairs are named after their members, using `Unknown` for member
/// ids that do not resolve.
pub fn migrate_legacy(legacy: LegacyDocument, league_id: LeagueId) -> Store {
    let LegacyDocument {
        players,
        pairs,
        matches,
    } = legacy;

    let pairs = pairs
        .into_iter()
        .map(|pair| {
            let name = match pair.name {
                Some(name) if !name.is_empty() => name,
                _ => format!(
                    "{} & {}",
                    member_name(&players, &pair.player1_id),
                    member_name(&players, &pair.player2_id)
                ),
            };
            Pair {
                id: pair.id,
                name,
                player1_id: pair.player1_id,
                player2_id: pair.player2_id,
            }
        })
        .collect();

    let mut league = League::new(league_id.clone(), DEFAULT_LEAGUE_NAME);
    league.players = players;
    league.pairs = pairs;
    league.matches = matches;

    let mut store = Store::default();
    store.insert_league(league);
    store.active_league_id = Some(league_id);
    store
}

fn member_name<'a>(players: &'a [Player], player_id: &PlayerId) -> &'a str {
    players
        .iter()
        .find(|player| &player.id == player_id)
        .map_or(UNKNOWN_MEMBER_NAME, |player| player.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_flat_layout_only_without_leagues() {
        assert!(is_legacy_document(&json!({ "players": [] })));
        assert!(is_legacy_document(&json!({ "leagues": null, "players": [] })));
        assert!(!is_legacy_document(&json!({ "leagues": {}, "players": [] })));
        assert!(!is_legacy_document(&json!({ "activeLeagueId": null })));
    }

    #[test]
    fn unnamed_pairs_are_named_after_members() {
        let legacy: LegacyDocument = serde_json::from_value(json!({
            "players": [
                { "id": "p1", "name": "Ana" },
                { "id": "p2", "name": "Ben" }
            ],
            "pairs": [
                { "id": "a", "player1Id": "p1", "player2Id": "p2" },
                { "id": "b", "name": "", "player1Id": "p1", "player2Id": "gone" },
                { "id": "c", "name": "Named", "player1Id": "p2", "player2Id": "p1" }
            ]
        }))
        .unwrap();

        let store = migrate_legacy(legacy, LeagueId::from("default"));
        let league = store.active_league().expect("migrated league is active");

        assert_eq!(league.name, DEFAULT_LEAGUE_NAME);
        let names: Vec<&str> = league.pairs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ana & Ben", "Ana & Unknown", "Named"]);
        assert!(league.matches.is_empty());
    }

    #[test]
    fn missing_arrays_default_to_empty() {
        let legacy: LegacyDocument = serde_json::from_value(json!({ "players": [] })).unwrap();
        let store = migrate_legacy(legacy, LeagueId::from("x"));

        assert_eq!(store.leagues.len(), 1);
        assert_eq!(store.active_league_id, Some(LeagueId::from("x")));
    }
}
