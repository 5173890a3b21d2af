//! Process-wide league store document.
//!
//! # Invariants
//! - `active_league_id`, when set, names a key of `leagues` after any
//!   mutation performed through the service layer.
//! - Wire field names (`leagues`, `activeLeagueId`) are stable for persisted
//!   documents.

use super::ids::LeagueId;
use super::league::League;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(default)]
    pub leagues: BTreeMap<LeagueId, League>,
    #[serde(default)]
    pub active_league_id: Option<LeagueId>,
}

impl Store {
    /// Returns the active league when the active id is set and present.
    pub fn active_league(&self) -> Option<&League> {
        self.active_league_id
            .as_ref()
            .and_then(|id| self.leagues.get(id))
    }

    pub fn active_league_mut(&mut self) -> Option<&mut League> {
        let id = self.active_league_id.as_ref()?;
        self.leagues.get_mut(id)
    }

    pub fn league(&self, id: &LeagueId) -> Option<&League> {
        self.leagues.get(id)
    }

    /// Leagues in key order, for switcher listings.
    pub fn leagues(&self) -> impl Iterator<Item = &League> {
        self.leagues.values()
    }

    /// Inserts or replaces a league under its own id.
    pub fn insert_league(&mut self, league: League) {
        self.leagues.insert(league.id.clone(), league);
    }
}

#[cfg(test)]
mod tests {
    use super::Store;
    use crate::model::ids::LeagueId;
    use crate::model::league::League;

    #[test]
    fn active_league_requires_existing_key() {
        let mut store = Store::default();
        assert!(store.active_league().is_none());

        store.insert_league(League::new(LeagueId::from("l1"), "One"));
        store.active_league_id = Some(LeagueId::from("missing"));
        assert!(store.active_league().is_none());

        store.active_league_id = Some(LeagueId::from("l1"));
        assert_eq!(store.active_league().map(|l| l.name.as_str()), Some("One"));
    }

    #[test]
    fn serializes_with_camel_case_wire_names() {
        let store = Store::default();
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "leagues": {}, "activeLeagueId": null })
        );
    }
}
