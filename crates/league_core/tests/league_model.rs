use league_core::{League, LeagueId, Match, MatchId, Pair, PairId, Player, PlayerId, Store};
use serde_json::json;

#[test]
fn league_deserializes_from_persisted_shape() {
    let value = json!({
        "id": "lg1",
        "name": "Club",
        "players": [{ "id": "p1", "name": "Ana" }, { "id": "p2", "name": "Ben" }],
        "pairs": [{ "id": "a", "name": "Smash", "player1Id": "p1", "player2Id": "p2" }],
        "matches": []
    });

    let league: League = serde_json::from_value(value).unwrap();
    assert_eq!(league.id, LeagueId::from("lg1"));
    assert_eq!(league.players[1].name, "Ben");
    assert_eq!(
        league.pair_of(&PlayerId::from("p2")).map(|p| &p.id),
        Some(&PairId::from("a"))
    );
}

#[test]
fn league_missing_entity_arrays_defaults_to_empty() {
    let league: League = serde_json::from_value(json!({ "id": "x", "name": "Bare" })).unwrap();
    assert!(league.players.is_empty());
    assert!(league.pairs.is_empty());
    assert!(league.matches.is_empty());
}

#[test]
fn negative_scores_do_not_deserialize() {
    let value = json!({
        "id": "m", "pair1Id": "a", "pair2Id": "b", "pair1Score": -1, "pair2Score": 3
    });
    assert!(serde_json::from_value::<Match>(value).is_err());
}

#[test]
fn match_history_is_newest_first() {
    let mut league = League::new(LeagueId::from("l"), "L");
    for (index, id) in ["m1", "m2", "m3"].into_iter().enumerate() {
        league.matches.push(Match {
            id: MatchId::from(id),
            pair1_id: PairId::from("a"),
            pair2_id: PairId::from("b"),
            pair1_score: 21,
            pair2_score: index as u32,
        });
    }

    let order: Vec<&str> = league.match_history().map(|m| m.id.as_str()).collect();
    assert_eq!(order, vec!["m3", "m2", "m1"]);
}

#[test]
fn apply_removal_reports_only_what_existed() {
    let mut league = League::new(LeagueId::from("l"), "L");
    league.players.push(Player {
        id: PlayerId::from("p1"),
        name: "Ana".to_string(),
    });
    league.pairs.push(Pair {
        id: PairId::from("a"),
        name: "A".to_string(),
        player1_id: PlayerId::from("p1"),
        player2_id: PlayerId::from("p2"),
    });

    let plan = league.plan_player_removal(&PlayerId::from("p1")).unwrap();
    let report = league.apply_removal(plan.clone());
    assert_eq!(report.pairs, plan.pairs);
    assert!(report.matches.is_empty());
    assert!(!report.is_empty());

    let again = league.apply_removal(plan);
    assert!(again.is_empty());
}

#[test]
fn store_round_trips_through_json() {
    let mut store = Store::default();
    store.insert_league(League::new(LeagueId::from("l1"), "One"));
    store.insert_league(League::new(LeagueId::from("l2"), "Two"));
    store.active_league_id = Some(LeagueId::from("l2"));

    let text = serde_json::to_string(&store).unwrap();
    let decoded: Store = serde_json::from_str(&text).unwrap();
    assert_eq!(decoded, store);
    assert_eq!(
        decoded.leagues().map(|l| l.name.as_str()).collect::<Vec<_>>(),
        vec!["One", "Two"]
    );
}
