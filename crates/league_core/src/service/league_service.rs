//! League use-case service.
//!
//! # Responsibility
//! - Own the in-memory store and the repository it is persisted through.
//! - Validate and apply every league, player, pair, and match mutation.
//!
//! # Invariants
//! - A rejected command leaves the store untouched.
//! - Every successful mutation persists the full store before returning.
//! - Entity mutations only ever touch the active league.
//! - A failed save leaves memory ahead of storage; nothing is rolled back.

use crate::logging::error_chain;
use crate::model::ids::{LeagueId, MatchId, PairId, PlayerId};
use crate::model::league::{League, Match, Pair, Player, RemovalReport};
use crate::model::store::Store;
use crate::repo::store_repo::{load_store, save_store, StoreError, StoreRepository};
use crate::service::leaderboard::{compute_leaderboard, LeaderboardRow};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from league commands.
///
/// Everything except [`LeagueServiceError::Store`] is a user-facing
/// validation rejection.
#[derive(Debug)]
pub enum LeagueServiceError {
    /// No league is selected.
    NoActiveLeague,
    /// Name is blank after trim.
    EmptyName,
    DuplicatePlayerName(String),
    DuplicatePairName(String),
    /// One or both selections are blank.
    MissingSelection,
    SamePlayer,
    SamePair,
    LeagueNotFound(LeagueId),
    PlayerNotFound(PlayerId),
    PairNotFound(PairId),
    /// The same two players already form a pair.
    PairAlreadyExists,
    /// Player is already a member of another pair.
    PlayerAlreadyPaired(PlayerId),
    /// Score text is not a non-negative integer.
    InvalidScore(String),
    TiedScore(u32),
    /// Persistence failure after the in-memory change was applied.
    Store(StoreError),
}

impl LeagueServiceError {
    /// Returns whether this is an input rejection rather than a storage failure.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

impl Display for LeagueServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActiveLeague => write!(f, "no league is active; create or switch to a league first"),
            Self::EmptyName => write!(f, "name must not be blank"),
            Self::DuplicatePlayerName(name) => {
                write!(f, "player with this name already exists in this league: `{name}`")
            }
            Self::DuplicatePairName(name) => {
                write!(f, "a team with this name already exists in this league: `{name}`")
            }
            Self::MissingSelection => write!(f, "please select both entries"),
            Self::SamePlayer => write!(f, "please select two different players"),
            Self::SamePair => write!(f, "a team cannot play against itself"),
            Self::LeagueNotFound(id) => write!(f, "league not found: {id}"),
            Self::PlayerNotFound(id) => write!(f, "player not found: {id}"),
            Self::PairNotFound(id) => write!(f, "team not found: {id}"),
            Self::PairAlreadyExists => write!(f, "this pair of players already exists"),
            Self::PlayerAlreadyPaired(id) => write!(
                f,
                "player {id} is already in another team; each player can only be in one team per league"
            ),
            Self::InvalidScore(raw) => write!(f, "invalid score: `{raw}`"),
            Self::TiedScore(score) => {
                write!(f, "scores cannot be the same ({score}); please determine a winner")
            }
            Self::Store(_) => write!(f, "failed to persist league data"),
        }
    }
}

impl Error for LeagueServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for LeagueServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type ServiceResult<T> = Result<T, LeagueServiceError>;

/// Parses user-entered score text.
///
/// Accepts surrounding whitespace; rejects empty, negative, fractional, and
/// non-numeric input.
pub fn parse_score(raw: &str) -> ServiceResult<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| LeagueServiceError::InvalidScore(raw.to_string()))
}

/// Application state: the store plus the repository it persists through.
pub struct LeagueService<R: StoreRepository> {
    repo: R,
    store: Store,
}

impl<R: StoreRepository> LeagueService<R> {
    /// Wraps an already loaded store.
    pub fn new(repo: R, store: Store) -> Self {
        Self { repo, store }
    }

    /// Loads the persisted store, migrating legacy documents.
    ///
    /// # Errors
    /// Propagates [`StoreError::Parse`] for malformed data; callers should
    /// treat it as a fatal startup error.
    pub fn load(repo: R) -> Result<Self, StoreError> {
        let loaded = load_store(&repo)?;
        Ok(Self::new(repo, loaded.store))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn active_league(&self) -> Option<&League> {
        self.store.active_league()
    }

    /// Standings of the active league, or `None` without one.
    pub fn leaderboard(&self) -> Option<Vec<LeaderboardRow>> {
        self.active_league().map(compute_leaderboard)
    }

    /// Creates an empty league and makes it active.
    pub fn create_league(&mut self, name: &str) -> ServiceResult<LeagueId> {
        let name = non_blank(name)?;
        let league = League::new(LeagueId::generate(), name);
        let league_id = league.id.clone();

        self.store.insert_league(league);
        self.store.active_league_id = Some(league_id.clone());
        self.persist("league_create")?;

        info!("event=league_create module=service status=ok league_id={league_id}");
        Ok(league_id)
    }

    /// Makes an existing league active.
    ///
    /// Unknown ids are rejected and leave the current selection in place.
    pub fn switch_active_league(&mut self, league_id: &LeagueId) -> ServiceResult<()> {
        if self.store.league(league_id).is_none() {
            warn!("event=league_switch module=service status=rejected league_id={league_id}");
            return Err(LeagueServiceError::LeagueNotFound(league_id.clone()));
        }

        self.store.active_league_id = Some(league_id.clone());
        self.persist("league_switch")?;

        info!("event=league_switch module=service status=ok league_id={league_id}");
        Ok(())
    }

    /// Adds a player to the active league.
    pub fn add_player(&mut self, name: &str) -> ServiceResult<PlayerId> {
        let league = self.active_league_mut()?;
        let name = non_blank(name)?;
        if league.has_player_named(name) {
            return Err(LeagueServiceError::DuplicatePlayerName(name.to_string()));
        }

        let player = Player {
            id: PlayerId::generate(),
            name: name.to_string(),
        };
        let player_id = player.id.clone();
        league.players.push(player);
        let league_id = league.id.clone();
        self.persist("player_add")?;

        info!(
            "event=player_add module=service status=ok league_id={league_id} player_id={player_id}"
        );
        Ok(player_id)
    }

    /// Removes a player together with their pair and that pair's matches.
    ///
    /// Confirmation is the caller's responsibility.
    pub fn delete_player(&mut self, player_id: &PlayerId) -> ServiceResult<RemovalReport> {
        let league = self.active_league_mut()?;
        let plan = league
            .plan_player_removal(player_id)
            .ok_or_else(|| LeagueServiceError::PlayerNotFound(player_id.clone()))?;
        let report = league.apply_removal(plan);
        let league_id = league.id.clone();
        self.persist("player_delete")?;

        log_removal("player_delete", &league_id, &report);
        Ok(report)
    }

    /// Creates a pair from two unpaired players of the active league.
    ///
    /// # Contract
    /// Checks run in order: blank name, duplicate name, blank selection,
    /// same player twice, unknown player, existing pair of the same players,
    /// either player already paired.
    pub fn create_pair(
        &mut self,
        name: &str,
        player1_id: &PlayerId,
        player2_id: &PlayerId,
    ) -> ServiceResult<PairId> {
        let league = self.active_league_mut()?;
        let name = non_blank(name)?;
        if league.has_pair_named(name) {
            return Err(LeagueServiceError::DuplicatePairName(name.to_string()));
        }
        if player1_id.is_blank() || player2_id.is_blank() {
            return Err(LeagueServiceError::MissingSelection);
        }
        if player1_id == player2_id {
            return Err(LeagueServiceError::SamePlayer);
        }
        for player_id in [player1_id, player2_id] {
            if league.player(player_id).is_none() {
                return Err(LeagueServiceError::PlayerNotFound(player_id.clone()));
            }
        }
        if league
            .pairs
            .iter()
            .any(|pair| pair.same_members(player1_id, player2_id))
        {
            return Err(LeagueServiceError::PairAlreadyExists);
        }
        if let Some(paired) = [player1_id, player2_id]
            .into_iter()
            .find(|player_id| league.pair_of(player_id).is_some())
        {
            return Err(LeagueServiceError::PlayerAlreadyPaired(paired.clone()));
        }

        let pair = Pair {
            id: PairId::generate(),
            name: name.to_string(),
            player1_id: player1_id.clone(),
            player2_id: player2_id.clone(),
        };
        let pair_id = pair.id.clone();
        league.pairs.push(pair);
        let league_id = league.id.clone();
        self.persist("pair_create")?;

        info!("event=pair_create module=service status=ok league_id={league_id} pair_id={pair_id}");
        Ok(pair_id)
    }

    /// Removes a pair and every match it played.
    ///
    /// Confirmation is the caller's responsibility.
    pub fn delete_pair(&mut self, pair_id: &PairId) -> ServiceResult<RemovalReport> {
        let league = self.active_league_mut()?;
        let plan = league
            .plan_pair_removal(pair_id)
            .ok_or_else(|| LeagueServiceError::PairNotFound(pair_id.clone()))?;
        let report = league.apply_removal(plan);
        let league_id = league.id.clone();
        self.persist("pair_delete")?;

        log_removal("pair_delete", &league_id, &report);
        Ok(report)
    }

    /// Records a decided match between two pairs of the active league.
    pub fn record_match(
        &mut self,
        pair1_id: &PairId,
        pair2_id: &PairId,
        pair1_score: u32,
        pair2_score: u32,
    ) -> ServiceResult<MatchId> {
        self.check_match_selection(pair1_id, pair2_id)?;
        self.push_match(pair1_id, pair2_id, pair1_score, pair2_score)
    }

    /// Same as [`Self::record_match`] but takes raw score text.
    ///
    /// Selection is checked before the scores are parsed.
    pub fn record_match_from_input(
        &mut self,
        pair1_id: &PairId,
        pair2_id: &PairId,
        pair1_score: &str,
        pair2_score: &str,
    ) -> ServiceResult<MatchId> {
        self.check_match_selection(pair1_id, pair2_id)?;
        let score1 = parse_score(pair1_score)?;
        let score2 = parse_score(pair2_score)?;
        self.push_match(pair1_id, pair2_id, score1, score2)
    }

    /// Active league exists, both pairs are chosen, distinct, and present.
    fn check_match_selection(
        &mut self,
        pair1_id: &PairId,
        pair2_id: &PairId,
    ) -> ServiceResult<()> {
        let league = self.active_league_mut()?;
        if pair1_id.is_blank() || pair2_id.is_blank() {
            return Err(LeagueServiceError::MissingSelection);
        }
        if pair1_id == pair2_id {
            return Err(LeagueServiceError::SamePair);
        }
        for pair_id in [pair1_id, pair2_id] {
            if league.pair(pair_id).is_none() {
                return Err(LeagueServiceError::PairNotFound(pair_id.clone()));
            }
        }
        Ok(())
    }

    /// Appends a match whose selection already passed `check_match_selection`.
    fn push_match(
        &mut self,
        pair1_id: &PairId,
        pair2_id: &PairId,
        pair1_score: u32,
        pair2_score: u32,
    ) -> ServiceResult<MatchId> {
        if pair1_score == pair2_score {
            return Err(LeagueServiceError::TiedScore(pair1_score));
        }

        let league = self.active_league_mut()?;
        let recorded = Match {
            id: MatchId::generate(),
            pair1_id: pair1_id.clone(),
            pair2_id: pair2_id.clone(),
            pair1_score,
            pair2_score,
        };
        let match_id = recorded.id.clone();
        league.matches.push(recorded);
        let league_id = league.id.clone();
        self.persist("match_record")?;

        info!(
            "event=match_record module=service status=ok league_id={league_id} match_id={match_id}"
        );
        Ok(match_id)
    }

    fn active_league_mut(&mut self) -> ServiceResult<&mut League> {
        self.store
            .active_league_mut()
            .ok_or(LeagueServiceError::NoActiveLeague)
    }

    fn persist(&self, event: &'static str) -> ServiceResult<()> {
        save_store(&self.repo, &self.store).map_err(|err| {
            warn!(
                "event={event} module=service status=error error_code=persist_failed error={}",
                error_chain(&err)
            );
            LeagueServiceError::Store(err)
        })
    }
}

fn non_blank(name: &str) -> ServiceResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LeagueServiceError::EmptyName);
    }
    Ok(trimmed)
}

fn log_removal(event: &'static str, league_id: &LeagueId, report: &RemovalReport) {
    info!(
        "event={event} module=service status=ok league_id={league_id} removed_player={} removed_pairs={} removed_matches={}",
        report.player.is_some(),
        report.pairs.len(),
        report.matches.len()
    );
}
