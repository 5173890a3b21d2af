//! Core domain logic for the doubles league manager.
//! This crate is the single source of truth for league invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::ids::{LeagueId, MatchId, PairId, PlayerId};
pub use model::league::{League, Match, Pair, Player, RemovalPlan, RemovalReport};
pub use model::store::Store;
pub use repo::legacy::{migrate_legacy, LegacyDocument, DEFAULT_LEAGUE_NAME};
pub use repo::store_repo::{
    load_store, save_store, LoadedStore, SqliteStoreRepository, StoreError, StoreRepository,
    StoreResult, DB_KEY,
};
pub use service::leaderboard::{compute_leaderboard, LeaderboardRow, POINTS_FOR_WIN};
pub use service::league_service::{parse_score, LeagueService, LeagueServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
