//! League use-case services.
//!
//! # Responsibility
//! - Turn user commands into validated store mutations.
//! - Derive read projections such as the leaderboard.
//!
//! # See also
//! - `repo::store_repo` for the persistence contract.

pub mod leaderboard;
pub mod league_service;
