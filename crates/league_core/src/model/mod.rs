//! League domain model.
//!
//! # Responsibility
//! - Define the store document, the league aggregate, and its entities.
//! - Keep referential-integrity helpers next to the data they protect.
//!
//! # Invariants
//! - Entities exist only inside the league that owns them.
//! - Removals cascade to dependents before the target is dropped.

pub mod ids;
pub mod league;
pub mod store;
