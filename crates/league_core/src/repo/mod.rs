//! Store persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the raw document slot contract used by the service layer.
//! - Keep JSON encoding, legacy migration, and SQL out of the service layer.
//!
//! # Invariants
//! - Every save writes one whole store snapshot.
//! - Legacy translation is pure and does not perform I/O.

pub mod legacy;
pub mod store_repo;
