//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage-agnostic catalog contract consumed by services.
//! - Provide an in-process backend and a SQLite backend behind that contract.
//!
//! # Invariants
//! - Both backends share one matching rule, one comparator set and one error
//!   vocabulary, so services behave identically on either.

pub mod contract;
pub mod memory;
pub mod query;
pub mod sqlite;
