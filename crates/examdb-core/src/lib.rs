//! examdb-core
//!
//! Domain types, engine traits, error taxonomy, configuration, the
//! recursive character splitter and the extraction-record loader shared
//! by every other examdb crate.

pub mod chunker;
pub mod config;
pub mod corpus;
pub mod error;
pub mod traits;
pub mod types;
