//! Core domain logic for the duty tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Sessions: the recorded duty occurrence and its structural equality
//! - Settings: the queue modifier bitset
//! - Rosters: party member tokens and merging
//! - Names: identifier-to-name resolution used for display and search
//! - Queries: pure aggregations over recorded sessions

pub mod names;
pub mod query;
pub mod roster;
mod session;
mod settings;
pub mod time;
mod types;

pub use names::{NameCatalog, NameResolver, content_type_label};
pub use session::{DutySession, SCHEMA_VERSION, SessionKey, dedup_sessions};
pub use settings::DutySettings;
pub use types::{RouletteId, TerritoryId, ValidationError, WorldId, parse_bool};
