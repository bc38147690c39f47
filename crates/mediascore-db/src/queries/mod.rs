//! Database query modules.
//!
//! - ratings: rating record lookups by primary key or file-name hash, and upserts

pub mod ratings;
