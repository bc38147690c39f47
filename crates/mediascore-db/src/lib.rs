//! Mediascore-DB: Rating cache stores, migrations, and query operations
//!
//! This crate persists resolved rating records in two independent SQLite
//! files, one per media category, using rusqlite with r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `queries` - Record lookups and upserts
//! - `store` - Category-scoped cache handles with a degraded no-cache mode
//!
//! # Example
//!
//! ```no_run
//! use mediascore_common::MediaCategory;
//! use mediascore_db::store::RatingCache;
//! use std::path::Path;
//!
//! let cache = RatingCache::open(Path::new("/home/me/.cache/MediaScore"));
//! let movies = cache.store(MediaCategory::Movie);
//! println!("movie cache available: {}", movies.is_available());
//! cache.close();
//! ```

pub mod migrations;
pub mod pool;
pub mod queries;
pub mod store;
