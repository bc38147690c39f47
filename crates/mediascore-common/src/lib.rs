//! Mediascore-Common: Shared types, cache keys, and utilities.
//!
//! This crate provides common functionality used across mediascore:
//!
//! - **Content keys**: SHA-256 derived cache keys for media identities and filenames
//! - **Core Types**: Media identities, rating records and their categories
//! - **Path Utilities**: Detection of video container files by extension
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use mediascore_common::{ContentKey, MediaCategory, MediaIdentity, RatingRecord};
//! use mediascore_common::paths::is_video_file;
//! use std::path::Path;
//!
//! let identity = MediaIdentity::new("The Matrix", 1999, 0, 0);
//! assert_eq!(identity.category(), MediaCategory::Movie);
//! assert_eq!(
//!     RatingRecord::primary_key_for(&identity.title, "1999", None),
//!     ContentKey::derive(["The Matrix", "1999"])
//! );
//!
//! assert!(is_video_file(Path::new("movie.mkv")));
//! ```

pub mod error;
pub mod hash;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use hash::ContentKey;
pub use types::*;
