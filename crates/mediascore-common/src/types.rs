//! Core type definitions for media identities and rating records.
//!
//! A [`MediaIdentity`] is derived once per file from its name. A
//! [`RatingRecord`] is the resolved, cacheable unit handed to the renderer
//! and persisted in the per-category stores.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hash::ContentKey;

/// Sentinel stored in any rating field that could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// Normalize a raw score into either a numeric string or [`NOT_AVAILABLE`].
///
/// Surrounding whitespace is dropped; anything that does not parse as a
/// finite number maps to the sentinel.
///
/// # Examples
///
/// ```
/// use mediascore_common::{normalize_score, NOT_AVAILABLE};
///
/// assert_eq!(normalize_score(" 8.7 "), "8.7");
/// assert_eq!(normalize_score(""), NOT_AVAILABLE);
/// assert_eq!(normalize_score("tbd"), NOT_AVAILABLE);
/// ```
pub fn normalize_score(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => trimmed.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Render a number as a string, with zero meaning "not applicable".
pub fn zero_as_empty(value: u32) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}

/// Cache category; each one is backed by its own store file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    /// A feature film.
    Movie,
    /// A single episode of a series.
    Tv,
}

impl MediaCategory {
    /// Store file name for this category beneath the cache root.
    pub fn store_file_name(&self) -> &'static str {
        match self {
            Self::Movie => "movie.db",
            Self::Tv => "tv.db",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Tv => write!(f, "tv"),
        }
    }
}

/// Identity of a piece of media as derived from its filename.
///
/// Zero encodes "unknown" for the year and "not a series" for the season and
/// episode numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaIdentity {
    pub title: String,
    pub year: u32,
    pub season: u32,
    pub episode: u32,
}

impl MediaIdentity {
    pub fn new(title: impl Into<String>, year: u32, season: u32, episode: u32) -> Self {
        Self {
            title: title.into(),
            year,
            season,
            episode,
        }
    }

    /// Whether this identity names a TV episode. Both numbers must be set.
    pub fn is_tv(&self) -> bool {
        self.season > 0 && self.episode > 0
    }

    pub fn category(&self) -> MediaCategory {
        if self.is_tv() {
            MediaCategory::Tv
        } else {
            MediaCategory::Movie
        }
    }
}

impl fmt::Display for MediaIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if self.year > 0 {
            write!(f, " ({})", self.year)?;
        }
        if self.is_tv() {
            write!(f, " S{:02}E{:02}", self.season, self.episode)?;
        }
        Ok(())
    }
}

/// The three rating figures carried by every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    /// Primary critic score (IMDB).
    pub imdb: String,
    /// Audience score (Rotten Tomatoes).
    pub rotten_tomatoes: String,
    /// Secondary critic score (Metacritic, 0-100).
    pub metacritic: String,
}

impl Default for Ratings {
    fn default() -> Self {
        Self {
            imdb: NOT_AVAILABLE.to_string(),
            rotten_tomatoes: NOT_AVAILABLE.to_string(),
            metacritic: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Episode-specific fields of a TV record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeInfo {
    pub season: u32,
    pub episode: u32,
    pub episode_title: String,
}

/// A resolved rating record, as cached and rendered.
///
/// Text fields use the empty string for "not applicable". Movie records never
/// carry season or episode numbers; TV records always carry both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
    /// Movie: hash(title, year). TV: hash(title, year, season, episode).
    pub primary_key: ContentKey,
    /// hash(raw file name); non-unique lookup index.
    pub base_name_hash: ContentKey,
    pub title: String,
    pub year: String,
    pub episode_title: String,
    pub season: String,
    pub episode_number: String,
    pub ratings: Ratings,
    pub is_tv: bool,
}

impl RatingRecord {
    /// Build a record and both of its keys from resolved fields.
    ///
    /// `episode` decides the record shape: `Some` produces a TV record, `None`
    /// a movie record with empty season and episode fields.
    pub fn assemble(
        base_name: &str,
        title: &str,
        year: &str,
        episode: Option<EpisodeInfo>,
        ratings: Ratings,
    ) -> Self {
        let numbers = episode.as_ref().map(|e| (e.season, e.episode));
        let primary_key = Self::primary_key_for(title, year, numbers);

        let (episode_title, season, episode_number) = match episode {
            Some(info) => (
                info.episode_title,
                info.season.to_string(),
                info.episode.to_string(),
            ),
            None => (String::new(), String::new(), String::new()),
        };

        Self {
            primary_key,
            base_name_hash: Self::base_name_key(base_name),
            title: title.to_string(),
            year: year.to_string(),
            episode_title,
            season,
            episode_number,
            ratings,
            is_tv: numbers.is_some(),
        }
    }

    /// Primary key for a title/year and optional (season, episode) pair.
    pub fn primary_key_for(title: &str, year: &str, episode: Option<(u32, u32)>) -> ContentKey {
        match episode {
            Some((season, number)) => ContentKey::derive([
                title,
                year,
                season.to_string().as_str(),
                number.to_string().as_str(),
            ]),
            None => ContentKey::derive([title, year]),
        }
    }

    /// Secondary index key for a raw file name.
    pub fn base_name_key(base_name: &str) -> ContentKey {
        ContentKey::derive([base_name])
    }

    pub fn category(&self) -> MediaCategory {
        if self.is_tv {
            MediaCategory::Tv
        } else {
            MediaCategory::Movie
        }
    }
}
