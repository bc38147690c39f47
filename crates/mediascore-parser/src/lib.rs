//! # mediascore-parser
//!
//! Extracts the identity of a piece of media (title, year, season, episode)
//! from its file name, following common release naming conventions.
//!
//! ## Quick Start
//!
//! ```
//! use mediascore_parser::parse;
//!
//! let movie = parse("The.Matrix.1999.1080p.BluRay.x264-GROUP.mkv").unwrap();
//! assert_eq!(movie.title, "The Matrix");
//! assert_eq!(movie.year, 1999);
//!
//! let episode = parse("Show.Name.S02E05.720p.mkv").unwrap();
//! assert_eq!((episode.season, episode.episode), (2, 5));
//! ```
//!
//! The title ends at the first year, episode marker or quality tag that is
//! not the very first token. Numbers that were not found are reported as 0.

mod error;
mod token;

pub use error::ParseError;

use mediascore_common::paths::is_video_file;
use std::path::Path;
use token::Token;

/// Identity fields extracted from a file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedName {
    pub title: String,
    /// Release year, 0 when absent.
    pub year: u32,
    /// Season number, 0 when absent.
    pub season: u32,
    /// Episode number, 0 when absent.
    pub episode: u32,
}

/// Parse a file name (with or without its container extension).
///
/// An empty title is an error, but the error still carries whatever year,
/// season and episode could be read.
///
/// # Examples
///
/// ```
/// use mediascore_parser::{parse, ParseError};
///
/// let err = parse("S01E01.mkv").unwrap_err();
/// assert!(matches!(err, ParseError::EmptyTitle { .. }));
/// assert_eq!(err.partial().unwrap().episode, 1);
/// ```
pub fn parse(base_name: &str) -> Result<ParsedName, ParseError> {
    let stem = strip_video_extension(base_name);
    if stem.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut parsed = ParsedName::default();
    let mut title_words: Vec<&str> = Vec::new();
    let mut in_title = true;

    for (index, word) in stem
        .split(['.', ' ', '_'])
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        match Token::classify(word) {
            Token::Episode { season, episode } => {
                if parsed.episode == 0 {
                    parsed.season = season;
                    parsed.episode = episode;
                }
                in_title = false;
            }
            Token::Season(season) => {
                if parsed.season == 0 {
                    parsed.season = season;
                }
                in_title = false;
            }
            // A leading year is part of the title ("1917", "2012").
            Token::Year(year) if index > 0 => {
                if parsed.year == 0 {
                    parsed.year = year;
                }
                in_title = false;
            }
            Token::Quality if index > 0 => in_title = false,
            _ if in_title => title_words.push(word),
            _ => {}
        }
    }

    parsed.title = clean_title(&title_words.join(" "));
    if parsed.title.is_empty() {
        return Err(ParseError::EmptyTitle { partial: parsed });
    }

    Ok(parsed)
}

/// Drop a trailing container extension, leaving other dotted parts alone.
fn strip_video_extension(base_name: &str) -> &str {
    if is_video_file(Path::new(base_name)) {
        if let Some((stem, _)) = base_name.rsplit_once('.') {
            return stem;
        }
    }
    base_name
}

/// Trim separator debris around a title ("Show Name -" becomes "Show Name").
fn clean_title(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '.')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movie() {
        let result = parse("The.Matrix.1999.1080p.mkv").unwrap();
        assert_eq!(
            result,
            ParsedName {
                title: "The Matrix".into(),
                year: 1999,
                season: 0,
                episode: 0,
            }
        );
    }

    #[test]
    fn test_parse_episode() {
        let result = parse("Show.Name.S02E05.720p.mkv").unwrap();
        assert_eq!(result.title, "Show Name");
        assert_eq!(result.year, 0);
        assert_eq!(result.season, 2);
        assert_eq!(result.episode, 5);
    }

    #[test]
    fn test_year_then_episode() {
        let result = parse("Doctor.Who.2005.S10E01.HDTV.x264.mkv").unwrap();
        assert_eq!(result.title, "Doctor Who");
        assert_eq!(result.year, 2005);
        assert_eq!((result.season, result.episode), (10, 1));
    }

    #[test]
    fn test_leading_year_is_title() {
        let result = parse("1917.2019.2160p.UHD.BluRay.mkv").unwrap();
        assert_eq!(result.title, "1917");
        assert_eq!(result.year, 2019);
    }

    #[test]
    fn test_quality_ends_title() {
        let result = parse("Heat.1080p.BluRay.x264.mkv").unwrap();
        assert_eq!(result.title, "Heat");
        assert_eq!(result.year, 0);
    }

    #[test]
    fn test_spaces_and_dash_separator() {
        let result = parse("Show Name - 3x07 - Some Title.avi").unwrap();
        assert_eq!(result.title, "Show Name");
        assert_eq!((result.season, result.episode), (3, 7));
    }

    #[test]
    fn test_parenthesised_year() {
        let result = parse("Blade Runner (1982) Final Cut.mkv").unwrap();
        assert_eq!(result.title, "Blade Runner");
        assert_eq!(result.year, 1982);
    }

    #[test]
    fn test_underscores() {
        let result = parse("the_big_lebowski_1998_dvdrip.avi").unwrap();
        assert_eq!(result.title, "the big lebowski");
        assert_eq!(result.year, 1998);
    }

    #[test]
    fn test_non_video_extension_kept() {
        let result = parse("Movie.Title.2010.nfo").unwrap();
        assert_eq!(result.title, "Movie Title");
        assert_eq!(result.year, 2010);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), Err(ParseError::EmptyInput));
        assert_eq!(parse("   "), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_empty_title_keeps_partial() {
        let err = parse("S03E04.720p.mkv").unwrap_err();
        let partial = err.partial().unwrap();
        assert_eq!((partial.season, partial.episode), (3, 4));
        assert!(partial.title.is_empty());
    }
}
