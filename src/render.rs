//! Plain-text rating tables.
//!
//! Movies are printed first, then TV episodes; an empty table is skipped and
//! a blank line separates the two only when both are printed.

use std::io::{self, Write};

use mediascore_common::RatingRecord;

use crate::pipeline::RatingReport;

const MOVIE_HEADERS: &[&str] = &["Title", "Year", "IMDB rating", "RT rating", "Metacritic rating"];
const TV_HEADERS: &[&str] = &[
    "Title",
    "Year",
    "Episode Title",
    "Season",
    "Episode Nr",
    "IMDB rating",
    "RT rating",
    "Metacritic rating",
];

pub const MOVIE_CAPTION: &str = "Movie Ratings";
pub const TV_CAPTION: &str = "TV Series Ratings";

/// Write both tables of `report` to `out`.
pub fn render_report<W: Write>(report: &RatingReport, out: &mut W) -> io::Result<()> {
    let movies: Vec<Vec<String>> = report.movies.iter().map(movie_row).collect();
    let episodes: Vec<Vec<String>> = report.tv.iter().map(tv_row).collect();

    if !movies.is_empty() {
        write_table(out, MOVIE_HEADERS, &movies, MOVIE_CAPTION)?;
    }
    if !movies.is_empty() && !episodes.is_empty() {
        writeln!(out)?;
    }
    if !episodes.is_empty() {
        write_table(out, TV_HEADERS, &episodes, TV_CAPTION)?;
    }
    out.flush()
}

fn movie_row(record: &RatingRecord) -> Vec<String> {
    vec![
        record.title.clone(),
        record.year.clone(),
        record.ratings.imdb.clone(),
        record.ratings.rotten_tomatoes.clone(),
        record.ratings.metacritic.clone(),
    ]
}

fn tv_row(record: &RatingRecord) -> Vec<String> {
    vec![
        record.title.clone(),
        record.year.clone(),
        record.episode_title.clone(),
        record.season.clone(),
        record.episode_number.clone(),
        record.ratings.imdb.clone(),
        record.ratings.rotten_tomatoes.clone(),
        record.ratings.metacritic.clone(),
    ]
}

fn width(cell: &str) -> usize {
    cell.chars().count()
}

/// Render one table: uppercase header, dashed rule, rows, caption.
pub fn write_table<W: Write>(
    out: &mut W,
    headers: &[&str],
    rows: &[Vec<String>],
    caption: &str,
) -> io::Result<()> {
    let headers: Vec<String> = headers.iter().map(|h| h.to_uppercase()).collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
    for row in rows {
        for (col, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(col) {
                *w = (*w).max(width(cell));
            }
        }
    }

    write_row(out, &headers, &widths)?;

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    writeln!(out, "|{}|", rule.join("|"))?;

    for row in rows {
        write_row(out, row, &widths)?;
    }

    writeln!(out, "  {caption}")
}

fn write_row<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(col, w)| {
            let cell = cells.get(col).map(String::as_str).unwrap_or_default();
            format!(" {}{} ", cell, " ".repeat(w - width(cell)))
        })
        .collect();
    writeln!(out, "|{}|", padded.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediascore_common::{EpisodeInfo, Ratings};

    fn matrix() -> RatingRecord {
        RatingRecord::assemble(
            "The.Matrix.1999.mkv",
            "The Matrix",
            "1999",
            None,
            Ratings {
                imdb: "8.7".into(),
                rotten_tomatoes: "85".into(),
                metacritic: "73".into(),
            },
        )
    }

    fn episode() -> RatingRecord {
        RatingRecord::assemble(
            "Show.S02E05.mkv",
            "Show",
            "2019",
            Some(EpisodeInfo {
                season: 2,
                episode: 5,
                episode_title: "Five".into(),
            }),
            Ratings::default(),
        )
    }

    fn render(report: &RatingReport) -> String {
        let mut out = Vec::new();
        render_report(report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_movie_table_layout() {
        let report = RatingReport {
            movies: vec![matrix()],
            ..Default::default()
        };

        let expected = "\
| TITLE      | YEAR | IMDB RATING | RT RATING | METACRITIC RATING |
|------------|------|-------------|-----------|-------------------|
| The Matrix | 1999 | 8.7         | 85        | 73                |
  Movie Ratings
";
        assert_eq!(render(&report), expected);
    }

    #[test]
    fn test_both_tables_separated_by_blank_line() {
        let report = RatingReport {
            movies: vec![matrix()],
            tv: vec![episode()],
            ..Default::default()
        };

        let text = render(&report);
        let movie_at = text.find(MOVIE_CAPTION).unwrap();
        let tv_at = text.find(TV_CAPTION).unwrap();
        assert!(movie_at < tv_at);
        assert!(text.contains("  Movie Ratings\n\n| TITLE"));
        assert!(text.contains("| Show  | 2019 | Five          | 2      | 5          | N/A"));
    }

    #[test]
    fn test_tv_only_has_no_leading_blank_line() {
        let report = RatingReport {
            tv: vec![episode()],
            ..Default::default()
        };

        let text = render(&report);
        assert!(text.starts_with("| TITLE"));
        assert!(!text.contains(MOVIE_CAPTION));
    }

    #[test]
    fn test_empty_report_prints_nothing() {
        assert_eq!(render(&RatingReport::default()), "");
    }

    #[test]
    fn test_width_counts_chars() {
        let mut out = Vec::new();
        write_table(&mut out, &["Title"], &[vec!["Amélie".into()]], "c").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("| Amélie |"));
        assert!(text.starts_with("| TITLE  |"));
    }
}
