//! Classification of individual file-name words.

use regex::Regex;
use std::sync::LazyLock;

/// `S02E05`, `s2e5`, `S01E01E02` (first episode wins).
static EPISODE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)s(\d{1,2})[ ._-]?e(\d{1,3})(?:e\d{1,3})*$").expect("valid episode regex")
});

/// `3x07`, `10x02`.
static CROSS_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)(\d{1,2})x(\d{2,3})$").expect("valid cross regex"));

/// `S03` on its own (season packs).
static SEASON_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)s(\d{1,2})$").expect("valid season regex"));

/// `1999`, `(1999)`, `[1999]`.
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[(\[]?((?:19|20)\d{2})[)\]]?$").expect("valid year regex"));

/// `720p`, `1080i`, `2160p`.
static RESOLUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)\d{3,4}[pi]$").expect("valid resolution regex"));

/// Release tags that never appear in a title, compared lowercase.
const QUALITY_TAGS: &[&str] = &[
    "4k", "uhd", "hdr", "hdr10", "10bit", "bluray", "blu-ray", "bdrip", "brrip", "bdremux",
    "remux", "dvdrip", "dvdscr", "webrip", "web-dl", "webdl", "hdtv", "hdrip", "pdtv", "x264",
    "x265", "h264", "h265", "hevc", "xvid", "divx", "aac", "ac3", "dts", "truehd", "atmos",
    "proper", "repack", "extended", "unrated", "subbed", "dubbed",
];

/// What a single word of a file name represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Episode { season: u32, episode: u32 },
    Season(u32),
    Year(u32),
    Quality,
    Other,
}

impl Token {
    pub(crate) fn classify(word: &str) -> Self {
        if let Some(caps) = EPISODE_MARKER
            .captures(word)
            .or_else(|| CROSS_MARKER.captures(word))
        {
            let season = caps[1].parse().unwrap_or(0);
            let episode = caps[2].parse().unwrap_or(0);
            return Self::Episode { season, episode };
        }

        if let Some(caps) = SEASON_MARKER.captures(word) {
            return Self::Season(caps[1].parse().unwrap_or(0));
        }

        if let Some(caps) = YEAR.captures(word) {
            return Self::Year(caps[1].parse().unwrap_or(0));
        }

        if is_quality(word) {
            return Self::Quality;
        }

        Self::Other
    }
}

/// Quality tags, including ones with a release group glued on (`x264-GRP`).
fn is_quality(word: &str) -> bool {
    let lower = word.to_lowercase();
    if RESOLUTION.is_match(&lower) || QUALITY_TAGS.contains(&lower.as_str()) {
        return true;
    }

    lower
        .split_once('-')
        .map(|(head, _)| RESOLUTION.is_match(head) || QUALITY_TAGS.contains(&head))
        .unwrap_or(false)
}
