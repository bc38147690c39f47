//! Path utilities for detecting video container files by extension.
//!
//! The directory walker only queues files that pass [`is_video_file`];
//! everything else is skipped silently.

use std::path::Path;

/// Video container extensions that are scored.
const VIDEO_EXTENSIONS: &[&str] = &[
    "3g2", "3gp", "3gp2", "asf", "avi", "divx", "flv", "mk3d", "m4v", "mk2", "mka", "mkv",
    "mov", "mp4", "mp4a", "mpeg", "mpg", "ogg", "ogm", "ogv", "qt", "ra", "ram", "rm", "ts",
    "wav", "webm", "wma", "wmv", "iso", "vob",
];

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use mediascore_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("movie.mkv")));
/// assert!(is_video_file(Path::new("/path/to/video.ISO")));
/// assert!(!is_video_file(Path::new("subtitle.srt")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// File name component of `path` as an owned string, if it has one.
pub fn base_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
