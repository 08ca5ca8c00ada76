//! Path utilities for detecting video files by extension.
//!
//! The scanner only considers files with a known video extension. Users may
//! widen the set through configuration, which is why the `_with` variant
//! accepts additional extensions.

use std::path::Path;

/// List of supported video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "ts", "webm", "mov", "wmv", "flv", "mpg", "mpeg",
];

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use vidshelf_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("S01E01.mkv")));
/// assert!(is_video_file(Path::new("/HD/Show/ep1.mp4")));
/// assert!(!is_video_file(Path::new("subtitle.srt")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    is_video_file_with(path, &[])
}

/// Check if a path has a video file extension, also accepting any of `extra`.
///
/// Matching is case-insensitive; entries in `extra` may carry a leading dot.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use vidshelf_common::paths::is_video_file_with;
///
/// let extra = vec!["divx".to_string()];
/// assert!(is_video_file_with(Path::new("old.DIVX"), &extra));
/// assert!(!is_video_file_with(Path::new("notes.txt"), &extra));
/// ```
pub fn is_video_file_with(path: &Path, extra: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    let ext = ext.to_lowercase();
    VIDEO_EXTENSIONS.contains(&ext.as_str())
        || extra
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
}

/// Get the list of video file extensions.
///
/// # Examples
///
/// ```
/// use vidshelf_common::paths::video_extensions;
///
/// let extensions = video_extensions();
/// assert!(extensions.contains(&"mkv"));
/// assert!(extensions.contains(&"mp4"));
/// ```
#[must_use]
pub fn video_extensions() -> &'static [&'static str] {
    VIDEO_EXTENSIONS
}
