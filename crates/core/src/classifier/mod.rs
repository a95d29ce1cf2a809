//! File classification by extension.
//!
//! Maps a file name to a [`MediaCategory`] and a category to the ordered list
//! of [`TargetFormat`]s offered for it. Everything here is static data and
//! pure functions.

mod types;

pub use types::{MediaCategory, TargetFormat, UnknownCategory, UnknownFormat};

use std::path::Path;

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "3gp", "ts",
];

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff", "tif", "ico", "svg", "heic", "avif",
];

const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "flac", "aac", "ogg", "m4a", "wma", "opus", "aiff",
];

const VIDEO_FORMATS: &[TargetFormat] = &[
    TargetFormat::Mp4,
    TargetFormat::Mkv,
    TargetFormat::Avi,
    TargetFormat::Mov,
    TargetFormat::Webm,
    TargetFormat::Gif,
    TargetFormat::Mp3,
    TargetFormat::Wav,
];

const IMAGE_FORMATS: &[TargetFormat] = &[
    TargetFormat::Png,
    TargetFormat::Jpg,
    TargetFormat::Webp,
    TargetFormat::Bmp,
    TargetFormat::Gif,
    TargetFormat::Ico,
    TargetFormat::Svg,
    TargetFormat::Tiff,
];

const AUDIO_FORMATS: &[TargetFormat] = &[
    TargetFormat::Mp3,
    TargetFormat::Wav,
    TargetFormat::Flac,
    TargetFormat::Aac,
    TargetFormat::Ogg,
    TargetFormat::M4a,
    TargetFormat::Opus,
];

/// Classifies a file name (or path) by its extension, case-insensitively.
pub fn classify(name: impl AsRef<Path>) -> MediaCategory {
    let Some(ext) = name.as_ref().extension().and_then(|e| e.to_str()) else {
        return MediaCategory::Unknown;
    };
    let ext = ext.to_ascii_lowercase();

    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        MediaCategory::Video
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        MediaCategory::Image
    } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        MediaCategory::Audio
    } else {
        MediaCategory::Unknown
    }
}

/// Returns the formats offered for a category, in display order.
///
/// Unknown files get the video set.
pub fn allowed_formats(category: MediaCategory) -> &'static [TargetFormat] {
    match category {
        MediaCategory::Image => IMAGE_FORMATS,
        MediaCategory::Audio => AUDIO_FORMATS,
        MediaCategory::Video | MediaCategory::Unknown => VIDEO_FORMATS,
    }
}

/// Returns the format auto-selected when a session starts with this category.
pub fn default_format(category: MediaCategory) -> TargetFormat {
    match category {
        MediaCategory::Image => TargetFormat::Png,
        MediaCategory::Audio => TargetFormat::Mp3,
        MediaCategory::Video | MediaCategory::Unknown => TargetFormat::Mp4,
    }
}
