//! Types for the classifier module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad media category of an input file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
    Video,
    Image,
    Audio,
    Unknown,
}

impl MediaCategory {
    /// Returns the lowercase name used in the API and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "image" => Ok(Self::Image),
            "audio" => Ok(Self::Audio),
            "unknown" => Ok(Self::Unknown),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// Output format selectable for a batch.
///
/// Serialized as the uppercase label shown to users (`"MP4"`, `"PNG"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetFormat {
    // Video containers
    Mp4,
    Mkv,
    Avi,
    Mov,
    Webm,
    Gif,
    // Images
    Png,
    Jpg,
    Webp,
    Bmp,
    Ico,
    Svg,
    Tiff,
    // Audio
    Mp3,
    Wav,
    Flac,
    Aac,
    Ogg,
    M4a,
    Opus,
}

impl TargetFormat {
    /// Returns the label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mp4 => "MP4",
            Self::Mkv => "MKV",
            Self::Avi => "AVI",
            Self::Mov => "MOV",
            Self::Webm => "WEBM",
            Self::Gif => "GIF",
            Self::Png => "PNG",
            Self::Jpg => "JPG",
            Self::Webp => "WEBP",
            Self::Bmp => "BMP",
            Self::Ico => "ICO",
            Self::Svg => "SVG",
            Self::Tiff => "TIFF",
            Self::Mp3 => "MP3",
            Self::Wav => "WAV",
            Self::Flac => "FLAC",
            Self::Aac => "AAC",
            Self::Ogg => "OGG",
            Self::M4a => "M4A",
            Self::Opus => "OPUS",
        }
    }

    /// Returns the file extension of converted artifacts.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mkv => "mkv",
            Self::Avi => "avi",
            Self::Mov => "mov",
            Self::Webm => "webm",
            Self::Gif => "gif",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Ico => "ico",
            Self::Svg => "svg",
            Self::Tiff => "tiff",
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Aac => "aac",
            Self::Ogg => "ogg",
            Self::M4a => "m4a",
            Self::Opus => "opus",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a format label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown format: {0}")]
pub struct UnknownFormat(pub String);

/// Error returned when a category name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for TargetFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "mp4" => Self::Mp4,
            "mkv" => Self::Mkv,
            "avi" => Self::Avi,
            "mov" => Self::Mov,
            "webm" => Self::Webm,
            "gif" => Self::Gif,
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpg,
            "webp" => Self::Webp,
            "bmp" => Self::Bmp,
            "ico" => Self::Ico,
            "svg" => Self::Svg,
            "tiff" | "tif" => Self::Tiff,
            "mp3" => Self::Mp3,
            "wav" => Self::Wav,
            "flac" => Self::Flac,
            "aac" => Self::Aac,
            "ogg" => Self::Ogg,
            "m4a" => Self::M4a,
            "opus" => Self::Opus,
            _ => return Err(UnknownFormat(s.to_string())),
        };
        Ok(format)
    }
}
