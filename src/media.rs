//! Media types a smart playlist can filter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The closed set of library catalogs a playlist can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Songs,
    Albums,
    Artists,
    Movies,
    TvShows,
    Episodes,
    MusicVideos,
    Mixed,
}

impl MediaType {
    pub const ALL: [MediaType; 8] = [
        MediaType::Songs,
        MediaType::Albums,
        MediaType::Artists,
        MediaType::Movies,
        MediaType::TvShows,
        MediaType::Episodes,
        MediaType::MusicVideos,
        MediaType::Mixed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Songs => "songs",
            MediaType::Albums => "albums",
            MediaType::Artists => "artists",
            MediaType::Movies => "movies",
            MediaType::TvShows => "tvshows",
            MediaType::Episodes => "episodes",
            MediaType::MusicVideos => "musicvideos",
            MediaType::Mixed => "mixed",
        }
    }

    /// View conventionally used for WHERE clauses of this media type.
    ///
    /// `mixed` has no view of its own; it is compiled as songs or musicvideos.
    pub fn default_view(self) -> Option<&'static str> {
        match self {
            MediaType::Songs => Some("songview"),
            MediaType::Albums => Some("albumview"),
            MediaType::Artists => Some("artistview"),
            MediaType::Movies => Some("movie_view"),
            MediaType::TvShows => Some("tvshow_view"),
            MediaType::Episodes => Some("episode_view"),
            MediaType::MusicVideos => Some("musicvideo_view"),
            MediaType::Mixed => None,
        }
    }

    pub fn is_music(self) -> bool {
        matches!(
            self,
            MediaType::Artists | MediaType::Albums | MediaType::Songs | MediaType::Mixed
        )
    }

    /// Directory a playlist of this type is saved under.
    pub fn save_location(self) -> &'static str {
        match self {
            MediaType::Mixed => "mixed",
            t if t.is_music() => "music",
            _ => "video",
        }
    }

    /// Concrete media types a playlist of this type is compiled as.
    pub fn concrete_types(self) -> &'static [MediaType] {
        match self {
            MediaType::Mixed => &[MediaType::Songs, MediaType::MusicVideos],
            MediaType::Songs => &[MediaType::Songs],
            MediaType::Albums => &[MediaType::Albums],
            MediaType::Artists => &[MediaType::Artists],
            MediaType::Movies => &[MediaType::Movies],
            MediaType::TvShows => &[MediaType::TvShows],
            MediaType::Episodes => &[MediaType::Episodes],
            MediaType::MusicVideos => &[MediaType::MusicVideos],
        }
    }
}

/// Whether rules of a playlist of type `left` may be used by one of type `right`.
///
/// Types must match exactly, except that `mixed` pairs with songs and musicvideos.
pub fn check_type_compatibility(left: MediaType, right: MediaType) -> bool {
    if left == right {
        return true;
    }
    match (left, right) {
        (MediaType::Mixed, MediaType::Songs | MediaType::MusicVideos) => true,
        (MediaType::Songs | MediaType::MusicVideos, MediaType::Mixed) => true,
        _ => false,
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let media_type = match lower.as_str() {
            "songs" | "music" => MediaType::Songs,
            "albums" => MediaType::Albums,
            "artists" => MediaType::Artists,
            "movies" => MediaType::Movies,
            "tvshows" => MediaType::TvShows,
            "episodes" => MediaType::Episodes,
            "musicvideos" | "video" => MediaType::MusicVideos,
            "mixed" => MediaType::Mixed,
            _ => return Err(Error::UnknownMediaType(s.to_string())),
        };
        Ok(media_type)
    }
}
