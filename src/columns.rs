//! Native-column resolver.
//!
//! A rule is always compiled against one [`Relation`] (the table or view the
//! row comes from) under an alias. Top-level rules use the media type's view
//! as alias; the cross-entity assembler re-targets rules at base tables such
//! as `song`, `album` or `artist`, which share their column names with the
//! corresponding views.

use crate::field::Field;
use crate::media::MediaType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Song,
    Album,
    Artist,
    Role,
    Path,
    Movie,
    TvShow,
    Episode,
    MusicVideo,
}

impl Relation {
    /// Relation rows of a media type are read from.
    pub fn primary(media_type: MediaType) -> Relation {
        match media_type {
            MediaType::Songs | MediaType::Mixed => Relation::Song,
            MediaType::Albums => Relation::Album,
            MediaType::Artists => Relation::Artist,
            MediaType::Movies => Relation::Movie,
            MediaType::TvShows => Relation::TvShow,
            MediaType::Episodes => Relation::Episode,
            MediaType::MusicVideos => Relation::MusicVideo,
        }
    }

    /// Base table name, used when a rule is re-targeted outside its view.
    pub fn table(self) -> &'static str {
        match self {
            Relation::Song => "song",
            Relation::Album => "album",
            Relation::Artist => "artist",
            Relation::Role => "role",
            Relation::Path => "path",
            Relation::Movie => "movie",
            Relation::TvShow => "tvshow",
            Relation::Episode => "episode",
            Relation::MusicVideo => "musicvideo",
        }
    }

    pub fn id_column(self) -> &'static str {
        match self {
            Relation::Song => "idSong",
            Relation::Album => "idAlbum",
            Relation::Artist => "idArtist",
            Relation::Role => "idRole",
            Relation::Path => "idPath",
            Relation::Movie => "idMovie",
            Relation::TvShow => "idShow",
            Relation::Episode => "idEpisode",
            Relation::MusicVideo => "idMVideo",
        }
    }

    /// `media_type` value stored in the video link tables.
    pub fn link_media_type(self) -> Option<&'static str> {
        match self {
            Relation::Movie => Some("movie"),
            Relation::TvShow => Some("tvshow"),
            Relation::Episode => Some("episode"),
            Relation::MusicVideo => Some("musicvideo"),
            _ => None,
        }
    }

    pub fn is_video(self) -> bool {
        matches!(
            self,
            Relation::Movie | Relation::TvShow | Relation::Episode | Relation::MusicVideo
        )
    }
}

/// A relation together with the alias its columns are qualified with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope<'a> {
    pub relation: Relation,
    pub alias: &'a str,
}

impl<'a> Scope<'a> {
    pub fn new(relation: Relation, alias: &'a str) -> Self {
        Scope { relation, alias }
    }

    /// Scope over the relation's base table, aliased by its own name.
    pub fn table(relation: Relation) -> Scope<'static> {
        Scope {
            relation,
            alias: relation.table(),
        }
    }

    /// Qualified column of `field`, if the relation has one.
    pub fn column(&self, field: Field) -> Option<String> {
        column(field, self.relation).map(|c| self.qualify(c))
    }

    pub fn id(&self) -> String {
        self.qualify(self.relation.id_column())
    }

    pub fn qualify(&self, column: &str) -> String {
        format!("{}.{}", self.alias, column)
    }
}

/// Bare column name of `field` on `relation`.
pub fn column(field: Field, relation: Relation) -> Option<&'static str> {
    use Field::*;
    let name = match relation {
        Relation::Song => match field {
            Title => "strTitle",
            TrackNumber => "iTrack",
            Time => "iDuration",
            Year => "iYear",
            Filename => "strFileName",
            Playcount => "iTimesPlayed",
            LastPlayed => "lastplayed",
            Rating => "rating",
            UserRating => "userrating",
            Votes => "votes",
            Comment => "comment",
            Moods => "mood",
            DateAdded => "dateAdded",
            DiscTitle => "strDiscSubtitle",
            Genre => "strGenres",
            Album => "strAlbum",
            Path => "strPath",
            Artist => "strArtists",
            AlbumArtist => "strAlbumArtists",
            SongId => "idSong",
            AlbumId => "idAlbum",
            _ => return Option::None,
        },
        Relation::Album => match field {
            Album => "strAlbum",
            Review => "strReview",
            Themes => "strThemes",
            Moods | AlbumMoods => "strMoods",
            Styles | AlbumStyles => "strStyles",
            AlbumType => "strType",
            Compilation => "bCompilation",
            MusicLabel => "strLabel",
            TotalDiscs => "iDiscTotal",
            IsBoxset => "bBoxedSet",
            Rating | AlbumRating => "fRating",
            UserRating | AlbumUserRating => "iUserrating",
            Votes | AlbumVotes => "iVotes",
            Year | AlbumYear => "iYear",
            Playcount => "iTimesPlayed",
            LastPlayed => "lastPlayed",
            DateAdded => "dateAdded",
            AlbumGenre => "strGenres",
            AlbumLastScrape => "lastScraped",
            AlbumMbid => "strMusicBrainzAlbumID",
            ReleaseGroupMbid => "strReleaseGroupMBID",
            Artist | AlbumArtist => "strArtists",
            AlbumId => "idAlbum",
            _ => return Option::None,
        },
        Relation::Artist => match field {
            Artist | AlbumArtist => "strArtist",
            ArtistType => "strType",
            Gender => "strGender",
            Disambiguation => "strDisambiguation",
            Born => "strBorn",
            BandFormed => "strFormed",
            Disbanded => "strDisbanded",
            Died => "strDied",
            Biography => "strBiography",
            Instruments => "strInstrument",
            Moods | ArtistMoods => "strMoods",
            Styles => "strStyles",
            ArtistGenre => "strGenres",
            ArtistMbid => "strMusicBrainzArtistID",
            ArtistLastScrape => "lastScraped",
            YearsActive => "strYearsActive",
            ArtistId => "idArtist",
            _ => return Option::None,
        },
        Relation::Role => match field {
            Role => "strRole",
            _ => return Option::None,
        },
        Relation::Path => match field {
            Path => "strPath",
            _ => return Option::None,
        },
        Relation::Movie => match field {
            Title => "c00",
            Plot => "c01",
            PlotOutline => "c02",
            Tagline => "c03",
            Writer => "c06",
            SortTitle => "c10",
            Time => "c11",
            Mpaa => "c12",
            Top250 => "c13",
            Genre => "c14",
            Director => "c15",
            OriginalTitle => "c16",
            Studio => "c18",
            Trailer => "c19",
            Country => "c21",
            Year => "premiered",
            Votes => "votes",
            Rating => "rating",
            UserRating => "userrating",
            Filename => "strFileName",
            Path => "strPath",
            Playcount => "playCount",
            LastPlayed => "lastPlayed",
            DateAdded => "dateAdded",
            Set => "strSet",
            _ => return Option::None,
        },
        Relation::TvShow => match field {
            Title => "c00",
            Plot => "c01",
            TvShowStatus => "c02",
            Genre => "c08",
            OriginalTitle => "c09",
            Mpaa => "c13",
            Studio => "c14",
            SortTitle => "c15",
            Year => "premiered",
            Votes => "votes",
            Rating => "rating",
            UserRating => "userrating",
            NumberOfEpisodes => "totalCount",
            NumberOfWatchedEpisodes | Playcount => "watchedcount",
            Path => "strPath",
            DateAdded => "dateAdded",
            LastPlayed => "lastPlayed",
            _ => return Option::None,
        },
        Relation::Episode => match field {
            Title => "c00",
            Plot => "c01",
            Writer => "c04",
            AirDate => "c05",
            Time => "c09",
            Director => "c10",
            Season => "c12",
            EpisodeNumber => "c13",
            OriginalTitle => "c14",
            TvShowTitle => "strTitle",
            Mpaa => "mpaa",
            Studio => "strStudio",
            Year => "premiered",
            Votes => "votes",
            Rating => "rating",
            UserRating => "userrating",
            Filename => "strFileName",
            Path => "strPath",
            Playcount => "playCount",
            LastPlayed => "lastPlayed",
            DateAdded => "dateAdded",
            _ => return Option::None,
        },
        Relation::MusicVideo => match field {
            Title => "c00",
            Time => "c04",
            Director => "c05",
            Studio => "c06",
            Plot => "c08",
            Album => "c09",
            Artist | AlbumArtist => "c10",
            Genre => "c11",
            TrackNumber => "c12",
            Year => "premiered",
            Rating => "rating",
            UserRating => "userrating",
            Filename => "strFileName",
            Path => "strPath",
            Playcount => "playCount",
            LastPlayed => "lastPlayed",
            DateAdded => "dateAdded",
            _ => return Option::None,
        },
    };
    Some(name)
}

/// Fields of artist rows that album and song playlists reach through the
/// artist tables.
fn is_artist_field(field: Field) -> bool {
    use Field::*;
    matches!(
        field,
        Artist
            | AlbumArtist
            | ArtistType
            | Gender
            | Disambiguation
            | Born
            | BandFormed
            | Disbanded
            | Died
            | Biography
            | Instruments
            | ArtistGenre
            | ArtistMoods
            | ArtistMbid
            | ArtistLastScrape
            | YearsActive
    )
}

fn is_album_only_field(field: Field) -> bool {
    use Field::*;
    matches!(
        field,
        Review
            | Themes
            | AlbumType
            | Compilation
            | IsBoxset
            | MusicLabel
            | TotalDiscs
            | AlbumGenre
            | AlbumLastScrape
            | AlbumMbid
            | ReleaseGroupMbid
            | AlbumMoods
            | AlbumStyles
            | AlbumRating
            | AlbumUserRating
            | AlbumVotes
            | AlbumYear
    )
}

fn is_song_field(field: Field) -> bool {
    use Field::*;
    matches!(
        field,
        Genre | Title | Time | TrackNumber | Comment | Filename | DiscTitle | SongId
    )
}

/// Table a field natively lives on when filtering `media_type`.
///
/// Only the music types distinguish; every other media type reads all
/// fields from its own view.
pub fn native_table(field: Field, media_type: MediaType) -> Relation {
    use Field::*;
    match media_type {
        MediaType::Artists => match field {
            Path => Relation::Path,
            Role => Relation::Role,
            Source => Relation::Album,
            Album => Relation::Album,
            f if is_album_only_field(f) => Relation::Album,
            Year | Playcount | LastPlayed | DateAdded => Relation::Song,
            f if is_song_field(f) => Relation::Song,
            _ => Relation::Artist,
        },
        MediaType::Albums => match field {
            Path => Relation::Path,
            Role => Relation::Role,
            f if is_artist_field(f) => Relation::Artist,
            f if is_song_field(f) && f != DiscTitle => Relation::Song,
            _ => Relation::Album,
        },
        MediaType::Songs => match field {
            Role => Relation::Role,
            Source => Relation::Album,
            f if is_artist_field(f) => Relation::Artist,
            f if is_album_only_field(f) => Relation::Album,
            _ => Relation::Song,
        },
        other => Relation::primary(other),
    }
}

/// Whether a rule on `field` can be compiled on its own against the primary
/// view of `media_type`, as opposed to needing the cross-entity assembler.
pub fn is_field_rule_simple(field: Field, media_type: MediaType) -> bool {
    if field == Field::None {
        return true;
    }
    match media_type {
        MediaType::Artists | MediaType::Albums | MediaType::Songs => {}
        _ => return true,
    }
    match (media_type, field) {
        (_, Field::Role) => false,
        (MediaType::Albums | MediaType::Songs, Field::Artist | Field::AlbumArtist) => false,
        (MediaType::Albums, Field::Source | Field::DiscTitle) => true,
        _ => column(field, Relation::primary(media_type)).is_some(),
    }
}
