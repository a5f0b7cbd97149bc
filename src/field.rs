//! Field catalog: the static table of every field a rule can reference,
//! the grouping table and the sort-order table, plus the per-media-type
//! lists the rule editor offers.
//!
//! The tables are plain `static` arrays built at compile time. [`FIELDS`] is
//! laid out in the declaration order of [`Field`] so that lookups by field
//! are a direct index.

use serde::{Deserialize, Serialize};

use crate::media::MediaType;

/// Separator between multiple values stored in one parameter string.
pub const RULE_VALUE_SEPARATOR: &str = " / ";

/// Value validator applied to a single parameter value.
pub type Validator = fn(&str) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    None,
    Filename,
    Path,
    Album,
    AlbumArtist,
    Artist,
    TrackNumber,
    Role,
    Comment,
    Review,
    Themes,
    Moods,
    Styles,
    AlbumType,
    Compilation,
    MusicLabel,
    Title,
    SortTitle,
    OriginalTitle,
    Year,
    Time,
    Playcount,
    LastPlayed,
    InProgress,
    Rating,
    UserRating,
    Votes,
    Top250,
    Mpaa,
    DateAdded,
    Genre,
    Plot,
    PlotOutline,
    Tagline,
    Set,
    Director,
    Actor,
    Writer,
    AirDate,
    Trailer,
    Studio,
    Country,
    TvShowTitle,
    TvShowStatus,
    Season,
    EpisodeNumber,
    NumberOfEpisodes,
    NumberOfWatchedEpisodes,
    VideoResolution,
    VideoCodec,
    VideoAspectRatio,
    AudioChannels,
    AudioCodec,
    AudioLanguage,
    AudioCount,
    SubtitleCount,
    SubtitleLanguage,
    Random,
    Playlist,
    VirtualFolder,
    Tag,
    Instruments,
    Biography,
    Born,
    BandFormed,
    Disbanded,
    Died,
    ArtistType,
    Gender,
    Disambiguation,
    Source,
    DiscTitle,
    IsBoxset,
    TotalDiscs,
    ArtistId,
    AlbumId,
    SongId,
    SourceId,
    GenreId,
    ArtistGenre,
    ArtistLastScrape,
    ArtistMbid,
    ArtistMoods,
    BornFormed,
    DiedDisband,
    YearsActive,
    AlbumGenre,
    AlbumLastScrape,
    AlbumMbid,
    ReleaseGroupMbid,
    AlbumMoods,
    AlbumStyles,
    AlbumRating,
    AlbumUserRating,
    AlbumVotes,
    AlbumYear,
}

/// How parameter strings of a field are interpreted when compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Numeric,
    Date,
    Playlist,
    Seconds,
    Boolean,
    Real,
    /// Comma separated list compared with `IN (...)`.
    TextIn,
}

impl ValueType {
    /// Values of these types are compared unquoted.
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueType::Numeric | ValueType::Real | ValueType::Seconds)
    }
}

#[derive(Debug)]
pub struct FieldInfo {
    pub name: &'static str,
    pub field: Field,
    pub value_type: ValueType,
    pub validator: Option<Validator>,
    pub browseable: bool,
    pub localized_string: u32,
}

const fn info(
    name: &'static str,
    field: Field,
    value_type: ValueType,
    validator: Option<Validator>,
    browseable: bool,
    localized_string: u32,
) -> FieldInfo {
    FieldInfo {
        name,
        field,
        value_type,
        validator,
        browseable,
        localized_string,
    }
}

use ValueType::{Boolean, Date, Numeric, Playlist as PlaylistType, Real, Seconds, Text, TextIn};

const POSITIVE: Option<Validator> = Some(is_positive_integer);
const TIME: Option<Validator> = Some(is_time);
const RATING: Option<Validator> = Some(validate_rating);
const MY_RATING: Option<Validator> = Some(validate_my_rating);

#[rustfmt::skip]
pub static FIELDS: [FieldInfo; 96] = [
    info("none",             Field::None,                    Text,         None,      false, 231),
    info("filename",         Field::Filename,                Text,         None,      false, 561),
    info("path",             Field::Path,                    Text,         None,      true,  573),
    info("album",            Field::Album,                   Text,         None,      true,  558),
    info("albumartist",      Field::AlbumArtist,             Text,         None,      true,  566),
    info("artist",           Field::Artist,                  Text,         None,      true,  557),
    info("tracknumber",      Field::TrackNumber,             Numeric,      POSITIVE,  false, 554),
    info("role",             Field::Role,                    Text,         None,      true,  38033),
    info("comment",          Field::Comment,                 Text,         None,      false, 569),
    info("review",           Field::Review,                  Text,         None,      false, 183),
    info("themes",           Field::Themes,                  Text,         None,      false, 21895),
    info("moods",            Field::Moods,                   Text,         None,      false, 175),
    info("styles",           Field::Styles,                  Text,         None,      false, 176),
    info("type",             Field::AlbumType,               Text,         None,      false, 564),
    info("compilation",      Field::Compilation,             Boolean,      None,      false, 204),
    info("label",            Field::MusicLabel,              Text,         None,      false, 21899),
    info("title",            Field::Title,                   Text,         None,      true,  556),
    info("sorttitle",        Field::SortTitle,               Text,         None,      false, 171),
    info("originaltitle",    Field::OriginalTitle,           Text,         None,      false, 20376),
    info("year",             Field::Year,                    Numeric,      POSITIVE,  true,  562),
    info("time",             Field::Time,                    Seconds,      TIME,      false, 180),
    info("playcount",        Field::Playcount,               Numeric,      POSITIVE,  false, 567),
    info("lastplayed",       Field::LastPlayed,              Date,         None,      false, 568),
    info("inprogress",       Field::InProgress,              Boolean,      None,      false, 575),
    info("rating",           Field::Rating,                  Real,         RATING,    false, 563),
    info("userrating",       Field::UserRating,              Real,         MY_RATING, false, 38018),
    info("votes",            Field::Votes,                   Real,         POSITIVE,  false, 205),
    info("top250",           Field::Top250,                  Numeric,      None,      false, 13409),
    info("mpaarating",       Field::Mpaa,                    Text,         None,      false, 20074),
    info("dateadded",        Field::DateAdded,               Date,         None,      false, 570),
    info("genre",            Field::Genre,                   Text,         None,      true,  515),
    info("plot",             Field::Plot,                    Text,         None,      false, 207),
    info("plotoutline",      Field::PlotOutline,             Text,         None,      false, 203),
    info("tagline",          Field::Tagline,                 Text,         None,      false, 202),
    info("set",              Field::Set,                     Text,         None,      true,  20457),
    info("director",         Field::Director,                Text,         None,      true,  20339),
    info("actor",            Field::Actor,                   Text,         None,      true,  20337),
    info("writers",          Field::Writer,                  Text,         None,      true,  20417),
    info("airdate",          Field::AirDate,                 Date,         None,      false, 20416),
    info("hastrailer",       Field::Trailer,                 Boolean,      None,      false, 20423),
    info("studio",           Field::Studio,                  Text,         None,      true,  572),
    info("country",          Field::Country,                 Text,         None,      true,  574),
    info("tvshow",           Field::TvShowTitle,             Text,         None,      true,  20364),
    info("status",           Field::TvShowStatus,            Text,         None,      false, 126),
    info("season",           Field::Season,                  Numeric,      POSITIVE,  false, 20373),
    info("episode",          Field::EpisodeNumber,           Numeric,      POSITIVE,  false, 20359),
    info("numepisodes",      Field::NumberOfEpisodes,        Real,         POSITIVE,  false, 20360),
    info("numwatched",       Field::NumberOfWatchedEpisodes, Real,         POSITIVE,  false, 21457),
    info("videoresolution",  Field::VideoResolution,         Real,         None,      false, 21443),
    info("videocodec",       Field::VideoCodec,              TextIn,       None,      false, 21445),
    info("videoaspect",      Field::VideoAspectRatio,        Real,         None,      false, 21374),
    info("audiochannels",    Field::AudioChannels,           Real,         None,      false, 21444),
    info("audiocodec",       Field::AudioCodec,              TextIn,       None,      false, 21446),
    info("audiolanguage",    Field::AudioLanguage,           TextIn,       None,      false, 21447),
    info("audiocount",       Field::AudioCount,              Real,         POSITIVE,  false, 21481),
    info("subtitlecount",    Field::SubtitleCount,           Real,         POSITIVE,  false, 21482),
    info("subtitlelanguage", Field::SubtitleLanguage,        TextIn,       None,      false, 21448),
    info("random",           Field::Random,                  Text,         None,      false, 590),
    info("playlist",         Field::Playlist,                PlaylistType, None,      true,  559),
    info("virtualfolder",    Field::VirtualFolder,           PlaylistType, None,      true,  614),
    info("tag",              Field::Tag,                     Text,         None,      true,  20459),
    info("instruments",      Field::Instruments,             Text,         None,      false, 21892),
    info("biography",        Field::Biography,               Text,         None,      false, 21887),
    info("born",             Field::Born,                    Text,         None,      false, 21893),
    info("bandformed",       Field::BandFormed,              Text,         None,      false, 21894),
    info("disbanded",        Field::Disbanded,               Text,         None,      false, 21896),
    info("died",             Field::Died,                    Text,         None,      false, 21897),
    info("artisttype",       Field::ArtistType,              Text,         None,      false, 564),
    info("gender",           Field::Gender,                  Text,         None,      false, 39025),
    info("disambiguation",   Field::Disambiguation,          Text,         None,      false, 39026),
    info("source",           Field::Source,                  Text,         None,      true,  39030),
    info("disctitle",        Field::DiscTitle,               Text,         None,      false, 38076),
    info("isboxset",         Field::IsBoxset,                Boolean,      None,      false, 38074),
    info("totaldiscs",       Field::TotalDiscs,              Numeric,      POSITIVE,  false, 38077),
    info("artistid",         Field::ArtistId,                Numeric,      POSITIVE,  true,  0),
    info("albumid",          Field::AlbumId,                 Numeric,      POSITIVE,  true,  0),
    info("songid",           Field::SongId,                  Numeric,      POSITIVE,  true,  0),
    info("sourceid",         Field::SourceId,                Numeric,      POSITIVE,  true,  0),
    info("genreid",          Field::GenreId,                 Numeric,      POSITIVE,  true,  0),
    info("artist genre",     Field::ArtistGenre,             Text,         None,      false, 515),
    info("artist scraped",   Field::ArtistLastScrape,        Date,         None,      false, 0),
    info("artist mbid",      Field::ArtistMbid,              Text,         None,      false, 0),
    info("artist moods",     Field::ArtistMoods,             Text,         None,      false, 175),
    info("born/formed",      Field::BornFormed,              Text,         None,      false, 21893),
    info("died/disbanded",   Field::DiedDisband,             Text,         None,      false, 21897),
    info("years active",     Field::YearsActive,             Text,         None,      false, 0),
    info("album genre",      Field::AlbumGenre,              Text,         None,      false, 515),
    info("album scraped",    Field::AlbumLastScrape,         Date,         None,      false, 0),
    info("album mbid",       Field::AlbumMbid,               Text,         None,      false, 0),
    info("releasegroup id",  Field::ReleaseGroupMbid,        Text,         None,      false, 0),
    info("album moods",      Field::AlbumMoods,              Text,         None,      false, 175),
    info("album styles",     Field::AlbumStyles,             Text,         None,      false, 176),
    info("album rating",     Field::AlbumRating,             Real,         RATING,    false, 563),
    info("album userrating", Field::AlbumUserRating,         Real,         MY_RATING, false, 38018),
    info("album votes",      Field::AlbumVotes,              Real,         POSITIVE,  false, 205),
    info("album year",       Field::AlbumYear,               Numeric,      POSITIVE,  true,  562),
];

impl Field {
    pub fn info(self) -> &'static FieldInfo {
        &FIELDS[self as usize]
    }

    /// Case-insensitive lookup by external name; unknown names are [`Field::None`].
    pub fn from_name(name: &str) -> Field {
        FIELDS
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| f.field)
            .unwrap_or(Field::None)
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn value_type(self) -> ValueType {
        self.info().value_type
    }

    pub fn validator(self) -> Option<Validator> {
        self.info().validator
    }

    pub fn is_browseable(self) -> bool {
        self.info().browseable
    }

    pub fn localized_string(self) -> u32 {
        self.info().localized_string
    }
}

/// A grouping option of a playlist.
#[derive(Debug)]
pub struct GroupInfo {
    pub name: &'static str,
    pub field: Field,
    pub can_mix: bool,
    pub localized_string: u32,
}

pub static GROUPS: [GroupInfo; 12] = [
    GroupInfo { name: "none", field: Field::None, can_mix: false, localized_string: 231 },
    GroupInfo { name: "sets", field: Field::Set, can_mix: true, localized_string: 20434 },
    GroupInfo { name: "genres", field: Field::Genre, can_mix: false, localized_string: 135 },
    GroupInfo { name: "years", field: Field::Year, can_mix: false, localized_string: 652 },
    GroupInfo { name: "actors", field: Field::Actor, can_mix: false, localized_string: 344 },
    GroupInfo { name: "directors", field: Field::Director, can_mix: false, localized_string: 20348 },
    GroupInfo { name: "writers", field: Field::Writer, can_mix: false, localized_string: 20418 },
    GroupInfo { name: "studios", field: Field::Studio, can_mix: false, localized_string: 20388 },
    GroupInfo { name: "countries", field: Field::Country, can_mix: false, localized_string: 20451 },
    GroupInfo { name: "artists", field: Field::Artist, can_mix: false, localized_string: 133 },
    GroupInfo { name: "albums", field: Field::Album, can_mix: false, localized_string: 132 },
    GroupInfo { name: "tags", field: Field::Tag, can_mix: false, localized_string: 20459 },
];

/// Field a group name stands for; `None` when the name is not a known group.
pub fn group_from_name(name: &str) -> Option<Field> {
    GROUPS
        .iter()
        .find(|g| g.name.eq_ignore_ascii_case(name))
        .map(|g| g.field)
}

pub fn group_name(field: Field) -> Option<&'static str> {
    GROUPS.iter().find(|g| g.field == field).map(|g| g.name)
}

pub fn can_group_mix(field: Field) -> bool {
    GROUPS.iter().any(|g| g.field == field && g.can_mix)
}

/// Sort orders a playlist may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    None,
    Genre,
    Album,
    Artist,
    Title,
    Year,
    Time,
    TrackNumber,
    File,
    Path,
    Playcount,
    LastPlayed,
    Rating,
    UserRating,
    TotalDiscs,
    AlbumType,
    SortTitle,
    TvShowStatus,
    Votes,
    NumberOfEpisodes,
    NumberOfWatchedEpisodes,
    Studio,
    Mpaa,
    DateAdded,
    TvShowTitle,
    EpisodeNumber,
    Season,
    Country,
    Top250,
    Random,
}

#[rustfmt::skip]
static SORT_KEYS: [(SortKey, &str, Field); 30] = [
    (SortKey::None,                    "none",            Field::None),
    (SortKey::Genre,                   "genre",           Field::Genre),
    (SortKey::Album,                   "album",           Field::Album),
    (SortKey::Artist,                  "artist",          Field::Artist),
    (SortKey::Title,                   "title",           Field::Title),
    (SortKey::Year,                    "year",            Field::Year),
    (SortKey::Time,                    "time",            Field::Time),
    (SortKey::TrackNumber,             "track",           Field::TrackNumber),
    (SortKey::File,                    "filename",        Field::Filename),
    (SortKey::Path,                    "path",            Field::Path),
    (SortKey::Playcount,               "playcount",       Field::Playcount),
    (SortKey::LastPlayed,              "lastplayed",      Field::LastPlayed),
    (SortKey::Rating,                  "rating",          Field::Rating),
    (SortKey::UserRating,              "userrating",      Field::UserRating),
    (SortKey::TotalDiscs,              "totaldiscs",      Field::TotalDiscs),
    (SortKey::AlbumType,               "albumtype",       Field::AlbumType),
    (SortKey::SortTitle,               "sorttitle",       Field::SortTitle),
    (SortKey::TvShowStatus,            "tvshowstatus",    Field::TvShowStatus),
    (SortKey::Votes,                   "votes",           Field::Votes),
    (SortKey::NumberOfEpisodes,        "totalepisodes",   Field::NumberOfEpisodes),
    (SortKey::NumberOfWatchedEpisodes, "watchedepisodes", Field::NumberOfWatchedEpisodes),
    (SortKey::Studio,                  "studio",          Field::Studio),
    (SortKey::Mpaa,                    "mpaa",            Field::Mpaa),
    (SortKey::DateAdded,               "dateadded",       Field::DateAdded),
    (SortKey::TvShowTitle,             "tvshowtitle",     Field::TvShowTitle),
    (SortKey::EpisodeNumber,           "episode",         Field::EpisodeNumber),
    (SortKey::Season,                  "season",          Field::Season),
    (SortKey::Country,                 "country",         Field::Country),
    (SortKey::Top250,                  "top250",          Field::Top250),
    (SortKey::Random,                  "random",          Field::Random),
];

impl SortKey {
    /// Unknown names sort by nothing.
    pub fn from_name(name: &str) -> SortKey {
        SORT_KEYS
            .iter()
            .find(|(_, n, _)| n.eq_ignore_ascii_case(name))
            .map(|(key, _, _)| *key)
            .unwrap_or(SortKey::None)
    }

    pub fn name(self) -> &'static str {
        SORT_KEYS
            .iter()
            .find(|(key, _, _)| *key == self)
            .map(|(_, n, _)| *n)
            .unwrap_or("none")
    }

    /// Field whose column the sort order is rendered from.
    pub fn field(self) -> Field {
        SORT_KEYS
            .iter()
            .find(|(key, _, _)| *key == self)
            .map(|(_, _, f)| *f)
            .unwrap_or(Field::None)
    }
}

/// Fields the rule editor offers for a media type, in display order.
pub fn available_fields(media_type: MediaType) -> Vec<Field> {
    use Field::*;
    let mut fields = match media_type {
        MediaType::Mixed => vec![
            Genre, Album, Artist, AlbumArtist, Title, OriginalTitle, Year, Time, TrackNumber,
            Filename, Path, Playcount, LastPlayed,
        ],
        MediaType::Songs => vec![
            Genre, Source, Album, DiscTitle, Artist, AlbumArtist, Title, Year, Time, TrackNumber,
            Filename, Path, Playcount, LastPlayed, Rating, UserRating, Comment, Moods,
        ],
        MediaType::Albums => vec![
            Genre, Source, Album, DiscTitle, TotalDiscs, IsBoxset, Artist, AlbumArtist, Year,
            Review, Themes, Moods, Styles, Compilation, AlbumType, MusicLabel, Rating, UserRating,
            Playcount, LastPlayed, Path,
        ],
        MediaType::Artists => vec![
            Artist, Source, Genre, Moods, Styles, Instruments, Biography, ArtistType, Gender,
            Disambiguation, Born, BandFormed, Disbanded, Died, Role, Path, Time,
        ],
        MediaType::TvShows => vec![
            Title, OriginalTitle, Plot, TvShowStatus, Votes, Rating, UserRating, Year, Genre,
            Director, Actor, NumberOfEpisodes, NumberOfWatchedEpisodes, Playcount, Path, Studio,
            Mpaa, DateAdded, LastPlayed, InProgress, Tag,
        ],
        MediaType::Episodes => vec![
            Title, TvShowTitle, OriginalTitle, Plot, Votes, Rating, UserRating, Time, Writer,
            AirDate, Playcount, LastPlayed, InProgress, Genre, Year, Director, Actor,
            EpisodeNumber, Season, Filename, Path, Studio, Mpaa, DateAdded, Tag,
        ],
        MediaType::Movies => vec![
            Title, OriginalTitle, Plot, PlotOutline, Tagline, Votes, Rating, UserRating, Time,
            Writer, Playcount, LastPlayed, InProgress, Genre, Country, Year, Director, Actor,
            Mpaa, Top250, Studio, Trailer, Filename, Path, Set, Tag, DateAdded,
        ],
        MediaType::MusicVideos => vec![
            Title, Genre, Album, Year, Artist, Filename, Path, Playcount, LastPlayed, Rating,
            UserRating, Time, Director, Studio, Plot, Tag, DateAdded,
        ],
    };
    if matches!(
        media_type,
        MediaType::Episodes | MediaType::Movies | MediaType::MusicVideos
    ) {
        fields.extend([
            VideoResolution,
            AudioChannels,
            AudioCount,
            SubtitleCount,
            VideoCodec,
            AudioCodec,
            AudioLanguage,
            SubtitleLanguage,
            VideoAspectRatio,
        ]);
    }
    fields.extend([Playlist, VirtualFolder]);
    fields
}

/// External names of [`available_fields`].
pub fn available_field_names(media_type: MediaType) -> Vec<&'static str> {
    available_fields(media_type)
        .into_iter()
        .map(Field::name)
        .collect()
}

pub fn available_sort_orders(media_type: MediaType) -> Vec<SortKey> {
    use SortKey::*;
    let mut orders = vec![None];
    orders.extend(match media_type {
        MediaType::Mixed => vec![
            Genre, Album, Artist, Title, Year, Time, TrackNumber, File, Path, Playcount,
            LastPlayed,
        ],
        MediaType::Songs => vec![
            Genre, Album, Artist, Title, Year, Time, TrackNumber, File, Path, Playcount,
            LastPlayed, Rating, UserRating,
        ],
        MediaType::Albums => vec![
            Genre, Album, TotalDiscs, Artist, Year, AlbumType, Rating, UserRating, Playcount,
            LastPlayed,
        ],
        MediaType::Artists => vec![Artist],
        MediaType::TvShows => vec![
            SortTitle, TvShowStatus, Votes, Rating, UserRating, Year, Genre, NumberOfEpisodes,
            NumberOfWatchedEpisodes, Path, Studio, Mpaa, DateAdded, LastPlayed,
        ],
        MediaType::Episodes => vec![
            Title, TvShowTitle, Votes, Rating, UserRating, Time, Playcount, LastPlayed, Year,
            EpisodeNumber, Season, File, Path, Studio, Mpaa, DateAdded,
        ],
        MediaType::Movies => vec![
            SortTitle, Votes, Rating, UserRating, Time, Playcount, LastPlayed, Genre, Country,
            Year, Mpaa, Top250, Studio, File, Path, DateAdded,
        ],
        MediaType::MusicVideos => vec![
            Title, Genre, Album, Year, Artist, File, Path, Playcount, LastPlayed, Time, Rating,
            UserRating, Studio, DateAdded,
        ],
    });
    orders.push(Random);
    orders
}

/// Grouping fields for a media type. An ungrouped playlist is the absence of
/// a group, so it is not listed.
pub fn available_groupings(media_type: MediaType) -> Vec<Field> {
    use Field::*;
    match media_type {
        MediaType::Artists => vec![Genre],
        MediaType::Albums => vec![Year],
        MediaType::Movies => vec![
            None, Set, Genre, Year, Actor, Director, Writer, Studio, Country, Tag,
        ],
        MediaType::TvShows => vec![Genre, Year, Actor, Director, Studio, Tag],
        MediaType::MusicVideos => vec![Artist, Album, Genre, Year, Director, Studio, Tag],
        MediaType::Songs | MediaType::Episodes | MediaType::Mixed => Vec::new(),
    }
}

/// `StringUtils::IsNaturalNumber` semantics: digits, optionally padded by spaces.
pub fn is_positive_integer(input: &str) -> bool {
    let trimmed = input.trim_matches(' ');
    !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit())
}

/// `[[HH:]MM:]SS` or `N min`.
pub fn is_time(input: &str) -> bool {
    let trimmed = input.trim();
    if let Some(minutes) = strip_suffix_ignore_case(trimmed, " min") {
        return is_positive_integer(minutes.trim_end());
    }
    let parts: Vec<&str> = trimmed.split(':').collect();
    parts.len() <= 3 && parts.iter().all(|p| is_positive_integer(p))
}

/// A real number in `[0.0, 10.0]`.
pub fn validate_rating(input: &str) -> bool {
    input
        .trim()
        .parse::<f64>()
        .map(|rating| (0.0..=10.0).contains(&rating))
        .unwrap_or(false)
}

/// A whole number no greater than 10.
pub fn validate_my_rating(input: &str) -> bool {
    is_positive_integer(input)
        && input
            .trim()
            .parse::<u32>()
            .map(|rating| rating <= 10)
            .unwrap_or(false)
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    if s.is_char_boundary(split) && s[split..].eq_ignore_ascii_case(suffix) {
        Some(&s[..split])
    } else {
        None
    }
}
