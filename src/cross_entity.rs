//! Cross-entity query assembler for the music library.
//!
//! Rules of an artists, albums or songs playlist that read another entity
//! (an artist field on an album playlist, a song field on an artist
//! playlist, role rules) are compiled together into one correlated
//! subquery per route, so that AND-ed conditions have to hold for the same
//! related row.
//!
//! Two routes link artists to albums and songs: the album-artist route
//! (`album_artist`) and the song-artist route (`song_artist`, qualified by
//! `role`). Role rules select which of the two are used.

use crate::ast::{Combinator, Operator, Rule};
use crate::columns::{native_table, Relation, Scope};
use crate::field::Field;
use crate::media::MediaType;
use crate::rule::RuleContext;
use crate::sql::{combine_clause, parenthesize, ExistsSubQuery};

/// Role id of the plain song artist.
const DEFAULT_ROLE_CLAUSE: &str = "song_artist.idRole = 1";

/// Compiles a group of cross-entity rules for `media_type`, correlated with
/// the outer view `outer`. Only the music types need this; every other type
/// yields an empty fragment.
pub fn where_clause(
    media_type: MediaType,
    rules: &[&Rule],
    combinator: Combinator,
    outer: &str,
    env: RuleContext<'_>,
) -> String {
    let assembler = Assembler {
        rules,
        combinator,
        outer,
        env,
    };
    match media_type {
        MediaType::Artists => assembler.artists(),
        MediaType::Albums => assembler.albums(),
        MediaType::Songs => assembler.songs(),
        MediaType::Movies
        | MediaType::TvShows
        | MediaType::Episodes
        | MediaType::MusicVideos
        | MediaType::Mixed => String::new(),
    }
}

/// Outcome of inspecting the role rules of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RoleFilter {
    /// Condition on `song_artist` (and `role` when `join_role`).
    clause: String,
    album_artists: bool,
    song_artists: bool,
    join_role: bool,
    role_rules: bool,
}

/// Artist clauses of album and song playlists, kept apart by field.
#[derive(Debug, Default)]
struct ArtistClauses {
    other: String,
    artist: String,
    album_artist: String,
}

impl ArtistClauses {
    fn any(&self) -> bool {
        !(self.other.is_empty() && self.artist.is_empty() && self.album_artist.is_empty())
    }
}

enum SongPart<'r> {
    Path(String),
    Song(&'r Rule),
}

struct Assembler<'a> {
    rules: &'a [&'a Rule],
    combinator: Combinator,
    outer: &'a str,
    env: RuleContext<'a>,
}

impl<'a> Assembler<'a> {
    fn combine(&self, original: &str, clause: &str) -> String {
        combine_clause(original, clause, self.combinator)
    }

    fn compile(&self, rule: &Rule, relation: Relation, alias: &str) -> String {
        rule.grouped_where_clause(Scope::new(relation, alias), self.env)
    }

    fn outer_column(&self, column: &str) -> String {
        format!("{}.{}", self.outer, column)
    }

    /// `EXISTS` over `path` for a path rule, correlated with `song`.
    fn path_clause(&self, rule: &Rule) -> String {
        let query = rule.where_clause(Scope::table(Relation::Path), self.env);
        if query.is_empty() {
            return String::new();
        }
        let mut exists = ExistsSubQuery::new("path", "path.idPath = song.idPath");
        exists.append_where(query);
        exists.build()
    }

    /// Source rules compiled against the album id reachable as `alias.idAlbum`.
    fn source_clause(&self, rules: &[&Rule], alias: &str) -> String {
        rules.iter().fold(String::new(), |acc, rule| {
            self.combine(&acc, &self.compile(rule, Relation::Album, alias))
        })
    }

    fn song_clause(&self, parts: &[SongPart<'_>], alias: &str) -> String {
        parts.iter().fold(String::new(), |acc, part| match part {
            SongPart::Path(clause) => self.combine(&acc, clause),
            SongPart::Song(rule) => self.combine(&acc, &self.compile(rule, Relation::Song, alias)),
        })
    }

    fn roles(&self) -> RoleFilter {
        let and = self.combinator == Combinator::And;
        let mut wild = false;
        let mut album_artist_rule = false;
        let mut artist_rule = false;
        let mut negated_album_artist = false;
        let mut negated_artist = false;
        let mut role_rules = false;
        let mut named_roles: Vec<&Rule> = Vec::new();

        for rule in self.rules.iter().filter(|r| r.field == Field::Role) {
            role_rules = true;
            let negated = matches!(
                rule.operator,
                Operator::DoesNotContain | Operator::DoesNotEqual
            );
            let role = rule.first_parameter();
            if role.eq_ignore_ascii_case("albumartist") {
                album_artist_rule = and;
                negated_album_artist = negated;
            } else if role.eq_ignore_ascii_case("artist") {
                artist_rule = and;
                negated_artist = negated;
            } else if role == "%" {
                wild = true;
            } else {
                named_roles.push(rule);
            }
        }

        let mut album_artists = true;
        let mut song_artists = true;
        if wild {
            named_roles.clear();
        } else {
            if (negated_album_artist && album_artist_rule) || (!negated_artist && artist_rule) {
                album_artists = false;
            }
            if (negated_artist && artist_rule) || (!negated_album_artist && album_artist_rule) {
                song_artists = false;
            }
            if !album_artists && !song_artists {
                album_artists = true;
            }
        }

        if !wild && named_roles.is_empty() {
            return RoleFilter {
                clause: DEFAULT_ROLE_CLAUSE.to_string(),
                album_artists,
                song_artists,
                join_role: false,
                role_rules: false,
            };
        }

        let mut clause = String::new();
        for rule in named_roles {
            let query = self.compile(rule, Relation::Role, "role");
            if query.is_empty() {
                continue;
            }
            if !and {
                if !clause.is_empty() {
                    clause.push_str(" OR ");
                }
                clause.push_str(&query);
            } else if clause.is_empty() {
                clause = query;
            } else {
                // Further roles of the same artist on the same song.
                let mut same_song = ExistsSubQuery::new(
                    "song_artist AS sa1",
                    "sa1.idArtist = song_artist.idArtist AND sa1.idSong = song_artist.idSong",
                )
                .join("JOIN role AS r1 ON sa1.idRole = r1.idRole");
                same_song.append_where(self.compile(rule, Relation::Role, "r1"));
                clause = self.combine(&clause, &same_song.build());
            }
        }
        if !clause.is_empty() && song_artists {
            album_artists = false;
        }
        RoleFilter {
            clause,
            album_artists,
            song_artists,
            join_role: true,
            role_rules,
        }
    }

    /// Adds the role condition to a `song_artist` subquery.
    fn apply_roles(&self, song_artist: &mut ExistsSubQuery, roles: &RoleFilter) {
        if roles.clause.is_empty() {
            return;
        }
        if roles.join_role {
            song_artist.append_join("JOIN role ON song_artist.idRole = role.idRole");
            song_artist.append_where(format!("({})", roles.clause));
        } else {
            song_artist.append_where(roles.clause.as_str());
        }
    }

    /// Artist-level rules of an album or song playlist, compiled against `artist`.
    fn artist_clauses(&self, media_type: MediaType) -> ArtistClauses {
        let mut clauses = ArtistClauses::default();
        for rule in self.rules {
            if native_table(rule.field, media_type) != Relation::Artist {
                continue;
            }
            let query = self.compile(rule, Relation::Artist, "artist");
            match rule.field {
                Field::Artist => clauses.artist = self.combine(&clauses.artist, &query),
                Field::AlbumArtist => {
                    clauses.album_artist = self.combine(&clauses.album_artist, &query)
                }
                _ => clauses.other = self.combine(&clauses.other, &query),
            }
        }
        clauses
    }

    /// Artist conditions for the album-artist and song-artist routes. Artist
    /// and album artist rules only share a route when not both are present.
    fn route_artist_clauses(&self, clauses: &ArtistClauses) -> (String, String) {
        if !clauses.album_artist.is_empty() && !clauses.artist.is_empty() {
            (
                self.combine(&clauses.other, &clauses.album_artist),
                self.combine(&clauses.other, &clauses.artist),
            )
        } else {
            let all = self.combine(&clauses.other, &clauses.album_artist);
            let all = self.combine(&all, &clauses.artist);
            (all.clone(), all)
        }
    }

    fn artists(&self) -> String {
        let roles = self.roles();

        let mut song_parts: Vec<SongPart<'_>> = Vec::new();
        let mut album_clause = String::new();
        let mut source_rules: Vec<&Rule> = Vec::new();
        // The song-artist route needs the song table itself, not only idSong.
        let mut song_artist_needs_song = false;

        for rule in self.rules {
            match rule.field {
                Field::Path => {
                    let path = self.path_clause(rule);
                    if !path.is_empty() {
                        song_parts.push(SongPart::Path(path));
                        song_artist_needs_song = true;
                    }
                }
                Field::Source => {
                    source_rules.push(rule);
                    song_artist_needs_song = true;
                }
                field => match native_table(field, MediaType::Artists) {
                    Relation::Song => {
                        song_parts.push(SongPart::Song(rule));
                        if field != Field::Genre {
                            song_artist_needs_song = true;
                        }
                    }
                    Relation::Album => {
                        album_clause =
                            self.combine(&album_clause, &self.compile(rule, Relation::Album, "album"));
                        song_artist_needs_song = true;
                    }
                    _ => {}
                },
            }
        }

        let song_clause = self.song_clause(&song_parts, "song");
        let has_source = !source_rules.is_empty();
        let album_artist_needs_song =
            !song_clause.is_empty() || (roles.join_role && !roles.song_artists);

        let mut song_artist = ExistsSubQuery::new(
            "song_artist",
            format!("song_artist.idArtist = {}", self.outer_column("idArtist")),
        );
        self.apply_roles(&mut song_artist, &roles);

        // Album-artist route.
        let mut album_artist_clause = String::new();
        if album_artist_needs_song {
            let mut songs = song_clause.clone();
            if roles.role_rules && roles.album_artists && !roles.song_artists {
                let mut with_roles = song_artist.clone();
                with_roles.append_where("song_artist.idSong = song.idSong");
                songs = self.combine(&songs, &with_roles.build());
            }
            let mut song = ExistsSubQuery::new("song", "song.idAlbum = album_artist.idAlbum");
            song.append_where(parenthesize(&songs));
            album_artist_clause = song.build();
        }
        if !album_clause.is_empty() {
            let mut inner = self.combine(&album_clause, &self.source_clause(&source_rules, "album"));
            inner = self.combine(&inner, &album_artist_clause);
            let mut album = ExistsSubQuery::new("album", "album.idAlbum = album_artist.idAlbum");
            album.append_where(parenthesize(&inner));
            album_artist_clause = album.build();
        } else if has_source {
            album_artist_clause = self.combine(
                &self.source_clause(&source_rules, "album_artist"),
                &album_artist_clause,
            );
        }
        let mut album_artist = ExistsSubQuery::new(
            "album_artist",
            format!("album_artist.idArtist = {}", self.outer_column("idArtist")),
        );
        album_artist.append_where(parenthesize(&album_artist_clause));

        // Song-artist route.
        let mut song_artist_clause = String::new();
        if !album_clause.is_empty() {
            let inner = self.combine(&album_clause, &self.source_clause(&source_rules, "album"));
            let mut album = ExistsSubQuery::new("album", "album.idAlbum = song.idAlbum");
            album.append_where(parenthesize(&inner));
            song_artist_clause = album.build();
        } else if has_source {
            song_artist_clause = self.source_clause(&source_rules, "song");
        }
        if song_artist_needs_song {
            let inner = self.combine(&song_clause, &song_artist_clause);
            let mut song = ExistsSubQuery::new("song", "song.idSong = song_artist.idSong");
            song.append_where(parenthesize(&inner));
            song_artist_clause = song.build();
        } else if !song_clause.is_empty() {
            // Genre only: song_artist already carries idSong.
            song_artist_clause = self.song_clause(&song_parts, "song_artist");
        }
        song_artist.append_where(parenthesize(&song_artist_clause));

        let mut rule = String::new();
        if roles.album_artists {
            rule.push_str(&album_artist.build());
        }
        if roles.song_artists {
            if !rule.is_empty() {
                if roles.join_role && self.combinator == Combinator::And {
                    rule.push_str(" AND ");
                } else {
                    rule.push_str(" OR ");
                }
            }
            rule.push_str(&song_artist.build());
        }
        rule
    }

    fn albums(&self) -> String {
        let roles = self.roles();

        let mut song_clause = String::new();
        for rule in self.rules {
            if rule.field == Field::Path {
                song_clause = self.combine(&song_clause, &self.path_clause(rule));
            } else if native_table(rule.field, MediaType::Albums) == Relation::Song {
                song_clause =
                    self.combine(&song_clause, &self.compile(rule, Relation::Song, "song"));
            }
        }
        let artists = self.artist_clauses(MediaType::Albums);

        let album_artist_and_role = roles.role_rules
            && (!artists.album_artist.is_empty() || (roles.album_artists && !roles.song_artists));

        let mut song = ExistsSubQuery::new(
            "song",
            format!("song.idAlbum = {}", self.outer_column("idAlbum")),
        );
        let mut album_artist = ExistsSubQuery::new(
            "album_artist",
            format!("album_artist.idAlbum = {}", self.outer_column("idAlbum")),
        )
        .join("JOIN artist ON artist.idArtist = album_artist.idArtist");

        let mut song_artist = ExistsSubQuery::new("song_artist", "song_artist.idSong = song.idSong");
        if album_artist_and_role {
            song_artist.append_where("song_artist.idArtist = album_artist.idArtist");
        } else if artists.any() {
            song_artist.append_join("JOIN artist ON artist.idArtist = song_artist.idArtist");
        }
        self.apply_roles(&mut song_artist, &roles);

        let (artist_clause_album, artist_clause_song) = self.route_artist_clauses(&artists);

        let mut song_artist_sql = String::new();
        if !artist_clause_song.is_empty() || roles.role_rules {
            if !artist_clause_song.is_empty() && !album_artist_and_role {
                song_artist.append_where(format!("({artist_clause_song})"));
            }
            song_artist_sql = song_artist.build();
        }

        let mut song_sql_no_artist = String::new();
        if !song_clause.is_empty() {
            song.append_where(format!("({song_clause})"));
            song_sql_no_artist = song.build();
        }
        let mut song_sql = self.combine(&song_clause, &song_artist_sql);
        if !song_sql.is_empty() {
            song.clear_where();
            song.append_where(format!("({song_sql})"));
            song_sql = song.build();
        }

        if !artist_clause_album.is_empty() {
            album_artist.append_where(format!("({artist_clause_album})"));
        }
        if album_artist_and_role {
            album_artist.append_where(song_sql.as_str());
        }
        let mut album_artist_sql = album_artist.build();
        if roles.role_rules && !roles.album_artists && artists.album_artist.is_empty() {
            album_artist_sql.clear();
        }

        if !artists.album_artist.is_empty() || (roles.album_artists && !roles.song_artists) {
            // Album artist route only; song conditions ride along without
            // song artists unless an artist rule must also hold on songs.
            let song_route_needed = (!artists.artist.is_empty() && !artists.album_artist.is_empty())
                || !roles.album_artists;
            if roles.role_rules {
                album_artist_sql
            } else if song_route_needed {
                self.combine(&album_artist_sql, &song_sql)
            } else {
                self.combine(&album_artist_sql, &song_sql_no_artist)
            }
        } else if !song_artist_sql.is_empty() {
            if self.combinator != Combinator::And {
                self.combine(&album_artist_sql, &song_sql)
            } else {
                // Song conditions repeated for both routes.
                let mut rule = self.combine(&album_artist_sql, &song_sql_no_artist);
                if !rule.is_empty() {
                    rule.push_str(" OR ");
                }
                rule.push_str(&song_sql);
                rule
            }
        } else {
            song_sql
        }
    }

    fn songs(&self) -> String {
        let roles = self.roles();

        let mut album_clause = String::new();
        let mut source_rules: Vec<&Rule> = Vec::new();
        for rule in self.rules {
            match native_table(rule.field, MediaType::Songs) {
                Relation::Album if rule.field == Field::Source => source_rules.push(rule),
                Relation::Album => {
                    album_clause =
                        self.combine(&album_clause, &self.compile(rule, Relation::Album, "album"));
                }
                _ => {}
            }
        }
        let artists = self.artist_clauses(MediaType::Songs);

        let album_artist_only =
            !artists.album_artist.is_empty() || (roles.album_artists && !roles.song_artists);
        let album_artist_and_role = roles.role_rules && album_artist_only;

        let album_sql = if !album_clause.is_empty() {
            let inner = self.combine(&album_clause, &self.source_clause(&source_rules, "album"));
            let mut album = ExistsSubQuery::new(
                "album",
                format!("album.idAlbum = {}", self.outer_column("idAlbum")),
            );
            album.append_where(format!("({inner})"));
            album.build()
        } else {
            self.source_clause(&source_rules, self.outer)
        };

        let mut album_artist = ExistsSubQuery::new(
            "album_artist",
            format!("album_artist.idAlbum = {}", self.outer_column("idAlbum")),
        )
        .join("JOIN artist ON artist.idArtist = album_artist.idArtist");

        let mut song_artist = ExistsSubQuery::new(
            "song_artist",
            format!("song_artist.idSong = {}", self.outer_column("idSong")),
        );
        if album_artist_and_role {
            song_artist.append_where("song_artist.idArtist = album_artist.idArtist");
        } else if artists.any() {
            song_artist.append_join("JOIN artist ON artist.idArtist = song_artist.idArtist");
        }
        self.apply_roles(&mut song_artist, &roles);

        let (artist_clause_album, artist_clause_song) = self.route_artist_clauses(&artists);

        let mut song_artist_sql = String::new();
        if !artist_clause_song.is_empty() || roles.role_rules {
            if !artist_clause_song.is_empty() && !album_artist_and_role {
                song_artist.append_where(format!("({artist_clause_song})"));
            }
            song_artist_sql = song_artist.build();
        }

        if !artist_clause_album.is_empty() {
            album_artist.append_where(format!("({artist_clause_album})"));
        }
        if album_artist_and_role {
            album_artist.append_where(song_artist_sql.as_str());
        }
        let mut album_artist_sql = album_artist.build();
        if roles.role_rules && !roles.album_artists && artists.album_artist.is_empty() {
            album_artist_sql.clear();
        }

        let both_artist_fields = !artists.artist.is_empty() && !artists.album_artist.is_empty();
        let rule = if both_artist_fields && !album_artist_and_role {
            self.combine(&album_artist_sql, &song_artist_sql)
        } else if album_artist_only {
            album_artist_sql
        } else if roles.role_rules {
            song_artist_sql
        } else if !artist_clause_song.is_empty() {
            format!("{album_artist_sql} OR {song_artist_sql}")
        } else {
            String::new()
        };

        self.combine(&album_sql, &rule)
    }
}
