//! Compilation of a single [`Rule`] into a SQL boolean fragment.
//!
//! Unknown or unsupported field/relation combinations compile to an empty
//! string, which callers treat as "no filter".

use chrono::{NaiveDate, TimeDelta};
use log::debug;

use crate::ast::{Operator, Rule};
use crate::columns::{Relation, Scope};
use crate::field::{Field, ValueType, RULE_VALUE_SEPARATOR};
use crate::sql::{escape, quote, ExistsSubQuery};

const STREAM_TYPE_AUDIO: i32 = 2;
const STREAM_TYPE_SUBTITLE: i32 = 3;

/// What a rule compile reads besides the rule and its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleContext<'a> {
    /// Anchor of the relative date operators.
    pub today: NaiveDate,
    /// View consulted for episode resume points when filtering tv shows.
    pub episode_view: &'a str,
}

impl RuleContext<'static> {
    /// Context with the default episode view.
    pub fn new(today: NaiveDate) -> Self {
        RuleContext {
            today,
            episode_view: "episode_view",
        }
    }
}

impl Rule {
    /// Checks a (possibly multi-valued) parameter string against the field's
    /// validator. Fields without a validator accept anything.
    pub fn validate(&self, value: &str) -> bool {
        match self.field.validator() {
            Some(validator) => value.split(RULE_VALUE_SEPARATOR).all(validator),
            None => true,
        }
    }

    /// Validates every parameter the rule carries.
    pub fn is_valid(&self) -> bool {
        match self.field.validator() {
            Some(validator) => self.parameters.iter().all(|p| validator(p)),
            None => true,
        }
    }

    /// Compiles the rule against `scope`.
    pub fn where_clause(&self, scope: Scope<'_>, env: RuleContext<'_>) -> String {
        let clause = RuleCompiler {
            rule: self,
            scope,
            env,
        }
        .compile();
        if clause.is_empty() {
            debug!(
                "rule '{} {} {}' adds no filter on {:?}",
                self.field.name(),
                self.operator.name(),
                self.parameter_string(),
                scope.relation
            );
        }
        clause
    }

    /// [`Rule::where_clause`], parenthesized when several parameters were
    /// joined, so it can sit next to other clauses.
    pub fn grouped_where_clause(&self, scope: Scope<'_>, env: RuleContext<'_>) -> String {
        let clause = self.where_clause(scope, env);
        if self.parameters.len() > 1 && !clause.is_empty() {
            format!("({clause})")
        } else {
            clause
        }
    }
}

struct RuleCompiler<'r, 's, 'e> {
    rule: &'r Rule,
    scope: Scope<'s>,
    env: RuleContext<'e>,
}

impl RuleCompiler<'_, '_, '_> {
    fn field(&self) -> Field {
        self.rule.field
    }

    fn value_type(&self) -> ValueType {
        self.rule.field.value_type()
    }

    /// Operator after media-specific remapping. Tv show and episode years
    /// are premiere dates, so equality becomes substring matching.
    fn operator(&self) -> Operator {
        let op = self.rule.operator;
        if self.field() == Field::Year
            && matches!(self.scope.relation, Relation::TvShow | Relation::Episode)
        {
            return match op {
                Operator::Equals => Operator::Contains,
                Operator::DoesNotEqual => Operator::DoesNotContain,
                other => other,
            };
        }
        op
    }

    fn compile(&self) -> String {
        if self.field() == Field::None {
            return String::new();
        }
        let op = self.operator();
        let mut negate = op == Operator::DoesNotContain
            || op == Operator::False
            || (op == Operator::DoesNotEqual && !self.value_type().is_numeric());

        if matches!(self.rule.operator, Operator::True | Operator::False) {
            return self.boolean_query(negate);
        }

        if self.value_type() == ValueType::Boolean
            && matches!(
                op,
                Operator::Contains
                    | Operator::Equals
                    | Operator::DoesNotContain
                    | Operator::DoesNotEqual
            )
        {
            let value = self.rule.first_parameter().trim();
            if !(value.eq_ignore_ascii_case("true") || value == "1") {
                negate = !negate;
            }
            return self.boolean_query(negate);
        }

        if op == Operator::Between {
            return self.between_query();
        }

        self.format_parameters(negate, op)
    }

    fn boolean_query(&self, negate: bool) -> String {
        let not = if negate { "NOT " } else { "" };
        let alias = self.scope.alias;
        match (self.scope.relation, self.field()) {
            (Relation::Movie | Relation::Episode, Field::InProgress) => format!(
                "{alias}.idFile {not}IN (SELECT DISTINCT idFile FROM bookmark WHERE type = 1)"
            ),
            (Relation::Movie, Field::Trailer) => match self.scope.column(Field::Trailer) {
                Some(column) => format!("{not}{column} != ''"),
                None => String::new(),
            },
            (Relation::TvShow, Field::InProgress) => format!(
                "{not}(({alias}.watchedcount > 0 AND {alias}.watchedcount < {alias}.totalCount) OR \
                 ({alias}.watchedcount = 0 AND EXISTS (SELECT 1 FROM {episodes} \
                 WHERE {episodes}.idShow = {id} AND {episodes}.resumeTimeInSeconds > 0)))",
                episodes = self.env.episode_view,
                id = self.scope.id()
            ),
            (Relation::Album, Field::Compilation) => match self.scope.column(Field::Compilation) {
                Some(column) => format!("{not}{column}"),
                None => String::new(),
            },
            (Relation::Album, Field::IsBoxset) => format!("{not}{alias}.bBoxedSet = 1"),
            _ => String::new(),
        }
    }

    fn between_query(&self) -> String {
        let [low, high] = self.rule.parameters.as_slice() else {
            return String::new();
        };
        let Some(column) = self.scope.column(self.field()) else {
            return String::new();
        };
        match self.value_type() {
            ValueType::Real => format!(
                "{column} BETWEEN {} AND {}",
                numeric_value(low),
                numeric_value(high)
            ),
            ValueType::Numeric => format!(
                "CAST({column} as DECIMAL(6,1)) BETWEEN {} AND {}",
                numeric_value(low),
                numeric_value(high)
            ),
            ValueType::Seconds => format!(
                "CAST({column} as INTEGER) BETWEEN {} AND {}",
                time_string_to_seconds(low),
                time_string_to_seconds(high)
            ),
            _ => format!("{column} BETWEEN {} AND {}", quote(low), quote(high)),
        }
    }

    /// Renders every parameter and joins them: affirmative rules match any
    /// value, negated rules must exclude all of them.
    fn format_parameters(&self, negate: bool, op: Operator) -> String {
        match (self.scope.relation, self.field()) {
            (Relation::Song, Field::Genre) => {
                let exists = ExistsSubQuery::new(
                    "song_genre",
                    format!("song_genre.idSong = {}", self.scope.id()),
                )
                .join("JOIN genre ON genre.idGenre = song_genre.idGenre");
                return self.multi_value_exists(exists, "genre.strGenre", negate, op);
            }
            (Relation::Album, Field::Source) => {
                let exists = ExistsSubQuery::new(
                    "album_source",
                    format!("album_source.idAlbum = {}", self.scope.qualify("idAlbum")),
                )
                .join("JOIN source ON album_source.idSource = source.idSource");
                return self.multi_value_exists(exists, "source.strName", negate, op);
            }
            _ => {}
        }

        let joiner = if negate { " AND " } else { " OR " };
        self.rule
            .parameters
            .iter()
            .map(|param| self.format_where_clause(negate, op, param))
            .filter(|clause| !clause.is_empty())
            .map(|clause| format!("({clause})"))
            .collect::<Vec<_>>()
            .join(joiner)
    }

    /// One subquery matching any of the values, or one negated subquery per
    /// value when the rule is negated.
    fn multi_value_exists(
        &self,
        mut exists: ExistsSubQuery,
        column: &str,
        negate: bool,
        op: Operator,
    ) -> String {
        let clauses: Vec<String> = self
            .rule
            .parameters
            .iter()
            .map(|param| self.generic_clause(column, false, op, param))
            .collect();
        if clauses.is_empty() {
            return String::new();
        }

        if negate {
            clauses
                .iter()
                .map(|clause| {
                    exists.clear_where();
                    exists.append_where(clause.as_str());
                    format!("NOT {}", exists.build())
                })
                .collect::<Vec<_>>()
                .join(" AND ")
        } else {
            let gathered = clauses.join(" OR ");
            if clauses.len() > 1 {
                exists.append_where(format!("({gathered})"));
            } else {
                exists.append_where(gathered);
            }
            exists.build()
        }
    }

    fn format_where_clause(&self, negate: bool, op: Operator, param: &str) -> String {
        let not = if negate { "NOT " } else { "" };
        let cmp = self.comparison(op, param);
        let alias = self.scope.alias;
        let field = self.field();
        let nullable_before = matches!(
            self.rule.operator,
            Operator::LessThan | Operator::Before | Operator::NotInTheLast
        );
        let column = self.scope.column(field);

        let special = match self.scope.relation {
            Relation::Song | Relation::Album
                if field == Field::LastPlayed && nullable_before =>
            {
                column.as_deref().map(|c| null_or(c, &cmp))
            }
            Relation::Album if field == Field::DiscTitle => Some(format!(
                "{not}EXISTS (SELECT 1 FROM song WHERE song.idAlbum = {} AND song.strDiscSubtitle {cmp})",
                self.scope.id()
            )),
            relation if relation.is_video() => self.video_clause(not, &cmp, nullable_before),
            _ => None,
        };

        let special = special.or_else(|| self.stream_details_clause(not, &cmp, param));

        let special = match self.scope.relation {
            Relation::Movie | Relation::Episode | Relation::MusicVideo
                if field == Field::Playcount =>
            {
                let op = self.rule.operator;
                if (op == Operator::Equals && param == "0")
                    || (op == Operator::DoesNotEqual && param != "0")
                    || op == Operator::LessThan
                {
                    column.as_deref().map(|c| null_or(c, &cmp)).or(special)
                } else {
                    special
                }
            }
            _ => special,
        };

        if let Some(clause) = special {
            return clause;
        }

        let Some(column) = column else {
            return String::new();
        };
        self.generic_clause(&column, negate, op, param)
    }

    /// Link-table, nullable-date and per-type clauses of the video views.
    fn video_clause(&self, not: &str, cmp: &str, nullable_before: bool) -> Option<String> {
        let relation = self.scope.relation;
        let id = self.scope.id();
        let show_id = self.scope.qualify("idShow");
        let own = relation.link_media_type().unwrap_or_default();
        let field = self.field();

        if matches!(field, Field::LastPlayed | Field::DateAdded) && nullable_before {
            return self.scope.column(field).map(|c| null_or(&c, cmp));
        }

        let link = |name: &str, table: &str, media_id: &str, media_type: &str| {
            Some(format!(
                "{not}{}",
                link_query(name, table, media_id, media_type, cmp)
            ))
        };

        match (relation, field) {
            (Relation::Episode, Field::Genre) => link("genre", "genre", show_id.as_str(), "tvshow"),
            (Relation::Episode, Field::Tag) => link("tag", "tag", show_id.as_str(), "tvshow"),
            (Relation::Episode, Field::Studio) => link("studio", "studio", show_id.as_str(), "tvshow"),
            (_, Field::Genre) => link("genre", "genre", id.as_str(), own),
            (_, Field::Tag) => link("tag", "tag", id.as_str(), own),
            (_, Field::Studio) => link("studio", "studio", id.as_str(), own),
            (Relation::Movie, Field::Country) => link("country", "country", id.as_str(), own),
            (Relation::Movie | Relation::Episode, Field::Writer) => {
                link("writer", "actor", id.as_str(), own)
            }
            (Relation::MusicVideo, Field::Artist | Field::AlbumArtist) => {
                link("actor", "actor", id.as_str(), own)
            }
            (Relation::Movie | Relation::TvShow | Relation::Episode, Field::Actor) => {
                link("actor", "actor", id.as_str(), own)
            }
            (_, Field::Director) => link("director", "actor", id.as_str(), own),
            (Relation::TvShow | Relation::Episode, Field::Mpaa) => self
                .scope
                .column(Field::Mpaa)
                .map(|c| format!("{not}({c} {cmp})")),
            (Relation::TvShow, Field::Playcount) => {
                let total = self.scope.column(Field::NumberOfEpisodes)?;
                let watched = self.scope.column(Field::NumberOfWatchedEpisodes)?;
                Some(format!(
                    "CASE WHEN COALESCE({total} - {watched}, 0) > 0 THEN 0 ELSE 1 END {cmp}"
                ))
            }
            _ => None,
        }
    }

    /// Fields read from the per-file `streamdetails` table.
    fn stream_details_clause(&self, not: &str, cmp: &str, param: &str) -> Option<String> {
        if !self.scope.relation.is_video() {
            return None;
        }
        let file = self.scope.qualify("idFile");
        let exists = |column: &str| {
            Some(format!(
                "{not}EXISTS (SELECT 1 FROM streamdetails WHERE streamdetails.idFile = {file} AND {column} {cmp})"
            ))
        };
        let count = |stream_type: i32| {
            Some(format!(
                "{not}EXISTS (SELECT 1 FROM streamdetails WHERE streamdetails.idFile = {file} \
                 AND streamdetails.iStreamType = {stream_type} GROUP BY streamdetails.idFile \
                 HAVING COUNT(streamdetails.iStreamType) {cmp})"
            ))
        };
        match self.field() {
            Field::VideoResolution => {
                let range = video_resolution_range(self.rule.operator, param)?;
                Some(format!(
                    "{file} {not}IN (SELECT DISTINCT idFile FROM streamdetails WHERE iVideoWidth {range})"
                ))
            }
            Field::AudioChannels => exists("iAudioChannels"),
            Field::VideoCodec => exists("strVideoCodec"),
            Field::AudioCodec => exists("strAudioCodec"),
            Field::AudioLanguage => exists("strAudioLanguage"),
            Field::SubtitleLanguage => exists("strSubtitleLanguage"),
            Field::VideoAspectRatio => exists("fVideoAspect"),
            Field::AudioCount => count(STREAM_TYPE_AUDIO),
            Field::SubtitleCount => count(STREAM_TYPE_SUBTITLE),
            _ => None,
        }
    }

    /// `<column> [NOT] <comparison>`, with numeric casts and the empty-or-NULL
    /// widening.
    fn generic_clause(&self, column: &str, negate: bool, op: Operator, param: &str) -> String {
        let expr = match self.value_type() {
            ValueType::Numeric => format!("CAST({column} as DECIMAL(6,1))"),
            ValueType::Seconds => format!("CAST({column} as INTEGER)"),
            _ => column.to_string(),
        };
        let not = if negate { "NOT " } else { "" };
        let mut query = format!("{expr} {not}{}", self.comparison(op, param));
        if param.is_empty() != negate {
            query.push_str(&format!(" OR {column} IS NULL"));
        }
        query
    }

    /// Right-hand side of a comparison for one parameter, e.g. `LIKE '%x%'`.
    fn comparison(&self, op: Operator, param: &str) -> String {
        let value_type = self.value_type();
        if value_type == ValueType::TextIn {
            let values: Vec<String> = param.split(',').map(|v| quote(v.trim())).collect();
            return format!("IN ({})", values.join(","));
        }

        let value = if self.field() == Field::Time {
            time_string_to_seconds(param).to_string()
        } else if value_type == ValueType::Date
            && matches!(
                self.rule.operator,
                Operator::InTheLast | Operator::NotInTheLast
            )
        {
            date_before_period(self.env.today, param)
        } else if value_type.is_numeric() {
            numeric_value(param)
        } else {
            param.to_string()
        };
        operator_template(op, value_type.is_numeric(), &value)
    }
}

/// Comparison template of an operator applied to an already formatted value.
fn operator_template(op: Operator, numeric: bool, value: &str) -> String {
    let literal = |v: &str| {
        if numeric {
            v.to_string()
        } else {
            quote(v)
        }
    };
    match op {
        Operator::Contains | Operator::DoesNotContain => format!("LIKE '%{}%'", escape(value)),
        Operator::Equals if numeric => format!("= {value}"),
        Operator::DoesNotEqual if numeric => format!("!= {value}"),
        Operator::Equals | Operator::DoesNotEqual => format!("LIKE {}", quote(value)),
        Operator::StartsWith => format!("LIKE '{}%'", escape(value)),
        Operator::EndsWith => format!("LIKE '%{}'", escape(value)),
        Operator::After | Operator::GreaterThan | Operator::InTheLast => {
            format!("> {}", literal(value))
        }
        Operator::Before | Operator::LessThan | Operator::NotInTheLast => {
            format!("< {}", literal(value))
        }
        Operator::True => "= 1".to_string(),
        Operator::False => "= 0".to_string(),
        Operator::Between => String::new(),
    }
}

fn null_or(column: &str, cmp: &str) -> String {
    format!("({column} IS NULL) OR ({column} {cmp})")
}

fn link_query(link: &str, table: &str, media_id: &str, media_type: &str, cmp: &str) -> String {
    let mut exists = ExistsSubQuery::new(
        format!("{link}_link"),
        format!("{link}_link.media_id = {media_id}"),
    )
    .join(format!(
        "JOIN {table} ON {table}.{table}_id = {link}_link.{table}_id"
    ));
    exists.append_where(format!("{table}.name {cmp}"));
    exists.append_where(format!("{link}_link.media_type = '{media_type}'"));
    exists.build()
}

/// Width bounds for a resolution parameter, e.g. `>= 1281 AND iVideoWidth <= 1920`.
fn video_resolution_range(op: Operator, param: &str) -> Option<String> {
    let resolution = leading_integer(param);
    let (min, max) = match resolution {
        r if r >= 2160 => (1921, i32::MAX),
        r if r >= 1080 => (1281, 1920),
        r if r >= 961 => (961, 1280),
        r if r >= 721 => (721, 960),
        _ => (0, 720),
    };
    match op {
        Operator::Equals => Some(format!(">= {min} AND iVideoWidth <= {max}")),
        Operator::DoesNotEqual => Some(format!("< {min} OR iVideoWidth > {max}")),
        Operator::LessThan => Some(format!("< {min}")),
        Operator::GreaterThan => Some(format!("> {max}")),
        _ => None,
    }
}

/// Numeric parameter as spliced into SQL. Empty or non-numeric input is `0`.
fn numeric_value(param: &str) -> String {
    let trimmed = param.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => trimmed.to_string(),
        _ => "0".to_string(),
    }
}

/// `[[HH:]MM:]SS` or `N min` to seconds; unparsable parts, and times too
/// large to represent, count as zero.
pub fn time_string_to_seconds(time: &str) -> i64 {
    let trimmed = time.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.ends_with(" min") {
        return leading_integer(trimmed).checked_mul(60).unwrap_or(0);
    }
    trimmed
        .split(':')
        .take(3)
        .try_fold(0i64, |acc, part| {
            acc.checked_mul(60)?.checked_add(leading_integer(part))
        })
        .unwrap_or(0)
}

/// Date `period` before `today`, formatted `YYYY-MM-DD`.
///
/// Periods read as `<n> <unit>`; `wee*` counts weeks, `mon*` months of 31
/// days and anything else days.
pub fn date_before_period(today: NaiveDate, period: &str) -> String {
    let count = leading_integer(period);
    let unit: String = period
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == ' ')
        .chars()
        .take(3)
        .collect();
    let factor = if unit.eq_ignore_ascii_case("wee") {
        7
    } else if unit.eq_ignore_ascii_case("mon") {
        31
    } else {
        1
    };
    let date = count
        .checked_mul(factor)
        .and_then(TimeDelta::try_days)
        .and_then(|span| today.checked_sub_signed(span))
        .unwrap_or(NaiveDate::MIN);
    date.format("%Y-%m-%d").to_string()
}

/// Integer prefix of a string after leading whitespace, `0` when absent.
fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        .map(|v| sign * v)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn compile(field: Field, op: Operator, params: &[&str], relation: Relation, alias: &str) -> String {
        Rule::new(field, op, params.iter().copied())
            .where_clause(Scope::new(relation, alias), RuleContext::new(today()))
    }

    #[test]
    fn test_text_contains() {
        assert_eq!(
            compile(Field::Title, Operator::Contains, &["love"], Relation::Song, "songview"),
            "(songview.strTitle LIKE '%love%')"
        );
        assert_eq!(
            compile(Field::Title, Operator::DoesNotContain, &["a", "b"], Relation::Song, "songview"),
            "(songview.strTitle NOT LIKE '%a%' OR songview.strTitle IS NULL) AND \
             (songview.strTitle NOT LIKE '%b%' OR songview.strTitle IS NULL)"
        );
    }

    #[test]
    fn test_empty_parameter_matches_null() {
        assert_eq!(
            compile(Field::Comment, Operator::Equals, &[""], Relation::Song, "songview"),
            "(songview.comment LIKE '' OR songview.comment IS NULL)"
        );
    }

    #[test]
    fn test_numeric_casts_and_sanitizing() {
        assert_eq!(
            compile(Field::Year, Operator::GreaterThan, &["1999"], Relation::Song, "songview"),
            "(CAST(songview.iYear as DECIMAL(6,1)) > 1999)"
        );
        assert_eq!(
            compile(Field::Year, Operator::Equals, &["1; DROP TABLE song"], Relation::Song, "songview"),
            "(CAST(songview.iYear as DECIMAL(6,1)) = 0)"
        );
        assert_eq!(
            compile(Field::Time, Operator::LessThan, &["3:30"], Relation::Song, "songview"),
            "(CAST(songview.iDuration as INTEGER) < 210)"
        );
    }

    #[test]
    fn test_between() {
        assert_eq!(
            compile(Field::Rating, Operator::Between, &["5", "8"], Relation::Movie, "movie_view"),
            "movie_view.rating BETWEEN 5 AND 8"
        );
        assert_eq!(
            compile(Field::Year, Operator::Between, &["1990", "1999"], Relation::Song, "songview"),
            "CAST(songview.iYear as DECIMAL(6,1)) BETWEEN 1990 AND 1999"
        );
        assert_eq!(
            compile(Field::Year, Operator::Between, &["1990"], Relation::Song, "songview"),
            ""
        );
    }

    #[test]
    fn test_nullable_last_played() {
        let clause = compile(
            Field::LastPlayed,
            Operator::Before,
            &["2020-01-01"],
            Relation::Song,
            "songview",
        );
        assert_eq!(
            clause,
            "((songview.lastplayed IS NULL) OR (songview.lastplayed < '2020-01-01'))"
        );
        assert!(clause.contains("(songview.lastplayed IS NULL) OR (songview.lastplayed < "));
    }

    #[test]
    fn test_in_the_last() {
        assert_eq!(
            compile(Field::DateAdded, Operator::InTheLast, &["2 weeks"], Relation::Movie, "movie_view"),
            "(movie_view.dateAdded > '2024-03-01')"
        );
        assert_eq!(
            compile(Field::LastPlayed, Operator::NotInTheLast, &["10 days"], Relation::Movie, "movie_view"),
            "((movie_view.lastPlayed IS NULL) OR (movie_view.lastPlayed < '2024-03-05'))"
        );
        assert_eq!(date_before_period(today(), "1 month"), "2024-02-13");
    }

    #[test]
    fn test_video_resolution_bands() {
        assert_eq!(
            compile(Field::VideoResolution, Operator::Equals, &["1080"], Relation::Movie, "movie_view"),
            "(movie_view.idFile IN (SELECT DISTINCT idFile FROM streamdetails \
             WHERE iVideoWidth >= 1281 AND iVideoWidth <= 1920))"
        );
        assert!(
            compile(Field::VideoResolution, Operator::Equals, &["2160"], Relation::Movie, "movie_view")
                .contains(&format!(">= 1921 AND iVideoWidth <= {}", i32::MAX))
        );
        assert!(
            compile(Field::VideoResolution, Operator::LessThan, &["720"], Relation::Movie, "movie_view")
                .contains("WHERE iVideoWidth < 0)")
        );
        assert!(
            compile(Field::VideoResolution, Operator::DoesNotEqual, &["720"], Relation::Episode, "episode_view")
                .contains("iVideoWidth < 0 OR iVideoWidth > 720")
        );
        assert!(
            compile(Field::VideoResolution, Operator::Equals, &["720"], Relation::Movie, "movie_view")
                .contains("iVideoWidth >= 0 AND iVideoWidth <= 720")
        );
        assert!(
            compile(Field::VideoResolution, Operator::Equals, &["960"], Relation::Movie, "movie_view")
                .contains("iVideoWidth >= 721 AND iVideoWidth <= 960")
        );
        assert!(
            compile(Field::VideoResolution, Operator::Equals, &["1280"], Relation::Movie, "movie_view")
                .contains("iVideoWidth >= 961 AND iVideoWidth <= 1280")
        );
    }

    #[test]
    fn test_oversized_times_and_periods() {
        let time = "9223372036854775807:00";
        assert!(Rule::new(Field::Time, Operator::LessThan, [time]).is_valid());
        assert_eq!(time_string_to_seconds(time), 0);
        assert_eq!(time_string_to_seconds("9223372036854775807 min"), 0);
        assert_eq!(
            compile(Field::Time, Operator::LessThan, &[time], Relation::Song, "songview"),
            "(CAST(songview.iDuration as INTEGER) < 0)"
        );
        assert_eq!(
            date_before_period(today(), "999999999999999999 months"),
            NaiveDate::MIN.format("%Y-%m-%d").to_string()
        );
        assert_eq!(
            date_before_period(today(), "999999999999999999 weeks"),
            NaiveDate::MIN.format("%Y-%m-%d").to_string()
        );
    }

    #[test]
    fn test_episode_view_is_configurable() {
        let env = RuleContext {
            today: today(),
            episode_view: "my_episodes",
        };
        let clause = Rule::new(Field::InProgress, Operator::True, Vec::<String>::new())
            .where_clause(Scope::new(Relation::TvShow, "tvshow_view"), env);
        assert!(clause.contains("FROM my_episodes WHERE my_episodes.idShow = tvshow_view.idShow"));
    }

    #[test]
    fn test_song_genre_values() {
        assert_eq!(
            compile(Field::Genre, Operator::Equals, &["Rock", "Pop"], Relation::Song, "songview"),
            "EXISTS (SELECT 1 FROM song_genre JOIN genre ON genre.idGenre = song_genre.idGenre \
             WHERE song_genre.idSong = songview.idSong \
             AND (genre.strGenre LIKE 'Rock' OR genre.strGenre LIKE 'Pop'))"
        );
        assert_eq!(
            compile(Field::Genre, Operator::DoesNotEqual, &["Rock", "Pop"], Relation::Song, "songview"),
            "NOT EXISTS (SELECT 1 FROM song_genre JOIN genre ON genre.idGenre = song_genre.idGenre \
             WHERE song_genre.idSong = songview.idSong AND genre.strGenre LIKE 'Rock') AND \
             NOT EXISTS (SELECT 1 FROM song_genre JOIN genre ON genre.idGenre = song_genre.idGenre \
             WHERE song_genre.idSong = songview.idSong AND genre.strGenre LIKE 'Pop')"
        );
    }

    #[test]
    fn test_link_tables() {
        assert_eq!(
            compile(Field::Actor, Operator::Contains, &["Hanks"], Relation::Movie, "movie_view"),
            "(EXISTS (SELECT 1 FROM actor_link JOIN actor ON actor.actor_id = actor_link.actor_id \
             WHERE actor_link.media_id = movie_view.idMovie AND actor.name LIKE '%Hanks%' \
             AND actor_link.media_type = 'movie'))"
        );
        assert!(
            compile(Field::Genre, Operator::DoesNotContain, &["Drama"], Relation::Episode, "episode_view")
                .starts_with("(NOT EXISTS (SELECT 1 FROM genre_link")
        );
        assert!(
            compile(Field::Genre, Operator::Contains, &["Drama"], Relation::Episode, "episode_view")
                .contains("genre_link.media_id = episode_view.idShow")
        );
    }

    #[test]
    fn test_stream_details() {
        assert_eq!(
            compile(Field::AudioCount, Operator::GreaterThan, &["1"], Relation::Movie, "movie_view"),
            "(EXISTS (SELECT 1 FROM streamdetails WHERE streamdetails.idFile = movie_view.idFile \
             AND streamdetails.iStreamType = 2 GROUP BY streamdetails.idFile \
             HAVING COUNT(streamdetails.iStreamType) > 1))"
        );
        assert_eq!(
            compile(Field::VideoCodec, Operator::Equals, &["h264, hevc"], Relation::Movie, "movie_view"),
            "(EXISTS (SELECT 1 FROM streamdetails WHERE streamdetails.idFile = movie_view.idFile \
             AND strVideoCodec IN ('h264','hevc')))"
        );
    }

    #[test]
    fn test_boolean_fields() {
        assert_eq!(
            compile(Field::InProgress, Operator::True, &[], Relation::Movie, "movie_view"),
            "movie_view.idFile IN (SELECT DISTINCT idFile FROM bookmark WHERE type = 1)"
        );
        assert_eq!(
            compile(Field::Compilation, Operator::False, &[], Relation::Album, "albumview"),
            "NOT albumview.bCompilation"
        );
        assert_eq!(
            compile(Field::IsBoxset, Operator::DoesNotEqual, &["false"], Relation::Album, "albumview"),
            "albumview.bBoxedSet = 1"
        );
        assert_eq!(
            compile(Field::Trailer, Operator::Equals, &["true"], Relation::Movie, "movie_view"),
            "movie_view.c19 != ''"
        );
    }

    #[test]
    fn test_playcount_null_handling() {
        assert_eq!(
            compile(Field::Playcount, Operator::Equals, &["0"], Relation::Movie, "movie_view"),
            "((movie_view.playCount IS NULL) OR (movie_view.playCount = 0))"
        );
        assert_eq!(
            compile(Field::Playcount, Operator::GreaterThan, &["2"], Relation::Movie, "movie_view"),
            "(CAST(movie_view.playCount as DECIMAL(6,1)) > 2)"
        );
        assert_eq!(
            compile(Field::Playcount, Operator::Equals, &["1"], Relation::TvShow, "tvshow_view"),
            "(CASE WHEN COALESCE(tvshow_view.totalCount - tvshow_view.watchedcount, 0) > 0 \
             THEN 0 ELSE 1 END = 1)"
        );
    }

    #[test]
    fn test_tvshow_year_is_substring() {
        assert_eq!(
            compile(Field::Year, Operator::Equals, &["2010"], Relation::TvShow, "tvshow_view"),
            "(CAST(tvshow_view.premiered as DECIMAL(6,1)) LIKE '%2010%')"
        );
    }

    #[test]
    fn test_unsupported_field_is_empty() {
        assert_eq!(
            compile(Field::Top250, Operator::Equals, &["1"], Relation::Song, "songview"),
            ""
        );
        assert_eq!(
            compile(Field::None, Operator::Equals, &["x"], Relation::Song, "songview"),
            ""
        );
    }

    #[test]
    fn test_validate() {
        let rating = Rule::new(Field::Rating, Operator::Equals, ["5"]);
        assert!(rating.validate("5 / 7.5"));
        assert!(!rating.validate("5 / 11"));
        assert!(rating.is_valid());
        let title = Rule::new(Field::Title, Operator::Equals, ["anything"]);
        assert!(title.validate("whatever"));
    }

    #[test]
    fn test_time_strings() {
        assert_eq!(time_string_to_seconds("1:02:03"), 3723);
        assert_eq!(time_string_to_seconds("95 min"), 5700);
        assert_eq!(time_string_to_seconds("45"), 45);
        assert_eq!(time_string_to_seconds("abc"), 0);
    }

    #[test]
    fn test_escaping() {
        assert_eq!(
            compile(Field::Title, Operator::StartsWith, &["Don't"], Relation::Song, "song"),
            "(song.strTitle LIKE 'Don''t%')"
        );
    }
}
