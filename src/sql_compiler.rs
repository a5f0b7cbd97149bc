//! SQL compiler that turns playlists into SELECT statements using sea-query.

use std::fmt::Write;

use chrono::NaiveDate;
use log::debug;
use sea_query::{Asterisk, Expr, Iden, Order, Query, SelectStatement, SqliteQueryBuilder};

use crate::columns::{Relation, Scope};
use crate::config::CompilerConfig;
use crate::field::SortKey;
use crate::media::MediaType;
use crate::playlist::{CompileContext, Playlist, PlaylistOrder, PlaylistStore, SortDirection};

/// View identifier wrapper
#[derive(Debug, Clone)]
pub struct ViewName(pub String);

impl Iden for ViewName {
    fn unquoted(&self, s: &mut dyn Write) {
        let _ = s.write_str(&self.0);
    }
}

/// One statement of a compiled playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub media_type: MediaType,
    pub where_clause: String,
    pub sql: String,
}

/// Result of compiling a playlist: one query per concrete media type.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileResult {
    pub queries: Vec<CompiledQuery>,
}

impl CompileResult {
    pub fn sql(&self) -> Vec<&str> {
        self.queries.iter().map(|q| q.sql.as_str()).collect()
    }
}

/// SQL Compiler that resolves nested playlists through `S`.
pub struct SqlCompiler<S> {
    config: CompilerConfig,
    store: S,
    /// Pinned reference date; the local date when unset.
    reference_date: Option<NaiveDate>,
}

impl<S: PlaylistStore> SqlCompiler<S> {
    pub fn new(config: CompilerConfig, store: S) -> Self {
        Self {
            config,
            store,
            reference_date: None,
        }
    }

    /// Pins "today" for the date-window operators.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn context(&self) -> CompileContext<'_> {
        match self.reference_date {
            Some(date) => CompileContext::new(&self.store, &self.config, date),
            None => CompileContext::local(&self.store, &self.config),
        }
    }

    /// WHERE clause of `playlist` for `media_type`, without the SELECT around it.
    pub fn where_clause(&self, playlist: &Playlist, media_type: MediaType) -> String {
        playlist.where_clause(media_type, &self.context())
    }

    pub fn virtual_folders(&self, playlist: &Playlist) -> Vec<String> {
        playlist.virtual_folders(&self.context())
    }

    /// Compiles `playlist` into one SELECT per concrete media type; a mixed
    /// playlist yields a songs and a musicvideos statement.
    pub fn compile(&self, playlist: &Playlist) -> CompileResult {
        let ctx = self.context();
        let queries = playlist
            .media_type
            .concrete_types()
            .iter()
            .map(|&media_type| {
                let where_clause = playlist.where_clause(media_type, &ctx);
                let sql = self
                    .select(playlist, media_type, &where_clause)
                    .to_string(SqliteQueryBuilder);
                debug!("compiled '{}' for {media_type}: {sql}", playlist.name);
                CompiledQuery {
                    media_type,
                    where_clause,
                    sql,
                }
            })
            .collect();
        CompileResult { queries }
    }

    fn select(&self, playlist: &Playlist, media_type: MediaType, where_clause: &str) -> SelectStatement {
        let view = self.config.view_for(media_type);
        let mut select = Query::select();
        select.column(Asterisk).from(ViewName(view.to_string()));

        if !where_clause.is_empty() {
            select.and_where(Expr::cust(format!("({where_clause})")));
        }

        if let Some(order) = &playlist.order {
            self.apply_order(&mut select, order, media_type, view);
        }

        if let Some(limit) = playlist
            .limit
            .or(self.config.default_limit)
            .filter(|limit| *limit > 0)
        {
            select.limit(u64::from(limit));
        }
        select
    }

    fn apply_order(&self, select: &mut SelectStatement, order: &PlaylistOrder, media_type: MediaType, view: &str) {
        let direction = match order.direction {
            SortDirection::Ascending => Order::Asc,
            SortDirection::Descending => Order::Desc,
        };
        match order.key {
            SortKey::None => {}
            SortKey::Random => {
                select.order_by_expr(Expr::cust("RANDOM()"), direction);
            }
            key => match Scope::new(Relation::primary(media_type), view).column(key.field()) {
                Some(column) => {
                    select.order_by_expr(Expr::cust(column), direction);
                }
                None => debug!("no column to sort {media_type} by {}", key.name()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Combinator, Operator, Rule, RuleCombination};
    use crate::field::Field;
    use crate::store::MemoryStore;

    fn compiler(store: MemoryStore) -> SqlCompiler<MemoryStore> {
        SqlCompiler::new(CompilerConfig::default(), store)
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    fn title_contains(media_type: MediaType, value: &str) -> Playlist {
        Playlist::new(
            media_type,
            "Titles",
            RuleCombination::new(Combinator::And)
                .with_rule(Rule::new(Field::Title, Operator::Contains, [value])),
        )
    }

    #[test]
    fn test_compile_simple_playlist() {
        let result = compiler(MemoryStore::default()).compile(&title_contains(MediaType::Songs, "love"));
        assert_eq!(result.queries.len(), 1);
        let query = &result.queries[0];
        assert_eq!(query.media_type, MediaType::Songs);
        assert_eq!(query.where_clause, "(songview.strTitle LIKE '%love%')");
        assert!(query.sql.starts_with(r#"SELECT * FROM "songview" WHERE "#));
        assert!(query.sql.contains("(songview.strTitle LIKE '%love%')"));
    }

    #[test]
    fn test_compile_order_and_limit() {
        let mut playlist = title_contains(MediaType::Movies, "war");
        playlist.limit = Some(10);
        playlist.order = Some(PlaylistOrder {
            key: SortKey::Year,
            direction: SortDirection::Descending,
            ignore_folders: false,
        });
        let sql = &compiler(MemoryStore::default()).compile(&playlist).queries[0].sql;
        assert!(sql.starts_with(r#"SELECT * FROM "movie_view" WHERE "#));
        assert!(sql.contains("ORDER BY movie_view.premiered DESC"));
        assert!(sql.ends_with("LIMIT 10"));
    }

    #[test]
    fn test_compile_random_order_and_default_limit() {
        let mut playlist = Playlist::new(MediaType::Songs, "Shuffle", RuleCombination::default());
        playlist.order = Some(PlaylistOrder {
            key: SortKey::Random,
            ..Default::default()
        });
        let config = CompilerConfig {
            default_limit: Some(25),
            ..Default::default()
        };
        let compiler = SqlCompiler::new(config, MemoryStore::default());
        let sql = &compiler.compile(&playlist).queries[0].sql;
        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("ORDER BY RANDOM() ASC"));
        assert!(sql.ends_with("LIMIT 25"));
    }

    #[test]
    fn test_compile_mixed_playlist() {
        let result = compiler(MemoryStore::default()).compile(&title_contains(MediaType::Mixed, "x"));
        let types: Vec<MediaType> = result.queries.iter().map(|q| q.media_type).collect();
        assert_eq!(types, vec![MediaType::Songs, MediaType::MusicVideos]);
        assert!(result.sql()[0].contains(r#"FROM "songview""#));
        assert!(result.sql()[1].contains(r#"FROM "musicvideo_view""#));
        assert!(result.queries[1].where_clause.contains("musicvideo_view.c00"));
    }

    #[test]
    fn test_compile_uses_configured_views() {
        let mut config = CompilerConfig::default();
        config.views.insert(MediaType::Albums, "my_albums".to_string());
        let compiler = SqlCompiler::new(config, MemoryStore::default());
        let playlist = Playlist::new(
            MediaType::Albums,
            "Bob",
            RuleCombination::new(Combinator::And)
                .with_rule(Rule::new(Field::Artist, Operator::Contains, ["Bob"])),
        );
        let query = &compiler.compile(&playlist).queries[0];
        assert!(query.sql.contains(r#"FROM "my_albums""#));
        assert!(query.where_clause.contains("= my_albums.idAlbum"));
        assert!(!query.where_clause.contains("albumview"));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let mut store = MemoryStore::default();
        store.insert(title_contains(MediaType::Songs, "inner"));
        let compiler = compiler(store);
        let playlist = Playlist::new(
            MediaType::Songs,
            "Outer",
            RuleCombination::new(Combinator::Or)
                .with_rule(Rule::new(Field::Playlist, Operator::Equals, ["Titles"]))
                .with_rule(Rule::new(Field::LastPlayed, Operator::InTheLast, ["2 weeks"])),
        );
        assert_eq!(compiler.compile(&playlist), compiler.compile(&playlist));
        assert!(compiler
            .where_clause(&playlist, MediaType::Songs)
            .contains("songview.strTitle LIKE '%inner%'"));
    }
}
