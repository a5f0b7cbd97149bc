//! The playlist aggregate and the context a compile runs in.

use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};

use crate::ast::RuleCombination;
use crate::combination::reference_key;
use crate::config::CompilerConfig;
use crate::field::{Field, SortKey};
use crate::media::MediaType;
use crate::rule::RuleContext;

/// Looks up saved playlists for nested `playlist` rules.
pub trait PlaylistStore {
    /// Finds a playlist by display name among those usable from `media_type`.
    fn playlist_by_name(&self, name: &str, media_type: MediaType) -> Option<Playlist>;
}

/// Everything a compile reads besides the playlist itself.
pub struct CompileContext<'a> {
    pub store: &'a dyn PlaylistStore,
    pub config: &'a CompilerConfig,
    /// Reference date of the relative date operators.
    pub today: NaiveDate,
}

impl<'a> CompileContext<'a> {
    pub fn new(store: &'a dyn PlaylistStore, config: &'a CompilerConfig, today: NaiveDate) -> Self {
        CompileContext {
            store,
            config,
            today,
        }
    }

    /// Context dated by the local clock.
    pub fn local(store: &'a dyn PlaylistStore, config: &'a CompilerConfig) -> Self {
        Self::new(store, config, Local::now().date_naive())
    }

    /// View WHERE clauses of `media_type` are evaluated against.
    pub fn view(&self, media_type: MediaType) -> &'a str {
        self.config.view_for(media_type)
    }

    /// Reference date and views a single rule compiles against.
    pub fn rule_context(&self) -> RuleContext<'a> {
        RuleContext {
            today: self.today,
            episode_view: self.view(MediaType::Episodes),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn name(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }

    /// Anything but `descending` sorts ascending.
    pub fn from_name(name: &str) -> SortDirection {
        if name.eq_ignore_ascii_case("descending") {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaylistOrder {
    pub key: SortKey,
    pub direction: SortDirection,
    pub ignore_folders: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistGroup {
    pub field: Field,
    pub mixed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub media_type: MediaType,
    pub name: String,
    pub rules: RuleCombination,
    pub group: Option<PlaylistGroup>,
    pub limit: Option<u32>,
    pub order: Option<PlaylistOrder>,
}

impl Playlist {
    pub fn new(media_type: MediaType, name: impl Into<String>, rules: RuleCombination) -> Self {
        Playlist {
            media_type,
            name: name.into(),
            rules,
            group: None,
            limit: None,
            order: None,
        }
    }

    /// WHERE clause of the playlist for `media_type`. The playlist itself
    /// counts as referenced, so it cannot expand into itself.
    pub fn where_clause(&self, media_type: MediaType, ctx: &CompileContext<'_>) -> String {
        let mut referenced = BTreeSet::from([reference_key(&self.name)]);
        self.rules.where_clause(media_type, ctx, &mut referenced)
    }

    /// Names of the playlists shown as virtual folders of this playlist.
    pub fn virtual_folders(&self, ctx: &CompileContext<'_>) -> Vec<String> {
        let mut referenced = BTreeSet::from([reference_key(&self.name)]);
        let mut folders = Vec::new();
        self.rules
            .virtual_folders(self.media_type, ctx, &mut referenced, &mut folders);
        folders
    }

    /// No rules; unless `ignore_sort_and_limit`, also no limit and no order.
    pub fn is_empty(&self, ignore_sort_and_limit: bool) -> bool {
        let empty = self.rules.is_empty();
        if empty && !ignore_sort_and_limit {
            return self.limit.unwrap_or(0) == 0
                && self
                    .order
                    .as_ref()
                    .map_or(true, |order| order.key == SortKey::None);
        }
        empty
    }

    pub fn save_location(&self) -> &'static str {
        self.media_type.save_location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Combinator, Operator, Rule};
    use crate::store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn playlist_rule(name: &str) -> Rule {
        Rule::new(Field::Playlist, Operator::Equals, [name])
    }

    #[test]
    fn test_self_reference_contributes_nothing() {
        let playlist = Playlist::new(
            MediaType::Songs,
            "P",
            RuleCombination::new(Combinator::And).with_rule(playlist_rule("P")),
        );
        let mut store = MemoryStore::default();
        store.insert(playlist.clone());
        let config = CompilerConfig::default();
        let ctx = CompileContext::new(&store, &config, today());
        assert_eq!(playlist.where_clause(MediaType::Songs, &ctx), "");
    }

    #[test]
    fn test_mutual_references_terminate() {
        let a = Playlist::new(
            MediaType::Songs,
            "A",
            RuleCombination::new(Combinator::And)
                .with_rule(playlist_rule("B"))
                .with_rule(Rule::new(Field::Comment, Operator::Contains, ["a"])),
        );
        let b = Playlist::new(
            MediaType::Songs,
            "B",
            RuleCombination::new(Combinator::And)
                .with_rule(playlist_rule("A"))
                .with_rule(Rule::new(Field::Comment, Operator::Contains, ["b"])),
        );
        let mut store = MemoryStore::default();
        store.insert(a.clone());
        store.insert(b);
        let config = CompilerConfig::default();
        let ctx = CompileContext::new(&store, &config, today());
        assert_eq!(
            a.where_clause(MediaType::Songs, &ctx),
            "((songview.comment LIKE '%b%')) AND ((songview.comment LIKE '%a%'))"
        );
    }

    #[test]
    fn test_mixed_compatibility() {
        let mut store = MemoryStore::default();
        store.insert(Playlist::new(
            MediaType::Songs,
            "Songs",
            RuleCombination::new(Combinator::And)
                .with_rule(Rule::new(Field::Title, Operator::Contains, ["x"])),
        ));
        store.insert(Playlist::new(
            MediaType::Movies,
            "Movies",
            RuleCombination::new(Combinator::And)
                .with_rule(Rule::new(Field::Title, Operator::Contains, ["y"])),
        ));
        let config = CompilerConfig::default();
        let ctx = CompileContext::new(&store, &config, today());

        let mixed = Playlist::new(
            MediaType::Mixed,
            "M",
            RuleCombination::new(Combinator::And).with_rule(playlist_rule("Songs")),
        );
        assert_eq!(
            mixed.where_clause(MediaType::Mixed, &ctx),
            "((songview.strTitle LIKE '%x%'))"
        );
        assert_eq!(
            mixed.where_clause(MediaType::Songs, &ctx),
            "((songview.strTitle LIKE '%x%'))"
        );

        let mixed = Playlist::new(
            MediaType::Mixed,
            "M",
            RuleCombination::new(Combinator::And).with_rule(playlist_rule("Movies")),
        );
        assert_eq!(mixed.where_clause(MediaType::Mixed, &ctx), "");
    }

    #[test]
    fn test_configured_episode_view_reaches_tvshow_rules() {
        let mut config = CompilerConfig::default();
        config.views.insert(MediaType::Episodes, "my_episodes".to_string());
        let store = MemoryStore::default();
        let ctx = CompileContext::new(&store, &config, today());
        let playlist = Playlist::new(
            MediaType::TvShows,
            "Watching",
            RuleCombination::new(Combinator::And)
                .with_rule(Rule::new(Field::InProgress, Operator::True, Vec::<String>::new())),
        );
        let clause = playlist.where_clause(MediaType::TvShows, &ctx);
        assert!(clause.contains("EXISTS (SELECT 1 FROM my_episodes WHERE my_episodes.idShow = "));
        assert!(!clause.contains("episode_view"));
    }

    #[test]
    fn test_compile_is_idempotent() {
        let playlist = Playlist::new(
            MediaType::Albums,
            "Idem",
            RuleCombination::new(Combinator::And)
                .with_rule(Rule::new(Field::Artist, Operator::Contains, ["Bob"]))
                .with_rule(Rule::new(Field::Genre, Operator::Equals, ["Rock", "Blues"])),
        );
        let store = MemoryStore::default();
        let config = CompilerConfig::default();
        let ctx = CompileContext::new(&store, &config, today());
        assert_eq!(
            playlist.where_clause(MediaType::Albums, &ctx),
            playlist.where_clause(MediaType::Albums, &ctx)
        );
    }

    #[test]
    fn test_is_empty() {
        let mut playlist = Playlist::new(MediaType::Songs, "E", RuleCombination::default());
        assert!(playlist.is_empty(true));
        assert!(playlist.is_empty(false));
        playlist.limit = Some(25);
        assert!(playlist.is_empty(true));
        assert!(!playlist.is_empty(false));
        playlist.rules = playlist
            .rules
            .with_rule(Rule::new(Field::Title, Operator::Contains, ["x"]));
        assert!(!playlist.is_empty(true));
    }

    #[test]
    fn test_sort_direction_names() {
        assert_eq!(SortDirection::from_name("Descending"), SortDirection::Descending);
        assert_eq!(SortDirection::from_name("up"), SortDirection::Ascending);
        assert_eq!(SortDirection::Descending.name(), "descending");
    }
}
