//! Compilation of a [`RuleCombination`] tree and virtual-folder collection.

use std::collections::BTreeSet;

use log::debug;

use crate::ast::{Operator, Rule, RuleCombination};
use crate::columns::{is_field_rule_simple, Relation, Scope};
use crate::cross_entity;
use crate::field::Field;
use crate::media::{check_type_compatibility, MediaType};
use crate::playlist::CompileContext;
use crate::sql::{combine_clause, parenthesize};

/// Key a playlist name is tracked under in the referenced-playlist set.
pub(crate) fn reference_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl RuleCombination {
    /// Compiles the tree for `media_type`. `referenced` holds the playlists
    /// already expanded during this compile; a playlist is never expanded
    /// twice.
    pub fn where_clause(
        &self,
        media_type: MediaType,
        ctx: &CompileContext<'_>,
        referenced: &mut BTreeSet<String>,
    ) -> String {
        let mut clause = self
            .combinations
            .iter()
            .map(|combination| combination.where_clause(media_type, ctx, referenced))
            .filter(|sub| !sub.is_empty())
            .map(|sub| format!("({sub})"))
            .collect::<Vec<_>>()
            .join(self.combinator.separator());

        let scope = Scope::new(Relation::primary(media_type), ctx.view(media_type));
        let mut cross_rules: Vec<&Rule> = Vec::new();
        for rule in &self.rules {
            let current = match rule.field {
                // Navigation only, never filters rows.
                Field::VirtualFolder => continue,
                Field::Playlist => self.nested_playlist_clause(rule, media_type, ctx, referenced),
                field if !is_field_rule_simple(field, media_type) => {
                    cross_rules.push(rule);
                    continue;
                }
                _ => rule.grouped_where_clause(scope, ctx.rule_context()),
            };
            clause = combine_clause(&clause, &current, self.combinator);
        }

        if !cross_rules.is_empty() {
            let cross = cross_entity::where_clause(
                media_type,
                &cross_rules,
                self.combinator,
                scope.alias,
                ctx.rule_context(),
            );
            clause = combine_clause(&clause, &cross, self.combinator);
        }
        clause
    }

    fn nested_playlist_clause(
        &self,
        rule: &Rule,
        media_type: MediaType,
        ctx: &CompileContext<'_>,
        referenced: &mut BTreeSet<String>,
    ) -> String {
        let name = rule.first_parameter();
        let Some(playlist) = ctx.store.playlist_by_name(name, media_type) else {
            debug!("nested playlist '{name}' not found for {media_type}");
            return String::new();
        };
        if !referenced.insert(reference_key(&playlist.name)) {
            debug!("nested playlist '{name}' already expanded, skipping");
            return String::new();
        }
        if !check_type_compatibility(playlist.media_type, media_type) {
            debug!(
                "nested playlist '{name}' of type {} cannot filter {media_type}",
                playlist.media_type
            );
            return String::new();
        }

        let target = if media_type == MediaType::Mixed {
            playlist.media_type
        } else {
            media_type
        };
        let query = playlist.rules.where_clause(target, ctx, referenced);
        if query.is_empty() {
            return query;
        }
        if rule.operator == Operator::DoesNotEqual {
            format!("NOT ({query})")
        } else {
            parenthesize(&query)
        }
    }

    /// Collects the virtual folders of the tree: `virtualfolder` rules and,
    /// transitively, those of playlists referenced with `is`.
    pub fn virtual_folders(
        &self,
        media_type: MediaType,
        ctx: &CompileContext<'_>,
        referenced: &mut BTreeSet<String>,
        folders: &mut Vec<String>,
    ) {
        for combination in &self.combinations {
            combination.virtual_folders(media_type, ctx, referenced, folders);
        }

        for rule in &self.rules {
            if !matches!(rule.field, Field::VirtualFolder | Field::Playlist)
                || rule.operator != Operator::Equals
            {
                continue;
            }
            let Some(playlist) = ctx.store.playlist_by_name(rule.first_parameter(), media_type)
            else {
                continue;
            };
            if rule.field == Field::VirtualFolder {
                folders.push(playlist.name);
            } else if check_type_compatibility(playlist.media_type, media_type)
                && referenced.insert(reference_key(&playlist.name))
            {
                playlist
                    .rules
                    .virtual_folders(playlist.media_type, ctx, referenced, folders);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Combinator;
    use crate::config::CompilerConfig;
    use crate::playlist::Playlist;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn compile(tree: &RuleCombination, media_type: MediaType, store: &MemoryStore) -> String {
        let config = CompilerConfig::default();
        let ctx = CompileContext::new(store, &config, today());
        tree.where_clause(media_type, &ctx, &mut BTreeSet::new())
    }

    fn rule(field: Field, operator: Operator, value: &str) -> Rule {
        Rule::new(field, operator, [value])
    }

    #[test]
    fn test_simple_rules_are_combined() {
        let tree = RuleCombination::new(Combinator::And)
            .with_rule(rule(Field::Title, Operator::Contains, "love"))
            .with_rule(rule(Field::Year, Operator::LessThan, "2000"));
        assert_eq!(
            compile(&tree, MediaType::Songs, &MemoryStore::default()),
            "(songview.strTitle LIKE '%love%') AND ((CAST(songview.iYear as DECIMAL(6,1)) < 2000))"
        );
    }

    #[test]
    fn test_native_rules_have_no_subqueries() {
        let tree = RuleCombination::new(Combinator::Or)
            .with_rule(rule(Field::Title, Operator::Contains, "a"))
            .with_rule(rule(Field::Rating, Operator::GreaterThan, "5"))
            .with_rule(rule(Field::Playcount, Operator::Equals, "3"));
        let clause = compile(&tree, MediaType::Songs, &MemoryStore::default());
        assert!(!clause.contains("EXISTS"));
        assert!(clause.contains(" OR "));
    }

    #[test]
    fn test_nested_combinations_come_first() {
        let tree = RuleCombination::new(Combinator::Or)
            .with_rule(rule(Field::Title, Operator::Equals, "x"))
            .with_combination(
                RuleCombination::new(Combinator::And)
                    .with_rule(rule(Field::Mpaa, Operator::Equals, "PG"))
                    .with_rule(rule(Field::Top250, Operator::LessThan, "100")),
            );
        assert_eq!(
            compile(&tree, MediaType::Movies, &MemoryStore::default()),
            "((movie_view.c12 LIKE 'PG') AND ((CAST(movie_view.c13 as DECIMAL(6,1)) < 100))) OR \
             ((movie_view.c00 LIKE 'x'))"
        );
    }

    #[test]
    fn test_virtual_folder_rules_do_not_filter() {
        let tree = RuleCombination::new(Combinator::And)
            .with_rule(rule(Field::VirtualFolder, Operator::Equals, "Folder"));
        assert_eq!(compile(&tree, MediaType::Songs, &MemoryStore::default()), "");
    }

    #[test]
    fn test_multi_value_rule_is_grouped() {
        let tree = RuleCombination::new(Combinator::And)
            .with_rule(Rule::new(Field::Title, Operator::Contains, ["a", "b"]))
            .with_rule(rule(Field::Comment, Operator::Contains, "c"));
        assert_eq!(
            compile(&tree, MediaType::Songs, &MemoryStore::default()),
            "((songview.strTitle LIKE '%a%') OR (songview.strTitle LIKE '%b%')) AND \
             ((songview.comment LIKE '%c%'))"
        );
    }

    #[test]
    fn test_nested_playlist_spliced_and_negated() {
        let mut store = MemoryStore::default();
        store.insert(Playlist::new(
            MediaType::Songs,
            "Rock",
            RuleCombination::new(Combinator::And)
                .with_rule(rule(Field::Comment, Operator::Contains, "rock")),
        ));

        let tree = RuleCombination::new(Combinator::And)
            .with_rule(rule(Field::Playlist, Operator::Equals, "Rock"));
        assert_eq!(
            compile(&tree, MediaType::Songs, &store),
            "((songview.comment LIKE '%rock%'))"
        );

        let tree = RuleCombination::new(Combinator::And)
            .with_rule(rule(Field::Playlist, Operator::DoesNotEqual, "rock"));
        assert_eq!(
            compile(&tree, MediaType::Songs, &store),
            "NOT ((songview.comment LIKE '%rock%'))"
        );
    }

    #[test]
    fn test_playlist_expanded_once_per_compile() {
        let mut store = MemoryStore::default();
        store.insert(Playlist::new(
            MediaType::Songs,
            "Rock",
            RuleCombination::new(Combinator::And)
                .with_rule(rule(Field::Comment, Operator::Contains, "rock")),
        ));
        let tree = RuleCombination::new(Combinator::Or)
            .with_rule(rule(Field::Playlist, Operator::Equals, "Rock"))
            .with_rule(rule(Field::Playlist, Operator::Equals, "Rock"));
        assert_eq!(
            compile(&tree, MediaType::Songs, &store),
            "((songview.comment LIKE '%rock%'))"
        );
    }

    #[test]
    fn test_nested_playlist_keeps_its_precedence() {
        let mut store = MemoryStore::default();
        store.insert(Playlist::new(
            MediaType::Songs,
            "Either",
            RuleCombination::new(Combinator::Or)
                .with_rule(rule(Field::Title, Operator::Contains, "x"))
                .with_rule(rule(Field::Title, Operator::Contains, "y")),
        ));
        let tree = RuleCombination::new(Combinator::And)
            .with_rule(rule(Field::Playlist, Operator::Equals, "Either"))
            .with_rule(rule(Field::Comment, Operator::Contains, "z"));
        assert_eq!(
            compile(&tree, MediaType::Songs, &store),
            "((songview.strTitle LIKE '%x%') OR ((songview.strTitle LIKE '%y%'))) AND \
             ((songview.comment LIKE '%z%'))"
        );
    }

    #[test]
    fn test_unknown_nested_playlist_is_empty() {
        let tree = RuleCombination::new(Combinator::And)
            .with_rule(rule(Field::Playlist, Operator::Equals, "Missing"))
            .with_rule(rule(Field::Title, Operator::Equals, "t"));
        assert_eq!(
            compile(&tree, MediaType::Songs, &MemoryStore::default()),
            "(songview.strTitle LIKE 't')"
        );
    }

    #[test]
    fn test_cross_entity_rules_folded_once() {
        let tree = RuleCombination::new(Combinator::And)
            .with_rule(rule(Field::Title, Operator::Contains, "Love"))
            .with_rule(rule(Field::Artist, Operator::Equals, "Bob"))
            .with_rule(rule(Field::AlbumArtist, Operator::Equals, "Bob"));
        let clause = compile(&tree, MediaType::Songs, &MemoryStore::default());
        assert!(clause.starts_with("(songview.strTitle LIKE '%Love%') AND (EXISTS"));
        assert_eq!(clause.matches("FROM album_artist").count(), 1);
        assert_eq!(clause.matches("FROM song_artist").count(), 1);
    }

    #[test]
    fn test_virtual_folders() {
        let mut store = MemoryStore::default();
        store.insert(Playlist::new(
            MediaType::Songs,
            "Inner",
            RuleCombination::new(Combinator::And)
                .with_rule(rule(Field::VirtualFolder, Operator::Equals, "Folder B")),
        ));
        store.insert(Playlist::new(MediaType::Songs, "Folder A", RuleCombination::default()));
        store.insert(Playlist::new(MediaType::Songs, "Folder B", RuleCombination::default()));

        let tree = RuleCombination::new(Combinator::And)
            .with_rule(rule(Field::VirtualFolder, Operator::Equals, "Folder A"))
            .with_rule(rule(Field::VirtualFolder, Operator::DoesNotEqual, "Folder B"))
            .with_rule(rule(Field::Playlist, Operator::Equals, "Inner"));

        let config = CompilerConfig::default();
        let ctx = CompileContext::new(&store, &config, today());
        let mut folders = Vec::new();
        tree.virtual_folders(MediaType::Songs, &ctx, &mut BTreeSet::new(), &mut folders);
        assert_eq!(folders, vec!["Folder A".to_string(), "Folder B".to_string()]);
    }

    #[test]
    fn test_virtual_folders_of_nested_playlist_use_its_type() {
        let mut store = MemoryStore::default();
        store.insert(Playlist::new(
            MediaType::Mixed,
            "Everything",
            RuleCombination::new(Combinator::And)
                .with_rule(rule(Field::VirtualFolder, Operator::Equals, "Clips")),
        ));
        store.insert(Playlist::new(MediaType::MusicVideos, "Clips", RuleCombination::default()));

        let tree = RuleCombination::new(Combinator::And)
            .with_rule(rule(Field::Playlist, Operator::Equals, "Everything"));
        let config = CompilerConfig::default();
        let ctx = CompileContext::new(&store, &config, today());
        let mut folders = Vec::new();
        tree.virtual_folders(MediaType::Songs, &ctx, &mut BTreeSet::new(), &mut folders);
        assert_eq!(folders, vec!["Clips".to_string()]);
    }
}
