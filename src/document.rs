//! JSON documents playlists are saved as.
//!
//! ```json
//! {
//!   "type": "songs",
//!   "name": "Eighties rock",
//!   "rules": { "and": [
//!     { "field": "genre", "operator": "is", "value": ["Rock", "Pop"] },
//!     { "or": [ { "field": "year", "operator": "between", "value": ["1980", "1989"] } ] }
//!   ] },
//!   "limit": 50,
//!   "order": { "method": "year", "direction": "descending" }
//! }
//! ```

use log::warn;
use serde::{Deserialize, Serialize};

use crate::ast::{Combinator, Operator, Rule, RuleCombination};
use crate::error::Result;
use crate::field::{group_from_name, group_name, Field, SortKey};
use crate::media::MediaType;
use crate::playlist::{Playlist, PlaylistGroup, PlaylistOrder, SortDirection};

#[derive(Debug, Serialize, Deserialize)]
struct PlaylistDocument {
    #[serde(rename = "type")]
    media_type: String,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rules: Option<RuleNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<GroupDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order: Option<OrderDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RuleNode {
    And { and: Vec<RuleNode> },
    Or { or: Vec<RuleNode> },
    Rule(RuleDocument),
}

#[derive(Debug, Serialize, Deserialize)]
struct RuleDocument {
    field: String,
    operator: String,
    #[serde(default)]
    value: RuleValue,
}

/// A rule value is either one string (possibly `a / b` joined) or a list.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RuleValue {
    One(String),
    Many(Vec<String>),
}

impl Default for RuleValue {
    fn default() -> Self {
        RuleValue::Many(Vec::new())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GroupDocument {
    #[serde(rename = "type")]
    group_type: String,
    #[serde(default)]
    mixed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OrderDocument {
    method: String,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    ignorefolders: bool,
}

impl RuleNode {
    fn into_combination(self) -> RuleCombination {
        match self {
            RuleNode::And { and } => Self::collect(Combinator::And, and),
            RuleNode::Or { or } => Self::collect(Combinator::Or, or),
            RuleNode::Rule(rule) => {
                RuleCombination::new(Combinator::And).with_rule(rule.into_rule())
            }
        }
    }

    fn collect(combinator: Combinator, nodes: Vec<RuleNode>) -> RuleCombination {
        let mut combination = RuleCombination::new(combinator);
        for node in nodes {
            match node {
                RuleNode::Rule(rule) => combination.rules.push(rule.into_rule()),
                sub => combination.combinations.push(sub.into_combination()),
            }
        }
        combination
    }

    fn from_combination(combination: &RuleCombination) -> RuleNode {
        let children: Vec<RuleNode> = combination
            .combinations
            .iter()
            .map(RuleNode::from_combination)
            .chain(combination.rules.iter().map(|rule| {
                RuleNode::Rule(RuleDocument {
                    field: rule.field.name().to_string(),
                    operator: rule.operator.name().to_string(),
                    value: RuleValue::Many(rule.parameters.clone()),
                })
            }))
            .collect();
        match combination.combinator {
            Combinator::And => RuleNode::And { and: children },
            Combinator::Or => RuleNode::Or { or: children },
        }
    }
}

impl RuleDocument {
    fn into_rule(self) -> Rule {
        let field = Field::from_name(&self.field);
        if field == Field::None {
            warn!("unknown rule field '{}'", self.field);
        }
        let operator = Operator::from_name(&self.operator);
        match self.value {
            RuleValue::One(value) => Rule::with_parameter_string(field, operator, &value),
            RuleValue::Many(values) => Rule::new(field, operator, values),
        }
    }
}

impl Playlist {
    /// Parses a playlist document. `type` also accepts the legacy `music`
    /// and `video` names.
    pub fn from_json_str(json: &str) -> Result<Playlist> {
        let document: PlaylistDocument = serde_json::from_str(json)?;
        let media_type: MediaType = document.media_type.parse()?;

        let mut playlist = Playlist::new(
            media_type,
            document.name,
            document
                .rules
                .map(RuleNode::into_combination)
                .unwrap_or_default(),
        );
        playlist.group = document.group.and_then(|group| {
            group_from_name(&group.group_type).map(|field| PlaylistGroup {
                field,
                mixed: group.mixed,
            })
        });
        playlist.limit = document.limit.filter(|limit| *limit > 0);
        playlist.order = document.order.map(|order| PlaylistOrder {
            key: SortKey::from_name(&order.method),
            direction: order
                .direction
                .as_deref()
                .map(SortDirection::from_name)
                .unwrap_or_default(),
            ignore_folders: order.ignorefolders,
        });
        Ok(playlist)
    }

    pub fn to_json_string(&self) -> Result<String> {
        let document = PlaylistDocument {
            media_type: self.media_type.to_string(),
            name: self.name.clone(),
            rules: (!self.rules.is_empty()).then(|| RuleNode::from_combination(&self.rules)),
            group: self.group.as_ref().and_then(|group| {
                group_name(group.field).map(|name| GroupDocument {
                    group_type: name.to_string(),
                    mixed: group.mixed,
                })
            }),
            limit: self.limit,
            order: self.order.as_ref().map(|order| OrderDocument {
                method: order.key.name().to_string(),
                direction: Some(order.direction.name().to_string()),
                ignorefolders: order.ignore_folders,
            }),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}
