//! Compiles smart playlists (rule trees over a media library) into SQL
//! WHERE clauses and SELECT statements.

pub mod ast;
pub mod columns;
pub mod combination;
pub mod config;
pub mod cross_entity;
pub mod document;
pub mod error;
pub mod field;
pub mod media;
pub mod playlist;
pub mod rule;
pub mod sql;
pub mod sql_compiler;
pub mod store;

pub use ast::{Combinator, Operator, Rule, RuleCombination};
pub use config::CompilerConfig;
pub use error::{Error, Result};
pub use field::{Field, SortKey};
pub use media::MediaType;
pub use playlist::{CompileContext, Playlist, PlaylistStore};
pub use rule::RuleContext;
pub use sql_compiler::{CompileResult, CompiledQuery, SqlCompiler};
pub use store::{DirectoryStore, MemoryStore};
