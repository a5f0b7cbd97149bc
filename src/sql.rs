//! SQL text helpers shared by the rule compiler and the cross-entity
//! assembler: literal escaping, correlated `EXISTS` subqueries and clause
//! combination.

use sea_query::{EscapeBuilder, SqliteQueryBuilder};

use crate::ast::Combinator;

/// Escapes a value for use inside a single-quoted SQL literal.
pub fn escape(value: &str) -> String {
    SqliteQueryBuilder.escape_string(value)
}

/// Single-quoted, escaped SQL literal.
pub fn quote(value: &str) -> String {
    format!("'{}'", escape(value))
}

/// `EXISTS (SELECT 1 FROM <table> <joins> WHERE <correlation> AND <where>)`.
#[derive(Debug, Clone)]
pub struct ExistsSubQuery {
    table: String,
    correlation: String,
    joins: Vec<String>,
    wheres: Vec<String>,
}

impl ExistsSubQuery {
    pub fn new(table: impl Into<String>, correlation: impl Into<String>) -> Self {
        ExistsSubQuery {
            table: table.into(),
            correlation: correlation.into(),
            joins: Vec::new(),
            wheres: Vec::new(),
        }
    }

    pub fn join(mut self, join: impl Into<String>) -> Self {
        self.append_join(join);
        self
    }

    pub fn append_join(&mut self, join: impl Into<String>) {
        let join = join.into();
        if !join.is_empty() {
            self.joins.push(join);
        }
    }

    /// Adds a condition; empty conditions are ignored.
    pub fn append_where(&mut self, clause: impl Into<String>) {
        let clause = clause.into();
        if !clause.is_empty() {
            self.wheres.push(clause);
        }
    }

    pub fn clear_where(&mut self) {
        self.wheres.clear();
    }

    pub fn build(&self) -> String {
        let mut sql = format!("EXISTS (SELECT 1 FROM {}", self.table);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        sql.push_str(" WHERE ");
        sql.push_str(&self.correlation);
        for clause in &self.wheres {
            sql.push_str(" AND ");
            sql.push_str(clause);
        }
        sql.push(')');
        sql
    }
}

/// Appends `clause` to `original` with the combinator, parenthesizing the
/// appended clause when there is something to append to.
pub fn combine_clause(original: &str, clause: &str, combinator: Combinator) -> String {
    match (original.is_empty(), clause.is_empty()) {
        (_, true) => original.to_string(),
        (true, false) => clause.to_string(),
        (false, false) => format!("{}{}({})", original, combinator.separator(), clause),
    }
}

/// Wraps a non-empty clause in parentheses.
pub fn parenthesize(clause: &str) -> String {
    if clause.is_empty() {
        String::new()
    } else {
        format!("({clause})")
    }
}
