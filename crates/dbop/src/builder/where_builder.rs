//! Shared WHERE clause builder for SELECT, UPDATE, DELETE.

use crate::table::IDENTITY_COLUMN;

/// Reusable WHERE clause builder.
///
/// Conditions are `table.column = literal` terms joined with `AND`, in the
/// order they were added.
#[derive(Debug, Clone, Default)]
pub struct WhereBuilder {
    /// Table used to qualify every column
    table: String,
    /// WHERE conditions (without leading AND)
    conditions: Vec<String>,
}

impl WhereBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            conditions: Vec::new(),
        }
    }

    /// Check if any conditions have been added.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Build the WHERE clause string (without "WHERE" prefix).
    pub fn build_clause(&self) -> String {
        self.conditions.join(" AND ")
    }

    /// Add AND equality condition; `literal` is written as given.
    pub fn and_eq(&mut self, col: &str, literal: &str) {
        self.conditions.push(format!("{}.{} = {}", self.table, col, literal));
    }

    /// Add AND condition on the identity column.
    pub fn and_identity(&mut self, value: u64) {
        self.and_eq(IDENTITY_COLUMN, &value.to_string());
    }
}
