use super::traits::{MutationBuilder, SqlBuilder};
use crate::error::{DbopError, DbopResult};
use crate::table::IDENTITY_COLUMN;

/// INSERT builder.
#[derive(Debug, Clone)]
pub struct InsertBuilder {
    /// Table name
    table: String,
    /// Column names
    columns: Vec<String>,
    /// VALUES literals, parallel to `columns`
    values: Vec<String>,
    /// RETURNING columns
    returning_cols: Vec<String>,
}

impl InsertBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            values: Vec::new(),
            returning_cols: Vec::new(),
        }
    }

    /// Set a column to an already rendered literal.
    pub fn set(&mut self, column: &str, literal: &str) -> &mut Self {
        self.columns.push(column.to_string());
        self.values.push(literal.to_string());
        self
    }

    /// Set the identity column.
    pub fn set_identity(&mut self, value: u64) -> &mut Self {
        self.set(IDENTITY_COLUMN, &value.to_string())
    }

    /// Set RETURNING columns.
    pub fn returning(&mut self, cols: &[&str]) -> &mut Self {
        self.returning_cols = cols.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl SqlBuilder for InsertBuilder {
    fn build_sql(&self) -> String {
        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.columns.join(","),
            self.values.join(",")
        );

        if !self.returning_cols.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.returning_cols.join(", "));
        }

        sql
    }

    fn validate(&self) -> DbopResult<()> {
        if self.columns.is_empty() {
            return Err(DbopError::no_fields_set(format!(
                "INSERT INTO {} has no columns",
                self.table
            )));
        }
        Ok(())
    }
}

impl MutationBuilder for InsertBuilder {}
