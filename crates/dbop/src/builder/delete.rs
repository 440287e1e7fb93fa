use super::traits::{MutationBuilder, SqlBuilder};
use super::where_builder::WhereBuilder;
use crate::error::{DbopError, DbopResult};

/// DELETE builder.
///
/// There is no way to delete a whole table: without a condition
/// [`SqlBuilder::validate`] fails.
#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    /// Table name
    table: String,
    /// WHERE conditions
    where_builder: WhereBuilder,
}

impl DeleteBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            where_builder: WhereBuilder::new(table),
        }
    }

    /// Add AND equality condition with an already rendered literal.
    pub fn and_eq(&mut self, col: &str, literal: &str) -> &mut Self {
        self.where_builder.and_eq(col, literal);
        self
    }

    /// Add AND condition on the identity column.
    pub fn and_identity(&mut self, value: u64) -> &mut Self {
        self.where_builder.and_identity(value);
        self
    }
}

impl SqlBuilder for DeleteBuilder {
    fn build_sql(&self) -> String {
        format!(
            "DELETE FROM {} WHERE {}",
            self.table,
            self.where_builder.build_clause()
        )
    }

    fn validate(&self) -> DbopResult<()> {
        if self.where_builder.is_empty() {
            return Err(DbopError::missing_where(format!(
                "DELETE FROM {} must have a where clause",
                self.table
            )));
        }
        Ok(())
    }
}

impl MutationBuilder for DeleteBuilder {}
