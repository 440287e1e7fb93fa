use super::traits::{MutationBuilder, SqlBuilder};
use super::where_builder::WhereBuilder;
use crate::error::{DbopError, DbopResult};

/// UPDATE builder.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    /// Table name
    table: String,
    /// SET clauses (column, literal)
    set_fields: Vec<(String, String)>,
    /// WHERE conditions
    where_builder: WhereBuilder,
}

impl UpdateBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            set_fields: Vec::new(),
            where_builder: WhereBuilder::new(table),
        }
    }

    /// Set a column to an already rendered literal.
    pub fn set(&mut self, column: &str, literal: &str) -> &mut Self {
        self.set_fields.push((column.to_string(), literal.to_string()));
        self
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

impl SqlBuilder for UpdateBuilder {
    fn build_sql(&self) -> String {
        let set_clause = self
            .set_fields
            .iter()
            .map(|(col, literal)| format!("{col} = {literal}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("UPDATE {} SET {}", self.table, set_clause);

        if !self.where_builder.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_builder.build_clause());
        }

        sql
    }

    fn validate(&self) -> DbopResult<()> {
        if self.set_fields.is_empty() {
            return Err(DbopError::no_fields_set(format!(
                "no fields set for update of {}",
                self.table
            )));
        }
        if self.where_builder.is_empty() {
            return Err(DbopError::missing_where(format!(
                "UPDATE {} has no conditions",
                self.table
            )));
        }
        Ok(())
    }
}

impl MutationBuilder for UpdateBuilder {}
