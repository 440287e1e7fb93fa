use super::traits::SqlBuilder;
use super::where_builder::WhereBuilder;

/// SELECT builder.
///
/// Always selects every column (`SELECT *`) so the column order matches the
/// table layout used by row mapping.
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    /// Table name
    table: String,
    /// WHERE conditions
    where_builder: WhereBuilder,
    /// LIMIT
    limit: Option<u64>,
}

impl SelectBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            where_builder: WhereBuilder::new(table),
            limit: None,
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

    /// Set LIMIT.
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Restrict the result to the first row.
    pub fn first_only(&mut self) -> &mut Self {
        self.limit(1)
    }
}

impl SqlBuilder for SelectBuilder {
    fn build_sql(&self) -> String {
        let mut sql = format!("SELECT * FROM {}", self.table);

        if !self.where_builder.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_builder.build_clause());
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        sql
    }
}
