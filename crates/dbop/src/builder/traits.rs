use crate::client::GenericClient;
use crate::error::DbopResult;

/// Base trait for statement builders.
pub trait SqlBuilder: Sync {
    /// Build the SQL string.
    ///
    /// Does not check the builder state; use [`SqlBuilder::to_sql`] for that.
    fn build_sql(&self) -> String;

    /// Validate builder state.
    fn validate(&self) -> DbopResult<()> {
        Ok(())
    }

    /// Validate, then build.
    fn to_sql(&self) -> DbopResult<String> {
        self.validate()?;
        let sql = self.build_sql();
        tracing::trace!(target: "dbop.builder", sql = %sql, "built statement");
        Ok(sql)
    }

    /// Execute query and return all rows.
    fn query<C: GenericClient>(
        &self,
        conn: &C,
    ) -> impl std::future::Future<Output = DbopResult<Vec<C::Row>>> + Send {
        async move {
            let sql = self.to_sql()?;
            conn.query(&sql).await
        }
    }

    /// Execute query and return at most one row.
    fn query_opt<C: GenericClient>(
        &self,
        conn: &C,
    ) -> impl std::future::Future<Output = DbopResult<Option<C::Row>>> + Send {
        async move {
            let sql = self.to_sql()?;
            conn.query_opt(&sql).await
        }
    }
}

/// Trait for mutation builders (INSERT/UPDATE/DELETE).
pub trait MutationBuilder: SqlBuilder {
    /// Execute and return affected row count.
    fn execute<C: GenericClient>(
        &self,
        conn: &C,
    ) -> impl std::future::Future<Output = DbopResult<u64>> + Send {
        async move {
            let sql = self.to_sql()?;
            conn.execute(&sql).await
        }
    }
}
