//! Executing operations: build a statement from the handle's state, run it
//! on a [`GenericClient`], fold the result back into the handle.

use crate::builder::SqlBuilder;
use crate::client::GenericClient;
use crate::error::{DbopError, DbopResult};
use crate::row::{RowSource, identity_value};
use crate::table::{DbTable, IDENTITY_COLUMN, WhereField};

impl DbTable {
    /// Select the first row matching the set fields and load it into this
    /// handle. Fails with [`DbopError::NotFound`] when nothing matches.
    ///
    /// All columns are loaded; none of them counts as set afterwards.
    pub async fn do_select_first_only<C: GenericClient>(&mut self, conn: &C) -> DbopResult<()> {
        let sql = self.build_select(true)?;
        let row = conn
            .query_tagged(self.table_name(), &sql)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                DbopError::not_found(format!("no row in {} matches: {sql}", self.table_name()))
            })?;
        *self = self.map_row(&row)?;
        Ok(())
    }

    /// Select every row matching the set fields. Each row is a separate
    /// handle; no match gives an empty `Vec`.
    pub async fn do_select<C: GenericClient>(&self, conn: &C) -> DbopResult<Vec<DbTable>> {
        let sql = self.build_select(false)?;
        let rows = conn.query_tagged(self.table_name(), &sql).await?;
        self.map_rows(&rows)
    }

    /// Insert the set fields as a new row.
    ///
    /// With an auto-incremented `recid` the statement returns the id the
    /// database assigned, so `identity()` reports it and the handle addresses
    /// exactly the inserted row. The values stay, no longer marked as set.
    pub async fn do_insert<C: GenericClient>(&mut self, conn: &C) -> DbopResult<()> {
        let mut builder = self.insert_builder()?;

        if !self.identity_spec().is_some_and(|spec| spec.auto_increment) {
            let sql = builder.to_sql()?;
            let rows = conn.execute_tagged(self.table_name(), &sql).await?;
            return expect_one(rows, &sql);
        }

        let sql = builder.returning(&[IDENTITY_COLUMN]).to_sql()?;
        let rows = conn.query_tagged(self.table_name(), &sql).await?;
        let [row] = rows.as_slice() else {
            return Err(DbopError::RowsAffected {
                expected: 1,
                got: rows.len() as u64,
                sql,
            });
        };
        let recid = identity_value(row.scalar(0)?)?;

        self.load_identity(recid);
        self.clear_dirty();
        Ok(())
    }

    /// Write the set fields to the row this handle was selected from.
    ///
    /// Only works on a row obtained by a select or insert: a `recid`
    /// supplied through `set_identity` is rejected. Afterwards the values
    /// stay but no field counts as set.
    pub async fn do_update<C: GenericClient>(&mut self, conn: &C) -> DbopResult<()> {
        self.require_selected()?;

        let sql = self.build_update(true, &[])?;
        let rows = conn.execute_tagged(self.table_name(), &sql).await?;
        expect_one(rows, &sql)?;

        self.clear_dirty();
        Ok(())
    }

    /// Write the set fields to every row matching `where_fields`; returns the
    /// number of rows updated and clears the handle.
    pub async fn do_update_where<C: GenericClient>(
        &mut self,
        conn: &C,
        where_fields: &[WhereField],
    ) -> DbopResult<u64> {
        let sql = self.build_update(false, where_fields)?;
        let rows = conn.execute_tagged(self.table_name(), &sql).await?;
        self.clear_fields();
        Ok(rows)
    }

    /// Delete the row this handle was selected from, then clear the handle.
    pub async fn do_delete<C: GenericClient>(&mut self, conn: &C) -> DbopResult<()> {
        self.require_selected()?;

        let sql = self.build_delete(true)?;
        let rows = conn.execute_tagged(self.table_name(), &sql).await?;
        expect_one(rows, &sql)?;

        self.clear_fields();
        Ok(())
    }

    /// Delete every row matching the set fields (and a manually set
    /// `recid`); returns the number of rows deleted.
    pub async fn do_delete_where<C: GenericClient>(&self, conn: &C) -> DbopResult<u64> {
        let builder = self.delete_builder(false)?;
        let sql = builder.to_sql()?;
        conn.execute_tagged(self.table_name(), &sql).await
    }

    /// A manually set `recid` is not proof the row exists.
    fn require_selected(&self) -> DbopResult<()> {
        self.require_initialized()?;
        let rec_id = self.rec_id()?;
        if rec_id.is_set {
            return Err(DbopError::NotSelected(
                "recid was set manually; select the record first".to_string(),
            ));
        }
        Ok(())
    }
}

fn expect_one(rows: u64, sql: &str) -> DbopResult<()> {
    if rows != 1 {
        return Err(DbopError::RowsAffected {
            expected: 1,
            got: rows,
            sql: sql.to_string(),
        });
    }
    Ok(())
}
