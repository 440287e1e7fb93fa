//! # dbop
//!
//! Dynamic single-table statements for PostgreSQL.
//!
//! A [`DbTable`] is built at runtime from a table name, an ordered list of
//! field names with type tags and an optional `recid` identity column. The
//! caller sets field values as text; the handle turns whatever is set into
//! SELECT / INSERT / UPDATE / DELETE statements, runs them and maps the
//! returned rows back into handles.
//!
//! ## Features
//!
//! - **Runtime metadata**: no structs or derives, tables are described by data
//! - **Literal rendering**: numeric tags are written verbatim, everything else quoted
//! - **Safe defaults**: DELETE and UPDATE always carry a WHERE clause
//! - **Row mapping**: `SELECT *` rows become independent handles
//! - **SQL logging**: every executed statement goes through `tracing`
//!
//! ```ignore
//! use dbop::{DbConnection, DbTable, IdentitySpec};
//!
//! let conn = DbConnection::connect("postgres://postgres@localhost/app").await?;
//! let mut users = DbTable::new(
//!     "Users",
//!     &["name", "role"],
//!     &["VARCHAR", "SMALLINT"],
//!     Some(IdentitySpec::auto_increment()),
//! )?;
//!
//! users.set_field_value("name", "Ann");
//! users.set_field_value("role", "2");
//! users.do_insert(&conn).await?;
//! println!("new recid: {}", users.identity()?.0);
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod monitor;
mod ops;
pub mod row;
pub mod table;
pub mod types;

#[cfg(test)]
mod testing;

pub use builder::{
    DeleteBuilder, InsertBuilder, MutationBuilder, SelectBuilder, SqlBuilder, UpdateBuilder,
    WhereBuilder,
};
pub use client::GenericClient;
pub use config::DbopConfig;
pub use connection::DbConnection;
pub use error::{DbopError, DbopResult};
pub use monitor::{LoggedClient, QueryType, SqlLogger};
pub use row::{RowSource, Scalar, render_scalar};
pub use table::{DbTable, IDENTITY_COLUMN, IdentitySpec, RecId, WhereField};
pub use types::{LiteralClass, SqlType};
