//! Structured statement builders.
//!
//! Each builder holds the pieces of one statement (table, columns, rendered
//! literals, conditions) and turns them into SQL text.
//!
//! ## Design
//!
//! - Values arrive already rendered as literals (see [`crate::SqlType::render_literal`]).
//! - Safe defaults: DELETE requires WHERE; UPDATE requires SET and WHERE;
//!   INSERT requires at least one column.
//! - Conditions are always qualified with the table name (`users.id = 1`).

pub mod delete;
pub mod insert;
pub mod select;
pub mod traits;
pub mod update;
pub mod where_builder;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::SelectBuilder;
pub use traits::{MutationBuilder, SqlBuilder};
pub use update::UpdateBuilder;
pub use where_builder::WhereBuilder;
