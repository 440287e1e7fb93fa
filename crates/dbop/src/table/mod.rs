//! Table handles: table metadata plus the current field values.
//!
//! A [`DbTable`] describes one database table (name, ordered fields with their
//! type tags, optional `recid` identity column) and carries the values set
//! by the caller. Statements are built from whatever is currently set:
//!
//! ```rust
//! use dbop::{DbTable, IdentitySpec};
//!
//! let mut users = DbTable::new(
//!     "Users",
//!     &["name", "role"],
//!     &["VARCHAR", "SMALLINT"],
//!     Some(IdentitySpec::auto_increment()),
//! )?;
//!
//! users.set_field_value("name", "Ann");
//! users.set_field_value("role", "2");
//! assert_eq!(users.build_insert()?, "INSERT INTO Users (name,role) VALUES ('Ann',2)");
//! # Ok::<(), dbop::DbopError>(())
//! ```

use crate::builder::{DeleteBuilder, InsertBuilder, SelectBuilder, SqlBuilder, UpdateBuilder};
use crate::error::{DbopError, DbopResult};
use crate::types::SqlType;
use std::collections::HashSet;

/// Name of the identity column. When a table has one it is always the first
/// column of the table and is not listed among the declared fields.
pub const IDENTITY_COLUMN: &str = "recid";

/// Declares that a table has the `recid` identity column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentitySpec {
    /// `true` when the database assigns `recid` (AUTO_INCREMENT / BIGSERIAL).
    /// `false` when the application maintains it and INSERT must supply it.
    pub auto_increment: bool,
}

impl IdentitySpec {
    pub const fn auto_increment() -> Self {
        Self {
            auto_increment: true,
        }
    }

    pub const fn manual() -> Self {
        Self {
            auto_increment: false,
        }
    }
}

/// Current value of the identity column.
///
/// `is_set == true` means the caller supplied the value to address a row.
/// `is_set == false` with a non-zero value means it was read back from the
/// database by a select or insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecId {
    pub value: u64,
    pub is_set: bool,
}

/// One `field = value` condition of a bulk update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereField {
    pub field_name: String,
    pub value: String,
}

impl WhereField {
    pub fn new(field_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    name: String,
    sql_type: SqlType,
    /// `None` = unset. `Some("")` is a real empty string.
    value: Option<String>,
    /// Set through [`DbTable::set_field_value`] since the last clear.
    dirty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Identity {
    spec: IdentitySpec,
    rec_id: RecId,
}

/// A table handle: metadata plus one row's worth of field values.
///
/// The default value is an uninitialized handle; see [`DbTable::init`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbTable {
    name: String,
    fields: Vec<Field>,
    identity: Option<Identity>,
}

impl DbTable {
    /// Create a handle for `table_name`.
    ///
    /// `field_names` and `field_types` are parallel lists in table column
    /// order, excluding `recid`. Type tags are parsed with
    /// [`SqlType::from_str`](std::str::FromStr).
    pub fn new<N, T>(
        table_name: &str,
        field_names: &[N],
        field_types: &[T],
        identity: Option<IdentitySpec>,
    ) -> DbopResult<Self>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let mut table = Self::default();
        table.init(table_name, field_names, field_types, identity)?;
        Ok(table)
    }

    /// Create a handle from already typed field declarations.
    pub fn with_fields(
        table_name: &str,
        fields: &[(&str, SqlType)],
        identity: Option<IdentitySpec>,
    ) -> DbopResult<Self> {
        let mut table = Self::default();
        table.init_typed(
            table_name,
            fields.iter().map(|(name, ty)| ((*name).to_string(), *ty)).collect(),
            identity,
        )?;
        Ok(table)
    }

    /// Initialize an empty handle with table metadata.
    ///
    /// Fails if the handle is already initialized (call [`DbTable::reset`]
    /// first), if the two lists differ in length, if a name repeats, or if a
    /// type tag is not recognized.
    pub fn init<N, T>(
        &mut self,
        table_name: &str,
        field_names: &[N],
        field_types: &[T],
        identity: Option<IdentitySpec>,
    ) -> DbopResult<()>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        if field_names.len() != field_types.len() {
            return Err(DbopError::validation(format!(
                "table '{}': {} field names but {} field types",
                table_name,
                field_names.len(),
                field_types.len()
            )));
        }

        let fields = field_names
            .iter()
            .zip(field_types)
            .map(|(name, ty)| -> DbopResult<(String, SqlType)> {
                Ok((name.as_ref().to_string(), ty.as_ref().parse()?))
            })
            .collect::<DbopResult<Vec<_>>>()?;

        self.init_typed(table_name, fields, identity)
    }

    fn init_typed(
        &mut self,
        table_name: &str,
        fields: Vec<(String, SqlType)>,
        identity: Option<IdentitySpec>,
    ) -> DbopResult<()> {
        if self.is_initialized() {
            return Err(DbopError::validation(format!(
                "handle is already initialized for table '{}'",
                self.name
            )));
        }
        if table_name.trim().is_empty() {
            return Err(DbopError::validation("table name cannot be empty"));
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for (name, _) in &fields {
            if name.trim().is_empty() {
                return Err(DbopError::validation(format!(
                    "table '{table_name}': field name cannot be empty"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(DbopError::validation(format!(
                    "table '{table_name}': duplicate field '{name}'"
                )));
            }
            if identity.is_some() && name == IDENTITY_COLUMN {
                return Err(DbopError::validation(format!(
                    "table '{table_name}': '{IDENTITY_COLUMN}' is the identity column, not a field"
                )));
            }
        }

        self.name = table_name.to_string();
        self.fields = fields
            .into_iter()
            .map(|(name, sql_type)| Field {
                name,
                sql_type,
                value: None,
                dirty: false,
            })
            .collect();
        self.identity = identity.map(|spec| Identity {
            spec,
            rec_id: RecId::default(),
        });
        Ok(())
    }

    /// Drop all metadata and values so the handle can be initialized for a
    /// different table.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_initialized(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn table_name(&self) -> &str {
        &self.name
    }

    /// Declared field names in column order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Declared field types in column order.
    pub fn field_types(&self) -> Vec<SqlType> {
        self.fields.iter().map(|f| f.sql_type).collect()
    }

    pub fn field_type(&self, field_name: &str) -> DbopResult<SqlType> {
        self.field(field_name).map(|f| f.sql_type)
    }

    pub fn has_identity(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity_spec(&self) -> Option<IdentitySpec> {
        self.identity.map(|i| i.spec)
    }

    // ==================== Values ====================

    /// Set the textual value of a field and mark it for the next statement.
    ///
    /// Returns `false` (and changes nothing) if the table has no such field.
    /// The text must already be a valid representation for the field's type.
    pub fn set_field_value(&mut self, field_name: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.name == field_name) {
            Some(field) => {
                field.value = Some(value.into());
                field.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Value of a field: `Ok(None)` when unset, an error when the table has
    /// no such field.
    pub fn field_value(&self, field_name: &str) -> DbopResult<Option<&str>> {
        self.field(field_name).map(|f| f.value.as_deref())
    }

    /// Value of a field, or `""` when unset or unknown.
    pub fn get_field_value(&self, field_name: &str) -> &str {
        self.field_value(field_name).ok().flatten().unwrap_or("")
    }

    /// Whether the field was set since the last clear.
    pub fn is_dirty(&self, field_name: &str) -> DbopResult<bool> {
        self.field(field_name).map(|f| f.dirty)
    }

    /// Number of fields set since the last clear.
    pub fn dirty_count(&self) -> usize {
        self.fields.iter().filter(|f| f.dirty).count()
    }

    /// Unset one field. The name `recid` clears the identity value.
    ///
    /// Returns `false` if nothing matched.
    pub fn clear_field(&mut self, field_name: &str) -> bool {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == field_name) {
            field.value = None;
            field.dirty = false;
            return true;
        }

        match self.identity.as_mut() {
            Some(identity) if field_name == IDENTITY_COLUMN => {
                identity.rec_id = RecId::default();
                true
            }
            _ => false,
        }
    }

    /// Unset every field and the identity value.
    pub fn clear_fields(&mut self) {
        for field in &mut self.fields {
            field.value = None;
            field.dirty = false;
        }
        if let Some(identity) = self.identity.as_mut() {
            identity.rec_id = RecId::default();
        }
    }

    // ==================== Identity ====================

    /// The identity value and whether it was set manually.
    pub fn identity(&self) -> DbopResult<(u64, bool)> {
        let rec_id = self.rec_id()?;
        Ok((rec_id.value, rec_id.is_set))
    }

    pub fn rec_id(&self) -> DbopResult<RecId> {
        self.identity
            .map(|i| i.rec_id)
            .ok_or_else(|| DbopError::NoIdentity(self.name.clone()))
    }

    /// Address a row by `recid` in the next statement. `0` clears the value.
    ///
    /// Tables whose `recid` is not auto-incremented also use this to supply
    /// the value for INSERT.
    pub fn set_identity(&mut self, value: u64) -> DbopResult<()> {
        let identity = self
            .identity
            .as_mut()
            .ok_or_else(|| DbopError::NoIdentity(self.name.clone()))?;
        identity.rec_id = RecId {
            value,
            is_set: value != 0,
        };
        Ok(())
    }

    // ==================== Statement building ====================

    /// SELECT on the set fields (and a manually set `recid`).
    pub fn select_builder(&self, first_only: bool) -> DbopResult<SelectBuilder> {
        self.require_initialized()?;
        let mut qb = SelectBuilder::new(&self.name);
        for (col, literal) in self.dirty_literals() {
            qb.and_eq(col, &literal);
        }
        if let Some(value) = self.manual_identity() {
            qb.and_identity(value);
        }
        if first_only {
            qb.first_only();
        }
        Ok(qb)
    }

    pub fn build_select(&self, first_only: bool) -> DbopResult<String> {
        self.select_builder(first_only)?.to_sql()
    }

    /// INSERT of the set fields. A `recid` that is not auto-incremented is
    /// always written with its current value; an auto-incremented one can
    /// not be supplied.
    pub fn insert_builder(&self) -> DbopResult<InsertBuilder> {
        self.require_initialized()?;
        if self.identity_spec().is_some_and(|spec| spec.auto_increment)
            && self.manual_identity().is_some()
        {
            return Err(DbopError::IdentityAssigned(self.name.clone()));
        }
        if self.dirty_count() == 0 && self.manual_identity().is_none() {
            return Err(DbopError::no_fields_set(format!(
                "no fields set for insert into {}",
                self.name
            )));
        }

        let mut builder = InsertBuilder::new(&self.name);
        for (col, literal) in self.dirty_literals() {
            builder.set(col, &literal);
        }
        if let Some(identity) = self.identity {
            if !identity.spec.auto_increment {
                builder.set_identity(identity.rec_id.value);
            }
        }
        Ok(builder)
    }

    pub fn build_insert(&self) -> DbopResult<String> {
        self.insert_builder()?.to_sql()
    }

    /// UPDATE of the set fields, addressed either by `recid` or by an
    /// explicit list of conditions.
    pub fn update_builder(
        &self,
        use_identity: bool,
        where_fields: &[WhereField],
    ) -> DbopResult<UpdateBuilder> {
        self.require_initialized()?;
        if self.dirty_count() == 0 {
            return Err(DbopError::no_fields_set(format!(
                "no fields set for update of {}",
                self.name
            )));
        }

        let mut builder = UpdateBuilder::new(&self.name);
        for (col, literal) in self.dirty_literals() {
            builder.set(col, &literal);
        }

        if use_identity {
            builder.and_identity(self.addressed_identity()?);
        } else {
            if where_fields.is_empty() {
                return Err(DbopError::missing_where(format!(
                    "missing where conditions for update of {}",
                    self.name
                )));
            }
            for wf in where_fields {
                let ty = self.field_type(&wf.field_name)?;
                builder.and_eq(&wf.field_name, &ty.render_literal(&wf.value));
            }
        }
        Ok(builder)
    }

    pub fn build_update(
        &self,
        use_identity: bool,
        where_fields: &[WhereField],
    ) -> DbopResult<String> {
        self.update_builder(use_identity, where_fields)?.to_sql()
    }

    /// DELETE addressed by `recid`, or by the set fields (and a manually set
    /// `recid`). Never unconditional.
    pub fn delete_builder(&self, use_identity: bool) -> DbopResult<DeleteBuilder> {
        self.require_initialized()?;
        let mut builder = DeleteBuilder::new(&self.name);
        if use_identity {
            builder.and_identity(self.addressed_identity()?);
        } else {
            for (col, literal) in self.dirty_literals() {
                builder.and_eq(col, &literal);
            }
            if let Some(value) = self.manual_identity() {
                builder.and_identity(value);
            }
        }
        Ok(builder)
    }

    pub fn build_delete(&self, use_identity: bool) -> DbopResult<String> {
        self.delete_builder(use_identity)?.to_sql()
    }

    // ==================== Crate internals ====================

    pub(crate) fn require_initialized(&self) -> DbopResult<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(DbopError::NotInitialized)
        }
    }

    /// Columns a `SELECT *` row carries: `recid` (if any) plus the fields.
    pub(crate) fn column_count(&self) -> usize {
        self.fields.len() + usize::from(self.identity.is_some())
    }

    /// Same metadata, empty values.
    pub(crate) fn blank(&self) -> Self {
        let mut table = self.clone();
        table.clear_fields();
        table
    }

    /// Store a value read from the database; it is not marked dirty.
    pub(crate) fn load_value(&mut self, index: usize, value: Option<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value;
            field.dirty = false;
        }
    }

    /// Store a `recid` read from the database.
    pub(crate) fn load_identity(&mut self, value: u64) {
        if let Some(identity) = self.identity.as_mut() {
            identity.rec_id = RecId {
                value,
                is_set: false,
            };
        }
    }

    /// Keep values, forget which ones were set.
    pub(crate) fn clear_dirty(&mut self) {
        for field in &mut self.fields {
            field.dirty = false;
        }
    }

    pub(crate) fn field_name_at(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|f| f.name.as_str())
    }

    fn field(&self, field_name: &str) -> DbopResult<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == field_name)
            .ok_or_else(|| DbopError::UnknownField(field_name.to_string()))
    }

    /// `(column, literal)` for every dirty field, in declaration order.
    fn dirty_literals(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.fields.iter().filter(|f| f.dirty).map(|f| {
            (
                f.name.as_str(),
                f.sql_type.render_literal(f.value.as_deref().unwrap_or_default()),
            )
        })
    }

    fn manual_identity(&self) -> Option<u64> {
        self.identity
            .filter(|i| i.rec_id.is_set)
            .map(|i| i.rec_id.value)
    }

    /// The non-zero `recid` a single-row statement targets.
    pub(crate) fn addressed_identity(&self) -> DbopResult<u64> {
        match self.rec_id()?.value {
            0 => Err(DbopError::NoRowAddressed),
            value => Ok(value),
        }
    }
}
