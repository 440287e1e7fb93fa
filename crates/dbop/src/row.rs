//! Row mapping: driver rows into [`DbTable`] values.

use crate::error::{DbopError, DbopResult};
use crate::table::{DbTable, IDENTITY_COLUMN};
use bit_vec::BitVec;
use std::error::Error;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, Kind, Type};

/// A single untyped column value as returned by the database.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// SQL NULL
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// Everything with a textual form: strings, dates and times, numerics,
    /// uuids, json, bytes.
    Text(String),
}

impl Scalar {
    /// Widen an `f32` through its shortest text so `1.7f32` stays `1.7`.
    pub fn from_f32(value: f32) -> Self {
        Scalar::Float(value.to_string().parse().unwrap_or(f64::from(value)))
    }

    /// Canonical text of this value; `None` for NULL.
    pub fn render(&self) -> Option<String> {
        render_scalar(self)
    }
}

/// Canonical string form of a scalar, as stored in a field.
///
/// - integers: decimal digits (with `-` for negatives)
/// - floats: shortest text that parses back to the same value
/// - booleans: `"true"` / `"false"`
/// - text: unchanged
/// - NULL: `None`, which leaves the field unset
pub fn render_scalar(value: &Scalar) -> Option<String> {
    match value {
        Scalar::Null => None,
        Scalar::Int(v) => Some(v.to_string()),
        Scalar::UInt(v) => Some(v.to_string()),
        Scalar::Float(v) => Some(v.to_string()),
        Scalar::Bool(v) => Some(v.to_string()),
        Scalar::Text(v) => Some(v.clone()),
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::UInt(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

/// A fixed-width row of column values in `SELECT *` order.
pub trait RowSource {
    /// Number of columns.
    fn width(&self) -> usize;

    /// Value of column `idx` (0-based).
    fn scalar(&self, idx: usize) -> DbopResult<Scalar>;
}

impl RowSource for [Scalar] {
    fn width(&self) -> usize {
        self.len()
    }

    fn scalar(&self, idx: usize) -> DbopResult<Scalar> {
        self.get(idx)
            .cloned()
            .ok_or_else(|| DbopError::decode(idx.to_string(), "column index out of range"))
    }
}

impl RowSource for Vec<Scalar> {
    fn width(&self) -> usize {
        self.len()
    }

    fn scalar(&self, idx: usize) -> DbopResult<Scalar> {
        self.as_slice().scalar(idx)
    }
}

/// `recid` as read from a row: a non-negative integer.
pub(crate) fn identity_value(value: Scalar) -> DbopResult<u64> {
    match value {
        Scalar::Int(v) => u64::try_from(v)
            .map_err(|_| DbopError::decode(IDENTITY_COLUMN, format!("negative recid {v}"))),
        Scalar::UInt(v) => Ok(v),
        other => Err(DbopError::decode(
            IDENTITY_COLUMN,
            format!("expected an integer, got {other:?}"),
        )),
    }
}

/// A column value kept as the text the server sent.
///
/// Enum labels and text-like extension types travel as plain UTF-8 even in
/// the binary protocol.
struct RawText(String);

impl<'a> FromSql<'a> for RawText {
    fn from_sql(_: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Ok(RawText(std::str::from_utf8(raw)?.to_string()))
    }

    fn accepts(ty: &Type) -> bool {
        match ty.kind() {
            Kind::Enum(_) => true,
            _ => *ty == Type::UNKNOWN || ty.name() == "citext",
        }
    }
}

/// `BIT` / `VARBIT` as a string of `0` and `1`.
fn render_bits(bits: &BitVec) -> String {
    bits.iter().map(|bit| if bit { '1' } else { '0' }).collect()
}

fn try_get<'a, T>(row: &'a Row, idx: usize, column: &str) -> DbopResult<Option<T>>
where
    T: FromSql<'a>,
{
    row.try_get::<_, Option<T>>(idx)
        .map_err(|e| DbopError::decode(column, e.to_string()))
}

impl RowSource for Row {
    fn width(&self) -> usize {
        self.len()
    }

    fn scalar(&self, idx: usize) -> DbopResult<Scalar> {
        let column = self
            .columns()
            .get(idx)
            .ok_or_else(|| DbopError::decode(idx.to_string(), "column index out of range"))?;
        let name = column.name();

        let value = match *column.type_() {
            Type::BOOL => try_get::<bool>(self, idx, name)?.map(Scalar::Bool),
            Type::INT2 => try_get::<i16>(self, idx, name)?.map(|v| Scalar::Int(v.into())),
            Type::INT4 => try_get::<i32>(self, idx, name)?.map(|v| Scalar::Int(v.into())),
            Type::INT8 => try_get::<i64>(self, idx, name)?.map(Scalar::Int),
            Type::OID => try_get::<u32>(self, idx, name)?.map(|v| Scalar::UInt(v.into())),
            Type::FLOAT4 => try_get::<f32>(self, idx, name)?.map(Scalar::from_f32),
            Type::FLOAT8 => try_get::<f64>(self, idx, name)?.map(Scalar::Float),
            Type::NUMERIC => try_get::<rust_decimal::Decimal>(self, idx, name)?
                .map(|v| Scalar::Text(v.normalize().to_string())),
            Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
                try_get::<String>(self, idx, name)?.map(Scalar::Text)
            }
            Type::DATE => try_get::<chrono::NaiveDate>(self, idx, name)?
                .map(|v| Scalar::Text(v.to_string())),
            Type::TIME => try_get::<chrono::NaiveTime>(self, idx, name)?
                .map(|v| Scalar::Text(v.to_string())),
            Type::TIMESTAMP => try_get::<chrono::NaiveDateTime>(self, idx, name)?
                .map(|v| Scalar::Text(v.to_string())),
            Type::TIMESTAMPTZ => try_get::<chrono::DateTime<chrono::Utc>>(self, idx, name)?
                .map(|v| Scalar::Text(v.to_rfc3339())),
            Type::UUID => {
                try_get::<uuid::Uuid>(self, idx, name)?.map(|v| Scalar::Text(v.to_string()))
            }
            Type::JSON | Type::JSONB => try_get::<serde_json::Value>(self, idx, name)?
                .map(|v| Scalar::Text(v.to_string())),
            Type::BYTEA => try_get::<Vec<u8>>(self, idx, name)?
                .map(|v| Scalar::Text(String::from_utf8_lossy(&v).into_owned())),
            Type::BIT | Type::VARBIT => {
                try_get::<BitVec>(self, idx, name)?.map(|v| Scalar::Text(render_bits(&v)))
            }
            ref other if RawText::accepts(other) => {
                try_get::<RawText>(self, idx, name)?.map(|v| Scalar::Text(v.0))
            }
            ref other => {
                return Err(DbopError::decode(name, format!("unsupported column type {other}")));
            }
        };

        Ok(value.unwrap_or(Scalar::Null))
    }
}

impl DbTable {
    /// Build a new handle for this table from one database row.
    ///
    /// The row must carry `recid` first (when the table has one) followed by
    /// every declared field in order. The returned handle has nothing
    /// marked dirty and its `recid` counts as read, not manually set.
    pub fn map_row<R: RowSource + ?Sized>(&self, row: &R) -> DbopResult<DbTable> {
        self.require_initialized()?;

        let expected = self.column_count();
        let got = row.width();
        if got != expected {
            return Err(DbopError::RowShape { expected, got });
        }

        let mut mapped = self.blank();
        let offset = if self.has_identity() {
            mapped.load_identity(identity_value(row.scalar(0)?)?);
            1
        } else {
            0
        };

        for idx in 0..expected - offset {
            let value = row.scalar(idx + offset).map_err(|e| match e {
                DbopError::Decode { message, .. } => DbopError::Decode {
                    column: self.field_name_at(idx).unwrap_or_default().to_string(),
                    message,
                },
                other => other,
            })?;
            mapped.load_value(idx, render_scalar(&value));
        }

        Ok(mapped)
    }

    /// Map every row, in order.
    pub fn map_rows<R: RowSource>(&self, rows: &[R]) -> DbopResult<Vec<DbTable>> {
        rows.iter().map(|row| self.map_row(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::IdentitySpec;

    fn users() -> DbTable {
        DbTable::new(
            "Users",
            &["name", "registered", "role", "rating", "yr"],
            &["VARCHAR", "DATETIME", "SMALLINT", "DECIMAL", "YEAR"],
            Some(IdentitySpec::auto_increment()),
        )
        .unwrap()
    }

    #[test]
    fn renders_each_scalar_kind() {
        assert_eq!(render_scalar(&Scalar::Int(-42)).as_deref(), Some("-42"));
        assert_eq!(
            render_scalar(&Scalar::UInt(u64::MAX)).as_deref(),
            Some("18446744073709551615")
        );
        assert_eq!(render_scalar(&Scalar::Float(1.7)).as_deref(), Some("1.7"));
        assert_eq!(render_scalar(&Scalar::Float(2.0)).as_deref(), Some("2"));
        assert_eq!(render_scalar(&Scalar::Bool(true)).as_deref(), Some("true"));
        assert_eq!(render_scalar(&Scalar::Bool(false)).as_deref(), Some("false"));
        assert_eq!(render_scalar(&"Ann".into()).as_deref(), Some("Ann"));
        assert_eq!(render_scalar(&Scalar::Null), None);
    }

    #[test]
    fn f32_widening_keeps_short_text() {
        assert_eq!(Scalar::from_f32(1.7).render().as_deref(), Some("1.7"));
        assert_eq!(Scalar::from_f32(0.1).render().as_deref(), Some("0.1"));
    }

    #[test]
    fn maps_row_with_identity_first() {
        let row: Vec<Scalar> = vec![
            7i64.into(),
            "testing 1 one".into(),
            "2012-05-14 09:44:12".into(),
            1i64.into(),
            "1.7".into(),
            2011i64.into(),
        ];

        let mapped = users().map_row(&row).unwrap();
        assert_eq!(mapped.identity().unwrap(), (7, false));
        assert_eq!(mapped.get_field_value("name"), "testing 1 one");
        assert_eq!(mapped.get_field_value("registered"), "2012-05-14 09:44:12");
        assert_eq!(mapped.get_field_value("role"), "1");
        assert_eq!(mapped.get_field_value("rating"), "1.7");
        assert_eq!(mapped.get_field_value("yr"), "2011");
        assert_eq!(mapped.dirty_count(), 0);
    }

    #[test]
    fn mapped_row_selects_nothing_extra() {
        let row: Vec<Scalar> = vec![
            3i64.into(),
            "a".into(),
            Scalar::Null,
            Scalar::Null,
            Scalar::Null,
            Scalar::Null,
        ];
        let mapped = users().map_row(&row).unwrap();
        // fetched values and a fetched recid are not conditions
        assert_eq!(mapped.build_select(false).unwrap(), "SELECT * FROM Users");
    }

    #[test]
    fn null_leaves_field_unset() {
        let row: Vec<Scalar> = vec![
            1u64.into(),
            "a".into(),
            Scalar::Null,
            Scalar::Null,
            Scalar::Null,
            Scalar::Null,
        ];
        let mapped = users().map_row(&row).unwrap();
        assert_eq!(mapped.field_value("role").unwrap(), None);
        assert_eq!(mapped.field_value("name").unwrap(), Some("a"));
    }

    #[test]
    fn maps_row_without_identity() {
        let table = DbTable::new("t", &["a", "b"], &["INT", "BOOL"], None).unwrap();
        let row = [Scalar::Int(5), Scalar::Bool(true)];
        let mapped = table.map_row(&row[..]).unwrap();
        assert_eq!(mapped.get_field_value("a"), "5");
        assert_eq!(mapped.get_field_value("b"), "true");
        assert!(matches!(mapped.identity(), Err(DbopError::NoIdentity(_))));
    }

    #[test]
    fn rejects_wrong_width() {
        let row: Vec<Scalar> = vec![1i64.into(), "only name".into()];
        let err = users().map_row(&row).unwrap_err();
        assert!(matches!(err, DbopError::RowShape { expected: 6, got: 2 }));
    }

    #[test]
    fn rejects_non_integer_identity() {
        let row: Vec<Scalar> = vec![
            "seven".into(),
            "a".into(),
            Scalar::Null,
            Scalar::Null,
            Scalar::Null,
            Scalar::Null,
        ];
        let err = users().map_row(&row).unwrap_err();
        assert!(matches!(err, DbopError::Decode { ref column, .. } if column == "recid"));

        let mut negative = row.clone();
        negative[0] = Scalar::Int(-1);
        assert!(users().map_row(&negative).is_err());
    }

    #[test]
    fn mapped_rows_are_independent() {
        let table = DbTable::new("t", &["a"], &["INT"], None).unwrap();
        let rows = vec![vec![Scalar::Int(1)], vec![Scalar::Int(2)]];
        let mut mapped = table.map_rows(&rows).unwrap();
        mapped[0].set_field_value("a", "10");
        assert_eq!(mapped[0].get_field_value("a"), "10");
        assert_eq!(mapped[1].get_field_value("a"), "2");
        assert_eq!(table.field_value("a").unwrap(), None);
    }

    #[test]
    fn enum_labels_decode_as_raw_text() {
        let mood = Type::new(
            "mood".to_string(),
            16390,
            Kind::Enum(vec!["sad".to_string(), "happy".to_string()]),
            "public".to_string(),
        );
        assert!(RawText::accepts(&mood));
        assert_eq!(RawText::from_sql(&mood, b"happy").unwrap().0, "happy");
        assert!(RawText::from_sql(&mood, &[0xff, 0xfe]).is_err());

        assert!(!RawText::accepts(&Type::INTERVAL));
        assert!(!RawText::accepts(&Type::INT4));
    }

    #[test]
    fn bits_render_as_digits() {
        assert_eq!(render_bits(&BitVec::from_elem(1, true)), "1");
        assert_eq!(render_bits(&BitVec::from_bytes(&[0b1010_0001])), "10100001");
        assert_eq!(render_bits(&BitVec::new()), "");
    }

    #[test]
    fn identity_value_needs_non_negative_integer() {
        assert_eq!(identity_value(Scalar::Int(12)).unwrap(), 12);
        assert_eq!(identity_value(Scalar::UInt(3)).unwrap(), 3);
        assert!(matches!(
            identity_value(Scalar::Int(-1)),
            Err(DbopError::Decode { ref column, .. }) if column == "recid"
        ));
        assert!(identity_value(Scalar::Text("7".into())).is_err());
        assert!(identity_value(Scalar::Null).is_err());
    }

    #[test]
    fn map_row_on_uninitialized_handle_fails() {
        let row: Vec<Scalar> = vec![];
        assert!(matches!(
            DbTable::default().map_row(&row),
            Err(DbopError::NotInitialized)
        ));
    }
}
