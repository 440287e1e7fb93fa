//! Declared SQL type tags and literal rendering.

use crate::error::{DbopError, DbopResult};
use std::fmt;
use std::str::FromStr;

/// How a value of a given type is written into statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralClass {
    /// Numbers, booleans and years: written verbatim.
    Unquoted,
    /// Text, temporal and binary values: written inside single quotes.
    Quoted,
}

/// The type tag of a table field.
///
/// Sizes are not part of the tag (`VARCHAR`, not `VARCHAR(45)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Bit,
    TinyInt,
    Bool,
    Boolean,
    SmallInt,
    MediumInt,
    Int,
    Integer,
    BigInt,
    Serial,
    Decimal,
    Dec,
    Float,
    Double,
    Year,
    Date,
    DateTime,
    Timestamp,
    Time,
    Char,
    VarChar,
    Binary,
    VarBinary,
    TinyBlob,
    TinyText,
    Blob,
    Text,
    MediumBlob,
    MediumText,
    LongBlob,
    LongText,
    Enum,
    Set,
}

impl SqlType {
    /// Every recognized tag, unquoted class first.
    pub const ALL: [SqlType; 33] = [
        SqlType::Bit,
        SqlType::TinyInt,
        SqlType::Bool,
        SqlType::Boolean,
        SqlType::SmallInt,
        SqlType::MediumInt,
        SqlType::Int,
        SqlType::Integer,
        SqlType::BigInt,
        SqlType::Serial,
        SqlType::Decimal,
        SqlType::Dec,
        SqlType::Float,
        SqlType::Double,
        SqlType::Year,
        SqlType::Date,
        SqlType::DateTime,
        SqlType::Timestamp,
        SqlType::Time,
        SqlType::Char,
        SqlType::VarChar,
        SqlType::Binary,
        SqlType::VarBinary,
        SqlType::TinyBlob,
        SqlType::TinyText,
        SqlType::Blob,
        SqlType::Text,
        SqlType::MediumBlob,
        SqlType::MediumText,
        SqlType::LongBlob,
        SqlType::LongText,
        SqlType::Enum,
        SqlType::Set,
    ];

    /// The canonical upper-case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::Bit => "BIT",
            SqlType::TinyInt => "TINYINT",
            SqlType::Bool => "BOOL",
            SqlType::Boolean => "BOOLEAN",
            SqlType::SmallInt => "SMALLINT",
            SqlType::MediumInt => "MEDIUMINT",
            SqlType::Int => "INT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Serial => "SERIAL",
            SqlType::Decimal => "DECIMAL",
            SqlType::Dec => "DEC",
            SqlType::Float => "FLOAT",
            SqlType::Double => "DOUBLE",
            SqlType::Year => "YEAR",
            SqlType::Date => "DATE",
            SqlType::DateTime => "DATETIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Time => "TIME",
            SqlType::Char => "CHAR",
            SqlType::VarChar => "VARCHAR",
            SqlType::Binary => "BINARY",
            SqlType::VarBinary => "VARBINARY",
            SqlType::TinyBlob => "TINYBLOB",
            SqlType::TinyText => "TINYTEXT",
            SqlType::Blob => "BLOB",
            SqlType::Text => "TEXT",
            SqlType::MediumBlob => "MEDIUMBLOB",
            SqlType::MediumText => "MEDIUMTEXT",
            SqlType::LongBlob => "LONGBLOB",
            SqlType::LongText => "LONGTEXT",
            SqlType::Enum => "ENUM",
            SqlType::Set => "SET",
        }
    }

    pub fn literal_class(&self) -> LiteralClass {
        match self {
            SqlType::Bit
            | SqlType::TinyInt
            | SqlType::Bool
            | SqlType::Boolean
            | SqlType::SmallInt
            | SqlType::MediumInt
            | SqlType::Int
            | SqlType::Integer
            | SqlType::BigInt
            | SqlType::Serial
            | SqlType::Decimal
            | SqlType::Dec
            | SqlType::Float
            | SqlType::Double
            | SqlType::Year => LiteralClass::Unquoted,
            SqlType::Date
            | SqlType::DateTime
            | SqlType::Timestamp
            | SqlType::Time
            | SqlType::Char
            | SqlType::VarChar
            | SqlType::Binary
            | SqlType::VarBinary
            | SqlType::TinyBlob
            | SqlType::TinyText
            | SqlType::Blob
            | SqlType::Text
            | SqlType::MediumBlob
            | SqlType::MediumText
            | SqlType::LongBlob
            | SqlType::LongText
            | SqlType::Enum
            | SqlType::Set => LiteralClass::Quoted,
        }
    }

    /// Render `value` as a literal of this type.
    ///
    /// Quoted literals double embedded `'` characters; nothing else is escaped.
    /// Unquoted values are written as given and must already be valid SQL
    /// numbers/booleans.
    pub fn render_literal(&self, value: &str) -> String {
        match self.literal_class() {
            LiteralClass::Unquoted => value.to_string(),
            LiteralClass::Quoted => {
                let mut out = String::with_capacity(value.len() + 2);
                out.push('\'');
                for c in value.chars() {
                    if c == '\'' {
                        out.push('\'');
                    }
                    out.push(c);
                }
                out.push('\'');
                out
            }
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlType {
    type Err = DbopError;

    /// Parse a type tag, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> DbopResult<Self> {
        let tag = s.trim();
        SqlType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| DbopError::validation(format!("unrecognized SQL type tag '{tag}'")))
    }
}
