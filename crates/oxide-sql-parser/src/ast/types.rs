//! Column and cast target types.

use core::fmt;

/// A data type as written in a column definition, a `CAST` or a `::` cast.
///
/// Spellings that mean the same type collapse to one variant: `INT` and
/// `INTEGER` are [`DataType::Integer`]; `FLOAT`, `DOUBLE` and
/// `DOUBLE PRECISION` are [`DataType::Double`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DataType<'a> {
    Smallint,
    Integer,
    Bigint,
    Real,
    Double,
    /// `DECIMAL[(precision[, scale])]`.
    Decimal {
        precision: Option<u16>,
        scale: Option<u16>,
    },
    /// `NUMERIC[(precision[, scale])]`, kept apart from `DECIMAL` so the
    /// original spelling survives.
    Numeric {
        precision: Option<u16>,
        scale: Option<u16>,
    },
    /// `CHAR[(length)]`.
    Char(Option<u32>),
    /// `VARCHAR[(length)]`.
    Varchar(Option<u32>),
    Text,
    Blob,
    Date,
    Time,
    Timestamp,
    /// SQLite's `DATETIME`.
    Datetime,
    Boolean,
    /// An unrecognized type name, kept as written (`uuid`, `jsonb`, ...).
    Custom(&'a str),
}

impl<'a> DataType<'a> {
    /// Returns the type name without its arguments.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        match self {
            Self::Smallint => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::Bigint => "BIGINT",
            Self::Real => "REAL",
            Self::Double => "DOUBLE",
            Self::Decimal { .. } => "DECIMAL",
            Self::Numeric { .. } => "NUMERIC",
            Self::Char(_) => "CHAR",
            Self::Varchar(_) => "VARCHAR",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Datetime => "DATETIME",
            Self::Boolean => "BOOLEAN",
            Self::Custom(name) => *name,
        }
    }
}

impl fmt::Display for DataType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        match self {
            Self::Decimal {
                precision: Some(p),
                scale,
            }
            | Self::Numeric {
                precision: Some(p),
                scale,
            } => match scale {
                Some(s) => write!(f, "({p}, {s})"),
                None => write!(f, "({p})"),
            },
            Self::Char(Some(len)) | Self::Varchar(Some(len)) => write!(f, "({len})"),
            _ => Ok(()),
        }
    }
}
