use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of spending categories a transaction or budget can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    #[serde(rename = "Rent/Mortgage")]
    RentMortgage,
    Utilities,
    Transport,
    Entertainment,
    Health,
    Shopping,
    Other,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Self::Groceries,
            Self::RentMortgage,
            Self::Utilities,
            Self::Transport,
            Self::Entertainment,
            Self::Health,
            Self::Shopping,
            Self::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groceries => "Groceries",
            Self::RentMortgage => "Rent/Mortgage",
            Self::Utilities => "Utilities",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Shopping => "Shopping",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
