//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Table identifier newtype wrapper
///
/// Names a table whose backups are looked up and whose contents are exported.
/// The identifier is opaque to Ferry; the only rule is that it is non-empty.
///
/// # Examples
///
/// ```
/// use ferry::domain::ids::TableId;
/// use std::str::FromStr;
///
/// let table_id = TableId::from_str("Orders").unwrap();
/// assert_eq!(table_id.as_str(), "Orders");
/// assert!(TableId::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableId(String);

impl TableId {
    /// Creates a new TableId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(TableId)` if the ID is non-empty, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Table ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the table ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TableId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TableId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TableId> for String {
    fn from(id: TableId) -> Self {
        id.0
    }
}

impl AsRef<str> for TableId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
