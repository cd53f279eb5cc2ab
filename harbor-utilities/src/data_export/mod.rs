use std::io::Write;

use harbor_models::errors::SendableError;

pub mod csv;
pub mod table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Two-column key/value table.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let rows = pairs
            .into_iter()
            .map(|(key, value)| vec![key.into(), value.into()])
            .collect();
        Self::new(vec!["field".to_string(), "value".to_string()], rows)
    }
}

pub trait TableExporter {
    fn export(&self, out: &mut dyn Write, table: &TableData) -> Result<(), SendableError>;
}
