use std::error::Error;
use std::io::Write;

use csv::WriterBuilder;
use harbor_models::errors::SendableError;

use super::{TableData, TableExporter};

#[derive(Debug, Default)]
pub struct CsvTableExporter;

impl CsvTableExporter {
    pub fn new() -> Self {
        Self
    }
}

impl TableExporter for CsvTableExporter {
    fn export(&self, out: &mut dyn Write, table: &TableData) -> Result<(), SendableError> {
        let mut writer = WriterBuilder::new().has_headers(true).from_writer(out);

        writer.write_record(&table.headers).map_err(to_sendable)?;

        for row in &table.rows {
            writer.write_record(row).map_err(to_sendable)?;
        }

        writer.flush().map_err(to_sendable)?;
        Ok(())
    }
}

fn to_sendable<E>(err: E) -> SendableError
where
    E: Error + Send + Sync + 'static,
{
    Box::new(err)
}
