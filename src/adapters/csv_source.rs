use crate::domain::model::RawTable;
use crate::domain::ports::TabularSource;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Reads the order sheet from a CSV (or `.tsv`) export. The first record is
/// the header row.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
            _ => b',',
        };
        Self { path, delimiter }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse<R: std::io::Read>(reader: R, delimiter: u8) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let captions = reader.headers()?.iter().map(str::to_string).collect();
        let mut table = RawTable::new(captions);
        for record in reader.records() {
            let record = record?;
            table.rows.push(
                record
                    .iter()
                    .map(|cell| if cell.is_empty() { None } else { Some(cell.to_string()) })
                    .collect(),
            );
        }
        Ok(table)
    }
}

impl TabularSource for CsvSource {
    fn read_table(&self) -> Result<RawTable> {
        tracing::debug!("Reading order sheet from {}", self.path.display());
        let file = std::fs::File::open(&self.path)?;
        Self::parse(file, self.delimiter)
    }
}
