use crate::utils::error::{InvoiceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub const SKIP: &str = "Skip";
pub const EXCLUDE: &str = "Exclude";
pub const FLAG_NO: &str = "NO";
pub const FLAG_YES: &str = "YES";

/// Sheet row of the first data row; the header occupies row 1.
const FIRST_DATA_ROW: usize = 2;

/// A table as handed over by a tabular source: the header row and the data
/// rows below it. `None` marks a null cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub captions: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(captions: Vec<String>) -> Self {
        Self {
            captions,
            rows: Vec::new(),
        }
    }

    /// Appends a row of non-null cells.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows
            .push(cells.into_iter().map(|c| Some(c.into())).collect());
    }
}

/// Ordered rows sharing one schema, addressed by case-insensitive caption.
///
/// `Skip` and `Exclude` always exist once a set is loaded, and rows flagged
/// `Exclude = YES` are dropped during the load.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    captions: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    // index of each row in the table it was loaded from
    source_rows: Vec<usize>,
}

impl RecordSet {
    pub fn load(table: RawTable) -> Result<Self> {
        let mut captions: Vec<String> = table
            .captions
            .iter()
            .map(|c| c.trim().to_string())
            .collect();

        let mut seen: HashMap<String, usize> = HashMap::new();
        for (index, caption) in captions.iter().enumerate() {
            if caption.is_empty() {
                continue;
            }
            if seen.insert(caption.to_uppercase(), index).is_some() {
                return Err(InvoiceError::DuplicateColumn {
                    caption: caption.clone(),
                });
            }
        }

        let width = captions.len();
        let table_len = table.rows.len();
        let mut defaults: Vec<Option<String>> = Vec::new();
        if !seen.contains_key(&SKIP.to_uppercase()) {
            captions.push(SKIP.to_string());
            defaults.push(Some(FLAG_NO.to_string()));
        }
        if !seen.contains_key(&EXCLUDE.to_uppercase()) {
            captions.push(EXCLUDE.to_string());
            defaults.push(Some(FLAG_NO.to_string()));
        }

        let rows = table
            .rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row.extend(defaults.iter().cloned());
                row
            })
            .collect();

        let source_rows = (0..table_len).collect();
        let mut set = Self {
            captions,
            rows,
            source_rows,
        };
        let before = set.rows.len();
        set.drop_excluded();
        let dropped = before - set.rows.len();
        if dropped > 0 {
            tracing::debug!("Dropped {} excluded row(s) at load", dropped);
        }
        Ok(set)
    }

    fn drop_excluded(&mut self) {
        let Some(col) = self.column_index(EXCLUDE) else {
            return;
        };
        let rows = std::mem::take(&mut self.rows);
        let source_rows = std::mem::take(&mut self.source_rows);
        (self.rows, self.source_rows) = rows
            .into_iter()
            .zip(source_rows)
            .filter(|(row, _)| row[col].as_deref().unwrap_or("").to_uppercase() != FLAG_YES)
            .unzip();
    }

    /// 1-based row number in the original sheet, counting the header and
    /// any excluded rows.
    pub fn sheet_row(&self, row: usize) -> usize {
        self.source_rows.get(row).copied().unwrap_or(row) + FIRST_DATA_ROW
    }

    pub fn captions(&self) -> &[String] {
        &self.captions
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, caption: &str) -> bool {
        self.column_index(caption).is_some()
    }

    fn column_index(&self, caption: &str) -> Option<usize> {
        if caption.is_empty() {
            return None;
        }
        let wanted = caption.to_uppercase();
        self.captions.iter().position(|c| c.to_uppercase() == wanted)
    }

    /// Returns `""` when the caption is unknown, the row is out of range or
    /// the cell is null.
    pub fn get(&self, row: usize, caption: &str) -> String {
        self.column_index(caption)
            .and_then(|col| self.rows.get(row).and_then(|r| r[col].clone()))
            .unwrap_or_default()
    }

    /// Only captions present in the schema appear in the result; unknown
    /// captions are left out rather than mapped to `""`.
    pub fn get_many(&self, row: usize, captions: &[&str]) -> HashMap<String, String> {
        let mut values = HashMap::new();
        for caption in captions {
            if self.has_column(caption) {
                values.insert(caption.to_string(), self.get(row, caption));
            }
        }
        values
    }

    /// No-op when the caption is unknown.
    pub fn set(&mut self, row: usize, caption: &str, value: impl Into<String>) {
        if let Some(col) = self.column_index(caption) {
            if let Some(r) = self.rows.get_mut(row) {
                r[col] = Some(value.into());
            }
        }
    }

    pub fn is_skipped(&self, row: usize) -> bool {
        self.get(row, SKIP).to_uppercase() == FLAG_YES
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub generated: Vec<PathBuf>,
    /// Rows left out because they were skipped or had no customer name.
    pub skipped: usize,
}

/// Result of a generation run. Having nothing to generate is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GenerationOutcome {
    Generated(GenerationReport),
    NoEligibleInvoices,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RawTable {
        let mut table = RawTable::new(vec![
            " CustomerName ".to_string(),
            "CustomerID".to_string(),
            "OrderValue".to_string(),
        ]);
        table.push_row(["Alice", "C1", "10"]);
        table.rows.push(vec![Some("Bob".to_string()), None]);
        table
    }

    #[test]
    fn test_load_adds_tracking_columns() {
        let set = RecordSet::load(table()).unwrap();
        assert_eq!(
            set.captions(),
            &["CustomerName", "CustomerID", "OrderValue", "Skip", "Exclude"]
        );
        assert_eq!(set.get(0, "skip"), "NO");
        assert_eq!(set.get(1, "EXCLUDE"), "NO");
    }

    #[test]
    fn test_existing_exclude_column_is_preserved() {
        let mut table = RawTable::new(vec!["CustomerName".to_string(), "exclude".to_string()]);
        table.push_row(["Alice", "no"]);
        table.push_row(["Bob", "Yes"]);
        table.push_row(["Carol", ""]);

        let set = RecordSet::load(table).unwrap();
        assert_eq!(set.captions(), &["CustomerName", "exclude", "Skip"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0, "CustomerName"), "Alice");
        assert_eq!(set.get(1, "CustomerName"), "Carol");
        assert_eq!(set.get(0, "Exclude"), "no");
    }

    #[test]
    fn test_sheet_row_counts_excluded_rows() {
        let mut table = RawTable::new(vec!["CustomerName".to_string(), "Exclude".to_string()]);
        table.push_row(["Alice", "YES"]);
        table.push_row(["Bob", "YES"]);
        table.push_row(["Carol", "NO"]);

        let set = RecordSet::load(table).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0, "CustomerName"), "Carol");
        assert_eq!(set.sheet_row(0), 4);
    }

    #[test]
    fn test_get_is_case_insensitive_and_tolerant() {
        let set = RecordSet::load(table()).unwrap();
        assert_eq!(set.get(0, "customername"), "Alice");
        assert_eq!(set.get(0, "Missing"), "");
        assert_eq!(set.get(1, "OrderValue"), "");
        assert_eq!(set.get(5, "CustomerName"), "");
    }

    #[test]
    fn test_get_many_omits_unknown_captions() {
        let set = RecordSet::load(table()).unwrap();
        let values = set.get_many(0, &["CustomerID", "InvoiceNo"]);
        assert_eq!(values.len(), 1);
        assert_eq!(values["CustomerID"], "C1");
        assert!(!values.contains_key("InvoiceNo"));
    }

    #[test]
    fn test_set_ignores_unknown_captions() {
        let mut set = RecordSet::load(table()).unwrap();
        let before = set.clone();
        set.set(0, "Nope", "x");
        assert_eq!(set, before);

        set.set(0, "SKIP", "YES");
        assert!(set.is_skipped(0));
        assert!(!set.is_skipped(1));
    }

    #[test]
    fn test_duplicate_captions_are_rejected() {
        let table = RawTable::new(vec!["City".to_string(), "CITY".to_string()]);
        assert!(matches!(
            RecordSet::load(table),
            Err(InvoiceError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn test_blank_captions_are_not_addressable() {
        let mut table = RawTable::new(vec!["".to_string(), "Name".to_string(), " ".to_string()]);
        table.push_row(["a", "b", "c"]);
        let set = RecordSet::load(table).unwrap();
        assert_eq!(set.get(0, ""), "");
        assert_eq!(set.get(0, "Name"), "b");
    }
}
