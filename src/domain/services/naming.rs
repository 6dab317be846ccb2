use crate::utils::error::{InvoiceError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

const FALLBACK_STEM: &str = "invoice";

/// Where one invoice is written:
/// `{root}/{MonthName}/{FormattedDate}/{SanitizedCustomerName}[_{suffix}].{ext}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    pub root: PathBuf,
    pub month: String,
    pub dated_folder: String,
    pub file_stem: String,
    pub extension: String,
}

impl OutputLocation {
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.file_stem.clone()
        } else {
            format!("{}.{}", self.file_stem, self.extension)
        }
    }

    pub fn directory(&self) -> PathBuf {
        self.root.join(&self.month).join(&self.dated_folder)
    }

    /// Path below the output root.
    pub fn relative_path(&self) -> PathBuf {
        Path::new(&self.month)
            .join(&self.dated_folder)
            .join(self.file_name())
    }

    pub fn full_path(&self) -> PathBuf {
        self.directory().join(self.file_name())
    }
}

/// Converts a .NET style date pattern (`dd-MM-yyyy`) into a chrono one
/// (`%d-%m-%Y`). Patterns that already contain `%` are taken as chrono
/// patterns.
pub fn to_chrono_format(pattern: &str) -> String {
    if pattern.contains('%') {
        return pattern.to_string();
    }

    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }
        let token = match (c, run) {
            ('d', 1) => Some("%-d"),
            ('d', 2) => Some("%d"),
            ('d', 3) => Some("%a"),
            ('d', _) => Some("%A"),
            ('M', 1) => Some("%-m"),
            ('M', 2) => Some("%m"),
            ('M', 3) => Some("%b"),
            ('M', _) => Some("%B"),
            ('y', 1 | 2) => Some("%y"),
            ('y', _) => Some("%Y"),
            ('H', 1) => Some("%-H"),
            ('H', _) => Some("%H"),
            ('h', 1) => Some("%-I"),
            ('h', _) => Some("%I"),
            ('m', 1) => Some("%-M"),
            ('m', _) => Some("%M"),
            ('s', 1) => Some("%-S"),
            ('s', _) => Some("%S"),
            ('t', _) => Some("%p"),
            _ => None,
        };
        match token {
            Some(token) => out.push_str(token),
            None => (0..run).for_each(|_| out.push(c)),
        }
        i += run;
    }
    out
}

/// Formats `date` with a .NET style or chrono pattern. Rejects patterns
/// chrono cannot render, time fields (a date has none) and results that
/// would nest folders.
pub fn format_folder_date(date: NaiveDate, pattern: &str) -> Result<String> {
    let chrono_format = to_chrono_format(pattern);
    let invalid = |reason: &str| InvoiceError::InvalidConfigValueError {
        field: "output.folder_date_format".to_string(),
        value: pattern.to_string(),
        reason: reason.to_string(),
    };

    if pattern.trim().is_empty() {
        return Err(invalid("Folder date format cannot be empty"));
    }
    if StrftimeItems::new(&chrono_format).any(|item| matches!(item, Item::Error)) {
        return Err(invalid("Unrecognised date pattern"));
    }

    let mut formatted = String::new();
    write!(formatted, "{}", date.format(&chrono_format))
        .map_err(|_| invalid("Only date fields are allowed, not hours, minutes or seconds"))?;
    if formatted.contains('/') || formatted.contains('\\') {
        return Err(invalid("Formatted date must not contain path separators"));
    }
    Ok(formatted)
}

/// Drops `.` (and path separators) from a customer name.
pub fn sanitize_customer_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|c| !matches!(c, '.' | '/' | '\\'))
        .collect();
    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        sanitized.to_string()
    }
}

/// Picks collision free output locations under one root.
#[derive(Debug, Clone)]
pub struct FileNamer {
    root: PathBuf,
    date_format: String,
}

impl FileNamer {
    pub fn new(root: impl Into<PathBuf>, date_format: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            date_format: date_format.into(),
        }
    }

    /// Works out the location without touching the file system.
    pub fn plan(&self, customer_name: &str, today: NaiveDate, extension: &str) -> Result<OutputLocation> {
        Ok(OutputLocation {
            root: self.root.clone(),
            month: today.format("%B").to_string(),
            dated_folder: format_folder_date(today, &self.date_format)?,
            file_stem: sanitize_customer_name(customer_name),
            extension: extension.to_string(),
        })
    }

    /// Creates the dated folder if needed and returns a location whose file
    /// does not exist yet.
    ///
    /// When files starting with the sanitized name are already present the
    /// stem gets `_{count + 1}`; if that is taken too, the suffix keeps
    /// counting up until a free name is found.
    pub fn name(&self, customer_name: &str, today: NaiveDate, extension: &str) -> Result<OutputLocation> {
        let mut location = self.plan(customer_name, today, extension)?;
        let directory = location.directory();
        fs::create_dir_all(&directory)?;

        let existing = count_with_prefix(&directory, &location.file_stem)?;
        pick_free_stem(&mut location, existing, |path| path.exists());

        tracing::debug!("Output for '{}' -> {}", customer_name, location.full_path().display());
        Ok(location)
    }

    /// The locations consecutive [`FileNamer::name`] calls would return for
    /// `customer_names`, assuming each file is written before the next name
    /// is picked. Creates nothing.
    pub fn preview<'a, I>(
        &self,
        customer_names: I,
        today: NaiveDate,
        extension: &str,
    ) -> Result<Vec<OutputLocation>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut planned = Vec::new();

        for customer_name in customer_names {
            let mut location = self.plan(customer_name, today, extension)?;
            let directory = location.directory();
            let on_disk = if directory.is_dir() {
                count_with_prefix(&directory, &location.file_stem)?
            } else {
                0
            };
            let in_batch = claimed
                .iter()
                .filter(|path| path.parent() == Some(directory.as_path()))
                .filter(|path| {
                    path.file_name()
                        .is_some_and(|n| n.to_string_lossy().starts_with(&location.file_stem))
                })
                .count();

            pick_free_stem(&mut location, on_disk + in_batch, |path| {
                path.exists() || claimed.contains(path)
            });
            claimed.insert(location.full_path());
            planned.push(location);
        }
        Ok(planned)
    }
}

fn pick_free_stem(location: &mut OutputLocation, existing: usize, taken: impl Fn(&Path) -> bool) {
    let base = location.file_stem.clone();
    let mut suffix = if existing == 0 { None } else { Some(existing + 1) };

    loop {
        location.file_stem = match suffix {
            Some(n) => format!("{}_{}", base, n),
            None => base.clone(),
        };
        if !taken(&location.full_path()) {
            break;
        }
        suffix = Some(suffix.map_or(2, |n| n + 1));
    }
}

fn count_with_prefix(directory: &Path, prefix: &str) -> Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with(prefix) {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_to_chrono_format() {
        assert_eq!(to_chrono_format("dd-MM-yyyy"), "%d-%m-%Y");
        assert_eq!(to_chrono_format("yyyy_MMM_d"), "%Y_%b_%-d");
        assert_eq!(to_chrono_format("%Y%m%d"), "%Y%m%d");
    }

    #[test]
    fn test_format_folder_date() {
        assert_eq!(format_folder_date(today(), "dd-MM-yyyy").unwrap(), "05-03-2024");
        assert_eq!(format_folder_date(today(), "%Y.%m.%d").unwrap(), "2024.03.05");
        assert!(format_folder_date(today(), "dd/MM/yyyy").is_err());
        assert!(format_folder_date(today(), "%Q").is_err());
        assert!(format_folder_date(today(), "").is_err());
    }

    #[test]
    fn test_time_fields_are_rejected_not_panicking() {
        for pattern in ["dd-mm-yyyy", "yyyy-MM-dd tt", "HH", "%H", "%Y-%m-%d %p"] {
            let err = format_folder_date(today(), pattern).unwrap_err();
            assert!(
                matches!(err, InvoiceError::InvalidConfigValueError { .. }),
                "{pattern}"
            );
        }
    }

    #[test]
    fn test_sanitize_customer_name() {
        assert_eq!(sanitize_customer_name("Dr. A. Kumar"), "Dr A Kumar");
        assert_eq!(sanitize_customer_name("a/b"), "ab");
        assert_eq!(sanitize_customer_name("..."), "invoice");
    }

    #[test]
    fn test_name_builds_month_and_date_folders() {
        let temp = TempDir::new().unwrap();
        let namer = FileNamer::new(temp.path(), "dd-MM-yyyy");

        let location = namer.name("Mr. Alice", today(), "txt").unwrap();
        assert_eq!(location.month, "March");
        assert_eq!(location.dated_folder, "05-03-2024");
        assert_eq!(location.file_name(), "Mr Alice.txt");
        assert_eq!(
            location.relative_path(),
            Path::new("March").join("05-03-2024").join("Mr Alice.txt")
        );
        assert!(location.directory().is_dir());
        assert!(!location.full_path().exists());
    }

    #[test]
    fn test_collisions_get_numeric_suffixes() {
        let temp = TempDir::new().unwrap();
        let namer = FileNamer::new(temp.path(), "dd-MM-yyyy");

        let first = namer.name("Alice", today(), "txt").unwrap();
        fs::write(first.full_path(), b"1").unwrap();
        let second = namer.name("Alice", today(), "txt").unwrap();
        fs::write(second.full_path(), b"2").unwrap();
        let third = namer.name("Alice", today(), "txt").unwrap();

        assert_eq!(first.file_stem, "Alice");
        assert_eq!(second.file_stem, "Alice_2");
        assert_eq!(third.file_stem, "Alice_3");
    }

    #[test]
    fn test_taken_suffix_counts_up() {
        let temp = TempDir::new().unwrap();
        let namer = FileNamer::new(temp.path(), "dd-MM-yyyy");
        let dir = namer.plan("Alice", today(), "txt").unwrap().directory();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Alice_2.txt"), b"x").unwrap();

        // one match, so `_2` is tried first and is already taken
        let location = namer.name("Alice", today(), "txt").unwrap();
        assert_eq!(location.file_stem, "Alice_3");
    }

    #[test]
    fn test_preview_matches_consecutive_names() {
        let temp = TempDir::new().unwrap();
        let namer = FileNamer::new(temp.path(), "dd-MM-yyyy");
        let dir = namer.plan("Alice", today(), "txt").unwrap().directory();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Alice.txt"), b"x").unwrap();

        let names = ["Alice", "Bob", "Alice", "Bob"];
        let preview = namer.preview(names, today(), "txt").unwrap();
        let stems: Vec<&str> = preview.iter().map(|l| l.file_stem.as_str()).collect();
        assert_eq!(stems, ["Alice_2", "Bob", "Alice_3", "Bob_2"]);
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);

        for (name, planned) in names.iter().zip(&preview) {
            let named = namer.name(name, today(), "txt").unwrap();
            assert_eq!(&named, planned);
            fs::write(named.full_path(), b"x").unwrap();
        }
    }

    #[test]
    fn test_preview_without_output_folder_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let namer = FileNamer::new(temp.path().join("out"), "dd-MM-yyyy");

        let preview = namer.preview(["Alice", "Alice"], today(), "json").unwrap();
        assert_eq!(preview[0].file_name(), "Alice.json");
        assert_eq!(preview[1].file_name(), "Alice_2.json");
        assert!(!temp.path().join("out").exists());
    }
}
