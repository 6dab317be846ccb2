pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::InvoiceConfig;

pub use adapters::{CsvSource, LocalStorage, OutputFormat};
pub use core::progress::{CancelFlag, ProgressReporter};
pub use core::{etl::InvoiceEngine, pipeline::InvoicePipeline};
pub use domain::model::{GenerationOutcome, GenerationReport, RawTable, RecordSet};
pub use utils::error::{InvoiceError, Result};
