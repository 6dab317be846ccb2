// Pure invoice logic: merging line items, formatting and naming.

pub mod address;
pub mod amount;
pub mod consolidator;
pub mod document;
pub mod naming;
pub mod words;

pub use consolidator::{consolidate, ConsolidationSummary};
pub use document::{CompanyProfile, InvoiceDocument, InvoiceDocumentBuilder, Region, RegionContent};
pub use naming::{FileNamer, OutputLocation};
