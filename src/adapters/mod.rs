// Adapters layer: concrete implementations for the file system and renderers.

pub mod csv_source;
pub mod render;
pub mod storage;

pub use csv_source::CsvSource;
pub use render::{JsonRenderer, OutputFormat, TextRenderer};
pub use storage::LocalStorage;
