pub mod etl;
pub mod pipeline;
pub mod progress;

pub use crate::domain::model::{GenerationOutcome, GenerationReport, RawTable, RecordSet};
pub use crate::domain::ports::{DocumentRenderer, Pipeline, RenderSession, Storage, TabularSource};
pub use crate::utils::error::Result;
