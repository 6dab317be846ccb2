use crate::domain::model::{GenerationOutcome, RawTable, RecordSet};
use crate::domain::services::InvoiceDocument;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Anything that can hand over a header row plus data rows.
pub trait TabularSource: Send + Sync {
    fn read_table(&self) -> Result<RawTable>;
}

impl TabularSource for RawTable {
    fn read_table(&self) -> Result<RawTable> {
        Ok(self.clone())
    }
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// One open rendering session. Sessions serve one document at a time and
/// release whatever they hold when dropped.
pub trait RenderSession: Send {
    /// File extension of the produced documents, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&mut self, document: &InvoiceDocument) -> Result<Vec<u8>>;
}

pub trait DocumentRenderer: Send + Sync {
    fn open_session(&self) -> Result<Box<dyn RenderSession>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RecordSet>;
    async fn transform(&self, records: RecordSet) -> Result<RecordSet>;
    async fn load(&self, records: RecordSet) -> Result<GenerationOutcome>;
}
