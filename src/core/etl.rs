use crate::core::{GenerationOutcome, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Runs a pipeline's three phases in order: load the sheet, merge line
/// items, generate the invoices.
pub struct InvoiceEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> InvoiceEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<GenerationOutcome> {
        tracing::info!("🚀 Starting invoice generation");

        let records = self.pipeline.extract().await?;
        tracing::info!("📋 Loaded {} row(s)", records.len());
        self.monitor.log_stats("Load");

        let records = self.pipeline.transform(records).await?;
        self.monitor.log_stats("Consolidate");

        let outcome = self.pipeline.load(records).await?;
        self.monitor.log_stats("Generate");
        self.monitor.log_final_stats();

        Ok(outcome)
    }
}
