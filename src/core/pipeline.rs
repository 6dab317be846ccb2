use crate::config::toml_config::InvoiceConfig;
use crate::core::progress::{CancelFlag, ProgressReporter};
use crate::core::{GenerationOutcome, GenerationReport, Pipeline, RecordSet, Storage, TabularSource};
use crate::domain::ports::DocumentRenderer;
use crate::domain::services::{consolidate, CompanyProfile, InvoiceDocumentBuilder, OutputLocation};
use crate::utils::error::{InvoiceError, Result};
use chrono::{Local, NaiveDate};

/// Order sheet in, one rendered invoice per consolidated order out.
pub struct InvoicePipeline<S: Storage, T: TabularSource> {
    source: T,
    storage: S,
    config: InvoiceConfig,
    renderer: Box<dyn DocumentRenderer>,
    progress: ProgressReporter,
    cancel: CancelFlag,
    today: NaiveDate,
}

impl<S: Storage, T: TabularSource> InvoicePipeline<S, T> {
    pub fn new(source: T, storage: S, config: InvoiceConfig) -> Self {
        let renderer = config.output.format.renderer();
        Self {
            source,
            storage,
            config,
            renderer,
            progress: ProgressReporter::disabled(),
            cancel: CancelFlag::new(),
            today: Local::now().date_naive(),
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn DocumentRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Date used for the output folders and for unreadable order dates.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    fn builder<'a>(&'a self, company: &'a CompanyProfile) -> InvoiceDocumentBuilder<'a> {
        InvoiceDocumentBuilder::new(company, &self.config.columns, self.today)
    }

    /// Where each eligible row would be written, with the same collision
    /// suffixes a real run would pick, without creating folders or files.
    pub fn plan(&self, records: &RecordSet) -> Result<Vec<OutputLocation>> {
        let company = self.config.company_profile();
        let builder = self.builder(&company);
        let extension = self.renderer.open_session()?.extension();

        let mut names = Vec::new();
        for row in (0..records.len()).filter(|&r| builder.is_eligible(records, r)) {
            names.push(builder.build(records, row)?.customer_name);
        }
        self.config
            .file_namer()
            .preview(names.iter().map(String::as_str), self.today, extension)
    }
}

#[async_trait::async_trait]
impl<S: Storage, T: TabularSource> Pipeline for InvoicePipeline<S, T> {
    async fn extract(&self) -> Result<RecordSet> {
        let table = self.source.read_table()?;
        tracing::info!("📥 Read {} row(s) from the order sheet", table.rows.len());

        let records = RecordSet::load(table)?;
        for row in 0..records.len() {
            let name = records.get(row, &self.config.columns.customer_name);
            if !name.is_empty() {
                self.progress.emit(format!("Loading data for - {}", name));
            }
        }
        Ok(records)
    }

    async fn transform(&self, mut records: RecordSet) -> Result<RecordSet> {
        consolidate(&mut records, &self.config.columns)?;
        Ok(records)
    }

    async fn load(&self, records: RecordSet) -> Result<GenerationOutcome> {
        let company = self.config.company_profile();
        let builder = self.builder(&company);
        let eligible: Vec<usize> = (0..records.len())
            .filter(|&row| builder.is_eligible(&records, row))
            .collect();

        if eligible.is_empty() {
            tracing::warn!(
                "No data to process. Either customer name is empty, a column name is invalid or Skip is YES for every row"
            );
            return Ok(GenerationOutcome::NoEligibleInvoices);
        }

        let namer = self.config.file_namer();
        let mut report = GenerationReport {
            generated: Vec::with_capacity(eligible.len()),
            skipped: records.len() - eligible.len(),
        };

        // Dropped on every way out of this function, releasing the engine.
        let mut session = self.renderer.open_session()?;

        for row in eligible {
            if self.cancel.is_cancelled() {
                tracing::warn!("⏹️ Generation cancelled");
                return Err(InvoiceError::Cancelled {
                    completed: report.generated.len(),
                });
            }

            let document = builder.build(&records, row)?;
            let location = namer.name(&document.customer_name, self.today, session.extension())?;
            let bytes = session.render(&document)?;
            self.storage
                .write_file(&location.relative_path().to_string_lossy(), &bytes)
                .await?;

            tracing::debug!("Wrote {}", location.full_path().display());
            self.progress
                .emit(format!("Generated invoice for {}", document.customer_name));
            report.generated.push(location.full_path());
        }

        tracing::info!(
            "🧾 Generated {} invoice(s), {} row(s) skipped",
            report.generated.len(),
            report.skipped
        );
        Ok(GenerationOutcome::Generated(report))
    }
}
