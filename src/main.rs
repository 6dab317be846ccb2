use clap::Parser;
use invoice_gen::core::Pipeline;
use invoice_gen::utils::error::ErrorSeverity;
use invoice_gen::utils::{logger, validation, validation::Validate};
use invoice_gen::{
    CliConfig, CsvSource, GenerationOutcome, GenerationReport, InvoiceConfig, InvoiceEngine,
    InvoiceError, InvoicePipeline, LocalStorage, ProgressReporter,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting invoice-gen");
    tracing::info!("📁 Loading settings from: {}", cli.config);

    let mut config = match InvoiceConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load settings '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    // 驗證配置
    let input = match config
        .validate()
        .and_then(|_| validation::validate_required_field("input.path", &config.input.path).cloned())
    {
        Ok(input) => input,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let (progress, mut progress_rx) = ProgressReporter::channel();
    let observer = tokio::spawn(async move {
        while let Some(message) = progress_rx.recv().await {
            tracing::info!("{}", message);
        }
    });

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline =
        InvoicePipeline::new(CsvSource::new(input), storage, config).with_progress(progress);

    let result = if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        let result = dry_run(&pipeline).await;
        drop(pipeline);
        result
    } else {
        let engine = InvoiceEngine::new_with_monitoring(pipeline, cli.monitor);
        engine.run().await
    };

    // the pipeline owned the only sender, so the observer drains and stops
    let _ = observer.await;

    match result {
        Ok(GenerationOutcome::Generated(report)) => {
            tracing::info!("✅ Invoice generated successfully");
            println!("✅ Generated {} invoice(s)", report.generated.len());
            for path in &report.generated {
                println!("📄 {}", path.display());
            }
        }
        Ok(GenerationOutcome::NoEligibleInvoices) => {
            println!(
                "⚠️ No data to process. Either customer name could be empty, column name is invalid or skip is YES in sheet."
            );
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

async fn dry_run(
    pipeline: &InvoicePipeline<LocalStorage, CsvSource>,
) -> invoice_gen::Result<GenerationOutcome> {
    let records = pipeline.extract().await?;
    let records = pipeline.transform(records).await?;
    let planned = pipeline.plan(&records)?;

    if planned.is_empty() {
        return Ok(GenerationOutcome::NoEligibleInvoices);
    }
    println!("🔍 Would generate {} invoice(s):", planned.len());
    for location in &planned {
        println!("  {}", location.full_path().display());
    }
    Ok(GenerationOutcome::Generated(GenerationReport::default()))
}

fn exit_with(e: InvoiceError) -> ! {
    tracing::error!(
        "❌ Invoice generation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
