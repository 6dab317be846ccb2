use crate::adapters::render::OutputFormat;
use crate::config::toml_config::InvoiceConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "invoice-gen")]
#[command(about = "Generate one invoice per customer order from an order sheet")]
pub struct CliConfig {
    /// Order sheet (CSV or TSV); overrides `input.path` from the settings
    #[arg(short, long)]
    pub input: Option<String>,

    /// Path to the TOML settings file
    #[arg(short, long, default_value = "invoice-gen.toml")]
    pub config: String,

    /// Override `output.root_path`
    #[arg(long)]
    pub output: Option<String>,

    /// Override `output.format`
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    /// Consolidate and list the invoices without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    pub fn apply_overrides(&self, config: &mut InvoiceConfig) {
        if let Some(input) = &self.input {
            config.input.path = Some(input.clone());
        }
        if let Some(output) = &self.output {
            tracing::info!("🔧 Output root overridden to: {}", output);
            config.output.root_path = output.clone();
        }
        if let Some(format) = self.format {
            tracing::info!("🔧 Output format overridden to: {}", format);
            config.output.format = format;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_settings() {
        let mut config = InvoiceConfig::from_toml_str(
            "[output]\nroot_path = \"./out\"\n[company]\nname = \"X\"\ncustomer_care_number = \"1\"\n",
        )
        .unwrap();
        let cli = CliConfig::parse_from([
            "invoice-gen",
            "--input",
            "orders.csv",
            "--output",
            "/tmp/invoices",
            "--format",
            "json",
        ]);

        cli.apply_overrides(&mut config);
        assert_eq!(config.input.path.as_deref(), Some("orders.csv"));
        assert_eq!(config.output.root_path, "/tmp/invoices");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!cli.dry_run);
    }
}
