use crate::adapters::render::OutputFormat;
use crate::domain::columns::ColumnMap;
use crate::domain::services::naming::format_folder_date;
use crate::domain::services::{CompanyProfile, FileNamer};
use crate::utils::error::{InvoiceError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_FOLDER_DATE_FORMAT: &str = "dd-MM-yyyy";

/// Settings for one run. Built once and passed by reference; to pick up
/// edited settings, call [`InvoiceConfig::reload`] and use the new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceConfig {
    #[serde(default)]
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub company: CompanyConfig,
    #[serde(default)]
    pub columns: ColumnMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub root_path: String,
    #[serde(default = "default_folder_date_format")]
    pub folder_date_format: String,
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_folder_date_format() -> String {
    DEFAULT_FOLDER_DATE_FORMAT.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyConfig {
    pub name: String,
    pub tin_number: String,
    pub support_email: String,
    pub website: String,
    pub customer_care_number: String,
}

impl InvoiceConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(InvoiceError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| InvoiceError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Reads and validates a fresh snapshot; the current value is untouched.
    pub fn reload<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::from_file(path)?;
        config.validate()?;
        tracing::info!("🔄 Settings reloaded for {}", config.company.name);
        Ok(config)
    }

    /// 替換環境變數 (例如 ${SUPPORT_EMAIL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| InvoiceError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("output.root_path", &self.output.root_path)?;
        validation::validate_non_empty_string(
            "output.folder_date_format",
            &self.output.folder_date_format,
        )?;
        // 用固定日期試著格式化一次
        let probe = NaiveDate::from_ymd_opt(2000, 12, 31).unwrap_or_default();
        format_folder_date(probe, &self.output.folder_date_format)?;

        validation::validate_non_empty_string("company.name", &self.company.name)?;
        validation::validate_non_empty_string(
            "company.customer_care_number",
            &self.company.customer_care_number,
        )?;

        if let Some(path) = &self.input.path {
            validation::validate_path("input.path", path)?;
        }
        Ok(())
    }

    pub fn company_profile(&self) -> CompanyProfile {
        CompanyProfile {
            company_name: self.company.name.clone(),
            tin_number: self.company.tin_number.clone(),
            support_email: self.company.support_email.clone(),
            website: self.company.website.clone(),
            customer_care_number: self.company.customer_care_number.clone(),
        }
    }

    pub fn file_namer(&self) -> FileNamer {
        FileNamer::new(&self.output.root_path, &self.output.folder_date_format)
    }

    pub fn output_path(&self) -> &str {
        &self.output.root_path
    }
}

impl Validate for InvoiceConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
