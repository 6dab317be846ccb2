use crate::domain::ports::{DocumentRenderer, RenderSession};
use crate::domain::services::{InvoiceDocument, Region, RegionContent};
use crate::utils::error::{InvoiceError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PAGE_WIDTH: usize = 72;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 2] = ["text", "json"];

    pub fn renderer(&self) -> Box<dyn DocumentRenderer> {
        match self {
            OutputFormat::Text => Box::new(TextRenderer),
            OutputFormat::Json => Box::new(JsonRenderer),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(InvoiceError::InvalidConfigValueError {
                field: "output.format".to_string(),
                value: other.to_string(),
                reason: format!("Valid formats: {}", OutputFormat::NAMES.join(", ")),
            }),
        }
    }
}

/// Lays the invoice out as a fixed-width plain text page.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl DocumentRenderer for TextRenderer {
    fn open_session(&self) -> Result<Box<dyn RenderSession>> {
        tracing::debug!("Opening text render session");
        Ok(Box::new(TextSession { rendered: 0 }))
    }
}

struct TextSession {
    rendered: usize,
}

impl TextSession {
    fn write_region(out: &mut String, region: Region, content: &RegionContent) {
        if let Some(caption) = region.caption() {
            out.push_str(caption);
            out.push('\n');
        }
        for line in content.text.lines() {
            if content.centered {
                out.push_str(format!("{:^width$}", line, width = PAGE_WIDTH).trim_end());
            } else {
                out.push_str(line);
            }
            out.push('\n');
        }
        if region == Region::Header {
            out.push_str(&"=".repeat(PAGE_WIDTH));
            out.push('\n');
        }
        out.push('\n');
    }
}

impl RenderSession for TextSession {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&mut self, document: &InvoiceDocument) -> Result<Vec<u8>> {
        let mut out = String::new();
        for (region, content) in &document.regions {
            Self::write_region(&mut out, *region, content);
        }
        self.rendered += 1;
        Ok(out.into_bytes())
    }
}

impl Drop for TextSession {
    fn drop(&mut self) {
        tracing::debug!("Closed text render session after {} document(s)", self.rendered);
    }
}

/// Writes the region model itself, for downstream tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl DocumentRenderer for JsonRenderer {
    fn open_session(&self) -> Result<Box<dyn RenderSession>> {
        tracing::debug!("Opening JSON render session");
        Ok(Box::new(JsonSession { rendered: 0 }))
    }
}

struct JsonSession {
    rendered: usize,
}

impl RenderSession for JsonSession {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&mut self, document: &InvoiceDocument) -> Result<Vec<u8>> {
        let bytes = serde_json::to_vec_pretty(document)?;
        self.rendered += 1;
        Ok(bytes)
    }
}

impl Drop for JsonSession {
    fn drop(&mut self) {
        tracing::debug!("Closed JSON render session after {} document(s)", self.rendered);
    }
}
