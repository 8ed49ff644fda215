use super::request::PayoutRequest;
use crate::error::{PayoutError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = PayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(PayoutError::Validation(format!(
                "Unknown export format: {other}"
            ))),
        }
    }
}

pub fn default_filename(today: NaiveDate) -> String {
    format!("payout-requests-{}", today.format("%Y-%m-%d"))
}

/// Format and filename the operator has typed into the export dialog.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExportDraft {
    pub format: ExportFormat,
    pub filename: String,
}

impl ExportDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            format: ExportFormat::default(),
            filename: default_filename(today),
        }
    }

    pub fn set_format(&mut self, format: ExportFormat) {
        self.format = format;
    }

    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = filename.into();
    }

    /// Freezes the draft together with a snapshot of the ordered view.
    ///
    /// Fails before touching `records` when the filename is blank.
    pub fn package(&self, records: Vec<PayoutRequest>) -> Result<ExportPackage> {
        let filename = self.filename.trim();
        if filename.is_empty() {
            return Err(PayoutError::EmptyExportFilename);
        }
        Ok(ExportPackage {
            format: self.format,
            filename: filename.to_string(),
            records,
        })
    }
}

/// What the exporter receives.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ExportPackage {
    pub format: ExportFormat,
    pub filename: String,
    pub records: Vec<PayoutRequest>,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct ExportReceipt {
    pub location: PathBuf,
    pub record_count: usize,
}
