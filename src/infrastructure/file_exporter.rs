use crate::domain::export::{ExportFormat, ExportPackage, ExportReceipt};
use crate::domain::ports::Exporter;
use crate::error::{PayoutError, Result};
use crate::interfaces::csv::request_writer::RequestWriter;
use async_trait::async_trait;
use std::fs::File;
use std::path::{Component, Path, PathBuf};

/// Writes export packages into a directory on disk.
///
/// Only CSV is rendered here; spreadsheet and PDF conversion belong to a
/// downstream service.
#[derive(Debug, Clone)]
pub struct FileExporter {
    dir: PathBuf,
}

impl FileExporter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Resolves the file inside `dir`. The filename must be a single plain
    /// path component, so nothing is written outside the directory.
    fn target_path(&self, package: &ExportPackage) -> Result<PathBuf> {
        let mut components = Path::new(&package.filename).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(PayoutError::Validation(format!(
                "Export filename must be a plain file name: {}",
                package.filename
            )));
        }

        let extension = package.format.extension();
        let suffix = format!(".{extension}");
        if package.filename.to_ascii_lowercase().ends_with(&suffix) {
            Ok(self.dir.join(&package.filename))
        } else {
            Ok(self.dir.join(format!("{}{suffix}", package.filename)))
        }
    }
}

#[async_trait]
impl Exporter for FileExporter {
    async fn export(&self, package: ExportPackage) -> Result<ExportReceipt> {
        if package.format != ExportFormat::Csv {
            return Err(PayoutError::UnsupportedExportFormat(package.format));
        }

        let path = self.target_path(&package)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        // csv::Writer is blocking
        let location = path.clone();
        let record_count = tokio::task::spawn_blocking(move || -> Result<usize> {
            let file = File::create(&path)?;
            RequestWriter::new(file).write_requests(&package.records)
        })
        .await
        .map_err(|e| PayoutError::Io(std::io::Error::other(e)))??;

        tracing::info!(path = %location.display(), record_count, "export written");
        Ok(ExportReceipt {
            location,
            record_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::seed::reference_requests;
    use tempfile::tempdir;

    fn package(format: ExportFormat, filename: &str) -> ExportPackage {
        ExportPackage {
            format,
            filename: filename.to_string(),
            records: reference_requests().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_csv_export_written() {
        let dir = tempdir().unwrap();
        let exporter = FileExporter::new(dir.path());

        let receipt = exporter
            .export(package(ExportFormat::Csv, "payout-requests-2024-01-15"))
            .await
            .unwrap();

        assert_eq!(receipt.record_count, 12);
        assert_eq!(
            receipt.location,
            dir.path().join("payout-requests-2024-01-15.csv")
        );
        let content = std::fs::read_to_string(&receipt.location).unwrap();
        // header + 12 rows
        assert_eq!(content.lines().count(), 13);
    }

    #[tokio::test]
    async fn test_existing_extension_kept() {
        let dir = tempdir().unwrap();
        let exporter = FileExporter::new(dir.path());
        let receipt = exporter
            .export(package(ExportFormat::Csv, "january.CSV"))
            .await
            .unwrap();
        assert_eq!(receipt.location, dir.path().join("january.CSV"));
    }

    #[tokio::test]
    async fn test_pdf_not_rendered() {
        let dir = tempdir().unwrap();
        let exporter = FileExporter::new(dir.path());
        let result = exporter.export(package(ExportFormat::Pdf, "report")).await;
        assert!(matches!(
            result,
            Err(PayoutError::UnsupportedExportFormat(ExportFormat::Pdf))
        ));
        assert!(!dir.path().join("report.pdf").exists());
    }

    #[tokio::test]
    async fn test_filename_cannot_leave_export_dir() {
        let root = tempdir().unwrap();
        let exports = root.path().join("exports");
        let exporter = FileExporter::new(&exports);

        for name in ["../escaped", "nested/report", "/tmp/report", ".", ".."] {
            let result = exporter.export(package(ExportFormat::Csv, name)).await;
            assert!(
                matches!(result, Err(PayoutError::Validation(_))),
                "{name} accepted"
            );
        }
        assert!(!root.path().join("escaped.csv").exists());
        assert!(!exports.exists());
    }
}
