mod payments_csv;

use super::adapters::RawPayment;
use super::profile::DonorSources;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug)]
pub enum SnapshotImportError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for SnapshotImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotImportError::Io(err) => write!(f, "failed to read donor snapshot: {}", err),
            SnapshotImportError::Json(err) => write!(f, "invalid donor snapshot JSON: {}", err),
            SnapshotImportError::Csv(err) => write!(f, "invalid payment export CSV: {}", err),
        }
    }
}

impl std::error::Error for SnapshotImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotImportError::Io(err) => Some(err),
            SnapshotImportError::Json(err) => Some(err),
            SnapshotImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SnapshotImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SnapshotImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for SnapshotImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads the three raw source collections from a JSON snapshot document.
pub struct DonorSnapshotImporter;

impl DonorSnapshotImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<DonorSources, SnapshotImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<DonorSources, SnapshotImportError> {
        let sources: DonorSources = serde_json::from_reader(reader)?;
        debug!(
            hospital = sources.hospital_donations.len(),
            registrations = sources.registrations.len(),
            payments = sources.payments.len(),
            "loaded donor snapshot"
        );
        Ok(sources)
    }
}

/// Loads raw payments from a payment-gateway CSV export.
pub struct PaymentExportImporter;

impl PaymentExportImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RawPayment>, SnapshotImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RawPayment>, SnapshotImportError> {
        Ok(payments_csv::parse_payments(reader)?)
    }
}
