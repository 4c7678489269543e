//! Outcome of a dispatch run.
use std::fmt::{self, Display};

use alloy::primitives::TxHash;

use crate::transfer::TransferError;

/// Result of sending a token to one destination.
#[derive(Debug)]
pub struct TransferRecord {
    /// Destination as read from the address file.
    pub destination: String,
    /// Hash of the confirmed transfer, or why it failed.
    pub result: Result<TxHash, TransferError>,
}

/// Success and failure counts of a dispatch run.
#[derive(Debug)]
pub struct Tally {
    total: usize,
    records: Vec<TransferRecord>,
}

impl Tally {
    /// Empty tally for a run over `total` destinations.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self { total, records: Vec::with_capacity(total) }
    }

    /// Records the outcome for `destination`.
    pub fn record(
        &mut self,
        destination: impl Into<String>,
        result: Result<TxHash, TransferError>,
    ) {
        self.records.push(TransferRecord {
            destination: destination.into(),
            result,
        });
    }

    /// Number of destinations the run was started with.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of confirmed transfers.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|record| record.result.is_ok()).count()
    }

    /// Number of destinations that did not receive a token.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.processed() - self.succeeded()
    }

    /// Number of destinations handled so far.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.records.len()
    }

    /// Every recorded outcome, in processing order.
    #[must_use]
    pub fn records(&self) -> &[TransferRecord] {
        &self.records
    }
}

impl Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transfer summary:")?;
        writeln!(f, "- succeeded: {}", self.succeeded())?;
        writeln!(f, "- failed: {}", self.failed())?;
        write!(f, "- processed: {}/{}", self.processed(), self.total)
    }
}
