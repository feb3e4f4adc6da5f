//! Synchronous processing strategy
//!
//! Single-threaded pipeline: operations are streamed from the `SyncReader`
//! iterator into a `BankEngine` one at a time, and the report is written
//! once the input is exhausted.

use crate::cli::ReportKind;
use crate::config::BankConfig;
use crate::core::BankEngine;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{write_report, ProcessingStrategy, ProcessingTally};
use crate::types::BankError;
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use rust_bank_engine::cli::ReportKind;
/// use rust_bank_engine::config::BankConfig;
/// use rust_bank_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(BankConfig::default(), ReportKind::Accounts);
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("operations.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    bank: BankConfig,
    report: ReportKind,
}

impl SyncProcessingStrategy {
    pub fn new(bank: BankConfig, report: ReportKind) -> Self {
        Self { bank, report }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), BankError> {
        let engine = BankEngine::new(self.bank.clone());
        let reader = SyncReader::new(input_path)?;
        let mut tally = ProcessingTally::default();

        for result in reader {
            match result {
                Ok(operation) => {
                    let name = operation.name();
                    let result = engine.process(operation);
                    if let Err(error) = &result {
                        tracing::warn!(operation = name, code = error.code(), %error, "operation failed");
                    }
                    tally.record(&result);
                }
                Err(error) => {
                    tally.skipped += 1;
                    tracing::warn!(%error, "skipping invalid record");
                }
            }
        }

        tally.log("sync");
        write_report(&engine, self.report, output)
    }
}
