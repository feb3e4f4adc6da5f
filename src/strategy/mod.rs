//! Processing strategy module for operation files
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! encompassing both CSV parsing and engine processing. This allows different
//! processing implementations (synchronous, asynchronous batch) to be selected at runtime.

use crate::cli::{ReportKind, StrategyType};
use crate::config::BankConfig;
use crate::core::engine::{Applied, BankEngine};
use crate::io::csv_format::{write_accounts_csv, write_ledger_csv};
use crate::types::{BankError, Outcome};
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete processing pipelines
///
/// Each strategy reads operations from a CSV file, applies them to a fresh
/// engine built from its [`BankConfig`], and writes the selected report.
pub trait ProcessingStrategy: Send + Sync {
    /// Process operations from input file and write the report to output
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened (file not found, permission denied)
    /// - The async runtime cannot be started
    /// - Output cannot be written
    ///
    /// Invalid rows and refused operations are logged and skipped; they never
    /// cause this method to return an error.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), BankError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `batch` is only used by the async strategy; `None` selects the defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    bank: BankConfig,
    batch: Option<BatchConfig>,
    report: ReportKind,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(bank, report)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            bank,
            batch.unwrap_or_default(),
            report,
        )),
    }
}

/// Counters for one run, logged when the input is exhausted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingTally {
    pub applied: usize,
    pub refused: usize,
    pub skipped: usize,
    /// Applied operations whose storage write failed
    pub unpersisted: usize,
}

impl ProcessingTally {
    pub fn record(&mut self, result: &Result<Applied<Outcome>, BankError>) {
        match result {
            Ok(applied) => {
                self.applied += 1;
                if !applied.is_persisted() {
                    self.unpersisted += 1;
                }
            }
            Err(_) => self.refused += 1,
        }
    }

    pub fn log(&self, strategy: &str) {
        tracing::info!(
            strategy,
            applied = self.applied,
            refused = self.refused,
            skipped = self.skipped,
            unpersisted = self.unpersisted,
            "input processed"
        );
    }
}

/// Write the selected report for every account in `engine`
pub fn write_report(
    engine: &BankEngine,
    report: ReportKind,
    output: &mut dyn Write,
) -> Result<(), BankError> {
    let summaries = engine.summaries();
    match report {
        ReportKind::Accounts => write_accounts_csv(&summaries, output),
        ReportKind::Ledger => {
            let ledgers = summaries
                .iter()
                .map(|summary| Ok((summary.id, engine.transactions(summary.id)?)))
                .collect::<Result<Vec<_>, BankError>>()?;
            write_ledger_csv(&ledgers, output)
        }
    }
}
