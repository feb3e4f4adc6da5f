//! Asynchronous batch processing strategy
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BankConfig (rates, fees, branch)
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (in-order application, concurrent interest sweep)
//!         └── Arc<BankEngine>
//! ```
//!
//! Batches are read and applied one after another, and operations inside a
//! batch keep their file order, so the final state equals the sync
//! strategy's. `max_concurrent_batches` sizes the tokio worker pool and
//! bounds how many accounts an interest sweep credits at once.

use crate::cli::ReportKind;
use crate::config::BankConfig;
use crate::core::r#async::BatchProcessor;
use crate::core::BankEngine;
use crate::io::async_reader::AsyncReader;
use crate::strategy::{write_report, ProcessingStrategy, ProcessingTally};
use crate::types::BankError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of operations per batch
    pub batch_size: usize,
    /// Worker threads, and accounts credited concurrently by an interest sweep
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid max_concurrent_batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    bank: BankConfig,
    config: BatchConfig,
    report: ReportKind,
}

impl AsyncProcessingStrategy {
    pub fn new(bank: BankConfig, config: BatchConfig, report: ReportKind) -> Self {
        Self {
            bank,
            config,
            report,
        }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), BankError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| BankError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let engine = Arc::new(BankEngine::new(self.bank.clone()));
            let processor =
                BatchProcessor::new(Arc::clone(&engine), self.config.max_concurrent_batches);

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| BankError::IoError {
                    message: format!("Failed to open file '{}': {}", input_path.display(), e),
                })?;

            // csv-async reads through the futures-io traits
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);
            let mut tally = ProcessingTally::default();

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                for processed in processor.process_batch(batch).await {
                    tally.record(&processed.result);
                }
            }

            tally.skipped = reader.skipped();
            tally.log("async");
            write_report(&engine, self.report, output)
        })
    }
}
