//! Batch processing for the async strategy
//!
//! Operations in a batch are applied strictly in input order: a transfer
//! may depend on a deposit to either side just before it, and an approval
//! on the open that precedes it, so no two operations of a batch are
//! reordered. The parallelism lives inside the interest sweep, which fans
//! the per-account work out over tokio's blocking pool.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<BankEngine>   (shared engine)
//!     └── max_concurrent    (bound on concurrent interest accruals)
//! ```

use std::sync::Arc;

use crate::core::engine::{Applied, BankEngine};
use crate::types::{BankError, Operation, Outcome};

/// Result of processing a single operation
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// Name of the operation that was processed
    pub operation: &'static str,

    /// The result of processing (success or error)
    pub result: Result<Applied<Outcome>, BankError>,
}

#[derive(Clone)]
pub struct BatchProcessor {
    engine: Arc<BankEngine>,
    max_concurrent: usize,
}

impl BatchProcessor {
    /// Create a processor sharing `engine`
    ///
    /// `max_concurrent` bounds how many accounts the interest sweep credits
    /// at once.
    pub fn new(engine: Arc<BankEngine>, max_concurrent: usize) -> Self {
        Self {
            engine,
            max_concurrent,
        }
    }

    pub fn engine(&self) -> &Arc<BankEngine> {
        &self.engine
    }

    /// Process one operation, sweeping interest concurrently
    pub async fn process_operation(&self, operation: Operation) -> Result<Applied<Outcome>, BankError> {
        match operation {
            Operation::Interest => Ok(self
                .engine
                .apply_interest_concurrently(self.max_concurrent)
                .await
                .map(|report| report.outcome())),
            other => self.engine.process(other),
        }
    }

    /// Process a batch of operations in order
    ///
    /// # Guarantees
    ///
    /// - Every operation is processed, even if earlier ones fail
    /// - Results are in the same order as the input operations
    pub async fn process_batch(&self, batch: Vec<Operation>) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(batch.len());

        for operation in batch {
            let name = operation.name();
            let result = self.process_operation(operation).await;
            if let Err(error) = &result {
                tracing::warn!(operation = name, code = error.code(), %error, "operation failed");
            }
            results.push(ProcessingResult {
                operation: name,
                result,
            });
        }

        results
    }
}
