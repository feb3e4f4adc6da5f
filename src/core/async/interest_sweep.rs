//! Concurrent interest sweep
//!
//! Fans the per-account accrual out over tokio's blocking pool, at most
//! `max_concurrent` accounts at a time. Each account is still visited
//! exactly once and credited under its own lock, so the result matches the
//! sequential sweep.

use crate::core::engine::{Applied, BankEngine};
use crate::core::interest::{self, Accrual, SweepReport};
use crate::types::{AccountId, BankError};
use futures::stream::{self, StreamExt};
use tokio::task::JoinError;

type Joined = (AccountId, Result<Result<Option<Accrual>, BankError>, JoinError>);

impl BankEngine {
    /// Apply monthly interest to every account concurrently
    ///
    /// Postings and failures in the report are sorted by account id.
    pub async fn apply_interest_concurrently(&self, max_concurrent: usize) -> Applied<SweepReport> {
        let handles = self.accounts().handles();

        let results: Vec<_> = stream::iter(handles)
            .map(|(id, handle)| async move {
                let joined = tokio::task::spawn_blocking(move || interest::accrue(&handle)).await;
                (id, joined)
            })
            .buffer_unordered(max_concurrent.max(1))
            .collect()
            .await;

        let (report, accruals) = collect(results);

        tracing::info!(
            visited = report.visited,
            total = %report.total,
            max_concurrent,
            "concurrent interest sweep finished"
        );
        let persistence = self.persist_accruals(&accruals);
        Applied {
            value: report,
            persistence,
        }
    }
}

/// Fold joined task results into a report, sorted by account id
///
/// A task that panicked still counts as visited and shows up as a
/// `TaskFailed` failure.
fn collect(results: Vec<Joined>) -> (SweepReport, Vec<Accrual>) {
    let mut report = SweepReport::default();
    let mut accruals = Vec::new();
    for (id, joined) in results {
        let result = joined.unwrap_or_else(|error| {
            tracing::error!(account = %id, %error, "interest task panicked");
            Err(BankError::TaskFailed {
                account: id,
                message: error.to_string(),
            })
        });
        report.record(id, &result);
        if let Ok(Some(accrual)) = result {
            accruals.push(accrual);
        }
    }
    report.sort();
    accruals.sort_by_key(|accrual| accrual.record.id);
    (report, accruals)
}
