//! Asynchronous CSV reader with batch interface
//!
//! Reads operations with csv-async and hands them out in batches for the
//! async strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of Operations
//!                  ↓
//!           csv_format module
//!           (OperationRecord, convert_operation_record)
//! ```

use crate::io::csv_format::{convert_operation_record, OperationRecord};
use crate::io::sync_reader::with_line;
use crate::types::Operation;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
    skipped: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
            skipped: 0,
        }
    }

    /// Read a batch of operations
    ///
    /// Reads up to `batch_size` valid operations, in file order. Rows that
    /// fail to parse or convert are logged and skipped.
    ///
    /// # Returns
    ///
    /// An empty vector once the end of the input is reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<Operation> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<OperationRecord>();

        while batch.len() < batch_size {
            let Some(row) = records.next().await else {
                break;
            };
            self.line_num += 1;
            let converted = row
                .map_err(|e| e.to_string())
                .and_then(|record| {
                    convert_operation_record(record)
                        .map_err(|e| with_line(e, self.line_num).to_string())
                });
            match converted {
                Ok(operation) => batch.push(operation),
                Err(error) => {
                    self.skipped += 1;
                    tracing::warn!(line = self.line_num, %error, "skipping invalid record");
                }
            }
        }

        batch
    }

    /// Rows skipped so far because they could not be parsed
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
