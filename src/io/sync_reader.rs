//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over operations from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! ```no_run
//! use rust_bank_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("operations.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(operation) => println!("Processing {}", operation.name()),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record parsing errors are yielded as Err variants in the iterator,
//!   carrying the line number of the offending row

use crate::io::csv_format::{convert_operation_record, OperationRecord};
use crate::types::{BankError, Operation};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one row at a time; memory use does not grow with the file.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader trims whitespace from all fields and allows rows with
    /// fewer columns than the header.
    ///
    /// # Errors
    ///
    /// `BankError::IoError` if the file could not be opened.
    pub fn new(path: &Path) -> Result<Self, BankError> {
        let file = File::open(path).map_err(|e| BankError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<Operation, BankError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<OperationRecord>();
        let row = deserializer.next()?;
        self.line_num += 1;
        let line = self.line_num;

        Some(match row {
            Ok(record) => convert_operation_record(record).map_err(|e| with_line(e, line)),
            Err(e) => Err(with_line(BankError::from(e), line)),
        })
    }
}

/// Attach the input line to a parse error that has none
pub(crate) fn with_line(error: BankError, line: u64) -> BankError {
    match error {
        BankError::ParseError { line: None, message } => BankError::ParseError {
            line: Some(line),
            message,
        },
        other => other,
    }
}
