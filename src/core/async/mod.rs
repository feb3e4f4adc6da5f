//! Asynchronous processing components
//!
//! The engine itself is synchronous and thread-safe; this module drives it
//! from tokio for the async strategy.
//!
//! - **BatchProcessor**: applies batches of operations read by the async reader
//! - **interest_sweep**: concurrent variant of the monthly interest sweep

pub mod batch_processor;
pub mod interest_sweep;

pub use batch_processor::{BatchProcessor, ProcessingResult};
