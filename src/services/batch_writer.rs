//! Chunked bulk writes with per-chunk failure bookkeeping.

use std::future::Future;

use tracing::{debug, warn};
use uuid::Uuid;

use super::record_store::StoreError;
use crate::types::BatchError;

/// Splits records into fixed-size chunks and writes them one at a time.
///
/// A failing chunk is recorded and skipped; later chunks are still written.
#[derive(Debug, Clone, Copy)]
pub struct BatchWriter {
    chunk_size: usize,
}

/// Aggregate result of a chunked write
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub attempted: usize,
    pub inserted: usize,
    pub errors: Vec<BatchError>,
}

impl BatchWriter {
    /// A chunk size of zero is treated as one
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }

    /// Consecutive chunks in input order, each with its 1-based ordinal
    pub fn chunks<'a, T>(&self, records: &'a [T]) -> impl Iterator<Item = (usize, &'a [T])> + 'a {
        records
            .chunks(self.chunk_size)
            .enumerate()
            .map(|(index, chunk)| (index + 1, chunk))
    }

    /// Write every chunk through `insert`, awaiting each before the next
    pub async fn write<'a, T, F, Fut>(&self, records: &'a [T], mut insert: F) -> BatchOutcome
    where
        F: FnMut(&'a [T]) -> Fut,
        Fut: Future<Output = Result<Vec<Uuid>, StoreError>>,
    {
        let mut outcome = BatchOutcome {
            attempted: records.len(),
            ..Default::default()
        };

        for (batch, chunk) in self.chunks(records) {
            match insert(chunk).await {
                Ok(ids) => {
                    debug!(batch, rows = chunk.len(), inserted = ids.len(), "Chunk written");
                    outcome.inserted += ids.len();
                }
                Err(e) => {
                    warn!(batch, rows = chunk.len(), error = %e, "Chunk insert failed, skipping");
                    outcome.errors.push(BatchError::records(batch, e.to_string()));
                }
            }
        }

        outcome
    }
}
