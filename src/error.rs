use std::io;
use thiserror::Error;

/// Everything that can go wrong during an interaction cycle.
///
/// Two failure modes from the worksheet never appear here: a cell that
/// fails numeric parsing loads as 0, and a selection left pointing at a
/// non-adjustable field clears itself. Both are recovered silently.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The worksheet could not be read. Terminal for the current cycle:
    /// the caller surfaces the error and renders no partial table.
    #[error("worksheet unreachable: {0}")]
    StoreUnreachable(#[source] io::Error),

    /// The worksheet rejected the write-back twice in a row. The in-memory
    /// table keeps the mutation; the sheet may be stale until the next
    /// successful write.
    #[error("worksheet write failed after retry: {0}")]
    WriteFailed(#[source] io::Error),

    /// A snapshot file could not be read or written.
    #[error("snapshot failed: {0}")]
    Snapshot(#[source] io::Error),

    #[error("no record at index {0}")]
    NoSuchRecord(usize),

    /// Derived columns are display-only and `threshold` has no control.
    #[error("column {0:?} cannot be adjusted")]
    NotAdjustable(String),
}

impl BoardError {
    /// True when the in-memory table still carries an edit the worksheet
    /// never accepted, so the caller should warn rather than reload.
    pub fn leaves_local_edit(&self) -> bool {
        matches!(self, BoardError::WriteFailed(_))
    }
}
