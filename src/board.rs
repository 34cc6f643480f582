use chrono::{DateTime, Local};
use log::{debug, warn};
use std::path::Path;

use crate::error::BoardError;
use crate::record::CounterField;
use crate::selection::Selection;
use crate::snapshot;
use crate::store::Worksheet;
use crate::table::CounterTable;

/// What a shared-control bump did.
#[derive(Debug, PartialEq, Eq)]
pub enum BumpOutcome {
    /// The selected field now holds `value`.
    Applied { value: u32 },
    /// Nothing is selected; the bump was a no-op and the user is told so.
    NothingSelected,
}

/// One user session over the worksheet: the current table, the selection,
/// and the store handle.
///
/// Every mutating call runs the full synchronous cycle the dashboard is
/// built around: mutate in memory, write the whole table back, reload it
/// fresh. There is no batching — one click is one cycle.
pub struct Board {
    store: Box<dyn Worksheet>,
    table: CounterTable,
    selection: Selection,
    refreshed_at: Option<DateTime<Local>>,
}

impl Board {
    /// A board starts empty; call [`Board::reload`] to run the first load
    /// cycle against the worksheet.
    pub fn new(store: Box<dyn Worksheet>) -> Self {
        Board {
            store,
            table: CounterTable::default(),
            selection: Selection::default(),
            refreshed_at: None,
        }
    }

    pub fn table(&self) -> &CounterTable {
        &self.table
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.refreshed_at
    }

    /// Fetch current rows from the worksheet and rebuild the table.
    ///
    /// An unreachable store is terminal for the cycle: the old table is
    /// left in place but the caller must surface the error instead of
    /// rendering. A selection the fresh table cannot satisfy is dropped.
    pub fn reload(&mut self) -> Result<(), BoardError> {
        let rows = self
            .store
            .read_rows()
            .map_err(BoardError::StoreUnreachable)?;

        self.table = CounterTable::from_rows(&rows);
        self.selection.revalidate(&self.table);
        self.refreshed_at = Some(Local::now());
        debug!("reloaded {} records from worksheet", self.table.len());
        Ok(())
    }

    /// Adjust one field of one record, then persist and reload.
    ///
    /// On a write-back failure the in-memory mutation is kept and the
    /// reload is skipped — reloading would clobber the edit with stale
    /// sheet contents. The caller relays the discrepancy to the user.
    pub fn adjust(
        &mut self,
        index: usize,
        field: CounterField,
        delta: i64,
    ) -> Result<u32, BoardError> {
        let value = self.table.adjust(index, field, delta)?;
        self.persist()?;
        self.reload()?;
        Ok(value)
    }

    /// Point the shared controls at `(index, field)`.
    ///
    /// Returns `false` when the field is not selectable (threshold); the
    /// selection is cleared in that case rather than erroring.
    pub fn select(&mut self, index: usize, field: CounterField) -> Result<bool, BoardError> {
        if index >= self.table.len() {
            return Err(BoardError::NoSuchRecord(index));
        }
        Ok(self.selection.select(index, field))
    }

    /// Apply `delta` to whatever is currently selected.
    ///
    /// With nothing selected this is a no-op that reports so; otherwise it
    /// runs a full adjust cycle and the selection stays on the same
    /// logical target, now showing the updated value.
    pub fn bump_selected(&mut self, delta: i64) -> Result<BumpOutcome, BoardError> {
        match self.selection.target() {
            None => Ok(BumpOutcome::NothingSelected),
            Some((index, field)) => {
                let value = self.adjust(index, field, delta)?;
                Ok(BumpOutcome::Applied { value })
            }
        }
    }

    /// Write the table to a snapshot file.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<(), BoardError> {
        snapshot::save_snapshot(&self.table, path).map_err(BoardError::Snapshot)
    }

    /// Replace the table with a snapshot's contents, persist that to the
    /// worksheet, and reload.
    pub fn restore_snapshot(&mut self, path: impl AsRef<Path>) -> Result<(), BoardError> {
        self.table = snapshot::load_snapshot(path).map_err(BoardError::Snapshot)?;
        self.selection.revalidate(&self.table);
        self.persist()?;
        self.reload()
    }

    // Full-table write-back, retried once. A second failure surfaces as
    // WriteFailed with the mutation still in memory.
    fn persist(&mut self) -> Result<(), BoardError> {
        let rows = self.table.to_rows();

        if let Err(first) = self.store.write_rows(&rows) {
            warn!("worksheet write failed, retrying once: {first}");
            self.store
                .write_rows(&rows)
                .map_err(BoardError::WriteFailed)?;
        }

        Ok(())
    }
}
