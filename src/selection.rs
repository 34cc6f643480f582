use crate::record::CounterField;
use crate::table::CounterTable;

/// Target of the shared +/- controls: at most one (record, field) pair per
/// session. Clicking a field simply overwrites the previous target; there
/// is no multi-select and no explicit deselect control.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Selection {
    #[default]
    Unselected,
    Selected { index: usize, field: CounterField },
}

impl Selection {
    /// Point the shared controls at `(index, field)`.
    ///
    /// `threshold` is never a valid target: attempting to select it clears
    /// the selection instead, and the caller gets `false` back.
    pub fn select(&mut self, index: usize, field: CounterField) -> bool {
        if !field.is_selectable() {
            *self = Selection::Unselected;
            return false;
        }
        *self = Selection::Selected { index, field };
        true
    }

    /// Drop a selection the current table can no longer satisfy — the
    /// index fell off the end after a reload, or the field is no longer
    /// adjustable. Recovery is silent; nothing is reported.
    pub fn revalidate(&mut self, table: &CounterTable) {
        if let Selection::Selected { index, field } = *self {
            if index >= table.len() || !field.is_selectable() {
                *self = Selection::Unselected;
            }
        }
    }

    pub fn target(&self) -> Option<(usize, CounterField)> {
        match *self {
            Selection::Unselected => None,
            Selection::Selected { index, field } => Some((index, field)),
        }
    }
}
