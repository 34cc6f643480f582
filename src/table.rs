use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::BoardError;
use crate::record::{CounterField, ProductRecord};

/// One worksheet row as it comes off the store: column name to raw value.
///
/// Values are arbitrary — the sheet is edited by hand as well as by the
/// dashboard, so cells may be missing, empty, or non-numeric.
pub type RawRow = HashMap<String, Value>;

/// Column holding the product key.
pub const NAME_COLUMN: &str = "product_name";

/// Columns written back to the worksheet, in order. Derived columns are
/// not among them: they are recomputed on every load.
pub const STORE_COLUMNS: [&str; 6] = [
    NAME_COLUMN,
    "assembled",
    "shipped",
    "threshold",
    "received",
    "completed",
];

/// In-memory table of product counters, one record per worksheet row,
/// order-preserving relative to the source.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct CounterTable {
    records: Vec<ProductRecord>,
}

impl CounterTable {
    /// Build a table from raw worksheet rows.
    ///
    /// Every counter cell is coerced to a non-negative integer; anything
    /// that fails numeric parsing (empty, text, null) loads as 0, and a
    /// counter column absent from the sheet entirely is synthesized as 0
    /// for every record. Early-format sheets lack the `completed` column,
    /// so this is the normal path, not an edge case. Derived columns are
    /// computed here for every record regardless of what the sheet says.
    pub fn from_rows(rows: &[RawRow]) -> Self {
        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            let name = row.get(NAME_COLUMN).map(cell_to_text).unwrap_or_default();
            let mut record = ProductRecord::new(name);
            for field in CounterField::ALL {
                let value = row.get(field.as_str()).map(coerce_count).unwrap_or(0);
                record.set(field, value);
            }
            records.push(record);
        }

        CounterTable { records }
    }

    /// Apply `new = max(0, current + delta)` to one field of one record.
    ///
    /// Recomputes that record's derived columns when the field is
    /// `threshold` or `completed`; no other record is touched. Returns the
    /// field's new value.
    pub fn adjust(
        &mut self,
        index: usize,
        field: CounterField,
        delta: i64,
    ) -> Result<u32, BoardError> {
        let record = self
            .records
            .get_mut(index)
            .ok_or(BoardError::NoSuchRecord(index))?;

        let new_value = (record.get(field) as i64 + delta).clamp(0, u32::MAX as i64);
        record.set(field, new_value as u32);
        Ok(record.get(field))
    }

    /// Recompute derived columns for every record. Used after restoring a
    /// snapshot, where the file contents are not trusted as derived truth.
    pub fn recompute_derived(&mut self) {
        for record in &mut self.records {
            record.recompute_derived();
        }
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the table back into raw rows for a full-table write.
    pub fn to_rows(&self) -> Vec<RawRow> {
        self.records
            .iter()
            .map(|record| {
                let mut row = RawRow::new();
                row.insert(
                    NAME_COLUMN.to_string(),
                    Value::String(record.product_name.clone()),
                );
                for field in CounterField::ALL {
                    row.insert(field.as_str().to_string(), Value::from(record.get(field)));
                }
                row
            })
            .collect()
    }
}

/// Coerce a raw cell to a counter value. Floats truncate, numeric strings
/// parse, negatives clamp to 0, everything else is 0.
fn coerce_count(value: &Value) -> u32 {
    let number = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    };
    number.clamp(0, u32::MAX as i64) as u32
}

fn cell_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(entries: &[(&str, Value)]) -> RawRow {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn widget_rows() -> Vec<RawRow> {
        vec![row(&[
            (NAME_COLUMN, json!("Widget")),
            ("assembled", json!(2)),
            ("shipped", json!(1)),
            ("threshold", json!(10)),
            ("received", json!(5)),
            ("completed", json!(4)),
        ])]
    }

    #[test]
    fn load_preserves_order_and_computes_derived() {
        let rows = vec![
            row(&[(NAME_COLUMN, json!("B")), ("threshold", json!(3))]),
            row(&[(NAME_COLUMN, json!("A")), ("completed", json!(7))]),
        ];
        let table = CounterTable::from_rows(&rows);

        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].product_name, "B");
        assert_eq!(table.records()[0].shortfall, 3);
        assert_eq!(table.records()[0].surplus, 0);
        assert_eq!(table.records()[1].product_name, "A");
        assert_eq!(table.records()[1].shortfall, 0);
        assert_eq!(table.records()[1].surplus, 7);
    }

    #[test]
    fn missing_completed_column_defaults_to_zero() {
        let rows = vec![row(&[
            (NAME_COLUMN, json!("Widget")),
            ("threshold", json!(8)),
        ])];
        let table = CounterTable::from_rows(&rows);

        let record = &table.records()[0];
        assert_eq!(record.completed, 0);
        assert_eq!(record.shortfall, 8);
        assert_eq!(record.surplus, 0);
    }

    #[test]
    fn malformed_cells_load_as_zero() {
        let rows = vec![row(&[
            (NAME_COLUMN, json!("Widget")),
            ("threshold", json!("abc")),
            ("assembled", json!("")),
            ("shipped", json!(null)),
            ("received", json!(" 12 ")),
            ("completed", json!(3.9)),
        ])];
        let table = CounterTable::from_rows(&rows);

        let record = &table.records()[0];
        assert_eq!(record.threshold, 0);
        assert_eq!(record.assembled, 0);
        assert_eq!(record.shipped, 0);
        assert_eq!(record.received, 12);
        assert_eq!(record.completed, 3);
    }

    #[test]
    fn negative_source_values_clamp_to_zero() {
        let rows = vec![row(&[
            (NAME_COLUMN, json!("Widget")),
            ("assembled", json!(-4)),
            ("completed", json!("-1")),
        ])];
        let table = CounterTable::from_rows(&rows);

        assert_eq!(table.records()[0].assembled, 0);
        assert_eq!(table.records()[0].completed, 0);
    }

    #[test]
    fn widget_scenario_walkthrough() {
        let mut table = CounterTable::from_rows(&widget_rows());
        assert_eq!(table.records()[0].shortfall, 6);
        assert_eq!(table.records()[0].surplus, 0);

        for _ in 0..3 {
            table.adjust(0, CounterField::Completed, 1).unwrap();
        }
        assert_eq!(table.records()[0].completed, 7);
        assert_eq!(table.records()[0].shortfall, 3);
        assert_eq!(table.records()[0].surplus, 0);

        for _ in 0..3 {
            table.adjust(0, CounterField::Completed, 1).unwrap();
        }
        assert_eq!(table.records()[0].completed, 10);
        assert_eq!(table.records()[0].shortfall, 0);
        assert_eq!(table.records()[0].surplus, 0);

        table.adjust(0, CounterField::Completed, 1).unwrap();
        assert_eq!(table.records()[0].completed, 11);
        assert_eq!(table.records()[0].shortfall, 0);
        assert_eq!(table.records()[0].surplus, 1);
    }

    #[test]
    fn decrement_clamps_at_zero() {
        let rows = vec![row(&[(NAME_COLUMN, json!("Widget"))])];
        let mut table = CounterTable::from_rows(&rows);

        let value = table.adjust(0, CounterField::Assembled, -1).unwrap();
        assert_eq!(value, 0);
        assert_eq!(table.records()[0].assembled, 0);
    }

    #[test]
    fn adjust_inverts_except_at_the_clamp_boundary() {
        let mut table = CounterTable::from_rows(&widget_rows());

        // assembled starts at 2: +1 then -1 restores it
        table.adjust(0, CounterField::Assembled, 1).unwrap();
        table.adjust(0, CounterField::Assembled, -1).unwrap();
        assert_eq!(table.records()[0].assembled, 2);

        // from 0, -1 clamps, so the following +1 overshoots the original
        table.adjust(0, CounterField::Shipped, -1).unwrap();
        assert_eq!(table.records()[0].shipped, 0);
        table.adjust(0, CounterField::Shipped, -1).unwrap();
        table.adjust(0, CounterField::Shipped, 1).unwrap();
        assert_eq!(table.records()[0].shipped, 1);
    }

    #[test]
    fn adjust_accepts_arbitrary_deltas() {
        let mut table = CounterTable::from_rows(&widget_rows());

        assert_eq!(table.adjust(0, CounterField::Received, 100).unwrap(), 105);
        assert_eq!(table.adjust(0, CounterField::Received, -1000).unwrap(), 0);
    }

    #[test]
    fn adjust_touches_exactly_one_record() {
        let mut rows = widget_rows();
        rows.push(row(&[
            (NAME_COLUMN, json!("Gadget")),
            ("assembled", json!(9)),
        ]));
        let mut table = CounterTable::from_rows(&rows);

        table.adjust(0, CounterField::Assembled, 1).unwrap();
        assert_eq!(table.records()[1].assembled, 9);
    }

    #[test]
    fn adjust_out_of_range_is_an_error() {
        let mut table = CounterTable::from_rows(&widget_rows());
        assert!(matches!(
            table.adjust(5, CounterField::Assembled, 1),
            Err(BoardError::NoSuchRecord(5))
        ));
    }

    #[test]
    fn to_rows_omits_derived_columns() {
        let table = CounterTable::from_rows(&widget_rows());
        let rows = table.to_rows();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(NAME_COLUMN), Some(&json!("Widget")));
        assert_eq!(rows[0].get("threshold"), Some(&json!(10)));
        assert!(!rows[0].contains_key("shortfall"));
        assert!(!rows[0].contains_key("surplus"));
    }

    #[test]
    fn invariants_hold_after_a_mutation_storm() {
        let mut table = CounterTable::from_rows(&widget_rows());
        let deltas = [3, -7, 1, 1, -2, 40, -100, 5];

        for (i, delta) in deltas.iter().enumerate() {
            let field = CounterField::ALL[i % CounterField::ALL.len()];
            table.adjust(0, field, *delta).unwrap();

            let record = &table.records()[0];
            assert_eq!(record.shortfall.min(record.surplus), 0);
            assert_eq!(
                record.shortfall,
                record.threshold.saturating_sub(record.completed)
            );
            assert_eq!(
                record.surplus,
                record.completed.saturating_sub(record.threshold)
            );
        }
    }
}
