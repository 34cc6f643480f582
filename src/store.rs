use serde_json::Value;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::table::{CounterTable, RawRow, STORE_COLUMNS};

/// The external tabular store behind the dashboard.
///
/// Two operations, both whole-table: `read_rows` always fetches current
/// state (no caching between interaction cycles), `write_rows` overwrites
/// every row (no upsert or delta semantics). Any number of sessions may
/// share the sheet with no locking; a stale full-table write silently wins.
pub trait Worksheet: Send {
    fn read_rows(&self) -> io::Result<Vec<RawRow>>;
    fn write_rows(&self, rows: &[RawRow]) -> io::Result<()>;
}

/// Worksheet stored as a CSV file with a header row.
pub struct CsvWorksheet {
    path: PathBuf,
}

impl CsvWorksheet {
    pub fn new(path: impl AsRef<Path>) -> Self {
        CsvWorksheet {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Worksheet for CsvWorksheet {
    /// Read the whole sheet.
    ///
    /// The first line names the columns; every following line becomes one
    /// raw row keyed by those names. Cells stay strings here — coercion to
    /// counters happens when the table is built, not in the store.
    ///
    /// # Returns
    /// * `io::Result<Vec<RawRow>>` - All rows in sheet order, or the I/O
    ///   error that made the sheet unreachable
    fn read_rows(&self) -> io::Result<Vec<RawRow>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;

        let mut lines = lines.into_iter().filter(|l| !l.trim().is_empty());
        let headers = match lines.next() {
            Some(header_line) => parse_csv_row(&header_line),
            None => return Ok(Vec::new()),
        };

        let mut rows = Vec::new();
        for line in lines {
            let fields = parse_csv_row(&line);
            let mut row = RawRow::new();
            for (header, field) in headers.iter().zip(fields) {
                row.insert(header.clone(), Value::String(field));
            }
            rows.push(row);
        }

        Ok(rows)
    }

    /// Overwrite the whole sheet with `rows`.
    ///
    /// Only the store columns are written, in their fixed order; derived
    /// columns never reach the sheet. A column missing from a row is
    /// written as an empty cell.
    fn write_rows(&self, rows: &[RawRow]) -> io::Result<()> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "{}", STORE_COLUMNS.join(","))?;
        for row in rows {
            let line: Vec<String> = STORE_COLUMNS
                .iter()
                .map(|column| escape_csv_field(&cell_to_string(row.get(*column))))
                .collect();
            writeln!(writer, "{}", line.join(","))?;
        }

        writer.flush()
    }
}

/// Render the current table as downloadable CSV.
///
/// Unlike the worksheet write-back this is for people, so the derived
/// columns are included after the counters.
///
/// # Arguments
/// * `table` - The table to render
///
/// # Returns
/// * `String` - CSV text, one header row plus one row per product
pub fn to_csv(table: &CounterTable) -> String {
    let mut csv = String::from(
        "product_name,assembled,shipped,threshold,received,completed,shortfall,surplus\n",
    );

    for record in table.records() {
        csv.push_str(&escape_csv_field(&record.product_name));
        for value in [
            record.assembled,
            record.shipped,
            record.threshold,
            record.received,
            record.completed,
            record.shortfall,
            record.surplus,
        ] {
            csv.push(',');
            csv.push_str(&value.to_string());
        }
        csv.push('\n');
    }

    csv
}

fn cell_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

// Quote a field when it contains a comma, quote, or newline; double any
// embedded quotes.
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// Split one CSV line into fields, honoring quoted fields and doubled
// quotes inside them.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if let Some(&next) = chars.peek() {
                    if next == '"' && in_quotes {
                        current_field.push('"');
                        chars.next();
                    } else {
                        in_quotes = !in_quotes;
                    }
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                result.push(current_field);
                current_field = String::new();
            }
            _ => {
                current_field.push(c);
            }
        }
    }

    result.push(current_field);
    result
}
