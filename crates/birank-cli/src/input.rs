//! Edge file loading: delimited text into an [`EdgeTable`].
//!
//! Tab-separated by default; `.csv` files switch to commas. A `--header`
//! first line names the columns, otherwise the first three columns are
//! called `sender`, `receiver`, and `weight` so the positional defaults
//! of the graph builder apply unchanged.

use std::fs;
use std::path::Path;

use anyhow::Context;
use birank_core::table::{EdgeTable, Value};

/// Read and parse a delimited edge file.
pub fn read_edge_table(
    path: &Path,
    delimiter: Option<char>,
    header: bool,
) -> anyhow::Result<EdgeTable> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading edge file {}", path.display()))?;
    let delim = delimiter.unwrap_or_else(|| infer_delimiter(path));
    parse_edge_table(&raw, delim, header).with_context(|| format!("parsing {}", path.display()))
}

/// The column weights default to when the caller names none: a column
/// literally called `weight`, which headerless three-column files get.
pub fn detected_weight_column(table: &EdgeTable) -> Option<String> {
    table
        .names()
        .iter()
        .any(|name| *name == "weight")
        .then(|| "weight".to_string())
}

fn infer_delimiter(path: &Path) -> char {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => ',',
        _ => '\t',
    }
}

fn parse_edge_table(raw: &str, delim: char, header: bool) -> anyhow::Result<EdgeTable> {
    let mut lines = raw.lines().filter(|line| !line.trim().is_empty()).peekable();

    let names: Vec<String> = if header {
        match lines.next() {
            Some(line) => line.split(delim).map(|s| s.trim().to_string()).collect(),
            None => return Ok(EdgeTable::default()),
        }
    } else {
        let width = lines.peek().map_or(0, |line| line.split(delim).count());
        default_names(width)
    };

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    for (row, line) in lines.enumerate() {
        let cells: Vec<&str> = line.split(delim).collect();
        if cells.len() != names.len() {
            anyhow::bail!(
                "row {} has {} fields, expected {}",
                row + 1,
                cells.len(),
                names.len()
            );
        }
        for (col, cell) in cells.iter().enumerate() {
            columns[col].push(parse_cell(cell));
        }
    }

    Ok(EdgeTable::from_columns(names.into_iter().zip(columns))?)
}

fn default_names(width: usize) -> Vec<String> {
    (0..width)
        .map(|i| match i {
            0 => "sender".to_string(),
            1 => "receiver".to_string(),
            2 => "weight".to_string(),
            _ => format!("col{}", i + 1),
        })
        .collect()
}

/// Narrowest type that holds the cell: integer, then float, then text.
/// Blank cells are null, which the builder reads as weight 1.
fn parse_cell(cell: &str) -> Value {
    let cell = cell.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = cell.parse::<i64>() {
        return Value::Int(int);
    }
    if let Ok(float) = cell.parse::<f64>() {
        return Value::Float(float);
    }
    Value::Text(cell.to_string())
}
