use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::filter::FilterRow;
use super::model::{Dataset, DatasetParts, Row};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the table and the filterable-column list, then validate them.
///
/// Without a column-list file the filterable columns come from the data
/// source itself (JSON payloads may carry them) or fall back to all headers.
pub fn load_dataset(data_path: &Path, columns_path: Option<&Path>) -> Result<Dataset> {
    let mut parts = load_file(data_path)?;

    match columns_path.map(load_column_list) {
        Some(Ok(columns)) if !columns.is_empty() => {
            parts.filterable_columns = Some(columns);
        }
        Some(Ok(_)) => {
            log::warn!("Column list file is empty. Using data headers as filterable columns.");
        }
        Some(Err(e)) => {
            log::warn!("Column list could not be read ({e:#}). Using data headers as filterable columns.");
        }
        None => {}
    }

    if parts.filterable_columns.is_none() {
        parts.filterable_columns = parts.headers.clone();
    }

    let dataset = Dataset::from_parts(parts)
        .with_context(|| format!("validating dataset from {}", data_path.display()))?;
    log::info!(
        "Loaded {} rows with columns {:?} ({} filterable)",
        dataset.len(),
        dataset.headers(),
        dataset.filterable_columns().len()
    );
    Ok(dataset)
}

/// Load raw dataset parts from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by data rows
/// * `.json`    – `{ "headers": [...], "rows": [[...]], "filterable_columns": [...] }`
/// * `.parquet` – any flat schema; every cell is rendered as text
pub fn load_file(path: &Path) -> Result<DatasetParts> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Read the filterable column names from the first row of a CSV file.
pub fn load_column_list(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening column list {}", path.display()))?;

    let Some(first) = reader.records().next() else {
        return Ok(Vec::new());
    };
    let record = first.context("reading column list header")?;
    Ok(record.iter().map(|h| h.trim().to_string()).collect())
}

/// Read a saved filter set: a JSON array of `{column, operator, value}`.
pub fn load_filter_preset(path: &Path) -> Result<Vec<FilterRow>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading filter preset {}", path.display()))?;
    let rows: Vec<FilterRow> = serde_json::from_str(&text).context("parsing filter preset")?;
    log::info!("Loaded {} preset filters from {}", rows.len(), path.display());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one record per row.
/// Records with a different field count are kept; the dataset pads or
/// ignores cells when reading them.
fn load_csv(path: &Path) -> Result<DatasetParts> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(str::to_string).collect::<Row>());
    }

    Ok(DatasetParts {
        headers: Some(headers),
        rows: Some(rows),
        filterable_columns: None,
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema:
///
/// ```json
/// {
///   "headers": ["Name", "Price", "Discount"],
///   "rows": [["A", 10, "5%"], ["B", null, "7%"]],
///   "filterable_columns": ["Price", "Discount"]
/// }
/// ```
///
/// Any key may be missing; validation reports which one.
fn load_json(path: &Path) -> Result<DatasetParts> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    let obj = root
        .as_object()
        .context("Expected top-level JSON object")?;

    let headers = obj
        .get("headers")
        .map(|v| json_string_list(v, "headers"))
        .transpose()?;
    let filterable_columns = obj
        .get("filterable_columns")
        .map(|v| json_string_list(v, "filterable_columns"))
        .transpose()?;

    let rows = match obj.get("rows") {
        Some(value) => {
            let records = value.as_array().context("'rows' is not an array")?;
            let mut rows = Vec::with_capacity(records.len());
            for (i, rec) in records.iter().enumerate() {
                let cells = rec
                    .as_array()
                    .with_context(|| format!("Row {i} is not a JSON array"))?;
                rows.push(cells.iter().map(json_to_cell).collect::<Row>());
            }
            Some(rows)
        }
        None => None,
    };

    Ok(DatasetParts {
        headers,
        rows,
        filterable_columns,
    })
}

fn json_string_list(val: &JsonValue, key: &str) -> Result<Vec<String>> {
    let arr = val
        .as_array()
        .with_context(|| format!("'{key}' is not an array"))?;
    Ok(arr.iter().map(json_to_cell).collect())
}

fn json_to_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file as text cells.
///
/// Column names become headers. Each value is rendered with Arrow's display
/// formatter, so numbers keep their natural textual form and nulls become
/// empty cells.
fn load_parquet(path: &Path) -> Result<DatasetParts> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let options = FormatOptions::default();
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let formatters = batch
            .columns()
            .iter()
            .map(|col| ArrayFormatter::try_new(col.as_ref(), &options))
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("preparing parquet column formatters")?;

        for row in 0..batch.num_rows() {
            rows.push(
                formatters
                    .iter()
                    .map(|f| f.value(row).to_string())
                    .collect::<Row>(),
            );
        }
    }

    Ok(DatasetParts {
        headers: Some(headers),
        rows: Some(rows),
        filterable_columns: None,
    })
}
