use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Cell, DatasetStore, EmployeeRecord, SatisfactionRecord};

pub const EMPLOYEE_SHEET: &str = "Employee_Productivity";
pub const SATISFACTION_SHEET: &str = "Productivity_Satisfaction";

/// Extensions handed to the spreadsheet reader.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// File names tried, in order, for each sheet of a directory workbook.
const SHEET_FILE_EXTENSIONS: &[&str] = &["parquet", "pq", "csv", "json"];

// ---------------------------------------------------------------------------
// Schema errors
// ---------------------------------------------------------------------------

/// Structural problems with a workbook that was otherwise readable.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("workbook has no sheet named '{sheet}'")]
    MissingSheet { sheet: String },

    #[error("sheet '{sheet}' has no '{column}' column")]
    MissingColumn { sheet: String, column: String },

    #[error("sheet '{sheet}', row {row}, column '{column}': expected {expected}, found '{found}'")]
    InvalidCell {
        sheet: String,
        row: usize,
        column: String,
        expected: &'static str,
        found: String,
    },
}

// ---------------------------------------------------------------------------
// RawSheet – untyped rows straight from a reader
// ---------------------------------------------------------------------------

/// A sheet as read from disk: header names and rows of cells.
#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    fn column(&self, column: &str) -> Result<usize, SchemaError> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| SchemaError::MissingColumn {
                sheet: self.name.clone(),
                column: column.to_string(),
            })
    }

    fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows[row].get(col).unwrap_or(&Cell::Null)
    }

    fn invalid(&self, row: usize, col: usize, expected: &'static str) -> SchemaError {
        SchemaError::InvalidCell {
            sheet: self.name.clone(),
            row: row + 1,
            column: self.headers[col].clone(),
            expected,
            found: self.cell(row, col).to_string(),
        }
    }

    fn text(&self, row: usize, col: usize) -> Result<Option<String>, SchemaError> {
        match self.cell(row, col) {
            Cell::Null => Ok(None),
            Cell::String(s) => Ok(Some(s.clone())),
            Cell::Integer(i) => Ok(Some(i.to_string())),
            Cell::Float(f) => Ok(Some(f.to_string())),
            Cell::Bool(b) => Ok(Some(b.to_string())),
        }
    }

    fn integer(&self, row: usize, col: usize) -> Result<Option<i64>, SchemaError> {
        match self.cell(row, col) {
            Cell::Null => Ok(None),
            Cell::Integer(i) => Ok(Some(*i)),
            // Spreadsheets store every number as a float.
            Cell::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(Some(*f as i64)),
            Cell::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| self.invalid(row, col, "an integer")),
            _ => Err(self.invalid(row, col, "an integer")),
        }
    }

    fn float(&self, row: usize, col: usize) -> Result<Option<f64>, SchemaError> {
        match self.cell(row, col) {
            Cell::Null => Ok(None),
            Cell::Integer(i) => Ok(Some(*i as f64)),
            Cell::Float(f) if f.is_nan() => Ok(None),
            Cell::Float(f) => Ok(Some(*f)),
            Cell::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| self.invalid(row, col, "a number")),
            Cell::Bool(_) => Err(self.invalid(row, col, "a number")),
        }
    }

    /// Resolve `N` required columns to their indices, logging any extras.
    fn require<const N: usize>(&self, columns: [&str; N]) -> Result<[usize; N], SchemaError> {
        let mut indices = [0; N];
        for (slot, column) in indices.iter_mut().zip(columns) {
            *slot = self.column(column)?;
        }
        let ignored: Vec<&str> = self
            .headers
            .iter()
            .map(String::as_str)
            .filter(|h| !columns.contains(h))
            .collect();
        if !ignored.is_empty() {
            log::debug!("Sheet '{}': ignoring columns {ignored:?}", self.name);
        }
        Ok(indices)
    }
}

// ---------------------------------------------------------------------------
// Typed conversion
// ---------------------------------------------------------------------------

pub fn employees_from(sheet: &RawSheet) -> Result<Vec<EmployeeRecord>, SchemaError> {
    let [dept, year, score, task, completion, burnout] = sheet.require([
        "Department",
        "Year",
        "Satisfaction_Score",
        "Task_Duration",
        "Project_Completion_Times",
        "Burnout_Indicator",
    ])?;

    (0..sheet.rows.len())
        .map(|row| -> Result<EmployeeRecord, SchemaError> {
            Ok(EmployeeRecord {
                department: sheet.text(row, dept)?,
                year: sheet.integer(row, year)?,
                satisfaction_score: sheet.float(row, score)?,
                task_duration: sheet.float(row, task)?,
                project_completion_times: sheet.float(row, completion)?,
                burnout_indicator: sheet.float(row, burnout)?,
            })
        })
        .collect()
}

pub fn satisfaction_from(sheet: &RawSheet) -> Result<Vec<SatisfactionRecord>, SchemaError> {
    let [dept, year, email, internet, workspace, tools, downtime] = sheet.require([
        "Department",
        "Year",
        "Email_Response_Rate",
        "Internet_Stability",
        "Workspace_Setup",
        "Work_Tool_Hours",
        "Downtime",
    ])?;

    (0..sheet.rows.len())
        .map(|row| -> Result<SatisfactionRecord, SchemaError> {
            Ok(SatisfactionRecord {
                department: sheet.text(row, dept)?,
                year: sheet.integer(row, year)?,
                email_response_rate: sheet.float(row, email)?,
                internet_stability: sheet.float(row, internet)?,
                workspace_setup: sheet.float(row, workspace)?,
                work_tool_hours: sheet.float(row, tools)?,
                downtime: sheet.float(row, downtime)?,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load both sheets of a workbook. Dispatch by path.
///
/// Supported layouts:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – spreadsheet with named sheets
/// * `.json` – `{ "<sheet>": [ { "Department": "HR", ... }, ... ], ... }`
/// * a directory holding one `<sheet>.parquet|.pq|.csv|.json` file per sheet
pub fn load_workbook(path: &Path) -> Result<DatasetStore> {
    let (employee_sheet, satisfaction_sheet) = if path.is_dir() {
        (
            load_sheet_file(path, EMPLOYEE_SHEET)?,
            load_sheet_file(path, SATISFACTION_SHEET)?,
        )
    } else {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            e if SPREADSHEET_EXTENSIONS.contains(&e) => load_spreadsheet(path)?,
            "json" => load_json_workbook(path)?,
            other => bail!("Unsupported workbook: .{other} (expected a spreadsheet, .json or a directory)"),
        }
    };

    let employees = employees_from(&employee_sheet)?;
    let satisfaction = satisfaction_from(&satisfaction_sheet)?;
    log::info!(
        "Loaded {} employee rows and {} satisfaction rows from {}",
        employees.len(),
        satisfaction.len(),
        path.display()
    );

    Ok(DatasetStore::new(employees, satisfaction))
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_spreadsheet(path: &Path) -> Result<(RawSheet, RawSheet)> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening workbook {}", path.display()))?;
    let names = workbook.sheet_names();
    log::debug!("Workbook sheets: {names:?}");

    let mut read = |sheet: &str| -> Result<RawSheet> {
        if !names.iter().any(|n| n == sheet) {
            return Err(SchemaError::MissingSheet {
                sheet: sheet.to_string(),
            }
            .into());
        }
        let range = workbook
            .worksheet_range(sheet)
            .with_context(|| format!("reading sheet '{sheet}'"))?;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|h| h.iter().map(|c| c.to_string().trim().to_string()).collect())
            .unwrap_or_default();
        let rows = rows
            .map(|r| r.iter().map(spreadsheet_cell).collect())
            .collect();

        Ok(RawSheet {
            name: sheet.to_string(),
            headers,
            rows,
        })
    };

    Ok((read(EMPLOYEE_SHEET)?, read(SATISFACTION_SHEET)?))
}

fn spreadsheet_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Integer(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::String(s) if s.trim().is_empty() => Cell::Null,
        Data::String(s) => Cell::String(s.trim().to_string()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::String(s.clone()),
        Data::Error(e) => {
            log::warn!("Spreadsheet error cell {e:?} read as blank");
            Cell::Null
        }
        Data::Empty => Cell::Null,
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (one records-oriented array per sheet):
///
/// ```json
/// {
///   "Employee_Productivity": [ { "Department": "HR", "Year": 2022, ... } ],
///   "Productivity_Satisfaction": [ ... ]
/// }
/// ```
fn load_json_workbook(path: &Path) -> Result<(RawSheet, RawSheet)> {
    let text = std::fs::read_to_string(path).context("reading JSON workbook")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    let sheets = root
        .as_object()
        .context("Expected top-level JSON object keyed by sheet name")?;

    let read = |sheet: &str| -> Result<RawSheet> {
        let records = sheets.get(sheet).ok_or_else(|| SchemaError::MissingSheet {
            sheet: sheet.to_string(),
        })?;
        json_records_to_sheet(sheet, records)
    };

    Ok((read(EMPLOYEE_SHEET)?, read(SATISFACTION_SHEET)?))
}

fn json_records_to_sheet(sheet: &str, records: &JsonValue) -> Result<RawSheet> {
    let records = records
        .as_array()
        .with_context(|| format!("Sheet '{sheet}' is not a JSON array"))?;

    let mut headers: Vec<String> = Vec::new();
    let mut maps: Vec<BTreeMap<&str, Cell>> = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Sheet '{sheet}', row {i} is not a JSON object"))?;
        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
            cells.insert(key.as_str(), json_to_cell(val));
        }
        maps.push(cells);
    }

    let rows = maps
        .into_iter()
        .map(|mut cells| {
            headers
                .iter()
                .map(|h| cells.remove(h.as_str()).unwrap_or(Cell::Null))
                .collect()
        })
        .collect();

    Ok(RawSheet {
        name: sheet.to_string(),
        headers,
        rows,
    })
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) if s.trim().is_empty() => Cell::Null,
        JsonValue::String(s) => Cell::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Cell::Float(f)
            } else {
                Cell::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Null,
        other => Cell::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Directory workbook: one file per sheet
// ---------------------------------------------------------------------------

fn load_sheet_file(dir: &Path, sheet: &str) -> Result<RawSheet> {
    for ext in SHEET_FILE_EXTENSIONS {
        let path = dir.join(format!("{sheet}.{ext}"));
        if !path.is_file() {
            continue;
        }
        log::debug!("Reading sheet '{sheet}' from {}", path.display());
        let raw = match *ext {
            "parquet" | "pq" => load_parquet_sheet(&path, sheet),
            "csv" => load_csv_sheet(&path, sheet),
            _ => {
                let text = std::fs::read_to_string(&path).context("reading JSON sheet")?;
                let records: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
                json_records_to_sheet(sheet, &records)
            }
        };
        return raw.with_context(|| format!("loading {}", path.display()));
    }
    Err(SchemaError::MissingSheet {
        sheet: sheet.to_string(),
    }
    .into())
}

/// CSV layout: header row with column names, one record per line.
fn load_csv_sheet(path: &Path, sheet: &str) -> Result<RawSheet> {
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
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(RawSheet {
        name: sheet.to_string(),
        headers,
        rows,
    })
}

/// Load a Parquet file holding one sheet, as written by `df.to_parquet()`.
fn load_parquet_sheet(path: &Path, sheet: &str) -> Result<RawSheet> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .zip(&headers)
                .map(|(col, name)| {
                    arrow_cell(col, row).with_context(|| format!("row {row}, column '{name}'"))
                })
                .collect::<Result<Vec<Cell>>>()?;
            rows.push(cells);
        }
    }

    Ok(RawSheet {
        name: sheet.to_string(),
        headers,
        rows,
    })
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> Result<Cell> {
    if col.is_null(row) {
        return Ok(Cell::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => Cell::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Cell::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Cell::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Cell::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => Cell::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Cell::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Cell::Bool(col.as_boolean().value(row)),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(cell)
}
