use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const DEPARTMENTS: [&str; 5] = ["Engineering", "Finance", "HR", "Marketing", "Sales"];
const YEARS: [i64; 3] = [2021, 2022, 2023];
const EMPLOYEE_ROWS: usize = 120;
const SATISFACTION_ROWS: usize = 90;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform value in `lo..hi`, rounded to one decimal like survey exports.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        ((lo + (hi - lo) * self.next_f64()) * 10.0).round() / 10.0
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Mostly `Some`, with a one-in-`n` chance of a blank cell.
    fn sometimes_blank<T>(&mut self, n: u64, value: T) -> Option<T> {
        (self.next_u64() % n != 0).then_some(value)
    }
}

/// Column builder: name plus Arrow array.
struct Columns {
    fields: Vec<Field>,
    arrays: Vec<ArrayRef>,
}

impl Columns {
    fn new() -> Self {
        Columns {
            fields: Vec::new(),
            arrays: Vec::new(),
        }
    }

    fn text(mut self, name: &str, values: Vec<Option<&str>>) -> Self {
        self.fields.push(Field::new(name, DataType::Utf8, true));
        self.arrays.push(Arc::new(StringArray::from(values)));
        self
    }

    fn int(mut self, name: &str, values: Vec<Option<i64>>) -> Self {
        self.fields.push(Field::new(name, DataType::Int64, true));
        self.arrays.push(Arc::new(Int64Array::from(values)));
        self
    }

    fn float(mut self, name: &str, values: Vec<f64>) -> Self {
        self.fields.push(Field::new(name, DataType::Float64, false));
        self.arrays.push(Arc::new(Float64Array::from(values)));
        self
    }

    fn batch(self) -> Result<RecordBatch> {
        let schema = Arc::new(Schema::new(self.fields));
        RecordBatch::try_new(schema, self.arrays).context("building record batch")
    }
}

fn employee_sheet(rng: &mut SimpleRng) -> Result<RecordBatch> {
    let mut dept = Vec::with_capacity(EMPLOYEE_ROWS);
    let mut year = Vec::with_capacity(EMPLOYEE_ROWS);
    let (mut score, mut task, mut completion, mut burnout) =
        (Vec::new(), Vec::new(), Vec::new(), Vec::new());

    for _ in 0..EMPLOYEE_ROWS {
        let d = rng.pick(&DEPARTMENTS);
        let y = rng.pick(&YEARS);
        dept.push(rng.sometimes_blank(40, d));
        year.push(rng.sometimes_blank(40, y));

        let s = rng.uniform(40.0, 100.0);
        score.push(s);
        task.push(rng.uniform(2.0, 9.0));
        completion.push(rng.uniform(5.0, 40.0));
        // Burnout loosely tracks dissatisfaction.
        burnout.push(((100.0 - s) / 60.0 * 0.8 + rng.uniform(0.0, 0.2)).min(1.0));
    }

    Columns::new()
        .text("Department", dept)
        .int("Year", year)
        .float("Satisfaction_Score", score)
        .float("Task_Duration", task)
        .float("Project_Completion_Times", completion)
        .float("Burnout_Indicator", burnout)
        .batch()
}

fn satisfaction_sheet(rng: &mut SimpleRng) -> Result<RecordBatch> {
    let mut dept = Vec::with_capacity(SATISFACTION_ROWS);
    let mut year = Vec::with_capacity(SATISFACTION_ROWS);
    let (mut email, mut internet, mut workspace, mut tools, mut downtime) =
        (Vec::new(), Vec::new(), Vec::new(), Vec::new(), Vec::new());

    for i in 0..SATISFACTION_ROWS {
        // Every department appears at least once so the colour legend is complete.
        let d = if i < DEPARTMENTS.len() { DEPARTMENTS[i] } else { rng.pick(&DEPARTMENTS) };
        dept.push(Some(d));
        year.push(Some(rng.pick(&YEARS)));
        email.push(rng.uniform(60.0, 100.0));
        internet.push(rng.uniform(1.0, 5.0));
        workspace.push(rng.uniform(1.0, 5.0));
        tools.push(rng.uniform(3.0, 10.0));
        downtime.push(rng.uniform(0.0, 2.5));
    }

    Columns::new()
        .text("Department", dept)
        .int("Year", year)
        .float("Email_Response_Rate", email)
        .float("Internet_Stability", internet)
        .float("Workspace_Setup", workspace)
        .float("Work_Tool_Hours", tools)
        .float("Downtime", downtime)
        .batch()
}

fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).context("creating writer")?;
    writer.write(batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn write_csv(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = arrow::csv::Writer::new(file);
    writer.write(batch).context("writing CSV")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut out_dir = PathBuf::from("sample_workbook");
    let mut csv = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--csv" => csv = true,
            flag if flag.starts_with('-') => bail!("usage: generate_sample [OUT_DIR] [--csv]"),
            dir => out_dir = PathBuf::from(dir),
        }
    }
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let sheets = [
        ("Employee_Productivity", employee_sheet(&mut rng)?),
        ("Productivity_Satisfaction", satisfaction_sheet(&mut rng)?),
    ];

    for (name, batch) in &sheets {
        let ext = if csv { "csv" } else { "parquet" };
        let path = out_dir.join(format!("{name}.{ext}"));
        if csv {
            write_csv(&path, batch)?;
        } else {
            write_parquet(&path, batch)?;
        }
        println!("Wrote {} rows to {}", batch.num_rows(), path.display());
    }

    Ok(())
}
