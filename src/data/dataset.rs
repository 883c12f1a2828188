//! Tabular salary data: loading, validation and the batch-prediction table.
//!
//! Files are UTF-8 CSV with a header row. Column lookup is by name, so column
//! order is free and extra columns are ignored (or, for prediction tables,
//! carried through to the output).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::data::features::{feature_matrix, FeatureVector};
use crate::error::{LrError, Result};
use crate::math::matrix::Matrix;

pub const EXPERIENCE: &str = "experience";
pub const EDUCATION: &str = "education";
pub const SALARY: &str = "salary";

/// Name of the column appended by batch prediction.
pub const PREDICTED_SALARY: &str = "predicted_salary";

/// One labelled training/evaluation sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryRecord {
    pub features: FeatureVector,
    pub salary: f64,
}

/// Labelled samples with all three required columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<SalaryRecord>,
}

impl Dataset {
    pub fn new(records: Vec<SalaryRecord>) -> Dataset {
        Dataset { records }
    }

    /// Loads a dataset from a CSV file on disk.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let file = File::open(path)?;
        Dataset::from_reader(file)
    }

    /// Parses CSV from any reader.
    ///
    /// Fails with `MissingColumns` before reading any data row if `experience`,
    /// `education` or `salary` is absent, and with `EmptyData` if the file has
    /// a header but no rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Dataset> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let idx = require_columns(&headers, &[EXPERIENCE, EDUCATION, SALARY])?;

        let mut records = Vec::new();
        for (i, row) in rdr.records().enumerate() {
            let row = row?;
            let row_num = i + 1;
            let features = parse_features(&row, idx[0], idx[1], row_num)?;
            let salary = parse_number(&row, idx[2], SALARY, row_num)?;
            records.push(SalaryRecord { features, salary });
        }

        if records.is_empty() {
            return Err(LrError::EmptyData("CSV contains no data rows".into()));
        }
        Ok(Dataset { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn feature_vectors(&self) -> Vec<FeatureVector> {
        self.records.iter().map(|r| r.features).collect()
    }

    /// Raw (unscaled) m × 2 feature matrix.
    pub fn features(&self) -> Matrix {
        feature_matrix(&self.feature_vectors())
    }

    pub fn targets(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.salary).collect()
    }
}

/// Rows submitted for batch prediction. Every original column is kept so the
/// output can echo the input with a `predicted_salary` column appended.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub features: Vec<FeatureVector>,
}

impl PredictionTable {
    /// Parses a CSV that carries at least `experience` and `education`.
    pub fn from_reader<R: Read>(reader: R) -> Result<PredictionTable> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header_record = rdr.headers()?.clone();
        let idx = require_columns(&header_record, &[EXPERIENCE, EDUCATION])?;
        let headers: Vec<String> = header_record.iter().map(str::to_owned).collect();

        let mut rows = Vec::new();
        let mut features = Vec::new();
        for (i, row) in rdr.records().enumerate() {
            let row = row?;
            features.push(parse_features(&row, idx[0], idx[1], i + 1)?);
            rows.push(row.iter().map(str::to_owned).collect());
        }

        if features.is_empty() {
            return Err(LrError::EmptyData("CSV contains no data rows".into()));
        }
        Ok(PredictionTable { headers, rows, features })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the table back to CSV with one extra `predicted_salary` column.
    ///
    /// # Panics
    /// Panics if `predictions.len() != self.len()`.
    pub fn to_csv_with_predictions(&self, predictions: &[f64]) -> Result<String> {
        assert_eq!(
            predictions.len(),
            self.rows.len(),
            "one prediction per row is required"
        );
        let mut wtr = csv::Writer::from_writer(Vec::new());

        let mut header = self.headers.clone();
        header.push(PREDICTED_SALARY.to_owned());
        wtr.write_record(&header)?;

        for (row, pred) in self.rows.iter().zip(predictions) {
            let mut out = row.clone();
            out.push(format!("{pred:.2}"));
            wtr.write_record(&out)?;
        }

        let bytes = wtr.into_inner().map_err(|e| LrError::Io(e.into_error()))?;
        String::from_utf8(bytes)
            .map_err(|e| LrError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Resolves each required column to its index, or lists every missing one.
fn require_columns(headers: &csv::StringRecord, required: &[&'static str]) -> Result<Vec<usize>> {
    let mut found = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for &name in required {
        match headers.iter().position(|h| h == name) {
            Some(i) => found.push(i),
            None => missing.push(name.to_owned()),
        }
    }
    if !missing.is_empty() {
        return Err(LrError::MissingColumns {
            expected: required.to_vec(),
            missing,
        });
    }
    Ok(found)
}

fn parse_number(row: &csv::StringRecord, idx: usize, column: &str, row_num: usize) -> Result<f64> {
    let cell = row.get(idx).unwrap_or("");
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LrError::InvalidRow {
            row: row_num,
            reason: format!("{column} value '{cell}' is not a finite number"),
        }),
    }
}

fn parse_features(
    row: &csv::StringRecord,
    exp_idx: usize,
    edu_idx: usize,
    row_num: usize,
) -> Result<FeatureVector> {
    let experience = parse_number(row, exp_idx, EXPERIENCE, row_num)?;
    let education = parse_number(row, edu_idx, EDUCATION, row_num)?;
    FeatureVector::from_raw(experience, education).map_err(|e| match e {
        LrError::InvalidFeature(reason) => LrError::InvalidRow { row: row_num, reason },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::features::Education;

    #[test]
    fn loads_columns_by_name_in_any_order() {
        let csv = "salary,education,experience,name\n4000000,1,1,ana\n6000000,2,2.5,budi\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].features.experience, 2.5);
        assert_eq!(ds.records[1].features.education, Education::Diploma);
        assert_eq!(ds.targets(), vec![4_000_000.0, 6_000_000.0]);
    }

    #[test]
    fn reports_every_missing_column() {
        let csv = "experience,age\n1,30\n";
        match Dataset::from_reader(csv.as_bytes()) {
            Err(LrError::MissingColumns { missing, .. }) => {
                assert_eq!(missing, vec!["education".to_owned(), "salary".to_owned()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn bad_cell_reports_row_number() {
        let csv = "experience,education,salary\n1,1,100\nx,2,200\n";
        match Dataset::from_reader(csv.as_bytes()) {
            Err(LrError::InvalidRow { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_education_is_invalid_row() {
        let csv = "experience,education,salary\n1,7,100\n";
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(LrError::InvalidRow { row: 1, .. })
        ));
    }

    #[test]
    fn non_finite_salary_is_invalid_row() {
        for bad in ["NaN", "inf", "-inf"] {
            let csv = format!("experience,education,salary\n1,1,100\n1,1,{bad}\n");
            assert!(
                matches!(Dataset::from_reader(csv.as_bytes()), Err(LrError::InvalidRow { row: 2, .. })),
                "{bad} was accepted"
            );
        }
    }

    #[test]
    fn header_only_file_is_empty_data() {
        let csv = "experience,education,salary\n";
        assert!(matches!(Dataset::from_reader(csv.as_bytes()), Err(LrError::EmptyData(_))));
    }

    #[test]
    fn prediction_table_echoes_extra_columns() {
        let csv = "name,experience,education\nana,1,1\nbudi,3,3\n";
        let table = PredictionTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        let out = table.to_csv_with_predictions(&[1.0, 2.5]).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("name,experience,education,predicted_salary"));
        assert_eq!(lines.next(), Some("ana,1,1,1.00"));
        assert_eq!(lines.next(), Some("budi,3,3,2.50"));
    }

    #[test]
    fn prediction_table_requires_education() {
        let csv = "experience,salary\n1,100\n";
        assert!(matches!(
            PredictionTable::from_reader(csv.as_bytes()),
            Err(LrError::MissingColumns { .. })
        ));
    }
}
