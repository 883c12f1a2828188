use crate::data::dataset::{Dataset, SalaryRecord, EDUCATION, EXPERIENCE, SALARY};
use crate::data::features::FeatureVector;
use crate::error::{LrError, Result};

/// File name offered when the template is downloaded.
pub const TEMPLATE_FILE_NAME: &str = "sample_salary_template.csv";

/// (experience, education, salary) rows of the sample template.
const TEMPLATE_ROWS: [(f64, f64, f64); 10] = [
    (1.0, 1.0, 4_000_000.0),
    (2.0, 1.0, 5_000_000.0),
    (2.0, 2.0, 6_000_000.0),
    (3.0, 3.0, 8_000_000.0),
    (5.0, 3.0, 10_000_000.0),
    (7.0, 4.0, 15_000_000.0),
    (8.0, 4.0, 17_000_000.0),
    (4.0, 3.0, 9_000_000.0),
    (6.0, 4.0, 12_000_000.0),
    (3.0, 2.0, 7_000_000.0),
];

pub fn template_dataset() -> Dataset {
    let records = TEMPLATE_ROWS
        .iter()
        .filter_map(|&(exp, edu, salary)| {
            FeatureVector::from_raw(exp, edu)
                .ok()
                .map(|features| SalaryRecord { features, salary })
        })
        .collect();
    Dataset::new(records)
}

/// The template rendered as CSV text, header included.
pub fn template_csv() -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([EXPERIENCE, EDUCATION, SALARY])?;
    for &(exp, edu, salary) in &TEMPLATE_ROWS {
        wtr.write_record(&[exp.to_string(), edu.to_string(), salary.to_string()])?;
    }
    let bytes = wtr.into_inner().map_err(|e| LrError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| LrError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_csv_parses_back_into_template_dataset() {
        let csv = template_csv().unwrap();
        assert!(csv.starts_with("experience,education,salary\n1,1,4000000\n"));
        let parsed = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(parsed, template_dataset());
    }
}
