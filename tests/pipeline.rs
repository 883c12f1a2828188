use std::fs;

use approx::assert_relative_eq;

use ferrite_lr::data::template_dataset;
use ferrite_lr::model::store;
use ferrite_lr::workflow::{self, evaluate_dataset, fit_models, TrainOptions};
use ferrite_lr::{Dataset, FeatureVector, LrError, ModelKind, TrainConfig};

const FOUR_ROWS: &str = "experience,education,salary\n\
1,1,4000000\n\
2,1,5000000\n\
2,2,6000000\n\
3,3,8000000\n";

fn four_rows() -> Dataset {
    Dataset::from_reader(FOUR_ROWS.as_bytes()).unwrap()
}

#[test]
fn four_row_fit_predicts_the_right_magnitude() {
    let models = fit_models(&four_rows(), &TrainConfig::default()).unwrap();
    assert_eq!(models.history.len(), 2000);

    let pred = models.manual.predict_one(FeatureVector::from_raw(3.0, 3.0).unwrap());
    assert!(pred > 8_000_000.0 / 10.0 && pred < 8_000_000.0 * 10.0, "got {pred}");
    // The four rows are exactly linear, so the fit should be tight.
    assert_relative_eq!(pred, 8_000_000.0, max_relative = 1e-3);
}

#[test]
fn training_mse_is_twice_the_final_cost() {
    let data = template_dataset();
    let models = fit_models(&data, &TrainConfig::default()).unwrap();

    let metrics = evaluate_dataset(&models.manual, &data);
    let final_cost = models.history.final_cost().unwrap();
    assert!(final_cost > 0.0);
    assert_relative_eq!(metrics.mse, 2.0 * final_cost, max_relative = 1e-9);
}

#[test]
fn perfectly_linear_experience_converges_toward_zero_cost() {
    let csv = "experience,education,salary\n\
0,2,3000000\n1,1,3500000\n2,4,4000000\n3,3,4500000\n4,2,5000000\n5,1,5500000\n";
    let data = Dataset::from_reader(csv.as_bytes()).unwrap();
    let config = TrainConfig::new(0.05, 3000);
    let models = fit_models(&data, &config).unwrap();

    let first = models.history.costs[0];
    let last = models.history.final_cost().unwrap();
    assert!(models.history.is_non_increasing(1e-3));
    assert!(last < first * 1e-12, "first={first} last={last}");
}

#[test]
fn gradient_descent_agrees_with_the_closed_form_baseline() {
    let data = template_dataset();
    let models = fit_models(&data, &TrainConfig::default()).unwrap();

    for (gd, ols) in models.manual.weights().iter().zip(models.baseline.weights()) {
        assert_relative_eq!(*gd, ols, max_relative = 1e-4, epsilon = 1.0);
    }
    assert_eq!(models.manual.scaler(), models.baseline.scaler());
}

#[test]
fn train_then_evaluate_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("salary.csv");
    fs::write(&data_path, ferrite_lr::data::template_csv().unwrap()).unwrap();

    let mut opts = TrainOptions::new(&data_path);
    opts.out_model = dir.path().join("models/manual_model.json");
    opts.out_baseline = dir.path().join("models/sklearn_model.json");

    let report = workflow::train(&opts).unwrap();
    assert_eq!(report.train_rows, 8);
    assert_eq!(report.validation.map(|v| v.rows), Some(2));

    let manual = workflow::evaluate(&data_path, &opts.out_model).unwrap();
    assert_eq!(manual.kind, ModelKind::Manual);
    assert_eq!(manual.rows, 10);
    assert!(manual.metrics.r2 > 0.9, "r2 = {}", manual.metrics.r2);

    let baseline = workflow::evaluate(&data_path, &opts.out_baseline).unwrap();
    assert_eq!(baseline.kind, ModelKind::Library);

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&opts.out_baseline).unwrap()).unwrap();
    let mut keys: Vec<&str> = raw.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["scaler", "sklearn_model"]);
}

#[test]
fn saved_artifact_predicts_identically_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.json");
    let models = fit_models(&four_rows(), &TrainConfig::default()).unwrap();
    store::save(&models.manual, &path).unwrap();

    let loaded = store::load(&path).unwrap();
    let x = FeatureVector::from_raw(4.5, 2.0).unwrap();
    assert_eq!(loaded.predict_one(x), models.manual.predict_one(x));
}

#[test]
fn diverged_training_refuses_to_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diverged.json");
    let models = fit_models(&four_rows(), &TrainConfig::new(10.0, 2000)).unwrap();
    assert!(models.manual.weights().iter().any(|w| !w.is_finite()));

    let err = store::save(&models.manual, &path).unwrap_err();
    assert!(matches!(err, LrError::InvalidArtifact(_)));
    assert!(!path.exists());
}

#[test]
fn evaluating_a_missing_artifact_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("salary.csv");
    fs::write(&data_path, FOUR_ROWS).unwrap();

    let err = workflow::evaluate(&data_path, &dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LrError::ArtifactNotFound(_)));
}

#[test]
fn constant_targets_leave_r2_undefined() {
    let csv = "experience,education,salary\n1,1,5000000\n2,2,5000000\n3,3,5000000\n";
    let data = Dataset::from_reader(csv.as_bytes()).unwrap();
    let models = fit_models(&data, &TrainConfig::default()).unwrap();

    let metrics = evaluate_dataset(&models.manual, &data);
    assert!(!metrics.r2_defined());
    assert!(metrics.to_string().contains("undefined"));
}
