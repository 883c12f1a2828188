//! End-to-end entry points shared by the CLI and the studio.
//!
//! `train` reads a CSV, holds out a validation split, fits the scaler on the
//! training rows only, trains both the gradient-descent model and the
//! closed-form baseline on the same scaled features and persists both, each
//! bundled with that one scaler. `evaluate` scores a saved artifact using the
//! scaler stored inside it, never a refitted one.

use std::path::{Path, PathBuf};

use log::info;

use crate::data::dataset::Dataset;
use crate::data::split::train_test_split;
use crate::error::Result;
use crate::eval::metrics::Metrics;
use crate::model::artifact::{ModelArtifact, ModelKind};
use crate::model::ols::LinearRegression;
use crate::model::store;
use crate::preprocessing::design::{design_matrix, strip_bias};
use crate::preprocessing::scaler::StandardScaler;
use crate::train::gradient_descent::gradient_descent;
use crate::train::history::TrainingHistory;
use crate::train::train_config::TrainConfig;

pub const DEFAULT_MODEL_PATH: &str = "models/manual_model.json";
pub const DEFAULT_BASELINE_PATH: &str = "models/sklearn_model.json";
pub const DEFAULT_TEST_SIZE: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

/// Inputs of a training run.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub data: PathBuf,
    pub out_model: PathBuf,
    pub out_baseline: PathBuf,
    pub config: TrainConfig,
    /// Fraction of rows held out for validation, in `[0, 1)`.
    pub test_size: f64,
    pub seed: u64,
}

impl TrainOptions {
    pub fn new<P: Into<PathBuf>>(data: P) -> Self {
        TrainOptions {
            data: data.into(),
            out_model: PathBuf::from(DEFAULT_MODEL_PATH),
            out_baseline: PathBuf::from(DEFAULT_BASELINE_PATH),
            config: TrainConfig::default(),
            test_size: DEFAULT_TEST_SIZE,
            seed: DEFAULT_SEED,
        }
    }
}

/// Both trained artifacts plus the gradient-descent cost history.
#[derive(Debug, Clone)]
pub struct FittedModels {
    pub manual: ModelArtifact,
    pub baseline: ModelArtifact,
    pub history: TrainingHistory,
}

/// Held-out scores of both models.
#[derive(Debug, Clone, Copy)]
pub struct Validation {
    pub rows: usize,
    pub manual: Metrics,
    pub baseline: Metrics,
}

#[derive(Debug, Clone)]
pub struct TrainReport {
    pub models: FittedModels,
    pub train_rows: usize,
    /// `None` when the split left no validation rows.
    pub validation: Option<Validation>,
}

/// Result of scoring one artifact on one dataset.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation {
    pub kind: ModelKind,
    pub rows: usize,
    pub metrics: Metrics,
}

/// Fits the scaler, the gradient-descent weights (from zeros) and the
/// baseline regressor on `train`.
pub fn fit_models(train: &Dataset, config: &TrainConfig) -> Result<FittedModels> {
    let (scaler, scaled) = StandardScaler::fit_transform(&train.features())?;
    let x = design_matrix(&scaled);
    let y = train.targets();

    let (weights, history) = gradient_descent(&x, &y, &vec![0.0; x.cols], config);
    let regressor = LinearRegression::fit(&strip_bias(&x), &y);

    Ok(FittedModels {
        manual: ModelArtifact::Manual { weights, scaler: scaler.clone() },
        baseline: ModelArtifact::Library { regressor, scaler },
        history,
    })
}

/// Scores `artifact` on a labelled dataset.
pub fn evaluate_dataset(artifact: &ModelArtifact, dataset: &Dataset) -> Metrics {
    let predictions = artifact.predict(&dataset.feature_vectors());
    Metrics::compute(&dataset.targets(), &predictions)
}

/// Training entry point: load, split, fit, persist, report.
pub fn train(opts: &TrainOptions) -> Result<TrainReport> {
    let data = Dataset::load_csv(&opts.data)?;
    info!("loaded {} rows from {}", data.len(), opts.data.display());

    let (train_set, val_set) = train_test_split(&data, opts.test_size, opts.seed)?;
    info!(
        "training on {} rows (alpha={}, iterations={}), {} held out",
        train_set.len(),
        opts.config.learning_rate,
        opts.config.iterations,
        val_set.len()
    );

    let models = fit_models(&train_set, &opts.config)?;

    info!("Training finished.");
    info!("Weights: {:?}", models.manual.weights());
    match models.history.final_cost() {
        Some(cost) => info!("Final cost: {cost}"),
        None => info!("Final cost: n/a (0 iterations)"),
    }

    store::save(&models.manual, &opts.out_model)?;
    store::save(&models.baseline, &opts.out_baseline)?;

    let validation = if val_set.is_empty() {
        None
    } else {
        let v = Validation {
            rows: val_set.len(),
            manual: evaluate_dataset(&models.manual, &val_set),
            baseline: evaluate_dataset(&models.baseline, &val_set),
        };
        info!("validation ({} rows) {}: {}", v.rows, ModelKind::Manual, v.manual);
        info!("validation ({} rows) {}: {}", v.rows, ModelKind::Library, v.baseline);
        Some(v)
    };

    Ok(TrainReport {
        models,
        train_rows: train_set.len(),
        validation,
    })
}

/// Evaluation entry point: scores the artifact at `model` on the CSV at `data`.
pub fn evaluate(data: &Path, model: &Path) -> Result<Evaluation> {
    let dataset = Dataset::load_csv(data)?;
    let artifact = store::load(model)?;

    let evaluation = Evaluation {
        kind: artifact.kind(),
        rows: dataset.len(),
        metrics: evaluate_dataset(&artifact, &dataset),
    };
    info!("{} evaluation on {} rows:", evaluation.kind, evaluation.rows);
    info!("{}", evaluation.metrics);
    Ok(evaluation)
}
