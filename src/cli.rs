use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use ferrite_lr::train::TrainConfig;
use ferrite_lr::workflow::{self, TrainOptions};

fn parse_test_size(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..1.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("test size must be in [0, 1), got {v}"))
    }
}

fn parse_learning_rate(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if v > 0.0 && v.is_finite() {
        Ok(v)
    } else {
        Err(format!("learning rate must be positive, got {v}"))
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "ferrite-lr",
    about = "Salary regression: gradient-descent training, evaluation and prediction",
    version,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Train the gradient-descent model and the least-squares baseline
    Train(TrainArgs),

    /// Score a saved model on a labelled CSV
    Evaluate(EvaluateArgs),

    /// Predict salaries for one input or a CSV of inputs
    Predict(PredictArgs),

    /// Write the sample salary CSV template
    Template(TemplateArgs),
}

/* ----------------------- train ----------------------- */

#[derive(Debug, Args)]
pub struct TrainArgs {
    /// CSV with experience, education and salary columns
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    /// Output path of the gradient-descent model
    #[arg(long = "out-model", default_value = workflow::DEFAULT_MODEL_PATH)]
    pub out_model: PathBuf,

    /// Output path of the baseline model
    #[arg(long = "out-baseline", alias = "out-sklearn", default_value = workflow::DEFAULT_BASELINE_PATH)]
    pub out_baseline: PathBuf,

    /// Learning rate
    #[arg(long, value_parser = parse_learning_rate, default_value_t = TrainConfig::DEFAULT_LEARNING_RATE)]
    pub alpha: f64,

    /// Number of gradient-descent iterations
    #[arg(long = "iter", default_value_t = TrainConfig::DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Fraction of rows held out for validation
    #[arg(long = "test-size", value_parser = parse_test_size, default_value_t = workflow::DEFAULT_TEST_SIZE)]
    pub test_size: f64,

    /// Seed of the train/validation shuffle
    #[arg(long, default_value_t = workflow::DEFAULT_SEED)]
    pub seed: u64,

    /// Log the cost every N iterations (needs RUST_LOG=debug)
    #[arg(long = "log-every", default_value_t = 0)]
    pub log_every: usize,
}

impl TrainArgs {
    pub fn into_options(self) -> TrainOptions {
        TrainOptions {
            data: self.data,
            out_model: self.out_model,
            out_baseline: self.out_baseline,
            config: TrainConfig::new(self.alpha, self.iterations).with_log_every(self.log_every),
            test_size: self.test_size,
            seed: self.seed,
        }
    }
}

/* --------------------- evaluate ---------------------- */

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Labelled CSV to score against
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    /// Saved model artifact
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub model: PathBuf,
}

/* ---------------------- predict ---------------------- */

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Saved model artifact
    #[arg(long, value_hint = ValueHint::FilePath, default_value = workflow::DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// Years of experience (single prediction)
    #[arg(long, requires = "education", conflicts_with = "input")]
    pub experience: Option<f64>,

    /// Education level 1-4 (single prediction)
    #[arg(long, requires = "experience", conflicts_with = "input")]
    pub education: Option<u8>,

    /// CSV with experience and education columns (batch prediction)
    #[arg(long, value_hint = ValueHint::FilePath, required_unless_present = "experience")]
    pub input: Option<PathBuf>,

    /// Where to write the batch result; stdout if omitted
    #[arg(long, value_hint = ValueHint::FilePath, requires = "input")]
    pub output: Option<PathBuf>,
}

/* --------------------- template ---------------------- */

#[derive(Debug, Args)]
pub struct TemplateArgs {
    /// Destination file; stdout if omitted
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
