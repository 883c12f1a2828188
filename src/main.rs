mod cli;

use std::fs;
use std::fs::File;
use std::process;

use clap::Parser;
use log::{error, info};

use ferrite_lr::data::template::{template_csv, TEMPLATE_FILE_NAME};
use ferrite_lr::format::rupiah;
use ferrite_lr::model::store;
use ferrite_lr::{Education, FeatureVector, LrError, PredictionTable, Result};

use crate::cli::{Cli, Commands, PredictArgs, TemplateArgs};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        error!("{e}");
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Train(args) => {
            ferrite_lr::workflow::train(&args.into_options())?;
        }
        Commands::Evaluate(args) => {
            ferrite_lr::workflow::evaluate(&args.data, &args.model)?;
        }
        Commands::Predict(args) => predict(args)?,
        Commands::Template(args) => template(args)?,
    }
    Ok(())
}

fn predict(args: PredictArgs) -> Result<()> {
    let artifact = store::load(&args.model)?;
    info!("using {} from {}", artifact.kind(), args.model.display());

    if let (Some(experience), Some(code)) = (args.experience, args.education) {
        let education = Education::from_code(code).ok_or_else(|| {
            LrError::InvalidFeature(format!("education must be an integer in 1..=4, got {code}"))
        })?;
        let features = FeatureVector::new(experience, education)?;
        let salary = artifact.predict_one(features);
        println!("Estimated salary: {}", rupiah(salary));
        return Ok(());
    }

    let Some(input) = args.input else {
        return Err(LrError::InvalidFeature("either --input or --experience/--education is required".into()));
    };
    let table = PredictionTable::from_reader(File::open(&input)?)?;
    let predictions = artifact.predict(&table.features);
    let csv = table.to_csv_with_predictions(&predictions)?;

    match args.output {
        Some(path) => {
            fs::write(&path, csv)?;
            info!("wrote {} predictions to {}", table.len(), path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn template(args: TemplateArgs) -> Result<()> {
    let csv = template_csv()?;
    match args.output {
        Some(path) => {
            fs::write(&path, csv)?;
            info!("wrote {} to {}", TEMPLATE_FILE_NAME, path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}
