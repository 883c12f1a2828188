use ferrite_lr::data::template_dataset;
use ferrite_lr::format::rupiah;
use ferrite_lr::workflow::{evaluate_dataset, fit_models};
use ferrite_lr::{Education, FeatureVector, TrainConfig};

fn main() -> ferrite_lr::Result<()> {
    let data = template_dataset();
    let models = fit_models(&data, &TrainConfig::default())?;

    for (iter, cost) in models.history.costs.iter().enumerate().step_by(500) {
        println!("Iter {iter}: cost = {cost:.4e}");
    }
    println!("Weights: {:?}", models.manual.weights());

    println!("Manual:   {}", evaluate_dataset(&models.manual, &data));
    println!("Baseline: {}", evaluate_dataset(&models.baseline, &data));

    for education in Education::ALL {
        let x = FeatureVector::new(5.0, education)?;
        println!(
            "5 years, {:<24} -> {}",
            education.label(),
            rupiah(models.manual.predict_one(x))
        );
    }
    Ok(())
}
