use catvnoncat::{
    features::{flatten_image, resize},
    gradient_descent::OptimizerConfig,
    model::{model, ModelConfig},
    parse::{load_dataset, load_image, ImageShape},
    plot::plot_costs,
    predict::{predict, PredictorConfig},
};
use log::{info, warn};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    const DATASET_DIRECTORY: &str = "datasets";
    const NUM_PX: usize = 64;

    let dataset = load_dataset(Path::new(DATASET_DIRECTORY), ImageShape::square(NUM_PX))?;

    info!(
        "{} training examples, {} test examples, {NUM_PX}x{NUM_PX} pixels",
        dataset.train.len(),
        dataset.test.len()
    );

    let train_x = dataset.train.features();
    let test_x = dataset.test.features();

    const NUM_ITERATIONS: usize = 2000;
    const LEARNING_RATE: f64 = 0.005;

    let config = ModelConfig::new().optimizer(
        OptimizerConfig::new()
            .num_iterations(NUM_ITERATIONS)
            .learning_rate(LEARNING_RATE)
            .print_cost(true),
    );

    let report = model(
        train_x.view(),
        dataset.train.labels.view(),
        test_x.view(),
        dataset.test.labels.view(),
        &config,
    )?;

    if report.diverged {
        warn!("training diverged");
    }

    const COST_PLOT_PATH: &str = "costs.png";
    match plot_costs(&report.costs, report.learning_rate, Path::new(COST_PLOT_PATH)) {
        Ok(()) => info!("cost curve written to {COST_PLOT_PATH}"),
        Err(error) => warn!("cost curve not drawn: {error}"),
    }

    const IMAGES_DIRECTORY: &str = "images";
    const IMAGES: [&str; 5] = [
        "fan.csv",
        "cat.csv",
        "flower.csv",
        "moon.csv",
        "another-cat.csv",
    ];

    let predictor = PredictorConfig::new().print_probability(true);

    for file_name in IMAGES {
        let image = load_image(&Path::new(IMAGES_DIRECTORY).join(file_name))?;
        let image = resize(image.view(), NUM_PX, NUM_PX);

        let prediction = predict(
            &report.parameters,
            flatten_image(image.view()).view(),
            &predictor,
        )?;
        let label = prediction[(0, 0)];
        let class_name = dataset.classes.for_label(label).unwrap_or("unknown");

        info!("{file_name}: y = {label}, your algorithm predicts a \"{class_name}\" picture.");
    }

    Ok(())
}
