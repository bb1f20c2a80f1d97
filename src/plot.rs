use plotters::{
    prelude::{BitMapBackend, ChartBuilder, IntoDrawingArea, LabelAreaPosition},
    series::LineSeries,
    style::{BLUE, WHITE},
};
use std::path::Path;

use crate::error::{Error, Result};

fn plot_error(error: impl std::fmt::Display) -> Error {
    Error::Plot(error.to_string())
}

/// Draws the recorded cost history (one point per hundred iterations) as a PNG.
pub fn plot_costs(costs: &[f64], learning_rate: f64, path: &Path) -> Result<()> {
    let max_cost = costs
        .iter()
        .copied()
        .filter(|cost| cost.is_finite())
        .reduce(f64::max)
        .ok_or_else(|| Error::Plot("no finite cost to plot".to_string()))?;

    let root_area = BitMapBackend::new(path, (1280, 720)).into_drawing_area();
    root_area.fill(&WHITE).map_err(plot_error)?;

    let mut ctx = ChartBuilder::on(&root_area)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .caption(format!("Learning rate = {learning_rate}"), ("sans-serif", 30))
        .build_cartesian_2d(0..costs.len(), 0.0..max_cost * 1.05)
        .map_err(plot_error)?;

    ctx.configure_mesh()
        .x_desc("iterations (per hundreds)")
        .y_desc("cost")
        .draw()
        .map_err(plot_error)?;

    ctx.draw_series(LineSeries::new(
        costs
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, cost)| cost.is_finite()),
        &BLUE,
    ))
    .map_err(plot_error)?;

    root_area.present().map_err(plot_error)?;

    Ok(())
}
