use std::ops::Range;
use std::path::Path;

use ndarray::Array2;
use plotters::prelude::*;

use crate::error::Error;

fn plot_error<E: std::fmt::Display>(error: E) -> Error
{
    Error::Plot(error.to_string())
}

fn axis_range(front: &Array2<f64>, column: usize) -> Range<f64>
{
    let (min, max) = front.column(column)
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &value| (min.min(value), max.max(value)));

    if !min.is_finite() || !max.is_finite()
    {
        return 0.0..1.0;
    }

    let margin = ((max - min) * 0.05).max(1e-3);

    (min - margin)..(max + margin)
}

/// Render a two or three objective Pareto front as a PNG scatter plot.
pub fn draw_front(front: &Array2<f64>, caption: &str, path: &Path) -> Result<(), Error>
{
    let root = BitMapBackend::new(path, (1920, 1080)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    match front.ncols() {
        2 => {
            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .caption(caption, ("sans-serif", 40))
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d(axis_range(front, 0), axis_range(front, 1))
                .map_err(plot_error)?;

            chart.configure_mesh().draw().map_err(plot_error)?;

            chart.draw_series(
                front.rows()
                    .into_iter()
                    .map(|point| Circle::new((point[0], point[1]), 5, RED.filled()))
            ).map_err(plot_error)?;
        }
        3 => {
            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .caption(caption, ("sans-serif", 40))
                .build_cartesian_3d(axis_range(front, 0), axis_range(front, 1), axis_range(front, 2))
                .map_err(plot_error)?;

            chart.configure_axes().draw().map_err(plot_error)?;

            chart.draw_series(
                front.rows()
                    .into_iter()
                    .map(|point| Circle::new((point[0], point[1], point[2]), 5, RED.filled()))
            ).map_err(plot_error)?;
        }
        objectives => {
            return Err(Error::Plot(format!("can only draw 2 or 3 objectives, got {}", objectives)));
        }
    }

    root.present().map_err(plot_error)?;

    Ok(())
}
