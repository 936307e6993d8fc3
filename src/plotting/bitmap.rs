// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! PNG rendering with plotters.

use std::path::{Path, PathBuf};

use log::debug;
use plotters::prelude::*;

use super::{colour_ramp, DrawError, HistogramPlot, PlotAdapter, ScatterPlot};
use crate::constants::BAND_COLOURS;

/// The number of X pixels on the scatter plots.
const X_PIXELS: u32 = 1600;
/// The number of Y pixels on all plots.
const Y_PIXELS: u32 = 1200;
/// The number of X pixels of each histogram panel.
const PANEL_X_PIXELS: u32 = 1400;

fn to_draw_error<E: std::fmt::Display>(e: E) -> DrawError {
    DrawError::Plotters(e.to_string())
}

/// A range covering all of `values` with a bit of room on either side.
fn padded_range<I: Iterator<Item = f64>>(values: I) -> std::ops::Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return 0.0..1.0;
    }
    let pad = if max > min {
        (max - min) * 0.05
    } else {
        min.abs().max(1.0) * 0.05
    };
    (min - pad)..(max + pad)
}

fn band_colour(band: &str) -> RGBColor {
    BAND_COLOURS
        .iter()
        .find(|(b, _)| *b == band)
        .map(|(_, (r, g, b))| RGBColor(*r, *g, *b))
        .unwrap_or(BLACK)
}

/// Writes plots as PNGs into a directory.
#[derive(Debug, Clone)]
pub struct BitmapPlotter {
    output_dir: PathBuf,
}

impl BitmapPlotter {
    /// The directory is created if it doesn't exist.
    pub fn new(output_dir: &Path) -> Result<BitmapPlotter, DrawError> {
        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir)
                .map_err(|e| DrawError::CreateDir(output_dir.to_path_buf(), e))?;
        }
        Ok(BitmapPlotter {
            output_dir: output_dir.to_path_buf(),
        })
    }

    fn path_for(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("{stem}.png"))
    }
}

impl PlotAdapter for BitmapPlotter {
    fn scatter(&self, plot: &ScatterPlot) -> Result<PathBuf, DrawError> {
        plot.validate()?;
        let path = self.path_for(&plot.file_stem);
        debug!("Drawing scatter plot '{}'", path.display());

        let root = BitMapBackend::new(&path, (X_PIXELS, Y_PIXELS)).into_drawing_area();
        root.fill(&WHITE).map_err(to_draw_error)?;

        let x_range = padded_range(plot.x.iter().copied().chain(plot.overlay.iter().map(|p| p.0)));
        let y_range = padded_range(plot.y.iter().copied().chain(plot.overlay.iter().map(|p| p.1)));
        let mut chart = ChartBuilder::on(&root)
            .caption(&plot.title, ("sans-serif", 40))
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(90)
            .build_cartesian_2d(x_range, y_range)
            .map_err(to_draw_error)?;
        chart
            .configure_mesh()
            .x_desc(plot.x_label.as_str())
            .y_desc(plot.y_label.as_str())
            .label_style(("sans-serif", 24))
            .draw()
            .map_err(to_draw_error)?;

        chart
            .draw_series(
                plot.x
                    .iter()
                    .zip(plot.y.iter())
                    .zip(plot.colour.iter())
                    .map(|((&x, &y), &c)| {
                        let (r, g, b) = colour_ramp(c);
                        Circle::new((x, y), 10, RGBColor(r, g, b).filled())
                    }),
            )
            .map_err(to_draw_error)?;
        if !plot.overlay.is_empty() {
            chart
                .draw_series(
                    plot.overlay
                        .iter()
                        .map(|&(x, y)| Cross::new((x, y), 6, BLACK.stroke_width(2))),
                )
                .map_err(to_draw_error)?;
        }

        root.present().map_err(to_draw_error)?;
        Ok(path.clone())
    }

    fn histograms(&self, plot: &HistogramPlot) -> Result<PathBuf, DrawError> {
        plot.validate()?;
        let path = self.path_for(&plot.file_stem);
        debug!("Drawing histograms '{}'", path.display());

        let num_panels = plot.panels.len();
        let root = BitMapBackend::new(&path, (PANEL_X_PIXELS * num_panels as u32, Y_PIXELS))
            .into_drawing_area();
        root.fill(&WHITE).map_err(to_draw_error)?;
        let root = root
            .titled(&plot.title, ("sans-serif", 44))
            .map_err(to_draw_error)?;

        let x_range = padded_range(plot.bin_edges.iter().copied());
        // All panels share the y limits. Empty bins can't be drawn on a log
        // scale, so they sit at the bottom of the plot.
        let y_floor = 0.5;
        let y_max = plot
            .panels
            .iter()
            .flat_map(|p| p.series.iter())
            .flat_map(|s| s.counts.iter())
            .copied()
            .max()
            .unwrap_or(1)
            .max(1) as f64
            * 2.0;

        let panel_areas = root.split_evenly((1, num_panels));
        for (panel, area) in plot.panels.iter().zip(panel_areas.iter()) {
            let mut chart = ChartBuilder::on(area)
                .caption(&panel.title, ("sans-serif", 32))
                .margin(20)
                .x_label_area_size(70)
                .y_label_area_size(90)
                .build_cartesian_2d(x_range.clone(), (y_floor..y_max).log_scale())
                .map_err(to_draw_error)?;
            chart
                .configure_mesh()
                .x_desc(plot.x_label.as_str())
                .y_desc("counts")
                .label_style(("sans-serif", 22))
                .draw()
                .map_err(to_draw_error)?;

            for series in &panel.series {
                let style = band_colour(&series.band).stroke_width(2);
                let steps = plot
                    .bin_edges
                    .windows(2)
                    .zip(series.counts.iter())
                    .flat_map(|(edges, &count)| {
                        let y = (count as f64).max(y_floor);
                        [(edges[0], y), (edges[1], y)]
                    });
                chart
                    .draw_series(LineSeries::new(steps, style))
                    .map_err(to_draw_error)?
                    .label(series.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            }

            chart
                .configure_series_labels()
                .label_font(("sans-serif", 22))
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(to_draw_error)?;
        }

        root.present().map_err(to_draw_error)?;
        Ok(path.clone())
    }
}
