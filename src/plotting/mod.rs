// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Diagnostic plots.
//!
//! The rest of the crate only describes what to draw ([`ScatterPlot`],
//! [`HistogramPlot`]) and hands it to a [`PlotAdapter`]; it never looks at the
//! rendered output, only the paths that come back.

#[cfg(feature = "plotting")]
mod bitmap;
mod error;
#[cfg(test)]
mod tests;

#[cfg(feature = "plotting")]
pub use bitmap::BitmapPlotter;
pub use error::DrawError;

use std::path::{Path, PathBuf};

/// Points coloured by value, optionally with a second set of points drawn on
/// top.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlot {
    pub file_stem: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Colour values. These are expected to be in [0, 1]; values outside are
    /// clamped and NaNs are drawn grey.
    pub colour: Vec<f64>,
    /// Extra (x, y) points, e.g. the candidate strategies.
    pub overlay: Vec<(f64, f64)>,
}

impl ScatterPlot {
    pub fn validate(&self) -> Result<(), DrawError> {
        if self.x.is_empty() && self.overlay.is_empty() {
            return Err(DrawError::NoData(self.file_stem.clone()));
        }
        for (what, len) in [("y", self.y.len()), ("colour", self.colour.len())] {
            if len != self.x.len() {
                return Err(DrawError::LengthMismatch {
                    stem: self.file_stem.clone(),
                    what,
                    got: len,
                    expected: self.x.len(),
                });
            }
        }
        Ok(())
    }
}

/// Step histograms sharing one set of bin edges, drawn side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPlot {
    pub file_stem: String,
    pub title: String,
    pub x_label: String,
    pub bin_edges: Vec<f64>,
    pub panels: Vec<HistogramPanel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPanel {
    pub title: String,
    pub series: Vec<HistogramSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    pub label: String,
    /// Photometric band; this picks the colour.
    pub band: String,
    pub counts: Vec<u64>,
}

impl HistogramPlot {
    pub fn validate(&self) -> Result<(), DrawError> {
        if self.bin_edges.len() < 2 || self.panels.is_empty() {
            return Err(DrawError::NoData(self.file_stem.clone()));
        }
        let num_bins = self.bin_edges.len() - 1;
        for series in self.panels.iter().flat_map(|p| p.series.iter()) {
            if series.counts.len() != num_bins {
                return Err(DrawError::LengthMismatch {
                    stem: self.file_stem.clone(),
                    what: "histogram counts",
                    got: series.counts.len(),
                    expected: num_bins,
                });
            }
        }
        Ok(())
    }
}

/// Something that can render plots. Implementations return the path of each
/// file they write.
pub trait PlotAdapter: Sync {
    fn scatter(&self, plot: &ScatterPlot) -> Result<PathBuf, DrawError>;

    fn histograms(&self, plot: &HistogramPlot) -> Result<PathBuf, DrawError>;
}

/// The plotter used by the CLI, writing into `output_dir`.
#[cfg(feature = "plotting")]
pub fn default_plotter(output_dir: &Path) -> Result<Box<dyn PlotAdapter>, DrawError> {
    Ok(Box::new(BitmapPlotter::new(output_dir)?))
}

#[cfg(not(feature = "plotting"))]
pub fn default_plotter(_output_dir: &Path) -> Result<Box<dyn PlotAdapter>, DrawError> {
    // Plotting needs C libraries that can't be statically compiled, so it's
    // optional.
    Err(DrawError::NoPlottingFeature)
}

/// Map a value in [0, 1] onto a red-yellow-blue colour ramp.
pub fn colour_ramp(value: f64) -> (u8, u8, u8) {
    const STOPS: [(f64, f64, f64); 3] = [
        (215.0, 48.0, 39.0),
        (255.0, 255.0, 191.0),
        (69.0, 117.0, 180.0),
    ];
    if value.is_nan() {
        return (160, 160, 160);
    }
    let v = value.clamp(0.0, 1.0) * 2.0;
    let i = (v.floor() as usize).min(1);
    let t = v - i as f64;
    let (lo, hi) = (STOPS[i], STOPS[i + 1]);
    let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    (mix(lo.0, hi.0), mix(lo.1, hi.1), mix(lo.2, hi.2))
}
