// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

The default design grid is the one the FoM forecasts were run on: three survey
areas and three median i-band depths per survey year.
 */

/// The number of values along each axis of a FoM design grid.
pub const GRID_SIZE: usize = 3;

/// The number of FoM values expected per prior variant in a FoM file.
pub const NUM_GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;

/// The survey years used when none are specified.
pub const DEFAULT_YEAR_TAGS: [&str; 4] = ["Y1", "Y3", "Y6", "Y10"];

/// Grid areas for each of [`DEFAULT_YEAR_TAGS`] [deg^2].
pub const DEFAULT_AREAS: [[f64; GRID_SIZE]; 4] = [
    [7500.0, 13000.0, 16000.0],
    [10000.0, 15000.0, 20000.0],
    [10000.0, 15000.0, 20000.0],
    [10000.0, 15000.0, 20000.0],
];

/// Grid median i-band depths for each of [`DEFAULT_YEAR_TAGS`] [mag].
pub const DEFAULT_DEPTHS: [[f64; GRID_SIZE]; 4] = [
    [24.9, 25.2, 25.5],
    [25.5, 25.8, 26.1],
    [25.9, 26.1, 26.3],
    [26.3, 26.5, 26.7],
];

/// The directory FoM files are read from when none is specified.
pub const DEFAULT_FOM_DIR: &str = "FoM";

/// The directory plots are written to when none is specified.
pub const DEFAULT_PLOT_DIR: &str = "figs";

/// The number of samples along each axis of the refined diagnostic grid.
pub const DEFAULT_REFINE: usize = 20;

/// Strategy-table rows must have at least this many '|'-separated fields.
pub const STRATEGY_TABLE_MIN_FIELDS: usize = 5;

/// Histograms of metrics with "dust" in their label start here unless told
/// otherwise.
pub const DUST_LOWER_LIMIT: f64 = 22.0;

/// Metric-comparison histograms may not have more bins than this.
pub const MAX_HISTOGRAM_BINS: usize = 100_000;

/// Plotting colours for each photometric band.
pub const BAND_COLOURS: [(&str, (u8, u8, u8)); 6] = [
    ("u", (186, 85, 211)),
    ("g", (0, 0, 255)),
    ("r", (0, 128, 0)),
    ("i", (218, 165, 32)),
    ("z", (255, 69, 0)),
    ("y", (128, 0, 0)),
];
