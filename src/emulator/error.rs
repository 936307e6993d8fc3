// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmulatorError {
    #[error("FoM grid has shape {shape:?}, but the axes have lengths ({num_areas}, {num_depths})")]
    ShapeMismatch {
        shape: (usize, usize),
        num_areas: usize,
        num_depths: usize,
    },

    #[error("The {axis} axis needs at least 2 values to interpolate, but has {len}")]
    AxisTooShort { axis: &'static str, len: usize },

    #[error("The {axis} axis must be finite and strictly increasing: {values:?}")]
    AxisNotIncreasing { axis: &'static str, values: Vec<f64> },

    #[error("FoM grid value at {index:?} is not finite ({value})")]
    NonFiniteValue { index: (usize, usize), value: f64 },

    #[error("Cannot evaluate the emulator at non-finite (area, depth) = ({area}, {depth})")]
    NonFiniteQuery { area: f64, depth: f64 },

    #[error("A refined grid needs at least 2 samples per axis, but {n_area}x{n_depth} was requested")]
    RefinedGridTooSmall { n_area: usize, n_depth: usize },
}
