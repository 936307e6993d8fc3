// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("'{0}' is not a valid year tag; tags must be non-empty and contain no whitespace")]
    InvalidYearTag(String),

    #[error("Year {tag}: the {axis} axis must be finite and strictly increasing, but got {values:?}")]
    BadAxis {
        tag: String,
        axis: &'static str,
        values: Vec<f64>,
    },

    #[error("Year {tag}: the {variant} FoM grid has shape {shape:?}, expected ({expected}, {expected})")]
    BadShape {
        tag: String,
        variant: String,
        shape: (usize, usize),
        expected: usize,
    },

    #[error("Year {tag}: the {variant} FoM at (area rank {area_rank}, depth rank {depth_rank}) is not finite ({value})")]
    NonFiniteFom {
        tag: String,
        variant: String,
        area_rank: usize,
        depth_rank: usize,
        value: f64,
    },

    #[error("Year {0} was specified more than once")]
    DuplicateYear(String),

    #[error("No axes are known for year {0}; specify them in an arguments file")]
    NoAxesForYear(String),

    #[error("No years were specified")]
    NoYears,
}
