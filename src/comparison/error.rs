// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("No versions were given to compare")]
    NoVersions,

    #[error("The reference version '{reference}' must be the first in the version order {order:?}")]
    ReferenceNotFirst { reference: String, order: Vec<String> },

    #[error("Version '{0}' is not in the metric samples")]
    UnknownVersion(String),

    #[error("Version '{version}' has band '{band}', but the reference version doesn't")]
    MissingReferenceBand { version: String, band: String },

    #[error("Version '{version}' band '{band}' has no unmasked values")]
    EmptyBand { version: String, band: String },

    #[error("The values of metric '{metric}' need {num_bins} histogram bins, more than the maximum of {max}")]
    TooManyBins {
        metric: String,
        num_bins: usize,
        max: usize,
    },

    #[error("No values of metric '{metric}' reach the histogram lower limit {lower_limit}; the largest is {max}")]
    BelowLowerLimit {
        metric: String,
        lower_limit: f64,
        max: f64,
    },

    #[error("Couldn't parse metric samples in '{}': {1}", .0.display())]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("Couldn't read '{}': {1}", .0.display())]
    IO(PathBuf, #[source] std::io::Error),
}
