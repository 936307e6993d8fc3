// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrawError {
    #[cfg(not(feature = "plotting"))]
    #[error("survey-fom was not compiled with the \"plotting\" feature.\nYou need to compile survey-fom from source with this feature to make plots.")]
    NoPlottingFeature,

    #[error("Plot '{stem}': {what} has {got} values, but {expected} were expected")]
    LengthMismatch {
        stem: String,
        what: &'static str,
        got: usize,
        expected: usize,
    },

    #[error("Plot '{0}' has nothing to draw")]
    NoData(String),

    #[error("Couldn't create plot directory '{}': {1}", .0.display())]
    CreateDir(PathBuf, #[source] std::io::Error),

    #[cfg(feature = "plotting")]
    #[error("Error from the plotters library: {0}")]
    Plotters(String),
}
