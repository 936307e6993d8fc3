// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error-handling code associated with command-line interfaces.

use thiserror::Error;

use super::{compare::CompareArgsError, emulate::EmulateArgsError};
use crate::{
    comparison::ComparisonError,
    emulator::EmulatorError,
    grid::GridError,
    io::LoadError,
    params::{CompareError, EmulateError},
    plotting::DrawError,
};

const EMULATE_HELP: &str = "survey-fom emulate --help";
const COMPARE_HELP: &str = "survey-fom compare --help";
const FORMATS_HELP: &str = "the README's \"Input formats\" section";

/// The *only* publicly visible error from `survey-fom`. Each error message
/// should include a pointer to where more help can be found.
#[derive(Error, Debug)]
pub enum SurveyFomError {
    /// An error related to emulating FoMs.
    #[error("{0}\n\nSee for more info: {EMULATE_HELP}")]
    Emulate(String),

    /// An error related to comparing metrics.
    #[error("{0}\n\nSee for more info: {COMPARE_HELP}")]
    Compare(String),

    /// An error related to reading FoM grids or strategy tables.
    #[error("{0}\n\nSee for more info: {FORMATS_HELP}")]
    Input(String),

    /// An error related to plotting.
    #[error("{0}")]
    Plot(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// A generic error that can't be clarified further with documentation,
    /// e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<EmulateArgsError> for SurveyFomError {
    fn from(e: EmulateArgsError) -> Self {
        Self::Emulate(e.to_string())
    }
}

impl From<CompareArgsError> for SurveyFomError {
    fn from(e: CompareArgsError) -> Self {
        Self::Compare(e.to_string())
    }
}

impl From<EmulateError> for SurveyFomError {
    fn from(e: EmulateError) -> Self {
        match e {
            EmulateError::Load(e) => Self::from(e),
            EmulateError::Grid(e) => Self::from(e),
            EmulateError::Emulator(e) => Self::from(e),
            EmulateError::Draw(e) => Self::from(e),
            EmulateError::YearsFailed { .. } => Self::Emulate(e.to_string()),
        }
    }
}

impl From<CompareError> for SurveyFomError {
    fn from(e: CompareError) -> Self {
        match e {
            CompareError::Comparison(e) => Self::from(e),
            CompareError::Draw(e) => Self::from(e),
        }
    }
}

impl From<LoadError> for SurveyFomError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::IO(..) => Self::Generic(e.to_string()),
            _ => Self::Input(e.to_string()),
        }
    }
}

impl From<GridError> for SurveyFomError {
    fn from(e: GridError) -> Self {
        Self::Emulate(e.to_string())
    }
}

impl From<EmulatorError> for SurveyFomError {
    fn from(e: EmulatorError) -> Self {
        Self::Emulate(e.to_string())
    }
}

impl From<ComparisonError> for SurveyFomError {
    fn from(e: ComparisonError) -> Self {
        match e {
            ComparisonError::IO(..) => Self::Generic(e.to_string()),
            _ => Self::Compare(e.to_string()),
        }
    }
}

impl From<DrawError> for SurveyFomError {
    fn from(e: DrawError) -> Self {
        Self::Plot(e.to_string())
    }
}

impl From<std::io::Error> for SurveyFomError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
