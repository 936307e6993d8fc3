// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Figure-of-merit emulation for sky-survey observing strategies.

A cosmological figure of merit (FoM) is precomputed on a coarse grid of survey
area and imaging depth for each survey epoch ("year"). This crate reads those
grids, interpolates them at the area and depth realised by candidate observing
strategies, and ranks the strategies by the emulated FoM. It can also compare
per-band survey metrics between simulation versions.
 */

mod cli;
pub mod comparison;
pub mod constants;
pub mod emulator;
pub mod grid;
pub mod io;
mod params;
pub mod plotting;
pub mod ranking;

// Re-exports.
pub use cli::{SurveyFom, SurveyFomError};
pub use emulator::{Evaluation, Interpolant, OutOfBoundsPolicy};
pub use grid::{GridAxes, GridConfig, GridStore, PriorVariant, YearGrid, YearTag};
pub use ranking::{format_report, rank, RankKey, StrategyRecord};
