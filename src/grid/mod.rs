// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! FoM design grids.
//!
//! Each survey year has a 3x3 grid of FoM values over (area, depth), once with
//! the Stage III prior folded in and once without. Grids are indexed
//! `[(area_rank, depth_rank)]`. The axes always come from configuration; they
//! are never inferred from the FoM files.

mod error;

pub use error::GridError;

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::constants::{DEFAULT_AREAS, DEFAULT_DEPTHS, DEFAULT_YEAR_TAGS, GRID_SIZE};

/// A survey-epoch label, e.g. "Y1" or "Y10".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearTag(String);

impl YearTag {
    pub fn new<S: Into<String>>(tag: S) -> Result<YearTag, GridError> {
        let tag = tag.into();
        if tag.is_empty() || tag.chars().any(char::is_whitespace) {
            return Err(GridError::InvalidYearTag(tag));
        }
        Ok(YearTag(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Would a file name containing `other` be mistaken for one belonging to
    /// this tag? "Y1" conflicts with "Y10", but "Y10" doesn't conflict with
    /// "Y1", because every "Y10" file name necessarily contains "Y1".
    pub fn conflicts_with(&self, other: &YearTag) -> bool {
        self != other && !self.0.contains(other.as_str())
    }
}

impl fmt::Display for YearTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for YearTag {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        YearTag::new(s)
    }
}

impl TryFrom<String> for YearTag {
    type Error = GridError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        YearTag::new(s)
    }
}

impl From<YearTag> for String {
    fn from(tag: YearTag) -> String {
        tag.0
    }
}

/// Whether external (Stage III) prior constraints are folded into a FoM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum PriorVariant {
    #[strum(serialize = "prior")]
    Included,

    #[strum(serialize = "noprior")]
    Excluded,
}

impl PriorVariant {
    pub fn from_prior(prior: bool) -> PriorVariant {
        if prior {
            PriorVariant::Included
        } else {
            PriorVariant::Excluded
        }
    }

    /// The substring identifying this variant's lines in a FoM file.
    pub fn marker(self) -> &'static str {
        match self {
            PriorVariant::Included => "incl",
            PriorVariant::Excluded => "excl",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PriorVariant::Included => "with Stage III prior",
            PriorVariant::Excluded => "no prior",
        }
    }
}

impl From<bool> for PriorVariant {
    fn from(prior: bool) -> Self {
        PriorVariant::from_prior(prior)
    }
}

/// The area [deg^2] and median depth [mag] values of a design grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridAxes {
    pub areas: [f64; GRID_SIZE],
    pub depths: [f64; GRID_SIZE],
}

impl GridAxes {
    pub fn new(
        tag: &YearTag,
        areas: [f64; GRID_SIZE],
        depths: [f64; GRID_SIZE],
    ) -> Result<GridAxes, GridError> {
        for (axis, values) in [("area", &areas), ("depth", &depths)] {
            let increasing = values.iter().all(|v| v.is_finite())
                && values.windows(2).all(|w| w[0] < w[1]);
            if !increasing {
                return Err(GridError::BadAxis {
                    tag: tag.to_string(),
                    axis,
                    values: values.to_vec(),
                });
            }
        }
        Ok(GridAxes { areas, depths })
    }

    /// The design-grid axes of a year in [`DEFAULT_YEAR_TAGS`].
    pub fn default_for(tag: &YearTag) -> Option<GridAxes> {
        DEFAULT_YEAR_TAGS
            .iter()
            .position(|&t| t == tag.as_str())
            .map(|i| GridAxes {
                areas: DEFAULT_AREAS[i],
                depths: DEFAULT_DEPTHS[i],
            })
    }
}

/// The years to process and their design-grid axes, in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct GridConfig {
    years: IndexMap<YearTag, GridAxes>,
    reference_area: f64,
}

impl GridConfig {
    pub fn new(years: Vec<(YearTag, GridAxes)>) -> Result<GridConfig, GridError> {
        let mut map = IndexMap::with_capacity(years.len());
        for (tag, axes) in years {
            let axes = GridAxes::new(&tag, axes.areas, axes.depths)?;
            if map.contains_key(&tag) {
                return Err(GridError::DuplicateYear(tag.to_string()));
            }
            map.insert(tag, axes);
        }

        // Area rescaling is relative to the middle area of the second year, or
        // the first if there is only one.
        let reference_area = match (map.get_index(0), map.get_index(1)) {
            (_, Some((_, axes))) | (Some((_, axes)), None) => axes.areas[GRID_SIZE / 2],
            (None, None) => return Err(GridError::NoYears),
        };

        Ok(GridConfig {
            years: map,
            reference_area,
        })
    }

    /// Use the default axes for each of the given tags. Tags without default
    /// axes are an error.
    pub fn with_default_axes(tags: Vec<YearTag>) -> Result<GridConfig, GridError> {
        let years = tags
            .into_iter()
            .map(|tag| match GridAxes::default_for(&tag) {
                Some(axes) => Ok((tag, axes)),
                None => Err(GridError::NoAxesForYear(tag.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        GridConfig::new(years)
    }

    pub fn tags(&self) -> Vec<YearTag> {
        self.years.keys().cloned().collect()
    }

    pub fn axes(&self, tag: &YearTag) -> Option<&GridAxes> {
        self.years.get(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&YearTag, &GridAxes)> {
        self.years.iter()
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// The area used to remove survey-area scaling from FoMs for display.
    pub fn reference_area(&self) -> f64 {
        self.reference_area
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        let years = DEFAULT_YEAR_TAGS
            .iter()
            .zip(DEFAULT_AREAS.iter().zip(DEFAULT_DEPTHS.iter()))
            .map(|(tag, (&areas, &depths))| (YearTag(tag.to_string()), GridAxes { areas, depths }))
            .collect::<IndexMap<_, _>>();
        GridConfig {
            years,
            reference_area: DEFAULT_AREAS[1][GRID_SIZE / 2],
        }
    }
}

/// Both FoM variants of a single year on its design grid.
#[derive(Debug, Clone, PartialEq)]
pub struct YearGrid {
    tag: YearTag,
    axes: GridAxes,
    fom_prior: Array2<f64>,
    fom_noprior: Array2<f64>,
}

impl YearGrid {
    pub fn new(
        tag: YearTag,
        axes: GridAxes,
        fom_prior: Array2<f64>,
        fom_noprior: Array2<f64>,
    ) -> Result<YearGrid, GridError> {
        let axes = GridAxes::new(&tag, axes.areas, axes.depths)?;
        for (variant, fom) in [
            (PriorVariant::Included, &fom_prior),
            (PriorVariant::Excluded, &fom_noprior),
        ] {
            if fom.dim() != (GRID_SIZE, GRID_SIZE) {
                return Err(GridError::BadShape {
                    tag: tag.to_string(),
                    variant: variant.to_string(),
                    shape: fom.dim(),
                    expected: GRID_SIZE,
                });
            }
            if let Some(((area_rank, depth_rank), &value)) =
                fom.indexed_iter().find(|(_, v)| !v.is_finite())
            {
                return Err(GridError::NonFiniteFom {
                    tag: tag.to_string(),
                    variant: variant.to_string(),
                    area_rank,
                    depth_rank,
                    value,
                });
            }
        }

        Ok(YearGrid {
            tag,
            axes,
            fom_prior,
            fom_noprior,
        })
    }

    pub fn tag(&self) -> &YearTag {
        &self.tag
    }

    pub fn axes(&self) -> &GridAxes {
        &self.axes
    }

    pub fn area_axis(&self) -> &[f64; GRID_SIZE] {
        &self.axes.areas
    }

    pub fn depth_axis(&self) -> &[f64; GRID_SIZE] {
        &self.axes.depths
    }

    pub fn fom(&self, variant: PriorVariant) -> ArrayView2<f64> {
        match variant {
            PriorVariant::Included => self.fom_prior.view(),
            PriorVariant::Excluded => self.fom_noprior.view(),
        }
    }

    pub fn cell(&self, variant: PriorVariant, area_rank: usize, depth_rank: usize) -> Option<f64> {
        self.fom(variant).get((area_rank, depth_rank)).copied()
    }

    /// The area and depth of every cell, laid out like the FoM grids.
    pub fn mesh(&self) -> (Array2<f64>, Array2<f64>) {
        let areas = Array2::from_shape_fn((GRID_SIZE, GRID_SIZE), |(i, _)| self.axes.areas[i]);
        let depths = Array2::from_shape_fn((GRID_SIZE, GRID_SIZE), |(_, j)| self.axes.depths[j]);
        (areas, depths)
    }

    /// FoM with the survey-area scaling removed, i.e. FoM * reference_area /
    /// area. This is for display only; emulation always uses the raw grid.
    pub fn rescaled_fom(&self, variant: PriorVariant, reference_area: f64) -> Array2<f64> {
        let mut rescaled = self.fom(variant).to_owned();
        for (mut row, &area) in rescaled.outer_iter_mut().zip(self.axes.areas.iter()) {
            row.mapv_inplace(|f| f * reference_area / area);
        }
        rescaled
    }

    /// A common colour-scale maximum for the raw and rescaled grids of both
    /// variants.
    pub fn display_max(&self, reference_area: f64) -> f64 {
        [PriorVariant::Included, PriorVariant::Excluded]
            .into_iter()
            .flat_map(|v| {
                let raw = self.fom(v).fold(f64::NEG_INFINITY, |acc, &f| acc.max(f));
                let rescaled = self
                    .rescaled_fom(v, reference_area)
                    .fold(f64::NEG_INFINITY, |acc, &f| acc.max(f));
                [raw, rescaled]
            })
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Every successfully-loaded year's grid, in processing order.
#[derive(Debug, Clone, Default)]
pub struct GridStore {
    grids: Vec<YearGrid>,
}

impl GridStore {
    pub fn new(grids: Vec<YearGrid>) -> Result<GridStore, GridError> {
        for (i, grid) in grids.iter().enumerate() {
            if grids[..i].iter().any(|g| g.tag == grid.tag) {
                return Err(GridError::DuplicateYear(grid.tag.to_string()));
            }
        }
        Ok(GridStore { grids })
    }

    pub fn get(&self, tag: &YearTag) -> Option<&YearGrid> {
        self.grids.iter().find(|g| &g.tag == tag)
    }

    pub fn grids(&self) -> &[YearGrid] {
        &self.grids
    }

    pub fn tags(&self) -> impl Iterator<Item = &YearTag> {
        self.grids.iter().map(|g| &g.tag)
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}
