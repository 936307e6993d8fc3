// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Continuous FoM emulation from a coarse design grid.
//!
//! An [`Interpolant`] is a piecewise-bilinear surface over the raw (area,
//! depth) coordinates of a grid. It reproduces the grid values exactly at the
//! grid points. Queries outside the axis box are handled according to an
//! [`OutOfBoundsPolicy`] and are always flagged, never silently turned into
//! NaN.

mod error;

pub use error::EmulatorError;

use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// What to do with a query outside the closed axis box of the grid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OutOfBoundsPolicy {
    /// Move the query to the nearest point on the edge of the axis box.
    #[default]
    Clamp,

    /// Extend the edge cell's bilinear form linearly.
    Extrapolate,
}

/// The result of evaluating an [`Interpolant`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub value: f64,

    /// Was the query inside the closed axis box?
    pub in_domain: bool,
}

/// A bilinear interpolant over one FoM grid.
#[derive(Debug, Clone)]
pub struct Interpolant {
    areas: Vec<f64>,
    depths: Vec<f64>,
    /// Indexed `[(area_rank, depth_rank)]`.
    values: Array2<f64>,
    policy: OutOfBoundsPolicy,
}

/// The cell to interpolate in along an axis and the fractional position in it.
struct AxisLocation {
    lower: usize,
    t: f64,
    inside: bool,
}

fn check_axis(axis: &'static str, values: &[f64]) -> Result<(), EmulatorError> {
    if values.len() < 2 {
        return Err(EmulatorError::AxisTooShort {
            axis,
            len: values.len(),
        });
    }
    if !values.iter().all(|v| v.is_finite()) || values.windows(2).any(|w| w[0] >= w[1]) {
        return Err(EmulatorError::AxisNotIncreasing {
            axis,
            values: values.to_vec(),
        });
    }
    Ok(())
}

fn locate(axis: &[f64], x: f64, policy: OutOfBoundsPolicy) -> AxisLocation {
    let n = axis.len();
    let first = axis[0];
    let last = axis[n - 1];
    let inside = (first..=last).contains(&x);

    let x = match policy {
        OutOfBoundsPolicy::Clamp => x.clamp(first, last),
        OutOfBoundsPolicy::Extrapolate => x,
    };
    // The index of the upper node of the cell containing x; edge cells are used
    // for points beyond the axis.
    let upper = axis.partition_point(|&a| a <= x).clamp(1, n - 1);
    let lower = upper - 1;
    let t = (x - axis[lower]) / (axis[upper] - axis[lower]);
    AxisLocation { lower, t, inside }
}

impl Interpolant {
    pub fn fit(
        area_axis: &[f64],
        depth_axis: &[f64],
        fom: ArrayView2<f64>,
        policy: OutOfBoundsPolicy,
    ) -> Result<Interpolant, EmulatorError> {
        if fom.dim() != (area_axis.len(), depth_axis.len()) {
            return Err(EmulatorError::ShapeMismatch {
                shape: fom.dim(),
                num_areas: area_axis.len(),
                num_depths: depth_axis.len(),
            });
        }
        check_axis("area", area_axis)?;
        check_axis("depth", depth_axis)?;
        if let Some((index, &value)) = fom.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(EmulatorError::NonFiniteValue { index, value });
        }

        Ok(Interpolant {
            areas: area_axis.to_vec(),
            depths: depth_axis.to_vec(),
            values: fom.to_owned(),
            policy,
        })
    }

    pub fn policy(&self) -> OutOfBoundsPolicy {
        self.policy
    }

    pub fn area_range(&self) -> (f64, f64) {
        (self.areas[0], self.areas[self.areas.len() - 1])
    }

    pub fn depth_range(&self) -> (f64, f64) {
        (self.depths[0], self.depths[self.depths.len() - 1])
    }

    pub fn evaluate(&self, area: f64, depth: f64) -> Result<Evaluation, EmulatorError> {
        if !area.is_finite() || !depth.is_finite() {
            return Err(EmulatorError::NonFiniteQuery { area, depth });
        }
        Ok(self.interpolate(area, depth))
    }

    /// `area` and `depth` must be finite.
    fn interpolate(&self, area: f64, depth: f64) -> Evaluation {
        let a = locate(&self.areas, area, self.policy);
        let d = locate(&self.depths, depth, self.policy);
        let v = &self.values;
        let (i, j) = (a.lower, d.lower);
        let value = (1.0 - a.t) * (1.0 - d.t) * v[(i, j)]
            + a.t * (1.0 - d.t) * v[(i + 1, j)]
            + (1.0 - a.t) * d.t * v[(i, j + 1)]
            + a.t * d.t * v[(i + 1, j + 1)];

        Evaluation {
            value,
            in_domain: a.inside && d.inside,
        }
    }

    /// Evaluate at each (area, depth) pair. Any non-finite query fails the
    /// whole batch.
    pub fn evaluate_many(&self, points: &[(f64, f64)]) -> Result<Vec<Evaluation>, EmulatorError> {
        points
            .iter()
            .map(|&(area, depth)| self.evaluate(area, depth))
            .collect()
    }

    /// Evaluate on every (area, depth) combination of the given axes. The
    /// result is indexed `[(area_index, depth_index)]`.
    pub fn evaluate_on_axes(
        &self,
        areas: &[f64],
        depths: &[f64],
    ) -> Result<Array2<Evaluation>, EmulatorError> {
        if let Some(&area) = areas.iter().find(|a| !a.is_finite()) {
            return Err(EmulatorError::NonFiniteQuery { area, depth: 0.0 });
        }
        if let Some(&depth) = depths.iter().find(|d| !d.is_finite()) {
            return Err(EmulatorError::NonFiniteQuery { area: 0.0, depth });
        }

        Ok(Array2::from_shape_fn((areas.len(), depths.len()), |(i, j)| {
            self.interpolate(areas[i], depths[j])
        }))
    }

    /// Evaluate on an `n_area` x `n_depth` lattice evenly spanning the grid's
    /// axis extents.
    pub fn evaluate_refined_grid(
        &self,
        n_area: usize,
        n_depth: usize,
    ) -> Result<Array2<f64>, EmulatorError> {
        if n_area < 2 || n_depth < 2 {
            return Err(EmulatorError::RefinedGridTooSmall { n_area, n_depth });
        }
        let (a0, a1) = self.area_range();
        let (d0, d1) = self.depth_range();
        let areas = Array1::linspace(a0, a1, n_area).to_vec();
        let depths = Array1::linspace(d0, d1, n_depth).to_vec();
        let evals = self.evaluate_on_axes(&areas, &depths)?;
        Ok(evals.mapv(|e| e.value))
    }

    /// Emulated / stored FoM at each grid point. All ones, up to floating-point
    /// error, for a correctly-built interpolant.
    pub fn self_consistency_ratio(&self) -> Array2<f64> {
        Array2::from_shape_fn(self.values.dim(), |(i, j)| {
            self.interpolate(self.areas[i], self.depths[j]).value / self.values[(i, j)]
        })
    }
}
