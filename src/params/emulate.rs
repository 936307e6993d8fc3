// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use itertools::Itertools;
use log::{debug, info, warn};
use ndarray::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::{
    emulator::{EmulatorError, Interpolant, OutOfBoundsPolicy},
    grid::{GridConfig, GridError, GridStore, PriorVariant, YearGrid, YearTag},
    io::{load_strategy_table, load_year_grid, strategy_table_path, LoadError},
    plotting::{DrawError, PlotAdapter, ScatterPlot},
    ranking::{format_report, rank, RankKey, StrategyRecord, REPORT_HEADER},
};

/// Everything that controls emulation, built once per run.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct EmulatorConfig {
    pub(crate) grid: GridConfig,
    pub(crate) policy: OutOfBoundsPolicy,
    pub(crate) rank_key: RankKey,
    /// The number of samples along each axis of the "finer" diagnostic plots.
    pub(crate) refine: usize,
}

pub(crate) struct EmulateParams {
    pub(crate) config: EmulatorConfig,
    pub(crate) prior_dir: PathBuf,
    pub(crate) noprior_dir: PathBuf,
    pub(crate) strategy_dir: PathBuf,
}

/// The ranked strategies of one year.
#[derive(Debug, Clone)]
pub(crate) struct YearReport {
    pub(crate) tag: YearTag,
    pub(crate) ranked: Vec<StrategyRecord>,
    /// Plots written for this year.
    pub(crate) artifacts: Vec<PathBuf>,
    /// Strategies outside the year's design grid.
    pub(crate) out_of_domain: Vec<String>,
}

#[derive(Debug)]
pub(crate) struct YearFailure {
    pub(crate) tag: YearTag,
    pub(crate) error: EmulateError,
}

/// Reports for every year that worked and the errors of every year that didn't,
/// both in configured order.
#[derive(Debug)]
pub(crate) struct EmulateOutcome {
    pub(crate) reports: Vec<YearReport>,
    pub(crate) failures: Vec<YearFailure>,
}

impl EmulateOutcome {
    /// Turn the outcome into an error if any year failed.
    pub(crate) fn into_result(self) -> Result<Vec<YearReport>, EmulateError> {
        if self.failures.is_empty() {
            return Ok(self.reports);
        }
        let num_years = self.reports.len() + self.failures.len();
        Err(EmulateError::YearsFailed {
            num_failed: self.failures.len(),
            num_years,
            details: self
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.tag, f.error))
                .join("\n"),
        })
    }
}

impl EmulateParams {
    /// Load every year's grids, emulate every year's strategies and rank them.
    /// Years are independent; one failing doesn't stop the others.
    pub(crate) fn run(
        &self,
        plotter: Option<&dyn PlotAdapter>,
    ) -> Result<EmulateOutcome, EmulateError> {
        let EmulatorConfig {
            grid: grid_config,
            policy,
            rank_key,
            refine,
        } = &self.config;
        debug!(
            "Emulator configuration: {}",
            serde_json::to_string(&self.config).unwrap_or_default()
        );
        if *refine < 2 {
            return Err(EmulatorError::RefinedGridTooSmall {
                n_area: *refine,
                n_depth: *refine,
            }
            .into());
        }
        let tags = grid_config.tags();
        info!("Emulating years {}", tags.iter().join(", "));

        // Load all grids up front.
        let loaded: Vec<Result<YearGrid, YearFailure>> = tags
            .par_iter()
            .map(|tag| {
                self.load_year(grid_config, tag, &tags)
                    .map_err(|error| YearFailure {
                        tag: tag.clone(),
                        error,
                    })
            })
            .collect();
        let mut failures = vec![];
        let mut grids = vec![];
        for result in loaded {
            match result {
                Ok(grid) => grids.push(grid),
                Err(failure) => {
                    warn!("Skipping year {}: {}", failure.tag, failure.error);
                    failures.push(failure);
                }
            }
        }
        let store = GridStore::new(grids)?;

        let emulated: Vec<Result<YearReport, YearFailure>> = store
            .grids()
            .par_iter()
            .map(|grid| {
                self.emulate_year(
                    grid,
                    grid_config.reference_area(),
                    *policy,
                    *rank_key,
                    *refine,
                    plotter,
                )
                .map_err(|error| YearFailure {
                    tag: grid.tag().clone(),
                    error,
                })
            })
            .collect();
        let mut reports = vec![];
        for result in emulated {
            match result {
                Ok(report) => {
                    log_report(&report);
                    reports.push(report);
                }
                Err(failure) => {
                    warn!("Year {} failed: {}", failure.tag, failure.error);
                    failures.push(failure);
                }
            }
        }
        // Report failures in configured order too.
        failures.sort_by_key(|f| tags.iter().position(|t| t == &f.tag));

        Ok(EmulateOutcome { reports, failures })
    }

    fn load_year(
        &self,
        grid_config: &GridConfig,
        tag: &YearTag,
        all_tags: &[YearTag],
    ) -> Result<YearGrid, EmulateError> {
        let axes = grid_config
            .axes(tag)
            .ok_or_else(|| GridError::NoAxesForYear(tag.to_string()))?;
        let fom_prior = load_year_grid(&self.prior_dir, tag, all_tags, PriorVariant::Included)?;
        let fom_noprior =
            load_year_grid(&self.noprior_dir, tag, all_tags, PriorVariant::Excluded)?;
        debug!("Year {tag} prior FoMs:\n{fom_prior}");
        debug!("Year {tag} no-prior FoMs:\n{fom_noprior}");
        Ok(YearGrid::new(tag.clone(), *axes, fom_prior, fom_noprior)?)
    }

    fn emulate_year(
        &self,
        grid: &YearGrid,
        reference_area: f64,
        policy: OutOfBoundsPolicy,
        rank_key: RankKey,
        refine: usize,
        plotter: Option<&dyn PlotAdapter>,
    ) -> Result<YearReport, EmulateError> {
        let tag = grid.tag();
        let mut records = load_strategy_table(&strategy_table_path(&self.strategy_dir, tag))?;

        let mut artifacts = vec![];
        if let Some(plotter) = plotter {
            for plot in sanity_plots(grid, reference_area) {
                artifacts.push(plotter.scatter(&plot)?);
            }
        }

        let points: Vec<(f64, f64)> = records.iter().map(|r| (r.area, r.depth)).collect();
        let mut out_of_domain = vec![];
        for variant in PriorVariant::iter() {
            let interp = Interpolant::fit(
                grid.area_axis(),
                grid.depth_axis(),
                grid.fom(variant),
                policy,
            )?;
            let evaluations = interp.evaluate_many(&points)?;
            for (record, evaluation) in records.iter_mut().zip(evaluations) {
                record.set_fom(variant, evaluation.value);
                if !evaluation.in_domain && variant == PriorVariant::Included {
                    warn!(
                        "Year {tag}: strategy '{}' (area {}, depth {}) is outside the design grid; its FoMs are {}",
                        record.name,
                        record.area,
                        record.depth,
                        match policy {
                            OutOfBoundsPolicy::Clamp => "taken from the nearest grid edge",
                            OutOfBoundsPolicy::Extrapolate => "extrapolated",
                        }
                    );
                    out_of_domain.push(record.name.clone());
                }
            }

            if let Some(plotter) = plotter {
                artifacts.push(plotter.scatter(&ratio_plot(grid, variant, &interp))?);
                let finer = finer_plot(grid, variant, &interp, &points, refine)?;
                artifacts.push(plotter.scatter(&finer)?);
            }
        }

        let ranked = rank(records, |r| rank_key.key(r));
        Ok(YearReport {
            tag: tag.clone(),
            ranked,
            artifacts,
            out_of_domain,
        })
    }
}

fn log_report(report: &YearReport) {
    info!("Emulated from best to worst in year {}", report.tag);
    info!("{REPORT_HEADER}");
    for line in format_report(&report.ranked) {
        info!("{line}");
    }
    if !report.artifacts.is_empty() {
        info!("Wrote {:?}", report.artifacts);
    }
}

/// The grid values of both variants, with and without the area scaling
/// removed, all on one colour scale.
fn sanity_plots(grid: &YearGrid, reference_area: f64) -> Vec<ScatterPlot> {
    let tag = grid.tag();
    let (areas, depths) = grid.mesh();
    let max = grid.display_max(reference_area);
    let mut plots = vec![];
    for variant in PriorVariant::iter() {
        for rescaled in [false, true] {
            let (fom, suffix, note) = if rescaled {
                (
                    grid.rescaled_fom(variant, reference_area),
                    "_rescaled",
                    format!(", area scaling removed ({reference_area} deg^2)"),
                )
            } else {
                (grid.fom(variant).to_owned(), "", String::new())
            };
            plots.push(ScatterPlot {
                file_stem: format!("fom_emulator_{tag}_{variant}{suffix}"),
                title: format!("{tag} FoM, {}{note}", variant.description()),
                x_label: "Area [deg^2]".to_string(),
                y_label: "Median i-band depth".to_string(),
                x: areas.iter().copied().collect(),
                y: depths.iter().copied().collect(),
                colour: fom.iter().map(|f| f / max).collect(),
                overlay: vec![],
            });
        }
    }
    plots
}

/// Emulated / stored FoM at the grid points, shifted by 0.5 to sit in the
/// middle of the colour scale.
fn ratio_plot(grid: &YearGrid, variant: PriorVariant, interp: &Interpolant) -> ScatterPlot {
    let (areas, depths) = grid.mesh();
    ScatterPlot {
        file_stem: format!("test_{variant}_{}_ratio", grid.tag()),
        title: format!("{} emulator ratio - 0.5, {}", grid.tag(), variant.description()),
        x_label: "Area [deg^2]".to_string(),
        y_label: "Median i-band depth".to_string(),
        x: areas.iter().copied().collect(),
        y: depths.iter().copied().collect(),
        colour: interp.self_consistency_ratio().iter().map(|r| r - 0.5).collect(),
        overlay: vec![],
    }
}

fn extent<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// The emulator on a lattice spanning the strategies, with the strategies drawn
/// on top. If the strategies don't span a 2D region, the lattice spans the
/// design grid instead.
fn finer_plot(
    grid: &YearGrid,
    variant: PriorVariant,
    interp: &Interpolant,
    points: &[(f64, f64)],
    refine: usize,
) -> Result<ScatterPlot, EmulatorError> {
    let (a0, a1) = extent(points.iter().map(|p| p.0));
    let (d0, d1) = extent(points.iter().map(|p| p.1));

    let (areas, depths, values) = if a1 > a0 && d1 > d0 {
        let areas = Array1::linspace(a0, a1, refine).to_vec();
        let depths = Array1::linspace(d0, d1, refine).to_vec();
        let values = interp.evaluate_on_axes(&areas, &depths)?.mapv(|e| e.value);
        (areas, depths, values)
    } else {
        let (a0, a1) = interp.area_range();
        let (d0, d1) = interp.depth_range();
        (
            Array1::linspace(a0, a1, refine).to_vec(),
            Array1::linspace(d0, d1, refine).to_vec(),
            interp.evaluate_refined_grid(refine, refine)?,
        )
    };
    let max = values.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));

    let mut x = Vec::with_capacity(values.len());
    let mut y = Vec::with_capacity(values.len());
    let mut colour = Vec::with_capacity(values.len());
    for ((i, j), &v) in values.indexed_iter() {
        x.push(areas[i]);
        y.push(depths[j]);
        colour.push(v / max);
    }

    Ok(ScatterPlot {
        file_stem: format!("test_{variant}_{}_finer", grid.tag()),
        title: format!("{} emulator / max, {}", grid.tag(), variant.description()),
        x_label: "Area [deg^2]".to_string(),
        y_label: "Median i-band depth".to_string(),
        x,
        y,
        colour,
        overlay: points.to_vec(),
    })
}

#[derive(Error, Debug)]
pub(crate) enum EmulateError {
    #[error("{num_failed} of {num_years} years failed:\n{details}")]
    YearsFailed {
        num_failed: usize,
        num_years: usize,
        details: String,
    },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Emulator(#[from] EmulatorError),

    #[error(transparent)]
    Draw(#[from] DrawError),
}
