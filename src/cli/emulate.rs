// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{borrow::Cow, path::PathBuf, str::FromStr};

use clap::Parser;
use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use thiserror::Error;

use super::common::{display_warnings, InfoPrinter, Warn, ARG_FILE_HELP};
use crate::{
    constants::{DEFAULT_FOM_DIR, DEFAULT_PLOT_DIR, DEFAULT_REFINE, DEFAULT_YEAR_TAGS, GRID_SIZE},
    emulator::OutOfBoundsPolicy,
    grid::{GridAxes, GridConfig, YearTag},
    params::{EmulateParams, EmulatorConfig},
    plotting::default_plotter,
    ranking::RankKey,
    SurveyFomError,
};

lazy_static::lazy_static! {
    static ref YEARS_HELP: String =
        format!("The survey years to emulate. Years other than the defaults need their axes given in an arguments file. [default: {}]", DEFAULT_YEAR_TAGS.join(" "));

    static ref RANK_BY_HELP: String =
        format!("Which FoM variant to rank strategies by. [default: {}] [possible values: {}]", RankKey::default(), RankKey::iter().join(", "));

    static ref REFINE_HELP: String =
        format!("The number of samples along each axis of the finer diagnostic plots. Must be at least 2. [default: {DEFAULT_REFINE}]");
}

/// The design-grid axes of a year, only settable in an arguments file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct AxesArgs {
    /// Survey areas [deg^2].
    pub(super) areas: Option<Vec<f64>>,

    /// Median depths [mag].
    pub(super) depths: Option<Vec<f64>>,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct EmulateArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// The directory containing the FoM grids computed with the Stage III
    /// prior. [default: FoM]
    #[clap(long, help_heading = "INPUT FILES")]
    pub(super) prior_dir: Option<PathBuf>,

    /// The directory containing the FoM grids computed without the Stage III
    /// prior. [default: FoM]
    #[clap(long, help_heading = "INPUT FILES")]
    pub(super) noprior_dir: Option<PathBuf>,

    /// The directory containing the strategy_table_<year>.txt files.
    /// [default: .]
    #[clap(long, help_heading = "INPUT FILES")]
    pub(super) strategy_dir: Option<PathBuf>,

    #[clap(short, long, multiple_values(true), help = YEARS_HELP.as_str(), help_heading = "EMULATION")]
    pub(super) years: Option<Vec<String>>,

    #[clap(skip)]
    pub(super) axes: Option<IndexMap<String, AxesArgs>>,

    /// Extrapolate the FoM linearly for strategies outside a year's design
    /// grid. The default is to clamp them to the grid's edges.
    #[clap(long, help_heading = "EMULATION")]
    #[serde(default)]
    pub(super) extrapolate: bool,

    #[clap(long, help = RANK_BY_HELP.as_str(), help_heading = "EMULATION")]
    pub(super) rank_by: Option<String>,

    /// Draw diagnostic plots of every year's grids and emulators.
    #[clap(long, help_heading = "PLOTTING")]
    #[serde(default)]
    pub(super) plot: bool,

    #[clap(long, help = REFINE_HELP.as_str(), help_heading = "PLOTTING")]
    pub(super) refine: Option<usize>,

    /// The directory to write plots into. [default: figs]
    #[clap(short, long, help_heading = "PLOTTING")]
    pub(super) output_directory: Option<PathBuf>,
}

impl EmulateArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<EmulateArgs, SurveyFomError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let EmulateArgs {
                args_file: _,
                prior_dir,
                noprior_dir,
                strategy_dir,
                years,
                axes,
                extrapolate,
                rank_by,
                plot,
                refine,
                output_directory,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(EmulateArgs {
                args_file: None,
                prior_dir: cli_args.prior_dir.or(prior_dir),
                noprior_dir: cli_args.noprior_dir.or(noprior_dir),
                strategy_dir: cli_args.strategy_dir.or(strategy_dir),
                years: cli_args.years.or(years),
                axes: cli_args.axes.or(axes),
                extrapolate: cli_args.extrapolate || extrapolate,
                rank_by: cli_args.rank_by.or(rank_by),
                plot: cli_args.plot || plot,
                refine: cli_args.refine.or(refine),
                output_directory: cli_args.output_directory.or(output_directory),
            })
        } else {
            Ok(cli_args)
        }
    }

    /// Make sense of the arguments. Returns the parameters and, if plots were
    /// requested, the directory to write them into.
    pub(super) fn parse(self) -> Result<(EmulateParams, Option<PathBuf>), SurveyFomError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            prior_dir,
            noprior_dir,
            strategy_dir,
            years,
            axes,
            extrapolate,
            rank_by,
            plot,
            refine,
            output_directory,
        } = self;

        let tags = match years {
            Some(years) => years
                .into_iter()
                .map(|y| YearTag::from_str(&y))
                .collect::<Result<Vec<_>, _>>()?,
            None => DEFAULT_YEAR_TAGS
                .iter()
                .map(|&y| YearTag::new(y))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let mut axes = axes.unwrap_or_default();
        let mut years = Vec::with_capacity(tags.len());
        for tag in tags {
            let year_axes = match axes.shift_remove(tag.as_str()) {
                Some(AxesArgs { areas, depths }) => {
                    let areas = axis_values(&tag, "areas", areas)?;
                    let depths = axis_values(&tag, "depths", depths)?;
                    GridAxes::new(&tag, areas, depths)?
                }
                None => GridAxes::default_for(&tag)
                    .ok_or_else(|| EmulateArgsError::NoAxes(tag.to_string()))?,
            };
            years.push((tag, year_axes));
        }
        for unused in axes.keys() {
            format!("Axes were given for year {unused}, but it isn't being emulated").warn();
        }
        let grid = GridConfig::new(years)?;

        let rank_key = match rank_by {
            Some(s) => RankKey::from_str(&s.to_lowercase())
                .map_err(|_| EmulateArgsError::InvalidRankKey(s))?,
            None => RankKey::default(),
        };
        let refine = refine.unwrap_or(DEFAULT_REFINE);
        if refine < 2 {
            return Err(EmulateArgsError::RefineTooSmall(refine).into());
        }
        let policy = if extrapolate {
            OutOfBoundsPolicy::Extrapolate
        } else {
            OutOfBoundsPolicy::Clamp
        };

        let prior_dir = prior_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_FOM_DIR));
        let noprior_dir = noprior_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_FOM_DIR));
        let strategy_dir = strategy_dir.unwrap_or_else(|| PathBuf::from("."));
        let plot_dir = match (plot, output_directory) {
            (true, dir) => Some(dir.unwrap_or_else(|| PathBuf::from(DEFAULT_PLOT_DIR))),
            (false, Some(dir)) => {
                format!(
                    "Output directory {} is ignored as --plot wasn't given",
                    dir.display()
                )
                .warn();
                None
            }
            (false, None) => None,
        };

        let mut printer = InfoPrinter::new("Emulating FoMs".into());
        printer.push_block(vec![
            format!("FoM grids with prior:    {}", prior_dir.display()).into(),
            format!("FoM grids without prior: {}", noprior_dir.display()).into(),
            format!("Strategy tables:         {}", strategy_dir.display()).into(),
        ]);
        let mut block: Vec<Cow<'static, str>> = vec![];
        for (tag, year_axes) in grid.iter() {
            block.push(
                format!(
                    "{tag}: areas {:?} deg^2, depths {:?} mag",
                    year_axes.areas, year_axes.depths
                )
                .into(),
            );
        }
        block.push(format!("Reference area: {} deg^2", grid.reference_area()).into());
        printer.push_block(block);
        printer.push_block(vec![
            format!("Out-of-grid strategies: {policy}").into(),
            format!("Ranking by: {rank_key}").into(),
        ]);
        match &plot_dir {
            Some(dir) => printer.push_line(
                format!("Plotting into {} (finer grids {refine}x{refine})", dir.display()).into(),
            ),
            None => printer.push_line("Not plotting".into()),
        }
        printer.display();
        display_warnings();

        Ok((
            EmulateParams {
                config: EmulatorConfig {
                    grid,
                    policy,
                    rank_key,
                    refine,
                },
                prior_dir,
                noprior_dir,
                strategy_dir,
            },
            plot_dir,
        ))
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), SurveyFomError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let (params, plot_dir) = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let plotter = match plot_dir {
            Some(dir) => Some(default_plotter(&dir)?),
            None => None,
        };
        params.run(plotter.as_deref())?.into_result()?;
        Ok(())
    }
}

fn axis_values(
    tag: &YearTag,
    axis: &'static str,
    values: Option<Vec<f64>>,
) -> Result<[f64; GRID_SIZE], EmulateArgsError> {
    let values = values.ok_or_else(|| EmulateArgsError::MissingAxis {
        tag: tag.to_string(),
        axis,
    })?;
    <[f64; GRID_SIZE]>::try_from(values.as_slice()).map_err(|_| EmulateArgsError::AxisLength {
        tag: tag.to_string(),
        axis,
        len: values.len(),
    })
}

#[derive(Error, Debug)]
pub(super) enum EmulateArgsError {
    #[error("No axes are known for year {0}; give them in an arguments file under [axes.{0}]")]
    NoAxes(String),

    #[error("Year {tag} was given axes without {axis}")]
    MissingAxis { tag: String, axis: &'static str },

    #[error("Year {tag} was given {len} {axis}, but exactly {GRID_SIZE} are needed")]
    AxisLength {
        tag: String,
        axis: &'static str,
        len: usize,
    },

    #[error("'{0}' is not a valid ranking key; use 'prior' or 'noprior'")]
    InvalidRankKey(String),

    #[error("The finer plots need at least 2 samples along each axis, but {0} was given")]
    RefineTooSmall(usize),
}
