// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::common::{display_warnings, InfoPrinter, Warn, ARG_FILE_HELP};
use crate::{
    comparison::{ComparisonConfig, MetricSamples, SummaryKind},
    constants::DEFAULT_PLOT_DIR,
    params::CompareParams,
    plotting::default_plotter,
    SurveyFomError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct CompareArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// A JSON file of metric values keyed by version, then band, e.g.
    /// {"v1.7": {"u": [1.2, null, ...], ...}, ...}. null values are masked.
    #[clap(short, long, help_heading = "INPUT FILES")]
    pub(super) samples: Option<PathBuf>,

    /// The label of the metric being compared, e.g. "median seeing". Labels
    /// containing "nvisits" are summarised by their total, others by their
    /// median.
    #[clap(short, long, help_heading = "COMPARISON")]
    pub(super) metric: Option<String>,

    /// The version everything is compared against. [default: the first
    /// version]
    #[clap(short, long, help_heading = "COMPARISON")]
    pub(super) reference: Option<String>,

    /// The versions to compare. [default: every version in the samples file,
    /// reference first]
    #[clap(long, multiple_values(true), help_heading = "COMPARISON")]
    pub(super) versions: Option<Vec<String>>,

    /// Override how bands are summarised. [possible values: median, total]
    #[clap(long, help_heading = "COMPARISON")]
    pub(super) summary: Option<String>,

    /// Values below this are left out of the histograms. Metrics with "dust"
    /// in their label default to 22.
    #[clap(long, help_heading = "COMPARISON")]
    pub(super) lower_limit: Option<f64>,

    /// A name to identify the outputs with.
    #[clap(short, long, help_heading = "COMPARISON")]
    pub(super) name: Option<String>,

    /// Draw the histograms of every version.
    #[clap(long, help_heading = "PLOTTING")]
    #[serde(default)]
    pub(super) plot: bool,

    /// The directory to write plots into. [default: figs]
    #[clap(short, long, help_heading = "PLOTTING")]
    pub(super) output_directory: Option<PathBuf>,
}

impl CompareArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    pub(super) fn merge(self) -> Result<CompareArgs, SurveyFomError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let CompareArgs {
                args_file: _,
                samples,
                metric,
                reference,
                versions,
                summary,
                lower_limit,
                name,
                plot,
                output_directory,
            } = unpack_arg_file!(arg_file);

            Ok(CompareArgs {
                args_file: None,
                samples: cli_args.samples.or(samples),
                metric: cli_args.metric.or(metric),
                reference: cli_args.reference.or(reference),
                versions: cli_args.versions.or(versions),
                summary: cli_args.summary.or(summary),
                lower_limit: cli_args.lower_limit.or(lower_limit),
                name: cli_args.name.or(name),
                plot: cli_args.plot || plot,
                output_directory: cli_args.output_directory.or(output_directory),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<(CompareParams, Option<PathBuf>), SurveyFomError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            samples,
            metric,
            reference,
            versions,
            summary,
            lower_limit,
            name,
            plot,
            output_directory,
        } = self;

        let samples_file = samples.ok_or(CompareArgsError::NoSamples)?;
        let metric = metric.ok_or(CompareArgsError::NoMetric)?;
        let kind = summary
            .map(|s| {
                SummaryKind::from_str(&s.to_lowercase())
                    .map_err(|_| CompareArgsError::InvalidSummary(s))
            })
            .transpose()?;
        let samples = MetricSamples::read_json(&samples_file)?;

        // Put the reference first; everything else keeps its order.
        let (reference, order) = match (reference, versions) {
            (Some(reference), Some(versions)) => (reference, versions),
            (None, Some(versions)) => {
                let reference = versions.first().cloned().ok_or(CompareArgsError::NoVersions)?;
                (reference, versions)
            }
            (reference, None) => {
                let reference = reference
                    .or_else(|| samples.versions().next().map(|v| v.to_string()))
                    .ok_or(CompareArgsError::NoVersions)?;
                let order = std::iter::once(reference.clone())
                    .chain(
                        samples
                            .versions()
                            .filter(|&v| v != reference)
                            .map(|v| v.to_string()),
                    )
                    .collect();
                (reference, order)
            }
        };

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

        let mut printer = InfoPrinter::new(format!("Comparing '{metric}'").into());
        printer.push_line(format!("Samples: {}", samples_file.display()).into());
        printer.push_block(vec![
            format!("Reference: {reference}").into(),
            format!("Versions:  {}", order.iter().join(", ")).into(),
        ]);
        if let Some(kind) = kind {
            printer.push_line(format!("Summarising by {kind}").into());
        }
        if let Some(dir) = &plot_dir {
            printer.push_line(format!("Plotting into {}", dir.display()).into());
        }
        printer.display();
        display_warnings();

        Ok((
            CompareParams {
                samples,
                config: ComparisonConfig {
                    metric,
                    reference,
                    order,
                    kind,
                    lower_limit,
                    name,
                },
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
        params.run(plotter.as_deref())?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub(super) enum CompareArgsError {
    #[error("No samples file was supplied")]
    NoSamples,

    #[error("No metric label was supplied")]
    NoMetric,

    #[error("There are no versions to compare")]
    NoVersions,

    #[error("'{0}' is not a valid summary; use 'median' or 'total'")]
    InvalidSummary(String),
}
