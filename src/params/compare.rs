// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::info;
use thiserror::Error;

use crate::{
    comparison::{compare, Comparison, ComparisonConfig, ComparisonError, MetricSamples},
    plotting::{DrawError, PlotAdapter},
};

pub(crate) struct CompareParams {
    pub(crate) samples: MetricSamples,
    pub(crate) config: ComparisonConfig,
}

impl CompareParams {
    /// Compare the metric across versions, log the summaries and, given a
    /// plotter, draw the histograms.
    pub(crate) fn run(
        &self,
        plotter: Option<&dyn PlotAdapter>,
    ) -> Result<(Comparison, Option<PathBuf>), CompareError> {
        let comparison = compare(&self.samples, &self.config)?;

        info!(
            "Comparing '{}' against version {}",
            comparison.metric, comparison.reference
        );
        for line in comparison.report_lines() {
            info!("{line}");
        }

        let artifact = match plotter {
            Some(plotter) => {
                let path = plotter.histograms(&comparison.histogram_plot())?;
                info!("Wrote {}", path.display());
                Some(path)
            }
            None => None,
        };
        Ok((comparison, artifact))
    }
}

#[derive(Error, Debug)]
pub(crate) enum CompareError {
    #[error(transparent)]
    Comparison(#[from] ComparisonError),

    #[error(transparent)]
    Draw(#[from] DrawError),
}
