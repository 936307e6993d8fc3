// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Compare a per-band survey metric across simulation versions.
//!
//! Every version is summarised per band (median or total of the unmasked
//! values) and differenced against a reference version. All versions and bands
//! share one set of histogram bins so their distributions can be drawn side by
//! side.

mod error;
#[cfg(test)]
mod tests;

pub use error::ComparisonError;

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    constants::{DUST_LOWER_LIMIT, MAX_HISTOGRAM_BINS},
    plotting::{HistogramPanel, HistogramPlot, HistogramSeries},
};

/// Metric values keyed by version then band. `None` is a masked value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSamples(pub IndexMap<String, IndexMap<String, Vec<Option<f64>>>>);

impl MetricSamples {
    /// Read samples from a JSON file shaped like
    /// `{"version": {"band": [value or null, ...]}}`.
    pub fn read_json(path: &Path) -> Result<MetricSamples, ComparisonError> {
        let file = File::open(path).map_err(|e| ComparisonError::IO(path.to_path_buf(), e))?;
        MetricSamples::from_reader(BufReader::new(file))
            .map_err(|e| ComparisonError::Json(path.to_path_buf(), e))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<MetricSamples, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }
}

/// How each band's values are summarised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    Median,

    /// For count-like metrics.
    Total,
}

impl SummaryKind {
    /// Count-like metrics are those with "nvisits" in their label.
    pub fn for_metric(metric: &str) -> SummaryKind {
        if metric.contains("nvisits") {
            SummaryKind::Total
        } else {
            SummaryKind::Median
        }
    }

    fn bin_width(self) -> f64 {
        match self {
            SummaryKind::Total => 5.0,
            SummaryKind::Median => 0.01,
        }
    }

    /// How far below the minimum and above the maximum the bin edges reach.
    fn bin_padding(self) -> (f64, f64) {
        match self {
            SummaryKind::Total => (5.0, 10.0),
            SummaryKind::Median => (0.01, 0.02),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonConfig {
    /// The metric label, e.g. "median seeing" or "nvisits".
    pub metric: String,

    /// The version everything is compared against.
    pub reference: String,

    /// The versions to compare, reference first.
    pub order: Vec<String>,

    /// If not given, this is determined from the metric label.
    pub kind: Option<SummaryKind>,

    /// Values below this are left out of the histograms. If not given, metrics
    /// with "dust" in their label use [`DUST_LOWER_LIMIT`].
    pub lower_limit: Option<f64>,

    /// Identifies the outputs.
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandSummary {
    pub band: String,
    pub value: f64,
    /// Reference summary minus this summary. `None` for the reference itself.
    pub difference: Option<f64>,
    /// The difference as a percentage of the reference. Only for totals.
    pub percent_difference: Option<f64>,
    pub num_values: usize,
    pub counts: Vec<u64>,
}

impl BandSummary {
    /// A legend entry for this band.
    pub fn label(&self, kind: SummaryKind, reference: &str) -> String {
        let band = &self.band;
        let value = self.value;
        match (kind, self.difference, self.percent_difference) {
            (SummaryKind::Median, None, _) => format!("{band}: median {value:.3}"),
            (SummaryKind::Median, Some(d), _) => {
                format!("{band}: median {value:.3} ({reference} - [{d:.3}] )")
            }
            (SummaryKind::Total, None, _) => format!("{band}: total {value:.0}"),
            (SummaryKind::Total, Some(d), p) => format!(
                "{band}: total {value:.0} ({reference} - [{d:.0}]; {:.2}% )",
                p.unwrap_or(f64::NAN)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VersionSummary {
    pub version: String,
    pub bands: Vec<BandSummary>,
}

/// The result of [`compare`].
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub metric: String,
    pub reference: String,
    pub kind: SummaryKind,
    pub name: Option<String>,
    pub bin_edges: Vec<f64>,
    pub versions: Vec<VersionSummary>,
}

impl Comparison {
    /// One line per (version, band), in version order.
    pub fn report_lines(&self) -> Vec<String> {
        self.versions
            .iter()
            .flat_map(|v| {
                v.bands
                    .iter()
                    .map(move |b| format!("{:>12} {}", v.version, b.label(self.kind, &self.reference)))
            })
            .collect()
    }

    pub fn file_stem(&self) -> String {
        let metric = self.metric.replace(' ', "-");
        match &self.name {
            Some(name) => format!("compare-hists_{name}_{metric}"),
            None => format!("compare-hists_{metric}"),
        }
    }

    /// One panel per version, one step histogram per band.
    pub fn histogram_plot(&self) -> HistogramPlot {
        HistogramPlot {
            file_stem: self.file_stem(),
            title: match &self.name {
                Some(name) => format!("{name}: {}", self.metric),
                None => self.metric.clone(),
            },
            x_label: self.metric.clone(),
            bin_edges: self.bin_edges.clone(),
            panels: self
                .versions
                .iter()
                .map(|v| HistogramPanel {
                    title: v.version.clone(),
                    series: v
                        .bands
                        .iter()
                        .map(|b| HistogramSeries {
                            label: b.label(self.kind, &self.reference),
                            band: b.band.clone(),
                            counts: b.counts.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

fn unmasked(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().filter(|v| !v.is_nan()).collect()
}

/// The median of non-empty `values`; even-length inputs give the mean of the
/// middle two.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Evenly spaced values in [start, stop), like numpy's `arange`.
fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let n = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Count `values` into the bins defined by `edges`. Bins are half-open except
/// for the last, which includes its upper edge. Values outside the edges aren't
/// counted.
fn histogram(values: &[f64], edges: &[f64]) -> Vec<u64> {
    let num_bins = edges.len().saturating_sub(1);
    let mut counts = vec![0; num_bins];
    if num_bins == 0 {
        return counts;
    }
    let (first, last) = (edges[0], edges[num_bins]);
    for &v in values {
        if v < first || v > last {
            continue;
        }
        let bin = edges.partition_point(|&e| e <= v).saturating_sub(1).min(num_bins - 1);
        counts[bin] += 1;
    }
    counts
}

fn bin_edges(
    metric: &str,
    kind: SummaryKind,
    min: f64,
    max: f64,
) -> Result<Vec<f64>, ComparisonError> {
    let (below, above) = kind.bin_padding();
    let width = kind.bin_width();
    let num_edges = ((max + above - (min - below)) / width).ceil().max(0.0) as usize;
    if num_edges > MAX_HISTOGRAM_BINS + 1 {
        return Err(ComparisonError::TooManyBins {
            metric: metric.to_string(),
            num_bins: num_edges.saturating_sub(1),
            max: MAX_HISTOGRAM_BINS,
        });
    }
    Ok(arange(min - below, max + above, width))
}

/// Summarise `config.metric` for every version in `config.order` and difference
/// each against the reference.
pub fn compare(
    samples: &MetricSamples,
    config: &ComparisonConfig,
) -> Result<Comparison, ComparisonError> {
    let first = config.order.first().ok_or(ComparisonError::NoVersions)?;
    if first != &config.reference {
        return Err(ComparisonError::ReferenceNotFirst {
            reference: config.reference.clone(),
            order: config.order.clone(),
        });
    }
    let kind = config
        .kind
        .unwrap_or_else(|| SummaryKind::for_metric(&config.metric));

    // Gather the unmasked values of every (version, band).
    let mut values: Vec<(&str, Vec<(&str, Vec<f64>)>)> = Vec::with_capacity(config.order.len());
    for version in &config.order {
        let bands = samples
            .0
            .get(version)
            .ok_or_else(|| ComparisonError::UnknownVersion(version.clone()))?;
        let mut band_values = Vec::with_capacity(bands.len());
        for (band, raw) in bands {
            let v = unmasked(raw);
            if v.is_empty() {
                return Err(ComparisonError::EmptyBand {
                    version: version.clone(),
                    band: band.clone(),
                });
            }
            band_values.push((band.as_str(), v));
        }
        values.push((version.as_str(), band_values));
    }

    // Shared binning.
    let (min, max) = values
        .iter()
        .flat_map(|(_, bands)| bands.iter().flat_map(|(_, v)| v.iter()))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let lower_limit = config
        .lower_limit
        .or_else(|| config.metric.contains("dust").then_some(DUST_LOWER_LIMIT));
    let min = lower_limit.unwrap_or(min);
    let edges = bin_edges(&config.metric, kind, min, max)?;
    if edges.len() < 2 {
        return Err(ComparisonError::BelowLowerLimit {
            metric: config.metric.clone(),
            lower_limit: min,
            max,
        });
    }
    debug!(
        "Comparing '{}' with {} bins of width {}",
        config.metric,
        edges.len().saturating_sub(1),
        kind.bin_width()
    );

    let summarise = |v: &[f64]| match kind {
        SummaryKind::Median => median(v),
        SummaryKind::Total => v.iter().sum(),
    };
    let reference: IndexMap<&str, f64> = values[0]
        .1
        .iter()
        .map(|(band, v)| (*band, summarise(v)))
        .collect();

    let mut versions = Vec::with_capacity(values.len());
    for (i_version, (version, bands)) in values.iter().enumerate() {
        let mut summaries = Vec::with_capacity(bands.len());
        for (band, v) in bands {
            let value = summarise(v);
            let (difference, percent_difference) = if i_version == 0 {
                (None, None)
            } else {
                let ref_value =
                    *reference
                        .get(band)
                        .ok_or_else(|| ComparisonError::MissingReferenceBand {
                            version: version.to_string(),
                            band: band.to_string(),
                        })?;
                let d = ref_value - value;
                let p = match kind {
                    SummaryKind::Total => Some(d / ref_value * 100.0),
                    SummaryKind::Median => None,
                };
                (Some(d), p)
            };
            summaries.push(BandSummary {
                band: band.to_string(),
                value,
                difference,
                percent_difference,
                num_values: v.len(),
                counts: histogram(v, &edges),
            });
        }
        versions.push(VersionSummary {
            version: version.to_string(),
            bands: summaries,
        });
    }

    Ok(Comparison {
        metric: config.metric.clone(),
        reference: config.reference.clone(),
        kind,
        name: config.name.clone(),
        bin_edges: edges,
        versions,
    })
}
