// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Order candidate strategies by emulated FoM and format them for reporting.


use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::grid::PriorVariant;

/// The header printed above a ranking report.
pub const REPORT_HEADER: &str =
    "Strategy, Area, median i-band depth, FoM without prior, FoM with prior";

/// A candidate observing strategy and its emulated FoMs.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRecord {
    pub name: String,
    /// Realised survey area [deg^2].
    pub area: f64,
    /// Realised median i-band depth [mag].
    pub depth: f64,
    pub fom_noprior: Option<f64>,
    pub fom_prior: Option<f64>,
}

impl StrategyRecord {
    pub fn new<S: Into<String>>(name: S, area: f64, depth: f64) -> StrategyRecord {
        StrategyRecord {
            name: name.into(),
            area,
            depth,
            fom_noprior: None,
            fom_prior: None,
        }
    }

    pub fn fom(&self, variant: PriorVariant) -> Option<f64> {
        match variant {
            PriorVariant::Included => self.fom_prior,
            PriorVariant::Excluded => self.fom_noprior,
        }
    }

    pub fn set_fom(&mut self, variant: PriorVariant, fom: f64) {
        match variant {
            PriorVariant::Included => self.fom_prior = Some(fom),
            PriorVariant::Excluded => self.fom_noprior = Some(fom),
        }
    }
}

/// Which emulated FoM strategies are ranked by.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub enum RankKey {
    #[default]
    #[strum(serialize = "noprior")]
    #[serde(rename = "noprior")]
    NoPrior,

    #[strum(serialize = "prior")]
    #[serde(rename = "prior")]
    Prior,
}

impl RankKey {
    pub fn variant(self) -> PriorVariant {
        match self {
            RankKey::NoPrior => PriorVariant::Excluded,
            RankKey::Prior => PriorVariant::Included,
        }
    }

    /// The ranking key of a record. Records without the FoM get NaN and so sort
    /// last.
    pub fn key(self, record: &StrategyRecord) -> f64 {
        record.fom(self.variant()).unwrap_or(f64::NAN)
    }
}

/// Sort `records` by descending `key`. Ties keep their input order, and so do
/// records with a NaN key, which all come after every other record.
pub fn rank<F>(mut records: Vec<StrategyRecord>, key: F) -> Vec<StrategyRecord>
where
    F: Fn(&StrategyRecord) -> f64,
{
    records.sort_by(|a, b| {
        let (ka, kb) = (key(a), key(b));
        match (ka.is_nan(), kb.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => kb.partial_cmp(&ka).unwrap_or(Ordering::Equal),
        }
    });
    records
}

fn format_fom(fom: Option<f64>) -> String {
    match fom {
        // Truncate towards zero like C's %d; -0.5 is "0", not "-0".
        Some(f) if f.is_finite() => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => "-".to_string(),
    }
}

/// One line per record: name (right-aligned, width 20), integer area, depth to
/// 2 decimal places, then the integer no-prior and prior FoMs. The header isn't
/// included; see [`REPORT_HEADER`].
pub fn format_report(ranked: &[StrategyRecord]) -> Vec<String> {
    ranked
        .iter()
        .map(|r| {
            format!(
                "{:>20} {} {:.2} {} {}",
                r.name,
                r.area.trunc(),
                r.depth,
                format_fom(r.fom_noprior),
                format_fom(r.fom_prior)
            )
        })
        .collect()
}
