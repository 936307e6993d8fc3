// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Read strategy tables.
//!
//! Rows are '|' delimited. Counting fields from 1, field 2 is the strategy
//! name, field 4 the realised survey area [deg^2] and field 5 the realised
//! median i-band depth [mag]. A row like "| name | x | 12000.5 | 25.8 |" is
//! valid, as the leading '|' produces an empty first field.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use log::info;

use super::{LoadError, MissingInput};
use crate::{constants::STRATEGY_TABLE_MIN_FIELDS, grid::YearTag, ranking::StrategyRecord};

/// The conventional location of a year's strategy table in `dir`.
pub fn strategy_table_path(dir: &Path, tag: &YearTag) -> PathBuf {
    dir.join(format!("strategy_table_{tag}.txt"))
}

/// Read all strategies in a table. The emulated FoMs of the returned records
/// are unset.
pub fn load_strategy_table(path: &Path) -> Result<Vec<StrategyRecord>, LoadError> {
    if !path.exists() {
        return Err(MissingInput::StrategyTable(path.to_path_buf()).into());
    }
    let file = File::open(path).map_err(|e| LoadError::IO(path.to_path_buf(), e))?;
    let records = read_strategy_table(BufReader::new(file), path)?;
    info!(
        "Strategy table loaded: {} lines in '{}'",
        records.len(),
        path.display()
    );
    Ok(records)
}

pub(crate) fn read_strategy_table<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<Vec<StrategyRecord>, LoadError> {
    let mut records = vec![];
    for (i_line, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| LoadError::IO(path.to_path_buf(), e))?;
        if line.trim().is_empty() {
            continue;
        }
        let malformed = |reason: String| LoadError::MalformedRow {
            path: path.to_path_buf(),
            line_num: i_line + 1,
            reason,
        };

        let fields: Vec<&str> = line.split('|').map(str::trim).collect();
        if fields.len() < STRATEGY_TABLE_MIN_FIELDS {
            return Err(malformed(format!(
                "expected at least {STRATEGY_TABLE_MIN_FIELDS} '|'-separated fields, found {}",
                fields.len()
            )));
        }

        let name = fields[1];
        if name.is_empty() {
            return Err(malformed("the strategy name is empty".to_string()));
        }
        let area = parse_field(fields[3], "area").map_err(malformed)?;
        if area <= 0.0 {
            return Err(malformed(format!("the area must be positive, got {area}")));
        }
        let depth = parse_field(fields[4], "median depth").map_err(malformed)?;

        records.push(StrategyRecord::new(name, area, depth));
    }

    Ok(records)
}

fn parse_field(field: &str, what: &str) -> Result<f64, String> {
    match field.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        Ok(f) => Err(format!("the {what} ({f}) is not finite")),
        Err(_) => Err(format!("couldn't parse the {what} '{field}' as a float")),
    }
}
