// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Read FoM result files.
//!
//! Each year has one text file. Lines containing "incl" hold a FoM with the
//! Stage III prior included, lines containing "excl" a FoM without it. The value
//! is whatever follows the line's single '='. The n-th line of a variant
//! belongs to grid cell (n % 3, n / 3), i.e. area varies fastest.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use indexmap::IndexMap;
use log::{debug, trace};
use ndarray::prelude::*;

use super::{find_year_file, LoadError};
use crate::{
    constants::{GRID_SIZE, NUM_GRID_CELLS},
    grid::{PriorVariant, YearTag},
};

/// Load the `variant` FoM grid of every year in `tags` from `dir`. The first
/// year that can't be loaded aborts the whole load.
pub fn load_grid(
    dir: &Path,
    variant: PriorVariant,
    tags: &[YearTag],
) -> Result<IndexMap<YearTag, Array2<f64>>, LoadError> {
    tags.iter()
        .map(|tag| Ok((tag.clone(), load_year_grid(dir, tag, tags, variant)?)))
        .collect()
}

/// Load the `variant` FoM grid of a single year from `dir`. `all_tags` are all
/// of the years being processed, so that e.g. a "Y10" file isn't mistaken for a
/// "Y1" file.
pub fn load_year_grid(
    dir: &Path,
    tag: &YearTag,
    all_tags: &[YearTag],
    variant: PriorVariant,
) -> Result<Array2<f64>, LoadError> {
    let path = find_year_file(dir, tag, all_tags)?;
    let file = File::open(&path).map_err(|e| LoadError::IO(path.clone(), e))?;
    let grid = read_fom_grid(BufReader::new(file), &path, variant)?;
    debug!("Read {variant} FoMs for year {tag} from '{}'", path.display());
    Ok(grid)
}

pub(crate) fn read_fom_grid<R: BufRead>(
    reader: R,
    path: &Path,
    variant: PriorVariant,
) -> Result<Array2<f64>, LoadError> {
    let mut values = Vec::with_capacity(NUM_GRID_CELLS);
    for (i_line, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| LoadError::IO(path.to_path_buf(), e))?;
        if !line.contains(variant.marker()) {
            continue;
        }

        let value = parse_fom_line(&line).map_err(|reason| LoadError::MalformedLine {
            path: path.to_path_buf(),
            line_num: i_line + 1,
            reason,
        })?;
        values.push(value);
    }

    if values.len() != NUM_GRID_CELLS {
        return Err(LoadError::GridSize {
            path: path.to_path_buf(),
            variant,
            count: values.len(),
            expected: NUM_GRID_CELLS,
        });
    }

    let mut grid = Array2::zeros((GRID_SIZE, GRID_SIZE));
    for (n, value) in values.into_iter().enumerate() {
        let cell = (n % GRID_SIZE, n / GRID_SIZE);
        trace!("{variant} FoM line {n} -> (area rank {}, depth rank {})", cell.0, cell.1);
        grid[cell] = value;
    }
    Ok(grid)
}

fn parse_fom_line(line: &str) -> Result<f64, String> {
    let mut split = line.split('=');
    let value = match (split.next(), split.next(), split.next()) {
        (Some(_), Some(value), None) => value.trim(),
        (_, None, _) => return Err("no '=' separating the FoM value".to_string()),
        _ => return Err("more than one '=' on the line".to_string()),
    };
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        Ok(f) => Err(format!("FoM value {f} is not finite")),
        Err(_) => Err(format!("couldn't parse '{value}' as a float")),
    }
}
