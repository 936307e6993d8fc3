// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use itertools::Itertools;
use thiserror::Error;

use crate::grid::{PriorVariant, YearTag};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Directory '{}' doesn't exist", .0.display())]
    MissingDirectory(PathBuf),

    /// A required input file is absent.
    #[error(transparent)]
    MissingFile(#[from] MissingInput),

    #[error(
        "Year {tag} matched more than one file in directory '{}': {}",
        .dir.display(),
        .files.iter().map(|f| format!("'{}'", f.display())).join(", ")
    )]
    AmbiguousFile {
        tag: YearTag,
        dir: PathBuf,
        files: Vec<PathBuf>,
    },

    #[error("Expected exactly {expected} '{}' FoM lines in '{}', but found {count}", .variant.marker(), .path.display())]
    GridSize {
        path: PathBuf,
        variant: PriorVariant,
        count: usize,
        expected: usize,
    },

    #[error("'{}' line {line_num}: {reason}", .path.display())]
    MalformedLine {
        path: PathBuf,
        line_num: usize,
        reason: String,
    },

    #[error("'{}' row {line_num}: {reason}", .path.display())]
    MalformedRow {
        path: PathBuf,
        line_num: usize,
        reason: String,
    },

    #[error("Path '{}' contains invalid UTF-8", .0.display())]
    NonUtf8Path(PathBuf),

    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Glob(#[from] glob::GlobError),

    #[error("Couldn't read '{}': {1}", .0.display())]
    IO(PathBuf, #[source] std::io::Error),
}

/// Which required input is absent.
#[derive(Error, Debug)]
pub enum MissingInput {
    #[error("No file for year {tag} was found in directory '{}'", .dir.display())]
    YearFile { tag: YearTag, dir: PathBuf },

    #[error("Strategy table '{}' doesn't exist", .0.display())]
    StrategyTable(PathBuf),
}
