// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the file belonging to a survey year in a directory.

use std::path::{Path, PathBuf};

use glob::{glob_with, MatchOptions, Pattern};
use log::{debug, trace};

use super::{LoadError, MissingInput};
use crate::grid::YearTag;

/// Get all of the regular, non-hidden files directly inside `dir`.
pub(crate) fn get_all_files_in_dir(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::MissingDirectory(dir.to_path_buf()));
    }
    let dir_str = dir
        .to_str()
        .ok_or_else(|| LoadError::NonUtf8Path(dir.to_path_buf()))?;
    let g = format!("{}/*", Pattern::escape(dir_str));

    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..Default::default()
    };

    let mut entries = vec![];
    for entry in glob_with(&g, options)? {
        let entry = entry?;
        if entry.is_file() {
            entries.push(entry);
        }
    }
    entries.sort();
    Ok(entries)
}

/// Find the single file in `dir` whose name contains `tag` and none of the
/// other tags in `all_tags` that could be confused with it (see
/// [`YearTag::conflicts_with`]). Only file names are matched, not the
/// directory path.
pub fn find_year_file(
    dir: &Path,
    tag: &YearTag,
    all_tags: &[YearTag],
) -> Result<PathBuf, LoadError> {
    let conflicting: Vec<&YearTag> = all_tags.iter().filter(|t| tag.conflicts_with(t)).collect();
    trace!("Year {tag} conflicts with {conflicting:?}");

    let mut matches = vec![];
    for file in get_all_files_in_dir(dir)? {
        let name = match file.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };
        if !name.contains(tag.as_str()) {
            continue;
        }
        if let Some(other) = conflicting.iter().find(|t| name.contains(t.as_str())) {
            debug!("Ignoring '{}' for year {tag}; it also matches year {other}", file.display());
            continue;
        }
        matches.push(file);
    }

    match matches.len() {
        0 => Err(MissingInput::YearFile {
            tag: tag.clone(),
            dir: dir.to_path_buf(),
        }
        .into()),
        1 => {
            let file = matches.remove(0);
            debug!("Found file '{}' for year {tag} in '{}'", file.display(), dir.display());
            Ok(file)
        }
        _ => Err(LoadError::AmbiguousFile {
            tag: tag.clone(),
            dir: dir.to_path_buf(),
            files: matches,
        }),
    }
}
