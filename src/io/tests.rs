// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{
    fs::File,
    io::{Cursor, Write},
    path::Path,
};

use approx::assert_abs_diff_eq;
use indoc::indoc;
use tempfile::TempDir;

use super::{fom::read_fom_grid, strategy_table::read_strategy_table, *};
use crate::grid::{PriorVariant, YearTag};

fn tags(tags: &[&str]) -> Vec<YearTag> {
    tags.iter().map(|t| YearTag::new(*t).unwrap()).collect()
}

fn write_file(dir: &Path, name: &str, contents: &str) {
    let mut f = File::create(dir.join(name)).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
}

/// A FoM file whose prior values are 1..=9 and no-prior values are 0.1..=0.9.
fn fom_file_contents() -> String {
    let mut s = String::new();
    for n in 1..=9 {
        s.push_str(&format!("FoM_incl_{n} = {n}.0\n"));
        s.push_str(&format!("FoM_excl_{n} = 0.{n}\n"));
    }
    s
}

#[test]
fn test_find_year_file_disambiguates_prefixes() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "foo_Y1_bar.txt", "");
    write_file(dir.path(), "foo_Y10_bar.txt", "");
    let all = tags(&["Y1", "Y10"]);

    let result = find_year_file(dir.path(), &all[0], &all);
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    assert_eq!(result.unwrap(), dir.path().join("foo_Y1_bar.txt"));

    let result = find_year_file(dir.path(), &all[1], &all);
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    assert_eq!(result.unwrap(), dir.path().join("foo_Y10_bar.txt"));
}

#[test]
fn test_find_year_file_missing() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "foo_Y1_bar.txt", "");
    let all = tags(&["Y1", "Y3"]);

    let result = find_year_file(dir.path(), &all[1], &all);
    match result {
        Err(LoadError::MissingFile(MissingInput::YearFile { tag, .. })) => {
            assert_eq!(tag.as_str(), "Y3")
        }
        _ => panic!("Expected a MissingFile error, got {result:?}"),
    }
}

#[test]
fn test_find_year_file_ambiguous() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a_Y3.txt", "");
    write_file(dir.path(), "b_Y3.txt", "");
    let all = tags(&["Y3"]);

    let result = find_year_file(dir.path(), &all[0], &all);
    match result {
        Err(LoadError::AmbiguousFile { files, .. }) => assert_eq!(files.len(), 2),
        _ => panic!("Expected an AmbiguousFile error, got {result:?}"),
    }
}

#[test]
fn test_find_year_file_ignores_hidden_files() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "FoM_Y1.txt", "");
    write_file(dir.path(), ".FoM_Y1.txt.swp", "");
    let all = tags(&["Y1", "Y3", "Y6", "Y10"]);

    let result = find_year_file(dir.path(), &all[0], &all);
    assert!(result.is_ok(), "{result:?}");
    assert_eq!(result.unwrap(), dir.path().join("FoM_Y1.txt"));
}

#[test]
fn test_find_year_file_missing_directory() {
    let dir = TempDir::new().unwrap();
    let all = tags(&["Y1"]);
    let result = find_year_file(&dir.path().join("nope"), &all[0], &all);
    assert!(matches!(result, Err(LoadError::MissingDirectory(_))));
}

#[test]
fn test_read_fom_grid_ordering() {
    let path = Path::new("test.txt");
    let result = read_fom_grid(Cursor::new(fom_file_contents()), path, PriorVariant::Included);
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    let grid = result.unwrap();
    // Area varies fastest.
    assert_abs_diff_eq!(grid[(0, 0)], 1.0);
    assert_abs_diff_eq!(grid[(1, 0)], 2.0);
    assert_abs_diff_eq!(grid[(2, 0)], 3.0);
    assert_abs_diff_eq!(grid[(0, 1)], 4.0);
    assert_abs_diff_eq!(grid[(2, 2)], 9.0);

    let result = read_fom_grid(Cursor::new(fom_file_contents()), path, PriorVariant::Excluded);
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    let grid = result.unwrap();
    assert_abs_diff_eq!(grid[(0, 0)], 0.1);
    assert_abs_diff_eq!(grid[(1, 2)], 0.8);
}

#[test]
fn test_read_fom_grid_wrong_count() {
    let path = Path::new("test.txt");
    let eight = fom_file_contents()
        .lines()
        .filter(|l| !l.starts_with("FoM_incl_9"))
        .fold(String::new(), |acc, l| acc + l + "\n");
    let result = read_fom_grid(Cursor::new(eight), path, PriorVariant::Included);
    match result {
        Err(LoadError::GridSize { count, expected, .. }) => {
            assert_eq!(count, 8);
            assert_eq!(expected, 9);
        }
        _ => panic!("Expected a GridSize error, got {result:?}"),
    }

    let ten = fom_file_contents() + "FoM_incl_10 = 10.0\n";
    let result = read_fom_grid(Cursor::new(ten), path, PriorVariant::Included);
    assert!(matches!(result, Err(LoadError::GridSize { count: 10, .. })));
    // The other variant is unaffected.
    let ten = fom_file_contents() + "FoM_incl_10 = 10.0\n";
    assert!(read_fom_grid(Cursor::new(ten), path, PriorVariant::Excluded).is_ok());
}

#[test]
fn test_read_fom_grid_malformed_line() {
    let path = Path::new("test.txt");
    let contents = indoc! {"
        # header, ignored
        FoM_incl = 1.0
        FoM_incl = oops
    "};
    let result = read_fom_grid(Cursor::new(contents), path, PriorVariant::Included);
    match result {
        Err(LoadError::MalformedLine { line_num, .. }) => assert_eq!(line_num, 3),
        _ => panic!("Expected a MalformedLine error, got {result:?}"),
    }

    let contents = "FoM_excl = 1.0 = 2.0\n";
    let result = read_fom_grid(Cursor::new(contents), path, PriorVariant::Excluded);
    assert!(matches!(result, Err(LoadError::MalformedLine { line_num: 1, .. })));

    let contents = "FoM_excl 1.0\n";
    let result = read_fom_grid(Cursor::new(contents), path, PriorVariant::Excluded);
    assert!(matches!(result, Err(LoadError::MalformedLine { line_num: 1, .. })));
}

#[test]
fn test_load_grid_from_directory() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "FoM_Y1.txt", &fom_file_contents());
    write_file(dir.path(), "FoM_Y10.txt", &fom_file_contents());
    let all = tags(&["Y1", "Y10"]);

    let result = load_grid(dir.path(), PriorVariant::Included, &all);
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    let grids = result.unwrap();
    assert_eq!(grids.len(), 2);
    assert_eq!(grids.keys().cloned().collect::<Vec<_>>(), all);
    assert_abs_diff_eq!(grids[&all[1]][(2, 2)], 9.0);
}

#[test]
fn test_read_strategy_table() {
    let path = Path::new("strategy_table_Y1.txt");
    let contents = indoc! {"
        | baseline_v2.0 | x | 12000.5 | 25.8 |

        | rolling_mod6  | x | 14000.0 | 26.0 |
        | footprint_big | x | 18000.0 | 25.4 |
    "};
    let result = read_strategy_table(Cursor::new(contents), path);
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    let records = result.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].name, "baseline_v2.0");
    assert_abs_diff_eq!(records[0].area, 12000.5);
    assert_abs_diff_eq!(records[0].depth, 25.8);
    assert_eq!(records[2].name, "footprint_big");
    assert!(records.iter().all(|r| r.fom_prior.is_none() && r.fom_noprior.is_none()));
}

#[test]
fn test_read_strategy_table_bad_rows() {
    let path = Path::new("strategy_table_Y1.txt");

    let result = read_strategy_table(Cursor::new("| name | x | 12000.0\n"), path);
    assert!(matches!(result, Err(LoadError::MalformedRow { line_num: 1, .. })));

    let contents = indoc! {"
        | good | x | 12000.0 | 25.8 |
        | bad  | x | twelve  | 25.8 |
    "};
    let result = read_strategy_table(Cursor::new(contents), path);
    match result {
        Err(LoadError::MalformedRow { line_num, reason, .. }) => {
            assert_eq!(line_num, 2);
            assert!(reason.contains("area"), "{reason}");
        }
        _ => panic!("Expected a MalformedRow error, got {result:?}"),
    }

    let result = read_strategy_table(Cursor::new("| bad | x | -5 | 25.8 |\n"), path);
    assert!(matches!(result, Err(LoadError::MalformedRow { .. })));

    let result = read_strategy_table(Cursor::new("| bad | x | 12000 | inf |\n"), path);
    assert!(matches!(result, Err(LoadError::MalformedRow { .. })));
}

#[test]
fn test_strategy_table_path_and_missing_table() {
    let dir = TempDir::new().unwrap();
    let tag = YearTag::new("Y6").unwrap();
    let path = strategy_table_path(dir.path(), &tag);
    assert_eq!(path, dir.path().join("strategy_table_Y6.txt"));

    let result = load_strategy_table(&path);
    assert!(matches!(
        result,
        Err(LoadError::MissingFile(MissingInput::StrategyTable(_)))
    ));

    write_file(dir.path(), "strategy_table_Y6.txt", "| a | x | 10000 | 25.0 |\n");
    let result = load_strategy_table(&path);
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    assert_eq!(result.unwrap().len(), 1);
}
