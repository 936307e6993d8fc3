// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod compare;
mod emulate;
mod no_stderr;

use std::{fs::File, io::Write, path::Path, process::Output, str::from_utf8};

use assert_cmd::{output::OutputError, Command};

use survey_fom::{GridAxes, YearTag};

fn survey_fom() -> Command {
    Command::cargo_bin("survey-fom").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// A FoM that grows with both area and depth.
fn prior_fom(area: f64, depth: f64) -> f64 {
    area / 100.0 + 100.0 * (depth - 24.0)
}

/// Write `fom_results_<year>.txt` into `dir` with both FoM variants on the
/// year's default axes. The FoM without the prior is a third of the FoM with
/// it.
fn write_fom_file(dir: &Path, year: &str) {
    let tag = YearTag::new(year).unwrap();
    let axes = GridAxes::default_for(&tag).unwrap();
    let mut f = File::create(dir.join(format!("fom_results_{year}.txt"))).unwrap();
    for n in 0..9 {
        let fom = prior_fom(axes.areas[n % 3], axes.depths[n / 3]);
        writeln!(f, "FoM_incl_{n} = {fom}").unwrap();
        writeln!(f, "FoM_excl_{n} = {}", fom / 3.0).unwrap();
    }
}

fn write_strategy_table(dir: &Path, year: &str, rows: &[(&str, f64, f64)]) {
    let mut f = File::create(dir.join(format!("strategy_table_{year}.txt"))).unwrap();
    writeln!(f).unwrap();
    for (name, area, depth) in rows {
        writeln!(f, "| {name} | 0.7 | {area} | {depth} |").unwrap();
    }
}
