// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs;

use tempfile::TempDir;

use crate::{get_cmd_output, survey_fom, write_fom_file, write_strategy_table};

/// FoM grids and strategy tables go in separate directories, because strategy
/// table names contain year tags too.
pub(crate) fn setup(years: &[&str]) -> (TempDir, String, String) {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let foms = tmp_dir.path().join("FoM");
    let strategies = tmp_dir.path().join("strategies");
    fs::create_dir(&foms).unwrap();
    fs::create_dir(&strategies).unwrap();
    for year in years {
        write_fom_file(&foms, year);
    }
    write_strategy_table(
        &strategies,
        "Y1",
        &[
            ("shallow_wide", 15000.0, 25.0),
            ("deep_narrow", 8000.0, 25.4),
            ("baseline", 12000.0, 25.2),
        ],
    );
    write_strategy_table(
        &strategies,
        "Y10",
        &[("baseline", 18000.0, 26.6), ("rolling", 14000.0, 26.4)],
    );
    let foms = foms.display().to_string();
    let strategies = strategies.display().to_string();
    (tmp_dir, foms, strategies)
}

#[test]
fn test_emulate_ranks_every_year() {
    let (_tmp_dir, foms, strategies) = setup(&["Y1", "Y10"]);

    #[rustfmt::skip]
    let cmd = survey_fom()
        .args([
            "emulate",
            "--prior-dir", &foms,
            "--noprior-dir", &foms,
            "--strategy-dir", &strategies,
            "--years", "Y1", "Y10",
        ])
        .ok();
    assert!(cmd.is_ok(), "emulate failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);

    assert!(stdout.contains("Emulated from best to worst in year Y1"), "{stdout}");
    assert!(stdout.contains("Emulated from best to worst in year Y10"), "{stdout}");
    // shallow_wide: 150 + 100 = 250; baseline: 120 + 120 = 240;
    // deep_narrow: 80 + 140 = 220.
    let shallow = stdout.find("shallow_wide").unwrap();
    let baseline = stdout.find("baseline").unwrap();
    let deep = stdout.find("deep_narrow").unwrap();
    assert!(shallow < baseline && baseline < deep, "{stdout}");
    assert!(stdout.contains("survey-fom emulate complete."), "{stdout}");
}

#[test]
fn test_emulate_missing_year_fails_but_reports_others() {
    let (_tmp_dir, foms, strategies) = setup(&["Y1"]);

    #[rustfmt::skip]
    let cmd = survey_fom()
        .args([
            "emulate",
            "--prior-dir", &foms,
            "--noprior-dir", &foms,
            "--strategy-dir", &strategies,
            "--years", "Y1", "Y3",
        ])
        .ok();
    assert!(cmd.is_err());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stdout.contains("Emulated from best to worst in year Y1"), "{stdout}");
    assert!(stderr.contains("1 of 2 years failed"), "{stderr}");
    assert!(stderr.contains("Y3"), "{stderr}");
}

#[test]
fn test_emulate_dry_run() {
    let (_tmp_dir, foms, strategies) = setup(&[]);

    #[rustfmt::skip]
    let cmd = survey_fom()
        .args([
            "emulate",
            "--prior-dir", &foms,
            "--noprior-dir", &foms,
            "--strategy-dir", &strategies,
            "--plot",
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "dry run failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run -- exiting now."), "{stdout}");
}

#[test]
fn test_emulate_save_toml_reproduces_run() {
    let (tmp_dir, foms, strategies) = setup(&["Y1"]);
    let toml = tmp_dir.path().join("args.toml");
    let toml_str = toml.display().to_string();

    #[rustfmt::skip]
    let cmd = survey_fom()
        .args([
            "emulate",
            "--prior-dir", &foms,
            "--noprior-dir", &foms,
            "--strategy-dir", &strategies,
            "--years", "Y1",
            "--rank-by", "prior",
            "--save-toml", &toml_str,
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", cmd.err().unwrap());
    let saved = fs::read_to_string(&toml).unwrap();
    assert!(saved.contains("rank_by = \"prior\""), "{saved}");

    let cmd = survey_fom().args(["emulate", &toml_str]).ok();
    assert!(cmd.is_ok(), "{}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Ranking by: prior"), "{stdout}");
    assert!(stdout.contains("Emulated from best to worst in year Y1"), "{stdout}");
}

#[test]
fn test_emulate_bad_fom_file() {
    let (tmp_dir, foms, strategies) = setup(&[]);
    fs::write(
        tmp_dir.path().join("FoM").join("fom_results_Y1.txt"),
        "FoM_incl_0 = 1.0\nFoM_incl_1 = oops\n",
    )
    .unwrap();

    #[rustfmt::skip]
    let cmd = survey_fom()
        .args([
            "emulate",
            "--prior-dir", &foms,
            "--noprior-dir", &foms,
            "--strategy-dir", &strategies,
            "--years", "Y1",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error:"), "{stderr}");
    assert!(stderr.contains("line 2"), "{stderr}");
}
