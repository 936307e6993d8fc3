// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs;

use tempfile::TempDir;

use crate::{get_cmd_output, survey_fom};

pub(crate) fn write_samples(tmp_dir: &TempDir) -> String {
    let path = tmp_dir.path().join("nvisits.json");
    fs::write(
        &path,
        r#"{
            "baseline_v1.5": {"u": [10, 20, 30], "g": [40, null, 60]},
            "baseline_v1.7": {"u": [5, 10, 15], "g": [50, 50, 50]}
        }"#,
    )
    .unwrap();
    path.display().to_string()
}

#[test]
fn test_compare_reports_differences() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let samples = write_samples(&tmp_dir);

    #[rustfmt::skip]
    let cmd = survey_fom()
        .args([
            "compare",
            "--samples", &samples,
            "--metric", "nvisits",
        ])
        .ok();
    assert!(cmd.is_ok(), "compare failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Comparing 'nvisits' against version baseline_v1.5"), "{stdout}");
    // u: 60 against 30.
    assert!(stdout.contains("u: total 30 (baseline_v1.5 - [30]; 50.00% )"), "{stdout}");
    assert!(stdout.contains("survey-fom compare complete."), "{stdout}");
}

#[test]
fn test_compare_unknown_version() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let samples = write_samples(&tmp_dir);

    #[rustfmt::skip]
    let cmd = survey_fom()
        .args([
            "compare",
            "--samples", &samples,
            "--metric", "nvisits",
            "--versions", "baseline_v1.5", "baseline_v2.0",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("baseline_v2.0"), "{stderr}");
    assert!(stderr.contains("survey-fom compare --help"), "{stderr}");
}
