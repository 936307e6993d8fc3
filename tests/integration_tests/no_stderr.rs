// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests to ensure there is no stderr output for successful commands.

use tempfile::TempDir;

use crate::{compare::write_samples, emulate::setup, get_cmd_output, survey_fom};

#[test]
fn test_emulate_no_stderr() {
    let (_tmp_dir, foms, strategies) = setup(&["Y1", "Y10"]);

    #[rustfmt::skip]
    let cmd = survey_fom()
        .args([
            "emulate",
            "--prior-dir", &foms,
            "--noprior-dir", &foms,
            "--strategy-dir", &strategies,
            "--years", "Y1", "Y10",
            "-vv",
        ])
        .ok();
    assert!(cmd.is_ok(), "emulate failed: {}", cmd.err().unwrap());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}

#[test]
fn test_compare_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let samples = write_samples(&tmp_dir);

    #[rustfmt::skip]
    let cmd = survey_fom()
        .args([
            "compare",
            "--samples", &samples,
            "--metric", "nvisits",
            "--reference", "baseline_v1.7",
        ])
        .ok();
    assert!(cmd.is_ok(), "compare failed: {}", cmd.err().unwrap());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}
