// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Cursor;

use approx::assert_abs_diff_eq;
use indoc::indoc;

use super::*;

fn samples() -> MetricSamples {
    let json = indoc! {r#"
        {
            "v1.3": {
                "u": [0.9, 1.0, null, 1.1],
                "g": [0.8, 0.85, 0.9]
            },
            "v1.4": {
                "u": [0.95, 1.05, 1.2],
                "g": [0.7, null, 0.8]
            }
        }
    "#};
    MetricSamples::from_reader(Cursor::new(json)).unwrap()
}

fn config(metric: &str, order: &[&str]) -> ComparisonConfig {
    ComparisonConfig {
        metric: metric.to_string(),
        reference: "v1.3".to_string(),
        order: order.iter().map(|s| s.to_string()).collect(),
        kind: None,
        lower_limit: None,
        name: Some("baseline".to_string()),
    }
}

#[test]
fn test_samples_keep_file_order() {
    let s = samples();
    assert_eq!(s.versions().collect::<Vec<_>>(), ["v1.3", "v1.4"]);
    assert_eq!(s.0["v1.3"]["u"][2], None);
}

#[test]
fn test_median_comparison() {
    let result = compare(&samples(), &config("median seeing", &["v1.3", "v1.4"]));
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    let c = result.unwrap();
    assert_eq!(c.kind, SummaryKind::Median);

    let reference = &c.versions[0];
    assert_eq!(reference.version, "v1.3");
    assert_eq!(reference.bands[0].band, "u");
    assert_eq!(reference.bands[0].num_values, 3);
    assert_abs_diff_eq!(reference.bands[0].value, 1.0);
    assert_abs_diff_eq!(reference.bands[1].value, 0.85);
    assert!(reference.bands[0].difference.is_none());

    let other = &c.versions[1];
    assert_abs_diff_eq!(other.bands[0].value, 1.05);
    assert_abs_diff_eq!(other.bands[0].difference.unwrap(), -0.05, epsilon = 1e-12);
    // Even number of values.
    assert_abs_diff_eq!(other.bands[1].value, 0.75);
    assert!(other.bands[1].percent_difference.is_none());

    assert_eq!(reference.bands[0].label(c.kind, "v1.3"), "u: median 1.000");
    assert_eq!(
        other.bands[1].label(c.kind, "v1.3"),
        "g: median 0.750 (v1.3 - [0.100] )"
    );

    // Bins span min - 0.01 to max + 0.02 in steps of 0.01.
    assert_abs_diff_eq!(c.bin_edges[0], 0.69, epsilon = 1e-12);
    assert!(*c.bin_edges.last().unwrap() > 1.2);
    for v in &c.versions {
        for b in &v.bands {
            assert_eq!(b.counts.len(), c.bin_edges.len() - 1);
            assert_eq!(b.counts.iter().sum::<u64>(), b.num_values as u64);
        }
    }
}

#[test]
fn test_total_comparison() {
    let json = r#"{"ref": {"i": [10, 20, 30]}, "new": {"i": [10, 20, null, 40]}}"#;
    let samples = MetricSamples::from_reader(Cursor::new(json)).unwrap();
    let mut config = config("nvisits", &["ref", "new"]);
    config.reference = "ref".to_string();

    let c = compare(&samples, &config).unwrap();
    assert_eq!(c.kind, SummaryKind::Total);
    let new = &c.versions[1].bands[0];
    assert_abs_diff_eq!(new.value, 70.0);
    assert_abs_diff_eq!(new.difference.unwrap(), -10.0);
    assert_abs_diff_eq!(new.percent_difference.unwrap(), -100.0 / 6.0, epsilon = 1e-12);
    assert_eq!(new.label(c.kind, "ref"), "i: total 70 (ref - [-10]; -16.67% )");
    assert_eq!(c.versions[0].bands[0].label(c.kind, "ref"), "i: total 60");

    // Edges from 5 to 50 in steps of 5.
    assert_abs_diff_eq!(c.bin_edges[0], 5.0);
    assert_abs_diff_eq!(*c.bin_edges.last().unwrap(), 45.0);
    assert_eq!(c.bin_edges.len(), 9);
}

#[test]
fn test_lower_limit_drops_values() {
    let json = r#"{"a": {"r": [21.0, 22.5, 23.0]}}"#;
    let samples = MetricSamples::from_reader(Cursor::new(json)).unwrap();
    let mut config = config("dust depth", &["a"]);
    config.reference = "a".to_string();

    let c = compare(&samples, &config).unwrap();
    assert_abs_diff_eq!(c.bin_edges[0], 21.99, epsilon = 1e-12);
    let band = &c.versions[0].bands[0];
    // The median still uses every value; the histogram doesn't.
    assert_abs_diff_eq!(band.value, 22.5);
    assert_eq!(band.counts.iter().sum::<u64>(), 2);
}

#[test]
fn test_every_value_below_lower_limit() {
    let json = r#"{"a": {"r": [18.0, 19.5, 21.0]}, "b": {"r": [20.0, 20.5]}}"#;
    let samples = MetricSamples::from_reader(Cursor::new(json)).unwrap();
    let config = config("dust depth", &["a", "b"]);

    match compare(&samples, &config) {
        Err(ComparisonError::BelowLowerLimit {
            metric,
            lower_limit,
            max,
        }) => {
            assert_eq!(metric, "dust depth");
            assert_abs_diff_eq!(lower_limit, DUST_LOWER_LIMIT);
            assert_abs_diff_eq!(max, 21.0);
        }
        other => panic!("Expected a BelowLowerLimit error, got {other:?}"),
    }

    // An explicit limit below the values works.
    let mut config = config;
    config.lower_limit = Some(17.0);
    let c = compare(&samples, &config).unwrap();
    assert!(c.bin_edges.len() >= 2);
}

#[test]
fn test_comparison_errors() {
    let s = samples();
    assert!(matches!(
        compare(&s, &config("seeing", &["v1.4", "v1.3"])),
        Err(ComparisonError::ReferenceNotFirst { .. })
    ));
    assert!(matches!(
        compare(&s, &config("seeing", &["v1.3", "v9"])),
        Err(ComparisonError::UnknownVersion(v)) if v == "v9"
    ));
    assert!(matches!(
        compare(&s, &config("seeing", &[])),
        Err(ComparisonError::NoVersions)
    ));

    let json = r#"{"v1.3": {"u": [null]}}"#;
    let empty = MetricSamples::from_reader(Cursor::new(json)).unwrap();
    assert!(matches!(
        compare(&empty, &config("seeing", &["v1.3"])),
        Err(ComparisonError::EmptyBand { .. })
    ));

    let json = r#"{"v1.3": {"u": [1.0]}, "v1.4": {"z": [1.0]}}"#;
    let mismatched = MetricSamples::from_reader(Cursor::new(json)).unwrap();
    assert!(matches!(
        compare(&mismatched, &config("seeing", &["v1.3", "v1.4"])),
        Err(ComparisonError::MissingReferenceBand { .. })
    ));

    let json = r#"{"v1.3": {"u": [0.0, 1e9]}}"#;
    let wide = MetricSamples::from_reader(Cursor::new(json)).unwrap();
    assert!(matches!(
        compare(&wide, &config("seeing", &["v1.3"])),
        Err(ComparisonError::TooManyBins { .. })
    ));
}

#[test]
fn test_histogram_plot_layout() {
    let c = compare(&samples(), &config("median seeing", &["v1.3", "v1.4"])).unwrap();
    let plot = c.histogram_plot();
    assert_eq!(plot.file_stem, "compare-hists_baseline_median-seeing");
    assert_eq!(plot.panels.len(), 2);
    assert_eq!(plot.panels[1].title, "v1.4");
    assert_eq!(plot.panels[0].series.len(), 2);
    assert_eq!(plot.panels[0].series[1].band, "g");
    assert!(plot.validate().is_ok());
    assert_eq!(c.report_lines().len(), 4);
}

#[test]
fn test_histogram_edges() {
    let edges = [0.0, 1.0, 2.0];
    assert_eq!(histogram(&[0.0, 0.5, 1.0, 2.0, 2.5, -1.0], &edges), [2, 2]);
    assert_eq!(arange(0.0, 1.0, 0.25), [0.0, 0.25, 0.5, 0.75]);
    assert_abs_diff_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
}
