// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::*;

fn scatter() -> ScatterPlot {
    ScatterPlot {
        file_stem: "fom_emulator_Y1_prior".to_string(),
        title: "Y1".to_string(),
        x_label: "Area".to_string(),
        y_label: "Depth".to_string(),
        x: vec![1.0, 2.0, 3.0],
        y: vec![4.0, 5.0, 6.0],
        colour: vec![0.0, 0.5, 1.0],
        overlay: vec![],
    }
}

#[test]
fn test_scatter_validation() {
    assert!(scatter().validate().is_ok());

    let mut plot = scatter();
    plot.colour.pop();
    assert!(matches!(
        plot.validate(),
        Err(DrawError::LengthMismatch { what: "colour", got: 2, expected: 3, .. })
    ));

    let mut plot = scatter();
    plot.x.clear();
    plot.y.clear();
    plot.colour.clear();
    assert!(matches!(plot.validate(), Err(DrawError::NoData(_))));
    // Overlay points alone are enough.
    plot.overlay.push((1.0, 1.0));
    assert!(plot.validate().is_ok());
}

#[test]
fn test_histogram_validation() {
    let mut plot = HistogramPlot {
        file_stem: "compare".to_string(),
        title: "compare".to_string(),
        x_label: "seeing".to_string(),
        bin_edges: vec![0.0, 1.0, 2.0],
        panels: vec![HistogramPanel {
            title: "v1".to_string(),
            series: vec![HistogramSeries {
                label: "u".to_string(),
                band: "u".to_string(),
                counts: vec![3, 4],
            }],
        }],
    };
    assert!(plot.validate().is_ok());

    plot.panels[0].series[0].counts.push(1);
    assert!(matches!(
        plot.validate(),
        Err(DrawError::LengthMismatch { got: 3, expected: 2, .. })
    ));

    plot.bin_edges = vec![0.0];
    assert!(matches!(plot.validate(), Err(DrawError::NoData(_))));
}

#[test]
fn test_colour_ramp() {
    assert_eq!(colour_ramp(0.0), (215, 48, 39));
    assert_eq!(colour_ramp(0.5), (255, 255, 191));
    assert_eq!(colour_ramp(1.0), (69, 117, 180));
    assert_eq!(colour_ramp(-3.0), colour_ramp(0.0));
    assert_eq!(colour_ramp(7.0), colour_ramp(1.0));
    assert_eq!(colour_ramp(f64::NAN), (160, 160, 160));
}

#[cfg(not(feature = "plotting"))]
#[test]
fn test_no_plotting_feature() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(matches!(
        default_plotter(dir.path()),
        Err(DrawError::NoPlottingFeature)
    ));
}

#[cfg(feature = "plotting")]
#[test]
fn test_bitmap_plotter_rejects_bad_input_without_writing() {
    let dir = tempfile::TempDir::new().unwrap();
    let plotter = BitmapPlotter::new(&dir.path().join("figs")).unwrap();
    assert!(dir.path().join("figs").is_dir());

    let mut plot = scatter();
    plot.y.pop();
    assert!(plotter.scatter(&plot).is_err());
    assert!(!dir.path().join("figs").join("fom_emulator_Y1_prior.png").exists());
}
