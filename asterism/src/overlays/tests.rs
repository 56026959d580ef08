use super::*;
use crate::catalog::{BrightStar, Catalog, Constellation, DeepSkyObject, HdStar, UserPoint};
use crate::testing::{FixedAdvanceText, LinearProjector};

fn sky(x: f64, y: f64) -> SkyPoint {
    LinearProjector::sky_at(x, y)
}

fn star(name: &str, common: &str, x: f64, y: f64, vmag: f64) -> BrightStar {
    let p = sky(x, y);
    BrightStar {
        name: name.into(),
        common_name: common.into(),
        ra: p.ra,
        dec: p.dec,
        vmag,
    }
}

fn deep_sky(names: &[&str], x: f64, y: f64, size_arcmin: f64) -> DeepSkyObject {
    let p = sky(x, y);
    DeepSkyObject {
        names: names.iter().map(|n| n.to_string()).collect(),
        ra: p.ra,
        dec: p.dec,
        size_arcmin,
    }
}

fn run(
    config: &AnnotateConfig,
    draw: impl FnOnce(&mut Annotator<'_, LinearProjector>),
) -> (AnnotationOutput, LayeredCanvas, FixedAdvanceText) {
    let mut canvas = LayeredCanvas::new(200, 200, 1.0).unwrap();
    let mut text = FixedAdvanceText::default();
    let projector = LinearProjector::new();
    let output = {
        let mut annotator = Annotator::new(config, &projector, &mut canvas, &mut text);
        draw(&mut annotator);
        annotator.finish()
    };
    (output, canvas, text)
}

fn stars_catalog() -> Catalog {
    Catalog {
        bright_stars: vec![
            star("η Tau", "Alcyone", 50.0, 50.0, 2.87),
            star("20 Tau", "Maia", 60.0, 60.0, 3.87),
            star("β Tau", "", 150.0, 150.0, 1.65),
            star("α Tau", "Aldebaran", -10.0, -10.0, 0.87),
        ],
        ..Default::default()
    }
}

#[test]
fn test_bright_stars_skip_excluded_and_off_screen() {
    let config = AnnotateConfig::default();
    let catalog = stars_catalog();
    let (output, _, text) = run(&config, |a| a.draw_bright_stars(&catalog));

    assert_eq!(output.list, ["The star Alcyone (η Tau)", "The star β Tau"]);
    let drawn: Vec<&str> = text.drawn.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(drawn, ["Alcyone (η Tau)", "β Tau"]);

    let Annotation::Star { pixelx, pixely, name, names } = &output.annotations[0] else {
        panic!("expected a star annotation");
    };
    assert!((pixelx - 50.0).abs() < 1e-6 && (pixely - 50.0).abs() < 1e-6);
    assert_eq!(name, "Alcyone");
    assert_eq!(names, &["Alcyone", "η Tau"]);
}

#[test]
fn test_bright_star_label_sits_right_of_star_on_half_ascent() {
    let config = AnnotateConfig::default();
    let catalog = Catalog {
        bright_stars: vec![star("β Tau", "", 100.0, 100.0, 1.65)],
        ..Default::default()
    };
    let (_, _, text) = run(&config, |a| a.draw_bright_stars(&catalog));

    // Offset 15 right, then down by half the ascent (0.5 * 0.8 * 25).
    let origin = text.drawn[0].1;
    assert!((origin.x - 115.0).abs() < 1e-6);
    assert!((origin.y - 110.0).abs() < 1e-6);
}

#[test]
fn test_bright_star_limit_keeps_brightest() {
    let mut config = AnnotateConfig::default();
    config.bright_stars.limit = 1;
    let catalog = stars_catalog();
    let (output, _, _) = run(&config, |a| a.draw_bright_stars(&catalog));

    assert_eq!(output.list, ["The star β Tau"]);
}

#[test]
fn test_common_only_labels_proper_names() {
    let mut config = AnnotateConfig::default();
    config.bright_stars.common_only = true;
    let catalog = stars_catalog();
    let (output, _, text) = run(&config, |a| a.draw_bright_stars(&catalog));

    assert_eq!(output.list, ["The star Alcyone (η Tau)"]);
    assert_eq!(text.drawn[0].0, "Alcyone");
}

#[test]
fn test_excluded_names_are_configurable() {
    let mut config = AnnotateConfig::default();
    config.bright_stars.excluded_names.clear();
    let catalog = stars_catalog();
    let (output, _, _) = run(&config, |a| a.draw_bright_stars(&catalog));

    assert_eq!(output.list.len(), 3);
    assert_eq!(output.list[1], "The star Maia (20 Tau)");
}

#[test]
fn test_hd_label_is_centred_above_the_star() {
    let config = AnnotateConfig::default();
    let p = sky(100.0, 100.0);
    let catalog = Catalog {
        hd_stars: vec![
            HdStar { hd: 29139, ra: p.ra, dec: p.dec },
            HdStar { hd: 1, ra: p.ra + 40.0, dec: p.dec },
        ],
        ..Default::default()
    };
    let (output, _, _) = run(&config, |a| a.draw_hd_stars(&catalog));

    assert_eq!(output.list, ["HD 29139"]);
    let Annotation::Hd { pixelx, pixely, name } = &output.annotations[0] else {
        panic!("expected an HD annotation");
    };
    // "HD 29139" is 8 glyphs of 0.6 * 25; raised by marker radius plus 4.
    assert!((pixelx - (100.0 - 8.0 * 0.6 * 25.0 / 2.0)).abs() < 1e-6);
    assert!((pixely - (100.0 - 21.5)).abs() < 1e-6);
    assert_eq!(name, "HD 29139");
}

#[test]
fn test_deep_sky_filters_by_apparent_size() {
    let config = AnnotateConfig::default();
    let catalog = Catalog {
        deep_sky: vec![
            deep_sky(&["NGC 1976", "M 42"], 80.0, 80.0, 60.0),
            deep_sky(&["NGC 1977"], 120.0, 120.0, 1.0),
            deep_sky(&["NGC 1980"], 260.0, 120.0, 60.0),
        ],
        ..Default::default()
    };
    let (output, _, _) = run(&config, |a| a.draw_deep_sky(&catalog));

    assert_eq!(output.list, ["NGC 1976 / M 42"]);
    let Annotation::Ngc { names, radius, .. } = &output.annotations[0] else {
        panic!("expected an NGC annotation");
    };
    assert_eq!(names.len(), 2);
    assert!(*radius > 0.0);
}

#[test]
fn test_only_messier_drops_other_designations() {
    let mut config = AnnotateConfig::default();
    config.ngc.only_messier = true;
    let catalog = Catalog {
        deep_sky: vec![
            deep_sky(&["NGC 1976", "M 42"], 80.0, 80.0, 60.0),
            deep_sky(&["NGC 2024"], 120.0, 120.0, 60.0),
        ],
        ..Default::default()
    };
    let (output, _, _) = run(&config, |a| a.draw_deep_sky(&catalog));

    assert_eq!(output.list, ["M 42"]);
    assert_eq!(output.annotations.len(), 1);
}

#[test]
fn test_constellation_list_marks_partial_figures() {
    let config = AnnotateConfig::default();
    let catalog = Catalog {
        constellations: vec![
            Constellation {
                short_name: "Tau".into(),
                long_name: "Taurus".into(),
                lines: vec![[sky(30.0, 30.0), sky(60.0, 40.0)]],
            },
            Constellation {
                short_name: "Ori".into(),
                long_name: "Orion".into(),
                lines: vec![[sky(150.0, 150.0), sky(260.0, 260.0)]],
            },
        ],
        ..Default::default()
    };
    let (output, canvas, _) = run(&config, |a| a.draw_constellations(&catalog));

    assert_eq!(
        output.list,
        ["The constellation Taurus (Tau)", "Part of the constellation Orion (Ori)"]
    );
    assert_eq!(output.figures.groups, 2);
    assert_eq!(output.figures.segments_drawn, 2);
    assert!(canvas.surface(Layer::Shapes).iter().any(|c| c.a > 0.0));
}

#[test]
fn test_overlays_run_in_fixed_order() {
    let mut config = AnnotateConfig::default();
    config.constellations.enabled = true;
    config.bright_stars.enabled = true;
    let mut catalog = stars_catalog();
    catalog.constellations.push(Constellation {
        short_name: "Tau".into(),
        long_name: "Taurus".into(),
        lines: vec![[sky(20.0, 180.0), sky(60.0, 170.0)]],
    });
    let (output, _, _) = run(&config, |a| a.draw_catalog_overlays(&catalog));

    assert_eq!(output.list[0], "The constellation Taurus (Tau)");
    assert_eq!(output.list.len(), 3);

    let json: serde_json::Value =
        serde_json::from_str(&output.report().to_json().unwrap()).unwrap();
    assert_eq!(json["status"], "solved");
    assert_eq!(json["annotations"].as_array().unwrap().len(), 2);
}

#[test]
fn test_grid_draws_on_foreground_only() {
    let config = AnnotateConfig::default();
    let (_, canvas, _) = run(&config, |a| a.draw_grid(30.0));

    let fg = canvas.surface(Layer::Foreground);
    assert!(fg.iter().any(|c| c.a > 0.0));
    assert!(canvas
        .surface(Layer::Shapes)
        .iter()
        .all(|c| *c == Color::TRANSPARENT));
}

#[test]
fn test_user_points_are_listed_and_labelled() {
    let config = AnnotateConfig::default();
    let points = [
        UserPoint {
            name: "Mars".into(),
            position: sky(40.0, 120.0),
        },
        UserPoint {
            name: "Far".into(),
            position: sky(400.0, 120.0),
        },
    ];
    let (output, _, text) = run(&config, |a| a.draw_user_points(&points, UserPointKind::Ephemeris));

    assert_eq!(output.list, ["Mars"]);
    assert_eq!(text.drawn[0].0, "Mars");
    assert!((text.drawn[0].1.x - 55.0).abs() < 1e-6);
}

#[test]
fn test_missing_sources_are_skipped() {
    let config = AnnotateConfig::default();
    let (output, canvas, text) = run(&config, |a| {
        a.draw_custom_figures(Path::new("/nonexistent/figures.txt"));
        a.draw_user_point_file(Path::new("/nonexistent/points.txt"), UserPointKind::Custom);
    });

    assert_eq!(output.figures.groups, 0);
    assert!(output.list.is_empty());
    assert!(text.drawn.is_empty());
    assert!(canvas.mask().iter().all(|&m| m == 1.0));
}

#[test]
fn test_custom_figure_file_is_drawn() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("figures.txt");
    let (a, b) = (sky(40.0, 160.0), sky(160.0, 160.0));
    std::fs::write(
        &path,
        format!("# Bridge\nA {} {} B {} {}\n", a.ra, a.dec, b.ra, b.dec),
    )
    .unwrap();

    let config = AnnotateConfig::default();
    let (output, _, text) = run(&config, |annotator| annotator.draw_custom_figures(&path));

    assert_eq!(output.figures.groups, 1);
    assert_eq!(output.figures.labels[0].text, "Bridge");
    assert_eq!(text.drawn[0].0, "Bridge");
}
