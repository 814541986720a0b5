//! End-to-end: pattern text through to a carved mold

use chocomold::{
    BuildOutcome, Config, CropRectangle, MoldParameters, MoldSession, PatternPipeline,
};

const BADGE: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100" viewBox="0 0 200 100">
    <style>
        .ink { fill: #1a1a1a; }
        .paper { fill: rgb(255, 255, 255); }
    </style>
    <g transform="translate(10 10)">
        <rect class="ink" x="0" y="0" width="80" height="80" rx="8"/>
        <circle class="paper" cx="40" cy="40" r="15"/>
    </g>
    <path d="M110 10 h80 v80 h-80 z M130 30 v40 h40 v-40 z" fill="black"/>
    <rect x="0" y="0" width="200" height="100" fill="none" stroke="none"/>
</svg>"##;

#[test]
fn test_badge_builds_in_session() {
    let load = PatternPipeline::default().load(BADGE, None).unwrap();
    assert_eq!(load.shapes.engrave.len(), 2);
    assert_eq!(load.shapes.mask.len(), 1);
    // The square frame carries its inner square as a hole.
    assert!(load.shapes.engrave.iter().any(|p| p.holes.len() == 1));

    let mut session = MoldSession::default();
    session.set_pattern(load.shapes);

    let (mesh, report) = session.mesh();
    assert_eq!(report.outcome, BuildOutcome::Carved);
    assert!(report.mask_applied);
    assert!(mesh.volume() < 120.0);

    let mut inverted = session.parameters().clone();
    inverted.invert = true;
    session.set_parameters(inverted).unwrap();
    let (raised, report) = session.mesh();
    assert_eq!(report.outcome, BuildOutcome::Carved);
    assert!(raised.volume() < 120.0);
    assert_eq!(session.build_count(), 2);
}

#[test]
fn test_cropped_half_builds() {
    let crop = CropRectangle::new(0.0, 0.0, 100.0, 100.0);
    let load = PatternPipeline::default().load(BADGE, Some(crop)).unwrap();
    assert!(load.clipped);
    assert_eq!(load.shapes.engrave.len(), 1);

    let mut session = MoldSession::default();
    session.set_pattern(load.shapes);
    let (_, report) = session.mesh();
    assert_eq!(report.outcome, BuildOutcome::Carved);
}

#[test]
fn test_config_drives_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.mold = MoldParameters {
        engrave_depth: 0.6,
        invert: true,
        ..Default::default()
    };
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    let mut session = MoldSession::default();
    session.set_parameters(loaded.mold).unwrap();
    assert!(session.parameters().invert);
    assert!((session.parameters().clamped_depth() - 0.6).abs() < 1e-12);
}
