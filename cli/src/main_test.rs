#![allow(clippy::float_cmp)]

use super::*;
use floorplan::engine::Key;
use floorplan::geometry::Point;

fn session() -> EngineCore {
    let mut core = EngineCore::new(EditorConfig { show_dimensions: true, ..EditorConfig::default() });
    core.set_scale(10.0).unwrap();
    core.start_drawing();
    for (x, y) in [(0.0, 0.0), (30.0, 0.0), (30.0, 30.0)] {
        core.on_pointer_down(Point::new(x, y));
    }
    core.on_key_down(Key::Enter);
    core.create_furniture("Bed", 6.5, 5.0).unwrap();
    core.rotate_clockwise();
    core
}

#[test]
fn describe_lists_scale_and_entities() {
    let lines = describe(&session().snapshot());
    assert_eq!(
        lines,
        vec![
            "scale: 10 px/ft".to_owned(),
            "polygons: 1".to_owned(),
            "  Unnamed Area: 3 vertices, centroid (20.0, 10.0)".to_owned(),
            "objects: 1".to_owned(),
            "  Bed (6.5' x 5'): at (367.5, 275.0), 65.0 x 50.0 px, rotated 30 deg".to_owned(),
        ]
    );
}

#[test]
fn describe_uncalibrated_empty_plan() {
    let core = EngineCore::new(EditorConfig::default());
    assert_eq!(describe(&core.snapshot()), vec!["scale: uncalibrated", "polygons: 0", "objects: 0"]);
}

#[test]
fn fallback_is_opt_in() {
    let config = EditorConfig::default();
    assert_eq!(FallbackArgs::default().options(&config).fallback_pixels_per_foot, None);

    let args = FallbackArgs { use_fallback_scale: true, fallback_scale: None };
    assert_eq!(args.options(&config).fallback_pixels_per_foot, Some(120.0));
}

#[test]
fn explicit_fallback_scale_overrides_config() {
    let args = FallbackArgs { use_fallback_scale: false, fallback_scale: Some(48.0) };
    let config = args.apply(EditorConfig::default()).unwrap();
    assert_eq!(config.fallback_pixels_per_foot, 48.0);
    assert_eq!(args.options(&config).fallback_pixels_per_foot, Some(48.0));

    let bad = FallbackArgs { use_fallback_scale: false, fallback_scale: Some(-1.0) };
    assert!(matches!(bad.apply(EditorConfig::default()), Err(CliError::InvalidFallback(_))));
}

#[test]
fn cli_parses_global_flag_after_subcommand() {
    let cli = Cli::try_parse_from(["floorplan", "migrate", "plan.json", "--out", "new.json", "--show-dimensions"]).unwrap();
    assert!(cli.show_dimensions);
    let Command::Migrate(args) = cli.command else {
        panic!("expected migrate");
    };
    assert_eq!(args.out, Some(PathBuf::from("new.json")));
    assert!(!args.fallback.enabled());
}
