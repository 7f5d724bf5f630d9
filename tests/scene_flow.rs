use std::path::Path;
use std::sync::Arc;

use image::{imageops, DynamicImage, Rgb, RgbImage};
use scene_recognizer::catalog::authoring::{encode_template, EncodeRequest};
use scene_recognizer::catalog::Catalog;
use scene_recognizer::intake::DirectoryFrameSource;
use scene_recognizer::pipeline::{SceneEngine, TickOutcome};
use scene_recognizer::scene::markers::{INDEX_EXPLORE_BTN, LOGIN_TAG};
use scene_recognizer::scene::SceneKind;

fn marker(seed: u32) -> RgbImage {
    RgbImage::from_fn(32, 18, |x, y| {
        let v = ((x / 3) * 83 + (y / 3) * 41 + seed * 97) % 233;
        Rgb([v as u8, (255 - v) as u8, ((v * 5) % 256) as u8])
    })
}

fn author(dir: &Path, name: &str, seed: u32, x: u32, y: u32) {
    let shot = dir.join(format!("{name}.png"));
    DynamicImage::ImageRgb8(marker(seed))
        .save(&shot)
        .expect("write marker screenshot");
    let request = EncodeRequest {
        image_path: shot,
        x,
        y,
        full_scan: false,
        inverse: false,
        description: format!("{name} marker"),
    };
    encode_template(&request, &dir.join("templates"), &dir.join("template.json"))
        .expect("encode template");
}

fn write_screen(dir: &Path, file: &str, markers: &[(u32, i64, i64)]) {
    let mut screen = RgbImage::from_pixel(1136, 640, Rgb([25, 35, 45]));
    for &(seed, x, y) in markers {
        imageops::replace(&mut screen, &marker(seed), x, y);
    }
    screen.save(dir.join(file)).expect("write screen");
}

#[test]
fn authored_catalog_drives_unknown_login_index() {
    let work = tempfile::tempdir().expect("tempdir");
    author(work.path(), LOGIN_TAG, 1, 520, 80);
    author(work.path(), INDEX_EXPLORE_BTN, 2, 1000, 560);

    let catalog = Catalog::load_with_dir(
        work.path().join("template.json"),
        work.path().join("templates"),
    )
    .expect("load catalog");
    assert_eq!(catalog.len(), 2);

    let frames = work.path().join("frames");
    std::fs::create_dir_all(&frames).expect("frames dir");
    write_screen(&frames, "000_blank.png", &[]);
    write_screen(&frames, "001_login.png", &[(1, 530, 70)]);
    write_screen(&frames, "002_index.png", &[(2, 1010, 575)]);

    let mut engine = SceneEngine::new(Arc::new(catalog));
    let mut source = DirectoryFrameSource::new(&frames);

    let mut scenes = Vec::new();
    for _ in 0..3 {
        match engine.tick(&mut source).expect("tick") {
            TickOutcome::Detected(report) => scenes.push(report.scene),
            TickOutcome::Skipped => panic!("frames are available"),
        }
    }
    assert_eq!(
        scenes,
        vec![SceneKind::Unknown, SceneKind::Login, SceneKind::Index]
    );

    let snapshot = engine.snapshot(None);
    assert_eq!(snapshot.scene_name, "Index");
    assert_eq!(snapshot.scene_name_cn, "庭院");
    assert_eq!(snapshot.last_hits[0].marker, INDEX_EXPLORE_BTN);
}

#[test]
fn empty_frame_directory_skips() {
    let work = tempfile::tempdir().expect("tempdir");
    author(work.path(), LOGIN_TAG, 1, 520, 80);
    let catalog = Catalog::load_with_dir(
        work.path().join("template.json"),
        work.path().join("templates"),
    )
    .expect("load catalog");

    let mut engine = SceneEngine::new(Arc::new(catalog));
    let mut source = DirectoryFrameSource::new(work.path().join("no-frames"));
    assert!(matches!(
        engine.tick(&mut source).expect("tick"),
        TickOutcome::Skipped
    ));
    assert_eq!(engine.context().current_kind(), SceneKind::Unknown);
}
