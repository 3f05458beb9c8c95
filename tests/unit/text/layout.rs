use std::sync::Arc;

use super::*;
use crate::fonts::{catalog::WeightToken, registry::FaceOrigin};

fn face(bytes: Vec<u8>) -> FontFace {
    FontFace {
        family: "Test".to_string(),
        weight: WeightToken::REGULAR,
        bytes: Arc::new(bytes),
        index: 0,
        origin: FaceOrigin::Fetched,
    }
}

fn host_font() -> Option<Vec<u8>> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    let id = db.faces().next()?.id;
    db.with_face_data(id, |data, _| data.to_vec())
}

fn host_fonts(limit: usize) -> Vec<Vec<u8>> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    let ids: Vec<_> = db.faces().filter(|f| f.index == 0).map(|f| f.id).collect();
    ids.into_iter()
        .filter_map(|id| db.with_face_data(id, |data, _| data.to_vec()))
        .take(limit)
        .collect()
}

fn notdef_count(title: &ShapedTitle) -> (usize, usize) {
    let glyphs = title.runs.iter().flat_map(|r| r.glyphs.iter());
    glyphs.fold((0, 0), |(missing, total), g| {
        (missing + usize::from(g.id == 0), total + 1)
    })
}

/// A face that misses every glyph of `text`, and one that covers all of it.
fn split_coverage(text: &str) -> Option<(Vec<u8>, Vec<u8>)> {
    let fonts = host_fonts(48);
    let mut engine = TextEngine::new();
    let mut missing = None;
    let mut covering = None;
    for bytes in fonts {
        let f = face(bytes.clone());
        let Some(shaped) = engine.shape(text, 32.0, std::slice::from_ref(&f)) else {
            continue;
        };
        let (notdef, total) = notdef_count(&shaped);
        if total == 0 {
            continue;
        }
        if notdef == total && missing.is_none() {
            missing = Some(bytes);
        } else if notdef == 0 && covering.is_none() {
            covering = Some(bytes);
        }
        if missing.is_some() && covering.is_some() {
            break;
        }
    }
    Some((missing?, covering?))
}

fn boxed(width: f64, height: f64, baseline: f64) -> ShapedTitle {
    ShapedTitle {
        face: face(Vec::new()),
        runs: Vec::new(),
        width,
        height,
        baseline,
    }
}

#[test]
fn transform_centers_layout_box() {
    let frame = FrameSize::new(800, 600).unwrap();
    let t = boxed(200.0, 100.0, 80.0).transform(frame, false);
    assert_eq!(
        t * crate::foundation::core::Point::ORIGIN,
        crate::foundation::core::Point::new(300.0, 250.0)
    );
}

#[test]
fn italic_shear_keeps_baseline_fixed() {
    let frame = FrameSize::new(800, 600).unwrap();
    let title = boxed(200.0, 100.0, 80.0);
    let upright = title.transform(frame, false);
    let italic = title.transform(frame, true);

    let on_baseline = crate::foundation::core::Point::new(10.0, 80.0);
    assert_eq!(italic * on_baseline, upright * on_baseline);

    let above = crate::foundation::core::Point::new(10.0, 0.0);
    let shifted = (italic * above).x - (upright * above).x;
    assert!((shifted - OBLIQUE_SKEW * 80.0).abs() < 1e-9);
}

#[test]
fn unusable_faces_are_skipped() {
    let mut engine = TextEngine::new();
    let junk = face(b"not a font".to_vec());
    assert!(engine.shape("Music", 64.0, &[junk.clone()]).is_none());
    // Second attempt uses the remembered failure.
    assert!(engine.shape("Music", 64.0, &[junk]).is_none());
    assert!(engine.shape("Music", 64.0, &[]).is_none());
}

#[test]
fn invalid_size_shapes_nothing() {
    let mut engine = TextEngine::new();
    assert!(engine.shape("Music", 0.0, &[face(vec![0; 4])]).is_none());
    assert!(engine.shape("Music", f32::NAN, &[]).is_none());
}

#[test]
fn falls_through_to_next_usable_face() {
    let Some(bytes) = host_font() else {
        return;
    };
    let mut engine = TextEngine::new();
    let good = face(bytes);
    let shaped = engine
        .shape("Music", 48.0, &[face(b"junk".to_vec()), good.clone()])
        .unwrap();
    assert!(Arc::ptr_eq(&shaped.face.bytes, &good.bytes));
    assert!(!shaped.is_empty());
    assert!(shaped.width > 0.0);
    assert!(shaped.height > 0.0);
    assert!(shaped.baseline > 0.0 && shaped.baseline <= shaped.height);
}

#[test]
fn control_characters_stay_on_one_line() {
    let Some(bytes) = host_font() else {
        return;
    };
    let mut engine = TextEngine::new();
    let f = face(bytes);
    let one = engine.shape("Big Band", 48.0, &[f.clone()]).unwrap();
    let two = engine.shape("Big\nBand", 48.0, &[f]).unwrap();
    assert!((one.height - two.height).abs() < 1e-6);
}

#[test]
fn later_stylesheet_faces_cover_missing_clusters() {
    use crate::fonts::{
        catalog::FontCapability,
        registry::FontRegistry,
        source::DirFontSource,
    };

    let title = ["ქართული", "ไทย", "Привет", "Music"]
        .into_iter()
        .find_map(|t| split_coverage(t).map(|pair| (t, pair)));
    let Some((title, (first, second))) = title else {
        return;
    };

    let dir = std::env::temp_dir().join(format!("covergen-layout-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("subset-a.ttf"), &first).unwrap();
    std::fs::write(dir.join("subset-b.ttf"), &second).unwrap();
    let mut source = DirFontSource::new(&dir);
    std::fs::write(
        source.stylesheet_path("Split Sans", WeightToken::REGULAR),
        "@font-face { src: url(https://fonts.test/subset-a.ttf); }\n\
         @font-face { src: url(https://fonts.test/subset-b.ttf); }\n",
    )
    .unwrap();

    let mut registry = FontRegistry::without_system_fallback();
    let report = registry.load_family(
        "Split Sans",
        &FontCapability::from_variants(["regular"]),
        &mut source,
    );
    assert!(report.is_complete());
    let candidates = registry.candidates("Split Sans", WeightToken::REGULAR);
    assert_eq!(candidates.len(), 2);

    let mut engine = TextEngine::new();
    let shaped = engine.shape(title, 48.0, &candidates).unwrap();
    let (notdef, total) = notdef_count(&shaped);
    assert!(total > 0);
    assert_eq!(notdef, 0, "{title:?} drew missing glyphs");
    assert!(Arc::ptr_eq(&shaped.face.bytes, &candidates[1].bytes));

    std::fs::remove_dir_all(&dir).ok();
}
