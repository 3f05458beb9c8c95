use std::sync::Arc;

use super::*;
use crate::{
    fonts::{
        catalog::WeightToken,
        registry::{FaceOrigin, FontFace},
    },
    text::layout::TextEngine,
};

fn host_title(size_px: f32) -> Option<ShapedTitle> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    let id = db.faces().next()?.id;
    let bytes = db.with_face_data(id, |data, _| data.to_vec())?;
    let face = FontFace {
        family: "Host".to_string(),
        weight: WeightToken::REGULAR,
        bytes: Arc::new(bytes),
        index: 0,
        origin: FaceOrigin::System,
    };
    TextEngine::new().shape("HH", size_px, &[face])
}

fn covered(data: &[u8]) -> usize {
    data.chunks_exact(4).filter(|px| px[3] > 0).count()
}

#[test]
fn empty_title_draws_nothing() {
    let title = ShapedTitle {
        face: FontFace {
            family: "None".to_string(),
            weight: WeightToken::REGULAR,
            bytes: Arc::new(Vec::new()),
            index: 0,
            origin: FaceOrigin::Fetched,
        },
        runs: Vec::new(),
        width: 0.0,
        height: 0.0,
        baseline: 0.0,
    };
    let mut frame = Frame::new(FrameSize::new(32, 32).unwrap());
    draw_title(&mut frame, &title, &Settings::default()).unwrap();
    assert_eq!(covered(frame.data()), 0);
}

#[test]
fn glow_spreads_beyond_the_glyphs() {
    let Some(title) = host_title(40.0) else {
        return;
    };
    let size = FrameSize::new(160, 120).unwrap();

    let mut plain = Frame::new(size);
    let no_glow = Settings {
        glow_amount: 0.0,
        ..Settings::default()
    };
    draw_title(&mut plain, &title, &no_glow).unwrap();

    let mut glowing = Frame::new(size);
    let glow = Settings {
        glow_amount: 12.0,
        ..Settings::default()
    };
    draw_title(&mut glowing, &title, &glow).unwrap();

    let plain_px = covered(plain.data());
    assert!(plain_px > 0);
    assert!(covered(glowing.data()) > plain_px);
}

#[test]
fn fill_uses_text_color() {
    let Some(title) = host_title(60.0) else {
        return;
    };
    let size = FrameSize::new(200, 120).unwrap();
    let settings = Settings {
        glow_amount: 0.0,
        text_color: "#ff0000".to_string(),
        ..Settings::default()
    };
    let mut frame = Frame::new(size);
    draw_title(&mut frame, &title, &settings).unwrap();
    let solid = frame
        .data()
        .chunks_exact(4)
        .find(|px| px[3] == 255)
        .expect("some fully covered pixel");
    assert_eq!(solid, [255, 0, 0, 255]);
}
