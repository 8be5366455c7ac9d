use super::*;
use crate::draw::command::{AutoRoll, PaintMode, Pixel};
use crate::foundation::core::{Color, Point, Rect};
use crate::foundation::error::TowerError;
use crate::render::font::BUILTIN_FONT;

fn small() -> LocalRenderer {
    LocalRenderer::new(RendererOpts {
        canvas: Canvas::new(10, 8),
        roll_step: 1,
    })
}

fn text(layer: u32, s: &str) -> DrawCommand {
    DrawCommand::WriteText {
        text: s.to_string(),
        font: BUILTIN_FONT.to_string(),
        x: 0,
        color: Color::WHITE,
        layer: LayerId(layer),
        mode: PaintMode::Paint,
    }
}

#[test]
fn fill_covers_visible_extent_under_current_origin() {
    let mut r = small();
    r.apply(&DrawCommand::SetLayerOrigin {
        layer: LayerId(0),
        origin: Point::new(3, 0),
    })
    .unwrap();
    r.apply(&DrawCommand::Fill {
        color: Color::RED,
        layer: LayerId(0),
        mode: PaintMode::Paint,
    })
    .unwrap();

    let frame = r.render();
    assert!(frame.pixels().all(|c| c == Color::RED));
    assert_eq!(r.layer(LayerId(0)).unwrap().pixel_count(), 80);
}

#[test]
fn clear_with_no_layers_is_a_noop() {
    let mut r = small();
    r.apply(&DrawCommand::Fill {
        color: Color::GREEN,
        layer: LayerId(0),
        mode: PaintMode::Paint,
    })
    .unwrap();
    let before = r.render();
    r.apply(&DrawCommand::Clear { layers: vec![] }).unwrap();
    assert_eq!(r.render(), before);
}

#[test]
fn cleared_layer_redraws_at_same_position_and_opacity() {
    let mut r = small();
    let setup = [
        DrawCommand::Fill {
            color: Color::BLACK,
            layer: LayerId(0),
            mode: PaintMode::Paint,
        },
        DrawCommand::SetLayerOrigin {
            layer: LayerId(1),
            origin: Point::new(2, 2),
        },
        DrawCommand::SetLayerAlpha {
            layer: LayerId(1),
            alpha: 128,
        },
        DrawCommand::SetPixels {
            pixels: vec![Pixel::new((0, 0), Color::WHITE)],
            layer: LayerId(1),
            mode: PaintMode::Paint,
        },
    ];
    for cmd in &setup {
        r.apply(cmd).unwrap();
    }
    let first = r.render();

    r.apply(&DrawCommand::Clear {
        layers: vec![LayerId(1)],
    })
    .unwrap();
    assert_eq!(r.render().pixel(2, 2), Some(Color::BLACK));

    r.apply(&setup[3]).unwrap();
    let again = r.render();
    assert_eq!(again, first);
    assert_eq!(again.pixel(2, 2), Some(Color::rgb(128, 128, 128)));
}

#[test]
fn unknown_font_is_reported_and_leaves_state_alone() {
    let mut r = small();
    let err = r
        .apply(&DrawCommand::WriteText {
            text: "HI".to_string(),
            font: "comic-sans".to_string(),
            x: 0,
            color: Color::WHITE,
            layer: LayerId(2),
            mode: PaintMode::Paint,
        })
        .unwrap_err();
    assert!(matches!(err, TowerError::UnknownFont(ref f) if f == "comic-sans"));
    assert!(r.layer(LayerId(2)).is_none());
}

#[test]
fn inverted_rectangle_is_rejected() {
    let mut r = small();
    let err = r
        .apply(&DrawCommand::DrawRectangle {
            rect: Rect::new((3, 3), (1, 1)),
            color: Color::RED,
            layer: LayerId(0),
            mode: PaintMode::Paint,
        })
        .unwrap_err();
    assert!(matches!(err, TowerError::InvalidGeometry(_)));
}

#[test]
fn autoroll_entry_is_checked_against_written_text() {
    let mut r = small();
    r.apply(&text(0, "A")).unwrap();
    r.apply(&text(0, "B")).unwrap();
    let err = r
        .apply(&DrawCommand::AutoRoll {
            layer: LayerId(0),
            roll: AutoRoll::Next { entry: Some(2) },
        })
        .unwrap_err();
    assert!(matches!(
        err,
        TowerError::InvalidEntryIndex { entry: 2, count: 2, .. }
    ));
    r.apply(&DrawCommand::AutoRoll {
        layer: LayerId(0),
        roll: AutoRoll::Next { entry: Some(1) },
    })
    .unwrap();
}

#[test]
fn each_render_scrolls_running_layers_one_step() {
    let mut r = small();
    r.apply(&text(0, "-")).unwrap();
    r.apply(&DrawCommand::AutoRoll {
        layer: LayerId(0),
        roll: AutoRoll::start(2),
    })
    .unwrap();

    let f0 = r.render();
    assert_eq!(f0.pixel(0, 3), Some(Color::WHITE));
    let f1 = r.render();
    assert_eq!(f1.pixel(0, 3), Some(Color::WHITE));
    assert_eq!(f1.pixel(2, 3), Some(Color::TRANSPARENT));
    assert_eq!(r.layer(LayerId(0)).unwrap().roll.offset, 2);

    r.apply(&DrawCommand::AutoRoll {
        layer: LayerId(0),
        roll: AutoRoll::Stop,
    })
    .unwrap();
    let a = r.render();
    let b = r.render();
    assert_eq!(a, b);
}

#[test]
fn advance_moves_only_running_layers() {
    let mut r = small();
    r.apply(&text(0, "AB")).unwrap();
    r.apply(&text(1, "AB")).unwrap();
    r.apply(&DrawCommand::AutoRoll {
        layer: LayerId(0),
        roll: AutoRoll::start(0),
    })
    .unwrap();
    r.advance(3);
    assert_eq!(r.layer(LayerId(0)).unwrap().roll.offset, 3);
    assert_eq!(r.layer(LayerId(1)).unwrap().roll.offset, 0);
}

#[test]
fn last_frame_tracks_most_recent_render() {
    let mut r = small();
    assert!(r.last_frame().is_none());
    let frame = r.render();
    assert_eq!(r.last_frame(), Some(&frame));
}

#[test]
fn clear_keeps_stopped_roll_on_its_entry() {
    let mut r = small();
    let roll = |r: &mut LocalRenderer, roll: AutoRoll| {
        r.apply(&DrawCommand::AutoRoll {
            layer: LayerId(0),
            roll,
        })
        .unwrap();
    };
    for word in ["A", "B", "-"] {
        r.apply(&text(0, word)).unwrap();
    }
    roll(
        &mut r,
        AutoRoll::Start {
            entry: Some(2),
            separator: 1,
        },
    );
    roll(&mut r, AutoRoll::Stop);

    r.apply(&DrawCommand::Clear {
        layers: vec![LayerId(0)],
    })
    .unwrap();
    for word in ["A", "B", "-"] {
        r.apply(&text(0, word)).unwrap();
    }
    let frame = r.render();

    assert_eq!(r.layer(LayerId(0)).unwrap().roll.entry, 2);
    // '-' leads the view; 'A' follows after the one-pixel separator.
    assert_eq!(frame.pixel(0, 3), Some(Color::WHITE));
    assert_eq!(frame.pixel(1, 1), Some(Color::TRANSPARENT));
    assert_eq!(frame.pixel(5, 1), Some(Color::WHITE));
}
