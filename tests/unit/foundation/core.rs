use super::*;

#[test]
fn rgba16_normalization_truncates() {
    let c = Color::from_rgba16(0xABCD, 0x00FF, 0xFFFF, 0x8080);
    assert_eq!(c, Color::rgba(0xAB, 0x00, 0xFF, 0x80));

    let via_from: Color = Rgba16 {
        r: 0x12FF,
        g: 0,
        b: 0,
        a: 0xFFFF,
    }
    .into();
    assert_eq!(via_from, Color::rgb(0x12, 0, 0));
}

#[test]
fn image_rgba16_pixels_truncate_too() {
    let c: Color = image::Rgba([0xABCDu16, 0x0180, 0x7FFF, 0xFFFF]).into();
    assert_eq!(c, Color::rgba(0xAB, 0x01, 0x7F, 0xFF));
}

#[test]
fn color_deserializes_from_hex_object_and_array() {
    let hex: Color = serde_json::from_str("\"#ff800040\"").unwrap();
    assert_eq!(hex, Color::rgba(255, 128, 0, 64));

    let obj: Color = serde_json::from_str(r#"{"r":1,"g":2,"b":3}"#).unwrap();
    assert_eq!(obj, Color::rgb(1, 2, 3));

    let arr: Color = serde_json::from_str("[9,8,7,6]").unwrap();
    assert_eq!(arr, Color::rgba(9, 8, 7, 6));

    assert!(serde_json::from_str::<Color>("[1,2]").is_err());
    assert!(serde_json::from_str::<Color>("\"#12\"").is_err());
}

#[test]
fn parse_hex_rejects_bad_digits() {
    assert!(parse_hex("#gg0000").is_err());
    assert_eq!(parse_hex("00ff00").unwrap(), Color::GREEN);
}

#[test]
fn point_deserializes_from_array_or_object() {
    let a: Point = serde_json::from_str("[3,-4]").unwrap();
    let b: Point = serde_json::from_str(r#"{"x":3,"y":-4}"#).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, Point::new(3, -4));
}

#[test]
fn inverted_rect_is_invalid_geometry() {
    let r = Rect::new((4, 0), (2, 3));
    assert!(matches!(r.validate(), Err(TowerError::InvalidGeometry(_))));

    let r = Rect::new((0, 5), (3, 4));
    assert!(matches!(r.validate(), Err(TowerError::InvalidGeometry(_))));
}

#[test]
fn zero_area_rect_is_valid_and_empty() {
    let r = Rect::new((2, 2), (2, 6));
    r.validate().unwrap();
    assert!(r.is_empty());
    assert_eq!(r.points().count(), 0);
}

#[test]
fn rect_points_are_half_open_row_major() {
    let r = Rect::new((1, 1), (3, 3));
    let pts: Vec<_> = r.points().collect();
    assert_eq!(
        pts,
        vec![
            Point::new(1, 1),
            Point::new(2, 1),
            Point::new(1, 2),
            Point::new(2, 2)
        ]
    );
    assert!(r.contains(Point::new(2, 2)));
    assert!(!r.contains(Point::new(3, 2)));
}

#[test]
fn default_canvas_is_tower_sized() {
    let c = Canvas::default();
    assert_eq!((c.width, c.height), (128, 8));
    assert_eq!(c.rect(), Rect::new((0, 0), (128, 8)));
    assert_eq!(c.pixel_count(), 1024);
}
