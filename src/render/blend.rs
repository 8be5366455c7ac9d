use crate::draw::command::PaintMode;
use crate::foundation::core::Color;

/// Straight-alpha source-over: `dst = src*src.a + dst*(1-src.a)`, normalized for
/// translucent destinations.
pub fn over(dst: Color, src: Color) -> Color {
    if src.a == 0 {
        return dst;
    }
    if src.a == 255 || dst.a == 0 {
        return src;
    }

    let sa = u32::from(src.a);
    let inv = 255 - sa;
    // Destination weight scaled by 255 to keep integer precision.
    let dw = u32::from(dst.a) * inv;
    let out_a = sa * 255 + dw;

    let mix = |s: u8, d: u8| -> u8 {
        let num = u32::from(s) * sa * 255 + u32::from(d) * dw;
        ((num + out_a / 2) / out_a) as u8
    };

    Color {
        r: mix(src.r, dst.r),
        g: mix(src.g, dst.g),
        b: mix(src.b, dst.b),
        a: ((out_a + 127) / 255) as u8,
    }
}

/// Apply a single stroke of `src` onto `dst` under `mode`.
pub fn apply(mode: PaintMode, dst: Color, src: Color) -> Color {
    match mode {
        PaintMode::Paint => src,
        PaintMode::Over => over(dst, src),
    }
}

/// Scale a color's alpha by a layer-wide multiplier.
pub fn with_layer_alpha(c: Color, layer_alpha: u8) -> Color {
    if layer_alpha == 255 {
        return c;
    }
    c.with_alpha(mul_div255(c.a, layer_alpha))
}

fn mul_div255(x: u8, y: u8) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
