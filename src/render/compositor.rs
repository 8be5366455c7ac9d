use crate::foundation::core::{Canvas, LayerId};
use crate::render::blend;
use crate::render::frame::Frame;
use crate::render::layer::LayerState;
use std::collections::BTreeMap;

/// Combine every layer back-to-front into one frame.
///
/// Layers stack in ascending id order no matter when they were first drawn on. The layer alpha
/// multiplies each pixel's alpha before the pixel is blended over the canvas.
#[tracing::instrument(skip(layers), fields(layers = layers.len()))]
pub fn composite(layers: &BTreeMap<LayerId, LayerState>, canvas: Canvas) -> Frame {
    let mut frame = Frame::transparent(canvas);

    for (id, layer) in layers {
        if layer.is_empty() || layer.alpha == 0 {
            continue;
        }
        let pixels = layer.rasterize(canvas);
        tracing::trace!(layer = %id, pixels = pixels.len(), "blend layer");
        for (p, color) in pixels {
            let src = blend::with_layer_alpha(color, layer.alpha);
            let dst = frame.pixel(p.x, p.y).unwrap_or_default();
            frame.put(p.x, p.y, blend::over(dst, src));
        }
    }

    frame
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
