use crate::draw::command::PaintMode;
use crate::foundation::core::{Canvas, Color, Point, Rect};
use crate::render::autoroll::RollState;
use crate::render::blend;
use crate::render::font::TextRun;
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Pending strokes above this count are folded into the base color.
const MAX_PENDING_OVERS: usize = 8;

/// Everything drawn onto one pixel of a layer since its last paint.
///
/// `Paint` strokes reset the pixel; `Over` strokes stack and are folded when the layer is
/// composited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stroke {
    base: Option<Color>,
    overs: SmallVec<[Color; 2]>,
}

impl Stroke {
    pub fn push(&mut self, mode: PaintMode, color: Color) {
        if mode == PaintMode::Paint || color.is_opaque() {
            self.base = Some(color);
            self.overs.clear();
            return;
        }
        self.overs.push(color);
        if self.overs.len() > MAX_PENDING_OVERS {
            self.base = Some(self.resolve());
            self.overs.clear();
        }
    }

    pub fn resolve(&self) -> Color {
        self.overs
            .iter()
            .fold(self.base.unwrap_or(Color::TRANSPARENT), |dst, src| {
                blend::over(dst, *src)
            })
    }
}

/// One `WriteText` result kept on the layer's text plane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEntry {
    /// Column the text was written at; ignored while the layer rolls.
    pub x: i32,
    pub run: TextRun,
    pub color: Color,
    pub mode: PaintMode,
}

/// Durable per-layer state held by the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerState {
    pub origin: Point,
    /// Layer-wide alpha multiplier, 255 leaves pixels untouched.
    pub alpha: u8,
    pub roll: RollState,
    pixels: BTreeMap<Point, Stroke>,
    entries: Vec<TextEntry>,
}

impl Default for LayerState {
    fn default() -> Self {
        Self {
            origin: Point::ORIGIN,
            alpha: 255,
            roll: RollState::default(),
            pixels: BTreeMap::new(),
            entries: Vec::new(),
        }
    }
}

impl LayerState {
    /// Drop pixel and text content. Origin, alpha and autoroll settings survive.
    pub fn clear(&mut self) {
        self.pixels.clear();
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty() && self.entries.is_empty()
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn entries(&self) -> &[TextEntry] {
        &self.entries
    }

    pub fn entry_widths(&self) -> Vec<u32> {
        self.entries.iter().map(|e| e.run.width).collect()
    }

    /// Layer-space rectangle that lands on the canvas under the current origin.
    pub fn visible_extent(&self, canvas: Canvas) -> Rect {
        canvas
            .rect()
            .translate(Point::new(-self.origin.x, -self.origin.y))
    }

    pub fn put(&mut self, point: Point, color: Color, mode: PaintMode) {
        self.pixels.entry(point).or_default().push(mode, color);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color, mode: PaintMode) {
        for p in rect.points() {
            self.put(p, color, mode);
        }
    }

    pub fn push_entry(&mut self, entry: TextEntry) {
        self.entries.push(entry);
    }

    /// Resolved layer pixels in canvas coordinates, clipped to the canvas, before the layer
    /// alpha is applied.
    pub fn rasterize(&self, canvas: Canvas) -> BTreeMap<Point, Color> {
        let view = canvas.rect();
        let mut out = BTreeMap::new();

        for (p, stroke) in &self.pixels {
            let q = p.offset(self.origin);
            if view.contains(q) {
                out.insert(q, stroke.resolve());
            }
        }

        let placements: Vec<(usize, i32)> = if self.roll.is_active() {
            self.roll.layout(&self.entry_widths(), canvas.width)
        } else {
            self.entries.iter().enumerate().map(|(i, e)| (i, e.x)).collect()
        };

        for (idx, x) in placements {
            let entry = &self.entries[idx];
            for pt in &entry.run.points {
                let q = Point::new(x.saturating_add(pt.x), pt.y).offset(self.origin);
                if !view.contains(q) {
                    continue;
                }
                let dst = out.get(&q).copied().unwrap_or(Color::TRANSPARENT);
                out.insert(q, blend::apply(entry.mode, dst, entry.color));
            }
        }

        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layer.rs"]
mod tests;
