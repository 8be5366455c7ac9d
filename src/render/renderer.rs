use crate::draw::command::DrawCommand;
use crate::foundation::core::{Canvas, LayerId};
use crate::foundation::error::TowerResult;
use crate::render::compositor::composite;
use crate::render::font::FontBook;
use crate::render::frame::Frame;
use crate::render::layer::{LayerState, TextEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Options controlling a [`LocalRenderer`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererOpts {
    /// Visible frame size.
    pub canvas: Canvas,
    /// Pixels a running autoroll layer scrolls per render cycle.
    pub roll_step: u32,
}

impl Default for RendererOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            roll_step: 1,
        }
    }
}

/// Renderer side of the protocol: owns layer state across sessions, applies commands as they
/// are delivered and composites on commit.
#[derive(Clone, Debug)]
pub struct LocalRenderer {
    opts: RendererOpts,
    fonts: FontBook,
    layers: BTreeMap<LayerId, LayerState>,
    last_frame: Option<Frame>,
}

impl LocalRenderer {
    pub fn new(opts: RendererOpts) -> Self {
        Self::with_fonts(opts, FontBook::default())
    }

    pub fn with_fonts(opts: RendererOpts, fonts: FontBook) -> Self {
        Self {
            opts,
            fonts,
            layers: BTreeMap::new(),
            last_frame: None,
        }
    }

    pub fn opts(&self) -> &RendererOpts {
        &self.opts
    }

    pub fn canvas(&self) -> Canvas {
        self.opts.canvas
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    pub fn layer(&self, id: LayerId) -> Option<&LayerState> {
        self.layers.get(&id)
    }

    pub fn layers(&self) -> &BTreeMap<LayerId, LayerState> {
        &self.layers
    }

    /// Frame produced by the most recent [`LocalRenderer::render`].
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    fn layer_mut(&mut self, id: LayerId) -> &mut LayerState {
        self.layers.entry(id).or_default()
    }

    /// Apply one delivered command. A failing command leaves layer state untouched.
    #[tracing::instrument(level = "debug", skip(self, cmd), fields(kind = cmd.kind()))]
    pub fn apply(&mut self, cmd: &DrawCommand) -> TowerResult<()> {
        cmd.validate()?;
        let canvas = self.opts.canvas;

        match cmd {
            DrawCommand::Clear { layers } => {
                for id in layers {
                    self.layer_mut(*id).clear();
                }
            }
            DrawCommand::Fill { color, layer, mode } => {
                let layer = self.layer_mut(*layer);
                let extent = layer.visible_extent(canvas);
                layer.fill_rect(extent, *color, *mode);
            }
            DrawCommand::SetPixels {
                pixels,
                layer,
                mode,
            } => {
                let layer = self.layer_mut(*layer);
                for px in pixels {
                    layer.put(px.point, px.color, *mode);
                }
            }
            DrawCommand::DrawRectangle {
                rect,
                color,
                layer,
                mode,
            } => {
                self.layer_mut(*layer).fill_rect(*rect, *color, *mode);
            }
            DrawCommand::WriteText {
                text,
                font,
                x,
                color,
                layer,
                mode,
            } => {
                let run = self.fonts.resolve(font)?.rasterize(text);
                self.layer_mut(*layer).push_entry(TextEntry {
                    x: *x,
                    run,
                    color: *color,
                    mode: *mode,
                });
            }
            DrawCommand::SetLayerOrigin { layer, origin } => {
                self.layer_mut(*layer).origin = *origin;
            }
            DrawCommand::SetLayerAlpha { layer, alpha } => {
                self.layer_mut(*layer).alpha = *alpha;
            }
            DrawCommand::AutoRoll { layer: id, roll } => {
                let layer = self.layer_mut(*id);
                let count = layer.entries().len();
                layer.roll.apply(*id, *roll, count)?;
            }
        }
        Ok(())
    }

    /// Composite the current layer state, then move running autoroll layers one cycle on.
    #[tracing::instrument(skip(self))]
    pub fn render(&mut self) -> Frame {
        let frame = composite(&self.layers, self.opts.canvas);
        self.advance(1);
        self.last_frame = Some(frame.clone());
        tracing::info!(
            width = frame.width,
            height = frame.height,
            layers = self.layers.len(),
            "frame composited"
        );
        frame
    }

    /// Run `cycles` autoroll steps without producing frames.
    pub fn advance(&mut self, cycles: u32) {
        let step = self.opts.roll_step;
        for layer in self.layers.values_mut() {
            if !layer.roll.is_running() {
                continue;
            }
            let widths = layer.entry_widths();
            for _ in 0..cycles {
                layer.roll.advance(&widths, step);
            }
        }
    }
}

impl Default for LocalRenderer {
    fn default() -> Self {
        Self::new(RendererOpts::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
