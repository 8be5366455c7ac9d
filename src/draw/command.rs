use crate::foundation::core::{Color, LayerId, Point, Rect};
use crate::foundation::error::{TowerError, TowerResult};
use serde::{Deserialize, Serialize};

/// How a drawing operation combines with what the layer already holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintMode {
    /// Replace the destination pixel.
    #[default]
    Paint,
    /// Alpha-composite the source over the destination.
    Over,
}

/// A point together with the color to put there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pixel {
    pub point: Point,
    pub color: Color,
}

impl Pixel {
    pub fn new(point: impl Into<Point>, color: impl Into<Color>) -> Self {
        Self {
            point: point.into(),
            color: color.into(),
        }
    }
}

/// Raw autoroll mode numbers as carried on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoRollMode {
    Stop = 0,
    Start = 1,
    Next = 2,
    Continue = 3,
}

impl TryFrom<i32> for AutoRollMode {
    type Error = TowerError;

    fn try_from(v: i32) -> TowerResult<Self> {
        match v {
            0 => Ok(Self::Stop),
            1 => Ok(Self::Start),
            2 => Ok(Self::Next),
            3 => Ok(Self::Continue),
            other => Err(TowerError::validation(format!(
                "unknown autoroll mode {other}"
            ))),
        }
    }
}

/// Autoroll request for a layer.
///
/// Only `Start` carries a separator; the gap stays fixed until the next `Start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AutoRoll {
    /// Freeze the layer where it is.
    Stop,
    /// Scroll from `entry` (or 0), leaving `separator` pixels between entries.
    Start {
        #[serde(default)]
        entry: Option<usize>,
        #[serde(default)]
        separator: u32,
    },
    /// Jump to `entry`, or the following entry, and rewind the scroll position.
    Next {
        #[serde(default)]
        entry: Option<usize>,
    },
    /// Resume scrolling without rewinding.
    Continue,
}

impl AutoRoll {
    pub fn start(separator: u32) -> Self {
        Self::Start {
            entry: None,
            separator,
        }
    }

    pub fn next() -> Self {
        Self::Next { entry: None }
    }

    /// Build from the raw `(mode, entry, separator)` triple. Negative entries mean "unset".
    pub fn from_raw(mode: i32, entry: i32, separator: i32) -> TowerResult<Self> {
        let entry = usize::try_from(entry).ok();
        Ok(match AutoRollMode::try_from(mode)? {
            AutoRollMode::Stop => Self::Stop,
            AutoRollMode::Start => Self::Start {
                entry,
                separator: u32::try_from(separator).map_err(|_| {
                    TowerError::validation(format!("autoroll separator {separator} is negative"))
                })?,
            },
            AutoRollMode::Next => Self::Next { entry },
            AutoRollMode::Continue => Self::Continue,
        })
    }

    pub fn mode(&self) -> AutoRollMode {
        match self {
            Self::Stop => AutoRollMode::Stop,
            Self::Start { .. } => AutoRollMode::Start,
            Self::Next { .. } => AutoRollMode::Next,
            Self::Continue => AutoRollMode::Continue,
        }
    }

    pub fn entry(&self) -> Option<usize> {
        match self {
            Self::Start { entry, .. } | Self::Next { entry } => *entry,
            Self::Stop | Self::Continue => None,
        }
    }
}

/// One mutation request against the renderer's layer state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        #[serde(default)]
        layers: Vec<LayerId>,
    },
    Fill {
        color: Color,
        layer: LayerId,
        #[serde(default)]
        mode: PaintMode,
    },
    SetPixels {
        pixels: Vec<Pixel>,
        layer: LayerId,
        #[serde(default)]
        mode: PaintMode,
    },
    DrawRectangle {
        rect: Rect,
        color: Color,
        layer: LayerId,
        #[serde(default)]
        mode: PaintMode,
    },
    WriteText {
        text: String,
        font: String,
        #[serde(default)]
        x: i32,
        color: Color,
        layer: LayerId,
        #[serde(default)]
        mode: PaintMode,
    },
    SetLayerOrigin {
        layer: LayerId,
        origin: Point,
    },
    SetLayerAlpha {
        layer: LayerId,
        alpha: u8,
    },
    AutoRoll {
        layer: LayerId,
        roll: AutoRoll,
    },
}

impl DrawCommand {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Clear { .. } => "clear",
            Self::Fill { .. } => "fill",
            Self::SetPixels { .. } => "set_pixels",
            Self::DrawRectangle { .. } => "draw_rectangle",
            Self::WriteText { .. } => "write_text",
            Self::SetLayerOrigin { .. } => "set_layer_origin",
            Self::SetLayerAlpha { .. } => "set_layer_alpha",
            Self::AutoRoll { .. } => "auto_roll",
        }
    }

    /// Layers touched by this command.
    pub fn layers(&self) -> Vec<LayerId> {
        match self {
            Self::Clear { layers } => layers.clone(),
            Self::Fill { layer, .. }
            | Self::SetPixels { layer, .. }
            | Self::DrawRectangle { layer, .. }
            | Self::WriteText { layer, .. }
            | Self::SetLayerOrigin { layer, .. }
            | Self::SetLayerAlpha { layer, .. }
            | Self::AutoRoll { layer, .. } => vec![*layer],
        }
    }

    /// Checks that can be made without the renderer's state.
    pub fn validate(&self) -> TowerResult<()> {
        match self {
            Self::DrawRectangle { rect, .. } => rect.validate(),
            Self::WriteText { font, .. } if font.trim().is_empty() => {
                Err(TowerError::unknown_font(font.clone()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/command.rs"]
mod tests;
