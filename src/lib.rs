//! Client binding and reference compositor for layered LED tower displays.
//!
//! A caller opens a drawing session on a [`Client`], sends draw commands against numbered
//! layers and commits with [`Client::render`]. The renderer keeps layer state across sessions
//! and composites all layers back-to-front when a session is committed.
//!
//! - [`LocalTransport`] runs a [`LocalRenderer`] in-process
//! - [`TcpTransport`] speaks newline-delimited JSON to a remote renderer
#![forbid(unsafe_code)]

mod foundation;

/// Draw command set.
pub mod draw;
/// Layer state, autoroll and compositing.
pub mod render;
/// JSON scripts of draw commands.
pub mod script;
/// Client session API.
pub mod session;
/// Transport traits and implementations.
pub mod transport;

pub use crate::foundation::core::{Canvas, Color, LayerId, Point, Rect, Rgba16, parse_hex};
pub use crate::foundation::error::{TowerError, TowerResult};

pub use crate::draw::command::{AutoRoll, AutoRollMode, DrawCommand, PaintMode, Pixel};
pub use crate::render::autoroll::{RollPhase, RollState};
pub use crate::render::compositor::composite;
pub use crate::render::font::{BUILTIN_FONT, BitmapFont, FontBook, MAX_GLYPH_WIDTH};
pub use crate::render::frame::Frame;
pub use crate::render::layer::LayerState;
pub use crate::render::renderer::{LocalRenderer, RendererOpts};
pub use crate::script::Script;
pub use crate::session::client::{Client, SessionState};
pub use crate::transport::local::LocalTransport;
pub use crate::transport::wire::{SessionOutcome, TcpTransport, serve_connection, serve_tcp};
pub use crate::transport::{DrawStream, RenderReply, Transport};
