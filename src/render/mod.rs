//! Renderer side of the protocol: layer state, autoroll, compositing.

pub mod autoroll;
pub mod blend;
pub mod compositor;
pub mod font;
pub mod frame;
pub mod layer;
pub mod renderer;
