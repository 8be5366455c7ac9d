use crate::draw::command::DrawCommand;
use crate::foundation::error::{TowerError, TowerResult};
use crate::render::frame::Frame;
use crate::render::renderer::LocalRenderer;
use crate::transport::{DrawStream, RenderReply, Transport};
use std::sync::{Arc, Mutex, MutexGuard};

/// Transport talking to a renderer in the same process.
///
/// Commands are applied as they are sent, so renderer-side failures such as an unknown font
/// surface from `send` directly.
#[derive(Clone, Debug, Default)]
pub struct LocalTransport {
    renderer: Arc<Mutex<LocalRenderer>>,
}

impl LocalTransport {
    pub fn new(renderer: LocalRenderer) -> Self {
        Self {
            renderer: Arc::new(Mutex::new(renderer)),
        }
    }

    /// Shared handle to the renderer, for inspecting layers and frames.
    pub fn renderer(&self) -> Arc<Mutex<LocalRenderer>> {
        Arc::clone(&self.renderer)
    }

    /// Frame produced by the last successful commit.
    pub fn last_frame(&self) -> TowerResult<Option<Frame>> {
        Ok(lock(&self.renderer)?.last_frame().cloned())
    }
}

impl Transport for LocalTransport {
    type Stream = LocalStream;

    fn open(&mut self) -> TowerResult<LocalStream> {
        Ok(LocalStream {
            renderer: Arc::clone(&self.renderer),
        })
    }
}

/// Stream half of [`LocalTransport`].
#[derive(Debug)]
pub struct LocalStream {
    renderer: Arc<Mutex<LocalRenderer>>,
}

impl DrawStream for LocalStream {
    fn send(&mut self, cmd: &DrawCommand) -> TowerResult<()> {
        lock(&self.renderer)?.apply(cmd)
    }

    fn close_and_receive(self) -> TowerResult<RenderReply> {
        lock(&self.renderer)?.render();
        Ok(RenderReply::ok())
    }
}

fn lock(renderer: &Mutex<LocalRenderer>) -> TowerResult<MutexGuard<'_, LocalRenderer>> {
    renderer
        .lock()
        .map_err(|_| TowerError::transport("local renderer lock poisoned"))
}
