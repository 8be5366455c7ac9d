use crate::draw::command::{AutoRoll, DrawCommand, PaintMode, Pixel};
use crate::foundation::core::{Color, LayerId, Point, Rect};
use crate::foundation::error::{TowerError, TowerResult};
use crate::transport::{DrawStream, Transport};

/// Lifecycle of the client's current drawing session.
#[derive(Debug)]
pub enum SessionState<S> {
    /// No session opened yet.
    Idle,
    Open(S),
    /// The last session was rendered successfully.
    Committed,
    /// The last session hit an error and was discarded.
    Failed,
}

impl<S> Default for SessionState<S> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<S> SessionState<S> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Open(_) => "open",
            Self::Committed => "committed",
            Self::Failed => "failed",
        }
    }
}

/// Client sending draw commands to a tower renderer.
///
/// One session at a time: [`Client::start_drawing`], any number of draw calls, then
/// [`Client::render`]. Any error while a session is open discards it; drawing again requires a
/// new `start_drawing`.
pub struct Client<T: Transport> {
    transport: T,
    state: SessionState<T::Stream>,
    sent: usize,
}

impl<T: Transport> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("state", &self.state.name())
            .field("sent", &self.sent)
            .finish()
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: SessionState::Idle,
            sent: 0,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn state(&self) -> &SessionState<T::Stream> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open(_))
    }

    /// Commands delivered in the current or last session.
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// Open a new drawing session.
    pub fn start_drawing(&mut self) -> TowerResult<()> {
        if self.is_open() {
            return Err(TowerError::SessionAlreadyOpen);
        }
        let stream = self.transport.open()?;
        self.state = SessionState::Open(stream);
        self.sent = 0;
        tracing::debug!("drawing session opened");
        Ok(())
    }

    /// Send any command on the open session.
    pub fn send(&mut self, cmd: DrawCommand) -> TowerResult<()> {
        let SessionState::Open(stream) = &mut self.state else {
            return Err(TowerError::NoActiveSession);
        };

        let res = cmd.validate().and_then(|()| stream.send(&cmd));
        match res {
            Ok(()) => {
                self.sent += 1;
                tracing::debug!(kind = cmd.kind(), seq = self.sent, "command sent");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(kind = cmd.kind(), error = %e, "session discarded");
                self.state = SessionState::Failed;
                Err(e)
            }
        }
    }

    /// Clear the given layers. An empty list is accepted and does nothing.
    pub fn clear(&mut self, layers: &[LayerId]) -> TowerResult<()> {
        self.send(DrawCommand::Clear {
            layers: layers.to_vec(),
        })
    }

    pub fn fill(
        &mut self,
        color: impl Into<Color>,
        layer: LayerId,
        mode: PaintMode,
    ) -> TowerResult<()> {
        self.send(DrawCommand::Fill {
            color: color.into(),
            layer,
            mode,
        })
    }

    pub fn set_pixels(
        &mut self,
        pixels: &[Pixel],
        layer: LayerId,
        mode: PaintMode,
    ) -> TowerResult<()> {
        self.send(DrawCommand::SetPixels {
            pixels: pixels.to_vec(),
            layer,
            mode,
        })
    }

    pub fn draw_rectangle(
        &mut self,
        rect: Rect,
        color: impl Into<Color>,
        layer: LayerId,
        mode: PaintMode,
    ) -> TowerResult<()> {
        self.send(DrawCommand::DrawRectangle {
            rect,
            color: color.into(),
            layer,
            mode,
        })
    }

    pub fn write_text(
        &mut self,
        text: &str,
        font: &str,
        x: i32,
        color: impl Into<Color>,
        layer: LayerId,
        mode: PaintMode,
    ) -> TowerResult<()> {
        self.send(DrawCommand::WriteText {
            text: text.to_string(),
            font: font.to_string(),
            x,
            color: color.into(),
            layer,
            mode,
        })
    }

    pub fn set_layer_origin(
        &mut self,
        layer: LayerId,
        origin: impl Into<Point>,
    ) -> TowerResult<()> {
        self.send(DrawCommand::SetLayerOrigin {
            layer,
            origin: origin.into(),
        })
    }

    pub fn set_layer_alpha(&mut self, layer: LayerId, alpha: u8) -> TowerResult<()> {
        self.send(DrawCommand::SetLayerAlpha {
            layer,
            alpha,
        })
    }

    pub fn auto_roll(&mut self, layer: LayerId, roll: AutoRoll) -> TowerResult<()> {
        self.send(DrawCommand::AutoRoll {
            layer,
            roll,
        })
    }

    /// Commit the open session and wait for the renderer.
    ///
    /// The session is consumed whether or not the renderer reports an error.
    #[tracing::instrument(skip(self), fields(sent = self.sent))]
    pub fn render(&mut self) -> TowerResult<()> {
        let stream = match std::mem::take(&mut self.state) {
            SessionState::Open(stream) => stream,
            other => {
                self.state = other;
                return Err(TowerError::NoActiveSession);
            }
        };

        self.state = SessionState::Failed;
        let reply = stream.close_and_receive()?;
        if !reply.is_ok() {
            tracing::warn!(message = %reply.message, "renderer reported failure");
            return Err(TowerError::RenderFailed(reply.message));
        }
        self.state = SessionState::Committed;
        tracing::info!("session committed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/client.rs"]
mod tests;
