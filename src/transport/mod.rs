//! Transports carrying draw commands to a renderer.
//!
//! A transport opens one ordered stream per drawing session. Commands are sent in program order;
//! closing the stream hands control to the renderer, which answers with a single
//! [`RenderReply`].

use crate::draw::command::DrawCommand;
use crate::foundation::error::TowerResult;
use serde::{Deserialize, Serialize};

/// In-process transport backed by a shared [`crate::LocalRenderer`].
pub mod local;
/// Newline-delimited JSON over TCP.
pub mod wire;

/// Renderer answer to a closed drawing stream. An empty message means success.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderReply {
    #[serde(default)]
    pub message: String,
}

impl RenderReply {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.message.is_empty()
    }
}

/// Connection to a renderer able to open drawing streams.
pub trait Transport {
    type Stream: DrawStream;

    /// Open a fresh stream for one drawing session.
    fn open(&mut self) -> TowerResult<Self::Stream>;
}

/// One open drawing stream.
///
/// `send` may block on backpressure and may fail; the stream is unusable after a failure.
pub trait DrawStream {
    fn send(&mut self, cmd: &DrawCommand) -> TowerResult<()>;

    /// Signal end of input and wait for the renderer's reply.
    fn close_and_receive(self) -> TowerResult<RenderReply>;
}
