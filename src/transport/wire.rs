use crate::draw::command::DrawCommand;
use crate::foundation::error::{TowerError, TowerResult};
use crate::render::frame::Frame;
use crate::render::renderer::LocalRenderer;
use crate::transport::{DrawStream, RenderReply, Transport};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::TcpStream;

/// One line sent from client to renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientFrame {
    Draw(DrawCommand),
    /// End of the session's input; the renderer composites and replies.
    Render,
}

fn write_line<W: Write, T: Serialize>(writer: &mut W, value: &T) -> TowerResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Client half of the JSON-lines codec over any reader/writer pair.
#[derive(Debug)]
pub struct WireStream<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> WireStream<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> DrawStream for WireStream<R, W> {
    fn send(&mut self, cmd: &DrawCommand) -> TowerResult<()> {
        write_line(&mut self.writer, &ClientFrame::Draw(cmd.clone()))
    }

    fn close_and_receive(mut self) -> TowerResult<RenderReply> {
        write_line(&mut self.writer, &ClientFrame::Render)?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(TowerError::transport(
                "renderer closed the stream without a reply",
            ));
        }
        serde_json::from_str(line.trim_end())
            .map_err(|e| TowerError::transport(format!("malformed render reply: {e}")))
    }
}

/// Transport opening one TCP connection per drawing session.
///
/// Sends are not acknowledged. A command the remote renderer rejects, such as one naming an
/// unknown font or an out-of-range autoroll entry, only surfaces at commit as
/// [`TowerError::RenderFailed`] carrying the renderer's message. Use [`crate::LocalTransport`]
/// to get the typed error from the failing call itself.
#[derive(Clone, Debug)]
pub struct TcpTransport {
    addr: String,
}

impl TcpTransport {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Transport for TcpTransport {
    type Stream = WireStream<BufReader<TcpStream>, BufWriter<TcpStream>>;

    fn open(&mut self) -> TowerResult<Self::Stream> {
        let stream = TcpStream::connect(&self.addr).map_err(|e| {
            TowerError::transport(format!("connect to renderer at {}: {e}", self.addr))
        })?;
        stream.set_nodelay(true)?;
        let reader = BufReader::new(stream.try_clone()?);
        tracing::debug!(addr = %self.addr, "drawing stream opened");
        Ok(WireStream::new(reader, BufWriter::new(stream)))
    }
}

/// How a served drawing stream ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The client committed and the frame was composited.
    Rendered(Frame),
    /// The client committed after a failed command; the reply carried this message.
    Failed(String),
    /// The stream ended without a commit. Delivered commands stay applied.
    Aborted { applied: usize },
}

/// Serve one drawing stream against `renderer`.
///
/// The first failing command poisons the stream: later commands are read but ignored, and the
/// commit reply carries the failure message.
#[tracing::instrument(skip_all)]
pub fn serve_connection<R: BufRead, W: Write>(
    renderer: &mut LocalRenderer,
    mut reader: R,
    mut writer: W,
) -> TowerResult<SessionOutcome> {
    let mut applied = 0usize;
    let mut poisoned: Option<String> = None;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            tracing::warn!(applied, "drawing stream ended without render");
            return Ok(SessionOutcome::Aborted { applied });
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let frame = match serde_json::from_str::<ClientFrame>(text) {
            Ok(frame) => frame,
            Err(e) => {
                if poisoned.is_none() {
                    tracing::warn!(error = %e, "malformed client frame");
                    poisoned = Some(format!("malformed command: {e}"));
                }
                continue;
            }
        };

        match frame {
            ClientFrame::Draw(cmd) => {
                if poisoned.is_some() {
                    continue;
                }
                match renderer.apply(&cmd) {
                    Ok(()) => applied += 1,
                    Err(e) => {
                        tracing::warn!(kind = cmd.kind(), error = %e, "command rejected");
                        poisoned = Some(e.to_string());
                    }
                }
            }
            ClientFrame::Render => {
                let (reply, outcome) = match poisoned {
                    Some(msg) => (RenderReply::failed(msg.clone()), SessionOutcome::Failed(msg)),
                    None => {
                        let frame = renderer.render();
                        (RenderReply::ok(), SessionOutcome::Rendered(frame))
                    }
                };
                write_line(&mut writer, &reply)?;
                return Ok(outcome);
            }
        }
    }
}

/// [`serve_connection`] over an accepted TCP stream.
pub fn serve_tcp(renderer: &mut LocalRenderer, stream: TcpStream) -> TowerResult<SessionOutcome> {
    let peer = stream.peer_addr().ok();
    tracing::debug!(?peer, "serving drawing stream");
    let reader = BufReader::new(stream.try_clone()?);
    serve_connection(renderer, reader, BufWriter::new(stream))
}

#[cfg(test)]
#[path = "../../tests/unit/transport/wire.rs"]
mod tests;
