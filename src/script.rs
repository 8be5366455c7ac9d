use crate::draw::command::DrawCommand;
use crate::foundation::error::{TowerError, TowerResult};
use crate::render::renderer::RendererOpts;
use crate::session::client::Client;
use crate::transport::Transport;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A drawing session stored as JSON: renderer settings plus an ordered command list.
///
/// ```json
/// {
///   "renderer": { "canvas": { "width": 128, "height": 8 } },
///   "commands": [
///     { "type": "fill", "color": "#ff0000", "layer": 0 },
///     { "type": "write_text", "text": "HELLO", "font": "3x5", "x": 2,
///       "color": "#ffffff", "layer": 1, "mode": "over" }
///   ]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Settings for a local renderer; ignored when sending to a remote one.
    #[serde(default)]
    pub renderer: RendererOpts,
    pub commands: Vec<DrawCommand>,
}

impl Script {
    pub fn from_json_str(s: &str) -> TowerResult<Self> {
        let script: Self = serde_json::from_str(s)?;
        script.validate()?;
        Ok(script)
    }

    pub fn from_path(path: impl AsRef<Path>) -> TowerResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TowerError::validation(format!("open script '{}': {e}", path.display()))
        })?;
        let script: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| TowerError::serde(format!("parse script '{}': {e}", path.display())))?;
        script.validate()?;
        Ok(script)
    }

    /// Reject scripts a renderer could never composite.
    pub fn validate(&self) -> TowerResult<()> {
        let canvas = self.renderer.canvas;
        if canvas.width == 0 || canvas.height == 0 {
            return Err(TowerError::validation("canvas width and height must be > 0"));
        }
        for (i, cmd) in self.commands.iter().enumerate() {
            cmd.validate().map_err(|e| {
                TowerError::validation(format!("command #{i} ({}): {e}", cmd.kind()))
            })?;
        }
        Ok(())
    }

    /// Play the script as one session on `client` and commit it.
    pub fn replay<T: Transport>(&self, client: &mut Client<T>) -> TowerResult<()> {
        client.start_drawing()?;
        for cmd in &self.commands {
            client.send(cmd.clone())?;
        }
        client.render()
    }
}
