use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, SignBridgeError};

/// External player invocation
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl PlayerCommand {
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Exit when the clip ends instead of holding the last frame
    pub fn auto_exit(self) -> Self {
        self.arg("-autoexit")
    }

    pub fn quiet(self) -> Self {
        self.arg("-loglevel").arg("error")
    }

    pub fn window_title<S: Into<String>>(self, title: S) -> Self {
        self.arg("-window_title").arg(title)
    }

    pub fn video_filter<S: Into<String>>(self, filter: S) -> Self {
        self.arg("-vf").arg(filter)
    }

    /// Rate is applied by rescaling presentation timestamps; 1.0 adds nothing.
    pub fn rate(self, rate: f32) -> Self {
        if (rate - 1.0).abs() < f32::EPSILON {
            self
        } else {
            self.video_filter(format!("setpts=PTS/{}", rate))
        }
    }

    /// Run to completion. The child is killed if the future is dropped.
    pub async fn execute(&self) -> Result<()> {
        debug!("Executing player command: {} {:?}", self.binary_path, self.args);
        debug!("Description: {}", self.description);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SignBridgeError::Playback(format!("Failed to execute player: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SignBridgeError::Playback(format!(
                "{} failed: {}",
                self.description,
                stderr.trim()
            )));
        }

        Ok(())
    }

    /// Blocking variant for startup checks.
    pub fn execute_blocking(&self) -> Result<()> {
        debug!("Executing player command: {} {:?}", self.binary_path, self.args);

        let output = std::process::Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| SignBridgeError::Playback(format!("Failed to execute player: {}", e)))?;

        if !output.status.success() {
            return Err(SignBridgeError::Playback(format!("{} failed", self.description)));
        }
        Ok(())
    }
}

/// Builder for the player invocations used during playback
pub struct PlayerCommandBuilder {
    binary_path: String,
}

impl PlayerCommandBuilder {
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Play one clip in its own window and return when it ends
    pub fn play_clip(&self, location: &str, rate: f32, title: &str, additional_options: &[String]) -> PlayerCommand {
        let mut cmd = PlayerCommand::new(&self.binary_path, format!("Playing {}", title))
            .auto_exit()
            .quiet()
            .window_title(title)
            .rate(rate);

        for option in additional_options {
            cmd = cmd.arg(option);
        }

        cmd.arg(location)
    }

    pub fn version_check(&self) -> PlayerCommand {
        PlayerCommand::new(&self.binary_path, "Version check").arg("-version")
    }
}
