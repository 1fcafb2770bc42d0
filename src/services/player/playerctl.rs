use std::{
    io,
    process::{Output, Stdio},
};

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::Command,
};
use tracing::{debug, instrument, warn};

use super::{
    MIN_SEEK_SECONDS, MediaState, PlayerControl, PlayerId, STATUS_FORMAT, ServiceError,
    StatusLines, TransportCommand, parse_status_line,
};

/// [`PlayerControl`] backed by the `playerctl` command-line tool.
///
/// Every request runs a fresh `playerctl` process. Subscriptions keep their
/// process alive until the returned stream is dropped.
#[derive(Debug, Clone)]
pub struct Playerctl {
    binary: String,
}

impl Playerctl {
    /// Creates a client that runs `binary` (a name looked up on `PATH`, or a
    /// path).
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The executable this client runs.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn process(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command.stdin(Stdio::null());
        command
    }

    fn launch_error(&self, error: &io::Error) -> ServiceError {
        ServiceError::Launch {
            binary: self.binary.clone(),
            details: error.to_string(),
        }
    }

    async fn output(&self, args: &[&str]) -> Result<Output, ServiceError> {
        self.process()
            .args(args)
            .output()
            .await
            .map_err(|e| self.launch_error(&e))
    }
}

impl Default for Playerctl {
    fn default() -> Self {
        Self::new("playerctl")
    }
}

#[async_trait]
impl PlayerControl for Playerctl {
    #[instrument(skip(self), fields(binary = %self.binary))]
    async fn list_players(&self) -> Result<Vec<PlayerId>, ServiceError> {
        let output = self.output(&["-l"]).await?;

        if !output.status.success() {
            debug!(status = %output.status, "No players reported");
            return Ok(Vec::new());
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PlayerId::from)
            .collect())
    }

    #[instrument(skip_all, fields(player = %player))]
    async fn status(&self, player: &PlayerId) -> Result<MediaState, ServiceError> {
        let output = self
            .output(&[
                "metadata",
                "-p",
                player.as_str(),
                "--format",
                STATUS_FORMAT,
            ])
            .await?;

        if !output.status.success() {
            let details = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ServiceError::PlayerUnavailable(player.clone(), details));
        }

        let line = String::from_utf8_lossy(&output.stdout);
        Ok(parse_status_line(line.trim())?)
    }

    #[instrument(skip_all, fields(player = %player))]
    async fn subscribe_status(&self, player: &PlayerId) -> Result<StatusLines, ServiceError> {
        let mut child = self
            .process()
            .args([
                "metadata",
                "-F",
                "-p",
                player.as_str(),
                "--format",
                STATUS_FORMAT,
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.launch_error(&e))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            ServiceError::Io(io::Error::other("subscription stdout was not captured"))
        })?;

        debug!("Status subscription started");

        let player = player.clone();
        let stream = async_stream::stream! {
            let _child = child;
            let mut lines = BufReader::new(stdout).lines();

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => yield line,
                    Ok(None) => {
                        debug!(player = %player, "Status subscription ended");
                        break;
                    }
                    Err(e) => {
                        warn!(player = %player, error = %e, "Status subscription read failed");
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }

    fn command(&self, player: &PlayerId, command: TransportCommand) {
        let spawned = self
            .process()
            .args([command.as_arg(), "-p", player.as_str()])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                warn!(player = %player, command = command.as_arg(), error = %e, "Failed to send command");
                return;
            }
        };

        let player = player.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if !status.success() => {
                    debug!(player = %player, command = command.as_arg(), %status, "Command exited unsuccessfully");
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(player = %player, command = command.as_arg(), error = %e, "Failed to wait for command");
                }
            }
        });
    }

    #[instrument(skip_all, fields(player = %player, seconds = seconds))]
    async fn seek(&self, player: &PlayerId, seconds: f64) -> Result<(), ServiceError> {
        let target = seconds.max(MIN_SEEK_SECONDS).to_string();

        let status = self
            .process()
            .args(["position", target.as_str(), "-p", player.as_str()])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| self.launch_error(&e))?;

        if status.success() {
            Ok(())
        } else {
            Err(ServiceError::CommandFailed {
                player: player.clone(),
                command: String::from("position"),
                details: status.to_string(),
            })
        }
    }
}
