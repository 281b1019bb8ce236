//! Host power-off.

use std::process::Command;

use crate::controller::PowerControl;
use crate::error::VideoWallError;

/// Powers the host off by running a fixed command, `sudo shutdown -h now`
/// by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPower {
    program: String,
    args: Vec<String>,
}

impl Default for SystemPower {
    fn default() -> Self {
        Self::new("sudo", ["shutdown", "-h", "now"])
    }
}

impl SystemPower {
    /// Use a custom power-off command.
    pub fn new<I, A>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl PowerControl for SystemPower {
    fn power_off(&mut self) -> Result<(), VideoWallError> {
        log::info!("Running {} {}", self.program, self.args.join(" "));
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|error| VideoWallError::PowerCommandFailed(format!("{}: {error}", self.program)))?;
        if status.success() {
            Ok(())
        } else {
            Err(VideoWallError::PowerCommandFailed(format!(
                "{} exited with {status}",
                self.program
            )))
        }
    }
}
