//! External full-screen playback.
//!
//! The kiosk does not decode selected videos itself; it runs a media player
//! as a subprocess and waits for it to exit (end of video, or the player's
//! own quit key). No timeout is applied.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use crate::controller::Player;
use crate::error::VideoWallError;

/// Default player program.
pub const DEFAULT_PLAYER: &str = "cvlc";

/// Default arguments placed before the video path.
pub const DEFAULT_PLAYER_ARGS: [&str; 2] = ["--fullscreen", "--play-and-exit"];

/// Plays videos by running `<program> <args...> <path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalPlayer {
    program: String,
    args: Vec<String>,
}

impl Default for ExternalPlayer {
    fn default() -> Self {
        Self {
            program: DEFAULT_PLAYER.to_string(),
            args: DEFAULT_PLAYER_ARGS.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

impl ExternalPlayer {
    /// Use `program` with `args` before the video path.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parse a whitespace-separated command line such as `"mpv --fs"`.
    ///
    /// Returns `None` for an empty string.
    ///
    /// ```
    /// use videowall::ExternalPlayer;
    ///
    /// let player = ExternalPlayer::from_command_line("mpv --fs --really-quiet").unwrap();
    /// assert_eq!(player.program(), "mpv");
    /// assert_eq!(player.args(), ["--fs", "--really-quiet"]);
    /// ```
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self::new(program, words.collect()))
    }

    /// Program that is run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments placed before the path.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Player for ExternalPlayer {
    /// Run the player and wait for it.
    ///
    /// A non-zero exit status is logged, not returned: players commonly exit
    /// non-zero when the viewer quits early.
    fn play(&mut self, path: &Path) -> Result<(), VideoWallError> {
        log::debug!("Running {} {:?} {}", self.program, self.args, path.display());
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .map_err(|error| match error.kind() {
                ErrorKind::NotFound => VideoWallError::PlayerNotFound {
                    program: self.program.clone(),
                },
                _ => VideoWallError::PlayerFailed(format!("{}: {error}", self.program)),
            })?;
        if !status.success() {
            log::warn!("{} exited with {status}", self.program);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_play_and_exit_vlc() {
        let player = ExternalPlayer::default();
        assert_eq!(player.program(), "cvlc");
        assert_eq!(player.args(), ["--fullscreen", "--play-and-exit"]);
    }

    #[test]
    fn empty_command_line() {
        assert!(ExternalPlayer::from_command_line("   ").is_none());
    }

    #[test]
    fn missing_program_is_reported() {
        let mut player = ExternalPlayer::new("videowall-no-such-player", Vec::new());
        let result = player.play(Path::new("clip.mp4"));
        assert!(matches!(
            result,
            Err(VideoWallError::PlayerNotFound { program }) if program == "videowall-no-such-player"
        ));
    }
}
