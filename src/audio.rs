//! Sound playback through an external player process (aplay by default).

use std::path::Path;
use std::process::{Command, Stdio};

use futures::future;
use log::debug;

use crate::page::PlayFuture;
use crate::sim::{playable_source, Player};

#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandPlayer {
            program: program.into(),
            args,
        }
    }

    /// Start the player on `path`. Returns once the process is running;
    /// a background thread reaps it.
    fn start(&self, path: &Path) -> Result<(), String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| format!("failed to start {}: {e}", self.program))?;

        debug!("Playing sound: {}", path.display());
        let program = self.program.clone();
        std::thread::spawn(move || match child.wait() {
            Ok(status) if !status.success() => debug!("{program} exited with {status}"),
            Ok(_) => {}
            Err(e) => debug!("{program} wait failed: {e}"),
        });
        Ok(())
    }
}

impl Default for CommandPlayer {
    fn default() -> Self {
        CommandPlayer::new("aplay", vec!["-q".into()])
    }
}

impl Player for CommandPlayer {
    fn play(&self, src: Option<&Path>) -> PlayFuture {
        let outcome = playable_source(src).and_then(|path| self.start(path));
        Box::pin(future::ready(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use futures::executor::block_on;

    #[test]
    fn missing_source_is_rejected() {
        let player = CommandPlayer::default();
        let outcome = block_on(player.play(None));
        assert_eq!(outcome, Err("media element has no source".to_string()));
    }

    #[test]
    fn missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("click.wav");
        let outcome = block_on(CommandPlayer::default().play(Some(&path)));
        assert!(outcome.unwrap_err().starts_with("source not found:"));
    }

    #[test]
    fn unknown_program_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("click.wav");
        std::fs::write(&path, b"RIFF").unwrap();
        let player = CommandPlayer::new("sound-button-no-such-player", Vec::new());
        let outcome = block_on(player.play(Some(&path)));
        assert!(outcome.unwrap_err().starts_with("failed to start sound-button-no-such-player"));
    }

    #[cfg(unix)]
    #[test]
    fn resolves_once_process_starts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("click.wav");
        std::fs::write(&path, b"RIFF").unwrap();
        let player = CommandPlayer::new("true", Vec::new());
        assert_eq!(block_on(player.play(Some(&path))), Ok(()));
    }
}
