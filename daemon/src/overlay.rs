//! Static images shown on top of the video, each by its own viewer process.

use crate::config::OverlayConfig;
use crate::utils::subprocess::{Supervised, SubprocessError, quiet_command};

pub struct Overlay {
    config: OverlayConfig,
    process: Option<Supervised>,
}

impl Overlay {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            process: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Arguments passed to the viewer.
    fn get_args(&self) -> Vec<String> {
        vec![
            "-b".to_string(),
            "0".to_string(),
            "-l".to_string(),
            self.config.layer.to_string(),
            "-x".to_string(),
            self.config.x.to_string(),
            "-y".to_string(),
            self.config.y.to_string(),
            self.config.path.to_string_lossy().into_owned(),
        ]
    }

    /// Spawns the viewer. An overlay already on screen is left alone.
    ///
    /// # Errors
    /// Returns a [`SubprocessError`] if the viewer cannot be started.
    pub fn display(&mut self) -> Result<(), SubprocessError> {
        if self.process.as_mut().is_some_and(Supervised::is_alive) {
            return Ok(());
        }
        let mut cmd = quiet_command(&self.config.viewer, &self.get_args());
        self.process = Some(Supervised::spawn(&self.config.viewer, &mut cmd)?);
        Ok(())
    }

    /// Kills the viewer.
    pub async fn stop(&mut self) {
        if let Some(process) = self.process.take() {
            process.kill().await;
        }
    }

    pub fn is_displayed(&mut self) -> bool {
        self.process.as_mut().is_some_and(Supervised::is_alive)
    }
}
