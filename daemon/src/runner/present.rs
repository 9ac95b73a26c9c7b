//! What is shown between playlists: a countdown before playback, or the idle message.

use crate::backends::PlayerHandle;
use crate::runner::Runner;
use crate::sources::MediaSource;

const QUIT_HINT: &str = "press ESC to quit";

impl<S: MediaSource, P: PlayerHandle> Runner<S, P> {
    /// Presents a freshly built playlist.
    pub(super) async fn prepare_to_run(&self) {
        if self.playlist.is_empty() {
            self.idle().await;
        } else {
            self.countdown().await;
            self.display.blank().await;
        }
    }

    /// Announces the number of movies and counts down one frame per second.
    async fn countdown(&self) {
        let count = self.playlist.len();
        let message = format!("Found {count} video{}.", if count >= 2 { "s" } else { "" });
        log::info!("{message}");
        if !self.display.osd() {
            return;
        }
        let message = format!("{message} Starting playback in:");
        for remaining in (1..=self.settings.countdown).rev() {
            self.display.show_countdown(&message, remaining).await;
            if !self.shutdown.sleep(super::COUNTDOWN_FRAME).await {
                return;
            }
        }
    }

    /// Leaves the source's idle message on screen.
    async fn idle(&self) {
        let message = self.source.idle_message();
        log::info!("{message}");
        let hint = self.settings.keyboard_control.then_some(QUIT_HINT);
        self.display.show_idle(&message, hint).await;
    }
}
