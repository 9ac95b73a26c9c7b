//! Background tasks drawing the bottom strip.
//!
//! Both run until shutdown and never touch the player.

use std::sync::Arc;
use std::time::Duration;

use crate::display::Display;
use crate::display::scroll::ScrollBand;
use crate::runner::shutdown::Shutdown;

/// Redraws the clock every `interval`.
pub async fn clock(display: Arc<Display>, shutdown: Shutdown, interval: Duration) {
    loop {
        let now = chrono::Local::now().format("%H:%M").to_string();
        display.show_clock(&now).await;
        if !shutdown.sleep(interval).await {
            break;
        }
    }
    log::debug!("clock task exited");
}

/// Scrolls the ticker or the error text, advancing every `interval`.
///
/// The label is only rebuilt between animation runs, when the text region reports a change.
pub async fn scroll(display: Arc<Display>, shutdown: Shutdown, interval: Duration) {
    'outer: while !shutdown.is_triggered() {
        let (label, mode) = display.text().await.render();
        let mut band = ScrollBand::new(&label);

        loop {
            if display.text().await.should_update() {
                break;
            }
            display.show_label(&label, mode, band.offsets()).await;
            if !shutdown.sleep(interval).await {
                break 'outer;
            }
            band.advance();
        }
    }
    log::debug!("scroll task exited");
}
