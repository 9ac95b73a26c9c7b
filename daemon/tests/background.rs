//! Tests the tasks drawing the bottom strip

use std::time::Duration;

use looperd::display::ERROR_COLOR;
use looperd::display::screen::{Draw, Region};
use looperd::runner::shutdown::Shutdown;
use looperd::runner::tasks;

mod common;

/// Labels drawn in the ticker band, with their color.
fn labels(frames: &common::Frames) -> Vec<(String, i32, looperd::display::Rgb)> {
    frames
        .lock()
        .unwrap()
        .iter()
        .filter(|(region, _)| *region == Region::Ticker)
        .flat_map(|(_, frame)| frame.clone())
        .filter_map(|draw| match draw {
            Draw::Label {
                text, offset, fg, ..
            } => Some((text, offset, fg)),
            _ => None,
        })
        .collect()
}

#[test]
fn clock_ticks() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();
    let (display, frames) = common::display(dir.path().join("ticker.txt"));
    let shutdown = Shutdown::new();

    smol::block_on(async {
        let task = smol::spawn(tasks::clock(
            display.clone(),
            shutdown.clone(),
            Duration::from_millis(20),
        ));
        smol::Timer::after(Duration::from_millis(100)).await;
        shutdown.trigger();
        task.await;
    });

    let clock = smol::block_on(display.clock());
    assert_eq!(clock.len(), 5);
    assert_eq!(clock.as_bytes()[2], b':');
    assert!(common::texts(&frames, Region::Clock).len() >= 2);
}

#[test]
fn scroll_ticker_then_error() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();
    let ticker = dir.path().join("ticker.txt");
    std::fs::write(&ticker, "Opening hours 9-18\n").unwrap();
    let (display, frames) = common::display(ticker);
    let shutdown = Shutdown::new();

    smol::block_on(async {
        let task = smol::spawn(tasks::scroll(
            display.clone(),
            shutdown.clone(),
            Duration::from_millis(2),
        ));
        smol::Timer::after(Duration::from_millis(100)).await;
        display.text().await.show_error("disk full".to_string());
        smol::Timer::after(Duration::from_millis(100)).await;
        shutdown.trigger();
        task.await;
    });

    let labels = labels(&frames);
    let first = &labels[0];
    assert!(first.0.starts_with("Opening hours 9-18"));
    assert_eq!(first.2, common::colors().bot_fg);
    // The second copy trails the first
    assert!(labels[1].1 < first.1);

    let errors: Vec<_> = labels.iter().filter(|(text, ..)| *text == "disk full").collect();
    assert!(!errors.is_empty());
    assert!(errors.iter().all(|(_, _, fg)| *fg == ERROR_COLOR));
}
