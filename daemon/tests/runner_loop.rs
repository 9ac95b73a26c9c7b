//! Tests the main loop of the runner

use std::path::PathBuf;
use std::time::Duration;

use looperd::display::screen::Region;
use looperd::runner::keyboard::Key;
use looperd::runner::shutdown::Shutdown;
use looperd::runner::{CHANGE_GRACE, LoopFlag, PLAY_RETRY, Runner, SKIP_GRACE};

mod common;
use common::{FakePlayer, FakeSource};

fn runner(
    paths: Vec<PathBuf>,
    changes: &[bool],
    player: FakePlayer,
) -> (Runner<FakeSource, FakePlayer>, common::Frames) {
    common::setup();
    let (display, frames) = common::display(PathBuf::from("/nonexistent/ticker.txt"));
    let runner = Runner::new(
        FakeSource::new(paths, changes),
        player,
        display,
        common::settings(PathBuf::from("/nonexistent/message_pipe")),
        Shutdown::new(),
    );
    (runner, frames)
}

#[test]
fn single_movie_loops() {
    let dir = tempfile::tempdir().unwrap();
    common::touch(dir.path(), &["only.mp4"]);
    let (mut runner, _) = runner(vec![dir.path().to_path_buf()], &[], FakePlayer::new(false));

    smol::block_on(async {
        runner.load_playlist().await;
        assert_eq!(runner.tick().await, LoopFlag::Continue);
        // Still playing, nothing new is started
        assert_eq!(runner.tick().await, LoopFlag::Continue);
    });

    let plays = &runner.player().plays;
    assert_eq!(plays.len(), 1);
    assert!(plays[0].0.ends_with("/only.mp4"));
    assert!(plays[0].1);
}

#[test]
fn cycle_through_movies() {
    let dir = tempfile::tempdir().unwrap();
    common::touch(dir.path(), &["b.mp4", "a.mkv"]);
    let (mut runner, _) = runner(vec![dir.path().to_path_buf()], &[], FakePlayer::new(true));

    smol::block_on(async {
        runner.load_playlist().await;
        for _ in 0..3 {
            runner.tick().await;
        }
    });

    let played: Vec<(&str, bool)> = runner
        .player()
        .plays
        .iter()
        .map(|(item, looping, _)| (item.rsplit('/').next().unwrap(), *looping))
        .collect();
    assert_eq!(
        played,
        [("a.mkv", false), ("b.mp4", false), ("a.mkv", false)]
    );
}

#[test]
fn sorted_and_filtered() {
    let dir = tempfile::tempdir().unwrap();
    common::touch(
        dir.path(),
        &["b.mp4", "A.mp4", "c.MP4", ".d.mp4", "notes.txt"],
    );
    let (mut runner, _) = runner(vec![dir.path().to_path_buf()], &[], FakePlayer::new(false));

    let playlist = runner.build_playlist();
    let names: Vec<&str> = playlist
        .items()
        .iter()
        .map(|item| item.rsplit('/').next().unwrap())
        .collect();
    assert_eq!(names, ["A.mp4", "b.mp4", "c.MP4"]);
}

#[test]
fn playlist_file_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("playlist.m3u");
    std::fs::write(&file, "/media/z.mp4\n\n  /media/a.txt  \n").unwrap();
    let (mut runner, _) = runner(vec![file], &[], FakePlayer::new(false));

    let playlist = runner.build_playlist();
    assert_eq!(playlist.items(), ["/media/z.mp4", "/media/a.txt"]);
}

#[test]
fn volume_hint() {
    let dir = tempfile::tempdir().unwrap();
    common::touch(dir.path(), &["movie.mp4"]);
    std::fs::write(dir.path().join("sound_volume"), "-300.7\n").unwrap();
    let (mut runner, _) = runner(vec![dir.path().to_path_buf()], &[], FakePlayer::new(false));

    smol::block_on(async {
        runner.load_playlist().await;
        runner.tick().await;
    });
    assert_eq!(runner.volume(), -300);
    assert_eq!(runner.player().plays[0].2, -300);
}

#[test]
fn rebuild_once_per_change() {
    let dir = tempfile::tempdir().unwrap();
    common::touch(dir.path(), &["one.mp4", "two.mp4"]);
    let (mut runner, _) = runner(
        vec![dir.path().to_path_buf()],
        &[false, true, false, false],
        FakePlayer::new(false),
    );

    smol::block_on(async {
        runner.load_playlist().await;
        for _ in 0..4 {
            runner.tick().await;
        }
    });

    assert_eq!(runner.source().scans.get(), 2);
    assert_eq!(runner.player().stops, [Some(CHANGE_GRACE)]);
    // Playback restarts from the top of the rebuilt playlist
    let plays = &runner.player().plays;
    assert_eq!(plays.len(), 2);
    assert_eq!(plays[0].0, plays[1].0);
}

#[test]
fn idle_without_movies() {
    let dir = tempfile::tempdir().unwrap();
    common::touch(dir.path(), &["readme.txt"]);
    let (mut runner, frames) = runner(vec![dir.path().to_path_buf()], &[], FakePlayer::new(false));

    smol::block_on(async {
        runner.load_playlist().await;
        runner.tick().await;
    });

    assert!(runner.playlist().is_empty());
    assert!(runner.player().plays.is_empty());
    assert_eq!(
        common::texts(&frames, Region::Main),
        [
            "Insert USB drive with compatible movies.",
            "press ESC to quit"
        ]
    );
    assert!(common::captured().contains("Insert USB drive with compatible movies."));
}

#[test]
fn countdown_before_playback() {
    let dir = tempfile::tempdir().unwrap();
    common::touch(dir.path(), &["one.mp4", "two.mp4"]);
    let (display, frames) = common::display(PathBuf::from("/nonexistent/ticker.txt"));
    let mut settings = common::settings(PathBuf::from("/nonexistent/message_pipe"));
    settings.countdown = 1;
    let mut runner = Runner::new(
        FakeSource::new(vec![dir.path().to_path_buf()], &[]),
        FakePlayer::new(false),
        display,
        settings,
        Shutdown::new(),
    );

    smol::block_on(runner.load_playlist());
    assert_eq!(
        common::texts(&frames, Region::Main),
        ["Found 2 videos. Starting playback in:", "1"]
    );
}

#[test]
fn operator_keys() {
    let dir = tempfile::tempdir().unwrap();
    common::touch(dir.path(), &["one.mp4", "two.mp4"]);
    let (tx, rx) = smol::channel::unbounded();
    let (runner, _) = runner(vec![dir.path().to_path_buf()], &[], FakePlayer::new(false));
    let mut runner = runner.with_keys(rx);

    smol::block_on(async {
        runner.load_playlist().await;
        runner.tick().await;
        tx.send(Key::Skip).await.unwrap();
        assert_eq!(runner.tick().await, LoopFlag::Continue);
        assert_eq!(runner.player().stops, [Some(SKIP_GRACE)]);
        // The skipped movie is replaced on the next tick
        runner.tick().await;
        assert_eq!(runner.player().plays.len(), 2);

        tx.send(Key::Quit).await.unwrap();
        assert_eq!(runner.tick().await, LoopFlag::Break);
    });
}

#[test]
fn quit_on_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let shutdown = Shutdown::new();
    common::setup();
    let (display, _) = common::display(PathBuf::from("/nonexistent/ticker.txt"));
    let mut runner = Runner::new(
        FakeSource::new(vec![dir.path().to_path_buf()], &[]),
        FakePlayer::new(false),
        display,
        common::settings(dir.path().join("message_pipe")),
        shutdown.clone(),
    );

    smol::block_on(async {
        let trigger = shutdown.clone();
        smol::spawn(async move {
            smol::Timer::after(Duration::from_millis(100)).await;
            trigger.trigger();
        })
        .detach();
        runner.run().await;
    });
    assert!(shutdown.is_triggered());
    assert_eq!(runner.player().stops, [None]);
}

#[test]
fn back_off_when_player_fails() {
    let dir = tempfile::tempdir().unwrap();
    common::touch(dir.path(), &["one.mp4", "two.mp4"]);
    let mut player = FakePlayer::new(false);
    player.broken = true;
    let (mut runner, _) = runner(vec![dir.path().to_path_buf()], &[], player);

    smol::block_on(async {
        runner.load_playlist().await;
        for _ in 0..500 {
            assert_eq!(runner.tick().await, LoopFlag::Continue);
        }
        assert_eq!(runner.player().plays.len(), 1);

        smol::Timer::after(PLAY_RETRY + Duration::from_millis(100)).await;
        runner.tick().await;
        runner.tick().await;
    });

    let played: Vec<&str> = runner
        .player()
        .plays
        .iter()
        .map(|(item, ..)| item.rsplit('/').next().unwrap())
        .collect();
    assert_eq!(played, ["one.mp4", "two.mp4"]);
}

/// Runner whose display has the on-screen display turned off.
fn runner_without_osd(
    paths: Vec<PathBuf>,
    message: &str,
) -> (Runner<FakeSource, FakePlayer>, common::Frames) {
    common::setup();
    let (display, frames) =
        common::display_with_osd(PathBuf::from("/nonexistent/ticker.txt"), false);
    let mut source = FakeSource::new(paths, &[]);
    source.message = message.to_string();
    let mut settings = common::settings(PathBuf::from("/nonexistent/message_pipe"));
    settings.countdown = 3;
    let runner = Runner::new(source, FakePlayer::new(false), display, settings, Shutdown::new());
    (runner, frames)
}

#[test]
fn countdown_without_osd() {
    let dir = tempfile::tempdir().unwrap();
    common::touch(dir.path(), &["one.mp4", "two.mp4", "three.mp4"]);
    let (mut runner, frames) = runner_without_osd(vec![dir.path().to_path_buf()], "unused");

    let start = std::time::Instant::now();
    smol::block_on(async {
        runner.load_playlist().await;
        runner.tick().await;
    });

    // Nothing drawn and no countdown to wait for, but still announced and played
    assert!(start.elapsed() < Duration::from_secs(2));
    assert!(frames.lock().unwrap().is_empty());
    assert!(common::captured().contains("Found 3 videos."));
    assert_eq!(runner.player().plays.len(), 1);
}

#[test]
fn idle_without_osd() {
    let dir = tempfile::tempdir().unwrap();
    let (mut runner, frames) =
        runner_without_osd(vec![dir.path().to_path_buf()], "No movies found in the lobby");

    smol::block_on(async {
        runner.load_playlist().await;
        runner.tick().await;
    });

    assert!(frames.lock().unwrap().is_empty());
    assert!(common::captured().contains("No movies found in the lobby"));
    assert!(runner.player().plays.is_empty());
}
