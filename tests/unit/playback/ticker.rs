use std::{
    path::Path,
    sync::{Arc, mpsc},
    time::Duration,
};

use super::*;
use crate::playback::{clock::ManualClock, player::PlaybackState, test_support::FakeBackend};

const WAIT: Duration = Duration::from_secs(2);

fn player() -> (Player, Arc<ManualClock>) {
    let (backend, _log) = FakeBackend::new(125);
    let clock = Arc::new(ManualClock::new());
    let player = Player::new(backend, clock.clone(), Duration::from_millis(5));
    player.load_file(Path::new("/music/track.mp3")).unwrap();
    (player, clock)
}

fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}

#[test]
fn ticks_start_with_playback() {
    let (p, clock) = player();
    let (tx, rx) = mpsc::channel();
    let handle = p
        .spawn_ticker(Box::new(move |elapsed, total| {
            tx.send((elapsed, total)).ok();
            Ok(())
        }))
        .unwrap();

    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

    clock.advance(Duration::from_secs(1));
    p.play().unwrap();
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), (0, 125));

    clock.advance(Duration::from_secs(1));
    let ticked_one = (0..100).any(|_| rx.recv_timeout(WAIT).map(|t| t == (1, 125)).unwrap_or(false));
    assert!(ticked_one);

    handle.shutdown();
}

#[test]
fn ticks_stop_while_paused() {
    let (p, _clock) = player();
    let (tx, rx) = mpsc::channel();
    let handle = p
        .spawn_ticker(Box::new(move |e, t| {
            tx.send((e, t)).ok();
            Ok(())
        }))
        .unwrap();

    p.play().unwrap();
    rx.recv_timeout(WAIT).unwrap();
    p.toggle_pause();
    // let any in-flight tick drain
    std::thread::sleep(Duration::from_millis(30));
    while rx.try_recv().is_ok() {}
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

    p.toggle_pause();
    assert!(rx.recv_timeout(WAIT).is_ok());
    handle.shutdown();
}

#[test]
fn failed_callback_pauses_player() {
    let (p, _clock) = player();
    let handle = p
        .spawn_ticker(Box::new(|_, _| Err(SkinampError::playback("repaint failed"))))
        .unwrap();

    p.play().unwrap();
    assert!(wait_for(|| p.state() == PlaybackState::Paused));
    handle.shutdown();
}

#[test]
fn second_ticker_is_rejected_until_first_shuts_down() {
    let (p, _clock) = player();
    let first = p.spawn_ticker(Box::new(|_, _| Ok(()))).unwrap();
    let err = p.spawn_ticker(Box::new(|_, _| Ok(()))).unwrap_err();
    assert!(matches!(err, SkinampError::Validation(_)));

    first.shutdown();
    let again = p.spawn_ticker(Box::new(|_, _| Ok(()))).unwrap();
    drop(again);
}

#[test]
fn shutdown_interrupts_a_running_session() {
    let (backend, _log) = FakeBackend::new(10);
    let p = Player::new(backend, Arc::new(ManualClock::new()), Duration::from_secs(3600));
    p.load_file(Path::new("/music/long.mp3")).unwrap();
    let (tx, rx) = mpsc::channel();
    let handle = p
        .spawn_ticker(Box::new(move |_, _| {
            tx.send(()).ok();
            Ok(())
        }))
        .unwrap();
    p.play().unwrap();
    rx.recv_timeout(WAIT).unwrap();

    let started = Instant::now();
    handle.shutdown();
    assert!(started.elapsed() < WAIT);
}
