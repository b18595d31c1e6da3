use std::{
    io::Cursor,
    sync::atomic::{AtomicU32, Ordering},
};

use super::*;
use crate::playback::{
    clock::ManualClock,
    player::PlaybackState,
    test_support::{FakeBackend, FakeLog},
};

const SPRITES: &str = r#"[
    { "id": "bg", "image": { "file": "MAIN.BMP", "spriteWidth": 275, "spriteHeight": 116 } },
    { "id": "player.button.play", "action": "PLAY", "absolutePositionX": 20, "absolutePositionY": 88,
      "image": { "file": "cbuttons.bmp", "spritePositionX": 0, "spriteWidth": 20, "spriteHeight": 18 },
      "downImage": { "file": "cbuttons.bmp", "spritePositionX": 0, "spritePositionY": 18, "spriteWidth": 20, "spriteHeight": 18 } },
    { "id": "player.button.pause", "action": "PAUSE", "absolutePositionX": 40, "absolutePositionY": 88,
      "image": { "file": "cbuttons.bmp", "spritePositionX": 20, "spriteWidth": 20, "spriteHeight": 18 } },
    { "id": "player.button.stop", "action": "STOP", "absolutePositionX": 60, "absolutePositionY": 88,
      "image": { "file": "cbuttons.bmp", "spritePositionX": 40, "spriteWidth": 20, "spriteHeight": 18 } },
    { "id": "player.button.eject", "action": "EJECT", "absolutePositionX": 80, "absolutePositionY": 88,
      "image": { "file": "cbuttons.bmp", "spritePositionX": 60, "spriteWidth": 20, "spriteHeight": 18 } },
    { "id": "player.button.close", "action": "close", "absolutePositionX": 264, "absolutePositionY": 3,
      "image": { "file": "cbuttons.bmp", "spritePositionX": 80, "spriteWidth": 9, "spriteHeight": 9 } },
    { "id": "player.slider.seek", "absolutePositionX": 16, "absolutePositionY": 72,
      "image": { "file": "posbar.bmp", "spriteWidth": 29, "spriteHeight": 10 },
      "isDrag": true, "minDrag": 16, "maxDrag": 235 }
]"#;

fn png(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn skin() -> SkinBundle {
    SkinBundle::from_entries([
        ("main.bmp", png(275, 116, [10, 10, 10, 255])),
        ("cbuttons.bmp", png(100, 36, [200, 200, 200, 255])),
        ("posbar.bmp", png(29, 10, [0, 128, 0, 255])),
        ("text.bmp", png(155, 12, [0, 255, 0, 255])),
        ("numbers.bmp", png(99, 13, [0, 255, 0, 255])),
    ])
}

fn face() -> Face {
    Face::load(skin(), SPRITES.as_bytes(), FaceConfig::default()).unwrap()
}

fn bound_face(total: u64) -> (Face, Player, Arc<ManualClock>, Arc<Mutex<FakeLog>>) {
    let (backend, log) = FakeBackend::new(total);
    let clock = Arc::new(ManualClock::new());
    clock.advance(Duration::from_secs(600));
    let player = Player::new(backend, clock.clone(), Duration::from_millis(10));
    let mut face = face();
    face.bind_player(player.clone(), || Some(PathBuf::from("/music/Whipping Llama.mp3")));
    (face, player, clock, log)
}

fn click(face: &mut Face, x: i32, y: i32) -> Option<Action> {
    face.mouse_down(x, y);
    face.mouse_up(x, y).unwrap()
}

#[test]
fn config_defaults_match_classic_layout() {
    let cfg = FaceConfig::default();
    assert_eq!(cfg.title.text, "CLICK EJECT BUTTON");
    assert_eq!((cfg.title.x, cfg.title.y, cfg.title.str_len), (110, 28, 27));
    assert!(cfg.minutes.numeric);
    assert_eq!((cfg.seconds.x, cfg.seconds.char_spacing), (80, 1));
    assert_eq!(cfg.seek_sprite_id, "player.slider.seek");
    assert_eq!(cfg.tick_interval(), Duration::from_secs(1));
}

#[test]
fn partial_config_keeps_other_defaults() {
    let cfg = FaceConfig::from_json_str(r#"{ "tick_interval_ms": 250 }"#).unwrap();
    assert_eq!(cfg.tick_interval(), Duration::from_millis(250));
    assert_eq!(cfg.title, FaceConfig::default().title);

    assert!(matches!(
        FaceConfig::from_json_str("[1, 2"),
        Err(SkinampError::Serde(_))
    ));
    assert!(matches!(
        FaceConfig::from_path(Path::new("/nonexistent/face.json")),
        Err(SkinampError::Other(_))
    ));
}

#[test]
fn load_builds_text_fields() {
    let face = face();
    assert_eq!(face.text(TITLE_ID), Some("CLICK EJECT BUTTON"));
    assert_eq!(face.text(MINUTES_ID), Some("00"));
    assert_eq!(face.text(SECONDS_ID), Some("00"));
    assert_eq!(face.assets().decode_count("numbers.bmp"), 1);
    assert_eq!(face.background().stack().len(), 7);
}

#[test]
fn load_fails_when_font_bitmap_missing() {
    let bundle = SkinBundle::from_entries([
        ("main.bmp", png(275, 116, [0, 0, 0, 255])),
        ("cbuttons.bmp", png(100, 36, [0, 0, 0, 255])),
        ("posbar.bmp", png(29, 10, [0, 0, 0, 255])),
        ("text.bmp", png(155, 12, [0, 0, 0, 255])),
    ]);
    let err = Face::load(bundle, SPRITES.as_bytes(), FaceConfig::default()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn transport_buttons_drive_the_player() {
    let (mut face, player, _clock, log) = bound_face(125);

    assert_eq!(click(&mut face, 25, 90), Some(Action::Play));
    assert_eq!(player.state(), PlaybackState::Idle);

    assert_eq!(click(&mut face, 85, 90), Some(Action::Eject));
    assert_eq!(face.text(TITLE_ID), Some("WHIPPING LLAMA.MP3"));
    assert_eq!(log.lock().opened.len(), 1);

    click(&mut face, 25, 90);
    assert_eq!(player.state(), PlaybackState::Playing);
    click(&mut face, 45, 90);
    assert_eq!(player.state(), PlaybackState::Paused);
    click(&mut face, 45, 90);
    assert_eq!(player.state(), PlaybackState::Playing);
    click(&mut face, 65, 90);
    assert_eq!(player.state(), PlaybackState::Stopped);
}

#[test]
fn cancelled_eject_keeps_title() {
    let (backend, _log) = FakeBackend::new(10);
    let player = Player::new(backend, Arc::new(ManualClock::new()), Duration::from_millis(10));
    let mut face = face();
    face.bind_player(player, || None);
    click(&mut face, 85, 90);
    assert_eq!(face.text(TITLE_ID), Some("CLICK EJECT BUTTON"));
}

#[test]
fn close_handler_is_registered_separately() {
    let mut face = face();
    let closes = Arc::new(AtomicU32::new(0));
    let c = Arc::clone(&closes);
    face.on_close(move || {
        c.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    assert_eq!(click(&mut face, 266, 5), Some(Action::Close));
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[test]
fn show_time_updates_clock_and_seek_bar() {
    let mut face = face();
    face.show_time(125, 250).unwrap();
    assert_eq!(face.text(MINUTES_ID), Some("02"));
    assert_eq!(face.text(SECONDS_ID), Some("05"));
    let seek = face.background().stack().find_by_id("player.slider.seek").unwrap();
    assert_eq!(seek.position().0, 126);
}

#[test]
fn show_time_leaves_a_dragged_seek_bar_alone() {
    let mut face = face();
    face.drag(20, 75);
    face.drag(40, 75);
    face.show_time(200, 250).unwrap();
    let seek = face.background().stack().find_by_id("player.slider.seek").unwrap();
    assert_eq!(seek.position().0, 40);
    assert_eq!(face.text(MINUTES_ID), Some("03"));
}

#[test]
fn show_time_without_seek_sprite_fails() {
    let config = FaceConfig {
        seek_sprite_id: "player.slider.missing".to_string(),
        ..FaceConfig::default()
    };
    let mut face = Face::load(skin(), SPRITES.as_bytes(), config).unwrap();
    assert!(matches!(
        face.show_time(1, 10),
        Err(SkinampError::Validation(_))
    ));
}

#[test]
fn releasing_seek_bar_seeks_player() {
    let (mut face, player, _clock, log) = bound_face(125);
    click(&mut face, 85, 90);
    click(&mut face, 25, 90);

    face.drag(20, 75);
    face.drag(126, 75);
    assert_eq!(
        face.drag_end().unwrap(),
        Some("player.slider.seek".to_string())
    );
    assert_eq!(log.lock().seeks, vec![Duration::from_secs(63)]);
    assert_eq!(player.elapsed_secs(), 63);
}

#[test]
fn seeking_before_play_starts_from_the_bar() {
    let (mut face, player, clock, log) = bound_face(125);
    click(&mut face, 85, 90);

    face.drag(20, 75);
    face.drag(126, 75);
    face.drag_end().unwrap();
    clock.advance(Duration::from_secs(5));
    assert_eq!(player.elapsed_secs(), 63);

    click(&mut face, 25, 90);
    assert_eq!(player.state(), PlaybackState::Playing);
    clock.advance(Duration::from_secs(2));
    assert_eq!(player.elapsed_secs(), 65);
    assert_eq!(log.lock().seeks, vec![Duration::from_secs(63)]);
}

#[test]
fn tick_handler_updates_face_then_repaints() {
    let shared = Arc::new(Mutex::new(face()));
    let repaints = Arc::new(AtomicU32::new(0));
    let r = Arc::clone(&repaints);
    let mut tick = Face::tick_handler(Arc::clone(&shared), move || {
        r.fetch_add(1, Ordering::SeqCst);
    });

    tick(61, 125).unwrap();
    assert_eq!(repaints.load(Ordering::SeqCst), 1);
    assert_eq!(shared.lock().text(SECONDS_ID), Some("01"));
}
