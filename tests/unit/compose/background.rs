use std::sync::Arc;

use super::*;
use crate::{
    assets::store::Bitmap,
    sprite::{animated::AnimatedSprite, region::Sprite},
    text::sprite::TextSprite,
};

const RED: Rgba8 = Rgba8::opaque(255, 0, 0);
const GREEN: Rgba8 = Rgba8::opaque(0, 255, 0);
const WHITE: Rgba8 = Rgba8::opaque(255, 255, 255);

fn bitmap(w: u32, h: u32, c: Rgba8) -> Arc<Bitmap> {
    Arc::new(Bitmap {
        width: w,
        height: h,
        rgba8: Arc::new(c.to_array().repeat((w * h) as usize)),
    })
}

fn face() -> Background {
    // base sprite only claims the left half of its 10x8 bitmap
    let base = AnimatedSprite::new(
        "bg",
        0,
        0,
        Sprite::from_bitmap("main.bmp", bitmap(10, 8, RED), 0, 0, 5, 8),
    );
    let button = AnimatedSprite::new(
        "play",
        6,
        0,
        Sprite::from_bitmap("cbuttons.bmp", bitmap(2, 2, GREEN), 0, 0, 2, 2),
    )
    .with_action(Action::Play);

    let mut text = TextLayer::new();
    let mut title = TextSprite::new("title", bitmap(150, 12, WHITE), false, 2).with_position(0, 4);
    title.set("A");
    text.push(title);

    Background::new(SpriteStack::new(vec![base, button]), text)
}

#[test]
fn bounds_follow_base_bitmap() {
    let bg = face();
    assert_eq!(bg.bounds(), PixelRect::new(0, 0, 10, 8));
    assert_eq!(bg.color_model(), crate::foundation::core::ColorModel::Rgba8);
}

#[test]
fn layers_resolve_text_then_stack_then_base() {
    let mut bg = face();
    assert_eq!(bg.color_at(1, 4), Some(WHITE));
    assert_eq!(bg.color_at(6, 1), Some(GREEN));
    assert_eq!(bg.color_at(1, 1), Some(RED));
    // outside every sprite rect but inside the base bitmap
    assert_eq!(bg.color_at(9, 7), Some(RED));
    assert_eq!(bg.color_at(50, 50), Some(Rgba8::transparent()));
}

#[test]
fn base_fallback_honours_placement_and_offset() {
    const BLUE: Rgba8 = Rgba8::opaque(0, 0, 255);
    let mut px = RED.to_array().repeat(8 * 6);
    let idx = (2 * 8 + 5) * 4;
    px[idx..idx + 4].copy_from_slice(&BLUE.to_array());
    let sheet = Arc::new(Bitmap {
        width: 8,
        height: 6,
        rgba8: Arc::new(px),
    });

    // region is 2x2 at offset (1, 1), placed at (3, 2)
    let base = AnimatedSprite::new("bg", 3, 2, Sprite::from_bitmap("main.bmp", sheet, 1, 1, 2, 2));
    let mut bg = Background::new(SpriteStack::new(vec![base]), TextLayer::new());

    // skin (7, 3) -> local (4, 1) -> bitmap (5, 2), outside the declared region
    assert_eq!(bg.color_at(7, 3), Some(BLUE));
    assert_eq!(bg.color_at(6, 3), Some(RED));
    // local (-3, 0) -> bitmap (-2, 1) lies off the sheet
    assert_eq!(bg.color_at(0, 2), Some(Rgba8::transparent()));
}

#[test]
fn empty_text_cells_fall_through() {
    let mut bg = face();
    // second title cell holds no character
    assert_eq!(bg.color_at(6, 4), Some(RED));
}

#[test]
fn snapshot_pulls_every_pixel() {
    let mut bg = face();
    let img = bg.snapshot();
    assert_eq!(img.dimensions(), (10, 8));
    assert_eq!(img.get_pixel(6, 0).0, GREEN.to_array());
    assert_eq!(img.get_pixel(0, 5).0, WHITE.to_array());
    assert_eq!(img.get_pixel(9, 7).0, RED.to_array());
}

#[test]
fn pointer_events_reach_the_stack() {
    let mut bg = face();
    bg.mouse_down(6, 0);
    assert!(bg.stack().find_by_id("play").unwrap().is_pressed());
    assert_eq!(bg.mouse_up(6, 0).unwrap(), Some(Action::Play));
    bg.drag(7, 1);
    assert_eq!(bg.drag_end(), Some("play".to_string()));
}
