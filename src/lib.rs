//! Skinamp is the core of a skinnable, Winamp-style media player face.
//!
//! It turns a classic skin archive plus a sprite declaration list into a single
//! pull-sampled image, maps pointer input onto that image, and runs a small
//! playback engine whose periodic ticks drive the on-skin clock and seek bar.
//!
//! # Pieces
//!
//! 1. **Assets**: `SkinBundle` (zip / directory / in-memory) behind an `AssetStore`
//!    that decodes every bitmap at most once.
//! 2. **Sprites**: `SpriteStack` of `AnimatedSprite`s (pressed / toggled / dragged),
//!    topmost-first color resolution and hit-testing, `Action` dispatch.
//! 3. **Text**: `TextSprite` fields drawn from the skin's fixed-cell bitmap fonts.
//! 4. **Compositor**: `Background` implements [`PixelSource`] over text, sprites
//!    and the base bitmap; `snapshot()` renders a full frame.
//! 5. **Playback**: `Player` state machine over an [`AudioBackend`], with a tick
//!    thread reporting elapsed/total seconds.
//! 6. **Face**: the main-window wiring between all of the above.
//!
//! The windowing toolkit is not part of this crate: it owns the event loop,
//! scales raw pointer events into skin pixels and calls back into [`Face`].
//!
//! Real audio output lives behind the `rodio` feature.
#![forbid(unsafe_code)]

mod assets;
mod compose;
mod face;
mod foundation;
mod playback;
mod sprite;
mod text;

pub use assets::bundle::SkinBundle;
pub use assets::decode::decode_bitmap;
pub use assets::store::{AssetStore, Bitmap};
pub use compose::background::Background;
pub use face::{Face, FaceConfig, MINUTES_ID, SECONDS_ID, TITLE_ID};
pub use foundation::core::{ColorModel, PixelRect, PixelSource, Rgba8};
pub use foundation::error::{SkinampError, SkinampResult};
pub use playback::clock::{Clock, ManualClock, SystemClock};
pub use playback::output::{AudioBackend, AudioOutput, LoadedSource, probe_duration};
#[cfg(feature = "rodio")]
pub use playback::output::{AudioDevice, RodioBackend};
pub use playback::player::{PlaybackState, Player};
pub use playback::ticker::{TickCallback, TickerHandle};
pub use sprite::action::{Action, ActionHandler, ActionRegistry};
pub use sprite::animated::AnimatedSprite;
pub use sprite::model::{AnimatedSpriteDecl, SpriteDecl, parse_sprite_decls, validate_decls};
pub use sprite::region::Sprite;
pub use sprite::stack::SpriteStack;
pub use text::atlas::{ALPHANUMERIC, GlyphAtlas, GlyphCell, NUMERIC, atlas_for};
pub use text::sprite::{TextLayer, TextSprite, TextSpriteConfig};
