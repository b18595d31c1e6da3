use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context;
use parking_lot::Mutex;

use crate::{
    assets::{bundle::SkinBundle, store::AssetStore},
    compose::background::Background,
    foundation::error::{SkinampError, SkinampResult},
    playback::{player::Player, ticker::TickCallback},
    sprite::{action::Action, stack::SpriteStack},
    text::sprite::{TextLayer, TextSprite, TextSpriteConfig},
};

/// Text layer id of the track title field.
pub const TITLE_ID: &str = "title";
/// Text layer id of the elapsed-minutes field.
pub const MINUTES_ID: &str = "minutes";
/// Text layer id of the elapsed-seconds field.
pub const SECONDS_ID: &str = "seconds";

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Main-window layout knobs that are not part of the skin itself.
pub struct FaceConfig {
    /// Track title field.
    #[serde(default = "default_title")]
    pub title: TextSpriteConfig,
    /// Elapsed minutes.
    #[serde(default = "default_minutes")]
    pub minutes: TextSpriteConfig,
    /// Elapsed seconds.
    #[serde(default = "default_seconds")]
    pub seconds: TextSpriteConfig,
    /// Sprite moved by playback progress and committed as a seek when released.
    #[serde(default = "default_seek_sprite_id")]
    pub seek_sprite_id: String,
    /// Period of the playback tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_title() -> TextSpriteConfig {
    TextSpriteConfig {
        text: "CLICK EJECT BUTTON".to_string(),
        file: "text.bmp".to_string(),
        str_len: 27,
        x: 110,
        y: 28,
        ..TextSpriteConfig::default()
    }
}

fn clock_digits(x: i32) -> TextSpriteConfig {
    TextSpriteConfig {
        text: "00".to_string(),
        file: "numbers.bmp".to_string(),
        numeric: true,
        char_spacing: 1,
        str_len: 2,
        x,
        y: 26,
        ..TextSpriteConfig::default()
    }
}

fn default_minutes() -> TextSpriteConfig {
    clock_digits(50)
}

fn default_seconds() -> TextSpriteConfig {
    clock_digits(80)
}

fn default_seek_sprite_id() -> String {
    "player.slider.seek".to_string()
}

fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            minutes: default_minutes(),
            seconds: default_seconds(),
            seek_sprite_id: default_seek_sprite_id(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl FaceConfig {
    pub fn from_json_str(json: &str) -> SkinampResult<Self> {
        serde_json::from_str(json).map_err(|e| SkinampError::serde(format!("face config: {e}")))
    }

    pub fn from_path(path: &Path) -> SkinampResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read face config '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

/// The main player window minus the window: composited skin, clock, title and
/// the wiring between pointer input, actions and the player.
#[derive(Debug)]
pub struct Face {
    assets: AssetStore,
    background: Background,
    config: FaceConfig,
    player: Option<Player>,
    pending_title: Arc<Mutex<Option<String>>>,
}

impl Face {
    /// Decode the skin sprites and text fields.
    #[tracing::instrument(skip_all)]
    pub fn load(bundle: SkinBundle, sprite_json: &[u8], config: FaceConfig) -> SkinampResult<Self> {
        let mut assets = AssetStore::new(bundle);
        let stack = SpriteStack::from_json(sprite_json, &mut assets)?;

        let mut text = TextLayer::new();
        text.push(TextSprite::load(TITLE_ID, &config.title, &mut assets)?);
        text.push(TextSprite::load(MINUTES_ID, &config.minutes, &mut assets)?);
        text.push(TextSprite::load(SECONDS_ID, &config.seconds, &mut assets)?);

        if stack.find_by_id(&config.seek_sprite_id).is_none() {
            tracing::warn!(id = %config.seek_sprite_id, "skin has no seek sprite");
        }
        tracing::info!(
            sprites = stack.len(),
            bitmaps = assets.cached_len(),
            "face loaded"
        );

        Ok(Self {
            assets,
            background: Background::new(stack, text),
            config,
            player: None,
            pending_title: Arc::new(Mutex::new(None)),
        })
    }

    pub fn config(&self) -> &FaceConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn background_mut(&mut self) -> &mut Background {
        &mut self.background
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.background.text().get(id).map(TextSprite::text)
    }

    pub fn set_title(&mut self, title: &str) {
        if let Some(field) = self.background.text_mut().get_mut(TITLE_ID) {
            field.set(title);
        }
    }

    /// Wire the transport buttons to `player`.
    ///
    /// `chooser` runs on EJECT and picks the next file; `None` cancels. The
    /// title shows the upper-cased file name once the release completes.
    pub fn bind_player<C>(&mut self, player: Player, mut chooser: C)
    where
        C: FnMut() -> Option<PathBuf> + Send + 'static,
    {
        let stack = self.background.stack_mut();

        let p = player.clone();
        stack.register_action(Action::Play, Box::new(move || p.play()));

        let p = player.clone();
        stack.register_action(
            Action::Pause,
            Box::new(move || {
                p.toggle_pause();
                Ok(())
            }),
        );

        let p = player.clone();
        stack.register_action(Action::Stop, Box::new(move || p.stop()));

        let p = player.clone();
        let pending = Arc::clone(&self.pending_title);
        stack.register_action(
            Action::Eject,
            Box::new(move || {
                let Some(path) = chooser() else {
                    return Ok(());
                };
                p.load_file(&path)?;
                *pending.lock() = Some(display_title(&path));
                Ok(())
            }),
        );

        for action in stack.unbound_actions() {
            tracing::warn!(%action, "skin action has no handler");
        }
        self.player = Some(player);
    }

    /// Handler for the skin's CLOSE button, normally closing the host window.
    pub fn on_close<F>(&mut self, handler: F)
    where
        F: FnMut() -> SkinampResult<()> + Send + 'static,
    {
        self.background
            .stack_mut()
            .register_action(Action::Close, Box::new(handler));
    }

    pub fn mouse_down(&mut self, x: i32, y: i32) {
        self.background.mouse_down(x, y);
    }

    pub fn mouse_up(&mut self, x: i32, y: i32) -> SkinampResult<Option<Action>> {
        let fired = self.background.mouse_up(x, y);
        let title = self.pending_title.lock().take();
        if let Some(title) = title {
            self.set_title(&title);
        }
        fired
    }

    pub fn drag(&mut self, x: i32, y: i32) {
        self.background.drag(x, y);
    }

    /// End a drag. Releasing the seek sprite seeks the player to match.
    pub fn drag_end(&mut self) -> SkinampResult<Option<String>> {
        let Some(id) = self.background.drag_end() else {
            return Ok(None);
        };
        if id == self.config.seek_sprite_id {
            if let Some(player) = &self.player {
                let fraction = self
                    .background
                    .stack()
                    .find_by_id(&id)
                    .and_then(|s| s.drag_fraction());
                if let Some(fraction) = fraction {
                    let secs = (fraction * player.total_secs() as f64).round() as u64;
                    player.seek(secs)?;
                }
            }
        }
        Ok(Some(id))
    }

    /// Show `elapsed` on the clock and move the seek sprite to match.
    pub fn show_time(&mut self, elapsed: u64, total: u64) -> SkinampResult<()> {
        let text = self.background.text_mut();
        if let Some(field) = text.get_mut(MINUTES_ID) {
            field.set(&format!("{:02}", elapsed / 60));
        }
        if let Some(field) = text.get_mut(SECONDS_ID) {
            field.set(&format!("{:02}", elapsed % 60));
        }

        let seek_id = self.config.seek_sprite_id.as_str();
        let stack = self.background.stack_mut();
        if stack.dragging_id() == Some(seek_id) {
            return Ok(());
        }
        let seek = stack
            .find_by_id_mut(seek_id)
            .ok_or_else(|| SkinampError::validation(format!("no seek sprite '{seek_id}'")))?;
        if total > 0 {
            seek.draggable_seek(elapsed as f64 / total as f64);
        }
        Ok(())
    }

    /// Tick callback for [`Player::spawn_ticker`]: update `shared`, then `repaint`.
    pub fn tick_handler<R>(shared: Arc<Mutex<Face>>, mut repaint: R) -> TickCallback
    where
        R: FnMut() + Send + 'static,
    {
        Box::new(move |elapsed, total| {
            shared.lock().show_time(elapsed, total)?;
            repaint();
            Ok(())
        })
    }
}

fn display_title(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../tests/unit/face/face.rs"]
mod tests;
