use crate::{
    assets::store::AssetStore,
    foundation::core::Rgba8,
    foundation::error::SkinampResult,
    sprite::{
        action::{Action, ActionHandler, ActionRegistry},
        animated::AnimatedSprite,
        model::{AnimatedSpriteDecl, parse_sprite_decls, validate_decls},
    },
};

/// Z-ordered collection of controls. Index 0 is the bottom; hit-testing walks
/// from the top down and stops at the first sprite that claims the point.
#[derive(Debug, Default)]
pub struct SpriteStack {
    sprites: Vec<AnimatedSprite>,
    actions: ActionRegistry,
    dragging: Option<usize>,
}

impl SpriteStack {
    pub fn new(sprites: Vec<AnimatedSprite>) -> Self {
        Self {
            sprites,
            actions: ActionRegistry::new(),
            dragging: None,
        }
    }

    /// Validate `decls` and resolve every frame through `store`.
    #[tracing::instrument(skip_all, fields(sprites = decls.len()))]
    pub fn from_declarations(
        decls: &[AnimatedSpriteDecl],
        store: &mut AssetStore,
    ) -> SkinampResult<Self> {
        validate_decls(decls)?;
        let sprites = decls
            .iter()
            .map(|d| AnimatedSprite::load(d, store))
            .collect::<SkinampResult<Vec<_>>>()?;
        tracing::info!(
            sprites = sprites.len(),
            bitmaps = store.cached_len(),
            "sprite stack loaded"
        );
        Ok(Self::new(sprites))
    }

    pub fn from_json(json: &[u8], store: &mut AssetStore) -> SkinampResult<Self> {
        let decls = parse_sprite_decls(json)?;
        Self::from_declarations(&decls, store)
    }

    pub fn sprites(&self) -> &[AnimatedSprite] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&AnimatedSprite> {
        self.sprites.iter().find(|s| s.id() == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut AnimatedSprite> {
        self.sprites.iter_mut().find(|s| s.id() == id)
    }

    /// Id of the sprite currently latched by a drag gesture.
    pub fn dragging_id(&self) -> Option<&str> {
        self.dragging
            .and_then(|i| self.sprites.get(i))
            .map(AnimatedSprite::id)
    }

    pub fn register_action(&mut self, action: Action, handler: ActionHandler) {
        self.actions.register(action, handler);
    }

    /// Actions carried by sprites that have no registered handler, deduplicated
    /// in stack order.
    pub fn unbound_actions(&self) -> Vec<Action> {
        let mut out: Vec<Action> = Vec::new();
        for action in self.sprites.iter().filter_map(AnimatedSprite::action) {
            if !self.actions.is_registered(action) && !out.contains(action) {
                out.push(action.clone());
            }
        }
        out
    }

    fn hit(&self, x: i32, y: i32) -> Option<usize> {
        self.sprites.iter().rposition(|s| s.contains(x, y))
    }

    /// Topmost defined color at `(x, y)`. Transparent samples fall through to
    /// the sprites below.
    pub fn color_at(&self, x: i32, y: i32) -> Option<Rgba8> {
        self.sprites
            .iter()
            .rev()
            .filter(|s| s.contains(x, y))
            .filter_map(|s| s.color_at(x, y))
            .find(|c| !c.is_transparent())
    }

    pub fn mouse_down(&mut self, x: i32, y: i32) {
        if let Some(i) = self.hit(x, y) {
            let sprite = &mut self.sprites[i];
            tracing::debug!(sprite = sprite.id(), x, y, "mouse down");
            sprite.press();
        }
    }

    /// Release the topmost hit sprite and fire its action.
    ///
    /// Returns the sprite's action when one was hit, whether or not a handler
    /// was bound. Handler errors propagate.
    pub fn mouse_up(&mut self, x: i32, y: i32) -> SkinampResult<Option<Action>> {
        let Some(i) = self.hit(x, y) else {
            return Ok(None);
        };
        let sprite = &mut self.sprites[i];
        sprite.release();
        let Some(action) = sprite.action().cloned() else {
            return Ok(None);
        };
        tracing::debug!(sprite = sprite.id(), %action, "mouse up");
        self.actions.invoke(&action)?;
        Ok(Some(action))
    }

    /// Latch the topmost hit sprite on the first call, then move it to `x`
    /// when it is draggable and `x` lies within its range.
    pub fn drag(&mut self, x: i32, y: i32) {
        if self.dragging.is_none() {
            self.dragging = self.hit(x, y);
            if let Some(i) = self.dragging {
                tracing::debug!(sprite = self.sprites[i].id(), "drag latched");
            }
        }
        if let Some(sprite) = self.dragging.and_then(|i| self.sprites.get_mut(i)) {
            sprite.drag_to(x);
        }
    }

    /// Drop the drag latch and return the id of the sprite that was held.
    pub fn drag_end(&mut self) -> Option<String> {
        let sprite = self.dragging.take().and_then(|i| self.sprites.get_mut(i))?;
        sprite.clear_pressed();
        Some(sprite.id().to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/stack.rs"]
mod tests;
