use crate::{
    assets::store::AssetStore,
    foundation::core::{PixelRect, Rgba8},
    foundation::error::{SkinampError, SkinampResult},
    sprite::{action::Action, model::AnimatedSpriteDecl, region::Sprite},
};

/// A placed, stateful control built from up to three [`Sprite`] frames.
///
/// `pressed` tracks "pointer currently down on this control"; `toggled` is a
/// persistent flag flipped on every release. The two never influence each other.
#[derive(Clone, Debug)]
pub struct AnimatedSprite {
    id: String,
    action: Option<Action>,
    x: i32,
    y: i32,
    image: Sprite,
    down_image: Option<Sprite>,
    active_image: Option<Sprite>,
    tooltip: String,
    toggleable: bool,
    draggable: bool,
    min_drag_x: i32,
    max_drag_x: i32,
    pressed: bool,
    toggled: bool,
}

impl AnimatedSprite {
    /// Build a display-only sprite at `(x, y)`.
    pub fn new(id: impl Into<String>, x: i32, y: i32, image: Sprite) -> Self {
        Self {
            id: id.into(),
            action: None,
            x,
            y,
            image,
            down_image: None,
            active_image: None,
            tooltip: String::new(),
            toggleable: false,
            draggable: false,
            min_drag_x: 0,
            max_drag_x: 0,
            pressed: false,
            toggled: false,
        }
    }

    /// Resolve a declaration, loading every referenced frame through `store`.
    pub fn load(decl: &AnimatedSpriteDecl, store: &mut AssetStore) -> SkinampResult<Self> {
        let image = Sprite::load(&decl.image, store).map_err(|e| wrap(&decl.id, "image", e))?;
        let down_image = decl
            .down_image
            .as_ref()
            .map(|d| Sprite::load(d, store))
            .transpose()
            .map_err(|e| wrap(&decl.id, "downImage", e))?;
        let active_image = decl
            .active_image
            .as_ref()
            .map(|d| Sprite::load(d, store))
            .transpose()
            .map_err(|e| wrap(&decl.id, "activeImage", e))?;

        Ok(Self {
            id: decl.id.clone(),
            action: Action::parse(&decl.action),
            x: decl.absolute_position_x,
            y: decl.absolute_position_y,
            image,
            down_image,
            active_image,
            tooltip: decl.tooltip.clone(),
            toggleable: decl.toggleable,
            draggable: decl.draggable,
            min_drag_x: decl.min_drag_x,
            max_drag_x: decl.max_drag_x,
            pressed: false,
            toggled: false,
        })
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_down_image(mut self, image: Sprite) -> Self {
        self.down_image = Some(image);
        self
    }

    pub fn with_active_image(mut self, image: Sprite) -> Self {
        self.active_image = Some(image);
        self.toggleable = true;
        self
    }

    pub fn with_drag_range(mut self, min_x: i32, max_x: i32) -> Self {
        self.draggable = true;
        self.min_drag_x = min_x;
        self.max_drag_x = max_x;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn base_image(&self) -> &Sprite {
        &self.image
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn is_toggled(&self) -> bool {
        self.toggled
    }

    pub fn is_toggleable(&self) -> bool {
        self.toggleable
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn drag_range(&self) -> (i32, i32) {
        (self.min_drag_x, self.max_drag_x)
    }

    /// Placement rectangle, sized by the base frame.
    pub fn rect(&self) -> PixelRect {
        PixelRect::new(self.x, self.y, self.image.width(), self.image.height())
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rect().contains(x, y)
    }

    pub fn press(&mut self) {
        self.pressed = true;
    }

    /// Clear the press and flip the toggle (visible only on toggleable sprites).
    pub fn release(&mut self) {
        self.pressed = false;
        self.toggled = !self.toggled;
    }

    pub(crate) fn clear_pressed(&mut self) {
        self.pressed = false;
    }

    /// Move horizontally if `x` lies inside the drag range; otherwise stay put.
    pub fn drag_to(&mut self, x: i32) -> bool {
        if !self.draggable || x < self.min_drag_x || x > self.max_drag_x {
            return false;
        }
        self.x = x;
        true
    }

    /// Position a draggable sprite at `fraction` of its drag range.
    ///
    /// No-op for non-draggable sprites and for fractions outside `[0, 1]`.
    pub fn draggable_seek(&mut self, fraction: f64) {
        if !self.draggable || !(0.0..=1.0).contains(&fraction) {
            return;
        }
        let span = f64::from(self.max_drag_x - self.min_drag_x);
        self.x = self.min_drag_x + (span * fraction).round() as i32;
    }

    /// Where the sprite sits inside its drag range, as a fraction in `[0, 1]`.
    pub fn drag_fraction(&self) -> Option<f64> {
        if !self.draggable {
            return None;
        }
        let span = self.max_drag_x - self.min_drag_x;
        if span <= 0 {
            return Some(0.0);
        }
        let offset = (self.x - self.min_drag_x).clamp(0, span);
        Some(f64::from(offset) / f64::from(span))
    }

    /// Sample in skin coordinates: pressed frame > active frame > base frame.
    pub fn color_at(&self, x: i32, y: i32) -> Option<Rgba8> {
        let (lx, ly) = (x - self.x, y - self.y);
        if self.pressed {
            if let Some(down) = &self.down_image {
                return down.color_at(lx, ly);
            }
        }
        if self.toggleable && self.toggled {
            if let Some(active) = &self.active_image {
                return active.color_at(lx, ly);
            }
        }
        self.image.color_at(lx, ly)
    }
}

fn wrap(id: &str, frame: &str, err: SkinampError) -> SkinampError {
    match err {
        SkinampError::AssetNotFound(name) => {
            SkinampError::asset_not_found(format!("{name} (sprite '{id}', {frame})"))
        }
        SkinampError::Decode(msg) => SkinampError::decode(format!("sprite '{id}', {frame}: {msg}")),
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/animated.rs"]
mod tests;
