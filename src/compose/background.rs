use crate::{
    foundation::core::{PixelRect, PixelSource, Rgba8},
    foundation::error::SkinampResult,
    sprite::{action::Action, stack::SpriteStack},
    text::sprite::TextLayer,
};

/// The composited player face.
///
/// Sampling order is text layer, then sprite stack, then the base sprite's
/// bitmap read through its placement and region offset, unclipped by the
/// region size. Anything not covered is transparent.
#[derive(Debug)]
pub struct Background {
    stack: SpriteStack,
    text: TextLayer,
}

impl Background {
    pub fn new(stack: SpriteStack, text: TextLayer) -> Self {
        Self { stack, text }
    }

    pub fn stack(&self) -> &SpriteStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut SpriteStack {
        &mut self.stack
    }

    pub fn text(&self) -> &TextLayer {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut TextLayer {
        &mut self.text
    }

    fn base_pixel(&self, x: i32, y: i32) -> Option<Rgba8> {
        let base = self.stack.sprites().first()?;
        let (bx, by) = base.position();
        base.base_image().bitmap_color_at(x - bx, y - by)
    }

    /// Pull-sample every pixel of [`PixelSource::bounds`] into an image.
    #[tracing::instrument(skip(self))]
    pub fn snapshot(&mut self) -> image::RgbaImage {
        let bounds = self.bounds();
        image::RgbaImage::from_fn(bounds.width, bounds.height, |x, y| {
            let px = self
                .sample(bounds.x + x as i32, bounds.y + y as i32)
                .to_array();
            image::Rgba(px)
        })
    }

    fn sample(&mut self, x: i32, y: i32) -> Rgba8 {
        self.text
            .color_at(x, y)
            .filter(|c| !c.is_transparent())
            .or_else(|| self.stack.color_at(x, y))
            .or_else(|| self.base_pixel(x, y))
            .unwrap_or_default()
    }

    pub fn mouse_down(&mut self, x: i32, y: i32) {
        self.stack.mouse_down(x, y);
    }

    pub fn mouse_up(&mut self, x: i32, y: i32) -> SkinampResult<Option<Action>> {
        self.stack.mouse_up(x, y)
    }

    pub fn drag(&mut self, x: i32, y: i32) {
        self.stack.drag(x, y);
    }

    pub fn drag_end(&mut self) -> Option<String> {
        self.stack.drag_end()
    }
}

impl PixelSource for Background {
    /// Full bounds of the base sprite's bitmap.
    fn bounds(&self) -> PixelRect {
        match self.stack.sprites().first() {
            Some(base) => {
                let bitmap = base.base_image().bitmap();
                PixelRect::new(0, 0, bitmap.width, bitmap.height)
            }
            None => PixelRect::default(),
        }
    }

    fn color_at(&mut self, x: i32, y: i32) -> Option<Rgba8> {
        Some(self.sample(x, y))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/background.rs"]
mod tests;
